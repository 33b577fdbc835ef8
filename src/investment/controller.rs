use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    model::{
        CreateInvestmentRequest, Investment, InvestmentPage, WithdrawalRequest, parse_creation_date,
    },
    repository::InvestmentStore,
    service::InvestmentService,
};
use crate::{
    constants::{CREATED, OK_RESPONSE},
    error::CustomError,
    utils::{des_from_str, parse_id, respond},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvestmentView {
    #[serde(flatten)]
    investment: Investment,
    accrued_gains: Decimal,
}

pub struct InvestmentController<S: InvestmentStore> {
    service: InvestmentService<S>,
}

impl<S: InvestmentStore> InvestmentController<S> {
    pub fn new(service: InvestmentService<S>) -> Self {
        InvestmentController { service }
    }

    pub async fn create(&self, body: &str) -> (String, String) {
        respond(CREATED, self.try_create(body).await)
    }

    pub async fn get(&self, id: &str) -> (String, String) {
        respond(OK_RESPONSE, self.try_get(id).await)
    }

    pub async fn withdraw(&self, id: &str, body: &str) -> (String, String) {
        respond(OK_RESPONSE, self.try_withdraw(id, body).await)
    }

    pub async fn list(&self, query: &HashMap<String, String>) -> (String, String) {
        respond(OK_RESPONSE, self.try_list(query).await)
    }

    async fn try_create(&self, body: &str) -> Result<Investment, CustomError> {
        let request: CreateInvestmentRequest = des_from_str(body)?;
        let creation_date = request
            .creation_date
            .as_deref()
            .map(parse_creation_date)
            .transpose()?;
        self.service
            .create(request.owner, request.initial_value, creation_date)
            .await
    }

    async fn try_get(&self, id: &str) -> Result<InvestmentView, CustomError> {
        let investment = self.service.get(parse_id(id)?).await?;
        Ok(InvestmentView {
            accrued_gains: self.service.accrued_gains(&investment)?,
            investment,
        })
    }

    async fn try_withdraw(&self, id: &str, body: &str) -> Result<Investment, CustomError> {
        let id = parse_id(id)?;
        let request: WithdrawalRequest = des_from_str(body)?;
        self.service.withdraw(id, request.amount).await
    }

    async fn try_list(&self, query: &HashMap<String, String>) -> Result<InvestmentPage, CustomError> {
        let user_id = query
            .get("userId")
            .ok_or_else(|| CustomError::InvalidArgument("userId is required".to_string()))
            .and_then(|raw| parse_id(raw))?;
        let page = optional_number(query, "page", 1)?;
        let limit = optional_number(query, "limit", 10)?;
        self.service
            .list(user_id, query.get("status").map(String::as_str), page, limit)
            .await
    }
}

fn optional_number(
    query: &HashMap<String, String>,
    key: &str,
    default: i64,
) -> Result<i64, CustomError> {
    match query.get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| CustomError::InvalidArgument(format!("{} must be a number", key))),
        None => Ok(default),
    }
}
