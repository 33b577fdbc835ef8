use std::collections::HashMap;

use super::{
    model::{LoginRequest, Response},
    service::AuthService,
};
use crate::{
    constants::{CREATED, OK_RESPONSE},
    error::CustomError,
    user::model::CreateUserRequest,
    utils::{des_from_str, respond},
};

pub struct AuthController {
    service: AuthService,
}

impl AuthController {
    pub fn new(service: AuthService) -> Self {
        AuthController { service }
    }

    pub fn service(&self) -> &AuthService {
        &self.service
    }

    pub async fn login(&self, request: &str) -> (String, String) {
        respond(OK_RESPONSE, self.try_login(request).await)
    }

    pub async fn register(&self, request: &str) -> (String, String) {
        respond(CREATED, self.try_register(request).await)
    }

    pub fn validate(&self, headers: &HashMap<String, String>) -> (String, String) {
        match self.service.authenticate(headers) {
            Ok(_) => (OK_RESPONSE.to_string(), "".to_string()),
            Err(err) => err.into_response(),
        }
    }

    async fn try_login(&self, request: &str) -> Result<Response, CustomError> {
        let login: LoginRequest = des_from_str(request)?;
        self.service.login(login).await
    }

    async fn try_register(&self, request: &str) -> Result<Response, CustomError> {
        let user: CreateUserRequest = des_from_str(request)?;
        self.service.register(user).await
    }
}
