use std::sync::Arc;

use super::{
    model::{CreateUserRequest, UpdateUserRequest, User},
    service::UserService,
};
use crate::{
    constants::{CREATED, NO_CONTENT, OK_RESPONSE},
    error::CustomError,
    utils::{des_from_str, parse_id, respond},
};

pub struct UserController {
    service: Arc<UserService>,
}

impl UserController {
    pub fn new(service: Arc<UserService>) -> Self {
        UserController { service }
    }

    pub async fn create(&self, body: &str) -> (String, String) {
        respond(CREATED, self.try_create(body).await)
    }

    pub async fn find_one(&self, id: &str) -> (String, String) {
        respond(OK_RESPONSE, self.try_find_one(id).await)
    }

    pub async fn update(&self, id: &str, body: &str) -> (String, String) {
        respond(OK_RESPONSE, self.try_update(id, body).await)
    }

    pub async fn remove(&self, id: &str) -> (String, String) {
        match self.try_remove(id).await {
            Ok(()) => (NO_CONTENT.to_string(), "".to_string()),
            Err(err) => err.into_response(),
        }
    }

    async fn try_create(&self, body: &str) -> Result<User, CustomError> {
        let request: CreateUserRequest = des_from_str(body)?;
        self.service.create(request).await
    }

    async fn try_find_one(&self, id: &str) -> Result<User, CustomError> {
        self.service.find_one(parse_id(id)?).await
    }

    async fn try_update(&self, id: &str, body: &str) -> Result<User, CustomError> {
        let id = parse_id(id)?;
        let request: UpdateUserRequest = des_from_str(body)?;
        self.service.update(id, request).await
    }

    async fn try_remove(&self, id: &str) -> Result<(), CustomError> {
        self.service.delete(parse_id(id)?).await
    }
}
