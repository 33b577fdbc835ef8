use std::{collections::HashMap, sync::Arc};

use super::model::{Claims, LoginRequest, Response};
use crate::{
    config::JwtSettings,
    error::CustomError,
    user::{model::CreateUserRequest, service::UserService},
    utils::{create_jwt, extract_token, is_password_valid, verify_jwt},
};

pub struct AuthService {
    users: Arc<UserService>,
    jwt: JwtSettings,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, jwt: JwtSettings) -> Self {
        AuthService { users, jwt }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<Response, CustomError> {
        let user = match self.users.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                tracing::info!("User {} not found", request.email);
                return Err(CustomError::InvalidCredentials);
            }
        };

        if !is_password_valid(&request.password, &user.password) {
            tracing::info!("User {} wrong password", request.email);
            return Err(CustomError::InvalidCredentials);
        }

        let access_token = create_jwt(&user, &self.jwt)?;
        tracing::info!("{} succeed login", user.email);
        Ok(Response { access_token })
    }

    pub async fn register(&self, request: CreateUserRequest) -> Result<Response, CustomError> {
        let user = self.users.create(request).await?;
        let access_token = create_jwt(&user, &self.jwt)?;
        tracing::info!("{} registered", user.email);
        Ok(Response { access_token })
    }

    pub fn authenticate(&self, headers: &HashMap<String, String>) -> Result<Claims, CustomError> {
        let token = extract_token(headers).ok_or(CustomError::Unauthorized(None))?;
        verify_jwt(&token, &self.jwt)
    }
}
