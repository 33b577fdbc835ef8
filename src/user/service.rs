use rust_decimal::Decimal;

use super::{
    model::{CreateUserRequest, UpdateUserRequest, User},
    repository::UserRepository,
};
use crate::{error::CustomError, utils::encrypt};

pub struct UserService {
    repository: UserRepository,
}

impl UserService {
    pub fn new(repository: UserRepository) -> Self {
        UserService { repository }
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<User, CustomError> {
        validate_identity(&request.name, &request.email)?;
        validate_password(&request.password)?;
        validate_amount(request.amount)?;

        let mut user = User {
            id: None,
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            password: encrypt(&request.password)?,
            amount: request.amount,
        };
        user.id = Some(self.repository.insert_user(&user).await?);
        tracing::info!(id = ?user.id, email = %user.email, "user created");
        Ok(user)
    }

    pub async fn find_one(&self, id: i64) -> Result<User, CustomError> {
        self.repository
            .query_user(id)
            .await?
            .ok_or(CustomError::NotFound("User"))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        self.repository
            .query_user_by_email(&email.trim().to_lowercase())
            .await
    }

    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User, CustomError> {
        let mut user = self.find_one(id).await?;
        if let Some(name) = request.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = request.email {
            user.email = email.trim().to_lowercase();
        }
        if let Some(amount) = request.amount {
            validate_amount(amount)?;
            user.amount = amount;
        }
        validate_identity(&user.name, &user.email)?;
        if let Some(password) = request.password {
            validate_password(&password)?;
            user.password = encrypt(&password)?;
        }

        self.repository.update_user(&user).await?;
        tracing::info!(id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CustomError> {
        self.repository.delete_user(id).await?;
        tracing::info!(id, "user deleted");
        Ok(())
    }
}

fn validate_identity(name: &str, email: &str) -> Result<(), CustomError> {
    if name.trim().is_empty() || email.trim().is_empty() {
        return Err(CustomError::InvalidArgument(
            "name and email are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(CustomError::InvalidArgument("email is not valid".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CustomError> {
    if password.is_empty() {
        return Err(CustomError::InvalidArgument("password is required".to_string()));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> Result<(), CustomError> {
    if amount < Decimal::ZERO {
        return Err(CustomError::InvalidArgument(
            "amount cannot be negative".to_string(),
        ));
    }
    Ok(())
}
