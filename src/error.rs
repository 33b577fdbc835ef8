use std::{error::Error, fmt::Debug};

use rust_decimal::Decimal;

use crate::constants::{
    BAD_REQUEST, CONFLICT, INTERNAL_ERROR, NOT_FOUND, UNAUTHORIZED, UNPROCESSABLE_ENTITY,
};

#[derive(thiserror::Error)]
pub enum CustomError {
    #[error("ENV '{0}' Not Found")]
    EnvError(String, #[source] std::env::VarError),

    #[error("Invalid value for '{0}': {1}")]
    ConfigError(String, String),

    #[error("Error encode token")]
    EncodeError(#[source] jsonwebtoken::errors::Error),

    #[error("Error serializing response")]
    SerializeError(#[source] serde_json::Error),

    #[error("Error hashing password")]
    HashError(#[source] bcrypt::BcryptError),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Insufficient funds for withdrawal: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Investment {0} was modified concurrently")]
    Conflict(i64),

    #[error("Email already registered")]
    EmailExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized(#[source] Option<jsonwebtoken::errors::Error>),

    #[error("Database query")]
    StorageError(#[from] sqlx::Error),
}

impl CustomError {
    pub fn status_line(&self) -> &'static str {
        match self {
            CustomError::InvalidArgument(_) => BAD_REQUEST,
            CustomError::InvalidCredentials | CustomError::Unauthorized(_) => UNAUTHORIZED,
            CustomError::NotFound(_) => NOT_FOUND,
            CustomError::Conflict(_) | CustomError::EmailExists => CONFLICT,
            CustomError::InsufficientFunds { .. } => UNPROCESSABLE_ENTITY,
            CustomError::EnvError(..)
            | CustomError::ConfigError(..)
            | CustomError::EncodeError(_)
            | CustomError::SerializeError(_)
            | CustomError::HashError(_)
            | CustomError::StorageError(_) => INTERNAL_ERROR,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_line() == INTERNAL_ERROR
    }

    /// Turns the error into a `(status line, body)` pair, logging it on the way.
    /// Server errors never leak their message to the client.
    pub fn into_response(self) -> (String, String) {
        if self.is_server_error() {
            tracing::error!("{:?}", self);
            return (
                self.status_line().to_string(),
                r#"{"message":"Internal server error"}"#.to_string(),
            );
        }
        tracing::warn!("request rejected: {}", self);
        let body = serde_json::json!({ "message": self.to_string() }).to_string();
        (self.status_line().to_string(), body)
    }
}

impl Debug for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        if let Some(source) = self.source() {
            write!(f, " (Caused by: {})", source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn every_engine_error_kind_has_its_own_status() {
        let statuses = [
            CustomError::InvalidArgument("bad".into()).status_line(),
            CustomError::NotFound("Investment").status_line(),
            CustomError::InsufficientFunds {
                requested: dec!(10),
                available: dec!(1),
            }
            .status_line(),
            CustomError::Conflict(1).status_line(),
            CustomError::StorageError(sqlx::Error::PoolTimedOut).status_line(),
        ];
        for (i, a) in statuses.iter().enumerate() {
            for b in statuses.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn server_errors_hide_their_cause() {
        let (status, body) = CustomError::StorageError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(status, INTERNAL_ERROR);
        assert!(!body.contains("pool"));
    }

    #[test]
    fn debug_includes_source() {
        let err = CustomError::StorageError(sqlx::Error::PoolTimedOut);
        assert!(format!("{:?}", err).contains("Caused by"));
    }
}
