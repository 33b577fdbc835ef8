use std::collections::HashMap;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    auth::model::Claims, config::JwtSettings, error::CustomError, user::model::User,
};

const HASH_COST: u32 = 10;

pub fn des_from_str<T: for<'a> Deserialize<'a>>(string: &str) -> Result<T, CustomError> {
    serde_json::from_str(string)
        .map_err(|e| CustomError::InvalidArgument(format!("invalid body: {}", e)))
}

pub fn ser_to_str<T: Serialize>(t: &T) -> Result<String, CustomError> {
    serde_json::to_string(t).map_err(CustomError::SerializeError)
}

/// Serializes a successful result under `status`, or maps the error to its status.
pub fn respond<T: Serialize>(status: &str, result: Result<T, CustomError>) -> (String, String) {
    match result.and_then(|value| ser_to_str(&value)) {
        Ok(json) => (status.to_string(), json),
        Err(err) => err.into_response(),
    }
}

pub fn parse_id(raw: &str) -> Result<i64, CustomError> {
    raw.parse()
        .map_err(|_| CustomError::InvalidArgument(format!("invalid id '{}'", raw)))
}

pub fn encrypt(value: &str) -> Result<String, CustomError> {
    hash(value, HASH_COST).map_err(CustomError::HashError)
}

pub fn is_password_valid(value: &str, hashed: &str) -> bool {
    verify(value, hashed).unwrap_or(false)
}

pub fn create_jwt(user: &User, settings: &JwtSettings) -> Result<String, CustomError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(settings.expiration_hours))
        .ok_or_else(|| {
            CustomError::ConfigError(
                "JWT_EXPIRATION_HOURS".to_string(),
                "expiration out of range".to_string(),
            )
        })?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id.unwrap_or_default().to_string(),
        email: user.email.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(CustomError::EncodeError)
}

pub fn verify_jwt(token: &str, settings: &JwtSettings) -> Result<Claims, CustomError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| CustomError::Unauthorized(Some(e)))
}

/// Reads the bearer token from lower-cased request headers.
pub fn extract_token(headers: &HashMap<String, String>) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
