use std::{env, str::FromStr};

use dotenvy::dotenv;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::CustomError;

const DEFAULT_JWT_SECRET: &str = "defaultSecretKey";

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt: JwtSettings,
    pub host: String,
    pub port: u16,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
    pub interest_monthly_rate: Decimal,
}

impl Config {
    pub fn from_env() -> Result<Self, CustomError> {
        dotenv().ok(); // Load environment variables

        let database_url = env::var("DATABASE_URL")
            .map_err(|e| CustomError::EnvError("DATABASE_URL".to_string(), e))?;

        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, falling back to the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        Ok(Config {
            database_url,
            jwt: JwtSettings {
                secret,
                expiration_hours: parse_or("JWT_EXPIRATION_HOURS", 1)?,
            },
            host: parse_or("HOST", "127.0.0.1".to_string())?,
            port: parse_or("PORT", 3000)?,
            rate_limit_max: parse_or("RATE_LIMIT_MAX", 100)?,
            rate_limit_window_secs: parse_or("RATE_LIMIT_WINDOW_SECS", 15 * 60)?,
            interest_monthly_rate: parse_or("INTEREST_MONTHLY_RATE", dec!(0.0052))?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T, CustomError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| CustomError::ConfigError(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
