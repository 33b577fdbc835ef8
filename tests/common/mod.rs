#![allow(dead_code)]

use investment_api::{config::Config, config::JwtSettings, db::Database};
use rand::Rng;
use rust_decimal_macros::dec;
use sqlx::{AnyPool, any::install_default_drivers};

pub async fn setup_test_db() -> AnyPool {
    install_default_drivers();
    let timestamp: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();
    let db_name = format!("test_{}", timestamp);
    let database_url = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);

    // Create the pool (which will internally use shared memory DB)
    let pool = AnyPool::connect(&database_url)
        .await
        .expect("Failed to create in-memory SQLite DB");

    Database::migrate(&pool)
        .await
        .expect("Failed to create test tables");

    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt: JwtSettings {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
        },
        host: "127.0.0.1".to_string(),
        port: 0,
        rate_limit_max: 100,
        rate_limit_window_secs: 900,
        interest_monthly_rate: dec!(0.0052),
    }
}
