use sqlx::{AnyPool, Pool};

const SQLITE_SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        amount TEXT NOT NULL DEFAULT '0'
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS investments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id BIGINT NOT NULL,
        initial_value TEXT NOT NULL,
        current_value TEXT NOT NULL,
        creation_date BIGINT NOT NULL,
        is_active BIGINT NOT NULL DEFAULT 1,
        version BIGINT NOT NULL DEFAULT 0
    )"#,
];

const POSTGRES_SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) UNIQUE NOT NULL,
        password TEXT NOT NULL,
        amount TEXT NOT NULL DEFAULT '0'
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS investments (
        id BIGSERIAL PRIMARY KEY,
        owner_id BIGINT NOT NULL,
        initial_value TEXT NOT NULL,
        current_value TEXT NOT NULL,
        creation_date BIGINT NOT NULL,
        is_active BIGINT NOT NULL DEFAULT 1,
        version BIGINT NOT NULL DEFAULT 0
    )"#,
];

pub struct Database {
    pub pool: Pool<sqlx::Any>,
}

impl Database {
    pub async fn new_pool(url: &str) -> Result<AnyPool, sqlx::Error> {
        sqlx::any::install_default_drivers();
        sqlx::any::AnyPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .idle_timeout(std::time::Duration::from_secs(30))
            .connect(url)
            .await
    }

    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = Self::new_pool(url).await?;
        Self::migrate(&pool).await?;
        Ok(Database { pool })
    }

    /// Creates the tables when missing, picking DDL for the pool's backend.
    pub async fn migrate(pool: &AnyPool) -> Result<(), sqlx::Error> {
        let backend = {
            let conn = pool.acquire().await?;
            conn.backend_name().to_string()
        };
        let schema = if backend.eq_ignore_ascii_case("sqlite") {
            SQLITE_SCHEMA
        } else {
            POSTGRES_SCHEMA
        };
        for statement in schema {
            sqlx::query(statement).execute(pool).await?;
        }
        tracing::info!("schema ready on {}", backend);
        Ok(())
    }

    pub fn print_pool_stats(&self) {
        tracing::debug!(
            total = self.pool.size(),
            idle = self.pool.num_idle(),
            active = self.pool.size() - self.pool.num_idle() as u32,
            "[DB POOL STATS]"
        );
    }
}
