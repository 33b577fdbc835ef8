use super::model::{User, UserRow};
use crate::error::CustomError;

pub struct UserRepository {
    pool: sqlx::AnyPool,
}

impl UserRepository {
    pub fn new(pool: sqlx::AnyPool) -> Self {
        UserRepository { pool }
    }

    pub async fn insert_user(&self, new_user: &User) -> Result<i64, CustomError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email, password, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id"#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password)
        .bind(new_user.amount.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)
    }

    pub async fn query_user(&self, id: i64) -> Result<Option<User>, CustomError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, name, email, password, amount FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::try_from).transpose()?)
    }

    pub async fn query_user_by_email(&self, email: &str) -> Result<Option<User>, CustomError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"SELECT id, name, email, password, amount FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::try_from).transpose()?)
    }

    pub async fn update_user(&self, user: &User) -> Result<(), CustomError> {
        let id = user.id.ok_or(CustomError::NotFound("User"))?;
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, password = $3, amount = $4
            WHERE id = $5"#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.amount.to_string())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(CustomError::NotFound("User"));
        }
        Ok(())
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), CustomError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CustomError::NotFound("User"));
        }
        Ok(())
    }
}

fn map_unique_violation(e: sqlx::Error) -> CustomError {
    match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => CustomError::EmailExists,
        e => CustomError::StorageError(e),
    }
}
