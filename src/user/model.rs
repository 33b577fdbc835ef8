use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default)]
    pub amount: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub amount: String,
}

impl TryFrom<UserRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: Some(row.id),
            name: row.name,
            email: row.email,
            password: row.password,
            amount: Decimal::from_str(&row.amount).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub amount: Decimal,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub amount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn password_is_never_serialized() {
        let user = User {
            id: Some(1),
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            password: "$2b$10$hash".to_string(),
            amount: dec!(1000),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }
}
