use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use common::setup_test_db;
use investment_api::{
    constants::{BAD_REQUEST, CREATED, NOT_FOUND, OK_RESPONSE, UNPROCESSABLE_ENTITY},
    error::CustomError,
    investment::{
        clock::FixedClock,
        controller::InvestmentController,
        model::{Investment, InvestmentFilter, NewInvestment, Pagination},
        repository::{InvestmentRepository, InvestmentStore},
        service::InvestmentService,
        withdrawal::WithdrawalEngine,
    },
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::collections::HashMap;
mod common;

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn repository_round_trip() {
    let repository = InvestmentRepository::new(setup_test_db().await);
    let draft = repository.create(NewInvestment {
        owner_id: 5,
        initial_value: dec!(1000.25),
        creation_date: start(),
    });
    assert_eq!(draft.id, None);
    assert!(repository.find_by_id(1).await.unwrap().is_none());

    let saved = repository.save(draft).await.unwrap();
    let id = saved.id.expect("id assigned on save");

    let found = repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found, saved);
    assert_eq!(found.initial_value, dec!(1000.25));
    assert_eq!(found.current_value, dec!(1000.25));
    assert_eq!(found.creation_date, start());
    assert!(found.is_active);
}

#[tokio::test]
async fn repository_detects_lost_update() {
    let repository = InvestmentRepository::new(setup_test_db().await);
    let saved = repository
        .save(repository.create(NewInvestment {
            owner_id: 1,
            initial_value: dec!(500),
            creation_date: start(),
        }))
        .await
        .unwrap();

    let first = repository
        .save(Investment {
            current_value: dec!(490),
            ..saved.clone()
        })
        .await
        .unwrap();
    assert_eq!(first.version, saved.version + 1);

    let stale = repository
        .save(Investment {
            current_value: dec!(480),
            ..saved
        })
        .await;
    assert!(matches!(stale, Err(CustomError::Conflict(_))));

    let stored = repository.find_by_id(first.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.current_value, dec!(490));
}

#[tokio::test]
async fn repository_filters_and_pages() {
    let pool = setup_test_db().await;
    let repository = InvestmentRepository::new(pool.clone());
    for value in [dec!(10), dec!(20), dec!(30), dec!(40)] {
        repository
            .save(repository.create(NewInvestment {
                owner_id: 1,
                initial_value: value,
                creation_date: start(),
            }))
            .await
            .unwrap();
    }
    repository
        .save(repository.create(NewInvestment {
            owner_id: 2,
            initial_value: dec!(99),
            creation_date: start(),
        }))
        .await
        .unwrap();
    sqlx::query("UPDATE investments SET is_active = $1 WHERE initial_value = '20'")
        .bind(0_i64)
        .execute(&pool)
        .await
        .unwrap();

    let all = InvestmentFilter {
        owner_id: 1,
        is_active: None,
    };
    let (page, total) = repository
        .find_and_count(all, Pagination { skip: 0, take: 10 })
        .await
        .unwrap();
    assert_eq!(total, 4);
    assert_eq!(page.len(), 4);

    let active = InvestmentFilter {
        owner_id: 1,
        is_active: Some(true),
    };
    let (page, total) = repository
        .find_and_count(active, Pagination { skip: 1, take: 1 })
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].initial_value, dec!(30));

    let inactive = InvestmentFilter {
        owner_id: 1,
        is_active: Some(false),
    };
    let (page, total) = repository
        .find_and_count(inactive, Pagination { skip: 0, take: 10 })
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert!(!page[0].is_active);
}

#[tokio::test]
async fn repository_persists_active_flag() {
    let repository = InvestmentRepository::new(setup_test_db().await);
    let saved = repository
        .save(repository.create(NewInvestment {
            owner_id: 9,
            initial_value: dec!(75),
            creation_date: start(),
        }))
        .await
        .unwrap();
    assert!(repository.find_by_id(saved.id.unwrap()).await.unwrap().unwrap().is_active);

    let closed = repository
        .save(Investment {
            is_active: false,
            ..saved
        })
        .await
        .unwrap();
    let stored = repository.find_by_id(closed.id.unwrap()).await.unwrap().unwrap();
    assert!(!stored.is_active);

    let (page, total) = repository
        .find_and_count(
            InvestmentFilter {
                owner_id: 9,
                is_active: Some(false),
            },
            Pagination { skip: 0, take: 10 },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(page[0], stored);
}

async fn controller(clock: Arc<FixedClock>) -> InvestmentController<InvestmentRepository> {
    let repository = InvestmentRepository::new(setup_test_db().await);
    InvestmentController::new(InvestmentService::new(
        repository,
        WithdrawalEngine::default(),
        clock,
    ))
}

#[tokio::test]
async fn create_and_withdraw_through_controller() {
    let clock = Arc::new(FixedClock::new(start()));
    let controller = controller(clock.clone()).await;

    let created = controller
        .create(&json!({"owner": 1, "initialValue": 1000, "creationDate": "2022-08-01"}).to_string())
        .await;
    assert_eq!(created.0, CREATED.to_string());
    let created: Value = serde_json::from_str(&created.1).unwrap();
    let id = created["id"].as_i64().unwrap().to_string();
    assert_eq!(created["ownerId"], 1);
    assert_eq!(created["creationDate"], "2022-08-01T00:00:00Z");

    let too_much = controller.withdraw(&id, r#"{"amount": 5000}"#).await;
    assert_eq!(too_much.0, UNPROCESSABLE_ENTITY.to_string());

    let negative = controller.withdraw(&id, r#"{"amount": -3}"#).await;
    assert_eq!(negative.0, BAD_REQUEST.to_string());

    // 25 months old, past the two-year bracket
    let withdrawn = controller.withdraw(&id, r#"{"amount": 100}"#).await;
    assert_eq!(withdrawn.0, OK_RESPONSE.to_string());
    let withdrawn: Value = serde_json::from_str(&withdrawn.1).unwrap();
    assert_eq!(decimal(&withdrawn["currentValue"]), dec!(915));

    let fetched = controller.get(&id).await;
    assert_eq!(fetched.0, OK_RESPONSE.to_string());
    let fetched: Value = serde_json::from_str(&fetched.1).unwrap();
    assert_eq!(decimal(&fetched["currentValue"]), dec!(915));
    assert!(fetched["accruedGains"].is_string());
}

#[tokio::test]
async fn controller_error_statuses() {
    let controller = controller(Arc::new(FixedClock::new(start()))).await;

    let missing = controller.withdraw("404", r#"{"amount": -1}"#).await;
    assert_eq!(missing.0, NOT_FOUND.to_string());
    assert_eq!(controller.get("404").await.0, NOT_FOUND.to_string());
    assert_eq!(controller.get("abc").await.0, BAD_REQUEST.to_string());

    let negative = controller
        .create(&json!({"owner": 1, "initialValue": -5}).to_string())
        .await;
    assert_eq!(negative.0, BAD_REQUEST.to_string());

    let bad_date = controller
        .create(&json!({"owner": 1, "initialValue": 5, "creationDate": "soon"}).to_string())
        .await;
    assert_eq!(bad_date.0, BAD_REQUEST.to_string());
}

#[tokio::test]
async fn list_through_controller() {
    let controller = controller(Arc::new(FixedClock::new(start()))).await;
    for owner in [1, 1, 1, 2] {
        controller
            .create(&json!({"owner": owner, "initialValue": 100}).to_string())
            .await;
    }

    let mut query = HashMap::new();
    query.insert("userId".to_string(), "1".to_string());
    query.insert("status".to_string(), "active".to_string());
    query.insert("limit".to_string(), "2".to_string());
    let listed = controller.list(&query).await;
    assert_eq!(listed.0, OK_RESPONSE.to_string());
    let listed: Value = serde_json::from_str(&listed.1).unwrap();
    assert_eq!(listed["total"], 3);
    assert_eq!(listed["investments"].as_array().unwrap().len(), 2);

    query.insert("status".to_string(), "inactive".to_string());
    let listed: Value = serde_json::from_str(&controller.list(&query).await.1).unwrap();
    assert_eq!(listed["total"], 0);

    let missing_user = controller.list(&HashMap::new()).await;
    assert_eq!(missing_user.0, BAD_REQUEST.to_string());
}

#[tokio::test]
async fn omitted_creation_date_uses_clock() {
    let clock = Arc::new(FixedClock::new(start()));
    let controller = controller(clock.clone()).await;
    let created: Value = serde_json::from_str(
        &controller
            .create(&json!({"owner": 3, "initialValue": 10}).to_string())
            .await
            .1,
    )
    .unwrap();

    clock.advance(Duration::days(10));
    let id = created["id"].as_i64().unwrap().to_string();
    let fetched: Value = serde_json::from_str(&controller.get(&id).await.1).unwrap();
    assert_eq!(fetched["creationDate"], "2024-09-01T00:00:00Z");
}
