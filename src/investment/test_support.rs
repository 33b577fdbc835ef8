use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use super::{
    model::{Investment, InvestmentFilter, Pagination},
    repository::InvestmentStore,
};
use crate::error::CustomError;

/// In-memory store with the same version check as the SQL repository.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<i64, Investment>>,
    queries: Mutex<Vec<(InvestmentFilter, Pagination)>>,
    saves: AtomicUsize,
    failing: bool,
}

impl MemoryStore {
    pub fn failing() -> Self {
        MemoryStore {
            failing: true,
            ..Default::default()
        }
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(InvestmentFilter, Pagination)> {
        self.queries.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), CustomError> {
        if self.failing {
            return Err(CustomError::StorageError(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl InvestmentStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Investment>, CustomError> {
        self.check()?;
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, investment: Investment) -> Result<Investment, CustomError> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let saved = match investment.id {
            None => {
                let id = records.keys().next_back().copied().unwrap_or(0) + 1;
                Investment {
                    id: Some(id),
                    version: 0,
                    ..investment
                }
            }
            Some(id) => {
                let stored = records.get(&id).ok_or(CustomError::Conflict(id))?;
                if stored.version != investment.version {
                    return Err(CustomError::Conflict(id));
                }
                Investment {
                    version: investment.version + 1,
                    ..investment
                }
            }
        };
        records.insert(saved.id.unwrap_or_default(), saved.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(saved)
    }

    async fn find_and_count(
        &self,
        filter: InvestmentFilter,
        pagination: Pagination,
    ) -> Result<(Vec<Investment>, i64), CustomError> {
        self.check()?;
        self.queries.lock().unwrap().push((filter, pagination));
        let records = self.records.lock().unwrap();
        let matching: Vec<Investment> = records
            .values()
            .filter(|i| i.owner_id == filter.owner_id)
            .filter(|i| filter.is_active.is_none_or(|active| i.is_active == active))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(pagination.skip as usize)
            .take(pagination.take as usize)
            .collect();
        Ok((page, total))
    }
}
