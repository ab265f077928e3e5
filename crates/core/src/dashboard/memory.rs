//! In-memory record store.
//!
//! Backs tests and local demos with the same contract as the database
//! repository.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use tally_shared::types::UserId;

use super::error::DashboardError;
use super::store::RecordStore;
use super::types::{GroupTotal, RecordKind, Transaction};

/// Record store holding every record in a vector.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<Vec<Transaction>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with records.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = Transaction>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }

    /// Adds a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn insert(&self, record: impl Into<Transaction>) -> Result<(), DashboardError> {
        self.records
            .write()
            .map_err(|_| poisoned())?
            .push(record.into());
        Ok(())
    }

    /// Returns the number of stored records across both kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn len(&self) -> Result<usize, DashboardError> {
        Ok(self.read()?.len())
    }

    /// Returns true when the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, DashboardError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Transaction>>, DashboardError> {
        self.records.read().map_err(|_| poisoned())
    }

    fn matching(&self, kind: RecordKind, user_id: UserId) -> Result<Vec<Transaction>, DashboardError> {
        Ok(self
            .read()?
            .iter()
            .filter(|r| r.kind() == kind && r.user_id() == user_id)
            .cloned()
            .collect())
    }
}

fn poisoned() -> DashboardError {
    DashboardError::Store("record store lock poisoned".to_string())
}

fn newest_first(records: &mut [Transaction]) {
    records.sort_by(|a, b| b.date().cmp(&a.date()));
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn total(&self, kind: RecordKind, user_id: UserId) -> Result<Decimal, DashboardError> {
        Ok(self
            .matching(kind, user_id)?
            .iter()
            .map(Transaction::amount)
            .sum())
    }

    async fn group_totals(
        &self,
        kind: RecordKind,
        user_id: UserId,
    ) -> Result<Vec<GroupTotal>, DashboardError> {
        let mut groups: BTreeMap<String, (Decimal, u64)> = BTreeMap::new();
        for record in self.matching(kind, user_id)? {
            let entry = groups
                .entry(record.group_key().to_string())
                .or_insert((Decimal::ZERO, 0));
            entry.0 += record.amount();
            entry.1 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(key, (total, count))| GroupTotal { key, total, count })
            .collect())
    }

    async fn recent(
        &self,
        kind: RecordKind,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Transaction>, DashboardError> {
        let mut records = self.matching(kind, user_id)?;
        newest_first(&mut records);
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(records)
    }

    async fn since(
        &self,
        kind: RecordKind,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DashboardError> {
        let mut records: Vec<Transaction> = self
            .matching(kind, user_id)?
            .into_iter()
            .filter(|r| r.date() >= cutoff)
            .collect();
        newest_first(&mut records);
        Ok(records)
    }
}
