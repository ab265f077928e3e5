//! Read-side contract between the dashboard service and record storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use tally_shared::types::UserId;

use super::error::DashboardError;
use super::types::{GroupTotal, RecordKind, Transaction};

/// Read access to a user's income and expense records.
///
/// Every method is scoped to `user_id` and touches only the collection named
/// by `kind`. Implementations report failures as [`DashboardError::Store`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Sum of `amount` over all records; zero when there are none.
    async fn total(&self, kind: RecordKind, user_id: UserId) -> Result<Decimal, DashboardError>;

    /// Sum and count per category (expenses) or source (income), in any order.
    async fn group_totals(
        &self,
        kind: RecordKind,
        user_id: UserId,
    ) -> Result<Vec<GroupTotal>, DashboardError>;

    /// Up to `limit` records, newest first.
    async fn recent(
        &self,
        kind: RecordKind,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Transaction>, DashboardError>;

    /// All records dated at or after `cutoff`, newest first.
    async fn since(
        &self,
        kind: RecordKind,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DashboardError>;
}
