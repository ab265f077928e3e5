//! Dashboard repository: the Postgres-backed record store.
//!
//! Sums and group counts are computed in SQL; record lists are fetched
//! newest first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};
use tracing::warn;
use uuid::Uuid;

use tally_core::dashboard::{
    DashboardError, ExpenseRecord, GroupTotal, IncomeRecord, RecordKind, RecordStore, Transaction,
};
use tally_shared::types::{ExpenseId, IncomeId, UserId};

use crate::entities::{expenses, incomes};

/// Single-row sum result.
#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: Option<Decimal>,
}

/// One group of a category/source breakdown.
#[derive(Debug, FromQueryResult)]
struct GroupRow {
    key: String,
    total: Option<Decimal>,
    count: i64,
}

impl From<GroupRow> for GroupTotal {
    fn from(row: GroupRow) -> Self {
        Self {
            key: row.key,
            total: row.total.unwrap_or(Decimal::ZERO),
            count: u64::try_from(row.count).unwrap_or(0),
        }
    }
}

impl From<expenses::Model> for ExpenseRecord {
    fn from(model: expenses::Model) -> Self {
        Self {
            id: ExpenseId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            amount: model.amount,
            date: model.date.with_timezone(&Utc),
            icon: model.icon,
            category: model.category,
        }
    }
}

impl From<incomes::Model> for IncomeRecord {
    fn from(model: incomes::Model) -> Self {
        Self {
            id: IncomeId::from_uuid(model.id),
            user_id: UserId::from_uuid(model.user_id),
            amount: model.amount,
            date: model.date.with_timezone(&Utc),
            icon: model.icon,
            source: model.source,
        }
    }
}

fn store_error(err: DbErr) -> DashboardError {
    warn!(error = %err, "Dashboard query failed");
    DashboardError::Store(err.to_string())
}

/// Dashboard repository over the `expenses` and `incomes` tables.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sums `amount` over one owner's rows of `E`.
    async fn sum_amount<E>(
        &self,
        amount: E::Column,
        owner: E::Column,
        user_id: Uuid,
    ) -> Result<Decimal, DbErr>
    where
        E: EntityTrait,
    {
        let row = E::find()
            .select_only()
            .column_as(Expr::col(amount).sum(), "total")
            .filter(owner.eq(user_id))
            .into_model::<TotalRow>()
            .one(&self.db)
            .await?;

        Ok(row.and_then(|r| r.total).unwrap_or(Decimal::ZERO))
    }

    /// Sums and counts one owner's rows of `E`, grouped by `key`.
    async fn group_amounts<E>(
        &self,
        key: E::Column,
        amount: E::Column,
        owner: E::Column,
        user_id: Uuid,
    ) -> Result<Vec<GroupTotal>, DbErr>
    where
        E: EntityTrait,
    {
        let rows = E::find()
            .select_only()
            .column_as(key, "key")
            .column_as(Expr::col(amount).sum(), "total")
            .column_as(Expr::col(amount).count(), "count")
            .filter(owner.eq(user_id))
            .group_by(key)
            .into_model::<GroupRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(GroupTotal::from).collect())
    }

    /// Fetches expenses newest first, optionally bounded by date and count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_expenses(
        &self,
        user_id: UserId,
        cutoff: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<ExpenseRecord>, DbErr> {
        let mut query =
            expenses::Entity::find().filter(expenses::Column::UserId.eq(user_id.into_inner()));

        if let Some(cutoff) = cutoff {
            query = query.filter(expenses::Column::Date.gte(cutoff));
        }

        let rows = query
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(ExpenseRecord::from).collect())
    }

    /// Fetches income newest first, optionally bounded by date and count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_incomes(
        &self,
        user_id: UserId,
        cutoff: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<IncomeRecord>, DbErr> {
        let mut query =
            incomes::Entity::find().filter(incomes::Column::UserId.eq(user_id.into_inner()));

        if let Some(cutoff) = cutoff {
            query = query.filter(incomes::Column::Date.gte(cutoff));
        }

        let rows = query
            .order_by_desc(incomes::Column::Date)
            .order_by_desc(incomes::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(IncomeRecord::from).collect())
    }

    async fn find_records(
        &self,
        kind: RecordKind,
        user_id: UserId,
        cutoff: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<Transaction>, DbErr> {
        Ok(match kind {
            RecordKind::Expense => self
                .find_expenses(user_id, cutoff, limit)
                .await?
                .into_iter()
                .map(Transaction::from)
                .collect(),
            RecordKind::Income => self
                .find_incomes(user_id, cutoff, limit)
                .await?
                .into_iter()
                .map(Transaction::from)
                .collect(),
        })
    }
}

#[async_trait]
impl RecordStore for DashboardRepository {
    async fn total(&self, kind: RecordKind, user_id: UserId) -> Result<Decimal, DashboardError> {
        let user_id = user_id.into_inner();
        let result = match kind {
            RecordKind::Expense => {
                self.sum_amount::<expenses::Entity>(
                    expenses::Column::Amount,
                    expenses::Column::UserId,
                    user_id,
                )
                .await
            }
            RecordKind::Income => {
                self.sum_amount::<incomes::Entity>(
                    incomes::Column::Amount,
                    incomes::Column::UserId,
                    user_id,
                )
                .await
            }
        };
        result.map_err(store_error)
    }

    async fn group_totals(
        &self,
        kind: RecordKind,
        user_id: UserId,
    ) -> Result<Vec<GroupTotal>, DashboardError> {
        let user_id = user_id.into_inner();
        let result = match kind {
            RecordKind::Expense => {
                self.group_amounts::<expenses::Entity>(
                    expenses::Column::Category,
                    expenses::Column::Amount,
                    expenses::Column::UserId,
                    user_id,
                )
                .await
            }
            RecordKind::Income => {
                self.group_amounts::<incomes::Entity>(
                    incomes::Column::Source,
                    incomes::Column::Amount,
                    incomes::Column::UserId,
                    user_id,
                )
                .await
            }
        };
        result.map_err(store_error)
    }

    async fn recent(
        &self,
        kind: RecordKind,
        user_id: UserId,
        limit: u64,
    ) -> Result<Vec<Transaction>, DashboardError> {
        self.find_records(kind, user_id, None, Some(limit))
            .await
            .map_err(store_error)
    }

    async fn since(
        &self,
        kind: RecordKind,
        user_id: UserId,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, DashboardError> {
        self.find_records(kind, user_id, Some(cutoff), None)
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod tests;
