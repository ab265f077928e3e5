//! Dashboard summary service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use tally_shared::{DashboardConfig, types::UserId};

use super::error::DashboardError;
use super::store::RecordStore;
use super::types::{DashboardReport, GroupTotal, RecordKind, Transaction, WindowSummary};

/// Builds dashboard reports from a [`RecordStore`].
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
    config: DashboardConfig,
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DashboardService {
    /// Creates a new dashboard service.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    /// Builds the summary for `user_id` as seen at `now`.
    ///
    /// All store reads run concurrently; the first failure aborts the whole
    /// summary.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Unauthenticated` without touching the store
    /// when `user_id` is `None`, and `DashboardError::Store` if any read fails.
    pub async fn summarize(
        &self,
        user_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> Result<DashboardReport, DashboardError> {
        let user_id = user_id.ok_or(DashboardError::Unauthenticated)?;
        let store = self.store.as_ref();
        let limit = self.config.recent_limit;
        let expense_cutoff = window_start(now, self.config.expense_window_days)?;
        let income_cutoff = window_start(now, self.config.income_window_days)?;

        let (
            total_income,
            total_expense,
            expense_groups,
            income_groups,
            recent_expenses,
            recent_incomes,
            windowed_expenses,
            windowed_incomes,
        ) = tokio::try_join!(
            store.total(RecordKind::Income, user_id),
            store.total(RecordKind::Expense, user_id),
            store.group_totals(RecordKind::Expense, user_id),
            store.group_totals(RecordKind::Income, user_id),
            store.recent(RecordKind::Expense, user_id, limit),
            store.recent(RecordKind::Income, user_id, limit),
            store.since(RecordKind::Expense, user_id, expense_cutoff),
            store.since(RecordKind::Income, user_id, income_cutoff),
        )?;

        let recent_transactions = merge_recent(recent_expenses, recent_incomes, limit);

        debug!(
            user_id = %user_id,
            expense_groups = expense_groups.len(),
            income_groups = income_groups.len(),
            recent = recent_transactions.len(),
            "Dashboard summary assembled"
        );

        Ok(DashboardReport {
            total_income,
            total_expense,
            balance: total_income - total_expense,
            expenses_by_category: rank_groups(expense_groups),
            income_by_source: rank_groups(income_groups),
            last_30_days_expenses: window_summary(windowed_expenses),
            last_60_days_income: window_summary(windowed_incomes),
            recent_transactions,
        })
    }
}

/// Returns the earliest date inside a `days`-long window ending at `now`.
///
/// # Errors
///
/// Returns `DashboardError::Window` for non-positive windows and for windows
/// reaching past the earliest representable date.
pub fn window_start(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, DashboardError> {
    if days <= 0 {
        return Err(DashboardError::Window(days));
    }
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .ok_or(DashboardError::Window(days))
}

/// Orders groups by total descending, then by key ascending.
#[must_use]
pub fn rank_groups(mut groups: Vec<GroupTotal>) -> Vec<GroupTotal> {
    groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    groups
}

/// Merges per-kind recent lists into one list of at most `limit` records.
///
/// Each input is capped per kind before merging, so the result is the newest
/// `limit` of the capped lists rather than a global ranking. Records with
/// equal dates keep expense-then-income order.
#[must_use]
pub fn merge_recent(
    expenses: Vec<Transaction>,
    incomes: Vec<Transaction>,
    limit: u64,
) -> Vec<Transaction> {
    let mut merged = expenses;
    merged.extend(incomes);
    merged.sort_by(|a, b| b.date().cmp(&a.date()));
    merged.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    merged
}

/// Sums a window's records and orders them newest first.
#[must_use]
pub fn window_summary(mut transactions: Vec<Transaction>) -> WindowSummary {
    transactions.sort_by(|a, b| b.date().cmp(&a.date()));
    let total: Decimal = transactions.iter().map(Transaction::amount).sum();
    WindowSummary {
        total,
        transactions,
    }
}
