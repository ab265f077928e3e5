//! Dashboard route.
//!
//! `GET /dashboard` returns the caller's income/expense summary.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiError, AppState, middleware::AuthUser};
use tally_core::dashboard::{DashboardReport, GroupTotal, Transaction, WindowSummary};

/// Creates the dashboard routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for the dashboard summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Sum of all income.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    /// Sum of all expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expense: Decimal,
    /// Income minus expenses.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    /// Expense breakdown.
    pub expenses_by_category: Vec<CategoryTotalResponse>,
    /// Income breakdown.
    pub income_by_source: Vec<SourceTotalResponse>,
    /// Expenses in the expense window.
    #[serde(rename = "last30DaysExpenses")]
    pub last_30_days_expenses: WindowResponse,
    /// Income in the income window.
    #[serde(rename = "last60DaysIncome")]
    pub last_60_days_income: WindowResponse,
    /// Newest records across both kinds.
    pub recent_transactions: Vec<TransactionResponse>,
}

/// One expense category.
#[derive(Debug, Serialize)]
pub struct CategoryTotalResponse {
    /// Category name.
    pub category: String,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of records.
    pub count: u64,
}

/// One income source.
#[derive(Debug, Serialize)]
pub struct SourceTotalResponse {
    /// Source name.
    pub source: String,
    /// Sum of amounts.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Number of records.
    pub count: u64,
}

/// Rolling window response.
#[derive(Debug, Serialize)]
pub struct WindowResponse {
    /// Sum of amounts in the window.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Records in the window, newest first.
    pub transactions: Vec<TransactionResponse>,
}

/// A record tagged with `type`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionResponse {
    /// An expense.
    Expense {
        /// Record ID.
        id: Uuid,
        /// Amount.
        #[serde(with = "rust_decimal::serde::float")]
        amount: Decimal,
        /// Record date.
        date: DateTime<Utc>,
        /// Icon, or null.
        icon: Option<String>,
        /// Category.
        category: String,
    },
    /// An income entry.
    Income {
        /// Record ID.
        id: Uuid,
        /// Amount.
        #[serde(with = "rust_decimal::serde::float")]
        amount: Decimal,
        /// Record date.
        date: DateTime<Utc>,
        /// Icon, or null.
        icon: Option<String>,
        /// Source.
        source: String,
    },
}

/// Blank icons are sent as null.
fn present(icon: Option<String>) -> Option<String> {
    icon.filter(|i| !i.is_empty())
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        match tx {
            Transaction::Expense(e) => Self::Expense {
                id: e.id.into_inner(),
                amount: e.amount,
                date: e.date,
                icon: present(e.icon),
                category: e.category,
            },
            Transaction::Income(i) => Self::Income {
                id: i.id.into_inner(),
                amount: i.amount,
                date: i.date,
                icon: present(i.icon),
                source: i.source,
            },
        }
    }
}

impl From<WindowSummary> for WindowResponse {
    fn from(window: WindowSummary) -> Self {
        Self {
            total: window.total,
            transactions: window.transactions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<GroupTotal> for CategoryTotalResponse {
    fn from(group: GroupTotal) -> Self {
        Self {
            category: group.key,
            total: group.total,
            count: group.count,
        }
    }
}

impl From<GroupTotal> for SourceTotalResponse {
    fn from(group: GroupTotal) -> Self {
        Self {
            source: group.key,
            total: group.total,
            count: group.count,
        }
    }
}

impl From<DashboardReport> for DashboardResponse {
    fn from(report: DashboardReport) -> Self {
        Self {
            total_income: report.total_income,
            total_expense: report.total_expense,
            balance: report.balance,
            expenses_by_category: report
                .expenses_by_category
                .into_iter()
                .map(Into::into)
                .collect(),
            income_by_source: report.income_by_source.into_iter().map(Into::into).collect(),
            last_30_days_expenses: report.last_30_days_expenses.into(),
            last_60_days_income: report.last_60_days_income.into(),
            recent_transactions: report
                .recent_transactions
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /dashboard
#[axum::debug_handler]
async fn get_dashboard(
    State(state): State<AppState>,
    auth_user: Option<AuthUser>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let report = state
        .dashboard
        .summarize(auth_user.map(|u| u.user_id()), Utc::now())
        .await?;

    Ok(Json(report.into()))
}
