//! Dashboard data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_shared::types::{ExpenseId, IncomeId, UserId};

/// Which record collection a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Expense records, classified by category.
    Expense,
    /// Income records, classified by source.
    Income,
}

/// A single expense owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Record ID.
    pub id: ExpenseId,
    /// Owner.
    pub user_id: UserId,
    /// Amount spent; non-negative by convention.
    pub amount: Decimal,
    /// When the expense happened.
    pub date: DateTime<Utc>,
    /// Optional display icon.
    pub icon: Option<String>,
    /// Spending category.
    pub category: String,
}

/// A single income entry owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    /// Record ID.
    pub id: IncomeId,
    /// Owner.
    pub user_id: UserId,
    /// Amount received; non-negative by convention.
    pub amount: Decimal,
    /// When the income was received.
    pub date: DateTime<Utc>,
    /// Optional display icon.
    pub icon: Option<String>,
    /// Income source.
    pub source: String,
}

/// A record tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transaction {
    /// An expense.
    Expense(ExpenseRecord),
    /// An income entry.
    Income(IncomeRecord),
}

impl Transaction {
    /// Returns the record kind.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Expense(_) => RecordKind::Expense,
            Self::Income(_) => RecordKind::Income,
        }
    }

    /// Returns the untyped record ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Expense(e) => e.id.into_inner(),
            Self::Income(i) => i.id.into_inner(),
        }
    }

    /// Returns the owner.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        match self {
            Self::Expense(e) => e.user_id,
            Self::Income(i) => i.user_id,
        }
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Expense(e) => e.amount,
            Self::Income(i) => i.amount,
        }
    }

    /// Returns the record date.
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        match self {
            Self::Expense(e) => e.date,
            Self::Income(i) => i.date,
        }
    }

    /// Returns the icon, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        match self {
            Self::Expense(e) => e.icon.as_deref(),
            Self::Income(i) => i.icon.as_deref(),
        }
    }

    /// Returns the grouping key: category for expenses, source for income.
    #[must_use]
    pub fn group_key(&self) -> &str {
        match self {
            Self::Expense(e) => &e.category,
            Self::Income(i) => &i.source,
        }
    }
}

impl From<ExpenseRecord> for Transaction {
    fn from(record: ExpenseRecord) -> Self {
        Self::Expense(record)
    }
}

impl From<IncomeRecord> for Transaction {
    fn from(record: IncomeRecord) -> Self {
        Self::Income(record)
    }
}

/// Sum and count of one category or source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    /// Category (expenses) or source (income).
    pub key: String,
    /// Sum of amounts in the group.
    pub total: Decimal,
    /// Number of records in the group.
    pub count: u64,
}

/// Records inside a rolling window and their sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Sum of amounts in the window.
    pub total: Decimal,
    /// Every record in the window, newest first.
    pub transactions: Vec<Transaction>,
}

/// Dashboard summary for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Sum of all income.
    pub total_income: Decimal,
    /// Sum of all expenses.
    pub total_expense: Decimal,
    /// `total_income - total_expense`; may be negative.
    pub balance: Decimal,
    /// Expense groups, largest total first.
    pub expenses_by_category: Vec<GroupTotal>,
    /// Income groups, largest total first.
    pub income_by_source: Vec<GroupTotal>,
    /// Expenses inside the expense window.
    pub last_30_days_expenses: WindowSummary,
    /// Income inside the income window.
    pub last_60_days_income: WindowSummary,
    /// Newest records across both kinds.
    pub recent_transactions: Vec<Transaction>,
}
