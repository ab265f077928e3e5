//! Dashboard summary over a user's income and expense records.
//!
//! This module provides:
//! - Record types (`ExpenseRecord`, `IncomeRecord`, `Transaction`)
//! - The `RecordStore` seam and an in-memory implementation
//! - `DashboardService`, which assembles a `DashboardReport`

pub mod error;
pub mod memory;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::DashboardError;
pub use memory::InMemoryStore;
pub use service::DashboardService;
pub use store::RecordStore;
pub use types::*;
