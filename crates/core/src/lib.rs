//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types and calculations live here; storage is reached through the
//! [`dashboard::RecordStore`] trait.
//!
//! # Modules
//!
//! - `dashboard` - Income/expense records and the dashboard summary

pub mod dashboard;
