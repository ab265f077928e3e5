//! `SeaORM` entities.

pub mod expenses;
pub mod incomes;
