//! Income and expense record tables.
//!
//! Owners are referenced by user id only; user accounts live outside this
//! schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(INCOMES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS incomes CASCADE;")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS expenses CASCADE;")
            .await?;
        Ok(())
    }
}

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date TIMESTAMPTZ NOT NULL DEFAULT now(),
    icon TEXT,
    category VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Recent and rolling-window reads
CREATE INDEX idx_expenses_user_date ON expenses(user_id, date DESC);

-- Category breakdown
CREATE INDEX idx_expenses_user_category ON expenses(user_id, category);
";

const INCOMES_SQL: &str = r"
CREATE TABLE incomes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date TIMESTAMPTZ NOT NULL DEFAULT now(),
    icon TEXT,
    source VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Recent and rolling-window reads
CREATE INDEX idx_incomes_user_date ON incomes(user_id, date DESC);

-- Source breakdown
CREATE INDEX idx_incomes_user_source ON incomes(user_id, source);
";
