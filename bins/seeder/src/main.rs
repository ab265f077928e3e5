//! Database seeder for Tally development and testing.
//!
//! Seeds income and expense records for a fixed demo user, spread over the
//! last three months, then prints an access token for that user so the
//! dashboard can be queried right away.
//!
//! Usage: cargo run --bin seeder

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use tally_db::entities::{expenses, incomes};
use tally_shared::{AppConfig, JwtConfig, JwtService};

/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);

/// (amount in cents, days ago, icon, category)
const EXPENSES: &[(i64, i64, Option<&str>, &str)] = &[
    (4_550, 0, Some("🛒"), "groceries"),
    (1_200, 1, Some("☕"), "food"),
    (3_800, 2, Some("🍜"), "food"),
    (2_500, 3, Some("🚌"), "transport"),
    (120_000, 5, Some("🏠"), "rent"),
    (8_999, 9, None, "utilities"),
    (1_500, 12, Some("☕"), "food"),
    (6_420, 17, Some("🛒"), "groceries"),
    (2_500, 24, Some("🚌"), "transport"),
    (15_000, 29, Some("🎬"), "entertainment"),
    (120_000, 35, Some("🏠"), "rent"),
    (7_310, 41, Some("🛒"), "groceries"),
    (9_450, 58, None, "utilities"),
    (120_000, 66, Some("🏠"), "rent"),
];

/// (amount in cents, days ago, icon, source)
const INCOMES: &[(i64, i64, Option<&str>, &str)] = &[
    (450_000, 1, Some("💼"), "salary"),
    (32_000, 8, Some("💻"), "freelance"),
    (1_875, 15, None, "interest"),
    (450_000, 31, Some("💼"), "salary"),
    (25_000, 47, Some("💻"), "freelance"),
    (450_000, 62, Some("💼"), "salary"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    println!("Connecting to database...");
    let db = tally_db::connect_with(&config.database).await?;

    let now = Utc::now();

    println!("Seeding expenses...");
    seed_expenses(&db, now).await?;

    println!("Seeding incomes...");
    seed_incomes(&db, now).await?;

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: 24 * 60,
    });
    let token = jwt_service.generate_access_token(DEMO_USER_ID)?;

    println!("Seeding complete!");
    println!("  Demo user: {DEMO_USER_ID}");
    println!("  Access token (24h): {token}");

    Ok(())
}

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

/// Seeds demo expenses unless the user already has some.
async fn seed_expenses(db: &DatabaseConnection, now: DateTime<Utc>) -> anyhow::Result<()> {
    let existing = expenses::Entity::find()
        .filter(expenses::Column::UserId.eq(DEMO_USER_ID))
        .count(db)
        .await?;
    if existing > 0 {
        println!("  Demo user already has {existing} expenses, skipping...");
        return Ok(());
    }

    let mut inserted = 0;
    for &(cents, days, icon, category) in EXPENSES {
        let date = days_ago(now, days);
        let expense = expenses::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(DEMO_USER_ID),
            amount: Set(Decimal::new(cents, 2)),
            date: Set(date.into()),
            icon: Set(icon.map(str::to_string)),
            category: Set(category.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        if let Err(e) = expense.insert(db).await {
            eprintln!("Failed to insert expense {category}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} expenses");
    Ok(())
}

/// Seeds demo incomes unless the user already has some.
async fn seed_incomes(db: &DatabaseConnection, now: DateTime<Utc>) -> anyhow::Result<()> {
    let existing = incomes::Entity::find()
        .filter(incomes::Column::UserId.eq(DEMO_USER_ID))
        .count(db)
        .await?;
    if existing > 0 {
        println!("  Demo user already has {existing} incomes, skipping...");
        return Ok(());
    }

    let mut inserted = 0;
    for &(cents, days, icon, source) in INCOMES {
        let date = days_ago(now, days);
        let income = incomes::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(DEMO_USER_ID),
            amount: Set(Decimal::new(cents, 2)),
            date: Set(date.into()),
            icon: Set(icon.map(str::to_string)),
            source: Set(source.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        if let Err(e) = income.insert(db).await {
            eprintln!("Failed to insert income {source}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} incomes");
    Ok(())
}
