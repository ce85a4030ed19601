//! Database seeder for Kobo development and testing.
//!
//! Seeds funded test wallets and a week of dollar spot rates for local
//! development and testing purposes.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::str::FromStr;
use uuid::Uuid;

use kobo_db::entities::{
    sea_orm_active_enums::{CurrencyCode, RateSide},
    spot_rates, wallets,
};

/// Test user IDs (consistent for all seeds)
const TEST_USER_IDS: [&str; 2] = [
    "00000000-0000-0000-0000-000000000001",
    "00000000-0000-0000-0000-000000000002",
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kobo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding test wallets...");
    seed_wallets(&db).await;

    println!("Seeding spot rates...");
    seed_spot_rates(&db).await;

    println!("Seeding complete!");
}

/// Seeds a funded wallet for each test user.
async fn seed_wallets(db: &DatabaseConnection) {
    for raw_id in TEST_USER_IDS {
        let user_id = Uuid::parse_str(raw_id).unwrap();

        // Check if the wallet already exists
        if wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Wallet for user {user_id} already exists, skipping...");
            continue;
        }

        let wallet = wallets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            ngn_balance: Set(Decimal::from(500_000)),
            usd_balance: Set(Decimal::from(250)),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = wallet.insert(db).await {
            eprintln!("Failed to insert wallet for {user_id}: {e}");
        } else {
            println!("  Created wallet for user {user_id}");
        }
    }
}

/// Seeds a week of dollar spot rates, both sides of the spread.
async fn seed_spot_rates(db: &DatabaseConnection) {
    // Naira-per-dollar quotes (approximate values for testing)
    let sides = [(RateSide::Buy, "1480.00"), (RateSide::Sell, "1505.00")];

    let mut inserted = 0;

    for day_offset in 0..7 {
        let quoted_at = Utc::now() - Duration::days(day_offset);

        for (side, base_rate) in &sides {
            // Add small daily variation (0.1% to simulate market movement)
            // Using Decimal for all calculations to avoid float arithmetic
            let variation_pct = if day_offset % 2 == 0 {
                Decimal::from(day_offset) * Decimal::from_str("0.001").unwrap()
            } else {
                Decimal::from(day_offset) * Decimal::from_str("-0.001").unwrap()
            };
            let variation = Decimal::ONE + variation_pct;
            let rate_value = Decimal::from_str(base_rate).unwrap() * variation;

            let spot_rate = spot_rates::ActiveModel {
                id: Set(Uuid::new_v4()),
                currency: Set(CurrencyCode::Usd),
                side: Set(side.clone()),
                rate: Set(rate_value.round_dp(8)),
                created_at: Set(quoted_at.into()),
            };

            if let Err(e) = spot_rate.insert(db).await {
                eprintln!("Failed to insert spot rate: {e}");
            } else {
                inserted += 1;
            }
        }
    }

    println!("  Inserted {inserted} spot rates (7 days x 2 sides)");
}
