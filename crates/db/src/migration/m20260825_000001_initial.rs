//! Initial database migration.
//!
//! Creates the wallet ledger: enums, wallets, transactions, notifications,
//! and the spot rate history published by the OTC desk.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: WALLETS
        // ============================================================
        db.execute_unprepared(WALLETS_SQL).await?;

        // ============================================================
        // PART 3: LEDGER TRANSACTIONS
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: NOTIFICATIONS
        // ============================================================
        db.execute_unprepared(NOTIFICATIONS_SQL).await?;

        // ============================================================
        // PART 5: SPOT RATES
        // ============================================================
        db.execute_unprepared(SPOT_RATES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Where a transaction entered the system
CREATE TYPE transfer_source AS ENUM ('fiat', 'crypto');

-- What the transaction does to the wallet
CREATE TYPE transfer_type AS ENUM (
    'deposit',
    'disbursement',
    'conversion'
);

-- Lifecycle status of a transaction
CREATE TYPE transfer_status AS ENUM (
    'pending',
    'success',
    'completed',
    'failed',
    'reversed'
);

-- Wallet currencies
CREATE TYPE currency_code AS ENUM ('NGN', 'USD');

-- Which side of the desk quote a rate belongs to
CREATE TYPE rate_side AS ENUM ('buy', 'sell');
";

const WALLETS_SQL: &str = r"
CREATE TABLE wallets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL UNIQUE,
    ngn_balance NUMERIC(20, 4) NOT NULL DEFAULT 0,
    usd_balance NUMERIC(20, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference VARCHAR(255) NOT NULL UNIQUE,
    idempotency_key VARCHAR(255),
    user_id UUID NOT NULL REFERENCES wallets(user_id) ON DELETE CASCADE,
    source transfer_source NOT NULL,
    transfer_type transfer_type NOT NULL,
    status transfer_status NOT NULL DEFAULT 'pending',
    amount NUMERIC(20, 4) NOT NULL,
    settlement_amount NUMERIC(20, 4) NOT NULL,
    total_fee NUMERIC(20, 4) NOT NULL DEFAULT 0,
    processing_fee NUMERIC(20, 4) NOT NULL DEFAULT 0,
    dollar_rate NUMERIC(20, 8),
    currency currency_code NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Redelivered deposit webhooks must map to the same row
CREATE UNIQUE INDEX idx_transactions_idempotency_key ON transactions(idempotency_key) WHERE idempotency_key IS NOT NULL;
CREATE INDEX idx_transactions_user_id ON transactions(user_id);
CREATE INDEX idx_transactions_status ON transactions(status);
";

const NOTIFICATIONS_SQL: &str = r"
CREATE TABLE notifications (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES wallets(user_id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(255) NOT NULL,
    read BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_notifications_reference ON notifications(reference);
CREATE INDEX idx_notifications_user_id ON notifications(user_id);
";

const SPOT_RATES_SQL: &str = r"
CREATE TABLE spot_rates (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    currency currency_code NOT NULL,
    side rate_side NOT NULL,
    rate NUMERIC(20, 8) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_spot_rates_lookup ON spot_rates(currency, side, created_at DESC);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS spot_rates CASCADE;
DROP TABLE IF EXISTS notifications CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS wallets CASCADE;

-- Drop enums
DROP TYPE IF EXISTS rate_side CASCADE;
DROP TYPE IF EXISTS currency_code CASCADE;
DROP TYPE IF EXISTS transfer_status CASCADE;
DROP TYPE IF EXISTS transfer_type CASCADE;
DROP TYPE IF EXISTS transfer_source CASCADE;
";
