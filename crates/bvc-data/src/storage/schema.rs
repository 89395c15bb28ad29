//! 데이터베이스 스키마.
//!
//! `init_schema`는 여러 번 실행해도 안전합니다 (`IF NOT EXISTS`).

use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// 스키마 DDL (실행 순서대로).
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        full_name TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stocks (
        id BIGSERIAL PRIMARY KEY,
        symbol TEXT UNIQUE NOT NULL,
        name TEXT NOT NULL,
        sector TEXT,
        price DOUBLE PRECISION,
        change DOUBLE PRECISION,
        volume BIGINT,
        market_cap DOUBLE PRECISION,
        statut TEXT,
        cours_reference DOUBLE PRECISION,
        ouverture DOUBLE PRECISION,
        plus_haut DOUBLE PRECISION,
        plus_bas DOUBLE PRECISION,
        prix_achat DOUBLE PRECISION,
        prix_vente DOUBLE PRECISION,
        quantite_achat BIGINT,
        quantite_vente BIGINT,
        nombre_transactions BIGINT,
        last_updated TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS watchlists (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        symbol TEXT NOT NULL,
        name TEXT,
        added_price NUMERIC(18, 4),
        added_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (user_id, symbol)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS portfolios (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        symbol TEXT NOT NULL,
        name TEXT,
        shares NUMERIC(18, 4) NOT NULL,
        buy_price NUMERIC(18, 4) NOT NULL,
        buy_date TIMESTAMPTZ,
        total_investment NUMERIC(24, 4) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS price_alerts (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        symbol TEXT NOT NULL,
        name TEXT,
        target_price NUMERIC(18, 4) NOT NULL,
        condition TEXT NOT NULL CHECK (condition IN ('above', 'below')),
        triggered BOOLEAN NOT NULL DEFAULT FALSE,
        created_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        triggered_date TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_watchlists_user ON watchlists (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_portfolios_user ON portfolios (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_price_alerts_user ON price_alerts (user_id, triggered)",
];

/// 스키마를 생성합니다.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    let mut tx = pool.begin().await?;
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(statements = SCHEMA_STATEMENTS.len(), "Database schema ready");
    Ok(())
}
