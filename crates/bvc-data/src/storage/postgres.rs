//! PostgreSQL 시세 저장소.

use async_trait::async_trait;
use bvc_core::DatabaseConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{QuoteStore, StockRecord};
use crate::error::{DataError, Result};

/// 연결 풀을 생성합니다.
pub async fn connect_pool(config: &DatabaseConfig, url: &str) -> Result<PgPool> {
    info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url)
        .await
        .map_err(|e| DataError::ConnectionError(e.to_string()))?;

    info!("Database connection established");
    Ok(pool)
}

/// `stocks` 테이블 저장소.
#[derive(Clone)]
pub struct PgQuoteStore {
    pool: PgPool,
}

impl PgQuoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteStore for PgQuoteStore {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert_quotes(&self, records: &[StockRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let mut affected = 0usize;

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO stocks (
                    symbol, name, sector, price, change, volume, market_cap, statut,
                    cours_reference, ouverture, plus_haut, plus_bas, prix_achat, prix_vente,
                    quantite_achat, quantite_vente, nombre_transactions, last_updated
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, NOW())
                ON CONFLICT (symbol) DO UPDATE SET
                    name = EXCLUDED.name,
                    sector = EXCLUDED.sector,
                    price = EXCLUDED.price,
                    change = EXCLUDED.change,
                    volume = EXCLUDED.volume,
                    market_cap = EXCLUDED.market_cap,
                    statut = EXCLUDED.statut,
                    cours_reference = EXCLUDED.cours_reference,
                    ouverture = EXCLUDED.ouverture,
                    plus_haut = EXCLUDED.plus_haut,
                    plus_bas = EXCLUDED.plus_bas,
                    prix_achat = EXCLUDED.prix_achat,
                    prix_vente = EXCLUDED.prix_vente,
                    quantite_achat = EXCLUDED.quantite_achat,
                    quantite_vente = EXCLUDED.quantite_vente,
                    nombre_transactions = EXCLUDED.nombre_transactions,
                    last_updated = NOW()
                "#,
            )
            .bind(&record.symbol)
            .bind(&record.name)
            .bind(&record.sector)
            .bind(record.price)
            .bind(record.change)
            .bind(record.volume)
            .bind(record.market_cap)
            .bind(&record.statut)
            .bind(record.cours_reference)
            .bind(record.ouverture)
            .bind(record.plus_haut)
            .bind(record.plus_bas)
            .bind(record.prix_achat)
            .bind(record.prix_vente)
            .bind(record.quantite_achat)
            .bind(record.quantite_vente)
            .bind(record.nombre_transactions)
            .execute(&mut *tx)
            .await?;

            affected += result.rows_affected() as usize;
        }

        tx.commit().await?;
        debug!(affected, "Stocks upserted");
        Ok(affected)
    }
}
