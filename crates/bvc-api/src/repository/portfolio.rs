//! Portfolio Repository
//!
//! 사용자 보유 종목(매수 기록)을 저장합니다. 평가는 `bvc_core::value_portfolio`가 담당합니다.

use bvc_core::Holding;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

/// 보유 종목 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HoldingRecord {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    #[sqlx(default)]
    pub name: Option<String>,
    pub shares: Decimal,
    pub buy_price: Decimal,
    #[sqlx(default)]
    pub buy_date: Option<DateTime<Utc>>,
    pub total_investment: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&HoldingRecord> for Holding {
    fn from(record: &HoldingRecord) -> Self {
        Holding {
            symbol: record.symbol.clone(),
            shares: record.shares,
            buy_price: record.buy_price,
        }
    }
}

/// 새 보유 종목 입력
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewHolding {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub shares: Decimal,
    pub buy_price: Decimal,
    #[serde(default)]
    pub buy_date: Option<DateTime<Utc>>,
}

impl NewHolding {
    /// 수량과 매수가는 양수여야 합니다.
    pub fn validate(&self) -> Result<(), String> {
        if self.shares <= Decimal::ZERO {
            return Err("shares must be positive".to_string());
        }
        if self.buy_price <= Decimal::ZERO {
            return Err("buy_price must be positive".to_string());
        }
        Ok(())
    }
}

/// Portfolio Repository
pub struct PortfolioRepository;

impl PortfolioRepository {
    /// 사용자의 보유 종목 조회
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<HoldingRecord>, sqlx::Error> {
        sqlx::query_as::<_, HoldingRecord>(
            r#"
            SELECT id, user_id, symbol, name, shares, buy_price, buy_date,
                   total_investment, created_at
            FROM portfolios
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 보유 종목 추가. 투자 원금은 수량 × 매수가로 저장됩니다.
    pub async fn add(
        pool: &PgPool,
        user_id: i64,
        input: &NewHolding,
    ) -> Result<HoldingRecord, sqlx::Error> {
        let total_investment = input.shares * input.buy_price;

        sqlx::query_as::<_, HoldingRecord>(
            r#"
            INSERT INTO portfolios (user_id, symbol, name, shares, buy_price, buy_date, total_investment)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7)
            RETURNING id, user_id, symbol, name, shares, buy_price, buy_date,
                      total_investment, created_at
            "#,
        )
        .bind(user_id)
        .bind(&input.symbol)
        .bind(&input.name)
        .bind(input.shares)
        .bind(input.buy_price)
        .bind(input.buy_date)
        .bind(total_investment)
        .fetch_one(pool)
        .await
    }

    /// 보유 종목 삭제
    pub async fn remove(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM portfolios WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
