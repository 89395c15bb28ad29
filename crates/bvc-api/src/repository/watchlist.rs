//! Watchlist Repository
//!
//! 사용자별 관심종목 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

/// 관심종목 아이템 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WatchlistItemRecord {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    #[sqlx(default)]
    pub name: Option<String>,
    /// 추가 시점 가격
    #[sqlx(default)]
    pub added_price: Option<Decimal>,
    pub added_date: DateTime<Utc>,
}

/// 새 관심종목 아이템 입력
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewWatchlistItem {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    /// 생략하면 현재 시세로 채워집니다.
    #[serde(default)]
    pub added_price: Option<Decimal>,
}

/// Watchlist Repository
pub struct WatchlistRepository;

impl WatchlistRepository {
    /// 사용자의 관심종목 조회 (추가 순)
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<WatchlistItemRecord>, sqlx::Error> {
        sqlx::query_as::<_, WatchlistItemRecord>(
            r#"
            SELECT id, user_id, symbol, name, added_price, added_date
            FROM watchlists
            WHERE user_id = $1
            ORDER BY added_date, id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 아이템 추가.
    ///
    /// 이미 있는 심볼이면 `None`.
    pub async fn add(
        pool: &PgPool,
        user_id: i64,
        input: &NewWatchlistItem,
    ) -> Result<Option<WatchlistItemRecord>, sqlx::Error> {
        sqlx::query_as::<_, WatchlistItemRecord>(
            r#"
            INSERT INTO watchlists (user_id, symbol, name, added_price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, symbol) DO NOTHING
            RETURNING id, user_id, symbol, name, added_price, added_date
            "#,
        )
        .bind(user_id)
        .bind(&input.symbol)
        .bind(&input.name)
        .bind(input.added_price)
        .fetch_optional(pool)
        .await
    }

    /// 아이템 삭제
    pub async fn remove(pool: &PgPool, user_id: i64, symbol: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM watchlists WHERE user_id = $1 AND symbol = $2")
            .bind(user_id)
            .bind(symbol)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
