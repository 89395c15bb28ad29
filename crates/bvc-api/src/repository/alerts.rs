//! 가격 알림 Repository

use bvc_core::{AlertCondition, PendingAlert};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use utoipa::ToSchema;

/// 알림 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AlertRecord {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    #[sqlx(default)]
    pub name: Option<String>,
    pub target_price: Decimal,
    /// "above" | "below"
    pub condition: String,
    pub triggered: bool,
    pub created_date: DateTime<Utc>,
    #[sqlx(default)]
    pub triggered_date: Option<DateTime<Utc>>,
}

impl AlertRecord {
    /// 판정용 형태로 변환합니다. 알 수 없는 조건이면 `None`.
    pub fn to_pending(&self) -> Option<PendingAlert> {
        match self.condition.parse::<AlertCondition>() {
            Ok(condition) => Some(PendingAlert {
                id: self.id,
                symbol: self.symbol.clone(),
                target_price: self.target_price,
                condition,
                triggered: self.triggered,
            }),
            Err(e) => {
                warn!(alert_id = self.id, error = %e, "Skipping alert with unknown condition");
                None
            }
        }
    }
}

/// 새 알림 입력
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAlert {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub target_price: Decimal,
    pub condition: AlertCondition,
}

const ALERT_COLUMNS: &str =
    "id, user_id, symbol, name, target_price, condition, triggered, created_date, triggered_date";

/// 알림 Repository
pub struct AlertRepository;

impl AlertRepository {
    /// 사용자의 알림 조회 (최신 순)
    pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<AlertRecord>, sqlx::Error> {
        sqlx::query_as::<_, AlertRecord>(&format!(
            "SELECT {} FROM price_alerts WHERE user_id = $1 ORDER BY created_date DESC, id DESC",
            ALERT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 아직 발동되지 않은 알림 조회
    pub async fn list_pending(pool: &PgPool, user_id: i64) -> Result<Vec<AlertRecord>, sqlx::Error> {
        sqlx::query_as::<_, AlertRecord>(&format!(
            "SELECT {} FROM price_alerts WHERE user_id = $1 AND triggered = FALSE ORDER BY id",
            ALERT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 알림 생성
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        input: &NewAlert,
    ) -> Result<AlertRecord, sqlx::Error> {
        sqlx::query_as::<_, AlertRecord>(&format!(
            r#"
            INSERT INTO price_alerts (user_id, symbol, name, target_price, condition)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ALERT_COLUMNS
        ))
        .bind(user_id)
        .bind(&input.symbol)
        .bind(&input.name)
        .bind(input.target_price)
        .bind(input.condition.as_str())
        .fetch_one(pool)
        .await
    }

    /// 알림 삭제
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM price_alerts WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 알림을 발동 상태로 표시합니다. 이미 발동된 알림은 건드리지 않습니다.
    pub async fn mark_triggered(
        pool: &PgPool,
        user_id: i64,
        ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE price_alerts
            SET triggered = TRUE, triggered_date = NOW()
            WHERE user_id = $1 AND id = ANY($2) AND triggered = FALSE
            "#,
        )
        .bind(user_id)
        .bind(ids)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
