//! 사용자 Repository

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;

/// 사용자 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    #[sqlx(default)]
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 새 사용자 입력
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// 사용자 Repository
pub struct UserRepository;

impl UserRepository {
    /// 사용자 생성. 이메일이 중복이면 고유 제약 위반 에러.
    pub async fn create(pool: &PgPool, input: &NewUser) -> Result<UserRecord, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, full_name)
            VALUES ($1, $2)
            RETURNING id, email, full_name, created_at
            "#,
        )
        .bind(input.email.trim())
        .bind(&input.full_name)
        .fetch_one(pool)
        .await
    }

    /// ID로 사용자 조회
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, full_name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
