//! 데이터베이스 스키마 초기화.

use sqlx::PgPool;

use crate::Result;

/// `stocks`와 사용자 테이블을 생성합니다. 이미 있으면 그대로 둡니다.
pub async fn init_db(pool: &PgPool) -> Result<()> {
    bvc_data::init_schema(pool).await?;
    tracing::info!("스키마 초기화 완료");
    Ok(())
}
