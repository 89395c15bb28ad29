//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 여러 요청 간에 공유됩니다.
//! 시세 캐시는 전역 싱글턴이 아니라 여기서 소유하고 핸들러에 주입됩니다.

use bvc_data::{CacheEntry, QuoteCache, RefreshOrchestrator};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 시세 캐시 (TTL, 대체 데이터 경로 포함)
    pub cache: Arc<QuoteCache>,

    /// 수동 갱신용 조정자 (수집기 설정이 없으면 `None`)
    pub refresher: Option<Arc<RefreshOrchestrator>>,

    /// 데이터베이스 연결 풀 (관심종목/포트폴리오/알림)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 시세 캐시만으로 상태를 생성합니다.
    pub fn new(cache: Arc<QuoteCache>) -> Self {
        Self {
            cache,
            refresher: None,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 갱신 조정자 설정.
    pub fn with_refresher(mut self, refresher: Arc<RefreshOrchestrator>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// DB 풀 설정.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        if let Some(pool) = &self.db_pool {
            sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()
        } else {
            false
        }
    }

    /// 현재 캐시 기준 심볼별 시세.
    pub async fn current_prices(&self) -> PriceIndex {
        PriceIndex::from_entry(&*self.cache.get_quotes().await)
    }
}

/// 심볼(대문자) → 현재가.
///
/// 가격이 0 이하인 종목은 시세 없음으로 취급합니다.
#[derive(Debug, Clone, Default)]
pub struct PriceIndex {
    prices: HashMap<String, Decimal>,
}

impl PriceIndex {
    pub fn from_entry(entry: &CacheEntry) -> Self {
        let prices = entry
            .quotes
            .iter()
            .filter(|q| q.price > 0.0)
            .filter_map(|q| {
                Decimal::from_f64(q.price).map(|price| (q.symbol.to_uppercase(), price.round_dp(4)))
            })
            .collect();
        Self { prices }
    }

    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(&symbol.to_uppercase()).copied()
    }
}

/// 테스트용 AppState 생성.
///
/// 존재하지 않는 원천 파일을 가리키므로 캐시는 데모 시세를 제공합니다.
#[cfg(test)]
pub fn create_test_state() -> AppState {
    use bvc_data::{CandidateFiles, SystemClock};

    let resolver = Arc::new(CandidateFiles::new([
        "/nonexistent/bvc/bvc_prices_latest.csv",
    ]));
    let cache = QuoteCache::new(
        resolver,
        Arc::new(SystemClock),
        std::time::Duration::from_secs(60),
    );
    AppState::new(Arc::new(cache))
}
