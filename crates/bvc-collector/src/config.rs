//! 환경변수 기반 설정 모듈.

use bvc_core::{DatabaseConfig, ScraperConfig};
use std::path::PathBuf;
use std::time::Duration;

/// 기본 원천 파일 경로
pub const DEFAULT_OUTPUT_PATH: &str = "bvc_prices_latest_new.csv";

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터베이스 URL (없으면 CSV만 기록)
    pub database_url: Option<String>,
    /// DB 풀 설정
    pub database: DatabaseConfig,
    /// 시장 페이지 수집 설정
    pub scraper: ScraperConfig,
    /// 원천 CSV 출력 경로
    pub output_path: PathBuf,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// 데몬 모드 설정
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// 수집 주기 (분 단위)
    pub interval_minutes: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    ///
    /// | 변수 | 기본값 |
    /// |---|---|
    /// | `DATABASE_URL` | 없음 |
    /// | `DB_MAX_CONNECTIONS` | 5 |
    /// | `SCRAPER_URL` | 카사블랑카 증권거래소 주식 시세 페이지 |
    /// | `SCRAPER_TIMEOUT_SECS` | 30 |
    /// | `OUTPUT_PATH` | `bvc_prices_latest_new.csv` |
    /// | `DAEMON_INTERVAL_MINUTES` | 60 |
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_defaults = DatabaseConfig::default();
        let scraper_defaults = ScraperConfig::default();

        Self {
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            database: DatabaseConfig {
                url: None,
                max_connections: env_var_parse("DB_MAX_CONNECTIONS", db_defaults.max_connections),
                acquire_timeout_secs: db_defaults.acquire_timeout_secs,
            },
            scraper: ScraperConfig {
                url: std::env::var("SCRAPER_URL").unwrap_or(scraper_defaults.url),
                timeout_secs: env_var_parse("SCRAPER_TIMEOUT_SECS", scraper_defaults.timeout_secs),
                user_agent: scraper_defaults.user_agent,
            },
            output_path: std::env::var("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            daemon: DaemonConfig {
                interval_minutes: env_var_parse("DAEMON_INTERVAL_MINUTES", 60),
            },
        }
    }
}

impl DaemonConfig {
    /// 수집 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
