//! 설정 관리.
//!
//! 기본값 → `config/default.toml`(선택) → `BVC__` 접두사 환경 변수 순서로 덮어씁니다.
//!
//! ```text
//! BVC__SERVER__PORT=8080
//! BVC__QUOTES__CACHE_TTL_SECS=30
//! BVC__QUOTES__CANDIDATES=a.csv,b.csv
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 시세 파이프라인 설정
    pub quotes: QuotesConfig,
    /// 스크래퍼 설정
    pub scraper: ScraperConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 연결 URL. 없으면 `DATABASE_URL` 환경 변수를 사용하고, 그것도 없으면 DB 기능을 끕니다.
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    /// 설정 파일 값 또는 `DATABASE_URL` 환경 변수.
    pub fn resolved_url(&self) -> Option<String> {
        self.url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 시세 파이프라인 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotesConfig {
    /// 원천 CSV 후보 경로 (우선순위 순서, 동일 수정 시각이면 앞쪽이 선택됨)
    pub candidates: Vec<PathBuf>,
    /// 스크래핑 결과를 기록할 경로
    pub output_path: PathBuf,
    /// 메모리 캐시 유효 시간 (초)
    pub cache_ttl_secs: u64,
    /// 읽기 경로에서 원천 파일이 오래되었으면 스크래퍼를 호출할지 여부
    pub auto_refresh: bool,
    /// 원천 파일이 오래되었다고 판단하는 기준 (초)
    pub refresh_interval_secs: u64,
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                PathBuf::from("bvc_prices_latest.csv"),
                PathBuf::from("bvc_prices_latest_new.csv"),
            ],
            output_path: PathBuf::from("bvc_prices_latest_new.csv"),
            cache_ttl_secs: 60,
            auto_refresh: false,
            refresh_interval_secs: 3600,
        }
    }
}

impl QuotesConfig {
    /// 캐시 TTL을 Duration으로 반환
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// 갱신 주기를 Duration으로 반환
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// 스크래퍼 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// 시세 페이지 URL
    pub url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: "https://www.casablanca-bourse.com/fr/live-market/marche-actions-groupement"
                .to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl ScraperConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다. 파일은 없어도 됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("BVC")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("quotes.candidates")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}
