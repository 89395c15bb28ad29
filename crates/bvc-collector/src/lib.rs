//! Standalone quote collector.
//!
//! 이 crate는 API 서버와 독립적으로 시세를 수집하는 바이너리를 제공합니다:
//! - 시장 페이지 수집 → 원천 CSV 기록 + `stocks` 테이블 upsert
//! - 주기 실행 데몬 모드
//! - 데이터베이스 스키마 초기화

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
