//! 시세 데이터 파이프라인.
//!
//! 이 crate는 다음을 제공합니다:
//! - 원천 CSV 테이블 읽기/쓰기와 최신 원천 파일 선택
//! - 원천 행 → `StockQuote` 변환 (숫자 정규화, 섹터, 시가총액 라벨)
//! - TTL 기반 시세 캐시와 대체 데이터 경로
//! - 외부 수집기 호출 및 파일/DB 기록을 담당하는 갱신 조정자
//! - PostgreSQL 저장소와 스키마

pub mod cache;
pub mod clock;
pub mod error;
pub mod projector;
pub mod provider;
pub mod refresh;
pub mod source;
pub mod storage;

pub use error::{DataError, Result};

pub use cache::{CacheEntry, CacheStats, QuoteCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use projector::{project, project_rows, sector_for};
pub use provider::{BvcMarketScraper, QuoteScraper};
pub use refresh::{RefreshOrchestrator, RefreshReport};
pub use source::{
    load_quotes, CandidateFiles, LoadOutcome, NormalizedRow, RawQuoteRow, SourceColumn,
    SourceResolver,
};
pub use storage::{connect_pool, init_schema, PgQuoteStore, QuoteStore, StockRecord};
