//! 시세 캐시.
//!
//! - `QuoteCache`: TTL 기반 시세 집합 캐시 (원천 파일 → 데모 데이터 → 빈 집합 순서로 대체)

pub mod quote_cache;

pub use quote_cache::{CacheEntry, CacheStats, QuoteCache};
