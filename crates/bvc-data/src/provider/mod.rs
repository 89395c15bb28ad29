//! 외부 시세 수집기.

pub mod bvc;

use async_trait::async_trait;

use crate::error::Result;
use crate::source::RawQuoteRow;

pub use bvc::{parse_market_page, BvcMarketScraper};

/// 원천 행을 만들어 내는 외부 수집기.
///
/// 빈 결과는 오류가 아니라 "현재 데이터 없음"을 뜻합니다.
#[async_trait]
pub trait QuoteScraper: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawQuoteRow>>;
}
