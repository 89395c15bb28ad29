//! 시장 페이지 수집 실행.

use std::sync::Arc;
use std::time::Instant;

use bvc_data::{
    BvcMarketScraper, CandidateFiles, PgQuoteStore, QuoteScraper, RefreshOrchestrator,
    SystemClock,
};
use sqlx::PgPool;

use crate::{CollectionStats, CollectorConfig, Result};

/// 설정으로 갱신 조정자를 구성합니다.
///
/// 풀이 주어지면 수집 결과를 `stocks` 테이블에도 upsert합니다.
pub fn build_orchestrator(
    config: &CollectorConfig,
    pool: Option<PgPool>,
) -> Result<RefreshOrchestrator> {
    let scraper: Arc<dyn QuoteScraper> = Arc::new(BvcMarketScraper::new(&config.scraper)?);
    let resolver = Arc::new(CandidateFiles::new([config.output_path.clone()]));

    let mut orchestrator = RefreshOrchestrator::new(
        scraper,
        resolver,
        Arc::new(SystemClock),
        config.output_path.clone(),
        config.daemon.interval(),
    );
    if let Some(pool) = pool {
        orchestrator = orchestrator.with_store(Arc::new(PgQuoteStore::new(pool)));
    }
    Ok(orchestrator)
}

/// 1회 수집을 실행합니다.
///
/// 수집 실패나 빈 결과면 에러를 반환하며 기존 원천 파일은 유지됩니다.
pub async fn run_scrape(orchestrator: &RefreshOrchestrator) -> Result<CollectionStats> {
    let start = Instant::now();
    let mut stats = CollectionStats::new();

    tracing::info!(output = %orchestrator.output_path().display(), "시세 수집 시작");

    match orchestrator.refresh_now().await {
        Ok(report) => {
            stats.record_success(&report);
            stats.elapsed = start.elapsed();
            Ok(stats)
        }
        Err(e) => {
            tracing::error!(error = %e, "시세 수집 실패");
            Err(e.into())
        }
    }
}
