//! TTL 기반 시세 캐시.
//!
//! 상태는 두 가지입니다.
//! - FRESH: 마지막 로드가 TTL 이내. 보관 중인 항목을 그대로 반환하고 I/O는 없음.
//! - STALE: TTL 경과, 로드 이력 없음, 또는 명시적 무효화 이후.
//!   (선택적으로 갱신 조정자 호출 후) 원천 파일을 다시 로드합니다.
//!
//! 로드 결과에 따른 대체:
//! - `Loaded` → `LIVE`
//! - `SourceMissing` → 내장 데모 데이터, `FALLBACK_MOCK`
//! - `SourceMalformed` → 빈 집합, `EMPTY` (오류 로그)
//!
//! 어떤 경우에도 호출자에게 오류가 전파되지 않습니다.
//!
//! 항목은 `Arc<CacheEntry>` 단위로 통째로 교체됩니다. 동시에 STALE 경로에
//! 들어온 요청은 단일 재로드 잠금에서 대기했다가, 먼저 끝난 재로드의 결과를
//! 함께 사용합니다.
//!
//! 재로드는 캐시가 소유한 별도 task에서 실행됩니다. 호출자 future가 취소되어도
//! (요청 타임아웃 등) 재로드는 끝까지 진행되어 항목이 저장됩니다.

use bvc_core::{Provenance, StockQuote};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::projector::mock::demo_quotes;
use crate::refresh::RefreshOrchestrator;
use crate::source::{load_quotes, LoadOutcome, SourceResolver};

/// 캐시 항목. 생성 후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub quotes: Vec<StockQuote>,
    pub source_timestamp: String,
    pub provenance: Provenance,
    pub loaded_at: DateTime<Utc>,
}

/// 캐시 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub reloads: u64,
}

/// 공유 항목 슬롯과 카운터.
struct EntrySlot {
    entry: RwLock<Option<Arc<CacheEntry>>>,
    reload_lock: Mutex<()>,
    hits: AtomicU64,
    reloads: AtomicU64,
}

/// 재로드 task로 옮겨 갈 수 있는 캐시 본체.
#[derive(Clone)]
struct CacheCore {
    resolver: Arc<dyn SourceResolver>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    refresher: Option<Arc<RefreshOrchestrator>>,
    slot: Arc<EntrySlot>,
}

/// 시세 캐시.
pub struct QuoteCache {
    core: CacheCore,
}

impl QuoteCache {
    pub fn new(resolver: Arc<dyn SourceResolver>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            core: CacheCore {
                resolver,
                clock,
                ttl,
                refresher: None,
                slot: Arc::new(EntrySlot {
                    entry: RwLock::new(None),
                    reload_lock: Mutex::new(()),
                    hits: AtomicU64::new(0),
                    reloads: AtomicU64::new(0),
                }),
            },
        }
    }

    /// 재로드 전에 원천 파일 신선도를 확인하고 필요하면 수집기를 호출하도록 합니다.
    pub fn with_auto_refresh(mut self, refresher: Arc<RefreshOrchestrator>) -> Self {
        self.core.refresher = Some(refresher);
        self
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.core.slot.hits.load(Ordering::Relaxed),
            reloads: self.core.slot.reloads.load(Ordering::Relaxed),
        }
    }

    /// 현재 보관 중인 항목 (신선도와 무관, I/O 없음).
    pub async fn peek(&self) -> Option<Arc<CacheEntry>> {
        self.core.slot.entry.read().await.clone()
    }

    /// 시세 집합을 반환합니다. 오류를 반환하지 않습니다.
    pub async fn get_quotes(&self) -> Arc<CacheEntry> {
        if let Some(entry) = self.core.fresh_entry().await {
            debug!(provenance = %entry.provenance, "Quote cache hit");
            self.core.record_hit();
            return entry;
        }

        let core = self.core.clone();
        match tokio::spawn(async move { core.reload_coalesced().await }).await {
            Ok(entry) => entry,
            Err(e) => {
                error!(error = %e, "Quote cache reload task failed, serving empty set");
                Arc::new(self.core.empty_entry())
            }
        }
    }

    /// 보관 중인 항목을 버립니다. 다음 조회는 경과 시간과 무관하게 STALE로 처리됩니다.
    ///
    /// 진행 중인 재로드가 있으면 끝날 때까지 기다린 뒤 비웁니다.
    pub async fn invalidate(&self) {
        let _reload = self.core.slot.reload_lock.lock().await;
        *self.core.slot.entry.write().await = None;
        debug!("Quote cache invalidated");
    }
}

impl CacheCore {
    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match (self.clock.now() - entry.loaded_at).to_std() {
            Ok(age) => age < self.ttl,
            // 시계가 뒤로 감
            Err(_) => false,
        }
    }

    async fn fresh_entry(&self) -> Option<Arc<CacheEntry>> {
        let guard = self.slot.entry.read().await;
        guard.as_ref().filter(|e| self.is_fresh(e)).cloned()
    }

    fn record_hit(&self) {
        self.slot.hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("bvc_quote_cache_hits_total").increment(1);
    }

    fn empty_entry(&self) -> CacheEntry {
        CacheEntry {
            quotes: Vec::new(),
            source_timestamp: self.clock.source_timestamp(),
            provenance: Provenance::Empty,
            loaded_at: self.clock.now(),
        }
    }

    async fn reload_coalesced(&self) -> Arc<CacheEntry> {
        let _reload = self.slot.reload_lock.lock().await;

        // 대기하는 동안 다른 요청이 재로드를 끝냈을 수 있음
        if let Some(entry) = self.fresh_entry().await {
            debug!("Quote cache reload coalesced");
            self.record_hit();
            return entry;
        }

        let entry = Arc::new(self.reload().await);
        *self.slot.entry.write().await = Some(entry.clone());

        self.slot.reloads.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("bvc_quote_cache_reloads_total", "provenance" => entry.provenance.as_str())
            .increment(1);
        info!(
            provenance = %entry.provenance,
            quotes = entry.quotes.len(),
            timestamp = %entry.source_timestamp,
            "Quote cache reloaded"
        );

        entry
    }

    async fn reload(&self) -> CacheEntry {
        if let Some(refresher) = &self.refresher {
            refresher.maybe_refresh().await;
        }

        let (quotes, source_timestamp, provenance) =
            match load_quotes(self.resolver.as_ref(), self.clock.as_ref()).await {
                LoadOutcome::Loaded(loaded) => {
                    (loaded.quotes, loaded.source_timestamp, Provenance::Live)
                }
                LoadOutcome::SourceMissing => {
                    warn!("No quote source file found, serving demonstration data");
                    (
                        demo_quotes(),
                        self.clock.source_timestamp(),
                        Provenance::FallbackMock,
                    )
                }
                LoadOutcome::SourceMalformed(e) => {
                    error!(error = %e, "Failed to process quote source, serving empty set");
                    (Vec::new(), self.clock.source_timestamp(), Provenance::Empty)
                }
            };

        CacheEntry {
            quotes,
            source_timestamp,
            provenance,
            loaded_at: self.clock.now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::Result;
    use crate::provider::QuoteScraper;
    use crate::refresh::tests::{scraped_row, FakeScraper};
    use crate::source::{CandidateFiles, RawQuoteRow, ResolvedSource};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::AtomicUsize;

    /// 호출 횟수를 세는 resolver.
    struct CountingResolver {
        inner: CandidateFiles,
        calls: AtomicUsize,
    }

    impl CountingResolver {
        fn new(paths: Vec<PathBuf>) -> Self {
            Self {
                inner: CandidateFiles::new(paths),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SourceResolver for CountingResolver {
        async fn resolve(&self) -> Result<ResolvedSource> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve().await
        }
    }

    fn write_source(path: &Path, timestamp: &str, price: &str) {
        std::fs::write(
            path,
            format!(
                "Instrument,Ticker,Dernier_Cours,Timestamp\nITISSALAT AL-MAGHRIB,IAM,\"{}\",{}\n",
                price, timestamp
            ),
        )
        .unwrap();
    }

    fn setup(dir: &Path) -> (Arc<CountingResolver>, Arc<ManualClock>, PathBuf) {
        let path = dir.join("bvc_prices_latest.csv");
        let resolver = Arc::new(CountingResolver::new(vec![
            path.clone(),
            dir.join("bvc_prices_latest_new.csv"),
        ]));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (resolver, clock, path)
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_without_io() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, path) = setup(dir.path());
        write_source(&path, "2025-01-06 10:00:00", "121,00");

        let cache = QuoteCache::new(resolver.clone(), clock.clone(), Duration::from_secs(60));
        let first = cache.get_quotes().await;
        assert_eq!(first.provenance, Provenance::Live);
        assert_eq!(first.source_timestamp, "2025-01-06 10:00:00");

        clock.advance(chrono::Duration::seconds(59));
        let second = cache.get_quotes().await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            serde_json::to_string(&first.quotes).unwrap(),
            serde_json::to_string(&second.quotes).unwrap()
        );
        assert_eq!(resolver.calls(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, reloads: 1 });
    }

    #[tokio::test]
    async fn test_reload_after_ttl_picks_up_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, path) = setup(dir.path());
        write_source(&path, "2025-01-06 10:00:00", "121,00");

        let cache = QuoteCache::new(resolver, clock.clone(), Duration::from_secs(60));
        assert_eq!(cache.get_quotes().await.source_timestamp, "2025-01-06 10:00:00");

        write_source(&path, "2025-01-06 11:00:00", "122,50");
        assert_eq!(cache.get_quotes().await.source_timestamp, "2025-01-06 10:00:00");

        clock.advance(chrono::Duration::seconds(60));
        let entry = cache.get_quotes().await;
        assert_eq!(entry.source_timestamp, "2025-01-06 11:00:00");
        assert_eq!(entry.quotes[0].price, 122.5);
    }

    #[tokio::test]
    async fn test_missing_source_falls_back_to_demo_set() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, _) = setup(dir.path());

        let cache = QuoteCache::new(resolver, clock, Duration::from_secs(60));
        let entry = cache.get_quotes().await;
        assert_eq!(entry.provenance, Provenance::FallbackMock);
        assert!(!entry.quotes.is_empty());
        assert_eq!(entry.quotes[0].symbol, "ATW");
    }

    #[tokio::test]
    async fn test_malformed_source_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, path) = setup(dir.path());
        std::fs::write(&path, "Ticker\nATW\n").unwrap();

        let cache = QuoteCache::new(resolver, clock, Duration::from_secs(60));
        let entry = cache.get_quotes().await;
        assert_eq!(entry.provenance, Provenance::Empty);
        assert!(entry.quotes.is_empty());
        assert!(!entry.source_timestamp.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, path) = setup(dir.path());
        write_source(&path, "2025-01-06 10:00:00", "121,00");

        let cache = QuoteCache::new(resolver.clone(), clock, Duration::from_secs(60));
        cache.get_quotes().await;
        write_source(&path, "2025-01-06 12:00:00", "120,00");

        cache.invalidate().await;
        assert!(cache.peek().await.is_none());

        let entry = cache.get_quotes().await;
        assert_eq!(entry.source_timestamp, "2025-01-06 12:00:00");
        assert_eq!(resolver.calls(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stale_reads_coalesce() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, path) = setup(dir.path());
        write_source(&path, "2025-01-06 10:00:00", "121,00");

        let cache = Arc::new(QuoteCache::new(
            resolver.clone(),
            clock,
            Duration::from_secs(60),
        ));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_quotes().await })
            })
            .collect();

        let mut entries = Vec::new();
        for handle in handles {
            entries.push(handle.await.unwrap());
        }

        assert_eq!(resolver.calls(), 1);
        assert_eq!(cache.stats().reloads, 1);
        assert!(entries.iter().all(|e| Arc::ptr_eq(e, &entries[0])));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_auto_refresh_runs_scraper_once() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, _) = setup(dir.path());
        let scraper = Arc::new(FakeScraper::returning(vec![scraped_row(
            "ITISSALAT AL-MAGHRIB",
            "119,90",
        )]));
        let refresher = Arc::new(RefreshOrchestrator::new(
            scraper.clone(),
            resolver.clone(),
            clock.clone(),
            dir.path().join("bvc_prices_latest_new.csv"),
            Duration::from_secs(3600),
        ));

        let cache = Arc::new(
            QuoteCache::new(resolver, clock, Duration::from_secs(60)).with_auto_refresh(refresher),
        );

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get_quotes().await })
            })
            .collect();
        for handle in handles {
            let entry = handle.await.unwrap();
            assert_eq!(entry.provenance, Provenance::Live);
            assert_eq!(entry.quotes[0].price, 119.9);
        }

        assert_eq!(scraper.calls(), 1);
    }

    /// 응답 전에 지연되는 수집기.
    struct SlowScraper {
        delay: Duration,
        rows: Vec<RawQuoteRow>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuoteScraper for SlowScraper {
        async fn fetch(&self) -> Result<Vec<RawQuoteRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(self.rows.clone())
        }
    }

    #[tokio::test]
    async fn test_reload_survives_cancelled_caller() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, clock, _) = setup(dir.path());
        let scraper = Arc::new(SlowScraper {
            delay: Duration::from_millis(300),
            rows: vec![scraped_row("ITISSALAT AL-MAGHRIB", "121,00")],
            calls: AtomicUsize::new(0),
        });
        let refresher = Arc::new(RefreshOrchestrator::new(
            scraper.clone(),
            resolver.clone(),
            clock.clone(),
            dir.path().join("bvc_prices_latest_new.csv"),
            Duration::from_secs(3600),
        ));
        let cache =
            QuoteCache::new(resolver, clock, Duration::from_secs(60)).with_auto_refresh(refresher);

        // 요청 타임아웃처럼 호출자를 중간에 취소
        let cancelled = tokio::time::timeout(Duration::from_millis(50), cache.get_quotes()).await;
        assert!(cancelled.is_err());

        let mut held = None;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            held = cache.peek().await;
            if held.is_some() {
                break;
            }
        }
        let held = held.expect("reload should complete after caller was cancelled");
        assert_eq!(held.provenance, Provenance::Live);
        assert_eq!(held.quotes[0].price, 121.0);

        let next = tokio::time::timeout(Duration::from_millis(50), cache.get_quotes())
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&next, &held));
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
    }
}
