//! 원천 데이터 갱신.
//!
//! 원천 파일이 충분히 오래되었으면 외부 수집기를 호출하고, 결과를
//! 새 원천 파일과 `stocks` 테이블에 각각 기록합니다. 두 기록은 서로
//! 독립적이어서 한쪽 실패가 다른 쪽 결과를 무르지 않습니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::error::{DataError, Result};
use crate::provider::QuoteScraper;
use crate::source::{NormalizedRow, SourceResolver};
use crate::storage::{write_source_file, QuoteStore, StockRecord};

/// 한 번의 갱신 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// 수집된 행 수
    pub rows: usize,
    /// 원천 파일 기록 성공 여부
    pub file_written: bool,
    /// DB에 반영된 행 수 (저장소가 없거나 실패하면 `None`)
    pub stored: Option<usize>,
    /// 기록된 타임스탬프
    pub timestamp: String,
}

/// 갱신 조정자.
pub struct RefreshOrchestrator {
    scraper: Arc<dyn QuoteScraper>,
    store: Option<Arc<dyn QuoteStore>>,
    resolver: Arc<dyn SourceResolver>,
    clock: Arc<dyn Clock>,
    output_path: PathBuf,
    interval: Duration,
}

impl RefreshOrchestrator {
    pub fn new(
        scraper: Arc<dyn QuoteScraper>,
        resolver: Arc<dyn SourceResolver>,
        clock: Arc<dyn Clock>,
        output_path: impl Into<PathBuf>,
        interval: Duration,
    ) -> Self {
        Self {
            scraper,
            store: None,
            resolver,
            clock,
            output_path: output_path.into(),
            interval,
        }
    }

    /// DB 저장소를 설정합니다.
    pub fn with_store(mut self, store: Arc<dyn QuoteStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// 원천 파일이 갱신 주기보다 오래되었는지 확인합니다.
    ///
    /// 원천 파일이 없으면 항상 오래된 것으로 봅니다.
    pub async fn is_stale(&self) -> bool {
        match self.resolver.resolve().await {
            Ok(source) => match (self.clock.now() - source.modified).to_std() {
                Ok(age) => age > self.interval,
                // 수정 시각이 미래
                Err(_) => false,
            },
            Err(DataError::NoSourceAvailable { .. }) => true,
            Err(e) => {
                warn!(error = %e, "Could not inspect source files, treating as stale");
                true
            }
        }
    }

    /// 오래되었으면 갱신합니다.
    ///
    /// 갱신을 시도했고 수집기가 비어 있지 않은 결과를 반환했으면 `true`.
    pub async fn maybe_refresh(&self) -> bool {
        if !self.is_stale().await {
            return false;
        }
        self.refresh_now().await.is_ok()
    }

    /// 신선도와 관계없이 즉시 갱신합니다.
    ///
    /// 수집 실패나 빈 결과는 `DataError::ScraperFailure`이며 기존 원천 파일은 그대로 남습니다.
    pub async fn refresh_now(&self) -> Result<RefreshReport> {
        let rows = match self.scraper.fetch().await {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => {
                warn!("Scraper returned no rows, keeping existing source files");
                metrics::counter!("bvc_refresh_total", "outcome" => "empty").increment(1);
                return Err(DataError::ScraperFailure("no rows returned".to_string()));
            }
            Err(e) => {
                warn!(error = %e, "Scraper failed, keeping existing source files");
                metrics::counter!("bvc_refresh_total", "outcome" => "failed").increment(1);
                return Err(match e {
                    DataError::ScraperFailure(_) => e,
                    other => DataError::ScraperFailure(other.to_string()),
                });
            }
        };

        let timestamp = self.clock.source_timestamp();

        let file_written = match write_source_file(&self.output_path, &rows, &timestamp).await {
            Ok(()) => true,
            Err(e) => {
                error!(path = %self.output_path.display(), error = %e, "Failed to write source file");
                false
            }
        };

        let stored = match &self.store {
            Some(store) => {
                let records: Vec<StockRecord> = rows
                    .iter()
                    .filter_map(NormalizedRow::from_raw)
                    .map(|row| StockRecord::from(&row))
                    .collect();
                match store.upsert_quotes(&records).await {
                    Ok(n) => Some(n),
                    Err(e) => {
                        error!(error = %e, "Failed to persist quotes");
                        None
                    }
                }
            }
            None => None,
        };

        metrics::counter!("bvc_refresh_total", "outcome" => "success").increment(1);
        info!(rows = rows.len(), file_written, stored = ?stored, %timestamp, "Quote refresh completed");

        Ok(RefreshReport {
            rows: rows.len(),
            file_written,
            stored,
            timestamp,
        })
    }
}
