//! 원천 파일 로드.
//!
//! 실패를 예외로 전파하지 않고 `LoadOutcome` 변형으로 반환합니다.
//! 대체 데이터 선택은 호출자(캐시)가 이 값에 대해 분기하여 결정합니다.

use bvc_core::StockQuote;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::resolver::SourceResolver;
use super::table::{parse_table, QuoteTable};
use crate::clock::Clock;
use crate::error::{DataError, Result};
use crate::projector::project_rows;

/// 로드된 시세.
#[derive(Debug, Clone)]
pub struct LoadedQuotes {
    pub path: PathBuf,
    pub quotes: Vec<StockQuote>,
    pub source_timestamp: String,
}

/// 로드 결과.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(LoadedQuotes),
    /// 후보 파일이 하나도 없음
    SourceMissing,
    /// 파일은 있으나 읽기/해석 실패
    SourceMalformed(DataError),
}

/// 원천 파일을 읽고 파싱합니다.
pub async fn read_source(path: &Path) -> Result<QuoteTable> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_table(&content).map_err(|e| DataError::malformed(path, e.to_string()))
}

/// 현재 원천 파일을 선택하고, 읽고, 모든 행을 변환합니다.
pub async fn load_quotes(resolver: &dyn SourceResolver, clock: &dyn Clock) -> LoadOutcome {
    let source = match resolver.resolve().await {
        Ok(source) => source,
        Err(DataError::NoSourceAvailable { .. }) => return LoadOutcome::SourceMissing,
        Err(e) => return LoadOutcome::SourceMalformed(e),
    };

    let table = match read_source(&source.path).await {
        Ok(table) => table,
        // 선택과 읽기 사이에 파일이 사라진 경우
        Err(DataError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %source.path.display(), "Source vanished before read");
            return LoadOutcome::SourceMissing;
        }
        Err(DataError::Io(e)) => {
            return LoadOutcome::SourceMalformed(DataError::malformed(&source.path, e.to_string()))
        }
        Err(e) => return LoadOutcome::SourceMalformed(e),
    };

    let source_timestamp = table
        .timestamp
        .clone()
        .unwrap_or_else(|| clock.source_timestamp());
    let quotes = project_rows(&table.rows);

    info!(
        path = %source.path.display(),
        rows = table.rows.len(),
        quotes = quotes.len(),
        timestamp = %source_timestamp,
        "Quote source loaded"
    );

    LoadOutcome::Loaded(LoadedQuotes {
        path: source.path,
        quotes,
        source_timestamp,
    })
}
