//! 원천 CSV 파일 기록.

use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::source::{write_table, RawQuoteRow};

/// 행 목록을 원천 파일로 기록합니다.
///
/// 같은 디렉터리의 임시 파일에 쓴 뒤 rename하므로, 읽는 쪽은
/// 이전 파일 또는 완성된 새 파일만 보게 됩니다.
pub async fn write_source_file(path: &Path, rows: &[RawQuoteRow], timestamp: &str) -> Result<()> {
    let content = write_table(rows, timestamp);

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&tmp, content.as_bytes()).await?;
    tokio::fs::rename(&tmp, path).await?;

    info!(path = %path.display(), rows = rows.len(), timestamp, "Source file written");
    Ok(())
}
