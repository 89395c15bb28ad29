//! 원천 파일 선택.
//!
//! 후보 경로 중 존재하는 파일의 수정 시각이 가장 최근인 것을 고릅니다.
//! 수정 시각이 같으면 후보 목록에서 앞선 경로가 선택됩니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DataError, Result};

/// 선택된 원천 파일.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub modified: DateTime<Utc>,
}

/// 현재 원천 파일을 결정하는 전략.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// 후보가 하나도 없으면 `DataError::NoSourceAvailable`.
    async fn resolve(&self) -> Result<ResolvedSource>;
}

/// 고정된 후보 파일 목록.
#[derive(Debug, Clone)]
pub struct CandidateFiles {
    candidates: Vec<PathBuf>,
}

impl CandidateFiles {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

async fn modified_at(path: &Path) -> Result<Option<DateTime<Utc>>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Some(meta.modified()?.into())),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl SourceResolver for CandidateFiles {
    async fn resolve(&self) -> Result<ResolvedSource> {
        let mut best: Option<ResolvedSource> = None;

        for path in &self.candidates {
            let Some(modified) = modified_at(path).await? else {
                continue;
            };
            // 동일 시각이면 먼저 나온 후보 유지
            if best.as_ref().map_or(true, |b| modified > b.modified) {
                best = Some(ResolvedSource {
                    path: path.clone(),
                    modified,
                });
            }
        }

        match best {
            Some(source) => {
                debug!(path = %source.path.display(), modified = %source.modified, "Resolved quote source");
                Ok(source)
            }
            None => Err(DataError::NoSourceAvailable {
                candidates: self.candidates.clone(),
            }),
        }
    }
}
