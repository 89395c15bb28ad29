//! 데이터 모듈 오류 타입.

use std::path::PathBuf;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 후보 원천 파일이 하나도 존재하지 않음
    #[error("No source file available among {} candidate(s)", .candidates.len())]
    NoSourceAvailable { candidates: Vec<PathBuf> },

    /// 원천 파일은 있으나 읽거나 해석할 수 없음
    #[error("Malformed source {path}: {reason}")]
    MalformedSource { path: PathBuf, reason: String },

    /// 외부 스크래퍼 호출 실패
    #[error("Scraper failure: {0}")]
    ScraperFailure(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Database error: {0}")]
    Database(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DataError {
    /// 원천 파일 형식 오류를 생성합니다.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DataError::MalformedSource {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".to_string()),
            sqlx::Error::PoolTimedOut => {
                DataError::ConnectionError("Connection pool exhausted".to_string())
            }
            sqlx::Error::Database(db_err) => DataError::Database(db_err.message().to_string()),
            _ => DataError::Database(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::ScraperFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
