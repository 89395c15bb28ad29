//! 시세 서비스의 공통 에러 타입.
//!
//! 데이터 파이프라인 밖(설정, 입력 검증, 조회)에서 사용되는 에러를 정의합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 호출자에게 4xx로 노출되어야 하는 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::InvalidInput(_) | CoreError::NotFound(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(CoreError::NotFound("ZZZ".to_string()).is_client_error());
        assert!(CoreError::InvalidInput("bad symbol".to_string()).is_client_error());
        assert!(!CoreError::Config("missing".to_string()).is_client_error());
    }
}
