//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::{http::StatusCode, Json};
use bvc_core::CoreError;
use bvc_data::DataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Stock with symbol ZZZ not found",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "DB_ERROR", "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 에러 (상태 코드 + 본문).
pub type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// 상태 코드와 에러 코드로 API 에러를 만듭니다.
pub fn api_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
    (status, Json(ApiErrorResponse::new(code, message)))
}

/// 404 에러.
pub fn not_found(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "NOT_FOUND", message)
}

/// 400 에러.
pub fn bad_request(message: impl Into<String>) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
}

/// DB 미설정 시 503 에러.
pub fn db_unavailable() -> ApiError {
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "DB_UNAVAILABLE",
        "Database not available",
    )
}

/// sqlx 에러를 500 에러로 변환합니다. 원인은 로그에만 남깁니다.
pub fn db_error(context: &str, err: sqlx::Error) -> ApiError {
    error!(error = %err, "{}", context);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR", context.to_string())
}

/// 핵심 에러 → API 에러.
pub fn from_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::InvalidInput(msg) => bad_request(msg),
        CoreError::NotFound(msg) => not_found(msg),
        other => {
            error!(error = %other, "Internal error");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                other.to_string(),
            )
        }
    }
}

/// 데이터 파이프라인 에러 → API 에러.
///
/// 수집 실패는 502, DB 연결 실패는 503으로 노출됩니다.
pub fn from_data_error(err: DataError) -> ApiError {
    match err {
        DataError::NotFound(msg) => not_found(msg),
        DataError::ScraperFailure(msg) => {
            api_error(StatusCode::BAD_GATEWAY, "SCRAPER_FAILURE", msg)
        }
        DataError::ConnectionError(msg) => {
            api_error(StatusCode::SERVICE_UNAVAILABLE, "DB_UNAVAILABLE", msg)
        }
        other => {
            error!(error = %other, "Data pipeline error");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATA_ERROR",
                other.to_string(),
            )
        }
    }
}
