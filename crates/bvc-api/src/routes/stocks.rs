//! 시세 조회 API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/stocks` - 전체 시세와 섹터 목록
//! - `GET /api/v1/stocks/{symbol}` - 심볼 또는 회사명으로 단일 시세 조회
//! - `POST /api/v1/stocks/refresh` - 수집기를 즉시 실행하고 캐시 무효화
//!
//! 목록 조회는 실패하지 않습니다. 원천 파일이 없거나 손상되었으면
//! `source`가 `FALLBACK_MOCK` 또는 `EMPTY`인 정상 응답을 돌려줍니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bvc_core::{find_quote, sorted_sectors, validate_symbol_query, Provenance, StockQuote};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;

use crate::error::{api_error, from_core_error, from_data_error, not_found, ApiResult};
use crate::metrics::set_cached_quotes;
use crate::state::AppState;

/// 시세 목록 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StocksListResponse {
    /// 항상 "success"
    pub status: String,
    /// 원천 데이터 시각 (`%Y-%m-%d %H:%M:%S`)
    pub timestamp: String,
    /// 시세 집합의 출처
    pub source: Provenance,
    pub stocks: Vec<StockQuote>,
    /// 정렬된 고유 섹터 목록
    pub sectors: Vec<String>,
}

/// 단일 시세 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockDetailResponse {
    pub status: String,
    pub timestamp: String,
    pub source: Provenance,
    pub stock: StockQuote,
}

/// 수동 갱신 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub status: String,
    /// 수집된 행 수
    pub rows: usize,
    /// 원천 파일 기록 여부
    pub file_written: bool,
    /// DB에 반영된 행 수
    pub stored: Option<usize>,
    /// 새 원천 데이터 시각
    pub timestamp: String,
}

/// GET /api/v1/stocks - 전체 시세 조회
#[utoipa::path(
    get,
    path = "/api/v1/stocks",
    responses((status = 200, description = "시세 목록", body = StocksListResponse)),
    tag = "stocks"
)]
pub async fn list_stocks(State(state): State<Arc<AppState>>) -> Json<StocksListResponse> {
    let entry = state.cache.get_quotes().await;
    debug!(count = entry.quotes.len(), source = %entry.provenance, "Serving quote list");
    set_cached_quotes(entry.provenance.as_str(), entry.quotes.len());

    Json(StocksListResponse {
        status: "success".to_string(),
        timestamp: entry.source_timestamp.clone(),
        source: entry.provenance,
        sectors: sorted_sectors(&entry.quotes),
        stocks: entry.quotes.clone(),
    })
}

/// GET /api/v1/stocks/{symbol} - 단일 시세 조회
///
/// 심볼/회사명 완전 일치(대소문자 무시)를 먼저 찾고, 없으면 회사명 부분 일치.
#[utoipa::path(
    get,
    path = "/api/v1/stocks/{symbol}",
    params(("symbol" = String, Path, description = "심볼 또는 회사명 (영숫자, 공백, '-', '.', 최대 50자)")),
    responses(
        (status = 200, description = "시세", body = StockDetailResponse),
        (status = 400, description = "잘못된 심볼 형식", body = crate::error::ApiErrorResponse),
        (status = 404, description = "종목 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "stocks"
)]
pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<StockDetailResponse>> {
    validate_symbol_query(&symbol).map_err(from_core_error)?;

    let entry = state.cache.get_quotes().await;
    let stock = find_quote(&entry.quotes, &symbol)
        .cloned()
        .ok_or_else(|| not_found(format!("Stock with symbol {} not found", symbol)))?;

    Ok(Json(StockDetailResponse {
        status: "success".to_string(),
        timestamp: entry.source_timestamp.clone(),
        source: entry.provenance,
        stock,
    }))
}

/// POST /api/v1/stocks/refresh - 즉시 갱신
///
/// 수집 실패 시 502이며 기존 원천 파일과 캐시는 그대로 유지됩니다.
/// 갱신과 캐시 무효화는 별도 task에서 실행되어 요청이 타임아웃으로 취소되어도 끝까지 진행됩니다.
#[utoipa::path(
    post,
    path = "/api/v1/stocks/refresh",
    responses(
        (status = 200, description = "갱신 완료", body = RefreshResponse),
        (status = 502, description = "수집 실패", body = crate::error::ApiErrorResponse),
        (status = 503, description = "갱신 미설정", body = crate::error::ApiErrorResponse)
    ),
    tag = "stocks"
)]
pub async fn refresh_stocks(State(state): State<Arc<AppState>>) -> ApiResult<Json<RefreshResponse>> {
    let refresher = state.refresher.clone().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "REFRESH_UNAVAILABLE",
            "Quote refresh is not configured",
        )
    })?;

    let cache = state.cache.clone();
    let task = tokio::spawn(async move {
        let report = refresher.refresh_now().await?;
        cache.invalidate().await;
        info!(rows = report.rows, "Manual refresh completed, cache invalidated");
        Ok::<_, bvc_data::DataError>(report)
    });

    let report = task
        .await
        .map_err(|e| {
            error!(error = %e, "Refresh task failed");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Quote refresh task failed",
            )
        })?
        .map_err(from_data_error)?;

    Ok(Json(RefreshResponse {
        status: "success".to_string(),
        rows: report.rows,
        file_written: report.file_written,
        stored: report.stored,
        timestamp: report.timestamp,
    }))
}

/// 시세 라우터 생성.
pub fn stocks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_stocks))
        .route("/refresh", post(refresh_stocks))
        .route("/{symbol}", get(get_stock))
}
