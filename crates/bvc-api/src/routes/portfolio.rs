//! Portfolio API 라우트
//!
//! - `GET /api/v1/users/{user_id}/portfolio` - 보유 종목과 평가 요약
//! - `POST /api/v1/users/{user_id}/portfolio` - 매수 기록 추가
//! - `DELETE /api/v1/users/{user_id}/portfolio/{holding_id}` - 매수 기록 삭제

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use bvc_core::{validate_symbol_query, value_portfolio, Holding, PortfolioSummary};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{
    bad_request, db_error, db_unavailable, from_core_error, not_found, ApiResult,
};
use crate::repository::{is_foreign_key_violation, HoldingRecord, NewHolding, PortfolioRepository};
use crate::routes::watchlist::SuccessResponse;
use crate::state::AppState;

/// 포트폴리오 응답
#[derive(Debug, Serialize, ToSchema)]
pub struct PortfolioResponse {
    pub holdings: Vec<HoldingRecord>,
    /// 현재 시세 기준 평가 (시세 없는 종목은 매수가로 평가)
    pub summary: PortfolioSummary,
}

/// GET /api/v1/users/{user_id}/portfolio
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/portfolio",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses((status = 200, description = "포트폴리오", body = PortfolioResponse)),
    tag = "portfolio"
)]
pub async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<PortfolioResponse>> {
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let holdings = PortfolioRepository::list(pool, user_id)
        .await
        .map_err(|e| db_error("Failed to load portfolio", e))?;

    let prices = state.current_prices().await;
    let inputs: Vec<Holding> = holdings.iter().map(Holding::from).collect();
    let summary = value_portfolio(&inputs, |symbol| prices.get(symbol));

    Ok(Json(PortfolioResponse { holdings, summary }))
}

/// POST /api/v1/users/{user_id}/portfolio
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/portfolio",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    request_body = NewHolding,
    responses(
        (status = 201, description = "추가됨", body = HoldingRecord),
        (status = 400, description = "잘못된 입력", body = crate::error::ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "portfolio"
)]
pub async fn add_holding(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(mut input): Json<NewHolding>,
) -> ApiResult<(StatusCode, Json<HoldingRecord>)> {
    input.symbol = validate_symbol_query(input.symbol.trim())
        .map_err(from_core_error)?
        .to_uppercase();
    input.validate().map_err(bad_request)?;

    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let record = PortfolioRepository::add(pool, user_id, &input)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                not_found(format!("user {} not found", user_id))
            } else {
                db_error("Failed to add holding", e)
            }
        })?;

    info!(user_id, symbol = %record.symbol, shares = %record.shares, "Holding added");
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/v1/users/{user_id}/portfolio/{holding_id}
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/portfolio/{holding_id}",
    params(
        ("user_id" = i64, Path, description = "사용자 ID"),
        ("holding_id" = i64, Path, description = "보유 기록 ID")
    ),
    responses(
        (status = 200, description = "삭제됨", body = SuccessResponse),
        (status = 404, description = "기록 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "portfolio"
)]
pub async fn remove_holding(
    State(state): State<Arc<AppState>>,
    Path((user_id, holding_id)): Path<(i64, i64)>,
) -> ApiResult<Json<SuccessResponse>> {
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let removed = PortfolioRepository::remove(pool, user_id, holding_id)
        .await
        .map_err(|e| db_error("Failed to remove holding", e))?;

    if !removed {
        return Err(not_found(format!("holding {} not found", holding_id)));
    }

    Ok(Json(SuccessResponse {
        success: true,
        message: format!("holding {} removed", holding_id),
    }))
}

/// 포트폴리오 라우터 생성 (`/api/v1/users` 아래에 병합).
pub fn portfolio_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{user_id}/portfolio", get(get_portfolio).post(add_holding))
        .route("/{user_id}/portfolio/{holding_id}", delete(remove_holding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn app() -> Router {
        Router::new()
            .nest("/api/v1/users", portfolio_router())
            .with_state(Arc::new(create_test_state()))
    }

    fn post_holding(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/users/1/portfolio")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_holding_rejects_non_positive_shares() {
        let response = app()
            .oneshot(post_holding(r#"{"symbol":"ATW","shares":"0","buy_price":"700"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_holding_without_db() {
        let response = app()
            .oneshot(post_holding(r#"{"symbol":"ATW","shares":"10","buy_price":"700"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_remove_holding_rejects_non_numeric_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/v1/users/1/portfolio/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
