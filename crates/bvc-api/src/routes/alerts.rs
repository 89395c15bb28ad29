//! 가격 알림 API 라우트
//!
//! - `GET /api/v1/users/{user_id}/alerts` - 알림 목록
//! - `POST /api/v1/users/{user_id}/alerts` - 알림 생성
//! - `DELETE /api/v1/users/{user_id}/alerts/{alert_id}` - 알림 삭제
//! - `POST /api/v1/users/{user_id}/alerts/evaluate` - 현재 시세로 알림 판정

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use bvc_core::{alerts_to_trigger, validate_symbol_query, PendingAlert};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{
    bad_request, db_error, db_unavailable, from_core_error, not_found, ApiResult,
};
use crate::repository::{is_foreign_key_violation, AlertRecord, AlertRepository, NewAlert};
use crate::routes::watchlist::SuccessResponse;
use crate::state::AppState;

/// 알림 목록 응답
#[derive(Debug, Serialize, ToSchema)]
pub struct AlertsResponse {
    pub alerts: Vec<AlertRecord>,
    pub total: usize,
}

/// 판정 결과
#[derive(Debug, Serialize, ToSchema)]
pub struct EvaluateResponse {
    /// 판정한 미발동 알림 수
    pub checked: usize,
    /// 이번에 발동된 알림 ID
    pub triggered: Vec<i64>,
}

/// GET /api/v1/users/{user_id}/alerts
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/alerts",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses((status = 200, description = "알림 목록", body = AlertsResponse)),
    tag = "alerts"
)]
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<AlertsResponse>> {
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let alerts = AlertRepository::list(pool, user_id)
        .await
        .map_err(|e| db_error("Failed to load alerts", e))?;

    Ok(Json(AlertsResponse {
        total: alerts.len(),
        alerts,
    }))
}

/// POST /api/v1/users/{user_id}/alerts
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/alerts",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    request_body = NewAlert,
    responses(
        (status = 201, description = "생성됨", body = AlertRecord),
        (status = 400, description = "잘못된 입력", body = crate::error::ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(mut input): Json<NewAlert>,
) -> ApiResult<(StatusCode, Json<AlertRecord>)> {
    input.symbol = validate_symbol_query(input.symbol.trim())
        .map_err(from_core_error)?
        .to_uppercase();
    if input.target_price <= Decimal::ZERO {
        return Err(bad_request("target_price must be positive"));
    }

    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let record = AlertRepository::create(pool, user_id, &input)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                not_found(format!("user {} not found", user_id))
            } else {
                db_error("Failed to create alert", e)
            }
        })?;

    info!(
        user_id,
        alert_id = record.id,
        symbol = %record.symbol,
        condition = %record.condition,
        target = %record.target_price,
        "Price alert created"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/v1/users/{user_id}/alerts/{alert_id}
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/alerts/{alert_id}",
    params(
        ("user_id" = i64, Path, description = "사용자 ID"),
        ("alert_id" = i64, Path, description = "알림 ID")
    ),
    responses(
        (status = 200, description = "삭제됨", body = SuccessResponse),
        (status = 404, description = "알림 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn delete_alert(
    State(state): State<Arc<AppState>>,
    Path((user_id, alert_id)): Path<(i64, i64)>,
) -> ApiResult<Json<SuccessResponse>> {
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let deleted = AlertRepository::delete(pool, user_id, alert_id)
        .await
        .map_err(|e| db_error("Failed to delete alert", e))?;

    if !deleted {
        return Err(not_found(format!("alert {} not found", alert_id)));
    }

    Ok(Json(SuccessResponse {
        success: true,
        message: format!("alert {} deleted", alert_id),
    }))
}

/// POST /api/v1/users/{user_id}/alerts/evaluate
///
/// `above`는 현재가 >= 목표가, `below`는 현재가 <= 목표가일 때 발동합니다.
/// 시세가 없는 종목의 알림은 건너뜁니다.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/alerts/evaluate",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses((status = 200, description = "판정 결과", body = EvaluateResponse)),
    tag = "alerts"
)]
pub async fn evaluate_alerts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<EvaluateResponse>> {
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let records = AlertRepository::list_pending(pool, user_id)
        .await
        .map_err(|e| db_error("Failed to load alerts", e))?;
    let pending: Vec<PendingAlert> = records.iter().filter_map(AlertRecord::to_pending).collect();

    let prices = state.current_prices().await;
    let triggered = alerts_to_trigger(&pending, |symbol| prices.get(symbol));

    if !triggered.is_empty() {
        let updated = AlertRepository::mark_triggered(pool, user_id, &triggered)
            .await
            .map_err(|e| db_error("Failed to mark alerts triggered", e))?;
        info!(user_id, updated, "Price alerts triggered");
    }

    Ok(Json(EvaluateResponse {
        checked: pending.len(),
        triggered,
    }))
}

/// 알림 라우터 생성 (`/api/v1/users` 아래에 병합).
pub fn alerts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{user_id}/alerts", get(list_alerts).post(create_alert))
        .route("/{user_id}/alerts/evaluate", post(evaluate_alerts))
        .route("/{user_id}/alerts/{alert_id}", delete(delete_alert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn app() -> Router {
        Router::new()
            .nest("/api/v1/users", alerts_router())
            .with_state(Arc::new(create_test_state()))
    }

    fn post_alert(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/users/1/alerts")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_alert_rejects_unknown_condition() {
        let response = app()
            .oneshot(post_alert(
                r#"{"symbol":"IAM","target_price":"120","condition":"sideways"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_create_alert_rejects_non_positive_target() {
        let response = app()
            .oneshot(post_alert(
                r#"{"symbol":"IAM","target_price":"-1","condition":"below"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_evaluate_without_db() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users/1/alerts/evaluate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
