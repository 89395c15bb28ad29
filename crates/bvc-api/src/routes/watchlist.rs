//! Watchlist API 라우트
//!
//! # 엔드포인트
//!
//! - `GET /api/v1/users/{user_id}/watchlist` - 관심종목 조회 (현재가, 추가 이후 등락률 포함)
//! - `POST /api/v1/users/{user_id}/watchlist` - 관심종목 추가
//! - `DELETE /api/v1/users/{user_id}/watchlist/{symbol}` - 관심종목 삭제

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use bvc_core::{validate_symbol_query, StockQuote};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::error::{
    api_error, db_error, db_unavailable, from_core_error, not_found, ApiResult,
};
use crate::repository::{
    is_foreign_key_violation, NewWatchlistItem, WatchlistItemRecord, WatchlistRepository,
};
use crate::state::{AppState, PriceIndex};

/// 시세가 붙은 관심종목 아이템
#[derive(Debug, Serialize, ToSchema)]
pub struct WatchlistItemView {
    #[serde(flatten)]
    pub item: WatchlistItemRecord,
    /// 현재가 (시세 없으면 `None`)
    pub current_price: Option<Decimal>,
    /// 당일 등락률 %
    pub day_change_percent: Option<f64>,
    /// 추가 시점 대비 등락률 %
    pub change_since_added_percent: Option<Decimal>,
}

/// 관심종목 목록 응답
#[derive(Debug, Serialize, ToSchema)]
pub struct WatchlistResponse {
    pub items: Vec<WatchlistItemView>,
    pub total: usize,
}

/// 성공 응답
#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

fn quote_for<'a>(quotes: &'a [StockQuote], symbol: &str) -> Option<&'a StockQuote> {
    quotes.iter().find(|q| q.symbol.eq_ignore_ascii_case(symbol))
}

/// 추가 시점 대비 등락률. 추가 가격이 없거나 0이면 `None`.
pub fn change_since_added(added: Option<Decimal>, current: Option<Decimal>) -> Option<Decimal> {
    let added = added.filter(|p| !p.is_zero())?;
    let current = current?;
    Some(((current - added) / added * Decimal::ONE_HUNDRED).round_dp(2))
}

fn enrich(item: WatchlistItemRecord, quotes: &[StockQuote], prices: &PriceIndex) -> WatchlistItemView {
    let current_price = prices.get(&item.symbol);
    WatchlistItemView {
        day_change_percent: quote_for(quotes, &item.symbol).map(|q| q.change_percent),
        change_since_added_percent: change_since_added(item.added_price, current_price),
        current_price,
        item,
    }
}

/// GET /api/v1/users/{user_id}/watchlist
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/watchlist",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    responses((status = 200, description = "관심종목 목록", body = WatchlistResponse)),
    tag = "watchlist"
)]
pub async fn list_watchlist(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<WatchlistResponse>> {
    debug!(user_id, "Listing watchlist");
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let records = WatchlistRepository::list(pool, user_id)
        .await
        .map_err(|e| db_error("Failed to load watchlist", e))?;

    let entry = state.cache.get_quotes().await;
    let prices = PriceIndex::from_entry(&entry);
    let items: Vec<WatchlistItemView> = records
        .into_iter()
        .map(|record| enrich(record, &entry.quotes, &prices))
        .collect();

    Ok(Json(WatchlistResponse {
        total: items.len(),
        items,
    }))
}

/// POST /api/v1/users/{user_id}/watchlist
///
/// 이름과 추가 가격을 생략하면 현재 시세에서 채웁니다.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/watchlist",
    params(("user_id" = i64, Path, description = "사용자 ID")),
    request_body = NewWatchlistItem,
    responses(
        (status = 201, description = "추가됨", body = WatchlistItemRecord),
        (status = 404, description = "사용자 없음", body = crate::error::ApiErrorResponse),
        (status = 409, description = "이미 추가된 종목", body = crate::error::ApiErrorResponse)
    ),
    tag = "watchlist"
)]
pub async fn add_watchlist_item(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(mut input): Json<NewWatchlistItem>,
) -> ApiResult<(StatusCode, Json<WatchlistItemRecord>)> {
    input.symbol = validate_symbol_query(input.symbol.trim())
        .map_err(from_core_error)?
        .to_uppercase();

    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;

    let entry = state.cache.get_quotes().await;
    if let Some(quote) = quote_for(&entry.quotes, &input.symbol) {
        input.name.get_or_insert_with(|| quote.name.clone());
    }
    if input.added_price.is_none() {
        input.added_price = PriceIndex::from_entry(&entry).get(&input.symbol);
    }

    let record = WatchlistRepository::add(pool, user_id, &input)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                not_found(format!("user {} not found", user_id))
            } else {
                db_error("Failed to add watchlist item", e)
            }
        })?
        .ok_or_else(|| {
            api_error(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("{} is already in the watchlist", input.symbol),
            )
        })?;

    info!(user_id, symbol = %record.symbol, "Watchlist item added");
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/v1/users/{user_id}/watchlist/{symbol}
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/watchlist/{symbol}",
    params(
        ("user_id" = i64, Path, description = "사용자 ID"),
        ("symbol" = String, Path, description = "종목 심볼")
    ),
    responses(
        (status = 200, description = "삭제됨", body = SuccessResponse),
        (status = 404, description = "관심종목에 없음", body = crate::error::ApiErrorResponse)
    ),
    tag = "watchlist"
)]
pub async fn remove_watchlist_item(
    State(state): State<Arc<AppState>>,
    Path((user_id, symbol)): Path<(i64, String)>,
) -> ApiResult<Json<SuccessResponse>> {
    let pool = state.db_pool.as_ref().ok_or_else(db_unavailable)?;
    let symbol = symbol.trim().to_uppercase();

    let removed = WatchlistRepository::remove(pool, user_id, &symbol)
        .await
        .map_err(|e| db_error("Failed to remove watchlist item", e))?;

    if !removed {
        return Err(not_found(format!("{} is not in the watchlist", symbol)));
    }

    Ok(Json(SuccessResponse {
        success: true,
        message: format!("{} removed from watchlist", symbol),
    }))
}

/// 관심종목 라우터 생성 (`/api/v1/users` 아래에 병합).
pub fn watchlist_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{user_id}/watchlist",
            get(list_watchlist).post(add_watchlist_item),
        )
        .route("/{user_id}/watchlist/{symbol}", delete(remove_watchlist_item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    use crate::state::create_test_state;

    #[test]
    fn test_change_since_added() {
        assert_eq!(change_since_added(Some(dec!(100)), Some(dec!(112.5))), Some(dec!(12.5)));
        assert_eq!(change_since_added(Some(dec!(300)), Some(dec!(200))), Some(dec!(-33.33)));
        assert_eq!(change_since_added(None, Some(dec!(10))), None);
        assert_eq!(change_since_added(Some(dec!(0)), Some(dec!(10))), None);
        assert_eq!(change_since_added(Some(dec!(10)), None), None);
    }

    #[tokio::test]
    async fn test_enrich_uses_cached_quotes() {
        let state = create_test_state();
        let entry = state.cache.get_quotes().await;
        let prices = PriceIndex::from_entry(&entry);

        let record = WatchlistItemRecord {
            id: 1,
            user_id: 1,
            symbol: "ATW".to_string(),
            name: None,
            added_price: Some(dec!(750)),
            added_date: Utc::now(),
        };
        let view = enrich(record, &entry.quotes, &prices);

        assert_eq!(view.current_price, Some(dec!(780)));
        assert_eq!(view.day_change_percent, Some(1.52));
        assert_eq!(view.change_since_added_percent, Some(dec!(4)));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["symbol"], "ATW");
        assert!(json.get("item").is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_symbol() {
        let app = Router::new()
            .nest("/api/v1/users", watchlist_router())
            .with_state(Arc::new(create_test_state()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users/1/watchlist")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"symbol":"ATW<script>"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
