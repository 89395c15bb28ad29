//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/stocks` - 시세 목록/조회/수동 갱신
//! - `/api/v1/users` - 사용자
//! - `/api/v1/users/{user_id}/watchlist` - 관심종목
//! - `/api/v1/users/{user_id}/portfolio` - 포트폴리오
//! - `/api/v1/users/{user_id}/alerts` - 가격 알림

pub mod alerts;
pub mod health;
pub mod portfolio;
pub mod stocks;
pub mod users;
pub mod watchlist;

pub use alerts::{alerts_router, AlertsResponse, EvaluateResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use portfolio::{portfolio_router, PortfolioResponse};
pub use stocks::{stocks_router, RefreshResponse, StockDetailResponse, StocksListResponse};
pub use users::users_router;
pub use watchlist::{watchlist_router, SuccessResponse, WatchlistItemView, WatchlistResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/stocks", stocks_router())
        .nest(
            "/api/v1/users",
            users_router()
                .merge(watchlist_router())
                .merge(portfolio_router())
                .merge(alerts_router()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use crate::state::create_test_state;

    #[tokio::test]
    async fn test_api_router_wires_all_scopes() {
        let app = create_api_router().with_state(Arc::new(create_test_state()));

        for (method, uri, expected) in [
            ("GET", "/health", StatusCode::OK),
            ("GET", "/api/v1/stocks", StatusCode::OK),
            ("GET", "/api/v1/stocks/ATW", StatusCode::OK),
            ("GET", "/api/v1/users/1", StatusCode::SERVICE_UNAVAILABLE),
            ("GET", "/api/v1/users/1/watchlist", StatusCode::SERVICE_UNAVAILABLE),
            ("GET", "/api/v1/users/1/portfolio", StatusCode::SERVICE_UNAVAILABLE),
            ("GET", "/api/v1/users/1/alerts", StatusCode::SERVICE_UNAVAILABLE),
            ("GET", "/api/v1/unknown", StatusCode::NOT_FOUND),
        ] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{} {}", method, uri);
        }
    }
}
