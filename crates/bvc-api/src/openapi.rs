//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use bvc_core::{
    AlertCondition, HoldingValuation, PortfolioSummary, Provenance, QuoteDetails, StockQuote,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::repository::{
    AlertRecord, HoldingRecord, NewAlert, NewHolding, NewUser, NewWatchlistItem, UserRecord,
    WatchlistItemRecord,
};
use crate::routes::{
    alerts, health, portfolio, stocks, users, watchlist, AlertsResponse, ComponentHealth,
    ComponentStatus, EvaluateResponse, HealthResponse, PortfolioResponse, RefreshResponse,
    StockDetailResponse, StocksListResponse, SuccessResponse, WatchlistItemView,
    WatchlistResponse,
};

/// BVC Quotes API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "BVC Quotes API",
        version = "0.1.0",
        description = r#"
# Casablanca Stock Exchange 시세 API

정규화된 시세 조회와 사용자별 관심종목, 포트폴리오, 가격 알림을 제공합니다.

## 시세 출처

목록 응답의 `source` 필드는 다음 중 하나입니다.

- `LIVE`: 최신 원천 파일에서 로드
- `FALLBACK_MOCK`: 원천 파일이 없어 데모 시세 제공
- `EMPTY`: 원천 파일 처리 실패
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "stocks", description = "시세 - 목록, 단일 조회, 수동 갱신"),
        (name = "users", description = "사용자"),
        (name = "watchlist", description = "관심종목"),
        (name = "portfolio", description = "포트폴리오 - 보유 종목과 평가"),
        (name = "alerts", description = "가격 알림")
    ),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            SuccessResponse,

            // ===== Stocks =====
            StockQuote,
            QuoteDetails,
            Provenance,
            StocksListResponse,
            StockDetailResponse,
            RefreshResponse,

            // ===== Users =====
            UserRecord,
            NewUser,

            // ===== Watchlist =====
            WatchlistItemRecord,
            NewWatchlistItem,
            WatchlistItemView,
            WatchlistResponse,

            // ===== Portfolio =====
            HoldingRecord,
            NewHolding,
            HoldingValuation,
            PortfolioSummary,
            PortfolioResponse,

            // ===== Alerts =====
            AlertCondition,
            AlertRecord,
            NewAlert,
            AlertsResponse,
            EvaluateResponse,
        )
    ),
    paths(
        health::health_check,
        health::health_ready,
        stocks::list_stocks,
        stocks::get_stock,
        stocks::refresh_stocks,
        users::create_user,
        users::get_user,
        watchlist::list_watchlist,
        watchlist::add_watchlist_item,
        watchlist::remove_watchlist_item,
        portfolio::get_portfolio,
        portfolio::add_holding,
        portfolio::remove_holding,
        alerts::list_alerts,
        alerts::create_alert,
        alerts::delete_alert,
        alerts::evaluate_alerts,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("BVC Quotes API"));

        for path in [
            "/health/ready",
            "/api/v1/stocks",
            "/api/v1/stocks/{symbol}",
            "/api/v1/stocks/refresh",
            "/api/v1/users/{user_id}/watchlist",
            "/api/v1/users/{user_id}/portfolio",
            "/api/v1/users/{user_id}/alerts/evaluate",
        ] {
            assert!(json.contains(path), "missing path {}", path);
        }

        for schema in ["StockQuote", "Provenance", "PortfolioSummary", "ApiErrorResponse"] {
            assert!(json.contains(schema), "missing schema {}", schema);
        }
    }
}
