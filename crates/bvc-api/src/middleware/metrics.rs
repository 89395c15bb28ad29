//! HTTP 요청 metrics middleware.

use axum::{
    extract::{MatchedPath, Request},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::metrics::{
    normalize_path, record_http_duration, record_http_request, record_http_response,
    record_quote_lookup,
};

/// 단일 시세 조회 라우트 템플릿.
const QUOTE_LOOKUP_ROUTE: &str = "/api/v1/stocks/{symbol}";

/// 메트릭 `path` 라벨.
///
/// 매칭된 라우트가 있으면 라우트 템플릿(`/api/v1/stocks/{symbol}`)을 쓰고,
/// 없으면 실제 경로를 정규화합니다.
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| normalize_path(request.uri().path()))
}

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// - `http_requests_total`, `http_responses_total`: method, path(라우트 템플릿), status 라벨
/// - `http_request_duration_seconds`: 처리 시간 히스토그램
/// - `bvc_quote_lookups_total`: 단일 시세 조회의 found/not_found/rejected 결과
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = route_label(&request);

    record_http_request(method.as_str(), &path);

    let response = next.run(request).await;
    let status = response.status();

    record_http_response(method.as_str(), &path, status.as_u16());
    record_http_duration(method.as_str(), &path, start.elapsed().as_secs_f64());

    if method == Method::GET && path == QUOTE_LOOKUP_ROUTE {
        record_quote_lookup(lookup_outcome(status));
    }

    response
}

fn lookup_outcome(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::BAD_REQUEST => "rejected",
        s if s.is_success() => "found",
        _ => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{self, HeaderValue},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn test_handler() -> &'static str {
        "OK"
    }

    /// 계산된 라벨을 응답 헤더로 돌려주는 레이어.
    async fn echo_label(request: Request, next: Next) -> Response {
        let label = route_label(&request);
        let mut response = next.run(request).await;
        if let Ok(value) = HeaderValue::from_str(&label) {
            response.headers_mut().insert("x-route-label", value);
        }
        response
    }

    async fn label_for(app: Router, uri: &str) -> String {
        let response = app
            .oneshot(http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers()["x-route-label"].to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_stock_lookup_labelled_by_route_template() {
        let stocks = Router::new().route("/{symbol}", get(test_handler));
        let app = Router::new()
            .nest("/api/v1/stocks", stocks)
            .layer(middleware::from_fn(echo_label));

        assert_eq!(label_for(app.clone(), "/api/v1/stocks/IAM").await, QUOTE_LOOKUP_ROUTE);
        assert_eq!(
            label_for(app, "/api/v1/stocks/ATTIJARIWAFA%20BANK").await,
            QUOTE_LOOKUP_ROUTE
        );
    }

    #[tokio::test]
    async fn test_user_routes_labelled_by_template() {
        let app = Router::new()
            .route("/api/v1/users/{user_id}/alerts/{alert_id}", get(test_handler))
            .layer(middleware::from_fn(echo_label));

        assert_eq!(
            label_for(app, "/api/v1/users/42/alerts/7").await,
            "/api/v1/users/{user_id}/alerts/{alert_id}"
        );
    }

    #[test]
    fn test_lookup_outcome() {
        assert_eq!(lookup_outcome(StatusCode::OK), "found");
        assert_eq!(lookup_outcome(StatusCode::NOT_FOUND), "not_found");
        assert_eq!(lookup_outcome(StatusCode::BAD_REQUEST), "rejected");
        assert_eq!(lookup_outcome(StatusCode::REQUEST_TIMEOUT), "error");
    }

    #[tokio::test]
    async fn test_metrics_middleware_keeps_not_found() {
        let app = Router::new()
            .route("/test", get(test_handler))
            .layer(middleware::from_fn(metrics_layer));

        let request = http::Request::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
