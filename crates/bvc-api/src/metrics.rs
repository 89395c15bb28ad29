//! Prometheus 메트릭 설정 및 유틸리티.
//!
//! HTTP 요청 메트릭을 수집하고 `/metrics` 엔드포인트로 노출합니다.
//! 시세 캐시/갱신 카운터는 `bvc-data`에서 같은 레코더로 기록됩니다.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Prometheus 메트릭 레코더를 설정하고 핸들을 반환합니다.
///
/// 레코더가 이미 설치되어 있으면 에러를 반환합니다.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        .install_recorder()
}

/// HTTP 요청 카운터 증가.
pub fn record_http_request(method: &str, path: &str) {
    counter!("http_requests_total", "method" => method.to_string(), "path" => path.to_string())
        .increment(1);
}

/// HTTP 응답 카운터 증가.
pub fn record_http_response(method: &str, path: &str, status: u16) {
    counter!(
        "http_responses_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// HTTP 요청 지속 시간 기록.
pub fn record_http_duration(method: &str, path: &str, duration_secs: f64) {
    histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_secs);
}

/// 단일 시세 조회 결과 카운터 (found, not_found, rejected, error).
pub fn record_quote_lookup(outcome: &'static str) {
    counter!("bvc_quote_lookups_total", "outcome" => outcome).increment(1);
}

/// 현재 캐시에 담긴 시세 수.
pub fn set_cached_quotes(provenance: &str, count: usize) {
    gauge!("bvc_cached_quotes", "provenance" => provenance.to_string()).set(count as f64);
}

/// 경로에서 동적 파라미터를 정규화합니다.
///
/// 매칭된 라우트가 없는 요청의 라벨에 쓰입니다.
///
/// 숫자 세그먼트는 `:id`, 종목 조회 경로의 마지막 세그먼트는 `:symbol`로 바꿉니다.
/// 예: `/api/v1/users/42/alerts/7` → `/api/v1/users/:id/alerts/:id`
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let normalized: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let is_numeric = !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit());
            let is_symbol = i == 4
                && segments.len() == 5
                && segments[3] == "stocks"
                && *segment != "refresh"
                && !segment.is_empty();

            if is_numeric {
                ":id".to_string()
            } else if is_symbol {
                ":symbol".to_string()
            } else {
                (*segment).to_string()
            }
        })
        .collect();
    normalized.join("/")
}
