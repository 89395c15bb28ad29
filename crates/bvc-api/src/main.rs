//! BVC 시세 API 서버.
//!
//! 설정을 로드하고 시세 캐시, 갱신 조정자, (선택적) DB 풀을 구성한 뒤
//! Axum 서버를 시작합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use bvc_api::metrics::setup_metrics_recorder;
use bvc_api::middleware::{metrics_layer, security_headers_layer};
use bvc_api::openapi::swagger_ui_router;
use bvc_api::routes::create_api_router;
use bvc_api::state::AppState;
use bvc_core::{init_logging, AppConfig, LogConfig};
use bvc_data::{
    connect_pool, BvcMarketScraper, CandidateFiles, Clock, PgQuoteStore, QuoteCache,
    RefreshOrchestrator, SourceResolver, SystemClock,
};

/// 설정에서 AppState를 구성합니다.
///
/// DB 연결이나 수집기 생성에 실패해도 서버는 시세 조회만으로 시작합니다.
async fn create_app_state(config: &AppConfig) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let resolver: Arc<dyn SourceResolver> =
        Arc::new(CandidateFiles::new(config.quotes.candidates.clone()));

    let db_pool = match config.database.resolved_url() {
        Some(url) => match connect_pool(&config.database, &url).await {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!(error = %e, "Database unavailable, user endpoints disabled");
                None
            }
        },
        None => {
            info!("No database configured, user endpoints disabled");
            None
        }
    };

    let refresher = match BvcMarketScraper::new(&config.scraper) {
        Ok(scraper) => {
            let mut refresher = RefreshOrchestrator::new(
                Arc::new(scraper),
                resolver.clone(),
                clock.clone(),
                config.quotes.output_path.clone(),
                config.quotes.refresh_interval(),
            );
            if let Some(pool) = &db_pool {
                refresher = refresher.with_store(Arc::new(PgQuoteStore::new(pool.clone())));
            }
            Some(Arc::new(refresher))
        }
        Err(e) => {
            warn!(error = %e, "Failed to build market scraper, refresh disabled");
            None
        }
    };

    let mut cache = QuoteCache::new(resolver, clock, config.quotes.cache_ttl());
    if config.quotes.auto_refresh {
        match &refresher {
            Some(refresher) => cache = cache.with_auto_refresh(refresher.clone()),
            None => warn!("Auto refresh requested but no scraper is available"),
        }
    }

    let mut state = AppState::new(Arc::new(cache));
    if let Some(refresher) = refresher {
        state = state.with_refresher(refresher);
    }
    if let Some(pool) = db_pool {
        state = state.with_db_pool(pool);
    }
    state
}

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS`(쉼표 구분)가 설정되어 있으면 해당 origin만 허용하고,
/// 없으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// /metrics 엔드포인트 핸들러.
async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, metrics_handle: PrometheusHandle, timeout: Duration) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics_handle);

    Router::new()
        .merge(metrics_router)
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(middleware::from_fn(metrics_layer))
        .layer(middleware::from_fn(security_headers_layer))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors_layer())
}

/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력합니다.
///
/// 출력했으면 `true`.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use bvc_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        return Ok(true);
    }

    Ok(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    let config = AppConfig::load_default().context("Failed to load configuration")?;

    init_logging(LogConfig::from_config(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting BVC quotes API server...");

    let metrics_handle = setup_metrics_recorder().context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics recorder initialized");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}, check BVC__SERVER__HOST and BVC__SERVER__PORT",
                config.server.host, config.server.port
            )
        })?;

    let state = Arc::new(create_app_state(&config).await);
    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        has_refresher = state.refresher.is_some(),
        cache_ttl_secs = config.quotes.cache_ttl_secs,
        auto_refresh = config.quotes.auto_refresh,
        "Application state initialized"
    );

    let app = create_router(
        state,
        metrics_handle,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Ctrl+C 또는 SIGTERM 시그널 대기.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
