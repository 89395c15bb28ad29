//! Standalone quote collector CLI.

use bvc_collector::{modules, CollectionStats, CollectorConfig, CollectorError};
use clap::{Parser, Subcommand};
use bvc_core::{init_logging, LogConfig};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "bvc-collector")]
#[command(about = "Casablanca Stock Exchange quote collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 시장 페이지를 1회 수집하여 원천 CSV와 DB에 기록
    Scrape,

    /// 데몬 모드: 주기적으로 수집 실행
    Daemon,

    /// 데이터베이스 스키마 생성
    InitDb,
}

/// `DATABASE_URL`이 있으면 연결합니다. 연결 실패 시 CSV만 기록합니다.
async fn optional_pool(config: &CollectorConfig) -> Option<PgPool> {
    let url = config.database_url.as_deref()?;
    match bvc_data::connect_pool(&config.database, url).await {
        Ok(pool) => {
            tracing::info!("데이터베이스 연결 성공");
            Some(pool)
        }
        Err(e) => {
            tracing::warn!(error = %e, "데이터베이스 연결 실패, CSV만 기록합니다");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_config = match std::env::var("RUST_LOG") {
        Ok(_) => LogConfig::from_env(),
        Err(_) => LogConfig::new(format!("bvc_collector={0},bvc_data={0}", cli.log_level)),
    };
    init_logging(log_config)?;

    tracing::info!("BVC Quote Collector 시작");

    let config = CollectorConfig::from_env();
    tracing::debug!(
        has_database = config.database_url.is_some(),
        output = %config.output_path.display(),
        "설정 로드 완료"
    );

    match cli.command {
        Commands::InitDb => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| {
                    CollectorError::Config("DATABASE_URL is required for init-db".to_string())
                })?;
            let pool = bvc_data::connect_pool(&config.database, url)
                .await
                .map_err(CollectorError::from)?;
            modules::init_db(&pool).await?;
            pool.close().await;
        }
        Commands::Scrape => {
            let pool = optional_pool(&config).await;
            let orchestrator = modules::build_orchestrator(&config, pool.clone())?;

            let stats = modules::run_scrape(&orchestrator).await?;
            stats.log_summary("시세 수집");

            if let Some(pool) = pool {
                pool.close().await;
            }
        }
        Commands::Daemon => {
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.daemon.interval_minutes
            );

            let pool = optional_pool(&config).await;
            let orchestrator = modules::build_orchestrator(&config, pool.clone())?;
            let mut totals = CollectionStats::new();

            let mut interval = tokio::time::interval(config.daemon.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        match modules::run_scrape(&orchestrator).await {
                            Ok(stats) => {
                                stats.log_summary("시세 수집");
                                totals.merge(&stats);
                            }
                            Err(e) => {
                                tracing::error!("시세 수집 실패: {}", e);
                                totals.record_failure();
                            }
                        }

                        tracing::info!(
                            "=== 수집 완료, 다음 실행: {}분 후 ===",
                            config.daemon.interval_minutes
                        );
                    }
                }
            }

            totals.log_summary("데몬 누적");
            if let Some(pool) = pool {
                pool.close().await;
            }
        }
    }

    tracing::info!("BVC Quote Collector 종료");

    Ok(())
}
