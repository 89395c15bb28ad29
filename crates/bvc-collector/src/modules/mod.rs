//! 수집 작업 모듈.

mod scrape;
mod schema;

pub use scrape::{build_orchestrator, run_scrape};
pub use schema::init_db;
