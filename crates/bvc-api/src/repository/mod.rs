//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 모든 Repository는 static methods 패턴을 사용합니다.

pub mod alerts;
pub mod portfolio;
pub mod users;
pub mod watchlist;

pub use alerts::{AlertRecord, AlertRepository, NewAlert};
pub use portfolio::{HoldingRecord, NewHolding, PortfolioRepository};
pub use users::{NewUser, UserRecord, UserRepository};
pub use watchlist::{NewWatchlistItem, WatchlistItemRecord, WatchlistRepository};

/// 존재하지 않는 사용자를 참조한 INSERT인지 확인합니다.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// 고유 제약 위반인지 확인합니다.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
