//! 시세 서비스 도메인 모델.

mod alert;
mod portfolio;
mod quote;

pub use alert::*;
pub use portfolio::*;
pub use quote::*;
