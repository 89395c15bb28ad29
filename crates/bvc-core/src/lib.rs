//! # BVC Core
//!
//! 카사블랑카 증권거래소(BVC) 시세 서비스의 핵심 도메인 모델 및 규칙을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 정규화된 시세 레코드 (`StockQuote`)와 출처 태그 (`Provenance`)
//! - 프랑스식 숫자 표기를 처리하는 숫자 정규화기
//! - 시가총액 표시 라벨 규칙
//! - 가격 알림 조건 및 포트폴리오 평가
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod normalize;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use normalize::{
    display_amount, display_count, display_percent, normalize_numeric, normalize_text, to_count,
    RawValue,
};
