//! 가격 알림 조건.
//!
//! 사용자가 등록한 목표가에 현재가가 도달했는지 판정합니다.
//!
//! ```rust
//! use bvc_core::domain::AlertCondition;
//! use rust_decimal::Decimal;
//!
//! let target = Decimal::new(780, 0);
//! assert!(AlertCondition::Above.is_met(Decimal::new(781, 0), target));
//! assert!(!AlertCondition::Below.is_met(Decimal::new(781, 0), target));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 알림 조건.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    /// 현재가 >= 목표가
    Above,
    /// 현재가 <= 목표가
    Below,
}

impl AlertCondition {
    /// 조건 충족 여부.
    pub fn is_met(&self, current_price: Decimal, target_price: Decimal) -> bool {
        match self {
            Self::Above => current_price >= target_price,
            Self::Below => current_price <= target_price,
        }
    }

    /// DB 저장용 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            other => Err(format!("Unknown alert condition: {}", other)),
        }
    }
}

/// 판정 대상 알림.
///
/// 이미 발동된 알림은 다시 발동되지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAlert {
    pub id: i64,
    pub symbol: String,
    pub target_price: Decimal,
    pub condition: AlertCondition,
    pub triggered: bool,
}

impl PendingAlert {
    /// 현재가로 알림을 판정합니다. 이미 발동된 경우 `false`.
    pub fn should_trigger(&self, current_price: Decimal) -> bool {
        !self.triggered && self.condition.is_met(current_price, self.target_price)
    }
}

/// 현재가 조회 함수로 새로 발동될 알림 ID를 모읍니다.
///
/// 현재가를 알 수 없는 종목의 알림은 건너뜁니다.
pub fn alerts_to_trigger<F>(alerts: &[PendingAlert], mut price_of: F) -> Vec<i64>
where
    F: FnMut(&str) -> Option<Decimal>,
{
    alerts
        .iter()
        .filter_map(|alert| {
            let price = price_of(&alert.symbol)?;
            alert.should_trigger(price).then_some(alert.id)
        })
        .collect()
}
