//! 포트폴리오 평가.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 보유 종목 (평가 입력).
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub shares: Decimal,
    pub buy_price: Decimal,
}

impl Holding {
    /// 투자 원금 = 수량 × 매수가.
    pub fn investment(&self) -> Decimal {
        self.shares * self.buy_price
    }
}

/// 보유 종목별 평가 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct HoldingValuation {
    pub symbol: String,
    pub shares: Decimal,
    pub buy_price: Decimal,
    /// 현재가 (시세가 없으면 매수가)
    pub current_price: Decimal,
    pub investment: Decimal,
    pub current_value: Decimal,
    pub profit: Decimal,
    pub profit_percent: Decimal,
}

/// 포트폴리오 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PortfolioSummary {
    pub total_investment: Decimal,
    pub current_value: Decimal,
    pub profit: Decimal,
    /// 원금이 0이면 0
    pub profit_percent: Decimal,
    pub holdings: Vec<HoldingValuation>,
}

fn percent_of(profit: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        Decimal::ZERO
    } else {
        (profit / base * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

/// 현재가 조회 함수로 보유 종목을 평가합니다.
pub fn value_portfolio<F>(holdings: &[Holding], mut price_of: F) -> PortfolioSummary
where
    F: FnMut(&str) -> Option<Decimal>,
{
    let mut summary = PortfolioSummary::default();

    for holding in holdings {
        let current_price = price_of(&holding.symbol).unwrap_or(holding.buy_price);
        let investment = holding.investment();
        let current_value = holding.shares * current_price;
        let profit = current_value - investment;

        summary.total_investment += investment;
        summary.current_value += current_value;
        summary.holdings.push(HoldingValuation {
            symbol: holding.symbol.clone(),
            shares: holding.shares,
            buy_price: holding.buy_price,
            current_price,
            investment,
            current_value,
            profit,
            profit_percent: percent_of(profit, investment),
        });
    }

    summary.profit = summary.current_value - summary.total_investment;
    summary.profit_percent = percent_of(summary.profit, summary.total_investment);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_portfolio() {
        let holdings = vec![
            Holding {
                symbol: "ATW".to_string(),
                shares: dec!(10),
                buy_price: dec!(700),
            },
            Holding {
                symbol: "IAM".to_string(),
                shares: dec!(100),
                buy_price: dec!(125),
            },
        ];

        let summary = value_portfolio(&holdings, |s| match s {
            "ATW" => Some(dec!(780)),
            "IAM" => Some(dec!(121)),
            _ => None,
        });

        assert_eq!(summary.total_investment, dec!(19500));
        assert_eq!(summary.current_value, dec!(19900));
        assert_eq!(summary.profit, dec!(400));
        assert_eq!(summary.profit_percent, dec!(2.05));
        assert_eq!(summary.holdings[0].profit_percent, dec!(11.43));
        assert_eq!(summary.holdings[1].profit, dec!(-400));
    }

    #[test]
    fn test_missing_price_falls_back_to_buy_price() {
        let holdings = vec![Holding {
            symbol: "ZZZ".to_string(),
            shares: dec!(3),
            buy_price: dec!(50),
        }];

        let summary = value_portfolio(&holdings, |_| None);
        assert_eq!(summary.current_value, dec!(150));
        assert_eq!(summary.profit, Decimal::ZERO);
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = value_portfolio(&[], |_| None);
        assert_eq!(summary.profit_percent, Decimal::ZERO);
        assert!(summary.holdings.is_empty());
    }
}
