//! 정규화된 시세 레코드.
//!
//! `StockQuote`는 한 번 생성되면 변경되지 않습니다. 캐시는 갱신 시
//! 전체 집합을 통째로 교체합니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// 섹터 테이블에 없는 종목의 섹터.
pub const UNKNOWN_SECTOR: &str = "Other";

/// 시가총액을 알 수 없을 때의 라벨.
pub const MARKET_CAP_UNAVAILABLE: &str = "N/A";

/// 정규화된 시세 (API 출력 단위).
///
/// 요약 필드와 `details`의 대응 필드는 항상 같은 정규화 값에서 파생됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct StockQuote {
    /// 종목 심볼 (Ticker, 없으면 Instrument)
    pub symbol: String,
    /// 회사명 (Company, 없으면 Instrument)
    pub name: String,
    /// 최종 체결가 (없으면 0.0)
    pub price: f64,
    /// 등락률 % (없으면 0.0)
    #[serde(rename = "change")]
    pub change_percent: f64,
    /// 거래량 (없으면 0)
    pub volume: i64,
    /// 섹터
    pub sector: String,
    /// 시가총액 라벨
    #[serde(rename = "marketCap")]
    pub market_cap_label: String,
    /// 상세 화면용 표시 문자열
    pub details: QuoteDetails,
}

/// 상세 화면용 필드.
///
/// 문자열 필드는 값이 없으면 `"-"`, 수량 필드는 `"0"`, 등락률은 `"0.00%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct QuoteDetails {
    pub statut: String,
    pub cours_reference: String,
    pub ouverture: String,
    pub dernier_cours: String,
    pub quantite_echangee: String,
    pub volume_mad: String,
    pub variation_pourcentage: String,
    pub plus_haut_jour: String,
    pub plus_bas_jour: String,
    pub meilleur_prix_achat: String,
    pub meilleur_prix_vente: String,
    pub quantite_meilleur_prix_achat: String,
    pub quantite_meilleur_prix_vente: String,
    pub capitalisation: String,
    pub nombre_transactions: String,
    pub price: f64,
    pub change: f64,
    pub volume: i64,
    pub sector: String,
    #[serde(rename = "marketCap")]
    pub market_cap: String,
    pub description: String,
    pub symbol: String,
    pub name: String,
}

/// 시세 집합의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    /// 원천 파일에서 로드됨
    Live,
    /// 원천 파일이 없어 내장 데모 데이터 사용
    FallbackMock,
    /// 원천 파일 처리 실패, 빈 집합
    Empty,
}

impl Provenance {
    /// 직렬화 태그와 같은 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::FallbackMock => "FALLBACK_MOCK",
            Self::Empty => "EMPTY",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 시가총액 라벨을 계산합니다.
///
/// - `>= 1e9` → `"{:.2} B MAD"`
/// - `>= 1e6` → `"{:.2} M MAD"`
/// - `> 0` → `"{:.2} MAD"`
/// - 없음 또는 `<= 0` → `"N/A"`
pub fn market_cap_label(capitalisation: Option<f64>) -> String {
    match capitalisation {
        Some(cap) if cap >= 1e9 => format!("{:.2} B MAD", cap / 1e9),
        Some(cap) if cap >= 1e6 => format!("{:.2} M MAD", cap / 1e6),
        Some(cap) if cap > 0.0 => format!("{:.2} MAD", cap),
        _ => MARKET_CAP_UNAVAILABLE.to_string(),
    }
}

/// 심볼 또는 회사명으로 시세를 찾습니다.
///
/// 대소문자 무시 완전 일치(심볼, 회사명)를 먼저 시도하고,
/// 없으면 회사명 부분 일치로 대체합니다.
pub fn find_quote<'a>(quotes: &'a [StockQuote], query: &str) -> Option<&'a StockQuote> {
    if query.trim().is_empty() {
        return None;
    }
    let needle = query.to_uppercase();

    quotes
        .iter()
        .find(|q| q.symbol.to_uppercase() == needle || q.name.to_uppercase() == needle)
        .or_else(|| {
            quotes
                .iter()
                .find(|q| q.name.to_uppercase().contains(&needle))
        })
}

/// 조회어 최대 길이 (문자 수).
pub const MAX_SYMBOL_QUERY_LEN: usize = 50;

/// 심볼/회사명 조회어를 검증합니다.
///
/// 영숫자, 공백, `-`, `.`만 허용하며 비어 있거나 50자를 넘으면 거부합니다.
pub fn validate_symbol_query(query: &str) -> CoreResult<&str> {
    if query.is_empty() {
        return Err(CoreError::InvalidInput("symbol must not be empty".to_string()));
    }
    if query.chars().count() > MAX_SYMBOL_QUERY_LEN {
        return Err(CoreError::InvalidInput(format!(
            "symbol must be at most {} characters",
            MAX_SYMBOL_QUERY_LEN
        )));
    }
    if let Some(bad) = query
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '.'))
    {
        return Err(CoreError::InvalidInput(format!(
            "symbol contains invalid character {:?}",
            bad
        )));
    }
    Ok(query)
}

/// 정렬된 고유 섹터 목록.
pub fn sorted_sectors(quotes: &[StockQuote]) -> Vec<String> {
    quotes
        .iter()
        .map(|q| q.sector.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
