//! 프랑스식 숫자 표기 정규화.
//!
//! 스크래핑된 원천 값은 `"1 234,56"`, `"12,5%"`, `"-"`, `"N/A"` 처럼
//! 로케일 형식이 섞여 있습니다. 이 모듈은 단일 값을 유한한 `f64` 또는
//! "값 없음"(`None`)으로 변환합니다. 파싱 실패는 호출자에게 전파되지 않습니다.
//!
//! 적용 순서:
//! 1. null → 값 없음
//! 2. 이미 숫자면 그대로 (비유한 값은 값 없음)
//! 3. 문자열이면 공백 제거, 소수점 쉼표를 마침표로 치환
//! 4. 센티널(`-`, `N/A`, 빈 문자열) → 값 없음
//! 5. `%`가 있으면 제거 후 파싱
//! 6. 그 외 직접 파싱

/// 정규화 이전의 원천 값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    /// 값이 존재하지 않음 (컬럼 누락 포함)
    Null,
    /// 스크래핑된 문자열
    Text(&'a str),
    /// 이미 숫자로 주어진 값
    Number(f64),
}

impl<'a> From<Option<&'a str>> for RawValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        match value {
            Some(s) => RawValue::Text(s),
            None => RawValue::Null,
        }
    }
}

impl<'a> From<&'a str> for RawValue<'a> {
    fn from(value: &'a str) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue<'_> {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// 결측을 의미하는 문자열.
const MISSING_SENTINELS: [&str; 3] = ["-", "N/A", ""];

/// 천 단위 구분자로 쓰이는 공백 문자 (일반 공백, NBSP, 좁은 NBSP).
const GROUPING_SPACES: [char; 3] = [' ', '\u{a0}', '\u{202f}'];

/// 단일 원천 값을 정규화합니다.
///
/// # 예제
///
/// ```
/// use bvc_core::{normalize_numeric, RawValue};
///
/// assert_eq!(normalize_numeric(RawValue::Text("1 234,56")), Some(1234.56));
/// assert_eq!(normalize_numeric(RawValue::Text("12,5%")), Some(12.5));
/// assert_eq!(normalize_numeric(RawValue::Text("N/A")), None);
/// ```
pub fn normalize_numeric(value: RawValue<'_>) -> Option<f64> {
    match value {
        RawValue::Null => None,
        RawValue::Number(n) => finite(n),
        RawValue::Text(s) => normalize_str(s),
    }
}

fn normalize_str(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !GROUPING_SPACES.contains(c))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    if MISSING_SENTINELS.contains(&cleaned) {
        return None;
    }

    if cleaned.contains('%') {
        return parse_finite(&cleaned.replace('%', ""));
    }

    parse_finite(cleaned)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().and_then(finite)
}

fn finite(n: f64) -> Option<f64> {
    n.is_finite().then_some(n)
}

/// 문자열 필드를 정리합니다. 공백만 있거나 비어 있으면 `None`.
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ==================== 표시 형식 ====================

/// 금액/가격 표시. 값이 없으면 `"-"`.
pub fn display_amount(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// 수량 표시. 소수점 이하는 버리고, 값이 없으면 `"0"`.
pub fn display_count(value: Option<f64>) -> String {
    to_count(value).to_string()
}

/// 등락률 표시. 값이 없으면 `"0.00%"`.
pub fn display_percent(value: Option<f64>) -> String {
    format!("{:.2}%", value.unwrap_or(0.0))
}

/// 수량 값을 정수로 내림합니다. 값이 없으면 0.
pub fn to_count(value: Option<f64>) -> i64 {
    value.map_or(0, |v| v.floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Option<f64> {
        normalize_numeric(RawValue::Text(s))
    }

    #[test]
    fn test_sentinels_are_missing() {
        for s in ["-", "N/A", "", " ", "   ", " - ", "\u{a0}"] {
            assert_eq!(text(s), None, "sentinel {:?}", s);
        }
        assert_eq!(normalize_numeric(RawValue::Null), None);
    }

    #[test]
    fn test_french_decimal_and_grouping() {
        assert_eq!(text("1 234,56"), Some(1234.56));
        assert_eq!(text("1\u{a0}234,56"), Some(1234.56));
        assert_eq!(text("167 810 000 000"), Some(167_810_000_000.0));
        assert_eq!(text(" 780,00 "), Some(780.0));
        assert_eq!(text("-0,47"), Some(-0.47));
    }

    #[test]
    fn test_percent() {
        assert_eq!(text("12,5%"), Some(12.5));
        assert_eq!(text("-0,08 %"), Some(-0.08));
        assert_eq!(text("%"), None);
        assert_eq!(text("abc%"), None);
    }

    #[test]
    fn test_garbage_and_non_finite() {
        assert_eq!(text("abc"), None);
        assert_eq!(text("1.234.56"), None);
        assert_eq!(text("inf"), None);
        assert_eq!(text("NaN"), None);
        assert_eq!(normalize_numeric(RawValue::Number(f64::NAN)), None);
        assert_eq!(normalize_numeric(RawValue::Number(f64::INFINITY)), None);
        assert_eq!(normalize_numeric(RawValue::Number(42.5)), Some(42.5));
    }

    #[test]
    fn test_raw_value_from_option() {
        assert_eq!(RawValue::from(None::<&str>), RawValue::Null);
        assert_eq!(normalize_numeric(Some("3,5").into()), Some(3.5));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  ATW "), Some("ATW".to_string()));
        assert_eq!(normalize_text("   "), None);
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(display_amount(Some(768.3)), "768.30");
        assert_eq!(display_amount(None), "-");
        assert_eq!(display_count(Some(86343.9)), "86343");
        assert_eq!(display_count(None), "0");
        assert_eq!(display_percent(Some(-0.08)), "-0.08%");
        assert_eq!(display_percent(None), "0.00%");
    }

    proptest! {
        #[test]
        fn prop_never_panics(s in "\\PC*") {
            let _ = text(&s);
        }

        #[test]
        fn prop_result_is_always_finite(s in "\\PC*") {
            if let Some(v) = text(&s) {
                prop_assert!(v.is_finite());
            }
        }

        #[test]
        fn prop_french_format_matches_plain(int_part in 0u32..1_000_000, frac in 0u32..100) {
            let french = format!("{},{:02}", int_part, frac);
            let plain = format!("{}.{:02}", int_part, frac);
            prop_assert_eq!(text(&french), plain.parse::<f64>().ok());
        }

        #[test]
        fn prop_percent_suffix_is_ignored(v in -1000.0f64..1000.0) {
            let s = format!("{:.2}", v).replace('.', ",");
            prop_assert_eq!(text(&format!("{}%", s)), text(&s));
        }
    }
}
