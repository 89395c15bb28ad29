//! 원천 CSV 테이블 읽기/쓰기.
//!
//! 형식: 첫 줄은 헤더, 쉼표 구분, 큰따옴표 인용(`""`는 따옴표 하나),
//! UTF-8 BOM 허용. `Timestamp` 컬럼은 모든 행에 같은 값(스크래핑 시각)을 가집니다.
//!
//! 프랑스식 숫자(`"1 234,56"`)는 쉼표를 포함하므로 항상 인용됩니다.

use super::row::{RawQuoteRow, SourceColumn};
use crate::error::{DataError, Result};

/// 파싱된 원천 테이블.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteTable {
    pub rows: Vec<RawQuoteRow>,
    /// 첫 행의 `Timestamp` 값 (없거나 비어 있으면 `None`)
    pub timestamp: Option<String>,
}

/// CSV 레코드 목록으로 분해합니다.
fn split_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut line = 1usize;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                field_started = false;
                line += 1;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(DataError::Parse(format!(
            "unterminated quoted field near line {}",
            line
        )));
    }

    if field_started || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    // 빈 줄 제거
    records.retain(|r| !(r.len() == 1 && r[0].trim().is_empty()));
    Ok(records)
}

/// 원천 CSV 내용을 파싱합니다.
///
/// `Instrument` 헤더가 없거나 헤더보다 많은 필드를 가진 행이 있으면 오류입니다.
/// 알 수 없는 컬럼은 무시되고, 누락된 컬럼은 값 없음으로 처리됩니다.
pub fn parse_table(content: &str) -> Result<QuoteTable> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = split_records(content)?.into_iter();

    let header = records
        .next()
        .ok_or_else(|| DataError::Parse("missing header row".to_string()))?;

    let mut seen = Vec::new();
    let columns: Vec<Option<SourceColumn>> = header
        .iter()
        .map(|name| {
            let column = SourceColumn::from_header(name).filter(|c| !seen.contains(c));
            if let Some(c) = column {
                seen.push(c);
            }
            column
        })
        .collect();

    if !seen.contains(&SourceColumn::Instrument) {
        return Err(DataError::Parse("missing Instrument column".to_string()));
    }

    let mut table = QuoteTable::default();
    for (index, record) in records.enumerate() {
        if record.len() > columns.len() {
            return Err(DataError::Parse(format!(
                "row {} has {} fields, header has {}",
                index + 2,
                record.len(),
                columns.len()
            )));
        }

        let mut row = RawQuoteRow::default();
        for (column, value) in columns.iter().zip(record) {
            match column {
                Some(SourceColumn::Timestamp) => {
                    if table.timestamp.is_none() && index == 0 && !value.trim().is_empty() {
                        table.timestamp = Some(value.trim().to_string());
                    }
                }
                Some(column) => row.set(*column, value),
                None => {}
            }
        }
        table.rows.push(row);
    }

    Ok(table)
}

fn escape_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// 행 목록을 원천 CSV 형식으로 직렬화합니다.
pub fn write_table(rows: &[RawQuoteRow], timestamp: &str) -> String {
    let mut out = SourceColumn::ALL
        .iter()
        .map(|c| escape_field(c.header()))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');

    for row in rows {
        let line = SourceColumn::ALL
            .iter()
            .map(|column| match column {
                SourceColumn::Timestamp => escape_field(timestamp),
                other => escape_field(row.get(*other).unwrap_or("")),
            })
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}Instrument,Statut,Dernier_Cours,Capitalisation,Ticker,Timestamp\r\n\
ATTIJARIWAFA BANK,T,\"780,00\",\"167 810 000 000\",ATW,2025-01-06 10:00:00\r\n\
COSUMAR,T,\"212,00\",\"20 030 000 000\",CSR,2025-01-06 10:00:00\r\n";

    #[test]
    fn test_parse_quoted_french_numbers() {
        let table = parse_table(SAMPLE).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.timestamp.as_deref(), Some("2025-01-06 10:00:00"));

        let atw = &table.rows[0];
        assert_eq!(atw.instrument.as_deref(), Some("ATTIJARIWAFA BANK"));
        assert_eq!(atw.dernier_cours.as_deref(), Some("780,00"));
        assert_eq!(atw.capitalisation.as_deref(), Some("167 810 000 000"));
        assert_eq!(atw.ticker.as_deref(), Some("ATW"));
        assert_eq!(atw.company, None);
    }

    #[test]
    fn test_escaped_quotes_and_embedded_newline() {
        let content = "Instrument,Company\nX,\"Say \"\"hi\"\"\nthere\"\n";
        let table = parse_table(content).unwrap();
        assert_eq!(
            table.rows[0].company.as_deref(),
            Some("Say \"hi\"\nthere")
        );
    }

    #[test]
    fn test_missing_instrument_is_error() {
        let err = parse_table("Ticker,Company\nATW,Attijari\n").unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
        assert!(parse_table("").is_err());
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let table = parse_table("Instrument,Timestamp\n").unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.timestamp, None);
    }

    #[test]
    fn test_short_rows_and_unknown_columns() {
        let table = parse_table("Instrument,Extra,Ouverture\nBCP,zzz\n\nCIH,,\"300,5\"\n").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].ouverture, None);
        assert_eq!(table.rows[1].ouverture.as_deref(), Some("300,5"));
    }

    #[test]
    fn test_too_many_fields_is_error() {
        assert!(parse_table("Instrument\nA,B\n").is_err());
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        assert!(parse_table("Instrument\n\"ATW\n").is_err());
    }

    #[test]
    fn test_written_table_is_readable() {
        let mut row = RawQuoteRow::default();
        row.set(SourceColumn::Instrument, "TAQA MOROCCO");
        row.set(SourceColumn::Ticker, "TAQA MOROCCO");
        row.set(SourceColumn::DernierCours, "1 150,00");
        row.set(SourceColumn::Company, "Name, with \"quotes\"");

        let csv = write_table(&[row.clone()], "2025-01-06 11:00:00");
        assert!(csv.starts_with("Instrument,Statut,"));
        assert!(csv.contains("\"1 150,00\""));

        let table = parse_table(&csv).unwrap();
        assert_eq!(table.timestamp.as_deref(), Some("2025-01-06 11:00:00"));
        assert_eq!(table.rows[0].company, row.company);
        assert_eq!(table.rows[0].dernier_cours, row.dernier_cours);
        // 빈 필드는 빈 문자열로 기록됨
        assert_eq!(table.rows[0].ouverture.as_deref(), Some(""));
    }
}
