//! 카사블랑카 증권거래소 시세 페이지 크롤러.
//!
//! `table tbody tr` 행을 두 가지 레이아웃으로 해석합니다:
//! - 전체 레이아웃 (셀 15개 이상): Instrument부터 Capitalisation까지 순서대로,
//!   16번째 셀이 있으면 Nombre_Transactions
//! - 대체 레이아웃 (셀 3개 이상): Ticker, Company, Last Price
//!
//! 그 외 행은 무시됩니다.

use async_trait::async_trait;
use bvc_core::ScraperConfig;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};

use super::QuoteScraper;
use crate::error::{DataError, Result};
use crate::source::{RawQuoteRow, SourceColumn};

const MISSING: &str = "N/A";

/// 전체 레이아웃의 셀 순서 (처음 15개).
const FULL_LAYOUT: [SourceColumn; 15] = [
    SourceColumn::Instrument,
    SourceColumn::Statut,
    SourceColumn::CoursReference,
    SourceColumn::Ouverture,
    SourceColumn::DernierCours,
    SourceColumn::QuantiteEchangee,
    SourceColumn::Volume,
    SourceColumn::VariationPourcentage,
    SourceColumn::PlusHautJour,
    SourceColumn::PlusBasJour,
    SourceColumn::MeilleurPrixAchat,
    SourceColumn::MeilleurPrixVente,
    SourceColumn::QuantiteMeilleurPrixAchat,
    SourceColumn::QuantiteMeilleurPrixVente,
    SourceColumn::Capitalisation,
];

fn full_layout_row(cells: &[String]) -> RawQuoteRow {
    let mut row = RawQuoteRow::default();
    for (column, value) in FULL_LAYOUT.iter().zip(cells) {
        row.set(*column, value.as_str());
    }
    row.set(
        SourceColumn::NombreTransactions,
        cells.get(15).map_or(MISSING, String::as_str),
    );
    // 구 형식 호환 컬럼
    row.set(SourceColumn::Ticker, cells[0].as_str());
    row.set(SourceColumn::Company, cells[0].as_str());
    row.set(SourceColumn::LastPrice, cells[4].as_str());
    row
}

fn fallback_layout_row(cells: &[String]) -> RawQuoteRow {
    let mut row = RawQuoteRow::default();
    for column in FULL_LAYOUT.iter().skip(1) {
        row.set(*column, MISSING);
    }
    row.set(SourceColumn::NombreTransactions, MISSING);
    row.set(SourceColumn::Instrument, cells[0].as_str());
    row.set(SourceColumn::Ticker, cells[0].as_str());
    row.set(SourceColumn::Company, cells[1].as_str());
    row.set(SourceColumn::LastPrice, cells[2].as_str());
    row.set(SourceColumn::DernierCours, cells[2].as_str());
    row
}

/// 시세 페이지 HTML에서 원천 행을 추출합니다.
pub fn parse_market_page(html: &str) -> Result<Vec<RawQuoteRow>> {
    let document = Html::parse_document(html);
    let row_selector =
        Selector::parse("table tbody tr").map_err(|e| DataError::Parse(e.to_string()))?;
    let cell_selector = Selector::parse("td").map_err(|e| DataError::Parse(e.to_string()))?;

    let mut rows = Vec::new();
    for tr in document.select(&row_selector) {
        let cells: Vec<String> = tr
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();

        if cells.len() >= FULL_LAYOUT.len() {
            rows.push(full_layout_row(&cells));
        } else if cells.len() >= 3 {
            rows.push(fallback_layout_row(&cells));
        } else {
            debug!(cells = cells.len(), "Ignoring table row with too few cells");
        }
    }

    Ok(rows)
}

/// HTTP 기반 시세 페이지 크롤러.
pub struct BvcMarketScraper {
    client: Client,
    url: String,
}

impl BvcMarketScraper {
    /// 설정으로 생성합니다.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl QuoteScraper for BvcMarketScraper {
    async fn fetch(&self) -> Result<Vec<RawQuoteRow>> {
        info!(url = %self.url, "Fetching market page");

        let html = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let rows = parse_market_page(&html)?;
        if rows.is_empty() {
            warn!(url = %self.url, "No quote rows found, page layout may have changed");
        } else {
            info!(rows = rows.len(), "Market page scraped");
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &[&[&str]]) -> String {
        let body: String = rows
            .iter()
            .map(|cells| {
                let tds: String = cells.iter().map(|c| format!("<td> {} </td>", c)).collect();
                format!("<tr>{}</tr>", tds)
            })
            .collect();
        format!(
            "<html><body><table><thead><tr><th>Instrument</th></tr></thead><tbody>{}</tbody></table></body></html>",
            body
        )
    }

    #[test]
    fn test_full_layout() {
        let html = page(&[&[
            "ATTIJARIWAFA BANK",
            "T",
            "768,30",
            "770,00",
            "780,00",
            "86 343",
            "67 334 876,80",
            "1,52 %",
            "784,90",
            "770,00",
            "772,00",
            "781,90",
            "450",
            "150",
            "167 810 000 000",
            "148",
        ]]);

        let rows = parse_market_page(&html).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.instrument.as_deref(), Some("ATTIJARIWAFA BANK"));
        assert_eq!(row.ticker.as_deref(), Some("ATTIJARIWAFA BANK"));
        assert_eq!(row.company.as_deref(), Some("ATTIJARIWAFA BANK"));
        assert_eq!(row.dernier_cours.as_deref(), Some("780,00"));
        assert_eq!(row.last_price.as_deref(), Some("780,00"));
        assert_eq!(row.capitalisation.as_deref(), Some("167 810 000 000"));
        assert_eq!(row.nombre_transactions.as_deref(), Some("148"));
    }

    #[test]
    fn test_full_layout_without_transaction_count() {
        let cells: Vec<String> = (0..15).map(|i| format!("c{}", i)).collect();
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        let rows = parse_market_page(&page(&[&refs])).unwrap();
        assert_eq!(rows[0].nombre_transactions.as_deref(), Some("N/A"));
        assert_eq!(rows[0].capitalisation.as_deref(), Some("c14"));
    }

    #[test]
    fn test_fallback_layout_and_short_rows() {
        let html = page(&[&["IAM", "ITISSALAT AL-MAGHRIB", "121,00"], &["x", "y"]]);
        let rows = parse_market_page(&html).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.instrument.as_deref(), Some("IAM"));
        assert_eq!(row.ticker.as_deref(), Some("IAM"));
        assert_eq!(row.company.as_deref(), Some("ITISSALAT AL-MAGHRIB"));
        assert_eq!(row.dernier_cours.as_deref(), Some("121,00"));
        assert_eq!(row.capitalisation.as_deref(), Some("N/A"));
        assert_eq!(row.statut.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_page_without_table() {
        assert!(parse_market_page("<html><body>maintenance</body></html>")
            .unwrap()
            .is_empty());
    }
}
