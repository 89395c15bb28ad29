//! 원천 행 → `StockQuote` 변환.
//!
//! 숫자 컬럼은 `NormalizedRow`에서 한 번만 정규화되고, 요약 필드와
//! 상세 필드는 모두 그 값에서 파생됩니다. 부수 효과가 없는 순수 함수입니다.

pub mod mock;
pub mod sector;

use bvc_core::{
    display_amount, display_count, display_percent, market_cap_label, to_count, QuoteDetails,
    StockQuote,
};
use tracing::warn;

use crate::source::{NormalizedRow, RawQuoteRow};
pub use sector::sector_for;

/// 정규화된 행을 시세로 변환합니다.
pub fn project(row: &NormalizedRow) -> StockQuote {
    let sector = sector_for(&row.instrument).to_string();
    let market_cap = market_cap_label(row.capitalisation);
    let price = row.dernier_cours.unwrap_or(0.0);
    let change = row.variation_pourcentage.unwrap_or(0.0);
    let volume = to_count(row.quantite_echangee);

    let details = QuoteDetails {
        statut: row.statut.clone().unwrap_or_else(|| "-".to_string()),
        cours_reference: display_amount(row.cours_reference),
        ouverture: display_amount(row.ouverture),
        dernier_cours: display_amount(row.dernier_cours),
        quantite_echangee: display_count(row.quantite_echangee),
        volume_mad: display_amount(row.volume),
        variation_pourcentage: display_percent(row.variation_pourcentage),
        plus_haut_jour: display_amount(row.plus_haut_jour),
        plus_bas_jour: display_amount(row.plus_bas_jour),
        meilleur_prix_achat: display_amount(row.meilleur_prix_achat),
        meilleur_prix_vente: display_amount(row.meilleur_prix_vente),
        quantite_meilleur_prix_achat: display_count(row.quantite_meilleur_prix_achat),
        quantite_meilleur_prix_vente: display_count(row.quantite_meilleur_prix_vente),
        capitalisation: market_cap.clone(),
        nombre_transactions: display_count(row.nombre_transactions),
        price,
        change,
        volume,
        sector: sector.clone(),
        market_cap: market_cap.clone(),
        description: format!("{}, {} sector, Casablanca Stock Exchange", row.name, sector),
        symbol: row.symbol.clone(),
        name: row.name.clone(),
    };

    StockQuote {
        symbol: row.symbol.clone(),
        name: row.name.clone(),
        price,
        change_percent: change,
        volume,
        sector,
        market_cap_label: market_cap,
        details,
    }
}

/// 원천 행 목록을 정규화하고 변환합니다.
///
/// 식별자가 없는 행은 경고 후 건너뜁니다.
pub fn project_rows(rows: &[RawQuoteRow]) -> Vec<StockQuote> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, raw)| match NormalizedRow::from_raw(raw) {
            Some(row) => Some(project(&row)),
            None => {
                warn!(row = index, "Skipping source row without instrument identifier");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceColumn;

    fn raw(pairs: &[(SourceColumn, &str)]) -> RawQuoteRow {
        let mut row = RawQuoteRow::default();
        for (column, value) in pairs {
            row.set(*column, *value);
        }
        row
    }

    fn quote_with_cap(cap: &str) -> StockQuote {
        let rows = [raw(&[
            (SourceColumn::Instrument, "TAQA MOROCCO"),
            (SourceColumn::Capitalisation, cap),
        ])];
        project_rows(&rows).remove(0)
    }

    #[test]
    fn test_market_cap_labels() {
        assert_eq!(quote_with_cap("1500000000").market_cap_label, "1.50 B MAD");
        assert_eq!(quote_with_cap("25000000").market_cap_label, "25.00 M MAD");
        assert_eq!(quote_with_cap("500").market_cap_label, "500.00 MAD");
        assert_eq!(quote_with_cap("0").market_cap_label, "N/A");
        assert_eq!(quote_with_cap("-").market_cap_label, "N/A");
        assert_eq!(
            quote_with_cap("1 500 000 000").details.capitalisation,
            "1.50 B MAD"
        );
    }

    #[test]
    fn test_full_row_projection() {
        let row = raw(&[
            (SourceColumn::Instrument, "ITISSALAT AL-MAGHRIB"),
            (SourceColumn::Ticker, "IAM"),
            (SourceColumn::Statut, "T"),
            (SourceColumn::CoursReference, "121,10"),
            (SourceColumn::Ouverture, "121,00"),
            (SourceColumn::DernierCours, "121,00"),
            (SourceColumn::QuantiteEchangee, "216 625"),
            (SourceColumn::Volume, "26 198 500,70"),
            (SourceColumn::VariationPourcentage, "-0,08 %"),
            (SourceColumn::PlusHautJour, "121,45"),
            (SourceColumn::PlusBasJour, "120,00"),
            (SourceColumn::MeilleurPrixAchat, "120,00"),
            (SourceColumn::MeilleurPrixVente, "121,40"),
            (SourceColumn::QuantiteMeilleurPrixAchat, "20"),
            (SourceColumn::QuantiteMeilleurPrixVente, "15"),
            (SourceColumn::Capitalisation, "106 370 000 000"),
            (SourceColumn::NombreTransactions, "135"),
        ]);
        let quote = project(&NormalizedRow::from_raw(&row).unwrap());

        assert_eq!(quote.symbol, "IAM");
        assert_eq!(quote.name, "ITISSALAT AL-MAGHRIB");
        assert_eq!(quote.sector, "Telecom");
        assert_eq!(quote.price, 121.0);
        assert_eq!(quote.change_percent, -0.08);
        assert_eq!(quote.volume, 216_625);
        assert_eq!(quote.market_cap_label, "106.37 B MAD");

        let d = &quote.details;
        assert_eq!(d.statut, "T");
        assert_eq!(d.cours_reference, "121.10");
        assert_eq!(d.dernier_cours, "121.00");
        assert_eq!(d.quantite_echangee, "216625");
        assert_eq!(d.volume_mad, "26198500.70");
        assert_eq!(d.variation_pourcentage, "-0.08%");
        assert_eq!(d.quantite_meilleur_prix_vente, "15");
        assert_eq!(d.nombre_transactions, "135");
        assert_eq!(d.price, quote.price);
        assert_eq!(d.volume, quote.volume);
        assert_eq!(d.market_cap, quote.market_cap_label);
        assert_eq!(
            d.description,
            "ITISSALAT AL-MAGHRIB, Telecom sector, Casablanca Stock Exchange"
        );
    }

    #[test]
    fn test_missing_values_use_sentinels() {
        let quote = project_rows(&[raw(&[
            (SourceColumn::Instrument, "UNLISTED CO"),
            (SourceColumn::DernierCours, "N/A"),
            (SourceColumn::QuantiteEchangee, "-"),
        ])])
        .remove(0);

        assert_eq!(quote.sector, "Other");
        assert_eq!(quote.price, 0.0);
        assert_eq!(quote.change_percent, 0.0);
        assert_eq!(quote.volume, 0);
        assert_eq!(quote.details.statut, "-");
        assert_eq!(quote.details.ouverture, "-");
        assert_eq!(quote.details.quantite_echangee, "0");
        assert_eq!(quote.details.variation_pourcentage, "0.00%");
        assert_eq!(quote.details.nombre_transactions, "0");
        assert_eq!(quote.market_cap_label, "N/A");
    }

    #[test]
    fn test_counts_are_floored() {
        let quote = project_rows(&[raw(&[
            (SourceColumn::Instrument, "BCP"),
            (SourceColumn::QuantiteEchangee, "10,9"),
            (SourceColumn::NombreTransactions, "3,99"),
        ])])
        .remove(0);
        assert_eq!(quote.volume, 10);
        assert_eq!(quote.details.quantite_echangee, "10");
        assert_eq!(quote.details.nombre_transactions, "3");
    }

    #[test]
    fn test_sector_uses_instrument_not_ticker() {
        let quote = project_rows(&[raw(&[
            (SourceColumn::Instrument, "COSUMAR"),
            (SourceColumn::Ticker, "CSR"),
        ])])
        .remove(0);
        assert_eq!(quote.symbol, "CSR");
        assert_eq!(quote.sector, "Food");
    }

    #[test]
    fn test_rows_without_identifier_are_skipped() {
        let rows = [
            raw(&[(SourceColumn::Instrument, "  ")]),
            raw(&[(SourceColumn::Instrument, "CIH")]),
        ];
        let quotes = project_rows(&rows);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "CIH");
    }
}
