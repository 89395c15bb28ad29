//! 내장 데모 시세.
//!
//! 원천 파일이 하나도 없을 때 캐시가 대신 제공하는 고정 데이터입니다.
//! 일반 행과 같은 변환 경로를 거치므로 표시 형식이 항상 일치합니다.

use bvc_core::StockQuote;

use super::project_rows;
use crate::source::{RawQuoteRow, SourceColumn};

/// (Instrument, Ticker, 컬럼 값) 목록.
const DEMO_ROWS: [(&str, &str, [(SourceColumn, &str); 14]); 3] = [
    (
        "ATTIJARIWAFA BANK",
        "ATW",
        [
            (SourceColumn::Statut, "T"),
            (SourceColumn::CoursReference, "768,30"),
            (SourceColumn::Ouverture, "770,00"),
            (SourceColumn::DernierCours, "780,00"),
            (SourceColumn::QuantiteEchangee, "86 343"),
            (SourceColumn::Volume, "67 334 876,80"),
            (SourceColumn::VariationPourcentage, "1,52 %"),
            (SourceColumn::PlusHautJour, "784,90"),
            (SourceColumn::PlusBasJour, "770,00"),
            (SourceColumn::MeilleurPrixAchat, "772,00"),
            (SourceColumn::MeilleurPrixVente, "781,90"),
            (SourceColumn::QuantiteMeilleurPrixAchat, "450"),
            (SourceColumn::QuantiteMeilleurPrixVente, "150"),
            (SourceColumn::NombreTransactions, "148"),
        ],
    ),
    (
        "COSUMAR",
        "CSR",
        [
            (SourceColumn::Statut, "T"),
            (SourceColumn::CoursReference, "213,00"),
            (SourceColumn::Ouverture, "211,05"),
            (SourceColumn::DernierCours, "212,00"),
            (SourceColumn::QuantiteEchangee, "109 576"),
            (SourceColumn::Volume, "23 124 352,60"),
            (SourceColumn::VariationPourcentage, "-0,47 %"),
            (SourceColumn::PlusHautJour, "213,95"),
            (SourceColumn::PlusBasJour, "210,20"),
            (SourceColumn::MeilleurPrixAchat, "210,20"),
            (SourceColumn::MeilleurPrixVente, "213,95"),
            (SourceColumn::QuantiteMeilleurPrixAchat, "90"),
            (SourceColumn::QuantiteMeilleurPrixVente, "498"),
            (SourceColumn::NombreTransactions, "87"),
        ],
    ),
    (
        "ITISSALAT AL-MAGHRIB",
        "IAM",
        [
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
            (SourceColumn::NombreTransactions, "135"),
        ],
    ),
];

/// 시가총액 (MAD).
const DEMO_CAPITALISATION: [&str; 3] = ["167 810 000 000", "20 030 000 000", "106 370 000 000"];

/// 데모 원천 행.
pub fn demo_rows() -> Vec<RawQuoteRow> {
    DEMO_ROWS
        .iter()
        .zip(DEMO_CAPITALISATION)
        .map(|((instrument, ticker, values), cap)| {
            let mut row = RawQuoteRow::default();
            row.set(SourceColumn::Instrument, *instrument);
            row.set(SourceColumn::Ticker, *ticker);
            row.set(SourceColumn::Company, *instrument);
            row.set(SourceColumn::Capitalisation, cap);
            for (column, value) in values {
                row.set(*column, *value);
            }
            row
        })
        .collect()
}

/// 데모 시세 집합 (항상 비어 있지 않음).
pub fn demo_quotes() -> Vec<StockQuote> {
    project_rows(&demo_rows())
}
