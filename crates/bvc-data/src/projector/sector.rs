//! 종목(Instrument) → 섹터 정적 테이블.
//!
//! 키는 거래소 페이지에 표시되는 Instrument 이름 그대로입니다 (대소문자 구분).

use bvc_core::UNKNOWN_SECTOR;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static SECTOR_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("TAQA MOROCCO", "Energy"),
        ("SODEP-Marsa Maroc", "Transportation"),
        ("ARADEI CAPITAL", "Real Estate"),
        ("BALIMA", "Holding"),
        ("IMMORENTE INVEST", "Real Estate"),
        ("CARTIER SAADA", "Consumption"),
        ("COSUMAR", "Food"),
        ("DARI COUSPATE", "Food"),
        ("LESIEUR CRISTAL", "Food"),
        ("MUTANDIS SCA", "Consumption"),
        ("UNIMER", "Food"),
        ("AFMA", "Insurance"),
        ("AGMA", "Insurance"),
        ("ATLANTASANAD", "Insurance"),
        ("SANLAM MAROC", "Insurance"),
        ("WAFA ASSURANCE", "Insurance"),
        ("AFRIC INDUSTRIES SA", "Industry"),
        ("ALUMINIUM DU MAROC", "Industry"),
        ("CIMENTS DU MAROC", "Construction"),
        ("COLORADO", "Construction"),
        ("JET CONTRACTORS", "Construction"),
        ("LAFARGEHOLCIM MAROC", "Construction"),
        ("SONASID", "Industry"),
        ("TGCC S.A", "Construction"),
        ("ATTIJARIWAFA BANK", "Banking"),
        ("BANK OF AFRICA", "Banking"),
        ("BCP", "Banking"),
        ("BMCI", "Banking"),
        ("CDM", "Banking"),
        ("CFG BANK", "Banking"),
        ("CIH", "Banking"),
        ("OULMES", "Beverage"),
        ("SOCIETE DES BOISSONS DU MAROC", "Beverage"),
        ("MAGHREB OXYGENE", "Chemicals"),
        ("SNEP", "Chemicals"),
        ("AUTO HALL", "Automotive"),
        ("AUTO NEJMA", "Automotive"),
        ("ENNAKL", "Automotive"),
        ("FENIE BROSSETTE", "Automotive"),
        ("LABEL VIE", "Retail"),
        ("REALISATIONS MECANIQUES", "Industry"),
        ("STOKVIS NORD AFRIQUE", "Automotive"),
        ("DELATTRE LEVIVIER MAROC", "Industry"),
        ("STROC INDUSTRIE", "Industry"),
        ("ALLIANCES", "Real Estate"),
        ("DOUJA PROM ADDOHA", "Real Estate"),
        ("RESIDENCES DAR SAADA", "Real Estate"),
        ("RISMA", "Tourism"),
        ("DISTY TECHNOLOGIES", "IT"),
        ("DISWAY", "IT"),
        ("HPS", "IT"),
        ("IB MAROC.COM", "IT"),
        ("INVOLYS", "IT"),
        ("M2M Group", "IT"),
        ("MICRODATA", "IT"),
        ("S.M MONETIQUE", "IT"),
        ("MANAGEM", "Mining"),
        ("MINIERE TOUISSIT", "Mining"),
        ("REBAB COMPANY", "Mining"),
        ("SMI", "Mining"),
        ("AFRIQUIA GAZ", "Energy"),
        ("SAMIR", "Energy"),
        ("TOTALENERGIES MARKETING MAROC", "Energy"),
        ("PROMOPHARM S.A.", "Health"),
        ("SOTHEMA", "Health"),
        ("MED PAPER", "Paper"),
        ("DIAC SALAF", "Finance"),
        ("EQDOM", "Finance"),
        ("MAGHREBAIL", "Finance"),
        ("MAROC LEASING", "Finance"),
        ("SALAFIN", "Finance"),
        ("DELTA HOLDING", "Holding"),
        ("ZELLIDJA S.A", "Holding"),
        ("ITISSALAT AL-MAGHRIB", "Telecom"),
        ("CTM", "Transportation"),
        ("AKDITAL", "Health"),
        ("VICENNE", "IT"),
        ("CMGP GROUP", "Agriculture"),
    ]
    .into_iter()
    .collect()
});

/// Instrument 이름으로 섹터를 찾습니다. 없으면 `"Other"`.
pub fn sector_for(instrument: &str) -> &'static str {
    SECTOR_TABLE
        .get(instrument.trim())
        .copied()
        .unwrap_or(UNKNOWN_SECTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_instruments() {
        assert_eq!(sector_for("ITISSALAT AL-MAGHRIB"), "Telecom");
        assert_eq!(sector_for(" COSUMAR "), "Food");
        assert_eq!(sector_for("M2M Group"), "IT");
        assert_eq!(sector_for("m2m group"), "Other");
        assert_eq!(sector_for(""), "Other");
    }
}
