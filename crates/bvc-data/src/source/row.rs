//! 원천 행 타입.
//!
//! 스크래퍼와 CSV 파일이 만들어 내는 행은 문자열 값만 가집니다.
//! 컬럼 존재 여부는 파싱 단계에서 한 번만 확인되고, 이후 단계는
//! `Option` 필드만 다룹니다.

use bvc_core::{normalize_numeric, normalize_text};

/// 원천 테이블 컬럼.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceColumn {
    Instrument,
    Statut,
    CoursReference,
    Ouverture,
    DernierCours,
    QuantiteEchangee,
    Volume,
    VariationPourcentage,
    PlusHautJour,
    PlusBasJour,
    MeilleurPrixAchat,
    MeilleurPrixVente,
    QuantiteMeilleurPrixAchat,
    QuantiteMeilleurPrixVente,
    Capitalisation,
    NombreTransactions,
    Ticker,
    Company,
    /// 구 형식 호환 컬럼 (Dernier_Cours와 같은 값)
    LastPrice,
    Timestamp,
}

impl SourceColumn {
    /// 파일에 기록되는 컬럼 순서.
    pub const ALL: [SourceColumn; 20] = [
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
        SourceColumn::NombreTransactions,
        SourceColumn::Ticker,
        SourceColumn::Company,
        SourceColumn::LastPrice,
        SourceColumn::Timestamp,
    ];

    /// 헤더 이름.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Instrument => "Instrument",
            Self::Statut => "Statut",
            Self::CoursReference => "Cours_Reference",
            Self::Ouverture => "Ouverture",
            Self::DernierCours => "Dernier_Cours",
            Self::QuantiteEchangee => "Quantite_Echangee",
            Self::Volume => "Volume",
            Self::VariationPourcentage => "Variation_Pourcentage",
            Self::PlusHautJour => "Plus_Haut_Jour",
            Self::PlusBasJour => "Plus_Bas_Jour",
            Self::MeilleurPrixAchat => "Meilleur_Prix_Achat",
            Self::MeilleurPrixVente => "Meilleur_Prix_Vente",
            Self::QuantiteMeilleurPrixAchat => "Quantite_Meilleur_Prix_Achat",
            Self::QuantiteMeilleurPrixVente => "Quantite_Meilleur_Prix_Vente",
            Self::Capitalisation => "Capitalisation",
            Self::NombreTransactions => "Nombre_Transactions",
            Self::Ticker => "Ticker",
            Self::Company => "Company",
            Self::LastPrice => "Last Price",
            Self::Timestamp => "Timestamp",
        }
    }

    /// 헤더 이름으로 컬럼을 찾습니다. 알 수 없는 헤더는 `None`.
    pub fn from_header(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.iter().copied().find(|c| c.header() == name)
    }
}

/// 원천 행 (모든 값은 문자열).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuoteRow {
    pub instrument: Option<String>,
    pub ticker: Option<String>,
    pub company: Option<String>,
    pub statut: Option<String>,
    pub cours_reference: Option<String>,
    pub ouverture: Option<String>,
    pub dernier_cours: Option<String>,
    pub quantite_echangee: Option<String>,
    pub volume: Option<String>,
    pub variation_pourcentage: Option<String>,
    pub plus_haut_jour: Option<String>,
    pub plus_bas_jour: Option<String>,
    pub meilleur_prix_achat: Option<String>,
    pub meilleur_prix_vente: Option<String>,
    pub quantite_meilleur_prix_achat: Option<String>,
    pub quantite_meilleur_prix_vente: Option<String>,
    pub capitalisation: Option<String>,
    pub nombre_transactions: Option<String>,
    pub last_price: Option<String>,
}

impl RawQuoteRow {
    fn slot_mut(&mut self, column: SourceColumn) -> Option<&mut Option<String>> {
        let slot = match column {
            SourceColumn::Instrument => &mut self.instrument,
            SourceColumn::Ticker => &mut self.ticker,
            SourceColumn::Company => &mut self.company,
            SourceColumn::Statut => &mut self.statut,
            SourceColumn::CoursReference => &mut self.cours_reference,
            SourceColumn::Ouverture => &mut self.ouverture,
            SourceColumn::DernierCours => &mut self.dernier_cours,
            SourceColumn::QuantiteEchangee => &mut self.quantite_echangee,
            SourceColumn::Volume => &mut self.volume,
            SourceColumn::VariationPourcentage => &mut self.variation_pourcentage,
            SourceColumn::PlusHautJour => &mut self.plus_haut_jour,
            SourceColumn::PlusBasJour => &mut self.plus_bas_jour,
            SourceColumn::MeilleurPrixAchat => &mut self.meilleur_prix_achat,
            SourceColumn::MeilleurPrixVente => &mut self.meilleur_prix_vente,
            SourceColumn::QuantiteMeilleurPrixAchat => &mut self.quantite_meilleur_prix_achat,
            SourceColumn::QuantiteMeilleurPrixVente => &mut self.quantite_meilleur_prix_vente,
            SourceColumn::Capitalisation => &mut self.capitalisation,
            SourceColumn::NombreTransactions => &mut self.nombre_transactions,
            SourceColumn::LastPrice => &mut self.last_price,
            SourceColumn::Timestamp => return None,
        };
        Some(slot)
    }

    /// 컬럼 값을 설정합니다. `Timestamp`는 테이블 단위 값이라 무시됩니다.
    pub fn set(&mut self, column: SourceColumn, value: impl Into<String>) {
        if let Some(slot) = self.slot_mut(column) {
            *slot = Some(value.into());
        }
    }

    /// 컬럼 값을 반환합니다.
    pub fn get(&self, column: SourceColumn) -> Option<&str> {
        let value = match column {
            SourceColumn::Instrument => &self.instrument,
            SourceColumn::Ticker => &self.ticker,
            SourceColumn::Company => &self.company,
            SourceColumn::Statut => &self.statut,
            SourceColumn::CoursReference => &self.cours_reference,
            SourceColumn::Ouverture => &self.ouverture,
            SourceColumn::DernierCours => &self.dernier_cours,
            SourceColumn::QuantiteEchangee => &self.quantite_echangee,
            SourceColumn::Volume => &self.volume,
            SourceColumn::VariationPourcentage => &self.variation_pourcentage,
            SourceColumn::PlusHautJour => &self.plus_haut_jour,
            SourceColumn::PlusBasJour => &self.plus_bas_jour,
            SourceColumn::MeilleurPrixAchat => &self.meilleur_prix_achat,
            SourceColumn::MeilleurPrixVente => &self.meilleur_prix_vente,
            SourceColumn::QuantiteMeilleurPrixAchat => &self.quantite_meilleur_prix_achat,
            SourceColumn::QuantiteMeilleurPrixVente => &self.quantite_meilleur_prix_vente,
            SourceColumn::Capitalisation => &self.capitalisation,
            SourceColumn::NombreTransactions => &self.nombre_transactions,
            SourceColumn::LastPrice => &self.last_price,
            SourceColumn::Timestamp => return None,
        };
        value.as_deref()
    }
}

/// 숫자 컬럼이 정규화된 행.
///
/// 요약 필드와 상세 필드는 모두 이 값에서 파생됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    /// 섹터 조회 키 (정리된 Instrument, 없으면 빈 문자열)
    pub instrument: String,
    pub symbol: String,
    pub name: String,
    pub statut: Option<String>,
    pub cours_reference: Option<f64>,
    pub ouverture: Option<f64>,
    /// Dernier_Cours, 없으면 Last Price
    pub dernier_cours: Option<f64>,
    pub quantite_echangee: Option<f64>,
    /// 거래대금 (MAD)
    pub volume: Option<f64>,
    pub variation_pourcentage: Option<f64>,
    pub plus_haut_jour: Option<f64>,
    pub plus_bas_jour: Option<f64>,
    pub meilleur_prix_achat: Option<f64>,
    pub meilleur_prix_vente: Option<f64>,
    pub quantite_meilleur_prix_achat: Option<f64>,
    pub quantite_meilleur_prix_vente: Option<f64>,
    pub capitalisation: Option<f64>,
    pub nombre_transactions: Option<f64>,
}

fn num(value: &Option<String>) -> Option<f64> {
    normalize_numeric(value.as_deref().into())
}

fn text(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(normalize_text)
}

impl NormalizedRow {
    /// 원천 행을 정규화합니다.
    ///
    /// 식별자(Ticker, Instrument, Company)가 모두 비어 있으면 `None`.
    pub fn from_raw(raw: &RawQuoteRow) -> Option<Self> {
        let instrument = text(&raw.instrument);
        let ticker = text(&raw.ticker);
        let company = text(&raw.company);

        let symbol = ticker
            .or_else(|| instrument.clone())
            .or_else(|| company.clone())?;
        let name = company
            .or_else(|| instrument.clone())
            .unwrap_or_else(|| symbol.clone());

        Some(Self {
            instrument: instrument.unwrap_or_default(),
            symbol,
            name,
            statut: text(&raw.statut),
            cours_reference: num(&raw.cours_reference),
            ouverture: num(&raw.ouverture),
            dernier_cours: num(&raw.dernier_cours).or_else(|| num(&raw.last_price)),
            quantite_echangee: num(&raw.quantite_echangee),
            volume: num(&raw.volume),
            variation_pourcentage: num(&raw.variation_pourcentage),
            plus_haut_jour: num(&raw.plus_haut_jour),
            plus_bas_jour: num(&raw.plus_bas_jour),
            meilleur_prix_achat: num(&raw.meilleur_prix_achat),
            meilleur_prix_vente: num(&raw.meilleur_prix_vente),
            quantite_meilleur_prix_achat: num(&raw.quantite_meilleur_prix_achat),
            quantite_meilleur_prix_vente: num(&raw.quantite_meilleur_prix_vente),
            capitalisation: num(&raw.capitalisation),
            nombre_transactions: num(&raw.nombre_transactions),
        })
    }
}
