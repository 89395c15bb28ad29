//! 시세 저장소.
//!
//! - `file`: 원천 CSV 파일 기록
//! - `postgres`: `stocks` 테이블 upsert
//! - `schema`: 전체 스키마 DDL

pub mod file;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::projector::sector_for;
use crate::source::NormalizedRow;
use bvc_core::to_count;

pub use file::write_source_file;
pub use postgres::{connect_pool, PgQuoteStore};
pub use schema::init_schema;

/// `stocks` 테이블 레코드 (정규화된 숫자 값).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub volume: Option<i64>,
    pub market_cap: Option<f64>,
    pub statut: Option<String>,
    pub cours_reference: Option<f64>,
    pub ouverture: Option<f64>,
    pub plus_haut: Option<f64>,
    pub plus_bas: Option<f64>,
    pub prix_achat: Option<f64>,
    pub prix_vente: Option<f64>,
    pub quantite_achat: Option<i64>,
    pub quantite_vente: Option<i64>,
    pub nombre_transactions: Option<i64>,
}

fn count(value: Option<f64>) -> Option<i64> {
    value.map(|v| to_count(Some(v)))
}

impl From<&NormalizedRow> for StockRecord {
    fn from(row: &NormalizedRow) -> Self {
        Self {
            symbol: row.symbol.clone(),
            name: row.name.clone(),
            sector: sector_for(&row.instrument).to_string(),
            price: row.dernier_cours,
            change: row.variation_pourcentage,
            volume: count(row.quantite_echangee),
            market_cap: row.capitalisation,
            statut: row.statut.clone(),
            cours_reference: row.cours_reference,
            ouverture: row.ouverture,
            plus_haut: row.plus_haut_jour,
            plus_bas: row.plus_bas_jour,
            prix_achat: row.meilleur_prix_achat,
            prix_vente: row.meilleur_prix_vente,
            quantite_achat: count(row.quantite_meilleur_prix_achat),
            quantite_vente: count(row.quantite_meilleur_prix_vente),
            nombre_transactions: count(row.nombre_transactions),
        }
    }
}

/// 정규화된 시세를 보관하는 영속 저장소.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// 심볼 기준 upsert. 반영된 행 수를 반환합니다.
    async fn upsert_quotes(&self, records: &[StockRecord]) -> Result<usize>;
}
