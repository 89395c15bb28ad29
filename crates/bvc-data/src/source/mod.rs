//! 원천 데이터: 행 타입, CSV 테이블, 파일 선택, 로드.

pub mod loader;
pub mod resolver;
pub mod row;
pub mod table;

pub use loader::{load_quotes, read_source, LoadOutcome, LoadedQuotes};
pub use resolver::{CandidateFiles, ResolvedSource, SourceResolver};
pub use row::{NormalizedRow, RawQuoteRow, SourceColumn};
pub use table::{parse_table, write_table, QuoteTable};
