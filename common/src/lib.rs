//! Bugakari Common Library
//!
//! 単価表の正規化とファジー照合のコアロジック（ファイルIOなし）

pub mod types;
pub mod error;
pub mod text;
pub mod heading;
pub mod category;
pub mod table_meta;
pub mod unit_price;
pub mod fuzzy;
pub mod matcher;
pub mod rate_category;
pub mod classify;

pub use types::{
    CandidateRecord, MatchCandidate, MatchTarget, NormalizedUnitPriceRow, RawRow, RoadItem,
    UnmatchedItem,
};
pub use error::{Error, Result};
pub use category::split_category;
pub use table_meta::{extract_table_meta, TableMeta};
pub use unit_price::{normalize_rows, prepare_row, NormalizeStats};
pub use matcher::{match_items, CategoryFilter, ItemMatch, MatchOptions, MatchOutcome, Matcher};
pub use rate_category::{build_final_rows, derive_category, FinalMappingRow, KeywordDictionary, KeywordEntry};
pub use classify::{classify_rows, ClassifiedRows};
