//! 最終マッピング表（歩掛カテゴリ付き）の出力

use crate::error::Result;
use crate::tables;
use bugakari_common::{build_final_rows, FinalMappingRow};
use std::path::Path;

pub const FINAL_MAPPING_FILE: &str = "final_mapping.csv";
pub const KEYWORD_MAP_FILE: &str = "keyword_map.csv";

/// 正規化済み単価表から最終マッピング表を書き出す
///
/// `keyword_map` が存在しなければ組み込みの判定規則のみ使う。
pub fn run_final(input: &Path, output: &Path, keyword_map: Option<&Path>) -> Result<usize> {
    let rows = tables::read_normalized_rows(input)?;
    let dict = tables::read_keyword_dictionary(keyword_map)?;
    let final_rows = build_final_rows(&rows, &dict);

    let uncategorized = final_rows.iter().filter(|r| r.rate_category.is_empty()).count();
    tracing::info!(rows = final_rows.len(), rules = dict.len(), uncategorized, "final mapping built");

    tables::write_table(output, &FinalMappingRow::COLUMNS, &final_rows)?;
    println!("✔ {}行を出力: {}", final_rows.len(), output.display());

    Ok(final_rows.len())
}
