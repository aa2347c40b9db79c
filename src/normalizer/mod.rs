//! 単価表の前処理・正規化ステージ
//!
//! ## 処理フロー
//! 1. `prepare`: OCR生データの見出し番号を除去して7列に整形
//! 2. `normalize`: 7列の生データを13列の正規化スキーマへ変換

use crate::error::Result;
use crate::tables;
use bugakari_common::types::NORMALIZED_COLUMNS;
use bugakari_common::{normalize_rows, prepare_row, NormalizeStats, RawRow};
use std::path::Path;

pub const PREPARED_FILE: &str = "unit_price_table_data_raw_cleaned.csv";
pub const NORMALIZED_FILE: &str = "unit_price_normalized.csv";

/// 見出しを整形した7列の生データを書き出す
///
/// # Returns
/// 出力した行数
pub fn run_prepare(input: &Path, output: &Path) -> Result<usize> {
    let lines = tables::read_lines(input)?;
    let rows: Vec<RawRow> = lines.iter().filter_map(|fields| prepare_row(fields)).collect();

    tracing::info!(input = lines.len(), output = rows.len(), "prepared raw rows");
    tables::write_raw_rows(output, &rows)?;
    println!("✔ {}行を出力: {}", rows.len(), output.display());

    Ok(rows.len())
}

/// 正規化済み単価表を書き出す
pub fn run_normalize(input: &Path, output: &Path) -> Result<NormalizeStats> {
    let raw_rows = tables::read_raw_rows(input)?;
    let (rows, stats) = normalize_rows(&raw_rows);

    tracing::info!(
        total = stats.total_rows,
        output = stats.output_rows,
        header = stats.header_rows,
        subtotal = stats.subtotal_rows,
        machine_rate = stats.machine_rate_rows,
        empty_name = stats.empty_name_rows,
        without_unit = stats.rows_without_unit,
        "normalized"
    );
    tables::write_table(output, &NORMALIZED_COLUMNS, &rows)?;
    println!("✔ {}行を出力: {}", rows.len(), output.display());

    Ok(stats)
}
