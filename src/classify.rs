//! OCRテキストCSVの表 / 単価表への振り分け

use crate::error::Result;
use crate::tables;
use bugakari_common::classify_rows;
use std::path::{Path, PathBuf};

pub const TABLES_FILE: &str = "table_data.csv";
pub const UNIT_PRICE_TABLES_FILE: &str = "unit_price_table_data.csv";

/// 振り分け結果
#[derive(Debug, Clone)]
pub struct ClassifySummary {
    pub tables_path: PathBuf,
    pub unit_price_tables_path: PathBuf,
    pub tables: usize,
    pub unit_price_tables: usize,
}

pub fn run_classify(input: &Path, output_dir: &Path) -> Result<ClassifySummary> {
    let rows = tables::read_lines(input)?;
    let total = rows.len();
    let classified = classify_rows(rows);

    let tables_path = output_dir.join(TABLES_FILE);
    let unit_price_tables_path = output_dir.join(UNIT_PRICE_TABLES_FILE);
    tables::write_lines(&tables_path, &classified.tables, true)?;
    tables::write_lines(&unit_price_tables_path, &classified.unit_price_tables, true)?;

    tracing::info!(
        total,
        tables = classified.tables.len(),
        unit_price_tables = classified.unit_price_tables.len(),
        "classified"
    );
    println!("✔ 表: {}行を出力: {}", classified.tables.len(), tables_path.display());
    println!(
        "✔ 単価表: {}行を出力: {}",
        classified.unit_price_tables.len(),
        unit_price_tables_path.display()
    );

    Ok(ClassifySummary {
        tables_path,
        unit_price_tables_path,
        tables: classified.tables.len(),
        unit_price_tables: classified.unit_price_tables.len(),
    })
}
