//! prepare → normalize → match の一括実行

use crate::error::Result;
use crate::matcher::{run_match, MatchSummary};
use crate::normalizer::{run_normalize, run_prepare, NORMALIZED_FILE, PREPARED_FILE};
use crate::tables;
use bugakari_common::{MatchOptions, NormalizeStats};
use std::path::Path;

/// 一括実行の結果
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub prepared_rows: usize,
    pub normalize: NormalizeStats,
    pub matched: MatchSummary,
}

/// 中間ファイルはすべて `output_dir` に書き出し、次の段はそれを読む
pub fn run_all(
    raw_input: &Path,
    road_items: &Path,
    output_dir: &Path,
    options: MatchOptions,
    show_progress: bool,
) -> Result<PipelineSummary> {
    // 入力が欠けていれば何も書き出さない
    tables::ensure_exists(raw_input)?;
    tables::ensure_exists(road_items)?;

    let prepared = output_dir.join(PREPARED_FILE);
    let normalized = output_dir.join(NORMALIZED_FILE);

    println!("[1/3] 生データを整形中...");
    let prepared_rows = run_prepare(raw_input, &prepared)?;

    println!("\n[2/3] 単価表を正規化中...");
    let normalize = run_normalize(&prepared, &normalized)?;

    println!("\n[3/3] アイテムを照合中...");
    let matched = run_match(road_items, &normalized, output_dir, options, show_progress)?;

    Ok(PipelineSummary {
        prepared_rows,
        normalize,
        matched,
    })
}
