//! 道路工事アイテムと正規化済み単価表の照合ステージ

use crate::error::Result;
use crate::tables;
use bugakari_common::matcher::forward_fill;
use bugakari_common::types::ROAD_ITEM_COLUMNS;
use bugakari_common::{CandidateRecord, MatchOptions, MatchOutcome, Matcher};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// 照合結果の出力先と件数
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub candidates_path: PathBuf,
    pub unmatched_path: PathBuf,
    pub items: usize,
    pub candidates: usize,
    pub unmatched: usize,
}

/// 出力ファイル名はアイテム表のファイル名から決める
/// （`道路工事.xlsx` → `道路工事_unit_price_candidates.csv`, `道路工事_unmatched.csv`）
pub fn output_paths(road_items: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = road_items
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("road_items");
    (
        output_dir.join(format!("{}_unit_price_candidates.csv", stem)),
        output_dir.join(format!("{}_unmatched.csv", stem)),
    )
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

pub fn run_match(
    road_items: &Path,
    unit_price: &Path,
    output_dir: &Path,
    options: MatchOptions,
    show_progress: bool,
) -> Result<MatchSummary> {
    let mut items = tables::read_road_items(road_items)?;
    let unit_rows = tables::read_normalized_rows(unit_price)?;
    forward_fill(&mut items);

    println!(
        "- アイテム {}件 / 単価行 {}件 (filter: {}, threshold: {})",
        items.len(),
        unit_rows.len(),
        options.filter,
        options.threshold
    );

    let matcher = Matcher::new(&unit_rows, options);
    let pb = if show_progress {
        progress_bar(items.len())
    } else {
        ProgressBar::hidden()
    };

    let MatchOutcome { candidates, unmatched } = matcher.run_with(&items, |item, found| {
        tracing::debug!(
            item = %item.item_name,
            filtered = found.filtered,
            candidates = found.candidates.len(),
            "matched item"
        );
        pb.inc(1);
    });
    pb.finish_and_clear();

    let (candidates_path, unmatched_path) = output_paths(road_items, output_dir);
    let records: Vec<CandidateRecord> = candidates.iter().map(CandidateRecord::from).collect();
    tables::write_table(&candidates_path, &CandidateRecord::COLUMNS, &records)?;
    tables::write_table(&unmatched_path, &ROAD_ITEM_COLUMNS, &unmatched)?;

    tracing::info!(
        items = items.len(),
        candidates = candidates.len(),
        unmatched = unmatched.len(),
        "match finished"
    );
    println!("✔ 候補 {}件を出力: {}", candidates.len(), candidates_path.display());
    println!("✔ 未一致 {}件を出力: {}", unmatched.len(), unmatched_path.display());

    Ok(MatchSummary {
        candidates_path,
        unmatched_path,
        items: items.len(),
        candidates: candidates.len(),
        unmatched: unmatched.len(),
    })
}
