//! ステージ一括実行のテスト
//!
//! 一時ディレクトリ上で 整形 → 正規化 → 照合 → 最終マッピング を通しで実行する

use bugakari_common::types::NORMALIZED_COLUMNS;
use bugakari_common::{CandidateRecord, CategoryFilter, FinalMappingRow, MatchOptions};
use bugakari_rust::{classify, export, normalizer, pipeline};
use std::path::Path;
use tempfile::tempdir;

const RAW_CSV: &str = concat!(
    "\"2章 共通工 構造物補修工\",\"断面修復工(左官工法) 100m²当り単価表\",\"普通作業員\",\"\",\"人\",\"1.2\",\"\"\n",
    "\"共通工 構造物補修工\",\"断面修復工(左官工法) 100m²当り単価表\",\"名称\",\"規格\",\"単位\",\"数量\",\"摘要\"\n",
    "\"共通工 構造物補修工\",\"断面修復工(左官工法) 100m²当り単価表\",\"名称\",\"規格\",\"単位\",\"数量\",\"摘要\"\n",
    "\"共通工 構造物補修工\",\"断面修復工(左官工法) 100m²当り単価表\",\"計\",\"\",\"\",\"\",\"\"\n",
    "\"舗装工 切削オーバーレイ工\",\"路面切削 100m²当り単価表\",\"特殊作業員\",\"\",\"人\",\"0.8\",\"\"\n",
);

const ROAD_CSV: &str = concat!(
    "カテゴリ名,サブカテゴリ名,アイテム名\n",
    "舗装工,切削オーバーレイ工,路面切削\n",
    ",,区画線設置\n",
    ",,路面切削\n",
);

fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open output");
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (headers, rows)
}

fn setup(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let raw = dir.join("unit_price_table_data.csv");
    let road = dir.join("道路工事.csv");
    std::fs::write(&raw, RAW_CSV).unwrap();
    std::fs::write(&road, ROAD_CSV).unwrap();
    (raw, road)
}

/// 一括実行: 中間ファイルと照合結果がすべて出力される
#[test]
fn test_run_all_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (raw, road) = setup(dir.path());
    let out = dir.path().join("out");
    let options = MatchOptions::new(CategoryFilter::Borkind, 85).unwrap();

    let summary = pipeline::run_all(&raw, &road, &out, options, false).unwrap();

    assert_eq!(summary.prepared_rows, 5);
    assert_eq!(summary.normalize.header_rows, 2);
    assert_eq!(summary.normalize.subtotal_rows, 1);
    assert_eq!(summary.normalize.output_rows, 2);
    assert_eq!(summary.matched.candidates, 2);
    assert_eq!(summary.matched.unmatched, 1);

    // 正規化済み単価表は13列、ヘッダー行は含まない
    let (headers, rows) = read_table(&out.join(normalizer::NORMALIZED_FILE));
    assert_eq!(headers, NORMALIZED_COLUMNS.to_vec());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.len() == 13));
    assert!(rows.iter().all(|r| r[8] != "名称"));
    assert_eq!(rows[0][0], "共通工");
    assert_eq!(rows[0][1], "構造物補修工");
    assert_eq!(rows[0][2], "断面修復工(左官工法)");
    assert_eq!(rows[0][6], "100");
    assert_eq!(rows[0][7], "m²");

    // 候補は18列
    let (headers, rows) = read_table(&out.join("道路工事_unit_price_candidates.csv"));
    assert_eq!(headers, CandidateRecord::COLUMNS.to_vec());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][2], "路面切削");
    assert_eq!(rows[0][5], "路面切削");
    assert_eq!(rows[0][16], "細別名");
    assert_eq!(rows[0][17], "100");

    // 未一致は前方埋め済みの値
    let (headers, rows) = read_table(&out.join("道路工事_unmatched.csv"));
    assert_eq!(headers, vec!["カテゴリ名", "サブカテゴリ名", "アイテム名"]);
    assert_eq!(rows, vec![vec!["舗装工", "切削オーバーレイ工", "区画線設置"]]);
}

/// カテゴリ名が空のアイテムは both では候補にならない
#[test]
fn test_both_filter_requires_category() {
    let dir = tempdir().expect("Failed to create temp dir");
    let raw = dir.path().join("raw.csv");
    let road = dir.path().join("items.csv");
    std::fs::write(&raw, RAW_CSV).unwrap();
    std::fs::write(&road, "カテゴリ名,サブカテゴリ名,アイテム名\n,切削オーバーレイ工,路面切削\n").unwrap();
    let out = dir.path().join("out");

    let summary = pipeline::run_all(&raw, &road, &out, MatchOptions::default(), false).unwrap();
    assert_eq!(summary.matched.candidates, 0);
    assert_eq!(summary.matched.unmatched, 1);

    // 候補0件でもヘッダー行は出力される
    let (headers, rows) = read_table(&out.join("items_unit_price_candidates.csv"));
    assert_eq!(headers.len(), 18);
    assert!(rows.is_empty());
}

/// 閾値100では完全一致のみ
#[test]
fn test_threshold_is_monotonic() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (raw, road) = setup(dir.path());

    let loose = pipeline::run_all(&raw, &road, &dir.path().join("a"), MatchOptions::new(CategoryFilter::Borkind, 0).unwrap(), false).unwrap();
    let strict = pipeline::run_all(&raw, &road, &dir.path().join("b"), MatchOptions::new(CategoryFilter::Borkind, 100).unwrap(), false).unwrap();

    assert!(strict.matched.candidates <= loose.matched.candidates);
    assert_eq!(strict.matched.candidates, 2);
}

/// 最終マッピング表: 14列と歩掛カテゴリ
#[test]
fn test_final_mapping() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (raw, _road) = setup(dir.path());
    let prepared = dir.path().join(normalizer::PREPARED_FILE);
    let normalized = dir.path().join(normalizer::NORMALIZED_FILE);
    normalizer::run_prepare(&raw, &prepared).unwrap();
    normalizer::run_normalize(&prepared, &normalized).unwrap();

    let keyword_map = dir.path().join(export::KEYWORD_MAP_FILE);
    std::fs::write(&keyword_map, "type,pattern,value\ncategory,^特殊,特殊労務\n").unwrap();
    let output = dir.path().join(export::FINAL_MAPPING_FILE);

    let count = export::run_final(&normalized, &output, Some(keyword_map.as_path())).unwrap();
    assert_eq!(count, 2);

    let (headers, rows) = read_table(&output);
    assert_eq!(headers, FinalMappingRow::COLUMNS.to_vec());
    assert_eq!(rows[0][10], "労務");
    assert_eq!(rows[0][11], "普通作業員");
    assert_eq!(rows[0][12], "1.2");
    assert_eq!(rows[0][13], "人");
    assert_eq!(rows[1][10], "特殊労務");
    assert!(rows[0][5].is_empty());
}

/// OCRテキストの振り分け
#[test]
fn test_classify_stage() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("Sheet1.csv");
    std::fs::write(
        &input,
        concat!(
            "\"土工\",\"掘削工 100m³当り単価表\",\"普通作業員\"\n",
            "\"土工\",\"表-1 規格一覧\",\"a\"\n",
            "\"土工\",\"本文\",\"b\"\n",
        ),
    )
    .unwrap();

    let summary = classify::run_classify(&input, dir.path()).unwrap();
    assert_eq!(summary.tables, 1);
    assert_eq!(summary.unit_price_tables, 1);

    let content = std::fs::read_to_string(&summary.unit_price_tables_path).unwrap();
    assert_eq!(content.trim_end(), "\"土工\",\"掘削工 100m³当り単価表\",\"普通作業員\"");
}
