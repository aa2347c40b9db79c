//! 単価表行の正規化
//!
//! ## 処理フロー
//! 1. 生データ行の見出し整形（[`prepare_row`]）
//! 2. ヘッダー行・小計行・機械運転表の除外
//! 3. 大分類名/工種名の分割、細別名/作業単位の抽出
//! 4. 13列の正規化スキーマへの割り当て

use crate::category::split_category;
use crate::heading::{clean_category_heading, clean_table_heading};
use crate::table_meta::extract_table_meta;
use crate::text::{clean, clean_preserve_spaces, collapse_whitespace};
use crate::types::{NormalizedUnitPriceRow, RawRow, RAW_FIELD_COUNT};
use regex::Regex;

/// 表中に繰り返されるヘッダー
const HEADER_NAME: &str = "名称";
const HEADER_SPEC: &str = "規格";
/// 小計行
const SUBTOTAL_NAME: &str = "計";
/// 列構成が異なるため非対応の表
const MACHINE_RATE_MARKER: &str = "機械運転";

lazy_static::lazy_static! {
    static ref TABLE_WORD_RE: Regex = Regex::new(r"\s*単価表\s*").unwrap();
}

/// 除外理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Header,
    Subtotal,
    MachineRate,
    EmptyName,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Header => write!(f, "ヘッダー行"),
            SkipReason::Subtotal => write!(f, "小計行"),
            SkipReason::MachineRate => write!(f, "機械運転表"),
            SkipReason::EmptyName => write!(f, "名称なし"),
        }
    }
}

/// 正規化の統計情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub total_rows: usize,
    pub output_rows: usize,
    pub header_rows: usize,
    pub subtotal_rows: usize,
    pub machine_rate_rows: usize,
    pub empty_name_rows: usize,
    /// 作業単位を抽出できなかった行
    pub rows_without_unit: usize,
}

impl NormalizeStats {
    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Header => self.header_rows += 1,
            SkipReason::Subtotal => self.subtotal_rows += 1,
            SkipReason::MachineRate => self.machine_rate_rows += 1,
            SkipReason::EmptyName => self.empty_name_rows += 1,
        }
    }
}

/// 生データ行の見出し整形
///
/// 1列目（大分類・工種）と2列目（表題）から見出し番号を除去し、
/// 他の列は軽量クリーニングのみ行う。全列空白の行は `None`。
pub fn prepare_row<S: AsRef<str>>(parts: &[S]) -> Option<RawRow> {
    let raw = RawRow::from_fields(parts)?;

    let mut fields: [String; RAW_FIELD_COUNT] = Default::default();
    fields[0] = collapse_whitespace(&clean_category_heading(&clean_preserve_spaces(raw.category())));
    fields[1] = collapse_whitespace(&clean_table_heading(&clean_preserve_spaces(raw.table_title())));
    for i in 2..RAW_FIELD_COUNT {
        fields[i] = clean_preserve_spaces(&raw.fields[i]);
    }

    Some(RawRow { fields })
}

/// 読み込み直後の行をセル単位でクリーニング
///
/// 1列目は連続空白（列区切り）を保持する。
pub fn clean_raw_row(row: &RawRow) -> RawRow {
    let mut fields: [String; RAW_FIELD_COUNT] = Default::default();
    fields[0] = clean_preserve_spaces(row.category());
    for i in 1..RAW_FIELD_COUNT {
        fields[i] = clean(&row.fields[i]);
    }
    RawRow { fields }
}

/// 正規化対象外の行か判定
pub fn skip_reason(row: &RawRow) -> Option<SkipReason> {
    if row.name() == HEADER_NAME && row.spec() == HEADER_SPEC {
        return Some(SkipReason::Header);
    }
    if row.name() == SUBTOTAL_NAME {
        return Some(SkipReason::Subtotal);
    }
    if row.table_title().contains(MACHINE_RATE_MARKER) {
        return Some(SkipReason::MachineRate);
    }
    if row.name().is_empty() {
        return Some(SkipReason::EmptyName);
    }
    None
}

/// 「単価表」の語を除去（前後の空白は1つに）
fn strip_table_word(text: &str) -> String {
    collapse_whitespace(&TABLE_WORD_RE.replace_all(text, " "))
}

/// 1行を正規化スキーマへ変換する
///
/// 抽出できない項目は空欄のまま（行自体は出力する）。
pub fn normalize_row(row: &RawRow) -> NormalizedUnitPriceRow {
    let (major_category, work_type) = split_category(row.category());
    let meta = extract_table_meta(row.table_title());

    NormalizedUnitPriceRow {
        major_category: strip_table_word(&major_category),
        work_type: strip_table_word(&work_type),
        sub_item_name: strip_table_word(&meta.sub_item_name),
        basic_rate_name: String::new(),
        duration_unit_qty: String::new(),
        duration_unit: String::new(),
        rate_unit_qty: meta.unit_qty,
        rate_unit: meta.unit,
        name: strip_table_word(row.name()),
        spec: strip_table_word(row.spec()),
        unit: row.unit().to_string(),
        quantity: row.quantity().to_string(),
        remarks: strip_table_word(row.remarks()),
    }
}

/// 生データ行を正規化する
///
/// # Returns
/// 正規化済みの行と統計情報
pub fn normalize_rows(rows: &[RawRow]) -> (Vec<NormalizedUnitPriceRow>, NormalizeStats) {
    let mut stats = NormalizeStats {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut output = Vec::with_capacity(rows.len());

    for (index, raw) in rows.iter().enumerate() {
        let row = clean_raw_row(raw);
        if let Some(reason) = skip_reason(&row) {
            tracing::debug!(row = index + 1, %reason, name = row.name(), "skipped");
            stats.record_skip(reason);
            continue;
        }

        let normalized = normalize_row(&row);
        if normalized.rate_unit.is_empty() {
            tracing::debug!(row = index + 1, title = row.table_title(), "work unit not found");
            stats.rows_without_unit += 1;
        }
        output.push(normalized);
    }

    stats.output_rows = output.len();
    (output, stats)
}
