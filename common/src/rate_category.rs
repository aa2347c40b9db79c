//! 歩掛カテゴリ（労務・資材・機械）の判定と最終マッピング表

use crate::text::{clean, normalize_unit};
use crate::types::NormalizedUnitPriceRow;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MACHINE_KEYWORDS: &[&str] = &[
    "フィニッシャ", "カッタ", "クレーン", "スプレッダ", "レベラ", "ジャンボ", "ショベル", "バックホウ", "ローラ",
];
const MATERIAL_KEYWORDS: &[&str] = &[
    "コンクリート", "接着剤", "鉄筋", "鉄網", "目地材", "砕石", "砂利", "スペーサー", "アスファルト",
];
const LABOR_KEYWORDS: &[&str] = &["作業員", "世話役", "工"];

/// キーワード辞書の1行（`type,pattern,value`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub pattern: String,
    pub value: String,
}

/// カテゴリ判定規則
#[derive(Debug, Clone)]
struct KeywordRule {
    pattern: String,
    /// 正規表現として解釈できない場合は部分一致
    regex: Option<Regex>,
    value: String,
}

impl KeywordRule {
    fn is_match(&self, text: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(text),
            None => text.contains(&self.pattern),
        }
    }
}

/// カテゴリ辞書
#[derive(Debug, Clone, Default)]
pub struct KeywordDictionary {
    rules: Vec<KeywordRule>,
}

impl KeywordDictionary {
    /// `type == "category"` かつパターンが空でない行のみ採用
    pub fn from_entries(entries: &[KeywordEntry]) -> Self {
        let rules = entries
            .iter()
            .filter(|e| e.kind == "category" && !e.pattern.is_empty())
            .map(|e| {
                let regex = Regex::new(&e.pattern).ok();
                if regex.is_none() {
                    tracing::warn!(pattern = %e.pattern, "invalid regex, falling back to substring match");
                }
                KeywordRule {
                    pattern: e.pattern.clone(),
                    regex,
                    value: e.value.clone(),
                }
            })
            .collect();
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn lookup(&self, text: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(text))
            .map(|rule| rule.value.as_str())
    }
}

/// 項目名から歩掛カテゴリを判定する
///
/// 辞書 → 機械 → 資材 → 労務 の順。該当なしは空文字。
pub fn derive_category(name: &str, dict: &KeywordDictionary) -> String {
    let n = clean(name);

    if let Some(value) = dict.lookup(&n) {
        return value.to_string();
    }

    if n.ends_with("運転") || MACHINE_KEYWORDS.iter().any(|k| n.contains(k)) {
        return "機械".to_string();
    }
    if MATERIAL_KEYWORDS.iter().any(|k| n.contains(k)) {
        return "資材".to_string();
    }
    if LABOR_KEYWORDS.iter().any(|k| n.contains(k)) {
        return "労務".to_string();
    }
    String::new()
}

/// 最終マッピング表の1行（14列）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalMappingRow {
    #[serde(rename = "大分類名")]
    pub major_category: String,
    #[serde(rename = "工種名")]
    pub work_type: String,
    #[serde(rename = "細別名")]
    pub sub_item_name: String,
    #[serde(rename = "所要日数作業単位_数量")]
    pub duration_unit_qty: String,
    #[serde(rename = "所要日数作業単位_単位")]
    pub duration_unit: String,
    #[serde(rename = "基本所要日数名")]
    pub basic_duration_name: String,
    #[serde(rename = "基本所要日数")]
    pub basic_duration: String,
    #[serde(rename = "歩掛作業単位_数量")]
    pub rate_unit_qty: String,
    #[serde(rename = "歩掛作業単位_単位")]
    pub rate_unit: String,
    #[serde(rename = "基本歩掛名")]
    pub basic_rate_name: String,
    #[serde(rename = "歩掛カテゴリ")]
    pub rate_category: String,
    #[serde(rename = "項目名")]
    pub item_name: String,
    #[serde(rename = "歩掛数量")]
    pub rate_quantity: String,
    #[serde(rename = "歩掛単位")]
    pub rate_quantity_unit: String,
}

impl FinalMappingRow {
    /// 出力列（この順で書き出す）
    pub const COLUMNS: [&'static str; 14] = [
        "大分類名",
        "工種名",
        "細別名",
        "所要日数作業単位_数量",
        "所要日数作業単位_単位",
        "基本所要日数名",
        "基本所要日数",
        "歩掛作業単位_数量",
        "歩掛作業単位_単位",
        "基本歩掛名",
        "歩掛カテゴリ",
        "項目名",
        "歩掛数量",
        "歩掛単位",
    ];
}

/// 正規化済み単価表から最終マッピング表を作る
pub fn build_final_rows(rows: &[NormalizedUnitPriceRow], dict: &KeywordDictionary) -> Vec<FinalMappingRow> {
    rows.iter()
        .map(|r| FinalMappingRow {
            major_category: r.major_category.clone(),
            work_type: r.work_type.clone(),
            sub_item_name: r.sub_item_name.clone(),
            rate_unit_qty: clean(&r.rate_unit_qty),
            rate_unit: normalize_unit(&r.rate_unit),
            rate_category: derive_category(&r.name, dict),
            item_name: r.name.clone(),
            rate_quantity: clean(&r.quantity),
            rate_quantity_unit: normalize_unit(&r.unit),
            ..Default::default()
        })
        .collect()
}
