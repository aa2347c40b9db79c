//! 単価表・道路工事アイテムのデータ型

use serde::{Deserialize, Serialize};

/// 生データ1行の列数
pub const RAW_FIELD_COUNT: usize = 7;

/// 正規化済み単価表の列順
pub const NORMALIZED_COLUMNS: [&str; 13] = [
    "大分類名",
    "工種名",
    "細別名",
    "基本歩掛名",
    "所要日数作業単位_数量",
    "所要日数作業単位_単位",
    "歩掛作業単位_数量",
    "歩掛作業単位_単位",
    "名称",
    "規格",
    "単位",
    "数量",
    "摘要",
];

/// 道路工事アイテム表の必須列
pub const ROAD_ITEM_COLUMNS: [&str; 3] = ["カテゴリ名", "サブカテゴリ名", "アイテム名"];

/// 照合入力として必須の単価表列
pub const MATCH_REQUIRED_COLUMNS: [&str; 4] = ["大分類名", "工種名", "細別名", "名称"];

/// OCR/抽出結果の1行（常に7列）
///
/// `[大分類・工種, 表題, 名称, 規格, 単位, 数量, 摘要]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    pub fields: [String; RAW_FIELD_COUNT],
}

impl RawRow {
    /// 任意列数のフィールドを7列に揃える
    ///
    /// 不足分は空文字で埋め、7列目以降はカンマで連結して7列目に入れる。
    /// 全列が空白の行は `None`。
    pub fn from_fields<S: AsRef<str>>(parts: &[S]) -> Option<Self> {
        if parts.iter().all(|p| p.as_ref().trim().is_empty()) {
            return None;
        }

        let mut fields: [String; RAW_FIELD_COUNT] = Default::default();
        for (i, part) in parts.iter().take(RAW_FIELD_COUNT - 1).enumerate() {
            fields[i] = part.as_ref().to_string();
        }
        if parts.len() >= RAW_FIELD_COUNT {
            fields[RAW_FIELD_COUNT - 1] = parts[RAW_FIELD_COUNT - 1..]
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(",");
        }

        Some(Self { fields })
    }

    pub fn category(&self) -> &str {
        &self.fields[0]
    }

    pub fn table_title(&self) -> &str {
        &self.fields[1]
    }

    pub fn name(&self) -> &str {
        &self.fields[2]
    }

    pub fn spec(&self) -> &str {
        &self.fields[3]
    }

    pub fn unit(&self) -> &str {
        &self.fields[4]
    }

    pub fn quantity(&self) -> &str {
        &self.fields[5]
    }

    pub fn remarks(&self) -> &str {
        &self.fields[6]
    }
}

/// 正規化済み単価表の1行
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizedUnitPriceRow {
    #[serde(rename = "大分類名")]
    pub major_category: String,
    #[serde(rename = "工種名")]
    pub work_type: String,
    #[serde(rename = "細別名")]
    pub sub_item_name: String,
    /// 手入力用に空欄
    #[serde(rename = "基本歩掛名")]
    pub basic_rate_name: String,
    /// 手入力用に空欄
    #[serde(rename = "所要日数作業単位_数量")]
    pub duration_unit_qty: String,
    /// 手入力用に空欄
    #[serde(rename = "所要日数作業単位_単位")]
    pub duration_unit: String,
    #[serde(rename = "歩掛作業単位_数量")]
    pub rate_unit_qty: String,
    #[serde(rename = "歩掛作業単位_単位")]
    pub rate_unit: String,
    #[serde(rename = "名称")]
    pub name: String,
    #[serde(rename = "規格")]
    pub spec: String,
    #[serde(rename = "単位")]
    pub unit: String,
    #[serde(rename = "数量")]
    pub quantity: String,
    #[serde(rename = "摘要")]
    pub remarks: String,
}

/// 道路工事の見積アイテム
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadItem {
    #[serde(rename = "カテゴリ名")]
    pub category: String,
    #[serde(rename = "サブカテゴリ名")]
    pub subcategory: String,
    #[serde(rename = "アイテム名")]
    pub item_name: String,
}

impl RoadItem {
    pub fn new(category: &str, subcategory: &str, item_name: &str) -> Self {
        Self {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            item_name: item_name.to_string(),
        }
    }

    /// 未一致判定に使うキー
    pub fn key(&self) -> (String, String, String) {
        (
            self.category.clone(),
            self.subcategory.clone(),
            self.item_name.clone(),
        )
    }
}

/// 照合対象の列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTarget {
    /// 細別名
    #[serde(rename = "細別名")]
    SubItemName,
    /// 名称
    #[serde(rename = "名称")]
    Name,
}

impl std::fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchTarget::SubItemName => write!(f, "細別名"),
            MatchTarget::Name => write!(f, "名称"),
        }
    }
}

/// 照合候補（アイテム × 単価行）
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub item: RoadItem,
    pub row: NormalizedUnitPriceRow,
    pub match_on: MatchTarget,
    /// 0-100
    pub match_score: u8,
}

/// 候補CSVの1行（18列）
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRecord<'a> {
    #[serde(rename = "カテゴリ名")]
    pub category: &'a str,
    #[serde(rename = "サブカテゴリ名")]
    pub subcategory: &'a str,
    #[serde(rename = "アイテム名")]
    pub item_name: &'a str,
    #[serde(rename = "大分類名")]
    pub major_category: &'a str,
    #[serde(rename = "工種名")]
    pub work_type: &'a str,
    #[serde(rename = "細別名")]
    pub sub_item_name: &'a str,
    #[serde(rename = "基本歩掛名")]
    pub basic_rate_name: &'a str,
    #[serde(rename = "所要日数作業単位_数量")]
    pub duration_unit_qty: &'a str,
    #[serde(rename = "所要日数作業単位_単位")]
    pub duration_unit: &'a str,
    #[serde(rename = "歩掛作業単位_数量")]
    pub rate_unit_qty: &'a str,
    #[serde(rename = "歩掛作業単位_単位")]
    pub rate_unit: &'a str,
    #[serde(rename = "名称")]
    pub name: &'a str,
    #[serde(rename = "規格")]
    pub spec: &'a str,
    #[serde(rename = "単位")]
    pub unit: &'a str,
    #[serde(rename = "数量")]
    pub quantity: &'a str,
    #[serde(rename = "摘要")]
    pub remarks: &'a str,
    pub match_on: MatchTarget,
    pub match_score: u8,
}

impl CandidateRecord<'_> {
    /// ヘッダー行（候補が0件でも出力する）
    pub const COLUMNS: [&'static str; 18] = [
        "カテゴリ名",
        "サブカテゴリ名",
        "アイテム名",
        "大分類名",
        "工種名",
        "細別名",
        "基本歩掛名",
        "所要日数作業単位_数量",
        "所要日数作業単位_単位",
        "歩掛作業単位_数量",
        "歩掛作業単位_単位",
        "名称",
        "規格",
        "単位",
        "数量",
        "摘要",
        "match_on",
        "match_score",
    ];
}

impl<'a> From<&'a MatchCandidate> for CandidateRecord<'a> {
    fn from(c: &'a MatchCandidate) -> Self {
        Self {
            category: &c.item.category,
            subcategory: &c.item.subcategory,
            item_name: &c.item.item_name,
            major_category: &c.row.major_category,
            work_type: &c.row.work_type,
            sub_item_name: &c.row.sub_item_name,
            basic_rate_name: &c.row.basic_rate_name,
            duration_unit_qty: &c.row.duration_unit_qty,
            duration_unit: &c.row.duration_unit,
            rate_unit_qty: &c.row.rate_unit_qty,
            rate_unit: &c.row.rate_unit,
            name: &c.row.name,
            spec: &c.row.spec,
            unit: &c.row.unit,
            quantity: &c.row.quantity,
            remarks: &c.row.remarks,
            match_on: c.match_on,
            match_score: c.match_score,
        }
    }
}

/// 未一致アイテム
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnmatchedItem {
    #[serde(rename = "カテゴリ名")]
    pub category: String,
    #[serde(rename = "サブカテゴリ名")]
    pub subcategory: String,
    #[serde(rename = "アイテム名")]
    pub item_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_pads_short_rows() {
        let row = RawRow::from_fields(&["共通工", "表題"]).unwrap();
        assert_eq!(row.category(), "共通工");
        assert_eq!(row.table_title(), "表題");
        assert_eq!(row.remarks(), "");
        assert_eq!(row.fields.len(), RAW_FIELD_COUNT);
    }

    #[test]
    fn test_from_fields_joins_tail() {
        let parts = ["a", "b", "c", "d", "e", "f", "1", "000mm"];
        let row = RawRow::from_fields(&parts).unwrap();
        assert_eq!(row.quantity(), "f");
        assert_eq!(row.remarks(), "1,000mm");
    }

    #[test]
    fn test_from_fields_exact_width() {
        let parts = ["a", "b", "c", "d", "e", "f", "g"];
        let row = RawRow::from_fields(&parts).unwrap();
        assert_eq!(row.remarks(), "g");
    }

    #[test]
    fn test_from_fields_blank_row() {
        assert!(RawRow::from_fields(&["", "  ", ""]).is_none());
        let empty: [&str; 0] = [];
        assert!(RawRow::from_fields(&empty).is_none());
    }

    #[test]
    fn test_match_target_display() {
        assert_eq!(MatchTarget::SubItemName.to_string(), "細別名");
        assert_eq!(MatchTarget::Name.to_string(), "名称");
    }

    #[test]
    fn test_candidate_record_has_eighteen_columns() {
        let candidate = MatchCandidate {
            item: RoadItem::new("舗装工", "切削オーバーレイ工", "路面切削"),
            row: NormalizedUnitPriceRow {
                sub_item_name: "路面切削".to_string(),
                ..Default::default()
            },
            match_on: MatchTarget::SubItemName,
            match_score: 100,
        };
        let record = CandidateRecord::from(&candidate);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value.as_object().unwrap().len(), CandidateRecord::COLUMNS.len());
        assert_eq!(value["match_on"], "細別名");
        for column in CandidateRecord::COLUMNS {
            assert!(value.get(column).is_some(), "missing {}", column);
        }
    }

    #[test]
    fn test_normalized_row_serializes_all_columns() {
        let value = serde_json::to_value(NormalizedUnitPriceRow::default()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), NORMALIZED_COLUMNS.len());
        for column in NORMALIZED_COLUMNS {
            assert!(value.get(column).is_some());
        }
    }
}
