//! 道路工事アイテムと単価表のファジー照合
//!
//! 1. カテゴリ見出しの前方埋め
//! 2. カテゴリ条件で単価行を絞り込み
//! 3. アイテム名と「細別名」「名称」の類似度を計算し、閾値以上を候補とする
//! 4. 候補に一度も現れなかったアイテムを未一致とする

use crate::error::{Error, Result};
use crate::fuzzy;
use crate::text::normalize_for_match;
use crate::types::{MatchCandidate, MatchTarget, NormalizedUnitPriceRow, RoadItem, UnmatchedItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 既定の閾値
pub const DEFAULT_THRESHOLD: u8 = 85;

/// カテゴリによる絞り込み条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CategoryFilter {
    /// 工種名がカテゴリ名・サブカテゴリ名の両方を含む
    #[default]
    Both,
    /// 工種名がどちらか一方を含む
    Either,
    /// 大分類名がカテゴリ名を含む、または工種名がサブカテゴリ名を含む
    Borkind,
}

impl std::str::FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "both" => Ok(CategoryFilter::Both),
            "either" => Ok(CategoryFilter::Either),
            "borkind" => Ok(CategoryFilter::Borkind),
            _ => Err(Error::UnknownFilter(s.to_string())),
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::Both => write!(f, "both"),
            CategoryFilter::Either => write!(f, "either"),
            CategoryFilter::Borkind => write!(f, "borkind"),
        }
    }
}

/// 照合オプション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub filter: CategoryFilter,
    /// 0-100
    pub threshold: u8,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            filter: CategoryFilter::Both,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MatchOptions {
    /// 閾値を検証して生成
    pub fn new(filter: CategoryFilter, threshold: i64) -> Result<Self> {
        let threshold = u8::try_from(threshold)
            .ok()
            .filter(|t| *t <= 100)
            .ok_or(Error::InvalidThreshold(threshold))?;
        Ok(Self { filter, threshold })
    }
}

/// 1アイテム分の照合結果
#[derive(Debug, Clone, Default)]
pub struct ItemMatch {
    /// カテゴリ条件を満たした単価行の件数
    pub filtered: usize,
    pub candidates: Vec<MatchCandidate>,
}

/// 照合結果
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub candidates: Vec<MatchCandidate>,
    pub unmatched: Vec<UnmatchedItem>,
}

/// 比較用に正規化した単価行
struct PreparedRow<'a> {
    row: &'a NormalizedUnitPriceRow,
    major_category: String,
    work_type: String,
    sub_item_name: String,
    name: String,
}

/// 比較用に正規化したアイテム
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedItem {
    pub category: String,
    pub subcategory: String,
    pub item_name: String,
}

impl PreparedItem {
    pub fn new(item: &RoadItem) -> Self {
        Self {
            category: normalize_for_match(&item.category),
            subcategory: normalize_for_match(&item.subcategory),
            item_name: normalize_for_match(&item.item_name),
        }
    }
}

/// カテゴリ見出しの前方埋め
///
/// 空欄のカテゴリ名・サブカテゴリ名は直前の空でない値を引き継ぐ。
pub fn forward_fill(items: &mut [RoadItem]) {
    let mut last_category = String::new();
    let mut last_subcategory = String::new();

    for item in items.iter_mut() {
        if item.category.trim().is_empty() {
            item.category = last_category.clone();
        } else {
            last_category = item.category.clone();
        }

        if item.subcategory.trim().is_empty() {
            item.subcategory = last_subcategory.clone();
        } else {
            last_subcategory = item.subcategory.clone();
        }
    }
}

/// 単価表に対する照合器
pub struct Matcher<'a> {
    rows: Vec<PreparedRow<'a>>,
    options: MatchOptions,
}

impl<'a> Matcher<'a> {
    pub fn new(unit_rows: &'a [NormalizedUnitPriceRow], options: MatchOptions) -> Self {
        let rows = unit_rows
            .iter()
            .map(|row| PreparedRow {
                row,
                major_category: normalize_for_match(&row.major_category),
                work_type: normalize_for_match(&row.work_type),
                sub_item_name: normalize_for_match(&row.sub_item_name),
                name: normalize_for_match(&row.name),
            })
            .collect();
        Self { rows, options }
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// カテゴリ条件を満たすか
    fn passes_filter(&self, item: &PreparedItem, row: &PreparedRow) -> bool {
        let cat = item.category.as_str();
        let sub = item.subcategory.as_str();

        match self.options.filter {
            CategoryFilter::Both => {
                !cat.is_empty()
                    && !sub.is_empty()
                    && row.work_type.contains(cat)
                    && row.work_type.contains(sub)
            }
            CategoryFilter::Either => [cat, sub]
                .iter()
                .any(|term| !term.is_empty() && row.work_type.contains(term)),
            CategoryFilter::Borkind => {
                (!cat.is_empty() && row.major_category.contains(cat))
                    || (!sub.is_empty() && row.work_type.contains(sub))
            }
        }
    }

    /// 1アイテムの候補を列挙する
    ///
    /// アイテム名が空なら候補なし（絞り込みも行わない）。
    pub fn candidates_for(&self, item: &RoadItem) -> ItemMatch {
        let prepared = PreparedItem::new(item);
        let mut result = ItemMatch::default();
        if prepared.item_name.is_empty() {
            return result;
        }

        for row in self.rows.iter().filter(|row| self.passes_filter(&prepared, row)) {
            result.filtered += 1;
            let (match_score, match_on) = best_score(&prepared.item_name, &row.sub_item_name, &row.name);
            if match_score >= self.options.threshold {
                result.candidates.push(MatchCandidate {
                    item: item.clone(),
                    row: row.row.clone(),
                    match_on,
                    match_score,
                });
            }
        }
        result
    }

    /// 全アイテムを照合する（前方埋め済みであること）
    pub fn run(&self, items: &[RoadItem]) -> MatchOutcome {
        self.run_with(items, |_, _| {})
    }

    /// 全アイテムを照合し、1アイテムごとに `on_item` を呼ぶ
    pub fn run_with<F>(&self, items: &[RoadItem], mut on_item: F) -> MatchOutcome
    where
        F: FnMut(&RoadItem, &ItemMatch),
    {
        let mut candidates: Vec<MatchCandidate> = Vec::new();
        for item in items {
            let found = self.candidates_for(item);
            on_item(item, &found);
            candidates.extend(found.candidates);
        }
        let unmatched = collect_unmatched(items, &candidates);
        MatchOutcome {
            candidates,
            unmatched,
        }
    }
}

/// 「細別名」「名称」のうち高い方のスコアと照合対象
///
/// 同点なら細別名を優先する。
pub fn best_score(item_name: &str, sub_item_name: &str, name: &str) -> (u8, MatchTarget) {
    let by_sub_item = fuzzy::score(item_name, sub_item_name);
    let by_name = fuzzy::score(item_name, name);
    if by_sub_item >= by_name {
        (by_sub_item, MatchTarget::SubItemName)
    } else {
        (by_name, MatchTarget::Name)
    }
}

/// 未一致アイテムを抽出する
///
/// 全アイテムの重複なしキーから候補に現れたキーを除いたもの（出現順）。
/// アイテム名が空のものは対象外。
pub fn collect_unmatched(items: &[RoadItem], candidates: &[MatchCandidate]) -> Vec<UnmatchedItem> {
    let matched: HashSet<(String, String, String)> =
        candidates.iter().map(|c| c.item.key()).collect();
    let mut seen = HashSet::new();

    items
        .iter()
        .filter(|item| !normalize_for_match(&item.item_name).is_empty())
        .filter(|item| seen.insert(item.key()))
        .filter(|item| !matched.contains(&item.key()))
        .map(|item| UnmatchedItem {
            category: item.category.clone(),
            subcategory: item.subcategory.clone(),
            item_name: item.item_name.clone(),
        })
        .collect()
}

/// 前方埋めしてから照合する
pub fn match_items(
    items: &[RoadItem],
    unit_rows: &[NormalizedUnitPriceRow],
    options: MatchOptions,
) -> MatchOutcome {
    let mut filled = items.to_vec();
    forward_fill(&mut filled);
    Matcher::new(unit_rows, options).run(&filled)
}
