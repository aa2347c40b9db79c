//! 単価表の表題から細別名と作業単位を抽出する
//!
//! `自走式土質改良機設置(撤去) 1台1回当り単価表`
//! → 細別名 `自走式土質改良機設置(撤去)`、数量 `1`、単位 `台1回`
//!
//! 作業単位の表記は揺れが大きいため、構造化の度合いが高い順に
//! 規則を並べ、最初に一致した規則を採用する。

use crate::text::{clean, normalize_unit, to_fullwidth_parens};
use regex::Regex;

/// 数量に使われる文字（数字・桁区切り・〇）
const QTY: &str = r"[0-9０-９,〇○]+";

/// 「当り」の単位になりうる語
const UNIT_CORE: &str = r"(?:空?\s*(?:掛?\s*(?:m²|m2)|m³|m3)|km|m|本|基|構造物|箇所|袋|t|台|日|h|時間|車|式|箇月|月|工事|径間|組|ケーブル|枚|個|穴|孔|橋|トンネル|ブロック)";

lazy_static::lazy_static! {
    static ref TRAILING_TABLE_WORD_RE: Regex = Regex::new(r"\s*単価表\s*$").unwrap();
    static ref ANGLE_NOTE_RE: Regex = Regex::new(r"[<＜]([^>＞]+)[>＞]").unwrap();
    static ref NOTE_COMMA_RE: Regex = Regex::new(r"\s*,\s*").unwrap();
    static ref NOTE_COMMA_RUN_RE: Regex = Regex::new(r"、{2,}").unwrap();

    static ref COMBO_RE: Regex = Regex::new(&format!(
        r"({QTY})\s*(台|基|本|枚|個|ケーブル|ブロック)\s*({QTY})\s*(回)\s*(当り|当たり)"
    )).unwrap();
    static ref SIMPLE_RE: Regex = Regex::new(&format!(
        r"(?i)({QTY})\s*({UNIT_CORE})(\s*\([^)]*\))?\s*(当り|当たり)"
    )).unwrap();
    static ref FALLBACK_RE: Regex = Regex::new(
        r"1\s*(台|基|本|枚|個|ケーブル)\s*1\s*回\s*(当り|当たり)"
    ).unwrap();
    static ref TIMES_ONLY_RE: Regex = Regex::new(&format!(
        r"({QTY})\s*回\s*(当り|当たり)"
    )).unwrap();
}

/// 表題から抽出したメタ情報
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableMeta {
    /// 細別名
    pub sub_item_name: String,
    /// 作業単位の数量（カンマなし）
    pub unit_qty: String,
    /// 作業単位の単位（正規化済み）
    pub unit: String,
}

/// 作業単位パターンの一致結果
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnitSpan {
    start: usize,
    end: usize,
    qty: String,
    unit: String,
    /// 単位に付いた括弧注記（細別名側に戻す）
    annotation: Option<String>,
}

type UnitRule = fn(&str) -> Option<UnitSpan>;

/// 優先順の作業単位規則
const UNIT_RULES: [(&str, UnitRule); 4] = [
    ("combo", match_combo),
    ("simple", match_simple),
    ("fallback", match_fallback),
    ("times_only", match_times_only),
];

/// `1台1回当り` 形式（数量 + 単位 + 回数 + 回 + 当り）
fn match_combo(base: &str) -> Option<UnitSpan> {
    let caps = COMBO_RE.captures(base)?;
    let whole = caps.get(0)?;
    let times = clean(&caps[3]).replace(',', "");
    Some(UnitSpan {
        start: whole.start(),
        end: whole.end(),
        qty: caps[1].to_string(),
        unit: format!("{}{}回", &caps[2], times),
        annotation: None,
    })
}

/// `100m²当り`、`10m(片側)当り` 形式
fn match_simple(base: &str) -> Option<UnitSpan> {
    let caps = SIMPLE_RE.captures(base)?;
    let whole = caps.get(0)?;
    let annotation = caps
        .get(3)
        .map(|m| m.as_str())
        .filter(|a| !a.trim().is_empty())
        .map(to_fullwidth_parens);
    Some(UnitSpan {
        start: whole.start(),
        end: whole.end(),
        qty: caps[1].to_string(),
        unit: normalize_unit(&caps[2]),
        annotation,
    })
}

/// 空白なしの `1台1回当り`
fn match_fallback(base: &str) -> Option<UnitSpan> {
    let caps = FALLBACK_RE.captures(base)?;
    let whole = caps.get(0)?;
    Some(UnitSpan {
        start: whole.start(),
        end: whole.end(),
        qty: "1".to_string(),
        unit: format!("{}1回", &caps[1]),
        annotation: None,
    })
}

/// `1回当り` のみ
fn match_times_only(base: &str) -> Option<UnitSpan> {
    let caps = TIMES_ONLY_RE.captures(base)?;
    let whole = caps.get(0)?;
    Some(UnitSpan {
        start: whole.start(),
        end: whole.end(),
        qty: caps[1].to_string(),
        unit: "回".to_string(),
        annotation: None,
    })
}

/// 山括弧の注記を取り出し、読点区切りに整える
fn take_angle_note(base: &str) -> (String, Option<String>) {
    let Some(caps) = ANGLE_NOTE_RE.captures(base) else {
        return (base.to_string(), None);
    };
    let whole = match caps.get(0) {
        Some(m) => m,
        None => return (base.to_string(), None),
    };

    let note = NOTE_COMMA_RE.replace_all(&caps[1], "、");
    let note = NOTE_COMMA_RUN_RE.replace_all(&note, "、");
    let note = note.trim_matches(|c| c == '、' || c == ' ').trim().to_string();

    let rest = format!("{}{}", &base[..whole.start()], &base[whole.end()..]);
    let note = if note.is_empty() { None } else { Some(note) };
    (rest.trim().to_string(), note)
}

/// 表題から細別名・作業単位を抽出する
///
/// どの規則にも一致しない場合、数量・単位は空で細別名は表題のまま。
pub fn extract_table_meta(table_text: &str) -> TableMeta {
    let cleaned = clean(table_text);
    let base = TRAILING_TABLE_WORD_RE.replace(&cleaned, "").into_owned();
    let (base, angle_note) = take_angle_note(&base);

    let matched = UNIT_RULES
        .iter()
        .find_map(|(label, rule)| rule(&base).map(|span| (*label, span)));

    let (mut name, unit_qty, unit) = match matched {
        Some((label, span)) => {
            tracing::trace!(rule = label, title = %base, "work unit matched");
            let mut name = format!("{}{}", &base[..span.start], &base[span.end..])
                .trim()
                .to_string();
            if let Some(annotation) = &span.annotation {
                name = format!("{}{}", name, annotation).trim().to_string();
            }
            (name, span.qty, span.unit)
        }
        None => (base.clone(), String::new(), String::new()),
    };

    name = name.trim().to_string();
    if let Some(note) = angle_note {
        name = format!("{}（{}）", name, note).trim().to_string();
    }

    TableMeta {
        sub_item_name: name,
        unit_qty: clean(&unit_qty).replace(',', ""),
        unit: normalize_unit(&unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str, qty: &str, unit: &str) -> TableMeta {
        TableMeta {
            sub_item_name: name.to_string(),
            unit_qty: qty.to_string(),
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_simple_area_unit() {
        assert_eq!(
            extract_table_meta("断面修復工(左官工法) 100m²当り単価表"),
            meta("断面修復工(左官工法)", "100", "m²")
        );
    }

    #[test]
    fn test_combo_unit() {
        assert_eq!(
            extract_table_meta("自走式土質改良機設置(撤去) 1台1回当り単価表"),
            meta("自走式土質改良機設置(撤去)", "1", "台1回")
        );
    }

    #[test]
    fn test_combo_with_spaces() {
        assert_eq!(
            extract_table_meta("仮設材設置 1 基 2 回 当たり"),
            meta("仮設材設置", "1", "基2回")
        );
    }

    #[test]
    fn test_simple_unit_with_annotation() {
        assert_eq!(
            extract_table_meta("区画線設置 100m(片側)当り単価表"),
            meta("区画線設置（片側）", "100", "m")
        );
    }

    #[test]
    fn test_simple_unit_normalizes_symbol() {
        assert_eq!(
            extract_table_meta("防水工 1,000m2当り"),
            meta("防水工", "1000", "m²")
        );
        assert_eq!(
            extract_table_meta("掘削工 100㎥当り単価表"),
            meta("掘削工", "100", "m³")
        );
        assert_eq!(
            extract_table_meta("空洞充填工 10空m3当り"),
            meta("空洞充填工", "10", "m³")
        );
    }

    #[test]
    fn test_times_only() {
        assert_eq!(
            extract_table_meta("機材運搬 1回当り単価表"),
            meta("機材運搬", "1", "回")
        );
    }

    #[test]
    fn test_angle_note_is_appended() {
        assert_eq!(
            extract_table_meta("舗装版切断 <As , Co,,> 100m当り単価表"),
            meta("舗装版切断（As、Co）", "100", "m")
        );
    }

    #[test]
    fn test_no_pattern() {
        assert_eq!(
            extract_table_meta("設計単価表"),
            meta("設計", "", "")
        );
        assert_eq!(extract_table_meta(""), TableMeta::default());
    }

    #[test]
    fn test_rule_priority() {
        // 「1台1回当り」は回数のみの規則にも一致するが combo が優先
        let base = "改良機 1台1回当り";
        assert!(match_combo(base).is_some());
        assert!(match_times_only(base).is_some());
        assert_eq!(extract_table_meta(base).unit, "台1回");
    }

    #[test]
    fn test_fallback_rule_alone() {
        let span = match_fallback("1ケーブル1回当り").unwrap();
        assert_eq!(span.unit, "ケーブル1回");
        assert_eq!(span.qty, "1");
        assert_eq!((span.start, span.end), (0, "1ケーブル1回当り".len()));
    }
}
