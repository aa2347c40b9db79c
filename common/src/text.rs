//! テキストクリーニング
//!
//! OCR・表抽出結果のセル文字列を軽量に整形する。
//! - 改行 → 空白、連続空白の圧縮、外側のクォート除去
//! - 全角英数記号（FULLWIDTH系）の半角化
//! - 面積・体積単位の表記統一（m2 → m²、m3 → m³）

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static::lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    // 先頭の「空」は m系単位が続く場合のみ除去
    static ref LEADING_PLACEHOLDER_RE: Regex = Regex::new(r"^\s*空\s*(m²|m2|m³|m3)").unwrap();
}

/// FULLWIDTH系の文字か（全角英数記号・全角通貨記号）
fn is_fullwidth_form(c: char) -> bool {
    ('\u{FF01}'..='\u{FF60}').contains(&c) || ('\u{FFE0}'..='\u{FFE6}').contains(&c)
}

/// 全角英数記号を半角へ（漢字・かな・全角スペースは対象外）
pub fn to_halfwidth(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if is_fullwidth_form(c) {
            result.extend(c.to_string().nfkc());
        } else {
            result.push(c);
        }
    }
    result
}

/// 1文字の単位記号（㎡・㎥）を展開
fn fold_unit_glyphs(text: &str) -> String {
    text.replace('㎡', "m²").replace('㎥', "m³")
}

fn is_edge_noise(c: char) -> bool {
    c.is_whitespace() || c == '\'' || c == '"'
}

/// 改行を空白にする
fn flatten_lines(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// 空白類を1つの半角スペースに圧縮し前後を除去
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// セル文字列をクリーニングする
///
/// 何度適用しても結果は変わらない（冪等）。
pub fn clean(text: &str) -> String {
    let text = to_halfwidth(&flatten_lines(text));
    let text = collapse_whitespace(&text);
    fold_unit_glyphs(text.trim_matches(is_edge_noise))
}

/// 連続空白を保持するクリーニング
///
/// 大分類・工種セルは2つ以上の空白が列区切りを表すため圧縮しない。
pub fn clean_preserve_spaces(text: &str) -> String {
    let text = to_halfwidth(&flatten_lines(text));
    fold_unit_glyphs(text.trim_matches(is_edge_noise))
}

/// 単位表記を統一する
pub fn normalize_unit(unit: &str) -> String {
    let unit = clean(unit);
    let unit = LEADING_PLACEHOLDER_RE.replace(&unit, "$1");
    unit.replace("m^2", "m²")
        .replace("m2", "m²")
        .replace("m^3", "m³")
        .replace("m3", "m³")
}

/// 照合用の正規化（NFKC → 前後空白除去 → 空白圧縮）
pub fn normalize_for_match(text: &str) -> String {
    let text: String = text.nfkc().collect();
    collapse_whitespace(&text)
}

/// 半角括弧を全角括弧へ
pub fn to_fullwidth_parens(text: &str) -> String {
    text.replace('(', "（").replace(')', "）")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_halfwidth() {
        assert_eq!(to_halfwidth("ＡＢＣ１２３"), "ABC123");
        assert_eq!(to_halfwidth("（撤去）"), "(撤去)");
        // 全角スペース・漢字はそのまま
        assert_eq!(to_halfwidth("舗装　工"), "舗装　工");
    }

    #[test]
    fn test_clean_basic() {
        assert_eq!(clean("  舗装工\r\n表層  "), "舗装工 表層");
        assert_eq!(clean("\"共通工\""), "共通工");
        assert_eq!(clean("'  (2) 土工 '"), "(2) 土工");
        assert_eq!(clean("１００㎡当り"), "100m²当り");
    }

    #[test]
    fn test_clean_idempotent() {
        let samples = [
            "  \"' 断面修復工(左官工法)　100m²当り単価表 '\"  ",
            "＂舗装＂",
            "a\r\n\r\nb",
            "",
            "'",
            "１台１回当り",
            "  空㎡  ",
        ];
        for s in samples {
            let once = clean(s);
            assert_eq!(clean(&once), once, "input: {:?}", s);
        }
    }

    #[test]
    fn test_clean_preserve_spaces() {
        assert_eq!(clean_preserve_spaces(" 土工  安定処理工\n"), "土工  安定処理工");
        assert_eq!(clean_preserve_spaces("\"共通工 構造物補修工\""), "共通工 構造物補修工");
    }

    #[test]
    fn test_normalize_unit() {
        assert_eq!(normalize_unit("m2"), "m²");
        assert_eq!(normalize_unit("m^3"), "m³");
        assert_eq!(normalize_unit("㎡"), "m²");
        assert_eq!(normalize_unit("空m3"), "m³");
        assert_eq!(normalize_unit("空 m²"), "m²");
        assert_eq!(normalize_unit("空"), "空");
        assert_eq!(normalize_unit("台1回"), "台1回");
    }

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(normalize_for_match("  ｱｽﾌｧﾙﾄ　舗装  "), "アスファルト 舗装");
        assert_eq!(normalize_for_match("ＡＢ\t\tＣ"), "AB C");
    }

    #[test]
    fn test_to_fullwidth_parens() {
        assert_eq!(to_fullwidth_parens(" (注1)"), " （注1）");
    }
}
