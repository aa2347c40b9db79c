//! 見出し番号の除去
//!
//! 大分類・工種セルや単価表の表題に混入する見出し番号
//! （`2章`、`(2)`、`①`、`①-2`、`3-6`、`2.`、`2)` など）を取り除く。
//!
//! 規則は (パターン, 置換) の順序付きリストとして定義し、
//! 文字列が変化しなくなるまで繰り返し適用する。

use crate::text::collapse_whitespace;
use regex::Regex;

/// 丸数字 ①〜⑳
const CIRCLED: &str = r"[\u{2460}-\u{2473}]";
/// 各種ダッシュ・長音
const DASH: &str = r"[‐‑–—ー-]";

/// 不動点反復の上限
const MAX_PASSES: usize = 64;

/// 置換規則
struct RewriteRule {
    pattern: Regex,
    replacement: &'static str,
}

impl RewriteRule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// 空白または行端で区切られたトークンだけに一致させる
fn bounded(token: &str) -> String {
    format!(r"(?:^|\s)(?:{})(?:\s|$)", token)
}

lazy_static::lazy_static! {
    /// 先頭の見出し番号
    static ref LEADING_RULES: Vec<RewriteRule> = vec![
        RewriteRule::new(r"^\s*\d+\s*章\s*", " "),
        RewriteRule::new(r"^\s*[（(]\s*\d+\s*[)）]\s*", " "),
        RewriteRule::new(&format!(r"^\s*{CIRCLED}(?:\s*{DASH}\s*\d+)?\s*"), " "),
        RewriteRule::new(&format!(r"^\s*\d+\s*{DASH}\s*\d+\s*"), " "),
        RewriteRule::new(r"^\s*\d+\s*[.)．）]\s*", " "),
    ];

    /// 行中の見出し番号
    static ref ANYWHERE_RULES: Vec<RewriteRule> = vec![
        RewriteRule::new(
            &bounded(&format!(
                r"[（(]\s*\d+\s*[)）]|{CIRCLED}(?:\s*{DASH}\s*\d+)?|\d+\s*{DASH}\s*\d+|{DASH}\s*\d+|\d+\s*[.)．）]"
            )),
            " ",
        ),
        RewriteRule::new(&bounded(r"\d+\s*章"), " "),
        // 語に隣接した丸数字・括弧付き番号
        RewriteRule::new(&format!(r"{CIRCLED}\s*{DASH}\s*\d+"), " "),
        RewriteRule::new(CIRCLED, " "),
        RewriteRule::new(r"[（(]\s*\d+\s*[)）]", " "),
    ];

    static ref TRAILING_DASH_NUMBER_RE: Regex = Regex::new(&format!(r"{DASH}\s*\d+$")).unwrap();
    static ref PAREN_TAIL_RE: Regex = Regex::new(r"\s*[（(].*$").unwrap();
    /// 「工-2」の枝番
    static ref WORK_SUFFIX_NUMBER_RE: Regex = Regex::new(&format!(r"(工)\s*{DASH}\s*\d+\b")).unwrap();
    static ref NUMBERED_TABLE_RE: Regex = Regex::new(r"(単価表)\s*[（(]\s*\d+\s*[)）]").unwrap();
    static ref LEADING_TABLE_WORD_RE: Regex = Regex::new(r"^\s*単価表\s+").unwrap();
}

/// 規則列を不動点まで適用する
fn rewrite_until_stable(text: &str, rules: &[RewriteRule], tidy: fn(&str) -> String) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_PASSES {
        let mut next = current.clone();
        for rule in rules {
            next = rule.apply(&next);
        }
        let next = tidy(&next);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn trim_only(text: &str) -> String {
    text.trim().to_string()
}

/// 先頭の見出し番号を除去する
///
/// 例: `2章 土工` → `土工`、`①-2 舗装工` → `舗装工`
pub fn strip_leading(text: &str) -> String {
    rewrite_until_stable(text, &LEADING_RULES, collapse_whitespace)
}

/// 行中の見出し番号トークンを除去する
///
/// 空白・行端で区切られたトークンのみ対象（`100m³` や `排水材設置工-2` は残る）。
/// 丸数字と括弧付き番号は語に隣接していても除去する。
pub fn strip_anywhere(text: &str) -> String {
    rewrite_until_stable(text, &ANYWHERE_RULES, trim_only)
}

/// 比較用の語幹（末尾の -数字 と括弧以降を除く）
fn comparable_base(token: &str) -> String {
    let base = TRAILING_DASH_NUMBER_RE.replace(token, "");
    PAREN_TAIL_RE.replace(&base, "").into_owned()
}

/// 隣接トークンと同じ語の場合のみ末尾の「-数字」を削除する
///
/// `道路維持修繕 道路維持修繕-1 道路除雪工` → `道路維持修繕 道路維持修繕 道路除雪工`。
/// 単独の `排水材設置工-2` は残す。
pub fn dedupe_trailing_dash_number_when_repeated(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        if !TRAILING_DASH_NUMBER_RE.is_match(token) {
            out.push(token.to_string());
            continue;
        }

        let stripped = TRAILING_DASH_NUMBER_RE.replace(token, "").into_owned();
        let base = comparable_base(&stripped);
        let prev_same = i > 0 && comparable_base(tokens[i - 1]) == base;
        let next_same = i + 1 < tokens.len() && comparable_base(tokens[i + 1]) == base;

        if prev_same || next_same {
            out.push(stripped);
        } else {
            out.push(token.to_string());
        }
    }

    out.join(" ")
}

/// 「〜工-2」の枝番を除去する
pub fn strip_work_suffix_number(text: &str) -> String {
    collapse_whitespace(&WORK_SUFFIX_NUMBER_RE.replace_all(text, "${1} "))
}

/// 大分類・工種セルの見出し整形
pub fn clean_category_heading(text: &str) -> String {
    let text = strip_anywhere(&strip_leading(text));
    let text = dedupe_trailing_dash_number_when_repeated(&text);
    strip_work_suffix_number(&text)
}

/// 単価表の表題の見出し整形
///
/// 見出し番号の除去に加え、`単価表(1)` → `単価表` の統一と、
/// 先頭の `単価表` が後方にも現れる場合の先頭側の削除を行う。
pub fn clean_table_heading(text: &str) -> String {
    let text = strip_anywhere(&strip_leading(text));
    let text = NUMBERED_TABLE_RE.replace_all(&text, "$1").into_owned();
    let text = drop_repeated_leading_table_word(&text);
    let text = dedupe_trailing_dash_number_when_repeated(&collapse_whitespace(&text));
    strip_work_suffix_number(&text)
}

/// `単価表 防水工100m²当り単価表` → `防水工100m²当り単価表`
fn drop_repeated_leading_table_word(text: &str) -> String {
    if let Some(m) = LEADING_TABLE_WORD_RE.find(text) {
        let rest = &text[m.end()..];
        if rest.contains("単価表") {
            return rest.to_string();
        }
    }
    text.to_string()
}
