//! 大分類名・工種名の分割
//!
//! 1セルに混在する「大分類 工種」を分割する。規則は先に一致したものが優先:
//! 1. 先頭トークン + 空白 + 残り → (先頭トークン, 残り)
//! 2. 2つ以上連続する空白で分割
//! 3. 分割できなければ (空, 全体)
//!
//! 入力は連続空白を潰さずに渡すこと（[`crate::text::clean_preserve_spaces`]）。

use regex::Regex;

lazy_static::lazy_static! {
    static ref LEAD_TOKEN_RE: Regex = Regex::new(r"(?s)^(\S+)\s+(.*)$").unwrap();
    static ref WIDE_GAP_RE: Regex = Regex::new(r"\s{2,}").unwrap();
}

type SplitRule = fn(&str) -> Option<(String, String)>;

/// 優先順の分割規則
const SPLIT_RULES: [SplitRule; 2] = [split_on_lead_token, split_on_wide_gap];

/// 大分類名・工種名に分割する
pub fn split_category(text: &str) -> (String, String) {
    let s = text.replace(['\r', '\n'], " ");
    let s = s.trim().trim_matches(|c| c == '\'' || c == '"');

    SPLIT_RULES
        .iter()
        .find_map(|rule| rule(s))
        .unwrap_or_else(|| (String::new(), s.to_string()))
}

/// 規則1: 先頭トークンを大分類とする
///
/// 残りが同じ大分類で始まる場合（`共通工 共通工 ...`）は重複を除く。
fn split_on_lead_token(s: &str) -> Option<(String, String)> {
    let caps = LEAD_TOKEN_RE.captures(s)?;
    let first = caps[1].to_string();
    let mut rest = caps[2].trim().to_string();

    let duplicated = format!("{} ", first);
    if let Some(stripped) = rest.strip_prefix(&duplicated) {
        rest = stripped.trim().to_string();
    }

    Some((first, rest))
}

/// 規則2: 最初の連続空白で分割
fn split_on_wide_gap(s: &str) -> Option<(String, String)> {
    let m = WIDE_GAP_RE.find(s)?;
    Some((s[..m.start()].trim().to_string(), s[m.end()..].trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lead_token() {
        assert_eq!(
            split_category("共通工 構造物補修工"),
            ("共通工".to_string(), "構造物補修工".to_string())
        );
    }

    #[test]
    fn test_split_keeps_inner_gaps_in_work_type() {
        assert_eq!(
            split_category("共通工 構造物補修工  断面修復工 (左官工法)"),
            ("共通工".to_string(), "構造物補修工  断面修復工 (左官工法)".to_string())
        );
    }

    #[test]
    fn test_split_double_space() {
        assert_eq!(
            split_category("土工  安定処理工(自走式土質改良工)"),
            ("土工".to_string(), "安定処理工(自走式土質改良工)".to_string())
        );
    }

    #[test]
    fn test_split_duplicated_major() {
        assert_eq!(
            split_category("共通工 共通工 仮設工"),
            ("共通工".to_string(), "仮設工".to_string())
        );
    }

    #[test]
    fn test_split_fallback() {
        assert_eq!(split_category("舗装工"), (String::new(), "舗装工".to_string()));
        assert_eq!(split_category(""), (String::new(), String::new()));
        assert_eq!(split_category("\"  \""), (String::new(), String::new()));
    }

    #[test]
    fn test_split_reconstructs_single_space_input() {
        let inputs = ["共通工 構造物補修工", "土工 掘削工 (土砂)", "a b"];
        for input in inputs {
            let (major, work_type) = split_category(input);
            assert_eq!(format!("{} {}", major, work_type), input);
        }
    }

    #[test]
    fn test_wide_gap_rule_alone() {
        assert_eq!(
            split_on_wide_gap("土工  安定処理工"),
            Some(("土工".to_string(), "安定処理工".to_string()))
        );
        assert_eq!(split_on_wide_gap("土工 安定処理工"), None);
    }

    #[test]
    fn test_lead_token_rule_requires_space() {
        assert_eq!(split_on_lead_token("舗装工"), None);
    }
}
