//! 文字列類似度（0-100）
//!
//! 語順に依存しない重み付き類似度 [`weighted_ratio`] を提供する。
//! 基本比率は挿入・削除のみの編集距離（最長共通部分列）を両文字列の長さの和で正規化したもの。
//! 長さの差が大きい場合は部分一致を、近い場合は語順ソート・語集合比較を加味する。

use std::collections::BTreeSet;

/// 語順ソート・語集合比較の重み
const TOKEN_SCALE: f64 = 0.95;
/// 部分一致の重み（長さ比 8 未満）
const PARTIAL_SCALE: f64 = 0.9;
/// 部分一致の重み（長さ比 8 以上）
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// 最長共通部分列の長さ（文字単位）
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// 挿入・削除距離ベースの類似度
///
/// `2 * LCS / (len_a + len_b) * 100`。両方空なら 100。
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// 短い方を長い方の同じ長さの部分文字列と比較した最大類似度
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_len = short.chars().count();
    if short_len == 0 {
        return 0.0;
    }

    let long_chars: Vec<char> = long.chars().collect();
    if long_chars.len() == short_len {
        return ratio(short, long);
    }

    let mut best: f64 = 0.0;
    for window in long_chars.windows(short_len) {
        let candidate: String = window.iter().collect();
        best = best.max(ratio(short, &candidate));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// 語を並べ替えてから比較
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// 語集合の共通部分・差分
struct TokenSets {
    intersection: String,
    only_a: String,
    only_b: String,
}

impl TokenSets {
    fn new(a: &str, b: &str) -> Self {
        let set_a: BTreeSet<&str> = a.split_whitespace().collect();
        let set_b: BTreeSet<&str> = b.split_whitespace().collect();
        let join = |tokens: Vec<&str>| tokens.join(" ");
        Self {
            intersection: join(set_a.intersection(&set_b).copied().collect()),
            only_a: join(set_a.difference(&set_b).copied().collect()),
            only_b: join(set_b.difference(&set_a).copied().collect()),
        }
    }

    fn combined(&self, diff: &str) -> String {
        format!("{} {}", self.intersection, diff).trim().to_string()
    }
}

/// 共通の語を考慮した比較
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let sets = TokenSets::new(a, b);
    if !sets.intersection.is_empty() && (sets.only_a.is_empty() || sets.only_b.is_empty()) {
        return 100.0;
    }

    let combined_a = sets.combined(&sets.only_a);
    let combined_b = sets.combined(&sets.only_b);
    ratio(&sets.intersection, &combined_a)
        .max(ratio(&sets.intersection, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    let sets = TokenSets::new(a, b);
    if !sets.intersection.is_empty() {
        return 100.0;
    }
    partial_ratio(&sets.only_a, &sets.only_b)
}

/// 重み付き類似度（0-100）
///
/// どちらかが空なら 0。
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);
    let base = ratio(a, b);

    if len_ratio < 1.5 {
        return base
            .max(token_sort_ratio(a, b) * TOKEN_SCALE)
            .max(token_set_ratio(a, b) * TOKEN_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 {
        PARTIAL_SCALE
    } else {
        LONG_PARTIAL_SCALE
    };

    base.max(partial_ratio(a, b) * partial_scale)
        .max(partial_token_sort_ratio(a, b) * TOKEN_SCALE * partial_scale)
        .max(partial_token_set_ratio(a, b) * TOKEN_SCALE * partial_scale)
}

/// 整数スコア（切り捨て）
pub fn score(a: &str, b: &str) -> u8 {
    weighted_ratio(a, b).clamp(0.0, 100.0) as u8
}
