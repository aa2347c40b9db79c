//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown category filter: {0} (use both, either, or borkind)")]
    UnknownFilter(String),

    #[error("Threshold out of range: {0} (0-100)")]
    InvalidThreshold(i64),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
