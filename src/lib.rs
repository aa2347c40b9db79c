//! bugakari: 歩掛単価表の正規化と道路工事アイテム照合
//!
//! コアロジックは `bugakari-common`、このクレートはファイル入出力と各ステージの入口を持つ。

pub mod cli;
pub mod config;
pub mod error;
pub mod tables;
pub mod classify;
pub mod normalizer;
pub mod matcher;
pub mod export;
pub mod pipeline;
