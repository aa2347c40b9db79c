use thiserror::Error;

#[derive(Error, Debug)]
pub enum BugakariError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("必須列がありません: {column} ({file})")]
    MissingColumn { file: String, column: String },

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel読み込みエラー: {0}")]
    Excel(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] bugakari_common::Error),
}

pub type Result<T> = std::result::Result<T, BugakariError>;
