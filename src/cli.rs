use bugakari_common::CategoryFilter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bugakari")]
#[command(about = "歩掛単価表の正規化・道路工事アイテム照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// OCRテキストCSVを表 / 単価表に振り分け
    Classify {
        /// OCRテキストCSV
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        outdir: PathBuf,
    },

    /// 単価表の生データから見出し番号を除去して7列に整形
    Prepare {
        /// 単価表の生データCSV
        #[arg(required = true)]
        input: PathBuf,

        /// 出力CSV
        #[arg(short, long, default_value = "unit_price_table_data_raw_cleaned.csv")]
        output: PathBuf,
    },

    /// 7列の生データを正規化スキーマ（13列）へ変換
    Normalize {
        /// 整形済みの生データCSV
        #[arg(required = true)]
        input: PathBuf,

        /// 出力CSV
        #[arg(short, long, default_value = "unit_price_normalized.csv")]
        output: PathBuf,
    },

    /// 道路工事アイテムと単価表を照合
    Match {
        /// 道路工事アイテム表（CSV / xlsx）
        #[arg(short, long, default_value = "道路工事.xlsx")]
        road: PathBuf,

        /// 正規化済み単価表CSV
        #[arg(short, long, default_value = "unit_price_normalized.csv")]
        unit: PathBuf,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        outdir: PathBuf,

        /// 類似度の閾値（0-100、省略時は設定値）
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,

        /// カテゴリ絞り込み (both/either/borkind、省略時は設定値)
        #[arg(long)]
        cat_filter: Option<CategoryFilter>,
    },

    /// 歩掛カテゴリ付きの最終マッピング表を出力
    Final {
        /// 正規化済み単価表CSV
        #[arg(required = true)]
        input: PathBuf,

        /// 出力CSV
        #[arg(short, long, default_value = "final_mapping.csv")]
        output: PathBuf,

        /// 歩掛カテゴリ辞書CSV（type,pattern,value）
        #[arg(short, long)]
        keyword_map: Option<PathBuf>,
    },

    /// 整形・正規化・照合まで一括実行
    Run {
        /// 単価表の生データCSV
        #[arg(required = true)]
        input: PathBuf,

        /// 道路工事アイテム表（CSV / xlsx）
        #[arg(short, long, default_value = "道路工事.xlsx")]
        road: PathBuf,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        outdir: PathBuf,

        /// 類似度の閾値（0-100）
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,

        /// カテゴリ絞り込み (both/either/borkind)
        #[arg(long)]
        cat_filter: Option<CategoryFilter>,
    },

    /// 設定を表示/編集
    Config {
        /// 照合の閾値を設定
        #[arg(long)]
        set_threshold: Option<i64>,

        /// カテゴリ絞り込みを設定 (both/either/borkind)
        #[arg(long)]
        set_filter: Option<String>,

        /// 歩掛カテゴリ辞書CSVを設定
        #[arg(long)]
        set_keyword_map: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
