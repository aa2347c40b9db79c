use bugakari_rust::{classify, cli, config, error, export, matcher, normalizer, pipeline};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // config サブコマンドでは値を検証しない（不正値の修正用）
    let config = if matches!(cli.command, Commands::Config { .. }) {
        Config::load_for_edit()?
    } else {
        Config::load()?
    };

    match cli.command {
        Commands::Classify { input, outdir } => {
            println!("📄 bugakari - 表の振り分け\n");
            classify::run_classify(&input, &outdir)?;
            println!("\n✅ 振り分け完了");
        }

        Commands::Prepare { input, output } => {
            println!("🧹 bugakari - 生データ整形\n");
            normalizer::run_prepare(&input, &output)?;
            println!("\n✅ 整形完了");
        }

        Commands::Normalize { input, output } => {
            println!("📐 bugakari - 単価表正規化\n");
            let stats = normalizer::run_normalize(&input, &output)?;
            println!(
                "  除外: ヘッダー {} / 小計 {} / 機械運転 {} / 名称なし {}",
                stats.header_rows, stats.subtotal_rows, stats.machine_rate_rows, stats.empty_name_rows
            );
            if stats.rows_without_unit > 0 {
                println!("  作業単位なし: {}行", stats.rows_without_unit);
            }
            println!("\n✅ 正規化完了");
        }

        Commands::Match { road, unit, outdir, threshold, cat_filter } => {
            println!("🔍 bugakari - アイテム照合\n");
            let options = config.match_options(cat_filter, threshold)?;
            matcher::run_match(&road, &unit, &outdir, options, !cli.verbose)?;
            println!("\n✅ 照合完了");
        }

        Commands::Final { input, output, keyword_map } => {
            println!("📋 bugakari - 最終マッピング表\n");
            let keyword_map = keyword_map.or_else(|| config.keyword_map.clone());
            export::run_final(&input, &output, keyword_map.as_deref())?;
            println!("\n✅ 出力完了");
        }

        Commands::Run { input, road, outdir, threshold, cat_filter } => {
            println!("🚀 bugakari - 一括処理\n");
            let options = config.match_options(cat_filter, threshold)?;
            let summary = pipeline::run_all(&input, &road, &outdir, options, !cli.verbose)?;
            println!(
                "\n✅ 完了 (整形 {}行 / 正規化 {}行 / 候補 {}件 / 未一致 {}件)",
                summary.prepared_rows,
                summary.normalize.output_rows,
                summary.matched.candidates,
                summary.matched.unmatched
            );
        }

        Commands::Config { set_threshold, set_filter, set_keyword_map, show } => {
            let mut config = config;

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 閾値を設定しました: {}", config.threshold);
            }

            if let Some(mode) = set_filter {
                config.set_filter(&mode)?;
                println!("✔ カテゴリ絞り込みを設定しました: {}", config.category_filter);
            }

            if let Some(path) = set_keyword_map {
                config.keyword_map = Some(path);
                config.save()?;
                println!("✔ 歩掛カテゴリ辞書を設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  閾値: {}", config.threshold);
                println!("  カテゴリ絞り込み: {}", config.category_filter);
                println!(
                    "  歩掛カテゴリ辞書: {}",
                    config
                        .keyword_map
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
            }
        }
    }

    Ok(())
}
