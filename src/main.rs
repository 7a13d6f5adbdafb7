use anyhow::Context;
use clap::Parser;
use manifest_recon::{cli, config, error, pipeline, progress, quarantine};
use cli::{Cli, Commands};
use config::{mask_token, Config};
use error::ReconError;
use pipeline::{CompareRequest, ComparisonOutcome};
use progress::ProgressObserver;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("❌ {:#}", err);
            let code = err
                .downcast_ref::<ReconError>()
                .map(ReconError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("manifest_recon=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "manifest_recon=info".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Compare { manifest, folder, results, sheet, json } => {
            apply_overrides(&mut config, results, sheet);
            let request = CompareRequest::from_config(&manifest, &folder, &config);

            if !json {
                println!("🎵 manifest-recon - 照合\n");
                println!("[1/2] 台帳とフォルダを照合中...");
            }

            let observer = if json { ProgressObserver::hidden() } else { ProgressObserver::new() };
            let outcome = match pipeline::compare(&request, &observer) {
                Ok((_, outcome)) => outcome,
                Err(e) => {
                    if json {
                        print_json(&ComparisonOutcome::from_error(&e))?;
                    }
                    return Err(e.into());
                }
            };

            if json {
                print_json(&outcome)?;
            } else {
                println!("[2/2] レポートを保存しました");
                print_outcome(&outcome);
                println!("\n✅ 照合完了");
            }
        }

        Commands::Relocate { manifest, report, sheet, yes } => {
            apply_overrides(&mut config, None, sheet);
            println!("📦 manifest-recon - エラー行の隔離\n");

            if !yes && !confirm_relocation(&manifest)? {
                println!("中止しました");
                return Ok(());
            }

            let outcome = quarantine::relocate_errors(
                &manifest,
                &report,
                &config.sheet_name,
                &config.track_column,
                chrono::Local::now().date_naive(),
            )?;

            println!("✔ {}行を移動しました", outcome.moved_count);
            println!("✔ 移動先シート: '{}'", outcome.quarantine_sheet_name);
        }

        Commands::Run { manifest, folder, results, sheet, relocate, yes, json } => {
            apply_overrides(&mut config, results, sheet);
            let request = CompareRequest::from_config(&manifest, &folder, &config);

            if !json {
                println!("🚀 manifest-recon - 一括処理\n");
                println!("[1/2] 台帳とフォルダを照合中...");
            }

            let observer = if json { ProgressObserver::hidden() } else { ProgressObserver::new() };
            // --json では対話しない
            let confirm = |outcome: &ComparisonOutcome| {
                if !json {
                    println!("\n[2/2] エラー行の隔離 ({}件)", outcome.error_count);
                }
                yes || (!json && confirm_relocation(&manifest).unwrap_or(false))
            };

            let outcome = pipeline::run(&request, relocate, &observer, confirm)?;

            if json {
                print_json(&outcome)?;
            } else {
                print_outcome(&outcome.comparison);
                if let Some(relocation) = &outcome.relocation {
                    println!(
                        "✔ {}行を '{}' へ移動しました",
                        relocation.moved_count, relocation.quarantine_sheet_name
                    );
                }
                println!("\n✅ 完了 ({})", outcome.state);
            }
        }

        Commands::Config { set_token, show } => {
            if let Some(token) = set_token {
                config.set_access_token(token)?;
                println!("✔ アクセストークンを設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  シート: {}", config.sheet_name);
                println!("  トラック列: {}", config.track_column);
                println!("  カバー列: {}", config.cover_column);
                println!("  リリース列: {}", config.group_columns.join(", "));
                println!("  出力先: {}", config.results_dir.display());
                println!("  並列照合: {}", if config.parallel { "有効" } else { "無効" });
                println!(
                    "  アクセストークン: {}",
                    config.access_token().map(|t| mask_token(&t)).unwrap_or_else(|| "未設定".into())
                );
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, results: Option<PathBuf>, sheet: Option<String>) {
    if let Some(results) = results {
        config.results_dir = results;
    }
    if let Some(sheet) = sheet {
        config.sheet_name = sheet;
    }
}

fn confirm_relocation(manifest: &Path) -> anyhow::Result<bool> {
    let answer = dialoguer::Confirm::new()
        .with_prompt(format!("{} のエラー行を隔離シートへ移動しますか？", manifest.display()))
        .default(false)
        .interact()?;
    Ok(answer)
}

fn print_outcome(outcome: &ComparisonOutcome) {
    println!("✔ {}", outcome.message);
    if outcome.error_count > 0 {
        println!("  トラック: {} / カバー: {}", outcome.track_errors, outcome.cover_errors);
    }
    println!("✔ レポート: {}", outcome.report_path);
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
