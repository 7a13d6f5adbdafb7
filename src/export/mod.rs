//! 照合レポートの書き出し

use crate::error::{ReconError, Result};
use chrono::{DateTime, Local};
use manifest_recon_common::{render, ReconciliationResult, ReportOptions};
use std::path::{Path, PathBuf};

const REPORT_PREFIX: &str = "file_comparison_results";

/// レポートファイル名（実行時刻入り）
pub fn report_file_name(at: &DateTime<Local>) -> String {
    format!("{}_{}.xlsx", REPORT_PREFIX, at.format("%Y-%m-%d_%H-%M-%S"))
}

/// 既存ファイルを上書きしない出力パス
///
/// 同じ秒に2回実行された場合は `_1`, `_2` ... を付ける。
fn unique_report_path(results_dir: &Path, at: &DateTime<Local>) -> PathBuf {
    let path = results_dir.join(report_file_name(at));
    if !path.exists() {
        return path;
    }

    let stem = format!("{}_{}", REPORT_PREFIX, at.format("%Y-%m-%d_%H-%M-%S"));
    (1..)
        .map(|n| results_dir.join(format!("{}_{}.xlsx", stem, n)))
        .find(|p| !p.exists())
        .unwrap_or(path)
}

/// レポートを書き出し、そのパスを返す
pub fn write_report(
    result: &ReconciliationResult,
    results_dir: &Path,
    options: &ReportOptions,
) -> Result<PathBuf> {
    write_report_at(result, results_dir, options, &Local::now())
}

pub fn write_report_at(
    result: &ReconciliationResult,
    results_dir: &Path,
    options: &ReportOptions,
    at: &DateTime<Local>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(results_dir)?;

    let buffer = render(result, options)?;
    let output_path = unique_report_path(results_dir, at);

    std::fs::write(&output_path, buffer).map_err(|e| {
        ReconError::ExcelGeneration(format!("{}: {}", output_path.display(), e))
    })?;

    tracing::info!(path = %output_path.display(), "レポートを保存しました");

    Ok(output_path)
}
