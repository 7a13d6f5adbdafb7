//! 照合 → 隔離 の連結処理
//!
//! 状態: Idle → Comparing → Reconciled{errors} → (Relocating →) Done。
//! 失敗時は Failed(stage) で終わる。

use crate::config::Config;
use crate::error::{ReconError, Result};
use crate::export::write_report;
use crate::manifest::{load_manifest, ManifestColumns};
use crate::quarantine::{relocate_errors, RelocationOutcome};
use crate::scanner::scan_folder;
use chrono::{Local, NaiveDate};
use manifest_recon_common::layout::ALL_MATCHED_MESSAGE;
use manifest_recon_common::{
    reconcile_with, MatchObserver, ReconcileOptions, ReconciliationResult, ReportOptions, ReportRow,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Comparison,
    Relocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineState {
    Idle,
    Comparing,
    Reconciled { errors: usize },
    Relocating,
    Done,
    Failed(Stage),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }

    pub fn can_transition_to(&self, next: &PipelineState) -> bool {
        use PipelineState::*;

        match (self, next) {
            (_, Failed(_)) => !self.is_terminal(),
            (Idle, Comparing) => true,
            (Comparing, Reconciled { .. }) => true,
            // 移動を要求しない場合もここで終わる
            (Reconciled { .. }, Done) => true,
            (Reconciled { errors }, Relocating) => *errors > 0,
            (Relocating, Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "Idle"),
            PipelineState::Comparing => write!(f, "Comparing"),
            PipelineState::Reconciled { errors } => write!(f, "Reconciled({})", errors),
            PipelineState::Relocating => write!(f, "Relocating"),
            PipelineState::Done => write!(f, "Done"),
            PipelineState::Failed(stage) => write!(f, "Failed({:?})", stage),
        }
    }
}

/// 状態遷移を検査しながら進める
#[derive(Debug)]
pub struct Pipeline {
    state: PipelineState,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self { state: PipelineState::Idle }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn advance(&mut self, next: PipelineState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            return Err(ReconError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        tracing::debug!(from = %self.state, to = %next, "状態遷移");
        self.state = next;
        Ok(())
    }

    /// 処理の失敗を記録して元のエラーを返す
    fn fail<T>(&mut self, stage: Stage, err: ReconError) -> Result<T> {
        self.advance(PipelineState::Failed(stage))?;
        Err(err)
    }
}

/// 照合結果（呼び出し側への受け渡し用）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonOutcome {
    pub success: bool,
    pub message: String,
    pub report_path: String,
    pub error_count: usize,
    pub track_errors: usize,
    pub cover_errors: usize,
    pub report_rows: Vec<ReportRow>,
}

impl ComparisonOutcome {
    pub fn from_result(result: &ReconciliationResult, report_path: &Path) -> Self {
        let error_count = result.error_count();
        let message = if error_count > 0 {
            format!("Найдено {} файлов с различиями", error_count)
        } else {
            ALL_MATCHED_MESSAGE.to_string()
        };

        Self {
            success: true,
            message,
            report_path: report_path.display().to_string(),
            error_count,
            track_errors: result.summary.track_errors,
            cover_errors: result.summary.cover_errors,
            report_rows: result.report_rows(),
        }
    }

    pub fn from_error(err: &ReconError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            report_path: String::new(),
            error_count: 0,
            track_errors: 0,
            cover_errors: 0,
            report_rows: Vec::new(),
        }
    }
}

/// 照合の入力
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub manifest: PathBuf,
    pub folder: PathBuf,
    pub results_dir: PathBuf,
    pub columns: ManifestColumns,
    pub reconcile: ReconcileOptions,
    pub report: ReportOptions,
}

impl CompareRequest {
    pub fn from_config(manifest: &Path, folder: &Path, config: &Config) -> Self {
        Self {
            manifest: manifest.to_path_buf(),
            folder: folder.to_path_buf(),
            results_dir: config.results_dir.clone(),
            columns: ManifestColumns::from(config),
            reconcile: ReconcileOptions { parallel: config.parallel },
            report: ReportOptions { access_token: config.access_token() },
        }
    }
}

/// 照合してレポートを書き出す
pub fn compare(request: &CompareRequest, observer: &dyn MatchObserver) -> Result<(ReconciliationResult, ComparisonOutcome)> {
    // 入力を先に全部確かめる（レポートは作らない）
    if !request.manifest.is_file() {
        return Err(ReconError::ManifestNotFound(request.manifest.display().to_string()));
    }
    let candidates = scan_folder(&request.folder)?;
    let manifest = load_manifest(&request.manifest, &request.columns)?;

    tracing::info!(
        rows = manifest.row_count,
        entries = manifest.entries.len(),
        candidates = candidates.len(),
        "照合を開始します"
    );

    let result = reconcile_with(&manifest.entries, &candidates, &request.reconcile, observer);
    let report_path = write_report(&result, &request.results_dir, &request.report)?;

    let outcome = ComparisonOutcome::from_result(&result, &report_path);
    Ok((result, outcome))
}

/// 連結処理の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub comparison: ComparisonOutcome,
    pub relocation: Option<RelocationOutcome>,
    pub state: PipelineState,
}

/// 照合し、エラーがあり移動が要求されていれば隔離まで行う
///
/// `confirm` は移動の直前に呼ばれ、false なら移動せずに終わる。
pub fn run<F>(
    request: &CompareRequest,
    relocate: bool,
    observer: &dyn MatchObserver,
    confirm: F,
) -> Result<RunOutcome>
where
    F: FnOnce(&ComparisonOutcome) -> bool,
{
    run_on(request, relocate, observer, confirm, Local::now().date_naive())
}

pub fn run_on<F>(
    request: &CompareRequest,
    relocate: bool,
    observer: &dyn MatchObserver,
    confirm: F,
    date: NaiveDate,
) -> Result<RunOutcome>
where
    F: FnOnce(&ComparisonOutcome) -> bool,
{
    let mut pipeline = Pipeline::new();
    pipeline.advance(PipelineState::Comparing)?;

    let comparison = match compare(request, observer) {
        Ok((_, outcome)) => outcome,
        Err(e) => return pipeline.fail(Stage::Comparison, e),
    };

    let errors = comparison.error_count;
    pipeline.advance(PipelineState::Reconciled { errors })?;

    if errors == 0 || !relocate || !confirm(&comparison) {
        pipeline.advance(PipelineState::Done)?;
        return Ok(RunOutcome { comparison, relocation: None, state: pipeline.state() });
    }

    pipeline.advance(PipelineState::Relocating)?;

    let relocation = match relocate_errors(
        &request.manifest,
        Path::new(&comparison.report_path),
        &request.columns.sheet_name,
        &request.columns.track_column,
        date,
    ) {
        Ok(outcome) => outcome,
        Err(e) => return pipeline.fail(Stage::Relocation, e),
    };

    pipeline.advance(PipelineState::Done)?;

    Ok(RunOutcome {
        comparison,
        relocation: Some(relocation),
        state: pipeline.state(),
    })
}
