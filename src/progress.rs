//! 照合の進捗表示（indicatif）

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use manifest_recon_common::{MatchObserver, MatchResult, ReconciliationSummary};

/// 進捗バーを動かし、1件ごとに debug ログを出すオブザーバ
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message("照合中");
        Self { bar }
    }

    /// 表示なし（--json 出力時など）
    pub fn hidden() -> Self {
        let observer = Self::new();
        observer.bar.set_draw_target(ProgressDrawTarget::hidden());
        observer
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchObserver for ProgressObserver {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn on_match(&self, result: &MatchResult) {
        tracing::debug!(
            row = result.entry.row_index,
            kind = %result.entry.kind,
            declared = %result.entry.declared_name,
            matched = result.matched_candidate.as_ref().map(|c| c.original_name.as_str()).unwrap_or("-"),
            similarity = result.similarity,
            "照合"
        );
        self.bar.inc(1);
    }

    fn on_finish(&self, summary: &ReconciliationSummary) {
        self.bar.finish_and_clear();
        tracing::info!(
            entries = summary.total_entries(),
            errors = summary.error_count(),
            unused = summary.unused_count,
            "照合完了"
        );
    }
}
