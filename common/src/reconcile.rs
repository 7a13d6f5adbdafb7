//! 照合の集約
//!
//! 台帳の全エントリについて候補全体から最良一致を探し、
//! 信頼度帯・リリース単位の集計と未使用ファイルの検出を行う。
//!
//! 候補は一致しても候補プールから外さない（非排他）。
//! 複数のエントリが同じファイルを最良一致にすることがあり、
//! 「未使用」は誰の最良一致にもならなかった候補だけを指す。

use crate::matcher::{describe_differences, find_best_match, NOT_FOUND_SENTINEL};
use crate::types::{CandidateFile, DeclaredEntry, MatchResult, ReconciliationResult, ReconciliationSummary};
use std::collections::HashSet;

/// 照合の進行を受け取る（ログ・進捗表示用）
///
/// 並列照合時は複数スレッドから呼ばれる。
pub trait MatchObserver: Sync {
    fn on_start(&self, _total: usize) {}
    fn on_match(&self, _result: &MatchResult) {}
    fn on_finish(&self, _summary: &ReconciliationSummary) {}
}

/// 何もしないオブザーバ
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// 照合オプション
#[derive(Debug, Clone, Copy)]
pub struct ReconcileOptions {
    /// エントリごとの照合をスレッドプールで並列実行する
    pub parallel: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// 既定オプション・オブザーバなしで照合する
pub fn reconcile(entries: &[DeclaredEntry], candidates: &[CandidateFile]) -> ReconciliationResult {
    reconcile_with(entries, candidates, &ReconcileOptions::default(), &NoopObserver)
}

/// 照合する
///
/// 結果は常に台帳順。並列でも逐次でも同じ結果になる。
pub fn reconcile_with(
    entries: &[DeclaredEntry],
    candidates: &[CandidateFile],
    options: &ReconcileOptions,
    observer: &dyn MatchObserver,
) -> ReconciliationResult {
    observer.on_start(entries.len());

    let matches = match_all(entries, candidates, options.parallel, observer);

    let claimed: HashSet<&str> = matches
        .iter()
        .filter_map(|m| m.matched_candidate.as_ref())
        .map(|c| c.normalized_name.as_str())
        .collect();

    let unused: Vec<CandidateFile> = candidates
        .iter()
        .filter(|c| !claimed.contains(c.normalized_name.as_str()))
        .cloned()
        .collect();

    let summary = ReconciliationSummary::from_matches(&matches, candidates.len(), unused.len());
    observer.on_finish(&summary);

    ReconciliationResult { matches, unused, summary }
}

fn match_entry(entry: &DeclaredEntry, candidates: &[CandidateFile]) -> MatchResult {
    let best = find_best_match(&entry.declared_name, candidates);

    let differences = match best.candidate {
        Some(candidate) => describe_differences(&entry.declared_name, &candidate.original_name),
        None => NOT_FOUND_SENTINEL.to_string(),
    };

    MatchResult {
        entry: entry.clone(),
        matched_candidate: best.candidate.cloned(),
        similarity: best.score,
        differences,
    }
}

fn match_all(
    entries: &[DeclaredEntry],
    candidates: &[CandidateFile],
    parallel: bool,
    observer: &dyn MatchObserver,
) -> Vec<MatchResult> {
    let observe = |entry: &DeclaredEntry| {
        let result = match_entry(entry, candidates);
        observer.on_match(&result);
        result
    };

    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        // collect は入力順を保つ
        return entries.par_iter().map(observe).collect();
    }

    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    entries.iter().map(observe).collect()
}
