//! Manifest Recon Common Library
//!
//! 台帳（マニフェスト）とフォルダ内ファイルを照合するエンジン。
//! CLIとライブラリ利用側で共有される型と純粋な処理のみを持ち、
//! ファイルシステムには触れない。

pub mod types;
pub mod layout;
pub mod error;
pub mod normalize;
pub mod similarity;
pub mod matcher;
pub mod reconcile;
#[cfg(feature = "excel")]
pub mod export;

pub use types::{
    CandidateFile, ConfidenceBand, DeclaredEntry, EntryKind, GroupStats, MatchResult, MatchStatus,
    ReconciliationResult, ReconciliationSummary, ReportRow, UNGROUPED,
};
pub use error::{Error, Result};
pub use normalize::{normalize, split_extension};
pub use similarity::similarity;
pub use matcher::{describe_differences, find_best_match, BestMatch, NOT_FOUND_SENTINEL};
pub use reconcile::{reconcile, reconcile_with, MatchObserver, NoopObserver, ReconcileOptions};
#[cfg(feature = "excel")]
pub use export::report_core::{render, ReportOptions};
