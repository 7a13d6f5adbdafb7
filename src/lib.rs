//! Manifest Recon
//!
//! リリース台帳とフォルダの照合（CLIとライブラリ）。
//! 照合エンジン本体は `manifest_recon_common` にあり、ここではファイル入出力を受け持つ。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod manifest;
pub mod pipeline;
pub mod progress;
pub mod quarantine;
pub mod scanner;

pub use error::{ErrorKind, ReconError, Result};
pub use pipeline::{compare, run, CompareRequest, ComparisonOutcome, PipelineState, Stage};
