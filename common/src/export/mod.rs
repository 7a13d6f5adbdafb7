//! レポート出力モジュール（xlsxバッファ生成）

pub mod report_core;
