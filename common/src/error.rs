//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// レポート（xlsx）生成の失敗
    #[error("Report error: {0}")]
    Report(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_report() {
        let error = Error::Report("シート名設定エラー: invalid".to_string());
        let display = format!("{}", error);
        assert_eq!(display, "Report error: シート名設定エラー: invalid");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Report("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Report"));
        assert!(debug.contains("テスト"));
    }
}
