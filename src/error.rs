use thiserror::Error;

/// エラーの分類（終了コード・呼び出し側の判定用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力パス・必須列の不備。レポートは作らない
    Input,
    /// スプレッドシートが読めない
    DataRead,
    /// 台帳への移動処理の失敗。台帳は変更されない
    Relocation,
    Io,
    Internal,
}

#[derive(Error, Debug)]
pub enum ReconError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("Excelファイルが見つかりません: {0}")]
    ManifestNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("フォルダ読み込みエラー: {0}")]
    FolderRead(String),

    #[error("レポートファイルが見つかりません: {0}")]
    ReportNotFound(String),

    #[error("シート '{sheet}' が見つかりません: {path}")]
    SheetNotFound { path: String, sheet: String },

    #[error("必須の列がありません: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("Excel読み込みエラー: {0}")]
    ManifestRead(String),

    #[error("レポート読み込みエラー: {0}")]
    ReportRead(String),

    #[error("移動対象のエラー行がレポートにありません: {0}")]
    EmptyErrorSet(String),

    #[error("隔離シート名が主シート名と衝突しています: {0}")]
    QuarantineCollision(String),

    #[error("隔離処理エラー: {0}")]
    Relocation(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("不正な状態遷移: {from} → {to}")]
    InvalidTransition { from: String, to: String },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] manifest_recon_common::Error),
}

impl ReconError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconError::ManifestNotFound(_)
            | ReconError::FolderNotFound(_)
            | ReconError::ReportNotFound(_)
            | ReconError::SheetNotFound { .. }
            | ReconError::MissingColumns(_) => ErrorKind::Input,
            ReconError::ManifestRead(_) | ReconError::ReportRead(_) => ErrorKind::DataRead,
            ReconError::EmptyErrorSet(_)
            | ReconError::QuarantineCollision(_)
            | ReconError::Relocation(_) => ErrorKind::Relocation,
            ReconError::Io(_) | ReconError::FolderRead(_) => ErrorKind::Io,
            ReconError::Config(_)
            | ReconError::ExcelGeneration(_)
            | ReconError::InvalidTransition { .. }
            | ReconError::JsonParse(_)
            | ReconError::Common(_) => ErrorKind::Internal,
        }
    }

    /// プロセス終了コード
    ///
    /// 2: 入力パス不正 / 3: 必須列なし / 4: 読み込み失敗 / 5: 移動失敗 / 1: その他
    pub fn exit_code(&self) -> u8 {
        match self {
            ReconError::MissingColumns(_) | ReconError::SheetNotFound { .. } => 3,
            _ => match self.kind() {
                ErrorKind::Input => 2,
                ErrorKind::DataRead => 4,
                ErrorKind::Relocation => 5,
                ErrorKind::Io | ErrorKind::Internal => 1,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ReconError::FolderNotFound("x".into()).exit_code(), 2);
        assert_eq!(ReconError::MissingColumns(vec!["track (titel)".into()]).exit_code(), 3);
        assert_eq!(ReconError::ManifestRead("x".into()).exit_code(), 4);
        assert_eq!(ReconError::EmptyErrorSet("x".into()).exit_code(), 5);
    }

    #[test]
    fn test_folder_read_is_io_failure() {
        // 一覧の取得失敗は入力不備ではなく想定外のI/O失敗
        let err = ReconError::FolderRead("/music: Permission denied (os error 13)".into());
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("/music"));
    }
}
