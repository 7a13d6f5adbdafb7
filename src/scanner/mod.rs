use crate::error::{ReconError, Result};
use manifest_recon_common::CandidateFile;
use std::path::Path;
use walkdir::WalkDir;

/// フォルダ直下のファイルを候補として列挙する
///
/// - 再帰しない（サブフォルダは対象外）
/// - ファイルへのシンボリックリンクは候補に含める
/// - `.DS_Store` などドットで始まるファイルは除外
/// - ファイル名でソート（同点時の先勝ちを環境に依らず固定するため）
///
/// 一覧の取得に失敗した場合は空の候補で続行せず、エラーを返す。
pub fn scan_folder(folder: &Path) -> Result<Vec<CandidateFile>> {
    if !folder.is_dir() {
        return Err(ReconError::FolderNotFound(folder.display().to_string()));
    }

    let mut names = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
    {
        let entry = entry.map_err(|e| ReconError::FolderRead(format!("{}: {}", folder.display(), e)))?;

        // リンク先を見て判定する（壊れたリンク・ディレクトリへのリンクは除外）
        if !entry.path().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if is_hidden(&file_name) {
            continue;
        }

        names.push(file_name);
    }

    names.sort();

    Ok(CandidateFile::from_names(names))
}

fn is_hidden(file_name: &str) -> bool {
    file_name.starts_with('.')
}
