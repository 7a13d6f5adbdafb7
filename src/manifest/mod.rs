//! 台帳（マニフェスト）の読み込み

pub mod cell;

use crate::config::Config;
use crate::error::{ReconError, Result};
use cell::{read_sheet, SheetGrid};
use manifest_recon_common::{DeclaredEntry, EntryKind};
use std::path::Path;

/// 台帳の列設定
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestColumns {
    pub sheet_name: String,
    pub track_column: String,
    pub cover_column: String,
    pub group_columns: Vec<String>,
}

impl From<&Config> for ManifestColumns {
    fn from(config: &Config) -> Self {
        Self {
            sheet_name: config.sheet_name.clone(),
            track_column: config.track_column.clone(),
            cover_column: config.cover_column.clone(),
            group_columns: config.group_columns.clone(),
        }
    }
}

impl Default for ManifestColumns {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// 台帳から取り出したエントリ
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub entries: Vec<DeclaredEntry>,
    /// 見出しを除いたデータ行数
    pub row_count: usize,
}

/// 台帳ファイルを読み、トラック・カバーのエントリを台帳順に返す
pub fn load_manifest(path: &Path, columns: &ManifestColumns) -> Result<Manifest> {
    if !path.is_file() {
        return Err(ReconError::ManifestNotFound(path.display().to_string()));
    }

    let grid = read_sheet(path, &columns.sheet_name, ReconError::ManifestRead)?;
    parse_entries(&grid, columns)
}

/// シートからエントリを取り出す
///
/// 1行につきトラック → カバーの順。空欄のセルはエントリにしない。
pub fn parse_entries(grid: &SheetGrid, columns: &ManifestColumns) -> Result<Manifest> {
    let track_col = grid.find_column(&columns.track_column);
    let cover_col = grid.find_column(&columns.cover_column);

    let (track_col, cover_col) = match (track_col, cover_col) {
        (Some(t), Some(c)) => (t, c),
        (t, c) => {
            let mut missing = Vec::new();
            if t.is_none() {
                missing.push(columns.track_column.clone());
            }
            if c.is_none() {
                missing.push(columns.cover_column.clone());
            }
            return Err(ReconError::MissingColumns(missing));
        }
    };

    // 見つからないグループ列は無視
    let group_cols: Vec<usize> = columns
        .group_columns
        .iter()
        .filter_map(|name| grid.find_column(name))
        .collect();

    let data_rows = grid.rows.iter().skip(1);
    let row_count = data_rows.len();
    let mut entries = Vec::new();

    for (row_index, row) in data_rows.enumerate() {
        let group = group_cols
            .iter()
            .filter_map(|&col| row.get(col).and_then(|cell| cell.as_text()))
            .map(|text| text.trim().to_string())
            .next();

        for (kind, col) in [(EntryKind::Track, track_col), (EntryKind::Cover, cover_col)] {
            if let Some(name) = row.get(col).and_then(|cell| cell.as_text()) {
                entries.push(DeclaredEntry::new(row_index, group.as_deref(), kind, &name));
            }
        }
    }

    Ok(Manifest { entries, row_count })
}
