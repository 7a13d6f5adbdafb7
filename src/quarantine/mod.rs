//! エラー行の隔離
//!
//! 以前に出力したレポートの「Отсутствующие файлы」シートから宣言名を集め、
//! 台帳の主シートで該当する行を日付入りの隔離シートへ移す。
//!
//! xlsxは部分更新できないため、ブック全体を値だけで書き直す（書式・数式は保持しない）。
//! 書き出しは同じフォルダの一時ファイルに行い、成功後に rename で置き換える。

use crate::error::{ReconError, Result};
use crate::manifest::cell::{read_sheet, read_workbook, CellValue, SheetGrid};
use chrono::NaiveDate;
use manifest_recon_common::layout::{COL_DECLARED, SHEET_ERRORS};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const QUARANTINE_PREFIX: &str = "Ошибки_загрузки_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocationOutcome {
    pub moved_count: usize,
    pub quarantine_sheet_name: String,
}

/// 主シートの分割結果
#[derive(Debug, Clone, PartialEq)]
pub struct RelocationPlan {
    /// 主シートに残る行（見出しを含む）
    pub kept: Vec<Vec<CellValue>>,
    /// 隔離シートに書く行（見出し + 移動行）
    pub quarantined: Vec<Vec<CellValue>>,
    /// 移動した行の番号（0始まり、見出し = 0）
    pub moved_rows: Vec<usize>,
}

impl RelocationPlan {
    pub fn moved_count(&self) -> usize {
        self.moved_rows.len()
    }
}

/// 隔離シート名（例: `Ошибки_загрузки_05.02.25`）
pub fn quarantine_sheet_name(date: NaiveDate) -> String {
    format!("{}{}", QUARANTINE_PREFIX, date.format("%d.%m.%y"))
}

/// レポートのエラーシートから宣言名の集合を読む
pub fn read_error_keys(report: &Path) -> Result<HashSet<String>> {
    if !report.is_file() {
        return Err(ReconError::ReportNotFound(report.display().to_string()));
    }

    let grid = read_sheet(report, SHEET_ERRORS, ReconError::ReportRead)?;
    let col = grid
        .find_column(COL_DECLARED)
        .ok_or_else(|| ReconError::MissingColumns(vec![COL_DECLARED.to_string()]))?;

    Ok(grid
        .rows
        .iter()
        .skip(1)
        .filter_map(|row| row.get(col).and_then(CellValue::as_text))
        .map(|name| name.trim().to_string())
        .collect())
}

/// 行のキーがエラー集合にある行を移動対象にする
///
/// 削除は番号の大きい方から行う（前から消すと後続の番号がずれる）。
pub fn plan_relocation(primary: &SheetGrid, key_col: usize, keys: &HashSet<String>) -> RelocationPlan {
    let mut kept = primary.rows.clone();
    let mut quarantined: Vec<Vec<CellValue>> = primary.rows.iter().take(1).cloned().collect();
    let mut moved_rows = Vec::new();

    for (row_idx, row) in primary.rows.iter().enumerate().skip(1) {
        let key = row.get(key_col).and_then(CellValue::as_text);
        if let Some(key) = key {
            if keys.contains(key.trim()) {
                tracing::debug!(row = row_idx + 1, key = %key.trim(), "隔離対象");
                quarantined.push(row.clone());
                moved_rows.push(row_idx);
            }
        }
    }

    for &row_idx in moved_rows.iter().rev() {
        kept.remove(row_idx);
    }

    RelocationPlan { kept, quarantined, moved_rows }
}

/// エラー行を隔離シートへ移し、台帳を置き換える
///
/// 途中で失敗した場合、台帳は変更されない。
pub fn relocate_errors(
    manifest: &Path,
    report: &Path,
    sheet_name: &str,
    track_column: &str,
    date: NaiveDate,
) -> Result<RelocationOutcome> {
    if !manifest.is_file() {
        return Err(ReconError::ManifestNotFound(manifest.display().to_string()));
    }

    let keys = read_error_keys(report)?;
    if keys.is_empty() {
        return Err(ReconError::EmptyErrorSet(report.display().to_string()));
    }
    tracing::info!(count = keys.len(), "エラー集合を読み込みました");

    let quarantine_name = quarantine_sheet_name(date);
    if quarantine_name == sheet_name {
        return Err(ReconError::QuarantineCollision(quarantine_name));
    }

    let sheets = read_workbook(manifest, ReconError::ManifestRead)?;
    let primary = sheets
        .iter()
        .find(|s| s.name == sheet_name)
        .ok_or_else(|| ReconError::SheetNotFound {
            path: manifest.display().to_string(),
            sheet: sheet_name.to_string(),
        })?;

    // 慣例ではトラック名の列がキー。見出しにない場合は A 列
    let key_col = primary.find_column(track_column).unwrap_or(0);
    let plan = plan_relocation(primary, key_col, &keys);

    let mut workbook = Workbook::new();
    for sheet in &sheets {
        if sheet.name == quarantine_name {
            // 既存の隔離シートは作り直す
            continue;
        }
        let rows = if sheet.name == sheet_name { &plan.kept } else { &sheet.rows };
        write_sheet(&mut workbook, &sheet.name, rows).map_err(relocation_err(&sheet.name))?;
    }
    write_sheet(&mut workbook, &quarantine_name, &plan.quarantined)
        .map_err(relocation_err(&quarantine_name))?;

    commit(&mut workbook, manifest)?;

    tracing::info!(
        moved = plan.moved_count(),
        sheet = %quarantine_name,
        "エラー行を隔離しました"
    );

    Ok(RelocationOutcome {
        moved_count: plan.moved_count(),
        quarantine_sheet_name: quarantine_name,
    })
}

fn relocation_err(sheet: &str) -> impl Fn(XlsxError) -> ReconError + '_ {
    move |e| ReconError::Relocation(format!("{}: {}", sheet, e))
}

fn write_sheet(workbook: &mut Workbook, name: &str, rows: &[Vec<CellValue>]) -> std::result::Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            write_cell(sheet, row_idx as u32, col_idx as u16, cell)?;
        }
    }
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> std::result::Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(s) | CellValue::Error(s) => {
            sheet.write_string(row, col, s)?;
        }
        CellValue::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
        CellValue::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn temp_path_for(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "manifest.xlsx".to_string());
    target.with_file_name(format!(".{}.tmp", file_name))
}

/// 一時ファイルに保存してから台帳を置き換える
fn commit(workbook: &mut Workbook, target: &Path) -> Result<()> {
    let tmp = temp_path_for(target);

    if let Err(e) = workbook.save(&tmp) {
        let _ = std::fs::remove_file(&tmp);
        return Err(ReconError::Relocation(format!("{}: {}", tmp.display(), e)));
    }

    if let Err(e) = std::fs::rename(&tmp, target) {
        let _ = std::fs::remove_file(&tmp);
        return Err(ReconError::Relocation(format!("{}: {}", target.display(), e)));
    }

    Ok(())
}
