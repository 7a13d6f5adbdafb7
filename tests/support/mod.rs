//! 統合テスト用のフィクスチャ

#![allow(dead_code)]

use calamine::{open_workbook_auto, Reader};
use manifest_recon::config::Config;
use manifest_recon::pipeline::CompareRequest;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

pub const MANIFEST_HEADERS: [&str; 4] = ["upc", "name", "track (titel)", "cover (titel)"];

/// 台帳を1シートで作る（空文字のセルは書かない）
pub fn write_manifest(path: &Path, sheet_name: &str, rows: &[[&str; 4]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();

    for (col, header) in MANIFEST_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row_idx as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }

    workbook.save(path).unwrap();
}

/// 空のファイルを作る
pub fn touch_files(dir: &Path, names: &[&str]) {
    std::fs::create_dir_all(dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}

pub fn sheet_names(path: &Path) -> Vec<String> {
    let workbook = open_workbook_auto(path).unwrap();
    workbook.sheet_names().to_vec()
}

/// シートを文字列の行列として読む
pub fn read_rows(path: &Path, sheet: &str) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

/// 一時ディレクトリ内で完結する照合リクエスト
pub fn request(root: &Path, manifest: &Path, folder: &Path) -> CompareRequest {
    let config = Config {
        results_dir: root.join("results"),
        access_token: None,
        ..Config::default()
    };
    let mut request = CompareRequest::from_config(manifest, folder, &config);
    // 環境変数のトークンに左右されないように
    request.report.access_token = None;
    request
}

pub fn paths(root: &Path) -> (PathBuf, PathBuf) {
    (root.join("manifest.xlsx"), root.join("music"))
}
