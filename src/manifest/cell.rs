//! セル値とシートの読み込み（calamine）

use crate::error::{ReconError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// シート上の1セル
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// `#N/A` などのエラー値（表記のみ保持）
    Error(String),
}

impl CellValue {
    pub fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }

    /// 文字列として読む。空・エラー値は None
    ///
    /// 整数値の数値は小数点なしで表す（UPC `4600000000017` が `4.6e12` にならないように）。
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Empty | CellValue::Error(_) => return None,
        };

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 1シート分のセル（A1起点の密な行列）
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { name: name.into(), rows }
    }

    /// calamine の Range は使用範囲の左上から始まるため、A1 起点に詰め直す
    pub fn from_range(name: &str, range: &Range<Data>) -> Self {
        let (start_row, start_col) = match range.start() {
            Some(start) => start,
            None => return Self::new(name, Vec::new()),
        };

        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; start_col as usize];
            cells.extend(row.iter().map(CellValue::from_data));
            rows.push(cells);
        }

        Self::new(name, rows)
    }

    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// 見出し（前後空白・大文字小文字を無視）から列番号を探す
    pub fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.header()
            .iter()
            .position(|cell| cell.as_text().map(|t| t.trim().to_lowercase()) == Some(wanted.clone()))
    }
}

/// ブック内の全シートを順に読む
pub fn read_workbook(path: &Path, read_error: fn(String) -> ReconError) -> Result<Vec<SheetGrid>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| read_error(format!("{}: {}", path.display(), e)))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| read_error(format!("{} [{}]: {}", path.display(), name, e)))?;
        sheets.push(SheetGrid::from_range(&name, &range));
    }

    Ok(sheets)
}

/// 指定シートだけを読む
pub fn read_sheet(path: &Path, sheet: &str, read_error: fn(String) -> ReconError) -> Result<SheetGrid> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| read_error(format!("{}: {}", path.display(), e)))?;

    if !workbook.sheet_names().iter().any(|n| n == sheet) {
        return Err(ReconError::SheetNotFound {
            path: path.display().to_string(),
            sheet: sheet.to_string(),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| read_error(format!("{} [{}]: {}", path.display(), sheet, e)))?;

    Ok(SheetGrid::from_range(sheet, &range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text() {
        assert_eq!(CellValue::Text("a.mp3".into()).as_text(), Some("a.mp3".into()));
        assert_eq!(CellValue::Text("   ".into()).as_text(), None);
        assert_eq!(CellValue::Empty.as_text(), None);
        assert_eq!(CellValue::Error("#N/A".into()).as_text(), None);
        assert_eq!(CellValue::Bool(true).as_text(), Some("TRUE".into()));
    }

    #[test]
    fn test_integral_numbers_have_no_fraction() {
        assert_eq!(CellValue::Number(4600000000017.0).as_text(), Some("4600000000017".into()));
        assert_eq!(CellValue::Number(12.0).as_text(), Some("12".into()));
        assert_eq!(CellValue::Number(1.5).as_text(), Some("1.5".into()));
    }

    #[test]
    fn test_find_column_ignores_case_and_spaces() {
        let grid = SheetGrid::new(
            "Лист1",
            vec![vec![
                CellValue::Text(" Track (Titel) ".into()),
                CellValue::Empty,
                CellValue::Text("cover (titel)".into()),
            ]],
        );
        assert_eq!(grid.find_column("track (titel)"), Some(0));
        assert_eq!(grid.find_column("cover (titel)"), Some(2));
        assert_eq!(grid.find_column("upc"), None);
    }

    #[test]
    fn test_empty_grid_has_no_header() {
        let grid = SheetGrid::new("Лист1", Vec::new());
        assert!(grid.header().is_empty());
        assert_eq!(grid.find_column("upc"), None);
    }
}
