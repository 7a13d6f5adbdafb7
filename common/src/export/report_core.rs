//! 照合レポート生成（共通ライブラリ）
//!
//! layout.rs のシート名・見出しを使い、照合結果を複数シートのxlsxに描画する。
//! ファイルへの書き出しは呼び出し側の責務（ここではバッファを返すだけ）。

use crate::error::{Error, Result};
use crate::layout::{
    band_color, ALL_MATCHED_MESSAGE, HEADER_COLOR, LEGEND_COL, NOT_FOUND_LABEL, RESULT_HEADERS,
    SENSITIVE_COLOR, SENSITIVE_FONT_COLOR, SHEET_ALL_RESULTS, SHEET_ERRORS, SHEET_RECOMMENDATIONS,
    SHEET_STATISTICS, SHEET_SUMMARY, SHEET_UNUSED,
};
use crate::types::{ConfidenceBand, ReconciliationResult, ReconciliationSummary, ReportRow};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

/// レポートの付加情報
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// 統計シートに強調表示で載せるアクセストークン
    pub access_token: Option<String>,
}

fn report_err(context: &'static str) -> impl Fn(XlsxError) -> Error {
    move |e| Error::Report(format!("{}: {}", context, e))
}

/// 使い回すセル書式
struct Formats {
    header: Format,
    bands: Vec<Format>,
    label: Format,
    number: Format,
    percent: Format,
    sensitive: Format,
}

impl Formats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(HEADER_COLOR))
            .set_border(FormatBorder::Thin);

        let bands = ConfidenceBand::ALL
            .iter()
            .map(|&band| {
                Format::new()
                    .set_background_color(Color::RGB(band_color(band)))
                    .set_border(FormatBorder::Hair)
                    .set_num_format("0.00")
            })
            .collect();

        Self {
            header,
            bands,
            label: Format::new().set_bold(),
            number: Format::new().set_num_format("0"),
            percent: Format::new().set_num_format("0.00"),
            sensitive: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(SENSITIVE_FONT_COLOR))
                .set_background_color(Color::RGB(SENSITIVE_COLOR))
                .set_border(FormatBorder::Thin),
        }
    }

    fn band(&self, band: ConfidenceBand) -> &Format {
        &self.bands[band.index()]
    }
}

/// 照合結果をxlsxバッファに描画する
///
/// シート順: 全結果 / エラーのみ / サマリ / 詳細統計 / 推奨事項 / 未使用ファイル（ある場合のみ）
pub fn render(result: &ReconciliationResult, options: &ReportOptions) -> Result<Vec<u8>> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let rows = result.report_rows();
    let error_rows = result.error_rows();

    {
        let sheet = add_sheet(&mut workbook, SHEET_ALL_RESULTS)?;
        write_result_rows(sheet, &rows, &formats)?;
        write_legend(sheet, &formats)?;
        sheet.autofit();
    }

    {
        let sheet = add_sheet(&mut workbook, SHEET_ERRORS)?;
        write_result_rows(sheet, &error_rows, &formats)?;
        if error_rows.is_empty() {
            sheet
                .write_string(1, 0, ALL_MATCHED_MESSAGE)
                .map_err(report_err("案内行書き込みエラー"))?;
        }
        sheet.autofit();
    }

    {
        let sheet = add_sheet(&mut workbook, SHEET_SUMMARY)?;
        write_summary(sheet, &result.summary, &formats)?;
        sheet.autofit();
    }

    {
        let sheet = add_sheet(&mut workbook, SHEET_STATISTICS)?;
        write_statistics(sheet, &result.summary, options, &formats)?;
        sheet.autofit();
    }

    {
        let sheet = add_sheet(&mut workbook, SHEET_RECOMMENDATIONS)?;
        write_header(sheet, 0, &["Рекомендации"], &formats)?;
        for (i, line) in result.summary.recommendations().iter().enumerate() {
            sheet
                .write_string(i as u32 + 1, 0, line)
                .map_err(report_err("推奨事項書き込みエラー"))?;
        }
        sheet.autofit();
    }

    if !result.unused.is_empty() {
        let sheet = add_sheet(&mut workbook, SHEET_UNUSED)?;
        write_header(sheet, 0, &["Имя файла"], &formats)?;
        for (i, candidate) in result.unused.iter().enumerate() {
            sheet
                .write_string(i as u32 + 1, 0, &candidate.original_name)
                .map_err(report_err("未使用ファイル書き込みエラー"))?;
        }
        sheet.autofit();
    }

    workbook.save_to_buffer().map_err(report_err("Excel保存エラー"))
}

fn add_sheet<'a>(workbook: &'a mut Workbook, name: &str) -> Result<&'a mut Worksheet> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).map_err(report_err("シート名設定エラー"))?;
    Ok(sheet)
}

fn write_header(sheet: &mut Worksheet, row: u32, headers: &[&str], formats: &Formats) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(row, col as u16, *header, &formats.header)
            .map_err(report_err("見出し書き込みエラー"))?;
    }
    Ok(())
}

/// 結果行（信頼度帯で色分け）
fn write_result_rows(sheet: &mut Worksheet, rows: &[ReportRow], formats: &Formats) -> Result<()> {
    write_header(sheet, 0, &RESULT_HEADERS, formats)?;
    sheet.set_freeze_panes(1, 0).map_err(report_err("ウィンドウ枠固定エラー"))?;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        let format = formats.band(row.band());
        let matched = row.matched_name.as_deref().unwrap_or(NOT_FOUND_LABEL);

        sheet
            .write_string_with_format(r, 0, row.kind.label(), format)
            .and_then(|s| s.write_string_with_format(r, 1, &row.declared_name, format))
            .and_then(|s| s.write_string_with_format(r, 2, matched, format))
            .and_then(|s| s.write_number_with_format(r, 3, row.display_similarity(), format))
            .and_then(|s| s.write_string_with_format(r, 4, &row.differences, format))
            .and_then(|s| s.write_string_with_format(r, 5, row.status.label(), format))
            .map_err(report_err("結果行書き込みエラー"))?;
    }
    Ok(())
}

/// 結果列の右側に信頼度帯の凡例
fn write_legend(sheet: &mut Worksheet, formats: &Formats) -> Result<()> {
    sheet
        .write_string_with_format(0, LEGEND_COL, "Легенда", &formats.header)
        .and_then(|s| s.write_string_with_format(0, LEGEND_COL + 1, "", &formats.header))
        .map_err(report_err("凡例書き込みエラー"))?;

    for (i, band) in ConfidenceBand::ALL.iter().enumerate() {
        let r = i as u32 + 1;
        let format = formats.band(*band);
        sheet
            .write_string_with_format(r, LEGEND_COL, band.range_label(), format)
            .and_then(|s| s.write_string_with_format(r, LEGEND_COL + 1, band.description(), format))
            .map_err(report_err("凡例書き込みエラー"))?;
    }
    Ok(())
}

/// 全体件数 + リリース別の表（リリース名順）
fn write_summary(sheet: &mut Worksheet, summary: &ReconciliationSummary, formats: &Formats) -> Result<()> {
    let totals: [(&str, usize); 9] = [
        ("Всего треков в Excel", summary.total_tracks),
        ("Всего обложек в Excel", summary.total_covers),
        ("Всего релизов", summary.total_releases()),
        ("Файлов в папке", summary.total_candidates),
        ("Точных совпадений", summary.exact_matches()),
        ("Файлов с различиями", summary.error_count()),
        ("Ошибок по трекам", summary.track_errors),
        ("Ошибок по обложкам", summary.cover_errors),
        ("Неиспользуемых файлов", summary.unused_count),
    ];

    write_header(sheet, 0, &["Показатель", "Значение"], formats)?;
    let mut r = 1;
    for (label, value) in totals {
        sheet
            .write_string_with_format(r, 0, label, &formats.label)
            .and_then(|s| s.write_number_with_format(r, 1, value as f64, &formats.number))
            .map_err(report_err("サマリ書き込みエラー"))?;
        r += 1;
    }

    r += 1;
    write_header(sheet, r, &["Релиз", "Всего", "Найдено", "Не найдено", "% найдено"], formats)?;
    for (group, stats) in &summary.groups {
        r += 1;
        sheet
            .write_string(r, 0, group)
            .and_then(|s| s.write_number_with_format(r, 1, stats.total as f64, &formats.number))
            .and_then(|s| s.write_number_with_format(r, 2, stats.found as f64, &formats.number))
            .and_then(|s| s.write_number_with_format(r, 3, stats.missing as f64, &formats.number))
            .and_then(|s| s.write_number_with_format(r, 4, stats.percent_found(), &formats.percent))
            .map_err(report_err("リリース別集計書き込みエラー"))?;
    }
    Ok(())
}

/// 信頼度帯ごとの件数・割合とアクセストークン行
fn write_statistics(
    sheet: &mut Worksheet,
    summary: &ReconciliationSummary,
    options: &ReportOptions,
    formats: &Formats,
) -> Result<()> {
    write_header(sheet, 0, &["Диапазон сходства", "Описание", "Количество", "Процент"], formats)?;

    let mut r = 0;
    for band in ConfidenceBand::ALL {
        r += 1;
        let format = formats.band(band);
        sheet
            .write_string_with_format(r, 0, band.range_label(), format)
            .and_then(|s| s.write_string_with_format(r, 1, band.description(), format))
            .and_then(|s| s.write_number_with_format(r, 2, summary.band_count(band) as f64, format))
            .and_then(|s| s.write_number_with_format(r, 3, summary.band_percent(band), format))
            .map_err(report_err("統計書き込みエラー"))?;
    }

    r += 1;
    sheet
        .write_string_with_format(r, 0, "Итого", &formats.label)
        .and_then(|s| s.write_number_with_format(r, 2, summary.total_entries() as f64, &formats.number))
        .map_err(report_err("統計書き込みエラー"))?;

    if let Some(token) = options.access_token.as_deref() {
        r += 2;
        sheet
            .write_string_with_format(r, 0, "Access token", &formats.sensitive)
            .and_then(|s| s.write_string_with_format(r, 1, token, &formats.sensitive))
            .map_err(report_err("トークン行書き込みエラー"))?;
    }
    Ok(())
}
