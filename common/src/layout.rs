//! レポートのレイアウト定義
//!
//! シート名・列見出し・信頼度帯の色。
//! 照合後の移動処理（quarantine）もここのシート名・見出しで
//! レポートを読み戻すため、変更時は両方に影響する。

use crate::types::ConfidenceBand;

pub const SHEET_ALL_RESULTS: &str = "Все результаты";
pub const SHEET_ERRORS: &str = "Отсутствующие файлы";
pub const SHEET_SUMMARY: &str = "Сводка";
pub const SHEET_STATISTICS: &str = "Детальная статистика";
pub const SHEET_RECOMMENDATIONS: &str = "Рекомендации";
pub const SHEET_UNUSED: &str = "Неиспользуемые файлы";

pub const COL_KIND: &str = "Тип файла";
pub const COL_DECLARED: &str = "Название в Excel";
pub const COL_MATCHED: &str = "Найден в папке";
pub const COL_SIMILARITY: &str = "Процент сходства";
pub const COL_DIFFERENCES: &str = "Различия";
pub const COL_STATUS: &str = "Статус";

/// 結果シートの列見出し（列順）
pub const RESULT_HEADERS: [&str; 6] = [
    COL_KIND,
    COL_DECLARED,
    COL_MATCHED,
    COL_SIMILARITY,
    COL_DIFFERENCES,
    COL_STATUS,
];

/// 一致なしのときの「Найден в папке」表記
pub const NOT_FOUND_LABEL: &str = "Не найден";

/// エラーが1件もないときの案内行
pub const ALL_MATCHED_MESSAGE: &str = "Все файлы соответствуют записям в Excel";

/// 凡例の開始列（結果列の右に1列空ける）
pub const LEGEND_COL: u16 = RESULT_HEADERS.len() as u16 + 1;

pub const HEADER_COLOR: u32 = 0xD9E1F2;
/// 機密値（アクセストークン）行の強調色
pub const SENSITIVE_COLOR: u32 = 0xFFFF00;
pub const SENSITIVE_FONT_COLOR: u32 = 0xC00000;

/// 信頼度帯の塗り色
pub fn band_color(band: ConfidenceBand) -> u32 {
    match band {
        ConfidenceBand::A => 0xC6EFCE,
        ConfidenceBand::B => 0xE2EFDA,
        ConfidenceBand::C => 0xFFEB9C,
        ConfidenceBand::D => 0xF8CBAD,
        ConfidenceBand::E => 0xFFC7CE,
        ConfidenceBand::F => 0xFF9999,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_band_colors_are_distinct() {
        let colors: HashSet<u32> = ConfidenceBand::ALL.iter().map(|&b| band_color(b)).collect();
        assert_eq!(colors.len(), ConfidenceBand::ALL.len());
    }

    #[test]
    fn test_sheet_names_fit_excel_limit() {
        for name in [
            SHEET_ALL_RESULTS,
            SHEET_ERRORS,
            SHEET_SUMMARY,
            SHEET_STATISTICS,
            SHEET_RECOMMENDATIONS,
            SHEET_UNUSED,
        ] {
            assert!(name.chars().count() <= 31, "シート名が長すぎる: {}", name);
        }
    }
}
