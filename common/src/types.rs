//! 照合処理の型定義
//!
//! - DeclaredEntry: 台帳の1行から取り出した期待ファイル（トラック/カバー）
//! - CandidateFile: フォルダに実在するファイル
//! - MatchResult: 1件の照合結果
//! - ReconciliationSummary: 信頼度帯・リリース単位の集計
//! - ReportRow: レポート出力用に射影した1行

use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// リリース列が空の行をまとめるグループ名
pub const UNGROUPED: &str = "ungrouped";

/// 部分一致とみなす下限（%）
pub const FOUND_THRESHOLD: f64 = 50.0;

/// 期待ファイルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Track,
    Cover,
}

impl EntryKind {
    /// レポート上の表記
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Track => "Трек",
            EntryKind::Cover => "Обложка",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Track => write!(f, "track"),
            EntryKind::Cover => write!(f, "cover"),
        }
    }
}

/// 台帳に記載された期待ファイル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredEntry {
    /// 台帳上の行番号（データ行の0始まり）
    pub row_index: usize,
    /// リリース（UPC・リリース名）。空なら UNGROUPED
    pub release_group: String,
    pub kind: EntryKind,
    pub declared_name: String,
}

impl DeclaredEntry {
    pub fn new(row_index: usize, release_group: Option<&str>, kind: EntryKind, declared_name: &str) -> Self {
        let release_group = release_group
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(UNGROUPED)
            .to_string();

        Self {
            row_index,
            release_group,
            kind,
            declared_name: declared_name.to_string(),
        }
    }
}

/// フォルダ内の実ファイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFile {
    pub original_name: String,
    /// 正規化済みファイル名（生成時に一度だけ計算）
    pub normalized_name: String,
}

impl CandidateFile {
    pub fn new(original_name: impl Into<String>) -> Self {
        let original_name = original_name.into();
        let normalized_name = normalize(&original_name);
        Self { original_name, normalized_name }
    }

    pub fn from_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().map(Self::new).collect()
    }
}

/// 照合ステータス（類似度から一意に決まる）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStatus {
    ExactMatch,
    PartialMatch,
    NotFound,
}

impl MatchStatus {
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= 100.0 {
            MatchStatus::ExactMatch
        } else if similarity >= FOUND_THRESHOLD {
            MatchStatus::PartialMatch
        } else {
            MatchStatus::NotFound
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::ExactMatch => "Точное совпадение",
            MatchStatus::PartialMatch => "Частичное совпадение",
            MatchStatus::NotFound => "Не найден",
        }
    }
}

/// 信頼度帯（A〜F）
///
/// [0, 100] を重複なく分割する。E は (0, 50) の半開区間。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// 100
    A,
    /// 90–99
    B,
    /// 80–89
    C,
    /// 50–79
    D,
    /// 0 より大きく 50 未満
    E,
    /// 0
    F,
}

impl ConfidenceBand {
    pub const ALL: [ConfidenceBand; 6] = [
        ConfidenceBand::A,
        ConfidenceBand::B,
        ConfidenceBand::C,
        ConfidenceBand::D,
        ConfidenceBand::E,
        ConfidenceBand::F,
    ];

    pub fn classify(similarity: f64) -> Self {
        if similarity >= 100.0 {
            ConfidenceBand::A
        } else if similarity >= 90.0 {
            ConfidenceBand::B
        } else if similarity >= 80.0 {
            ConfidenceBand::C
        } else if similarity >= FOUND_THRESHOLD {
            ConfidenceBand::D
        } else if similarity > 0.0 {
            ConfidenceBand::E
        } else {
            ConfidenceBand::F
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// 範囲表記
    pub fn range_label(&self) -> &'static str {
        match self {
            ConfidenceBand::A => "100%",
            ConfidenceBand::B => "90–99%",
            ConfidenceBand::C => "80–89%",
            ConfidenceBand::D => "50–79%",
            ConfidenceBand::E => "<50%",
            ConfidenceBand::F => "0%",
        }
    }

    /// 凡例の説明文
    pub fn description(&self) -> &'static str {
        match self {
            ConfidenceBand::A => "Точное совпадение",
            ConfidenceBand::B => "Почти совпадает (опечатка)",
            ConfidenceBand::C => "Высокое сходство",
            ConfidenceBand::D => "Среднее сходство",
            ConfidenceBand::E => "Низкое сходство",
            ConfidenceBand::F => "Файл не найден",
        }
    }
}

/// 1件の照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub entry: DeclaredEntry,
    pub matched_candidate: Option<CandidateFile>,
    /// 0〜100
    pub similarity: f64,
    pub differences: String,
}

impl MatchResult {
    pub fn status(&self) -> MatchStatus {
        MatchStatus::from_similarity(self.similarity)
    }

    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::classify(self.similarity)
    }

    /// 完全一致以外はエラー扱い
    pub fn is_error(&self) -> bool {
        self.status() != MatchStatus::ExactMatch
    }
}

/// レポート出力用の1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub kind: EntryKind,
    pub declared_name: String,
    pub matched_name: Option<String>,
    pub similarity: f64,
    pub differences: String,
    pub status: MatchStatus,
}

impl From<&MatchResult> for ReportRow {
    fn from(result: &MatchResult) -> Self {
        Self {
            kind: result.entry.kind,
            declared_name: result.entry.declared_name.clone(),
            matched_name: result.matched_candidate.as_ref().map(|c| c.original_name.clone()),
            similarity: result.similarity,
            differences: result.differences.clone(),
            status: result.status(),
        }
    }
}

impl ReportRow {
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::classify(self.similarity)
    }

    /// 表示用に小数2桁へ丸めた類似度
    pub fn display_similarity(&self) -> f64 {
        (self.similarity * 100.0).round() / 100.0
    }
}

/// リリース単位の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub total: usize,
    /// 類似度50%以上
    pub found: usize,
    pub missing: usize,
}

impl GroupStats {
    pub fn percent_found(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.found as f64 / self.total as f64 * 100.0
    }
}

/// 照合全体の集計
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    pub total_tracks: usize,
    pub total_covers: usize,
    pub total_candidates: usize,
    /// ConfidenceBand::index() 順の件数
    pub band_counts: [usize; 6],
    pub unused_count: usize,
    pub track_errors: usize,
    pub cover_errors: usize,
    /// リリース名順
    pub groups: BTreeMap<String, GroupStats>,
}

impl ReconciliationSummary {
    pub fn from_matches(matches: &[MatchResult], total_candidates: usize, unused_count: usize) -> Self {
        let mut summary = Self {
            total_candidates,
            unused_count,
            ..Default::default()
        };

        for result in matches {
            match result.entry.kind {
                EntryKind::Track => summary.total_tracks += 1,
                EntryKind::Cover => summary.total_covers += 1,
            }

            summary.band_counts[result.band().index()] += 1;

            if result.is_error() {
                match result.entry.kind {
                    EntryKind::Track => summary.track_errors += 1,
                    EntryKind::Cover => summary.cover_errors += 1,
                }
            }

            let group = summary.groups.entry(result.entry.release_group.clone()).or_default();
            group.total += 1;
            if result.similarity >= FOUND_THRESHOLD {
                group.found += 1;
            } else {
                group.missing += 1;
            }
        }

        summary
    }

    pub fn band_count(&self, band: ConfidenceBand) -> usize {
        self.band_counts[band.index()]
    }

    pub fn total_entries(&self) -> usize {
        self.total_tracks + self.total_covers
    }

    pub fn total_releases(&self) -> usize {
        self.groups.len()
    }

    pub fn exact_matches(&self) -> usize {
        self.band_count(ConfidenceBand::A)
    }

    pub fn error_count(&self) -> usize {
        self.total_entries() - self.exact_matches()
    }

    /// 全照合結果に占める割合（%）
    pub fn band_percent(&self, band: ConfidenceBand) -> f64 {
        let total = self.total_entries();
        if total == 0 {
            return 0.0;
        }
        self.band_count(band) as f64 / total as f64 * 100.0
    }

    /// ルールベースの推奨事項
    pub fn recommendations(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if self.error_count() == 0 {
            lines.push("Все файлы соответствуют записям в Excel. Можно переходить к загрузке.".to_string());
        }

        let not_found = self.band_count(ConfidenceBand::F);
        if not_found > 0 {
            lines.push(format!(
                "Не найдено файлов: {}. Добавьте недостающие файлы в папку или исправьте расширение в Excel.",
                not_found
            ));
        }

        let low = self.band_count(ConfidenceBand::E);
        if low > 0 {
            lines.push(format!(
                "Низкое сходство (<50%): {}. Вероятно, в папке нет нужного файла. Проверьте названия вручную.",
                low
            ));
        }

        let medium = self.band_count(ConfidenceBand::B)
            + self.band_count(ConfidenceBand::C)
            + self.band_count(ConfidenceBand::D);
        if medium > 0 {
            lines.push(format!(
                "Частичное совпадение (50–99%): {}. Исправьте опечатки в названиях по столбцу «Различия».",
                medium
            ));
        }

        if self.unused_count > 0 {
            lines.push(format!(
                "Неиспользуемых файлов в папке: {}. Проверьте, не относятся ли они к записям с ошибками.",
                self.unused_count
            ));
        }

        lines
    }
}

/// 照合結果一式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// 台帳順
    pub matches: Vec<MatchResult>,
    /// どの期待ファイルの最良一致にもならなかった実ファイル
    pub unused: Vec<CandidateFile>,
    pub summary: ReconciliationSummary,
}

impl ReconciliationResult {
    pub fn report_rows(&self) -> Vec<ReportRow> {
        self.matches.iter().map(ReportRow::from).collect()
    }

    pub fn error_rows(&self) -> Vec<ReportRow> {
        self.matches
            .iter()
            .filter(|m| m.is_error())
            .map(ReportRow::from)
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.summary.error_count()
    }
}
