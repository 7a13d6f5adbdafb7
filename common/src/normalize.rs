//! ファイル名の正規化
//!
//! 台帳の表記とフォルダ内の実ファイル名を比較可能な形にそろえる。
//!
//! ## 処理順
//! 1. 前後の空白除去
//! 2. Unicode NFKC
//! 3. `()[]{}.,-_` の前後の空白を除去（`"Track (1) .mp3"` → `"Track(1).mp3"`）
//! 4. 連続空白を1つに
//! 5. 小文字化
//! 6. 拡張子と本体を分けてそれぞれ trim し、`"{stem}.{ext}"` に再結合

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// ファイル名を正規化する
///
/// 空文字・空白のみの入力は空文字を返す。冪等。
pub fn normalize(raw: &str) -> String {
    lazy_static::lazy_static! {
        static ref SPACED_SEPARATOR: Regex = Regex::new(r"\s*([()\[\]{}.,\-_])\s*").unwrap();
        static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let composed: String = trimmed.nfkc().collect();
    let tightened = SPACED_SEPARATOR.replace_all(&composed, "${1}");
    let collapsed = WHITESPACE_RUN.replace_all(&tightened, " ");
    let lowered = collapsed.to_lowercase();

    match split_extension(&lowered) {
        (stem, Some(ext)) => format!("{}.{}", stem.trim(), ext.trim()),
        (stem, None) => stem.trim().to_string(),
    }
}

/// 本体と拡張子（ドットなし）に分ける
///
/// 最後の `.` で分割する。ただし `.` より前がドットだけ
/// （`.hidden` や `..mp3`）の場合は拡張子なしとみなす。
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(dot) if name[..dot].chars().any(|c| c != '.') => (&name[..dot], Some(&name[dot + 1..])),
        _ => (name, None),
    }
}

/// 拡張子が等しいか（大文字小文字を区別しない）
pub fn same_extension(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t "), "");
    }

    #[test]
    fn test_normalize_removes_space_around_separators() {
        assert_eq!(normalize("Track (1) .mp3"), "track(1).mp3");
        assert_eq!(normalize("Song Three (Live).mp3"), "song three(live).mp3");
        assert_eq!(normalize("Artist - Title _ v2 .wav"), "artist-title_v2.wav");
        assert_eq!(normalize("a [b] {c} , d.flac"), "a[b]{c},d.flac");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  My    Song\t\tName.mp3 "), "my song name.mp3");
    }

    #[test]
    fn test_normalize_case_insensitive() {
        assert_eq!(normalize("A.MP3"), normalize("a.mp3"));
        assert_eq!(normalize("ОБЛОЖКА.JPG"), "обложка.jpg");
    }

    #[test]
    fn test_normalize_nfkc() {
        // 全角英数字・合字は互換分解される
        assert_eq!(normalize("ｓｏｎｇ１.mp3"), "song1.mp3");
        assert_eq!(normalize("ﬁle.mp3"), "file.mp3");
        // 結合文字は合成される
        assert_eq!(normalize("Cafe\u{0301}.mp3"), normalize("Café.mp3"));
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Track (1) .mp3",
            "  Hello   World .WAV",
            "ｓｏｎｇ１ ( live ) .mp3",
            "no_extension",
            ".hidden",
            "song.",
            "Обложка - Релиз [2024].JPG",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "冪等でない: {:?}", s);
        }
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("song.mp3"), ("song", Some("mp3")));
        assert_eq!(split_extension("a.b.c"), ("a.b", Some("c")));
        assert_eq!(split_extension("noext"), ("noext", None));
        assert_eq!(split_extension(".hidden"), (".hidden", None));
        assert_eq!(split_extension("..mp3"), ("..mp3", None));
        assert_eq!(split_extension("song."), ("song", Some("")));
    }

    #[test]
    fn test_same_extension() {
        assert!(same_extension(Some("mp3"), Some("MP3")));
        assert!(same_extension(None, None));
        assert!(!same_extension(Some("mp3"), Some("wav")));
        assert!(!same_extension(Some("mp3"), None));
    }
}
