//! 照合の統合テスト
//!
//! 台帳xlsx + フォルダ → レポートxlsx までを通しで確認する

mod support;

use manifest_recon::pipeline::compare;
use manifest_recon_common::layout::{
    SHEET_ALL_RESULTS, SHEET_ERRORS, SHEET_RECOMMENDATIONS, SHEET_STATISTICS, SHEET_SUMMARY, SHEET_UNUSED,
};
use manifest_recon_common::{MatchStatus, NoopObserver, NOT_FOUND_SENTINEL};
use std::path::Path;
use support::{paths, read_rows, request, sheet_names, touch_files, write_manifest};
use tempfile::tempdir;

/// シナリオA: 大文字小文字の違いだけなら完全一致
#[test]
fn test_exact_match_ignores_case() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(&manifest, "Лист1", &[["", "Album", "Song One.mp3", ""]]);
    touch_files(&folder, &["song one.mp3"]);

    let (result, outcome) = compare(&request(dir.path(), &manifest, &folder), &NoopObserver).unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].similarity, 100.0);
    assert_eq!(result.matches[0].status(), MatchStatus::ExactMatch);
    assert!(outcome.success);
    assert_eq!(outcome.error_count, 0);
    assert_eq!(outcome.message, "Все файлы соответствуют записям в Excel");
    assert!(Path::new(&outcome.report_path).exists());
}

/// シナリオB: 拡張子が違えば見つからない
#[test]
fn test_extension_mismatch_is_not_found() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(&manifest, "Лист1", &[["", "Single", "Song Two.mp3", ""]]);
    touch_files(&folder, &["Song Two.wav"]);

    let (result, outcome) = compare(&request(dir.path(), &manifest, &folder), &NoopObserver).unwrap();

    assert_eq!(result.matches[0].similarity, 0.0);
    assert_eq!(result.matches[0].status(), MatchStatus::NotFound);
    assert_eq!(result.matches[0].differences, NOT_FOUND_SENTINEL);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.track_errors, 1);
    assert_eq!(outcome.cover_errors, 0);
    assert_eq!(outcome.message, "Найдено 1 файлов с различиями");

    // エラーシートに宣言名が載る
    let errors = read_rows(Path::new(&outcome.report_path), SHEET_ERRORS);
    assert_eq!(errors[0][1], "Название в Excel");
    assert_eq!(errors[1][1], "Song Two.mp3");
}

/// シナリオC: 括弧前の空白は正規化で消える
#[test]
fn test_space_before_bracket_is_normalized() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(&manifest, "Лист1", &[["", "Live", "Song Three (Live).mp3", ""]]);
    touch_files(&folder, &["song three(live).mp3"]);

    let (result, _) = compare(&request(dir.path(), &manifest, &folder), &NoopObserver).unwrap();

    assert_eq!(result.matches[0].similarity, 100.0);
    assert_eq!(result.matches[0].differences, "");
}

/// シナリオD: 参照されないファイルは未使用シートに1回だけ載る
#[test]
fn test_unreferenced_file_is_listed_once() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(
        &manifest,
        "Лист1",
        &[
            ["4600000000017", "Album", "Song One.mp3", "Cover.jpg"],
            ["4600000000017", "Album", "Song One.mp3", ""],
        ],
    );
    touch_files(&folder, &["song one.mp3", "cover.jpg", "bonus.mp3", ".DS_Store"]);

    let (result, outcome) = compare(&request(dir.path(), &manifest, &folder), &NoopObserver).unwrap();
    let report = Path::new(&outcome.report_path);

    assert_eq!(result.unused.len(), 1);
    assert_eq!(
        sheet_names(report),
        vec![
            SHEET_ALL_RESULTS,
            SHEET_ERRORS,
            SHEET_SUMMARY,
            SHEET_STATISTICS,
            SHEET_RECOMMENDATIONS,
            SHEET_UNUSED
        ]
    );

    let unused: Vec<String> = read_rows(report, SHEET_UNUSED)
        .into_iter()
        .skip(1)
        .map(|row| row[0].clone())
        .collect();
    assert_eq!(unused, vec!["bonus.mp3"]);
}

/// 全件一致なら未使用シートは作らない
#[test]
fn test_no_unused_sheet_when_all_files_claimed() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(&manifest, "Лист1", &[["", "Album", "a.mp3", "a.jpg"]]);
    touch_files(&folder, &["a.mp3", "a.jpg"]);

    let (_, outcome) = compare(&request(dir.path(), &manifest, &folder), &NoopObserver).unwrap();
    let report = Path::new(&outcome.report_path);

    assert!(!sheet_names(report).iter().any(|s| s == SHEET_UNUSED));

    // エラーシートは案内行だけ
    let errors = read_rows(report, SHEET_ERRORS);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[1][0], "Все файлы соответствуют записям в Excel");
}

/// 全結果シートは台帳順・トラック → カバーの順
#[test]
fn test_report_rows_follow_manifest_order() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(
        &manifest,
        "Лист1",
        &[
            ["1", "A", "b track.mp3", "b cover.jpg"],
            ["2", "B", "a track.mp3", ""],
        ],
    );
    touch_files(&folder, &["a track.mp3", "b track.mp3", "b cover.jpg"]);

    let (_, outcome) = compare(&request(dir.path(), &manifest, &folder), &NoopObserver).unwrap();

    let declared: Vec<&str> = outcome.report_rows.iter().map(|r| r.declared_name.as_str()).collect();
    assert_eq!(declared, vec!["b track.mp3", "b cover.jpg", "a track.mp3"]);

    let rows = read_rows(Path::new(&outcome.report_path), SHEET_ALL_RESULTS);
    assert_eq!(rows[0][0], "Тип файла");
    assert_eq!(rows[1][0], "Трек");
    assert_eq!(rows[2][0], "Обложка");
    assert_eq!(rows[3][1], "a track.mp3");
}

/// リリース単位の集計（UPCがなければ名前で束ねる）
#[test]
fn test_summary_groups_by_upc_then_name() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(
        &manifest,
        "Лист1",
        &[
            ["111", "Album", "one.mp3", "front.jpg"],
            ["111", "Album", "two.mp3", ""],
            ["", "Single", "three.mp3", ""],
        ],
    );
    touch_files(&folder, &["one.mp3", "two.mp3", "front.jpg"]);

    let (result, _) = compare(&request(dir.path(), &manifest, &folder), &NoopObserver).unwrap();

    let summary = &result.summary;
    assert_eq!(summary.total_tracks, 3);
    assert_eq!(summary.total_covers, 1);
    assert_eq!(summary.total_releases(), 2);
    assert_eq!(summary.groups["111"].total, 3);
    assert_eq!(summary.groups["111"].missing, 0);
    assert_eq!(summary.groups["Single"].missing, 1);
}

/// 2回続けて実行してもレポートは上書きされない
#[test]
fn test_repeated_runs_do_not_collide() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    write_manifest(&manifest, "Лист1", &[["", "", "a.mp3", ""]]);
    touch_files(&folder, &["a.mp3"]);

    let req = request(dir.path(), &manifest, &folder);
    let (_, first) = compare(&req, &NoopObserver).unwrap();
    let (_, second) = compare(&req, &NoopObserver).unwrap();

    assert_ne!(first.report_path, second.report_path);
    assert!(Path::new(&first.report_path).exists());
    assert!(Path::new(&second.report_path).exists());
}

/// 並列でも逐次でも同じ結果
#[test]
fn test_parallel_matches_sequential() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (manifest, folder) = paths(dir.path());
    let names: Vec<String> = (0..40).map(|i| format!("Track {:02}.mp3", i)).collect();
    let rows: Vec<[&str; 4]> = names.iter().map(|n| ["", "Album", n.as_str(), ""]).collect();
    write_manifest(&manifest, "Лист1", &rows);
    let files: Vec<String> = (0..40).step_by(3).map(|i| format!("track {:02}.mp3", i)).collect();
    touch_files(&folder, &files.iter().map(String::as_str).collect::<Vec<_>>());

    let mut req = request(dir.path(), &manifest, &folder);
    req.reconcile.parallel = true;
    let (parallel, _) = compare(&req, &NoopObserver).unwrap();
    req.reconcile.parallel = false;
    let (sequential, _) = compare(&req, &NoopObserver).unwrap();

    assert_eq!(parallel, sequential);
}
