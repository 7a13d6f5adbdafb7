//! 最良一致の検索と差分表示

use crate::normalize::{normalize, same_extension, split_extension};
use crate::similarity::normalized_similarity;
use crate::types::CandidateFile;

/// 拡張子の合う候補が1件もないときの差分表記
pub const NOT_FOUND_SENTINEL: &str = "Файл не найден";

/// 最良一致
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch<'a> {
    pub candidate: Option<&'a CandidateFile>,
    pub score: f64,
}

impl BestMatch<'_> {
    fn none() -> Self {
        Self { candidate: None, score: 0.0 }
    }
}

/// 台帳上の名前に最も近い候補を探す
///
/// - 空の名前は一致なし・0
/// - 拡張子が異なる候補はスコア計算自体を省く
/// - 最高スコアが同点なら候補リストで先に出たものを採用（並べ替えない）
/// - スコア0の候補は一致とみなさない
pub fn find_best_match<'a>(declared_name: &str, candidates: &'a [CandidateFile]) -> BestMatch<'a> {
    let declared = normalize(declared_name);
    if declared.is_empty() {
        return BestMatch::none();
    }
    let (_, declared_ext) = split_extension(&declared);

    let mut best = BestMatch::none();
    for candidate in candidates {
        let (_, ext) = split_extension(&candidate.normalized_name);
        if !same_extension(declared_ext, ext) {
            continue;
        }

        let score = normalized_similarity(&declared, &candidate.normalized_name);
        if score > best.score {
            best = BestMatch { candidate: Some(candidate), score };
        }
    }

    best
}

/// 正規化後の2名の文字単位の差分を説明する
///
/// `Позиция N: 'x' vs 'y'` を位置ごとに並べ、長さが違えば余った文字を続ける。
/// 同一なら空文字。
pub fn describe_differences(declared: &str, matched: &str) -> String {
    let left: Vec<char> = normalize(declared).chars().collect();
    let right: Vec<char> = normalize(matched).chars().collect();

    let mut parts: Vec<String> = left
        .iter()
        .zip(right.iter())
        .enumerate()
        .filter(|(_, (l, r))| l != r)
        .map(|(i, (l, r))| format!("Позиция {}: '{}' vs '{}'", i + 1, l, r))
        .collect();

    let common = left.len().min(right.len());
    if left.len() > common {
        let extra: String = left[common..].iter().collect();
        parts.push(format!("Лишние символы в первой строке: '{}'", extra));
    }
    if right.len() > common {
        let extra: String = right[common..].iter().collect();
        parts.push(format!("Лишние символы во второй строке: '{}'", extra));
    }

    parts.join("; ")
}
