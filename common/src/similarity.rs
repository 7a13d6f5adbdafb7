//! ファイル名の類似度（0〜100）
//!
//! 拡張子は比較の前提条件で、異なれば本体がどれだけ似ていても0。
//! 本体同士は Ratcliff/Obershelp（ゲシュタルト・パターンマッチング）の
//! 比率 `2 * M / T` を使う。M は再帰的に求めた最長一致ブロックの文字数合計、
//! T は両者の文字数合計。

use crate::normalize::{normalize, same_extension, split_extension};
use std::collections::HashMap;

/// この長さ以上の文字列では頻出文字を一致の起点から外す
const AUTOJUNK_MIN_LEN: usize = 200;

/// 2つのファイル名の類似度を返す
///
/// どちらかが空（正規化後）なら0。対称: `similarity(a, b) == similarity(b, a)`。
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_similarity(&a, &b)
}

/// 正規化済みの2名の類似度
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let (a_stem, a_ext) = split_extension(a);
    let (b_stem, b_ext) = split_extension(b);

    if !same_extension(a_ext, b_ext) {
        return 0.0;
    }

    ratio(a_stem, b_stem) * 100.0
}

/// 文字列の一致比率（0.0〜1.0）
///
/// 引数の順序で結果が揺れないよう、辞書順で小さい方を左に置いて計算する。
pub fn ratio(a: &str, b: &str) -> f64 {
    let (left, right) = if a <= b { (a, b) } else { (b, a) };
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }

    let matched = SequenceMatcher::new(&left, &right).matching_characters();
    2.0 * matched as f64 / total as f64
}

/// 最長一致ブロックを再帰的に集める照合器
struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// b の各文字 → 出現位置（昇順）
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        // 長い文字列では1%超の頻度で現れる文字を起点候補から外す
        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// 一致ブロックの文字数合計
    fn matching_characters(&self) -> usize {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    /// a[alo..ahi] と b[blo..bhi] の最長一致 (i, j, size)
    ///
    /// 同じ長さなら a 側で最も早く、次に b 側で最も早いものを返す。
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // 起点から外した頻出文字の分だけ前後に伸ばす
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}
