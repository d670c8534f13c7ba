//! Fuzzy string scoring on a 0–100 scale.
//!
//! Implements the token-set edit-distance ratio used by the fuzzy retrieval
//! strategy: both strings are lowercased and tokenized, and the score is the
//! best plain ratio among the sorted token intersection and the two sorted
//! full token sets. Word order and repeated words therefore do not count
//! against a match, while genuinely unrelated text scores low.

use std::collections::BTreeSet;

/// Levenshtein edit distance between two strings, by character.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    // Two-row DP over the edit matrix.
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, &ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Plain similarity ratio in `[0.0, 100.0]`.
///
/// `100` means identical; two empty strings are identical by definition.
pub fn ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 100.0;
    }
    let distance = levenshtein(a, b);
    100.0 * (1.0 - distance as f64 / longest as f64)
}

/// Token-set similarity ratio in `[0.0, 100.0]`.
///
/// Compares the sorted intersection of the two token sets against each
/// sorted full set and returns the best plain [`ratio`] among the three
/// pairings. A query whose tokens are all contained in the candidate
/// scores `100` regardless of word order or extra candidate words.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = token_set(a);
    let tokens_b = token_set(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return if tokens_a.is_empty() && tokens_b.is_empty() {
            100.0
        } else {
            0.0
        };
    }

    let intersection: Vec<&String> = tokens_a.intersection(&tokens_b).collect();
    let only_a: Vec<&String> = tokens_a.difference(&tokens_b).collect();
    let only_b: Vec<&String> = tokens_b.difference(&tokens_a).collect();

    let joined = |words: &[&String]| -> String {
        words
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let base = joined(&intersection);
    let with_a = join_nonempty(&base, &joined(&only_a));
    let with_b = join_nonempty(&base, &joined(&only_b));

    ratio(&base, &with_a)
        .max(ratio(&base, &with_b))
        .max(ratio(&with_a, &with_b))
}

/// Score `query` against every candidate and return the index and score of
/// the best one. Ties resolve to the earliest candidate.
pub fn best_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let score = token_set_ratio(query, candidate.as_ref());
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

fn token_set(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

fn join_nonempty(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{} {}", a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
    }

    #[test]
    fn ratio_identical_is_100() {
        assert!((ratio("hello world", "hello world") - 100.0).abs() < 1e-9);
    }

    #[test]
    fn token_subset_scores_100() {
        let score = token_set_ratio("cat sat on mat", "The cat sat on the mat");
        assert!((score - 100.0).abs() < 1e-9, "score was {}", score);
    }

    #[test]
    fn reordered_tokens_score_100() {
        let score = token_set_ratio("mat cat on sat", "cat sat on mat");
        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unrelated_text_scores_low() {
        let score = token_set_ratio("xyz completely unrelated", "The cat sat on the mat");
        assert!(score < 70.0, "score was {}", score);
        let score = token_set_ratio("xyz completely unrelated", "Quantum entanglement explained");
        assert!(score < 70.0, "score was {}", score);
    }

    #[test]
    fn best_match_picks_highest() {
        let candidates = [
            "The cat sat on the mat",
            "Quantum entanglement explained",
        ];
        let (idx, score) = best_match("cat sat on mat", &candidates).unwrap();
        assert_eq!(idx, 0);
        assert!(score >= 70.0);
    }

    #[test]
    fn best_match_tie_resolves_to_earlier() {
        let candidates = ["same tokens here", "same tokens here"];
        let (idx, _) = best_match("same tokens here", &candidates).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn best_match_empty_candidates() {
        let candidates: [&str; 0] = [];
        assert!(best_match("anything", &candidates).is_none());
    }
}
