//! Relevance ranking over candidate passages.
//!
//! Three interchangeable strategies, selected by `[retrieval] strategy`:
//!
//! | Strategy | Engine | Accepts |
//! |----------|--------|---------|
//! | `keyword` | substring containment of the leading query tokens | first matching passage, document order |
//! | `fuzzy` | token-set edit-distance ratio (0–100) | single best passage at or above the score floor |
//! | `dense` | embedding cosine similarity | top-k passages at or above the similarity threshold |
//!
//! All strategies may accept zero passages; that is a normal outcome
//! (no sufficiently relevant content), not an error.

use std::str::FromStr;
use tracing::debug;

use crate::embedding::{cosine_similarity, Embedder};
use crate::error::CollaboratorError;
use crate::fuzzy;
use crate::models::{Passage, ScoredPassage};

/// Ranking strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Keyword,
    Fuzzy,
    Dense,
}

impl Strategy {
    /// True when the strategy needs an embedding collaborator.
    pub fn needs_embedder(&self) -> bool {
        matches!(self, Strategy::Dense)
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyword" => Ok(Strategy::Keyword),
            "fuzzy" => Ok(Strategy::Fuzzy),
            "dense" => Ok(Strategy::Dense),
            other => anyhow::bail!(
                "Unknown retrieval strategy: '{}'. Use keyword, fuzzy, or dense.",
                other
            ),
        }
    }
}

/// Keyword containment scan.
///
/// Lower-cases the query, takes its first two whitespace tokens, and scans
/// passages in document order. The first passage containing every needle
/// wins outright; no further passages are examined.
pub fn rank_keyword(query: &str, passages: Vec<Passage>) -> Vec<ScoredPassage> {
    let query_lower = query.to_lowercase();
    let needles: Vec<&str> = query_lower.split_whitespace().take(2).collect();
    if needles.is_empty() {
        return Vec::new();
    }

    for passage in passages {
        let text_lower = passage.text.to_lowercase();
        if needles.iter().all(|n| text_lower.contains(n)) {
            return vec![ScoredPassage {
                passage,
                score: 1.0,
            }];
        }
    }

    Vec::new()
}

/// Fuzzy best-match scan.
///
/// Scores every passage against the query on the 0–100 scale and accepts
/// the single best one if it reaches `score_floor`. Ties resolve to the
/// earlier passage in document order.
pub fn rank_fuzzy(query: &str, passages: Vec<Passage>, score_floor: f64) -> Vec<ScoredPassage> {
    let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();

    match fuzzy::best_match(query, &texts) {
        Some((idx, score)) if score >= score_floor => {
            debug!(score, "fuzzy match accepted");
            passages
                .into_iter()
                .nth(idx)
                .map(|passage| vec![ScoredPassage { passage, score }])
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Dense-embedding ranking.
///
/// Encodes the query and every passage, scores by cosine similarity, sorts
/// descending, keeps the `top_k` best, and admits only those at or above
/// `min_similarity`.
pub async fn rank_dense(
    query: &str,
    passages: Vec<Passage>,
    embedder: &dyn Embedder,
    top_k: usize,
    min_similarity: f64,
) -> Result<Vec<ScoredPassage>, CollaboratorError> {
    if passages.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
    let query_vec = embedder.encode(query).await?;
    let passage_vecs = embedder.encode_batch(&texts).await?;

    let mut scored: Vec<ScoredPassage> = passages
        .into_iter()
        .zip(passage_vecs.iter())
        .map(|(passage, vec)| ScoredPassage {
            score: cosine_similarity(&query_vec, vec) as f64,
            passage,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_k);
    scored.retain(|sp| sp.score >= min_similarity);

    debug!(
        scores = ?scored.iter().map(|sp| sp.score).collect::<Vec<_>>(),
        "dense ranking accepted passages"
    );

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn passage(text: &str) -> Passage {
        Passage {
            document_id: "doc-1".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn strategy_parses() {
        assert_eq!("keyword".parse::<Strategy>().unwrap(), Strategy::Keyword);
        assert_eq!("fuzzy".parse::<Strategy>().unwrap(), Strategy::Fuzzy);
        assert_eq!("dense".parse::<Strategy>().unwrap(), Strategy::Dense);
        assert!("bm25".parse::<Strategy>().is_err());
    }

    #[test]
    fn keyword_first_match_wins() {
        let passages = vec![
            passage("Nothing relevant in this one."),
            passage("The billing policy covers refunds for annual plans."),
            passage("The billing policy also mentions refunds here, later."),
        ];
        let ranked = rank_keyword("billing policy details", passages);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].passage.text.contains("annual plans"));
    }

    #[test]
    fn keyword_requires_both_leading_tokens() {
        let passages = vec![passage("The policy alone is not enough to match.")];
        assert!(rank_keyword("billing policy", passages).is_empty());
    }

    #[test]
    fn keyword_is_case_insensitive() {
        let passages = vec![passage("BILLING Policy text that should match fine.")];
        let ranked = rank_keyword("billing policy", passages);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn keyword_single_token_query_matches_on_it() {
        let passages = vec![passage("The refunds process takes five days.")];
        let ranked = rank_keyword("refunds", passages);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn fuzzy_accepts_best_above_floor() {
        let passages = vec![
            passage("The cat sat on the mat"),
            passage("Quantum entanglement explained"),
        ];
        let ranked = rank_fuzzy("cat sat on mat", passages, 70.0);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].passage.text.contains("cat"));
        assert!(ranked[0].score >= 70.0);
    }

    #[test]
    fn fuzzy_rejects_everything_below_floor() {
        let passages = vec![
            passage("The cat sat on the mat"),
            passage("Quantum entanglement explained"),
        ];
        assert!(rank_fuzzy("xyz completely unrelated", passages, 70.0).is_empty());
    }

    /// Returns the first vector for any query and the listed vectors for
    /// batches, keyed by position.
    struct FixedEmbedder {
        query_vec: Vec<f32>,
        batch_vecs: Vec<Vec<f32>>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        fn model_name(&self) -> &str {
            "fixed"
        }
        fn dims(&self) -> usize {
            self.query_vec.len()
        }
        async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CollaboratorError> {
            Ok(self.batch_vecs.iter().take(texts.len()).cloned().collect())
        }
        async fn encode(&self, _text: &str) -> Result<Vec<f32>, CollaboratorError> {
            Ok(self.query_vec.clone())
        }
    }

    #[tokio::test]
    async fn dense_admits_close_excludes_unrelated() {
        let embedder = FixedEmbedder {
            query_vec: vec![1.0, 0.0],
            batch_vecs: vec![vec![0.9, 0.1], vec![0.0, 1.0]],
        };
        let passages = vec![
            passage("Semantically close passage about the topic."),
            passage("Completely unrelated passage about something else."),
        ];
        let ranked = rank_dense("the topic", passages, &embedder, 3, 0.3)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].passage.text.contains("close"));
        assert!(ranked[0].score >= 0.3);
    }

    #[tokio::test]
    async fn dense_respects_top_k() {
        let embedder = FixedEmbedder {
            query_vec: vec![1.0, 0.0],
            batch_vecs: vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.8, 0.2], vec![0.7, 0.3]],
        };
        let passages = (0..4)
            .map(|i| passage(&format!("Passage number {} in the corpus.", i)))
            .collect();
        let ranked = rank_dense("query", passages, &embedder, 3, 0.3)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 3);
        // Highest similarity first.
        assert!(ranked[0].score >= ranked[1].score);
        assert!(ranked[1].score >= ranked[2].score);
    }

    #[tokio::test]
    async fn dense_empty_passages_short_circuits() {
        struct PanicEmbedder;
        #[async_trait]
        impl Embedder for PanicEmbedder {
            fn model_name(&self) -> &str {
                "panic"
            }
            fn dims(&self) -> usize {
                0
            }
            async fn encode_batch(
                &self,
                _texts: &[String],
            ) -> Result<Vec<Vec<f32>>, CollaboratorError> {
                panic!("should not be called for an empty passage set");
            }
        }
        let ranked = rank_dense("query", Vec::new(), &PanicEmbedder, 3, 0.3)
            .await
            .unwrap();
        assert!(ranked.is_empty());
    }
}
