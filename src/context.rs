//! Context assembly from ranked passages.
//!
//! Joins accepted passages into a single context string and applies the
//! minimum-word admission rule. An empty or too-thin context is reported
//! as `None`, which the pipeline surfaces as the distinct "not enough
//! information" outcome rather than an empty answer.

use crate::models::ScoredPassage;

/// Join ranked passages with a blank line between them.
///
/// Returns `None` when no passages were accepted or when the joined text
/// falls below `min_words` whitespace-separated words (see
/// `[context] min_words` in the config).
pub fn assemble(ranked: &[ScoredPassage], min_words: usize) -> Option<String> {
    if ranked.is_empty() {
        return None;
    }

    let joined = ranked
        .iter()
        .map(|sp| sp.passage.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    if joined.split_whitespace().count() < min_words {
        return None;
    }

    Some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Passage;

    fn scored(text: &str) -> ScoredPassage {
        ScoredPassage {
            passage: Passage {
                document_id: "doc-1".to_string(),
                text: text.to_string(),
            },
            score: 0.9,
        }
    }

    #[test]
    fn empty_input_is_insufficient() {
        assert!(assemble(&[], 10).is_none());
    }

    #[test]
    fn thin_context_is_insufficient() {
        let ranked = vec![scored("only four words here")];
        assert!(assemble(&ranked, 10).is_none());
    }

    #[test]
    fn passages_joined_with_blank_line() {
        let ranked = vec![
            scored("The first passage has exactly six words."),
            scored("The second passage also has six words."),
        ];
        let context = assemble(&ranked, 10).unwrap();
        assert_eq!(
            context,
            "The first passage has exactly six words.\n\nThe second passage also has six words."
        );
    }

    #[test]
    fn word_floor_is_inclusive() {
        let ranked = vec![scored("one two three four five six seven eight nine ten")];
        assert!(assemble(&ranked, 10).is_some());
        assert!(assemble(&ranked, 11).is_none());
    }

    #[test]
    fn stricter_profile_rejects_what_default_accepts() {
        let ranked = vec![scored(
            "twelve words of context sit in this passage for the test here",
        )];
        assert!(assemble(&ranked, 10).is_some());
        assert!(assemble(&ranked, 20).is_none());
    }
}
