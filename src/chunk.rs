//! Passage splitter for stored document text.
//!
//! Splits a document body into candidate passages at blank-line boundaries
//! and at sentence-terminating periods followed by whitespace. Candidates
//! are trimmed, and anything shorter than the configured floor is dropped
//! as noise (headers, stray punctuation, list bullets).
//!
//! # Algorithm
//!
//! 1. Split the text on `\n\n` paragraph boundaries.
//! 2. Split each paragraph after a `.` that is followed by whitespace,
//!    keeping the period with the preceding sentence.
//! 3. Trim each candidate and discard those under `min_chars` characters.
//!
//! Document order is preserved. The splitter is a pure function: a document
//! with no qualifying split point yields a single passage if it meets the
//! length floor, otherwise nothing.

/// Split document text into retained passages.
///
/// `min_chars` is the minimum trimmed length (in characters) a candidate
/// must have to be kept; see `[chunking] min_passage_chars` in the config.
pub fn split_passages(text: &str, min_chars: usize) -> Vec<String> {
    let mut passages = Vec::new();

    for paragraph in text.split("\n\n") {
        for candidate in split_sentences(paragraph) {
            let trimmed = candidate.trim();
            if trimmed.chars().count() >= min_chars {
                passages.push(trimmed.to_string());
            }
        }
    }

    passages
}

/// Split a paragraph after each `.` followed by whitespace.
///
/// The period stays attached to the sentence it terminates; leading
/// whitespace on the following segment is left for the caller to trim.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c == '.' {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    segments.push(&paragraph[start..next_idx]);
                    start = next_idx;
                }
            }
        }
    }

    segments.push(&paragraph[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: usize = 20;

    #[test]
    fn short_fragment_dropped_long_paragraph_kept() {
        let text = "A short one.\n\nThis is a much longer paragraph exceeding twenty characters.";
        let passages = split_passages(text, FLOOR);
        assert_eq!(passages.len(), 1);
        assert!(passages[0].starts_with("This is a much longer"));
    }

    #[test]
    fn sentence_terminator_splits_within_paragraph() {
        let text = "The first sentence is long enough to keep. The second sentence also clears the floor.";
        let passages = split_passages(text, FLOOR);
        assert_eq!(passages.len(), 2);
        assert_eq!(passages[0], "The first sentence is long enough to keep.");
        assert_eq!(passages[1], "The second sentence also clears the floor.");
    }

    #[test]
    fn document_order_preserved() {
        let text = "Alpha paragraph with plenty of text.\n\nBeta paragraph with plenty of text.\n\nGamma paragraph with plenty of text.";
        let passages = split_passages(text, FLOOR);
        assert_eq!(passages.len(), 3);
        assert!(passages[0].starts_with("Alpha"));
        assert!(passages[1].starts_with("Beta"));
        assert!(passages[2].starts_with("Gamma"));
    }

    #[test]
    fn no_split_points_single_passage() {
        let text = "One unbroken run of text without a terminator";
        let passages = split_passages(text, FLOOR);
        assert_eq!(passages, vec![text.to_string()]);
    }

    #[test]
    fn nothing_qualifies_yields_empty() {
        assert!(split_passages("Tiny. Bits. Only.", FLOOR).is_empty());
        assert!(split_passages("", FLOOR).is_empty());
        assert!(split_passages("   \n\n  ", FLOOR).is_empty());
    }

    #[test]
    fn period_without_following_whitespace_does_not_split() {
        let text = "Version 1.2 of the tool shipped with twenty characters at least.";
        let passages = split_passages(text, FLOOR);
        assert_eq!(passages.len(), 1);
    }

    #[test]
    fn deterministic() {
        let text = "First piece of the corpus text here. Second piece of the corpus text here.";
        assert_eq!(split_passages(text, FLOOR), split_passages(text, FLOOR));
    }

    #[test]
    fn multibyte_text_is_handled() {
        let text = "Über lange Absätze müssen erhalten bleiben. Noch ein längerer Satz für den Test.";
        let passages = split_passages(text, FLOOR);
        assert_eq!(passages.len(), 2);
    }
}
