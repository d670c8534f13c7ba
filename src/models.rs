//! Core data types flowing through the retrieval and answering pipeline.
//!
//! A [`Document`] is the persisted unit; [`Passage`] and [`ScoredPassage`]
//! are derived at query time and never stored.

/// A stored corpus entry.
///
/// The store owns its documents; callers always receive clones.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A retrieval-granularity slice of a document, produced by the passage
/// splitter at query time. Carries a back-reference to its source document.
#[derive(Debug, Clone)]
pub struct Passage {
    pub document_id: String,
    pub text: String,
}

/// A passage paired with its relevance score. Rankers return these ordered
/// highest-relevance first.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: Passage,
    pub score: f64,
}
