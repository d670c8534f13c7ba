//! # askbase
//!
//! **A retrieval-augmented question answering service over a single
//! knowledge corpus.**
//!
//! An administrator uploads free-text documents into the knowledge store;
//! users submit natural-language queries; the pipeline retrieves the most
//! relevant passages and produces an answer, either by extractive QA over
//! the retrieved context or by forwarding context plus query to a
//! completion model.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ extract ──▶ store (hard replace)
//!
//! query ──▶ chunk ──▶ rank ──▶ assemble ──▶ answer ──▶ outcome
//!            │          │                      │
//!            │          └─ embedding service   ├─ extractive QA service
//!            │             (dense strategy)    └─ completion service
//!            └─ passages are derived per query, never persisted
//! ```
//!
//! 1. Stored document content is split into passages by the
//!    paragraph/sentence chunker ([`chunk`]).
//! 2. The **ranker** ([`rank`]) orders passages by relevance using the
//!    configured strategy: keyword containment, fuzzy string score, or
//!    dense-embedding cosine similarity.
//! 3. The **assembler** ([`context`]) joins accepted passages into one
//!    bounded context string or signals insufficiency.
//! 4. The **answer generator** ([`answer`]) produces the final text via
//!    the extractive or generative backend.
//! 5. The **pipeline** ([`pipeline`]) maps every path to one terminal
//!    outcome with a fixed user-visible sentence.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`models`] | Core data types: `Document`, `Passage`, `ScoredPassage` |
//! | [`error`] | Error taxonomy for requests and collaborator calls |
//! | [`chunk`] | Passage splitter with minimum-length floor |
//! | [`fuzzy`] | 0–100 token-set edit-distance scoring |
//! | [`embedding`] | Embedding trait, remote client, cosine similarity |
//! | [`qa`] | Extractive question-answering collaborator |
//! | [`completion`] | Chat-completion collaborator |
//! | [`rank`] | Keyword, fuzzy, and dense ranking strategies |
//! | [`context`] | Context assembly with word-count admission |
//! | [`answer`] | Extractive/generative answer generation |
//! | [`pipeline`] | Query state machine and outcome mapping |
//! | [`store`] | `KnowledgeStore` trait, in-memory and SQLite backends |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Database schema migrations (idempotent) |
//! | [`extract`] | Upload text extraction (plain text, DOCX) |
//! | [`ingest`] | Admin upload/list/get/update/delete flows |

pub mod answer;
pub mod chunk;
pub mod completion;
pub mod config;
pub mod context;
pub mod db;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod ingest;
pub mod migrate;
pub mod models;
pub mod pipeline;
pub mod qa;
pub mod rank;
pub mod store;

pub use pipeline::{ModelSet, OutcomeStatus, QueryOutcome, QueryPipeline};
pub use store::KnowledgeStore;
