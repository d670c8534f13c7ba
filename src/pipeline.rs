//! Query pipeline orchestration.
//!
//! [`QueryPipeline::handle_query`] drives a request through chunking,
//! ranking, context assembly, and answer generation, resolving every
//! request to exactly one terminal outcome:
//!
//! | Outcome | Status | When |
//! |---------|--------|------|
//! | rejected | `BadRequest` | empty or whitespace-only query (checked before anything else) |
//! | models unavailable | `ServiceUnavailable` | a required collaborator never loaded (checked before touching the store) |
//! | knowledge base empty | `NotFound` | the store holds no documents |
//! | insufficient context | `Ok` | ranker or assembler found nothing adequate (a normal soft outcome, not an error) |
//! | answer produced | `Ok` | the backend returned usable text |
//!
//! Transient collaborator failures during ranking or generation are caught
//! here, logged, and converted to fixed user-facing sentences; the caller
//! never sees a raw fault. All of the fixed sentences live in this module;
//! the error types themselves carry only failure kinds.

use std::sync::Arc;
use tracing::{error, warn};

use crate::answer::{AnswerGenerator, AnswerOutcome};
use crate::chunk::split_passages;
use crate::completion::{CompletionModel, RemoteCompletion};
use crate::config::Config;
use crate::context::assemble;
use crate::embedding::{Embedder, RemoteEmbedder};
use crate::models::Passage;
use crate::qa::{ExtractiveQa, RemoteQa};
use crate::rank::{rank_dense, rank_fuzzy, rank_keyword, Strategy};
use crate::store::KnowledgeStore;

pub const MSG_EMPTY_QUERY: &str = "No query provided.";
pub const MSG_MODELS_UNAVAILABLE: &str =
    "Models are unavailable. Please contact the administrator.";
pub const MSG_EMPTY_KNOWLEDGE_BASE: &str = "The knowledge base is empty. Please contact the admin.";
pub const MSG_INSUFFICIENT_CONTEXT: &str =
    "I couldn't find enough relevant information for your query.";
pub const MSG_NO_SPECIFIC_ANSWER: &str =
    "I couldn't find a specific answer to your query. Please try rephrasing it.";
pub const MSG_PROCESSING_FAILURE: &str = "Sorry, I couldn't process your query at the moment.";

/// HTTP-adjacent status of a query outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Ok,
    BadRequest,
    NotFound,
    ServiceUnavailable,
}

/// Terminal result of one query: a status plus the exact user-visible text.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub status: OutcomeStatus,
    pub message: String,
}

impl QueryOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Ok,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::BadRequest,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::NotFound,
            message: message.into(),
        }
    }

    fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::ServiceUnavailable,
            message: message.into(),
        }
    }
}

/// The model collaborators, constructed once at startup and injected into
/// the pipeline.
pub struct ModelSet {
    pub embedder: Option<Arc<dyn Embedder>>,
    pub qa: Option<Arc<dyn ExtractiveQa>>,
    pub completion: Option<Arc<dyn CompletionModel>>,
}

impl ModelSet {
    /// Construct every collaborator the configuration enables.
    ///
    /// A client that fails to initialize (missing credentials, bad config)
    /// is logged and left unloaded; queries that need it resolve to the
    /// models-unavailable outcome instead of crashing the process.
    pub fn initialize(config: &Config) -> Self {
        let embedder: Option<Arc<dyn Embedder>> = if config.embedding.is_enabled() {
            match RemoteEmbedder::new(&config.embedding) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!(error = %e, "embedding client failed to initialize");
                    None
                }
            }
        } else {
            None
        };

        let qa: Option<Arc<dyn ExtractiveQa>> = match RemoteQa::new(&config.qa) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %e, "extractive QA client failed to initialize");
                None
            }
        };

        let completion: Option<Arc<dyn CompletionModel>> =
            match RemoteCompletion::new(&config.completion) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    warn!(error = %e, "completion client failed to initialize");
                    None
                }
            };

        Self {
            embedder,
            qa,
            completion,
        }
    }
}

/// The retrieval-and-answering pipeline.
///
/// Stateless per request: the only shared resource is the store, and the
/// only mutation of it happens through the admin upload flow, never here.
pub struct QueryPipeline {
    store: Arc<dyn KnowledgeStore>,
    strategy: Strategy,
    embedder: Option<Arc<dyn Embedder>>,
    answerer: AnswerGenerator,
    min_passage_chars: usize,
    top_k: usize,
    min_similarity: f64,
    fuzzy_score_floor: f64,
    min_context_words: usize,
}

impl QueryPipeline {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        strategy: Strategy,
        embedder: Option<Arc<dyn Embedder>>,
        answerer: AnswerGenerator,
        config: &Config,
    ) -> Self {
        Self {
            store,
            strategy,
            embedder,
            answerer,
            min_passage_chars: config.chunking.min_passage_chars,
            top_k: config.retrieval.top_k,
            min_similarity: config.retrieval.min_similarity,
            fuzzy_score_floor: config.retrieval.fuzzy_score_floor,
            min_context_words: config.context.min_words,
        }
    }

    /// Handle one query end to end. Never fails: every path resolves to a
    /// [`QueryOutcome`].
    pub async fn handle_query(&self, query: &str) -> QueryOutcome {
        // Fail fast on empty input, before any collaborator or store work.
        let query = query.trim();
        if query.is_empty() {
            return QueryOutcome::bad_request(MSG_EMPTY_QUERY);
        }

        // Required collaborators are checked before touching the store.
        if !self.models_ready() {
            return QueryOutcome::service_unavailable(MSG_MODELS_UNAVAILABLE);
        }

        let documents = match self.store.list().await {
            Ok(docs) => docs,
            Err(e) => {
                error!(error = %e, "knowledge store read failed");
                return QueryOutcome::service_unavailable(MSG_PROCESSING_FAILURE);
            }
        };

        if documents.is_empty() {
            return QueryOutcome::not_found(MSG_EMPTY_KNOWLEDGE_BASE);
        }

        let passages: Vec<Passage> = documents
            .iter()
            .flat_map(|doc| {
                split_passages(&doc.content, self.min_passage_chars)
                    .into_iter()
                    .map(|text| Passage {
                        document_id: doc.id.clone(),
                        text,
                    })
            })
            .collect();

        let ranked = match self.strategy {
            Strategy::Keyword => rank_keyword(query, passages),
            Strategy::Fuzzy => rank_fuzzy(query, passages, self.fuzzy_score_floor),
            Strategy::Dense => {
                let embedder = match self.embedder.as_deref() {
                    Some(e) => e,
                    None => return QueryOutcome::service_unavailable(MSG_MODELS_UNAVAILABLE),
                };
                match rank_dense(query, passages, embedder, self.top_k, self.min_similarity).await
                {
                    Ok(ranked) => ranked,
                    Err(e) => {
                        // A transient embedding failure degrades to the
                        // no-context outcome rather than failing the request.
                        warn!(error = %e, "dense ranking failed");
                        Vec::new()
                    }
                }
            }
        };

        let context = match assemble(&ranked, self.min_context_words) {
            Some(context) => context,
            None => return QueryOutcome::ok(MSG_INSUFFICIENT_CONTEXT),
        };

        match self.answerer.answer(query, &context).await {
            Ok(AnswerOutcome::Answered(text)) => QueryOutcome::ok(text),
            Ok(AnswerOutcome::NoSpecificAnswer) => QueryOutcome::ok(MSG_NO_SPECIFIC_ANSWER),
            Err(e) => {
                warn!(error = %e, "answer generation failed");
                QueryOutcome::ok(MSG_PROCESSING_FAILURE)
            }
        }
    }

    /// True when every collaborator the configured strategy and backend
    /// need is loaded.
    fn models_ready(&self) -> bool {
        let strategy_ready = !self.strategy.needs_embedder() || self.embedder.is_some();
        strategy_ready && self.answerer.ready()
    }
}
