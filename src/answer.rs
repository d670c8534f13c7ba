//! Answer generation over an assembled context.
//!
//! Two interchangeable backends, selected by `[answer] backend`:
//!
//! - **Extractive**: asks the QA collaborator for an answer span and
//!   rejects empty or trivially short spans.
//! - **Generative**: wraps the context in a system instruction and asks
//!   the completion collaborator for free text.
//!
//! Collaborator failures surface as [`CollaboratorError`]; the pipeline
//! maps them to the fixed user-facing fallback sentence, so callers of
//! the service never see a raw fault.

use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::completion::CompletionModel;
use crate::config::AnswerConfig;
use crate::error::CollaboratorError;
use crate::qa::ExtractiveQa;

/// Answering backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Extractive,
    Generative,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extractive" => Ok(Backend::Extractive),
            "generative" => Ok(Backend::Generative),
            other => anyhow::bail!(
                "Unknown answer backend: '{}'. Use extractive or generative.",
                other
            ),
        }
    }
}

/// What answering produced, short of a collaborator failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// A usable answer.
    Answered(String),
    /// The model returned nothing usable (empty or trivially short span).
    NoSpecificAnswer,
}

/// Produces answers from `(query, context)` via the configured backend.
pub struct AnswerGenerator {
    backend: Backend,
    qa: Option<Arc<dyn ExtractiveQa>>,
    completion: Option<Arc<dyn CompletionModel>>,
    min_answer_tokens: usize,
    max_tokens: u32,
    temperature: f32,
}

impl AnswerGenerator {
    pub fn new(
        backend: Backend,
        qa: Option<Arc<dyn ExtractiveQa>>,
        completion: Option<Arc<dyn CompletionModel>>,
        config: &AnswerConfig,
    ) -> Self {
        Self {
            backend,
            qa,
            completion,
            min_answer_tokens: config.min_answer_tokens,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// True when the collaborator the configured backend needs is loaded.
    pub fn ready(&self) -> bool {
        match self.backend {
            Backend::Extractive => self.qa.is_some(),
            Backend::Generative => self.completion.is_some(),
        }
    }

    /// Answer `query` from `context`.
    pub async fn answer(
        &self,
        query: &str,
        context: &str,
    ) -> Result<AnswerOutcome, CollaboratorError> {
        match self.backend {
            Backend::Extractive => self.answer_extractive(query, context).await,
            Backend::Generative => self.answer_generative(query, context).await,
        }
    }

    async fn answer_extractive(
        &self,
        query: &str,
        context: &str,
    ) -> Result<AnswerOutcome, CollaboratorError> {
        let qa = self
            .qa
            .as_ref()
            .ok_or(CollaboratorError::Unavailable("qa"))?;

        let result = qa.answer(query, context).await?;
        let span = result.answer.trim();

        if span.is_empty() || span.split_whitespace().count() <= self.min_answer_tokens {
            return Ok(AnswerOutcome::NoSpecificAnswer);
        }

        info!(confidence = ?result.confidence, "extractive answer produced");
        Ok(AnswerOutcome::Answered(span.to_string()))
    }

    async fn answer_generative(
        &self,
        query: &str,
        context: &str,
    ) -> Result<AnswerOutcome, CollaboratorError> {
        let completion = self
            .completion
            .as_ref()
            .ok_or(CollaboratorError::Unavailable("completion"))?;

        let system = format!(
            "You are a helpful assistant. Use the following knowledge base to answer the \
             user's question. If the knowledge base does not contain the answer, say that \
             you could not find enough information.\n\nKnowledge base:\n{}",
            context
        );

        let text = completion
            .complete(&system, query, self.max_tokens, self.temperature)
            .await?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(AnswerOutcome::NoSpecificAnswer);
        }

        Ok(AnswerOutcome::Answered(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::QaAnswer;
    use async_trait::async_trait;

    struct FixedQa {
        answer: String,
    }

    #[async_trait]
    impl ExtractiveQa for FixedQa {
        async fn answer(
            &self,
            _question: &str,
            _context: &str,
        ) -> Result<QaAnswer, CollaboratorError> {
            Ok(QaAnswer {
                answer: self.answer.clone(),
                confidence: Some(0.8),
            })
        }
    }

    struct FailingQa;

    #[async_trait]
    impl ExtractiveQa for FailingQa {
        async fn answer(
            &self,
            _question: &str,
            _context: &str,
        ) -> Result<QaAnswer, CollaboratorError> {
            Err(CollaboratorError::Api {
                service: "qa",
                status: 500,
                body: "internal".to_string(),
            })
        }
    }

    struct EchoCompletion;

    #[async_trait]
    impl CompletionModel for EchoCompletion {
        async fn complete(
            &self,
            _system: &str,
            user: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, CollaboratorError> {
            Ok(format!("  Answer to: {}  ", user))
        }
    }

    fn config() -> AnswerConfig {
        AnswerConfig::default()
    }

    #[test]
    fn backend_parses() {
        assert_eq!(
            "extractive".parse::<Backend>().unwrap(),
            Backend::Extractive
        );
        assert_eq!(
            "generative".parse::<Backend>().unwrap(),
            Backend::Generative
        );
        assert!("oracle".parse::<Backend>().is_err());
    }

    #[tokio::test]
    async fn extractive_returns_span() {
        let gen = AnswerGenerator::new(
            Backend::Extractive,
            Some(Arc::new(FixedQa {
                answer: "a full answer span".to_string(),
            })),
            None,
            &config(),
        );
        let outcome = gen.answer("question?", "context").await.unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome::Answered("a full answer span".to_string())
        );
    }

    #[tokio::test]
    async fn extractive_rejects_short_span() {
        let gen = AnswerGenerator::new(
            Backend::Extractive,
            Some(Arc::new(FixedQa {
                answer: "two words".to_string(),
            })),
            None,
            &config(),
        );
        let outcome = gen.answer("question?", "context").await.unwrap();
        assert_eq!(outcome, AnswerOutcome::NoSpecificAnswer);
    }

    #[tokio::test]
    async fn extractive_rejects_empty_span() {
        let gen = AnswerGenerator::new(
            Backend::Extractive,
            Some(Arc::new(FixedQa {
                answer: "   ".to_string(),
            })),
            None,
            &config(),
        );
        let outcome = gen.answer("question?", "context").await.unwrap();
        assert_eq!(outcome, AnswerOutcome::NoSpecificAnswer);
    }

    #[tokio::test]
    async fn extractive_failure_propagates_as_collaborator_error() {
        let gen = AnswerGenerator::new(
            Backend::Extractive,
            Some(Arc::new(FailingQa)),
            None,
            &config(),
        );
        let err = gen.answer("question?", "context").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Api { .. }));
    }

    #[tokio::test]
    async fn generative_trims_output() {
        let gen = AnswerGenerator::new(
            Backend::Generative,
            None,
            Some(Arc::new(EchoCompletion)),
            &config(),
        );
        let outcome = gen.answer("why?", "context").await.unwrap();
        assert_eq!(outcome, AnswerOutcome::Answered("Answer to: why?".to_string()));
    }

    #[test]
    fn readiness_follows_backend() {
        let gen = AnswerGenerator::new(
            Backend::Extractive,
            None,
            Some(Arc::new(EchoCompletion)),
            &config(),
        );
        assert!(!gen.ready());

        let gen = AnswerGenerator::new(
            Backend::Generative,
            None,
            Some(Arc::new(EchoCompletion)),
            &config(),
        );
        assert!(gen.ready());
    }
}
