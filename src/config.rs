use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub answer: AnswerConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub qa: QaConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Minimum trimmed passage length, in characters. Shorter candidates
    /// are dropped as noise (headers, stray punctuation).
    #[serde(default = "default_min_passage_chars")]
    pub min_passage_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_passage_chars: default_min_passage_chars(),
        }
    }
}

fn default_min_passage_chars() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Ranking strategy: `keyword`, `fuzzy`, or `dense`.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Number of passages the dense strategy keeps after sorting.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Cosine-similarity admission threshold for the dense strategy.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
    /// Minimum 0–100 score the fuzzy strategy accepts.
    #[serde(default = "default_fuzzy_score_floor")]
    pub fuzzy_score_floor: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
            fuzzy_score_floor: default_fuzzy_score_floor(),
        }
    }
}

fn default_strategy() -> String {
    "dense".to_string()
}
fn default_top_k() -> usize {
    3
}
fn default_min_similarity() -> f64 {
    0.3
}
fn default_fuzzy_score_floor() -> f64 {
    70.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContextConfig {
    /// Minimum word count the assembled context must reach; anything
    /// shorter is reported as insufficient context.
    #[serde(default = "default_min_words")]
    pub min_words: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
        }
    }
}

fn default_min_words() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnswerConfig {
    /// Answering backend: `extractive` or `generative`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Extractive spans with this many tokens or fewer are rejected.
    #[serde(default = "default_min_answer_tokens")]
    pub min_answer_tokens: usize,
    /// Output bound for the generative backend.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature for the generative backend.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            min_answer_tokens: default_min_answer_tokens(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_backend() -> String {
    "extractive".to_string()
}
fn default_min_answer_tokens() -> usize {
    2
}
fn default_max_tokens() -> u32 {
    256
}
fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: None,
            dims: None,
            endpoint: default_embedding_endpoint(),
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

fn default_embedding_provider() -> String {
    "disabled".to_string()
}
fn default_embedding_endpoint() -> String {
    "https://api.openai.com/v1/embeddings".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct QaConfig {
    /// Extractive question-answering endpoint. The default points at the
    /// hosted DistilBERT SQuAD model.
    #[serde(default = "default_qa_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            endpoint: default_qa_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_qa_endpoint() -> String {
    "https://api-inference.huggingface.co/models/distilbert-base-uncased-distilled-squad"
        .to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompletionConfig {
    #[serde(default = "default_completion_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_completion_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_completion_endpoint(),
            model: default_completion_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_completion_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}
fn default_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.chunking.min_passage_chars == 0 {
        anyhow::bail!("chunking.min_passage_chars must be > 0");
    }

    match config.retrieval.strategy.as_str() {
        "keyword" | "fuzzy" | "dense" => {}
        other => anyhow::bail!(
            "Unknown retrieval strategy: '{}'. Must be keyword, fuzzy, or dense.",
            other
        ),
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }

    if !(0.0..=1.0).contains(&config.retrieval.min_similarity) {
        anyhow::bail!("retrieval.min_similarity must be in [0.0, 1.0]");
    }

    if !(0.0..=100.0).contains(&config.retrieval.fuzzy_score_floor) {
        anyhow::bail!("retrieval.fuzzy_score_floor must be in [0.0, 100.0]");
    }

    if config.context.min_words == 0 {
        anyhow::bail!("context.min_words must be > 0");
    }

    match config.answer.backend.as_str() {
        "extractive" | "generative" => {}
        other => anyhow::bail!(
            "Unknown answer backend: '{}'. Must be extractive or generative.",
            other
        ),
    }

    if config.embedding.is_enabled() {
        if config.embedding.dims.is_none() || config.embedding.dims == Some(0) {
            anyhow::bail!(
                "embedding.dims must be > 0 when provider is '{}'",
                config.embedding.provider
            );
        }
        if config.embedding.model.is_none() {
            anyhow::bail!(
                "embedding.model must be specified when provider is '{}'",
                config.embedding.provider
            );
        }
    }

    match config.embedding.provider.as_str() {
        "disabled" | "openai" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    Ok(())
}
