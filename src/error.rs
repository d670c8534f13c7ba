//! Error taxonomy for the pipeline and its collaborators.
//!
//! [`CollaboratorError`] covers every way a remote model call can fail.
//! The pipeline catches these at the point of call and maps them to the
//! fixed user-facing sentences in [`crate::pipeline`]; they never reach
//! the request boundary as raw faults.

use thiserror::Error;

/// Request-level failures the service reports directly to the caller.
///
/// Empty queries never become an error: the pipeline resolves them to a
/// bad-request outcome before any work happens.
#[derive(Error, Debug)]
pub enum AskError {
    /// Upload produced no usable content.
    #[error("no upload content provided")]
    EmptyContent,

    /// Upload file extension is not a supported format.
    #[error("invalid file type: {0}")]
    InvalidFileType(String),

    /// Operation referenced a document id that does not exist.
    #[error("knowledge base document {0} not found")]
    DocumentNotFound(String),
}

/// A failure while calling a remote model collaborator.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The collaborator was never initialized or is disabled by config.
    #[error("{0} model is unavailable")]
    Unavailable(&'static str),

    /// The call exceeded its configured deadline.
    #[error("{service} request timed out after {seconds}s")]
    Timeout { service: &'static str, seconds: u64 },

    /// The service answered with a non-success HTTP status.
    #[error("{service} error {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The response arrived but could not be interpreted.
    #[error("{service} returned a malformed response: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },

    /// Transport-level failure (connect, DNS, TLS).
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl CollaboratorError {
    /// Classify a reqwest error for `service`, preferring the timeout variant.
    pub fn from_reqwest(service: &'static str, timeout_secs: u64, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CollaboratorError::Timeout {
                service,
                seconds: timeout_secs,
            }
        } else {
            CollaboratorError::Transport {
                service,
                source: err,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_service_name() {
        let err = CollaboratorError::Timeout {
            service: "completion",
            seconds: 30,
        };
        assert!(err.to_string().contains("completion"));
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn not_found_names_the_document() {
        let err = AskError::DocumentNotFound("abc-123".to_string());
        assert!(err.to_string().contains("abc-123"));
    }
}
