//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum EnvError {
    // ─────────────────────────────────────────────────────────────
    // Binding errors (WENV-010 to WENV-011)
    // ─────────────────────────────────────────────────────────────

    #[error("WENV-010: Unsupported binding kind: {binding}")]
    UnsupportedBindingKind { binding: String },

    #[error("WENV-011: Invalid binding name '{name}': {reason}")]
    InvalidBindingName { name: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Provider errors (WENV-020)
    // ─────────────────────────────────────────────────────────────

    #[error("WENV-020: No {provider} provider configured")]
    ProviderNotConfigured { provider: &'static str },

    /// Raised by a host provider; passed through untouched
    #[error(transparent)]
    Provider(#[from] anyhow::Error),

    // ─────────────────────────────────────────────────────────────
    // Global environment errors (WENV-030 to WENV-040)
    // ─────────────────────────────────────────────────────────────

    #[error("WENV-030: Structured clone failed: {0}")]
    StructuredClone(#[source] serde_json::Error),

    #[error("WENV-040: Invalid response status {status}: {reason}")]
    InvalidResponseStatus { status: u16, reason: &'static str },

    // ─────────────────────────────────────────────────────────────
    // Config errors
    // ─────────────────────────────────────────────────────────────

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for EnvError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            EnvError::UnsupportedBindingKind { .. } => Some(
                "Use one of: value, secret, kvNamespace, doNamespace, bucketName, dataset, d1DatabaseUuid",
            ),
            EnvError::InvalidBindingName { .. } => {
                Some("Binding names must be valid identifiers: letters, digits, '_' or '$', not starting with a digit")
            }
            EnvError::ProviderNotConfigured { .. } => {
                Some("Call WorkerGlobals::install before the script constructs a WebSocketPair")
            }
            EnvError::Provider(_) => None,
            EnvError::StructuredClone(_) => {
                Some("Keep request cf metadata to plain JSON data (string keys, finite numbers)")
            }
            EnvError::InvalidResponseStatus { .. } => {
                Some("Use a status in 200..=599, or 101 together with a webSocket")
            }
            EnvError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            EnvError::JsonParse(_) => Some("Check JSON syntax"),
            EnvError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
