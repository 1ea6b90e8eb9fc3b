#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WrapError>;

/// Everything that can abort a single wrap call.
///
/// None of these are retried inside the crate; the caller decides whether to
/// fall back to the unwrapped text.
#[derive(Debug, Error)]
pub enum WrapError {
    #[error("invalid wrap arguments: {message}")]
    InvalidArgs { message: String },

    #[error("invalid wrap configuration: {message}")]
    InvalidConfig { message: String },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("measurement failed: {message}")]
    Measurement { message: String },

    #[error("rule `{rule}` failed: {message}")]
    Rule { rule: &'static str, message: String },
}

impl WrapError {
    #[must_use]
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn measurement(message: impl Into<String>) -> Self {
        Self::Measurement {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn rule(rule: &'static str, message: impl Into<String>) -> Self {
        Self::Rule {
            rule,
            message: message.into(),
        }
    }
}

/// Compile a configured pattern, keeping the offending source on failure.
pub(crate) fn compile(pattern: &str) -> Result<regex::Regex> {
    regex::Regex::new(pattern).map_err(|source| WrapError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
