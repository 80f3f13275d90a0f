use codepane_model::ErrorKind;
use serde::{Deserialize, Serialize};

/// A single scripted outcome for a `generate` call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetOutcome {
    /// The call succeeds with the given text.
    #[serde(rename = "text")]
    Text(String),
    /// The call fails with the given message.
    #[serde(rename = "failure")]
    Failure(PresetFailure),
}

impl PresetOutcome {
    /// Creates a successful outcome with the specified text.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }

    /// Creates a failing outcome with the specified message.
    #[inline]
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self::Failure(PresetFailure {
            message: message.into(),
            kind: PresetErrorKind::Other,
        })
    }
}

/// The scripted failure for a `generate` call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetFailure {
    /// The error message.
    pub message: String,
    /// The error kind reported to the caller.
    pub kind: PresetErrorKind,
}

/// Serializable mirror of [`ErrorKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetErrorKind {
    /// Maps to [`ErrorKind::Auth`].
    Auth,
    /// Maps to [`ErrorKind::RateLimitExceeded`].
    RateLimitExceeded,
    /// Maps to [`ErrorKind::Other`].
    Other,
}

impl From<PresetErrorKind> for ErrorKind {
    fn from(kind: PresetErrorKind) -> Self {
        match kind {
            PresetErrorKind::Auth => ErrorKind::Auth,
            PresetErrorKind::RateLimitExceeded => ErrorKind::RateLimitExceeded,
            PresetErrorKind::Other => ErrorKind::Other,
        }
    }
}
