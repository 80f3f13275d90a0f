use serde::{Deserialize, Serialize};

/// A completed response from the provider.
///
/// There is no streaming surface here: the services this crate abstracts
/// are queried once and answer with one finished block of text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text, exactly as the service produced it.
    ///
    /// An empty string is a valid completion, not an error.
    pub text: String,
}

impl Completion {
    /// Creates a completion from the given text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }
}
