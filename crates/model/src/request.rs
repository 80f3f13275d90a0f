/// A request to be sent to the completion provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompletionRequest {
    /// The full prompt text submitted to the service.
    pub prompt: String,
}

impl CompletionRequest {
    /// Creates a request from the given prompt text.
    #[inline]
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
