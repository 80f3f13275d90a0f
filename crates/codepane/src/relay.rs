//! HTTP client for the prompt relay.

use std::error::Error as StdError;
use std::fmt::{self, Display};

use codepane_model::{
    Completion, CompletionProvider, CompletionRequest, ErrorKind,
    ProviderError,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Error type for [`RelayProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
}

impl Error {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Clone, Debug, Serialize)]
struct GenerateRequest {
    prompt: String,
}

#[derive(Clone, Debug, Deserialize)]
struct GenerateReply {
    code: Option<String>,
    error: Option<String>,
}

fn interpret(reply: GenerateReply) -> Result<Completion, Error> {
    // An `error` field wins regardless of the HTTP status, and `details`
    // is not surfaced to the conversation.
    if let Some(error) = reply.error {
        return Err(Error::new(error));
    }
    let Some(code) = reply.code else {
        return Err(Error::new("response contains neither code nor error"));
    };
    Ok(Completion::new(code))
}

/// A [`CompletionProvider`] backed by the relay's `POST /generate-code`
/// endpoint.
#[derive(Clone, Debug)]
pub struct RelayProvider {
    client: Client,
    base_url: String,
}

impl RelayProvider {
    /// Creates a provider that talks to the relay at `base_url`.
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

impl CompletionProvider for RelayProvider {
    type Error = Error;

    fn generate(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send + 'static
    {
        let resp_fut = self
            .client
            .post(format!("{}/generate-code", self.base_url))
            .json(&GenerateRequest {
                prompt: req.prompt.clone(),
            })
            .send();

        async move {
            let resp = resp_fut
                .await
                .map_err(|err| Error::new(format!("{err}")))?;
            let reply: GenerateReply = resp.json().await.map_err(|err| {
                Error::new(format!("invalid response body: {err}"))
            })?;
            interpret(reply)
        }
    }
}
