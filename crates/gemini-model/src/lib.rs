//! A completion provider for the Google Gemini REST API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use codepane_model::{
    Completion, CompletionProvider, CompletionRequest, ErrorKind,
    ProviderError,
};
use reqwest::{Client, StatusCode, header};

pub use config::{GeminiConfig, GeminiConfigBuilder};
use proto::GenerateContentResponse;

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
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
        self.kind
    }
}

#[inline]
fn classify_status(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        401 | 403 => ErrorKind::Auth,
        429 => ErrorKind::RateLimitExceeded,
        _ => ErrorKind::Other,
    }
}

/// Gemini completion provider.
///
/// Calls the non-streaming `generateContent` endpoint and returns the
/// first candidate's text verbatim. There are no retries and no timeout
/// tuning here: failures surface to the caller on the first attempt.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl CompletionProvider for GeminiProvider {
    type Error = Error;

    fn generate(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send + 'static
    {
        let gemini_req = proto::create_request(req);
        let resp_fut = self
            .client
            .post(proto::request_url(&self.config))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&gemini_req)
            .send();

        async move {
            let resp = match resp_fut.await {
                Ok(resp) => resp,
                Err(err) => {
                    return Err(Error::new(format!("{err}"), ErrorKind::Other));
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                let body = &body[..body.len().min(200)];
                error!("Gemini API error {status}: {body}");
                return Err(Error::new(
                    format!("API error {status}: {body}"),
                    classify_status(status),
                ));
            }

            let parsed: GenerateContentResponse = match resp.json().await {
                Ok(parsed) => parsed,
                Err(err) => {
                    return Err(Error::new(
                        format!("invalid response body: {err}"),
                        ErrorKind::Other,
                    ));
                }
            };

            let Some(text) = proto::extract_text(&parsed) else {
                return Err(Error::new(
                    "response contains no candidate content",
                    ErrorKind::Other,
                ));
            };
            Ok(Completion::new(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED),
            ErrorKind::Auth
        );
        assert_eq!(classify_status(StatusCode::FORBIDDEN), ErrorKind::Auth);
        assert_eq!(
            classify_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorKind::RateLimitExceeded
        );
        assert_eq!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorKind::Other
        );
    }
}
