use std::pin::Pin;
use std::sync::Arc;

use codepane_model::{
    Completion, CompletionProvider, CompletionRequest, ProviderError,
};
use tracing::Instrument;

type GenerateResult = Result<Completion, Box<dyn ProviderError>>;
type BoxedGenerateFuture =
    Pin<Box<dyn Future<Output = GenerateResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(CompletionRequest) -> BoxedGenerateFuture + Send + Sync>;

/// A wrapper around a completion provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub(crate) struct RelayClient {
    handler_fn: HandlerFn,
}

impl RelayClient {
    #[inline]
    pub fn new<P: CompletionProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `RelayClient` doesn't have
        // a generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.generate(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    match fut.await {
                        Ok(completion) => Ok(completion),
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn ProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("relay client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the response.
    #[inline]
    pub async fn generate(&self, req: CompletionRequest) -> GenerateResult {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use codepane_model::ErrorKind;
    use codepane_test_model::{PresetOutcome, ScriptedProvider};

    use super::*;

    #[tokio::test]
    async fn test_generate() {
        let mut provider = ScriptedProvider::default();
        provider.push(PresetOutcome::text("let x = 1;"));

        let client = RelayClient::new(provider);
        let completion = client
            .generate(CompletionRequest::new("hi"))
            .await
            .unwrap();
        assert_eq!(completion.text, "let x = 1;");
    }

    #[tokio::test]
    async fn test_error_handling() {
        let client = RelayClient::new(ScriptedProvider::default());
        let err = client
            .generate(CompletionRequest::new("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
