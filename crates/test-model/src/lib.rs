//! A local fake completion provider for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use codepane_model::{
    Completion, CompletionProvider, CompletionRequest, ErrorKind,
    ProviderError,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
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

/// A local fake completion provider for testing purpose.
///
/// Before sending requests, you need to setup the script, which is the
/// ordered list of outcomes the provider will produce. Each `generate`
/// call consumes the next outcome; if the script runs dry, an error will
/// be returned. Clones share the same script.
///
/// # Note
///
/// This type is not optimized for production use. You should only use it
/// for testing.
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<PresetOutcome>>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    /// Appends an outcome to the script.
    #[inline]
    pub fn push(&mut self, outcome: PresetOutcome) {
        self.script
            .lock()
            .expect("script lock is poisoned")
            .push_back(outcome);
    }

    /// Sets an artificial delay before each outcome resolves.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the number of outcomes left in the script.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.script.lock().expect("script lock is poisoned").len()
    }
}

impl CompletionProvider for ScriptedProvider {
    type Error = Error;

    fn generate(
        &self,
        _req: &CompletionRequest,
    ) -> impl Future<Output = Result<Completion, Self::Error>> + Send + 'static
    {
        let outcome = self
            .script
            .lock()
            .expect("script lock is poisoned")
            .pop_front();
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        async move {
            sleep(delay).await;
            match outcome {
                Some(PresetOutcome::Text(text)) => Ok(Completion::new(text)),
                Some(PresetOutcome::Failure(failure)) => Err(Error {
                    message: failure.message,
                    kind: failure.kind.into(),
                }),
                None => Err(Error {
                    message: "no outcomes left in the script".to_owned(),
                    kind: ErrorKind::Other,
                }),
            }
        }
    }
}
