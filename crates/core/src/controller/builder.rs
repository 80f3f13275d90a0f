use std::sync::Arc;
use std::time::Duration;

use codepane_model::CompletionProvider;

use super::{Controller, ControllerEvent};
use crate::animation::RevealMode;
use crate::host::{Host, NullHost};
use crate::relay_client::RelayClient;

pub(crate) type EventFn = Box<dyn Fn(ControllerEvent) + Send + Sync>;

/// [`Controller`] builder.
pub struct ControllerBuilder {
    pub(crate) relay_client: RelayClient,
    pub(crate) host: Arc<dyn Host>,
    pub(crate) on_event: Option<EventFn>,
    pub(crate) reveal_interval: Duration,
    pub(crate) reveal_mode: RevealMode,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified relay provider.
    #[inline]
    pub fn with_relay_provider<P: CompletionProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            relay_client: RelayClient::new(provider),
            host: Arc::new(NullHost),
            on_event: None,
            reveal_interval: Duration::from_millis(50),
            reveal_mode: RevealMode::default(),
        }
    }

    /// Sets the host environment. The default host ignores every
    /// request.
    #[inline]
    pub fn with_host<H: Host + 'static>(mut self, host: H) -> Self {
        self.host = Arc::new(host);
        self
    }

    /// Attaches a callback to be invoked on every controller event.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(ControllerEvent) + Send + Sync + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    /// Overrides the reveal cadence. The default is 50 ms per line.
    #[inline]
    pub fn reveal_interval(mut self, interval: Duration) -> Self {
        self.reveal_interval = interval;
        self
    }

    /// Selects how reveals of overlapping turns behave.
    #[inline]
    pub fn reveal_mode(mut self, mode: RevealMode) -> Self {
        self.reveal_mode = mode;
        self
    }

    /// Builds the controller.
    #[inline]
    pub fn build(self) -> Controller {
        Controller::spawn_from_builder(self)
    }
}
