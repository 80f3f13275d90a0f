use std::sync::{Arc, Weak};
use std::time::Duration;

use tracing::Instrument;

use crate::delay::DelayedSend;
use crate::mailbox::{Mailbox, MailboxParts};
use crate::scheduler::run_actor;
use crate::{ActorDeadError, Message};

/// Handle to an actor.
pub struct Actor<S> {
    mailbox: Arc<Mailbox<S>>,
}

impl<S: Send + Sync + 'static> Actor<S> {
    /// Spawn a new actor with the specified state and an optional label.
    pub fn spawn(state: S, label: Option<&str>) -> Self {
        let MailboxParts {
            mailbox,
            msg_rx,
            kill_rx,
        } = Mailbox::new();
        let mailbox = Arc::new(mailbox);
        tokio::spawn(
            run_actor(Arc::downgrade(&mailbox), state, msg_rx, kill_rx)
                .instrument(trace_span!("actor", label = label)),
        );
        Self { mailbox }
    }

    #[inline]
    pub(crate) fn from_mailbox(mailbox: Arc<Mailbox<S>>) -> Self {
        Self { mailbox }
    }

    /// Sends a message to the actor.
    #[inline]
    pub fn send<M: Message<S> + 'static>(
        &self,
        msg: M,
    ) -> Result<(), ActorDeadError> {
        self.mailbox.send(Box::new(msg))
    }

    /// Schedules a message to be sent to the actor after `delay`.
    ///
    /// The returned [`DelayedSend`] guard owns the pending delivery:
    /// dropping it (or calling [`DelayedSend::cancel`]) before the delay
    /// elapses cancels the delivery. The pending delivery does not keep
    /// the actor alive; if the actor dies first, the message is silently
    /// discarded.
    pub fn send_after<M: Message<S> + 'static>(
        &self,
        msg: M,
        delay: Duration,
    ) -> DelayedSend {
        let mailbox: Weak<Mailbox<S>> = Arc::downgrade(&self.mailbox);
        DelayedSend::spawn(delay, move || {
            if let Some(mailbox) = mailbox.upgrade() {
                mailbox.send(Box::new(msg)).ok();
            }
        })
    }

    /// Attempts to kill the actor.
    ///
    /// The actor is not guaranteed to be killed immediately, but it
    /// will stop handling further messages and quit soon.
    #[inline]
    pub fn try_kill(&self) {
        self.mailbox.try_kill();
    }
}

impl<S> Clone for Actor<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}
