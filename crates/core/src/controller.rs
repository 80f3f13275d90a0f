mod builder;
mod state;
#[cfg(test)]
mod tests;

use codepane_actor::Actor;
use tokio::sync::oneshot;

use crate::animation::AnimationState;
use crate::conversation::{Conversation, Turn, TurnId};
pub use builder::ControllerBuilder;
use state::{
    ClearChat, ControllerState, CopyText, GetSnapshot, OpenExternal, Submit,
};

/// Events the controller reports to its rendering surface.
#[derive(Clone, Debug)]
pub enum ControllerEvent {
    /// A turn was appended to the conversation.
    TurnAdded(Turn),
    /// A turn's reveal advanced to `visible` lines.
    LinesRevealed {
        /// The revealing turn.
        id: TurnId,
        /// How many of its lines are visible now.
        visible: usize,
    },
    /// A turn's reveal reached its total line count.
    RevealFinished {
        /// The turn whose reveal just ended.
        id: TurnId,
    },
    /// The transient copied flag changed.
    CopiedChanged(bool),
    /// The conversation and animation state were cleared.
    ConversationCleared,
    /// The in-flight relay call finished, successfully or not.
    Idle,
}

/// A point-in-time copy of the controller's state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// The conversation at the time of the query.
    pub conversation: Conversation,
    /// The animation state at the time of the query.
    pub animation: AnimationState,
    /// Whether a relay call is in flight.
    pub in_flight: bool,
    /// Whether the transient copied flag is set.
    pub copied: bool,
}

/// The conversation controller.
///
/// Owns the conversation and the animation state, triggers relay calls,
/// and drives the per-turn line-reveal cadence. The state lives on an
/// actor task and is mutated only through the messages these methods
/// send, so every mutation is serialized through one owner.
#[derive(Clone)]
pub struct Controller {
    handle: Actor<ControllerState>,
}

impl Controller {
    /// Submits a prompt.
    ///
    /// A no-op when the trimmed prompt is empty or a relay call is
    /// already in flight. Otherwise a user turn is appended before the
    /// relay call begins, and exactly one assistant or error turn is
    /// appended once it resolves.
    pub fn submit<S: Into<String>>(&self, prompt: S) {
        self.handle
            .send(Submit(prompt.into()))
            .expect("controller task has been dropped too early");
    }

    /// Copies `content` to the system clipboard and raises the transient
    /// copied flag.
    pub fn copy<S: Into<String>>(&self, content: S) {
        self.handle
            .send(CopyText(content.into()))
            .expect("controller task has been dropped too early");
    }

    /// Opens `content` in the host environment's external viewer.
    pub fn open_external<S: Into<String>>(&self, content: S) {
        self.handle
            .send(OpenExternal(content.into()))
            .expect("controller task has been dropped too early");
    }

    /// Clears the conversation and the animation state, cancelling any
    /// pending reveal ticks.
    ///
    /// An in-flight relay call is not cancelled; its response will still
    /// append a turn to whatever conversation exists when it resolves.
    pub fn reset(&self) {
        self.handle
            .send(ClearChat)
            .expect("controller task has been dropped too early");
    }

    /// Queries a copy of the current state.
    ///
    /// The query is answered after every message sent before it has been
    /// handled, which also makes this a synchronization point.
    pub async fn snapshot(&self) -> Snapshot {
        let (tx, rx) = oneshot::channel();
        self.handle
            .send(GetSnapshot(tx))
            .expect("controller task has been dropped too early");
        rx.await
            .expect("controller task has been dropped too early")
    }
}

impl Controller {
    fn spawn_from_builder(builder: ControllerBuilder) -> Self {
        let state = ControllerState::from_builder(builder);
        Self {
            handle: Actor::spawn(state, Some("controller")),
        }
    }
}
