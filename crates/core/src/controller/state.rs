use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use codepane_actor::{Actor, DelayedSend, Message};
use codepane_model::{Completion, CompletionRequest, ProviderError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::builder::{ControllerBuilder, EventFn};
use super::{ControllerEvent, Snapshot};
use crate::animation::{Advance, AnimationState, RevealMode};
use crate::conversation::{Conversation, Turn, TurnId, split_code_lines};
use crate::host::Host;
use crate::relay_client::RelayClient;

/// Prefix of every error turn's content; the failure message is appended
/// to it.
const ERROR_TURN_PREFIX: &str = "Error generating code. Please try again. ";

/// How long the transient copied flag stays raised.
const COPIED_RESET_DELAY: Duration = Duration::from_millis(2000);

pub(crate) struct ControllerState {
    relay_client: RelayClient,
    host: Arc<dyn Host>,
    on_event: Option<EventFn>,
    reveal_interval: Duration,
    reveal_mode: RevealMode,

    conversation: Conversation,
    animation: AnimationState,
    in_flight: bool,
    copied: bool,
    next_turn_id: u64,
    // Pending reveal ticks keyed by turn. Dropping a guard cancels the
    // tick, so clearing this map on reset (or dropping the whole state on
    // teardown) cancels everything outstanding.
    pending_ticks: HashMap<TurnId, DelayedSend>,
    pending_copied_reset: Option<DelayedSend>,
    running_tasks: HashMap<u64, JoinHandle<()>>,
    next_task_id: u64,
}

impl ControllerState {
    pub(crate) fn from_builder(builder: ControllerBuilder) -> Self {
        let ControllerBuilder {
            relay_client,
            host,
            on_event,
            reveal_interval,
            reveal_mode,
        } = builder;

        Self {
            relay_client,
            host,
            on_event,
            reveal_interval,
            reveal_mode,
            conversation: Default::default(),
            animation: Default::default(),
            in_flight: false,
            copied: false,
            next_turn_id: 1,
            pending_ticks: Default::default(),
            pending_copied_reset: None,
            running_tasks: Default::default(),
            next_task_id: 1,
        }
    }

    #[inline]
    fn emit(&self, event: ControllerEvent) {
        if let Some(on_event) = &self.on_event {
            on_event(event);
        }
    }

    fn submit(&mut self, prompt: String, handle: &Actor<Self>) {
        if prompt.trim().is_empty() || self.in_flight {
            return;
        }
        self.in_flight = true;

        // The user turn goes in before the relay call begins. The content
        // is kept untrimmed.
        let turn = Turn::User {
            content: prompt.clone(),
        };
        self.conversation.push(turn.clone());
        self.emit(ControllerEvent::TurnAdded(turn));

        let relay_client = self.relay_client.clone();
        let handle_clone = handle.clone();
        self.spawn_task(
            || async move {
                let result = relay_client
                    .generate(CompletionRequest::new(prompt))
                    .await;
                handle_clone.send(RelayFinished { result }).ok();
            },
            handle,
        );
    }

    fn relay_finished(
        &mut self,
        result: Result<Completion, Box<dyn ProviderError>>,
        handle: &Actor<Self>,
    ) {
        let id = self.allocate_turn_id();
        let turn = match result {
            Ok(completion) => Turn::Assistant {
                id,
                code_lines: split_code_lines(&completion.text),
                content: completion.text,
            },
            Err(err) => Turn::Error {
                id,
                content: format!("{ERROR_TURN_PREFIX}{err}"),
            },
        };
        let animate = !turn.is_error();
        self.conversation.push(turn.clone());
        self.emit(ControllerEvent::TurnAdded(turn));

        if animate {
            self.begin_reveal(id, handle);
        }

        self.in_flight = false;
        self.emit(ControllerEvent::Idle);
    }

    fn begin_reveal(&mut self, id: TurnId, handle: &Actor<Self>) {
        if self.reveal_mode == RevealMode::SingleActive {
            // The newcomer takes over the active slot; the previous
            // turn's reveal freezes where it is.
            if let Some(prev) = self.animation.active() {
                self.pending_ticks.remove(&prev);
            }
        }
        self.animation.begin(id, self.reveal_mode);
        self.arm_tick(id, handle);
    }

    #[inline]
    fn arm_tick(&mut self, id: TurnId, handle: &Actor<Self>) {
        let tick = handle.send_after(RevealTick(id), self.reveal_interval);
        self.pending_ticks.insert(id, tick);
    }

    fn reveal_tick(&mut self, id: TurnId, handle: &Actor<Self>) {
        self.pending_ticks.remove(&id);
        if self.reveal_mode == RevealMode::SingleActive
            && self.animation.active() != Some(id)
        {
            // A tick that was already in the mailbox when its turn lost
            // the active slot.
            return;
        }
        let Some(total) = self.conversation.line_count(id) else {
            return;
        };
        match self.animation.advance(id, total) {
            Advance::Revealed(visible) => {
                self.emit(ControllerEvent::LinesRevealed { id, visible });
                self.arm_tick(id, handle);
            }
            Advance::Completed(visible) => {
                self.emit(ControllerEvent::LinesRevealed { id, visible });
                self.emit(ControllerEvent::RevealFinished { id });
            }
            Advance::Still => {}
        }
    }

    fn copy_text(&mut self, content: String, handle: &Actor<Self>) {
        if let Err(err) = self.host.copy_text(&content) {
            error!("failed to copy to clipboard: {err}");
            return;
        }
        self.copied = true;
        self.emit(ControllerEvent::CopiedChanged(true));
        // A copy during the reset window doesn't extend it: the flag
        // still clears at the earliest outstanding deadline.
        if self.pending_copied_reset.is_none() {
            self.pending_copied_reset =
                Some(handle.send_after(ClearCopied, COPIED_RESET_DELAY));
        }
    }

    fn clear_copied(&mut self) {
        self.pending_copied_reset = None;
        if self.copied {
            self.copied = false;
            self.emit(ControllerEvent::CopiedChanged(false));
        }
    }

    fn open_external(&mut self, content: String) {
        if let Err(err) = self.host.open_text(&content) {
            error!("failed to open content externally: {err}");
        }
    }

    fn clear_chat(&mut self) {
        // Dropping the guards cancels the pending ticks.
        self.pending_ticks.clear();
        self.conversation.clear();
        self.animation.clear();
        self.emit(ControllerEvent::ConversationCleared);
        // The in-flight flag and any running relay task are deliberately
        // left alone: a response resolving after the reset still appends
        // its turn to the now-empty conversation.
    }

    #[inline]
    fn allocate_turn_id(&mut self) -> TurnId {
        let id = TurnId(self.next_turn_id);
        self.next_turn_id += 1;
        id
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            conversation: self.conversation.clone(),
            animation: self.animation.clone(),
            in_flight: self.in_flight,
            copied: self.copied,
        }
    }

    fn spawn_task<F, Fut>(&mut self, f: F, handle: &Actor<Self>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let handle = handle.clone();
        let fut = f();
        let task = tokio::spawn(async move {
            fut.await;
            handle.send(TaskEnded(task_id)).ok();
        });
        self.running_tasks.insert(task_id, task);
    }
}

#[derive(Debug)]
pub(crate) struct Submit(pub String);

impl Message<ControllerState> for Submit {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.submit(self.0, handle);
    }
}

#[derive(Debug)]
struct RelayFinished {
    result: Result<Completion, Box<dyn ProviderError>>,
}

impl Message<ControllerState> for RelayFinished {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.relay_finished(self.result, handle);
    }
}

#[derive(Debug)]
struct RevealTick(TurnId);

impl Message<ControllerState> for RevealTick {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.reveal_tick(self.0, handle);
    }
}

#[derive(Debug)]
pub(crate) struct CopyText(pub String);

impl Message<ControllerState> for CopyText {
    fn handle(self, state: &mut ControllerState, handle: &Actor<ControllerState>) {
        state.copy_text(self.0, handle);
    }
}

#[derive(Debug)]
struct ClearCopied;

impl Message<ControllerState> for ClearCopied {
    fn handle(self, state: &mut ControllerState, _handle: &Actor<ControllerState>) {
        state.clear_copied();
    }
}

#[derive(Debug)]
pub(crate) struct OpenExternal(pub String);

impl Message<ControllerState> for OpenExternal {
    fn handle(self, state: &mut ControllerState, _handle: &Actor<ControllerState>) {
        state.open_external(self.0);
    }
}

#[derive(Debug)]
pub(crate) struct ClearChat;

impl Message<ControllerState> for ClearChat {
    fn handle(self, state: &mut ControllerState, _handle: &Actor<ControllerState>) {
        state.clear_chat();
    }
}

#[derive(Debug)]
pub(crate) struct GetSnapshot(pub oneshot::Sender<Snapshot>);

impl Message<ControllerState> for GetSnapshot {
    fn handle(self, state: &mut ControllerState, _handle: &Actor<ControllerState>) {
        self.0.send(state.snapshot()).ok();
    }
}

#[derive(Debug)]
struct TaskEnded(u64);

impl Message<ControllerState> for TaskEnded {
    #[inline]
    fn handle(self, state: &mut ControllerState, _handle: &Actor<ControllerState>) {
        state
            .running_tasks
            .remove(&self.0)
            .expect("internal state is inconsistent");
    }
}
