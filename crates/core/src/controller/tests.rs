use std::sync::{Arc, Mutex};
use std::time::Duration;

use codepane_test_model::{PresetOutcome, ScriptedProvider};
use tokio::sync::mpsc;
use tokio::time::sleep;

use super::{Controller, ControllerBuilder, ControllerEvent};
use crate::animation::RevealMode;
use crate::conversation::{Turn, TurnId};
use crate::host::{Host, HostError};

#[derive(Clone, Default)]
struct RecordingHost {
    copied: Arc<Mutex<Vec<String>>>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl Host for RecordingHost {
    fn copy_text(&self, text: &str) -> Result<(), HostError> {
        self.copied.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    fn open_text(&self, text: &str) -> Result<(), HostError> {
        self.opened.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

type EventRx = mpsc::UnboundedReceiver<ControllerEvent>;

fn build_controller(provider: ScriptedProvider) -> (Controller, EventRx) {
    build_controller_with(provider, |builder| builder)
}

fn build_controller_with(
    provider: ScriptedProvider,
    configure: impl FnOnce(ControllerBuilder) -> ControllerBuilder,
) -> (Controller, EventRx) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let builder =
        ControllerBuilder::with_relay_provider(provider).on_event(move |event| {
            event_tx.send(event).ok();
        });
    (configure(builder).build(), event_rx)
}

async fn wait_for_idle(events: &mut EventRx) {
    loop {
        let event = events.recv().await.expect("event channel closed");
        if matches!(event, ControllerEvent::Idle) {
            return;
        }
    }
}

/// Consumes events until the next `RevealFinished`, collecting the
/// visible-line counts seen along the way.
async fn collect_reveal(events: &mut EventRx) -> (TurnId, Vec<usize>) {
    let mut seen = Vec::new();
    loop {
        match events.recv().await.expect("event channel closed") {
            ControllerEvent::LinesRevealed { visible, .. } => {
                seen.push(visible);
            }
            ControllerEvent::RevealFinished { id } => return (id, seen),
            _ => {}
        }
    }
}

fn drain(events: &mut EventRx) -> Vec<ControllerEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

#[tokio::test(start_paused = true)]
async fn test_submit_reveals_code_lines() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::text(
        "function reverse(s) {\n  return s.split('').reverse().join('');\n}",
    ));
    let (controller, mut events) = build_controller(provider);

    controller.submit("reverse a string");
    wait_for_idle(&mut events).await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.conversation.len(), 2);
    assert!(matches!(
        &snapshot.conversation.turns()[0],
        Turn::User { content } if content == "reverse a string"
    ));
    let Turn::Assistant { id, code_lines, .. } =
        &snapshot.conversation.turns()[1]
    else {
        panic!("expected an assistant turn");
    };
    assert_eq!(code_lines.len(), 3);
    assert_eq!(
        code_lines.iter().map(|l| l.number).collect::<Vec<_>>(),
        [1, 2, 3]
    );
    // The reveal starts from zero visible lines.
    assert_eq!(snapshot.animation.visible_lines(*id), Some(0));
    assert_eq!(snapshot.animation.active(), Some(*id));

    let (finished_id, seen) = collect_reveal(&mut events).await;
    assert_eq!(finished_id, *id);
    assert_eq!(seen, [1, 2, 3]);

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.animation.visible_lines(*id), Some(3));
    assert_eq!(snapshot.animation.active(), None);
}

#[tokio::test(start_paused = true)]
async fn test_empty_prompt_is_a_noop() {
    let (controller, mut events) = build_controller(ScriptedProvider::default());

    controller.submit("");
    controller.submit("   \n\t");

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.conversation.len(), 0);
    assert!(!snapshot.in_flight);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_relay_failure_becomes_error_turn() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::failure("Request failed"));
    let (controller, mut events) = build_controller(provider);

    controller.submit("hi");
    wait_for_idle(&mut events).await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.conversation.len(), 2);
    let Turn::Error { content, .. } = &snapshot.conversation.turns()[1] else {
        panic!("expected an error turn");
    };
    assert_eq!(
        content,
        "Error generating code. Please try again. Request failed"
    );
    // Error turns never animate.
    assert!(snapshot.animation.is_empty());
    sleep(Duration::from_millis(200)).await;
    assert!(
        drain(&mut events)
            .iter()
            .all(|e| !matches!(e, ControllerEvent::LinesRevealed { .. }))
    );
}

#[tokio::test(start_paused = true)]
async fn test_empty_completion_is_one_empty_line() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::text(""));
    let (controller, mut events) = build_controller(provider);

    controller.submit("hi");
    wait_for_idle(&mut events).await;

    let snapshot = controller.snapshot().await;
    let Turn::Assistant { id, content, code_lines } =
        &snapshot.conversation.turns()[1]
    else {
        panic!("expected an assistant turn");
    };
    assert_eq!(content, "");
    assert_eq!(code_lines.len(), 1);

    let (finished_id, seen) = collect_reveal(&mut events).await;
    assert_eq!(finished_id, *id);
    assert_eq!(seen, [1]);
}

#[tokio::test(start_paused = true)]
async fn test_submissions_while_in_flight_are_dropped() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::text("a"));
    provider.push(PresetOutcome::text("b"));
    provider.set_delay(Duration::from_secs(10));
    let (controller, mut events) = build_controller(provider.clone());

    controller.submit("one");
    controller.submit("two");

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.conversation.len(), 1);
    assert!(snapshot.in_flight);

    wait_for_idle(&mut events).await;
    let snapshot = controller.snapshot().await;
    // Exactly one assistant turn; the dropped submission consumed
    // nothing from the script.
    assert_eq!(snapshot.conversation.len(), 2);
    assert!(!snapshot.in_flight);
    assert_eq!(provider.remaining(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_new_submission_freezes_previous_reveal() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::text("1\n2\n3\n4\n5"));
    provider.push(PresetOutcome::text("a\nb"));
    let (controller, mut events) = build_controller(provider);

    controller.submit("first");
    wait_for_idle(&mut events).await;
    let first_id = controller.snapshot().await.conversation.turns()[1]
        .id()
        .unwrap();

    // Let the first reveal advance partway, then submit again.
    sleep(Duration::from_millis(120)).await;
    controller.submit("second");
    wait_for_idle(&mut events).await;

    let (second_id, seen) = collect_reveal(&mut events).await;
    assert_ne!(second_id, first_id);
    assert_eq!(seen.last(), Some(&2));

    let snapshot = controller.snapshot().await;
    // The first turn kept its own entry, frozen where the takeover
    // happened, and the second revealed independently of it.
    assert_eq!(snapshot.animation.visible_lines(first_id), Some(2));
    assert_eq!(snapshot.animation.visible_lines(second_id), Some(2));
    assert_eq!(snapshot.animation.active(), None);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_mode_reveals_independently() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::text("1\n2\n3\n4\n5"));
    provider.push(PresetOutcome::text("a\nb"));
    let (controller, mut events) = build_controller_with(provider, |builder| {
        builder.reveal_mode(RevealMode::Concurrent)
    });

    controller.submit("first");
    wait_for_idle(&mut events).await;
    let first_id = controller.snapshot().await.conversation.turns()[1]
        .id()
        .unwrap();

    sleep(Duration::from_millis(120)).await;
    controller.submit("second");
    wait_for_idle(&mut events).await;

    // Both reveals run to completion.
    sleep(Duration::from_millis(500)).await;
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.animation.visible_lines(first_id), Some(5));
    let second_id = snapshot.conversation.turns()[3].id().unwrap();
    assert_eq!(snapshot.animation.visible_lines(second_id), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_everything() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::text("1\n2\n3\n4\n5"));
    let (controller, mut events) = build_controller(provider);

    controller.submit("hi");
    wait_for_idle(&mut events).await;
    sleep(Duration::from_millis(60)).await;

    controller.reset();
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.conversation.len(), 0);
    assert!(snapshot.animation.is_empty());
    assert_eq!(snapshot.animation.active(), None);

    // The pending tick was cancelled with the rest: no reveal events
    // arrive after the clear notification.
    sleep(Duration::from_millis(300)).await;
    let mut cleared_seen = false;
    for event in drain(&mut events) {
        match event {
            ControllerEvent::ConversationCleared => cleared_seen = true,
            ControllerEvent::LinesRevealed { .. } => {
                assert!(!cleared_seen, "reveal tick survived the reset");
            }
            _ => {}
        }
    }
    assert!(cleared_seen);
}

#[tokio::test(start_paused = true)]
async fn test_response_after_reset_still_lands() {
    let mut provider = ScriptedProvider::default();
    provider.push(PresetOutcome::text("late"));
    provider.set_delay(Duration::from_secs(5));
    let (controller, mut events) = build_controller(provider);

    controller.submit("hi");
    controller.reset();

    wait_for_idle(&mut events).await;
    let snapshot = controller.snapshot().await;
    // The in-flight call is not cancelled by a reset; its response is
    // appended to the now-empty conversation.
    assert_eq!(snapshot.conversation.len(), 1);
    assert!(matches!(
        &snapshot.conversation.turns()[0],
        Turn::Assistant { content, .. } if content == "late"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_copy_raises_transient_flag() {
    let host = RecordingHost::default();
    let (controller, mut events) =
        build_controller_with(ScriptedProvider::default(), |builder| {
            builder.with_host(host.clone())
        });

    controller.copy("let x = 1;");
    let snapshot = controller.snapshot().await;
    assert!(snapshot.copied);
    assert_eq!(host.copied.lock().unwrap().as_slice(), ["let x = 1;"]);

    sleep(Duration::from_millis(2100)).await;
    let snapshot = controller.snapshot().await;
    assert!(!snapshot.copied);

    let copied_changes: Vec<_> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            ControllerEvent::CopiedChanged(value) => Some(value),
            _ => None,
        })
        .collect();
    assert_eq!(copied_changes, [true, false]);
}

#[tokio::test(start_paused = true)]
async fn test_open_external_reaches_host() {
    let host = RecordingHost::default();
    let (controller, _events) =
        build_controller_with(ScriptedProvider::default(), |builder| {
            builder.with_host(host.clone())
        });

    controller.open_external("fn main() {}");
    controller.snapshot().await;
    assert_eq!(host.opened.lock().unwrap().as_slice(), ["fn main() {}"]);
}
