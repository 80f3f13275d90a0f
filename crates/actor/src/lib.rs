//! A lightweight actor framework with delayed message delivery.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod delay;
mod error;
mod handle;
mod mailbox;
mod scheduler;

pub use delay::DelayedSend;
pub use error::ActorDeadError;
pub use handle::Actor;
pub use mailbox::Message;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tokio::time::sleep;

    use super::*;

    #[derive(Default)]
    struct CounterState {
        value: u32,
    }

    #[derive(Debug)]
    struct AddMessage(u32);

    impl Message<CounterState> for AddMessage {
        fn handle(
            self,
            state: &mut CounterState,
            _handle: &Actor<CounterState>,
        ) {
            state.value += self.0;
        }
    }

    #[derive(Debug)]
    struct GetMessage(oneshot::Sender<u32>);

    impl Message<CounterState> for GetMessage {
        fn handle(
            self,
            state: &mut CounterState,
            _handle: &Actor<CounterState>,
        ) {
            self.0.send(state.value).unwrap();
        }
    }

    async fn value_of(actor: &Actor<CounterState>) -> u32 {
        let (tx, rx) = oneshot::channel();
        actor.send(GetMessage(tx)).unwrap();
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_send_message() {
        let actor = Actor::spawn(CounterState::default(), None);
        actor.send(AddMessage(42)).unwrap();
        assert_eq!(value_of(&actor).await, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_after() {
        let actor = Actor::spawn(CounterState::default(), Some("counter"));
        let pending =
            actor.send_after(AddMessage(1), Duration::from_millis(50));
        assert_eq!(value_of(&actor).await, 0);

        sleep(Duration::from_millis(60)).await;
        assert_eq!(value_of(&actor).await, 1);
        drop(pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_send_after() {
        let actor = Actor::spawn(CounterState::default(), None);
        let pending =
            actor.send_after(AddMessage(1), Duration::from_millis(50));
        pending.cancel();

        sleep(Duration::from_millis(100)).await;
        assert_eq!(value_of(&actor).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_guard_cancels() {
        let actor = Actor::spawn(CounterState::default(), None);
        drop(actor.send_after(AddMessage(1), Duration::from_millis(50)));

        sleep(Duration::from_millis(100)).await;
        assert_eq!(value_of(&actor).await, 0);
    }
}
