//! Core logic of the chat client: the conversation data model, the
//! line-reveal animation state machine, and the controller that owns
//! both and mediates between user input, the prompt relay, and the
//! rendering surface.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod animation;
mod controller;
pub mod conversation;
pub mod host;
mod relay_client;

pub use controller::{
    Controller, ControllerBuilder, ControllerEvent, Snapshot,
};
