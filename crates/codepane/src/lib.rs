//! The terminal chat frontend's relay-facing pieces.
//!
//! The binary in this crate wires a conversation controller to a
//! terminal renderer. The library part hosts what that wiring needs:
//! the HTTP provider that talks to the prompt relay and the desktop
//! host integration (clipboard, external viewer).

#![deny(missing_docs)]

pub mod host;
pub mod relay;
