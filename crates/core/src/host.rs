//! The host-environment seam.
//!
//! Clipboard and external-viewer access only exist in the embedding
//! environment, so the controller reaches them through this trait and
//! the core stays platform-free.

use std::error::Error;
use std::fmt::{self, Display};

/// Error reported by a host operation.
#[derive(Debug)]
pub struct HostError {
    message: String,
}

impl HostError {
    /// Creates an error with the given message.
    #[inline]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for HostError {}

/// Facilities only the embedding environment can provide.
pub trait Host: Send + Sync {
    /// Places `text` on the system clipboard.
    fn copy_text(&self, text: &str) -> Result<(), HostError>;

    /// Materializes `text` as a viewable resource and opens it in the
    /// environment's external viewer.
    fn open_text(&self, text: &str) -> Result<(), HostError>;
}

/// A host that accepts and ignores every request.
///
/// This is the default host of a freshly built controller; useful for
/// tests and headless embeddings.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHost;

impl Host for NullHost {
    fn copy_text(&self, _text: &str) -> Result<(), HostError> {
        Ok(())
    }

    fn open_text(&self, _text: &str) -> Result<(), HostError> {
        Ok(())
    }
}
