//! Desktop host integration.

use std::io::Write as _;

use arboard::Clipboard;
use codepane_core::host::{Host, HostError};

/// [`Host`] implementation backed by the desktop environment: the
/// system clipboard for copies, and a temp file handed to the system
/// opener for external viewing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn copy_text(&self, text: &str) -> Result<(), HostError> {
        let mut clipboard = Clipboard::new().map_err(|err| {
            HostError::new(format!("clipboard unavailable: {err}"))
        })?;
        clipboard.set_text(text).map_err(|err| {
            HostError::new(format!("clipboard write failed: {err}"))
        })
    }

    fn open_text(&self, text: &str) -> Result<(), HostError> {
        let mut file = tempfile::Builder::new()
            .prefix("codepane-")
            .suffix(".txt")
            .tempfile()
            .map_err(|err| {
                HostError::new(format!("failed to create temp file: {err}"))
            })?;
        file.write_all(text.as_bytes()).map_err(|err| {
            HostError::new(format!("failed to write temp file: {err}"))
        })?;
        // The viewer opens asynchronously, so the file must outlive this
        // call; the OS temp cleanup owns it from here.
        let (_, path) = file.keep().map_err(|err| {
            HostError::new(format!("failed to persist temp file: {err}"))
        })?;
        opener::open(&path)
            .map_err(|err| HostError::new(format!("failed to open: {err}")))
    }
}
