//! Clipboard access and the transient copy confirmation.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use malscan_ui::CopyState;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long the copy confirmation stays visible.
pub const COPY_CONFIRMATION_WINDOW: Duration = Duration::from_secs(2);

/// Text clipboard sink.
pub trait Clipboard: Send + Sync {
    /// Replaces the clipboard content with `text`.
    ///
    /// # Errors
    /// Returns [`ClipboardError`] when the clipboard is unavailable.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard failure.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Writing the terminal control sequence failed.
    #[error("clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
    /// No clipboard is reachable from this process.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Builds the OSC 52 sequence asking the terminal to set its clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

/// Clipboard backed by the terminal OSC 52 escape sequence on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Osc52Clipboard;

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Copy action with a self-reverting confirmation.
///
/// A successful copy shows [`CopyState::Copied`] for
/// [`COPY_CONFIRMATION_WINDOW`]. A failed copy is logged and leaves the state
/// untouched. Dropping the value cancels a pending revert.
pub struct CopyConfirmation {
    clipboard: Arc<dyn Clipboard>,
    window: Duration,
    state: watch::Sender<CopyState>,
    revert: Option<JoinHandle<()>>,
}

impl CopyConfirmation {
    /// Creates an idle confirmation using the default window.
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self::with_window(clipboard, COPY_CONFIRMATION_WINDOW)
    }

    /// Creates an idle confirmation with a custom window.
    pub fn with_window(clipboard: Arc<dyn Clipboard>, window: Duration) -> Self {
        let (state, _) = watch::channel(CopyState::Idle);
        Self {
            clipboard,
            window,
            state,
            revert: None,
        }
    }

    /// Current confirmation state.
    pub fn state(&self) -> CopyState {
        *self.state.borrow()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<CopyState> {
        self.state.subscribe()
    }

    /// Copies `text`. Returns `false` when the clipboard rejected it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn copy(&mut self, text: &str) -> bool {
        if let Err(error) = self.clipboard.write_text(text) {
            warn!(%error, "copy to clipboard failed");
            return false;
        }

        if let Some(previous) = self.revert.take() {
            previous.abort();
        }
        self.state.send_replace(CopyState::Copied);
        debug!("copy confirmation shown");

        let state = self.state.clone();
        let window = self.window;
        self.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            state.send_replace(CopyState::Idle);
        }));
        true
    }
}

impl Drop for CopyConfirmation {
    fn drop(&mut self) {
        if let Some(revert) = self.revert.take() {
            revert.abort();
        }
    }
}
