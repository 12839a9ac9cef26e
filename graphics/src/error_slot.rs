//! Session-wide "first error wins" slot.
//!
//! Hosts keep one [`ErrorSlot`] per session and poll it every frame: while it
//! is empty the application renders normally, once it holds a message the host
//! switches to a fatal-error display. Only the first message of an error burst
//! is retained; later reports are dropped until [`ErrorSlot::clear`] is called.

use std::fmt::Display;

/// Write-once-per-burst error message holder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSlot {
    message: Option<String>,
}

impl ErrorSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report an error.
    ///
    /// Returns `true` if the message was retained, `false` if the slot already
    /// held an earlier message and this one was dropped.
    pub fn report(&mut self, error: impl Display) -> bool {
        let message = error.to_string();
        if self.message.is_some() {
            log::warn!("Dropping error reported after the first one: {message}");
            return false;
        }

        log::error!("{message}");
        self.message = Some(message);
        true
    }

    /// Unwrap a result, reporting the error into the slot on failure.
    pub fn capture<T, E: Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report(err);
                None
            }
        }
    }

    /// Whether an error has been reported since the last clear.
    pub fn has_error(&self) -> bool {
        self.message.is_some()
    }

    /// The retained message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Forget the retained message and start a new burst.
    pub fn clear(&mut self) {
        self.message = None;
    }
}
