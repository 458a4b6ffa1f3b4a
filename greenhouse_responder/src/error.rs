// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for touch dispatch.
//!
//! None of these are fatal. The router logs each one and keeps servicing the
//! remaining touches of the batch.

use alloc::boxed::Box;
use alloc::string::String;

/// Error raised by a view callback.
pub type HandlerError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result type returned by view callbacks.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Faults observed while dispatching touches.
#[derive(Debug, thiserror::Error)]
pub enum TouchError {
    /// A move/end/cancel signal or a queued request referenced a touch that
    /// is not registered.
    #[error("no touch registered for {0:?}")]
    UnknownTouch(crate::types::TouchId),
    /// A start signal reused an identifier that is still live.
    #[error("touch {0:?} is already registered")]
    DuplicateTouch(crate::types::TouchId),
    /// A view callback returned an error.
    #[error("`{callback}` on view {view} failed")]
    Handler {
        /// Debug rendering of the view that failed.
        view: String,
        /// Name of the callback.
        callback: &'static str,
        /// Error returned by the callback.
        #[source]
        source: HandlerError,
    },
    /// Callbacks kept queueing responder requests past the configured limit.
    #[error("more than {0} queued responder requests in one cycle")]
    RequestLimit(usize),
}

impl TouchError {
    pub(crate) fn handler<K: core::fmt::Debug>(
        view: &K,
        callback: &'static str,
        source: HandlerError,
    ) -> Self {
        Self::Handler {
            view: alloc::format!("{view:?}"),
            callback,
            source,
        }
    }

    /// Whether this is an inconsistent-state signal rather than a view fault.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::UnknownTouch(_) | Self::DuplicateTouch(_))
    }

    /// Log at the level matching the fault's severity.
    pub(crate) fn log(&self) {
        if self.is_warning() {
            tracing::warn!(error = %self, "inconsistent touch state");
        } else {
            tracing::error!(error = %self, "touch dispatch fault");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TouchId;

    #[test]
    fn handler_error_keeps_source_and_view() {
        let err = TouchError::handler(&7_u32, "touch_end", "boom".into());
        assert_eq!(alloc::format!("{err}"), "`touch_end` on view 7 failed");
        let source = core::error::Error::source(&err).map(alloc::string::ToString::to_string);
        assert_eq!(source.as_deref(), Some("boom"));
        assert!(!err.is_warning());
    }

    #[test]
    fn unknown_touch_is_a_warning() {
        assert!(TouchError::UnknownTouch(TouchId(3)).is_warning());
        assert!(TouchError::DuplicateTouch(TouchId(3)).is_warning());
        assert!(!TouchError::RequestLimit(4).is_warning());
    }
}
