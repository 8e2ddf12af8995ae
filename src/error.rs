//! Error types for ember-tui.
//!
//! Only two families of errors ever reach the host: dependency-graph
//! runaway ([`Error::TooManyUpdates`]) and hook-ordering bugs in application
//! code ([`Error::HookKindMismatch`], [`Error::HookCountMismatch`]). Layout
//! and style problems are recovered locally and never show up here.

use std::io;

use thiserror::Error;

/// Errors surfaced by the runtime, the hook store and the terminal pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A flush kept re-triggering effects past the configured pass limit.
    #[error("too many updates: effects re-triggered each other for more than {limit} passes in one flush")]
    TooManyUpdates { limit: usize },

    /// A hook call landed on a slot that was created by a different hook kind
    /// or with a different value type on an earlier render.
    #[error(
        "hook order changed in component `{component}`: slot {index} was created by {expected} but is now used by {found}"
    )]
    HookKindMismatch {
        component: String,
        index: usize,
        expected: String,
        found: String,
    },

    /// A render consumed a different number of hook slots than the first render.
    #[error(
        "hook count changed in component `{component}`: first render used {expected} hooks, this render used {found}"
    )]
    HookCountMismatch {
        component: String,
        expected: usize,
        found: usize,
    },

    /// A hook that needs an application-level context ran outside of an `App`.
    #[error("no `{type_name}` context is available to this component")]
    MissingContext { type_name: &'static str },

    /// Writing to the terminal failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for errors caused by application code misusing hooks.
    pub fn is_hook_error(&self) -> bool {
        matches!(
            self,
            Error::HookKindMismatch { .. } | Error::HookCountMismatch { .. }
        )
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_component_and_slot() {
        let err = Error::HookKindMismatch {
            component: "Counter".into(),
            index: 2,
            expected: "use_state<i32>".into(),
            found: "use_memo<String>".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Counter"));
        assert!(msg.contains("slot 2"));
        assert!(err.is_hook_error());
    }

    #[test]
    fn test_too_many_updates_is_not_hook_error() {
        let err = Error::TooManyUpdates { limit: 100 };
        assert!(!err.is_hook_error());
        assert!(err.to_string().contains("100"));
    }
}
