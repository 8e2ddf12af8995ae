//! # ember-tui
//!
//! Reactive rendering runtime for character-grid user interfaces.
//!
//! ## Architecture
//!
//! Application code describes UI as a tree of [`Node`]s returned from
//! component render functions and keeps state in [`Signal`]s. The runtime
//! tracks which computations read which signals, so one write re-runs only
//! what depends on it:
//!
//! ```text
//! signal write ──> component render effects ──> frame effect
//!                                                 │
//!                    layout ──> paint ──> diff ──> encode ──> terminal
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use ember_tui::prelude::*;
//!
//! fn counter(cx: &mut Scope) -> Node {
//!     let count = cx.use_state(|| 0);
//!     let c = count.clone();
//!     cx.use_input(move |event| {
//!         if event.key.up_arrow {
//!             c.update(|n| n + 1);
//!         }
//!     });
//!     plain(format!("Count: {}", count.get()))
//! }
//!
//! render(counter, AppConfig::default())?.wait_until_exit()?;
//! ```
//!
//! ## Modules
//!
//! - [`reactive`] - signals, memos, effects, batching
//! - [`hooks`] - per-component persistent state
//! - [`primitives`] - node constructors and props
//! - [`layout`] - flexbox geometry
//! - [`renderer`] - frames, diffing, ANSI output
//! - [`pipeline`] - `render_to_string`, headless [`App`], live [`render`]
//! - [`state`] - keyboard and mouse events
//!
//! No logging subscriber is installed; events go through `tracing`.

pub mod config;
pub mod error;
pub mod hooks;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod reactive;
pub mod renderer;
pub mod state;
pub mod types;

pub use config::{AppConfig, RuntimeConfig};
pub use error::{Error, Result};
pub use hooks::Scope;
pub use pipeline::{App, AppHandle, Instance, render, render_to_string};
pub use primitives::{
    BoxProps, Node, TextProps, box_primitive, each, fragment, newline, plain, show, spacer, text,
};
pub use reactive::{Memo, Runtime, Signal};
pub use types::*;

/// Everything a component file usually needs.
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::hooks::Scope;
    pub use crate::pipeline::{App, AppHandle, render, render_to_string};
    pub use crate::primitives::{
        BoxProps, Node, TextProps, box_primitive, each, fragment, newline, plain, show, spacer,
        text,
    };
    pub use crate::reactive::{Cleanup, Signal};
    pub use crate::state::{Key, KeyboardEvent, MouseEvent};
    pub use crate::types::{
        AlignItems, BorderStyle, Dimension, FlexDirection, JustifyContent, Overflow, TextWrap,
    };
}
