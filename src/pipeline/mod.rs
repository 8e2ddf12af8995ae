//! Pipeline - from a component to terminal output
//!
//! ```text
//! stimulus ──batch──> component effects ──> frame effect ──> layout ──> paint ──> diff ──> sink
//! ```
//!
//! - [`render_to_string`] - one shot, no runtime, no diffing
//! - [`App`] - headless driver: feed events, read frames and bytes
//! - [`render`] - live session on the real terminal
//!
//! One stimulus (key, click, resize) is one batch: however many signals it
//! writes, each dirty component re-renders once and at most one frame is
//! written.

mod app;
mod mount;
pub mod terminal;

pub use app::{App, render_to_string};
pub use mount::AppHandle;
pub use terminal::{Instance, TerminalSetup, render};
