//! State Module - Input events and their routing tables
//!
//! - **Keyboard** - Decoded key events, `use_input` handler registry
//! - **Mouse** - Decoded mouse events, hit-test registry
//! - **Input** - crossterm conversion and polling for the live driver

pub mod input;
pub mod keyboard;
pub mod mouse;

pub use keyboard::{InputHandler, InputRegistry, Key, KeyboardEvent};
pub use mouse::{HitRegion, HitRegistry, Modifiers, MouseAction, MouseButton, MouseEvent};
