//! Input Module - crossterm event conversion and polling
//!
//! Bridges crossterm's decoded events to [`KeyboardEvent`] and
//! [`MouseEvent`]. Only the live terminal driver uses this; headless apps
//! are fed already-built events.
//!
//! # Example
//!
//! ```ignore
//! use ember_tui::state::input::{poll_event, InputEvent};
//! use std::time::Duration;
//!
//! let mut clicks = ClickTracker::default();
//! loop {
//!     match poll_event(Duration::from_millis(16), &mut clicks)? {
//!         Some(InputEvent::Key(key)) => app.dispatch_key(&key)?,
//!         Some(InputEvent::Mouse(mouse)) => app.dispatch_mouse(&mouse)?,
//!         Some(InputEvent::Resize(w, h)) => app.resize(w, Some(h))?,
//!         None => {}
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind, poll,
    read,
};

use super::keyboard::{Key, KeyboardEvent};
use super::mouse::{Modifiers, MouseAction, MouseButton, MouseEvent};

/// Two presses of the same button on the same cell within this window
/// form a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// An event the app loop cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyboardEvent),
    Mouse(MouseEvent),
    /// New terminal size (width, height).
    Resize(u16, u16),
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Turns repeated presses into [`MouseAction::DoubleClick`].
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(u16, u16, MouseButton, Instant)>,
}

impl ClickTracker {
    fn classify(&mut self, x: u16, y: u16, button: MouseButton, now: Instant) -> MouseAction {
        let double = matches!(
            self.last,
            Some((lx, ly, lb, at)) if lx == x && ly == y && lb == button
                && now.duration_since(at) <= DOUBLE_CLICK_WINDOW
        );
        // A double click consumes the pair; a third press starts over.
        self.last = if double { None } else { Some((x, y, button, now)) };
        if double {
            MouseAction::DoubleClick
        } else {
            MouseAction::Click
        }
    }
}

/// Convert a crossterm mouse event.
pub fn convert_mouse_event(event: CrosstermMouseEvent, clicks: &mut ClickTracker) -> MouseEvent {
    convert_mouse_event_at(event, clicks, Instant::now())
}

fn convert_mouse_event_at(
    event: CrosstermMouseEvent,
    clicks: &mut ClickTracker,
    now: Instant,
) -> MouseEvent {
    let (x, y) = (event.column, event.row);
    let (button, action) = match event.kind {
        MouseEventKind::Down(btn) => {
            let button = convert_mouse_button(btn);
            (button, clicks.classify(x, y, button, now))
        }
        MouseEventKind::Up(btn) => (convert_mouse_button(btn), MouseAction::Release),
        MouseEventKind::Drag(btn) => (convert_mouse_button(btn), MouseAction::Drag),
        MouseEventKind::Moved => (MouseButton::None, MouseAction::Move),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => {
            (MouseButton::ScrollUp, MouseAction::Click)
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => {
            (MouseButton::ScrollDown, MouseAction::Click)
        }
    };

    MouseEvent {
        x,
        y,
        button,
        action,
        modifiers: Modifiers {
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            alt: event.modifiers.contains(KeyModifiers::ALT),
        },
    }
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm key event. Releases and unmapped keys yield `None`.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyboardEvent> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let mut key = Key {
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        meta: event.modifiers.contains(KeyModifiers::ALT)
            || event.modifiers.contains(KeyModifiers::META),
        ..Key::default()
    };
    let mut input = String::new();

    match event.code {
        KeyCode::Char(c) => input.push(c),
        KeyCode::Enter => key.return_key = true,
        KeyCode::Tab => key.tab = true,
        KeyCode::BackTab => {
            key.tab = true;
            key.shift = true;
        }
        KeyCode::Backspace => key.backspace = true,
        KeyCode::Delete => key.delete = true,
        KeyCode::Esc => key.escape = true,
        KeyCode::Up => key.up_arrow = true,
        KeyCode::Down => key.down_arrow = true,
        KeyCode::Left => key.left_arrow = true,
        KeyCode::Right => key.right_arrow = true,
        KeyCode::Home => key.home = true,
        KeyCode::End => key.end = true,
        KeyCode::PageUp => key.page_up = true,
        KeyCode::PageDown => key.page_down = true,
        _ => return None,
    }

    Some(KeyboardEvent { input, key })
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Wait up to `timeout` for an event the app handles.
pub fn poll_event(timeout: Duration, clicks: &mut ClickTracker) -> std::io::Result<Option<InputEvent>> {
    if !poll(timeout)? {
        return Ok(None);
    }
    Ok(match read()? {
        CrosstermEvent::Key(key) => convert_key_event(key).map(InputEvent::Key),
        CrosstermEvent::Mouse(mouse) => Some(InputEvent::Mouse(convert_mouse_event(mouse, clicks))),
        CrosstermEvent::Resize(w, h) => Some(InputEvent::Resize(w, h)),
        _ => None,
    })
}

// =============================================================================
// TESTS
// =============================================================================
