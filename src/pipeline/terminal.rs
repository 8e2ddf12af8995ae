//! Live terminal session.
//!
//! [`render`] puts the terminal into raw mode (plus the alternate screen and
//! mouse reporting when configured), mounts the component with frames going
//! to stdout, and returns an [`Instance`]. [`Instance::wait_until_exit`]
//! then feeds crossterm events into the app until it exits.
//!
//! The terminal is restored when the [`TerminalSetup`] guard drops, which
//! also covers early returns and panics that unwind.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::{execute, terminal};

use crate::config::AppConfig;
use crate::error::Result;
use crate::hooks::Scope;
use crate::primitives::Node;
use crate::renderer::{OutputBuffer, ansi};
use crate::state::input::{ClickTracker, InputEvent, poll_event};

use super::app::App;
use super::mount::Sink;

// =============================================================================
// Terminal setup
// =============================================================================

/// Terminal modes entered for a session, undone in reverse on drop.
#[derive(Debug, Default)]
pub struct TerminalSetup {
    raw: bool,
    alternate_screen: bool,
    mouse: bool,
}

impl TerminalSetup {
    /// Enter raw mode and the modes `config` asks for.
    pub fn enter(config: &AppConfig) -> io::Result<Self> {
        let mut setup = Self::default();

        terminal::enable_raw_mode()?;
        setup.raw = true;

        let mut out = OutputBuffer::new();
        if config.alternate_screen {
            ansi::enter_alt_screen(&mut out)?;
            setup.alternate_screen = true;
        }
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.flush_to(&mut io::stdout())?;

        if config.mouse_capture {
            execute!(io::stdout(), EnableMouseCapture)?;
            setup.mouse = true;
        }
        tracing::debug!(
            alternate_screen = setup.alternate_screen,
            mouse = setup.mouse,
            "terminal entered"
        );
        Ok(setup)
    }

    /// Leave every mode that was entered. Safe to call twice.
    pub fn restore(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        if self.mouse {
            execute!(stdout, DisableMouseCapture)?;
            self.mouse = false;
        }

        let mut out = OutputBuffer::new();
        ansi::reset(&mut out)?;
        ansi::cursor_show(&mut out)?;
        if self.alternate_screen {
            ansi::exit_alt_screen(&mut out)?;
            self.alternate_screen = false;
        }
        out.flush_to(&mut stdout)?;
        stdout.flush()?;

        if self.raw {
            terminal::disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }
}

impl Drop for TerminalSetup {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(error = %err, "terminal restore failed");
        }
    }
}

// =============================================================================
// Instance
// =============================================================================

/// A running live session.
#[derive(Debug)]
pub struct Instance {
    app: App,
    // Declared after `app` so the tree unmounts before the terminal is restored.
    setup: TerminalSetup,
}

/// Start a live session sized to the terminal.
///
/// `config.width` / `config.height` are replaced with the terminal size.
pub fn render<F>(component: F, config: AppConfig) -> Result<Instance>
where
    F: FnMut(&mut Scope) -> Node + 'static,
{
    let setup = TerminalSetup::enter(&config)?;
    let (width, height) = terminal::size()?;
    let config = config.with_size(width, height);
    let app = App::with_sink(component, config, Sink::Terminal)?;
    Ok(Instance { app, setup })
}

impl Instance {
    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Drive the app from terminal events until it exits, then unmount and
    /// restore the terminal.
    ///
    /// An error from any cycle ends the session and is returned.
    pub fn wait_until_exit(mut self) -> Result<()> {
        let poll_interval = self.app.config().poll_interval;
        let mut clicks = ClickTracker::default();

        let result = loop {
            if self.app.is_exited() {
                break Ok(());
            }
            if let Err(err) = self.step(poll_interval, &mut clicks) {
                break Err(err);
            }
        };

        self.app.unmount();
        finish_session(result, self.setup.restore())
    }

    fn step(&mut self, timeout: Duration, clicks: &mut ClickTracker) -> Result<()> {
        match poll_event(timeout, clicks)? {
            Some(InputEvent::Key(key)) => self.app.dispatch_key(&key)?,
            Some(InputEvent::Mouse(mouse)) => {
                self.app.dispatch_mouse(&mouse)?;
            }
            Some(InputEvent::Resize(width, height)) => self.app.resize(width, Some(height))?,
            None => {}
        }
        self.app.flush()
    }
}

/// Combine the loop result with the terminal restore. The session's own
/// error wins; a restore failure behind it is logged.
fn finish_session(result: Result<()>, restored: io::Result<()>) -> Result<()> {
    match (result, restored) {
        (Ok(()), restored) => Ok(restored?),
        (Err(err), restored) => {
            if let Err(restore_err) = restored {
                tracing::warn!(error = %restore_err, "terminal restore failed");
            }
            tracing::error!(error = %err, "session ended with an error");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn broken() -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "restore"))
    }

    #[test]
    fn test_session_error_survives_failed_restore() {
        let result = finish_session(Err(Error::TooManyUpdates { limit: 3 }), broken());
        assert!(matches!(result, Err(Error::TooManyUpdates { limit: 3 })));
    }

    #[test]
    fn test_restore_error_reported_after_clean_session() {
        let result = finish_session(Ok(()), broken());
        assert!(matches!(result, Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::BrokenPipe));
        assert!(finish_session(Ok(()), Ok(())).is_ok());
    }
}
