//! Terminal session: raw mode and screen modes for the lifetime of the app.
//!
//! Entering a session switches the terminal to raw mode, optionally to the
//! alternate screen with mouse reporting, and hides the cursor. Dropping the
//! session restores all of it.
//!
//! Mouse reporting is limited to button presses and releases (`?1000`) in
//! SGR encoding (`?1006`); drag and hover motion are never requested.

use crate::actor::EventLoopConfig;
use crate::layout::TermSize;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    Command,
};
use std::{fmt, io};

/// Enable press/release reporting in SGR encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableClickReports;

impl Command for EnableClickReports {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[?1000h\x1b[?1006h")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Undo [`EnableClickReports`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisableClickReports;

impl Command for DisableClickReports {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[?1006l\x1b[?1000l")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Current size of the controlling terminal.
pub fn size() -> io::Result<TermSize> {
    let (width, height) = terminal::size()?;
    Ok(TermSize::new(width, height))
}

/// Terminal modes held for the lifetime of the value.
#[derive(Debug)]
pub struct TerminalSession {
    mouse: bool,
    alternate_screen: bool,
    active: bool,
}

impl TerminalSession {
    /// Enter raw mode and the screen modes requested by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal rejects any of the mode changes;
    /// whatever was already enabled is restored.
    pub fn enter(config: &EventLoopConfig) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let session = Self {
            mouse: config.enable_mouse,
            alternate_screen: config.alternate_screen,
            active: true,
        };

        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableClickReports)?;
        }
        execute!(stdout, cursor::Hide)?;
        log::debug!("terminal session entered");
        Ok(session)
    }

    /// Restore the terminal now, reporting failures.
    pub fn leave(mut self) -> io::Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut stdout = io::stdout();
        execute!(stdout, cursor::Show)?;
        if self.mouse {
            execute!(stdout, DisableClickReports)?;
        }
        if self.alternate_screen {
            execute!(stdout, LeaveAlternateScreen)?;
        }
        terminal::disable_raw_mode()?;
        log::debug!("terminal session restored");
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("failed to restore terminal: {e}");
        }
    }
}
