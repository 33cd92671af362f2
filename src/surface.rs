use std::io::{self, Stdout};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to acquire terminal: {0}")]
    Acquire(io::Error),
    #[error("failed to suspend terminal: {0}")]
    Suspend(io::Error),
    #[error("failed to resume terminal: {0}")]
    Resume(io::Error),
    #[error("failed to release terminal: {0}")]
    Release(io::Error),
    #[error("failed to draw frame: {0}")]
    Draw(io::Error),
}

/// Process-wide handle to the raw/alternate-screen terminal mode.
///
/// Acquired once at session start, suspended around every external command,
/// released at shutdown. `Drop` restores the terminal on crash paths so the
/// shell is never left in raw mode.
pub struct Surface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Surface{{active:{}}}", self.active)
    }
}

impl Surface {
    /// Enter raw mode and the alternate screen, hiding the cursor.
    ///
    /// # Errors
    /// Returns `SurfaceError::Acquire` when the terminal cannot be set up;
    /// partially applied state is rolled back.
    pub fn acquire() -> Result<Self, SurfaceError> {
        enable_raw_mode().map_err(SurfaceError::Acquire)?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(SurfaceError::Acquire(e));
        }
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
                let _ = disable_raw_mode();
                return Err(SurfaceError::Acquire(e));
            }
        };
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Draw one frame.
    ///
    /// # Errors
    /// Returns `SurfaceError::Draw` on backend I/O failure.
    pub fn draw<F: FnOnce(&mut Frame)>(&mut self, render: F) -> Result<(), SurfaceError> {
        self.terminal.draw(render).map_err(SurfaceError::Draw)?;
        Ok(())
    }

    /// Leave raw mode and the alternate screen so a child process can use the
    /// real terminal. Must run before any external command is spawned.
    ///
    /// # Errors
    /// Returns `SurfaceError::Suspend`; raw mode is dropped even when leaving
    /// the alternate screen fails.
    pub fn suspend(&mut self) -> Result<(), SurfaceError> {
        disable_raw_mode().map_err(SurfaceError::Suspend)?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, Show).map_err(SurfaceError::Suspend)?;
        self.active = false;
        Ok(())
    }

    /// Re-enter raw mode and the alternate screen after a suspension.
    ///
    /// # Errors
    /// Returns `SurfaceError::Resume`; the caller decides whether to retry or
    /// degrade to a non-interactive report.
    pub fn resume(&mut self) -> Result<(), SurfaceError> {
        enable_raw_mode().map_err(SurfaceError::Resume)?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(SurfaceError::Resume(e));
        }
        if let Err(e) = self.terminal.clear() {
            // Roll back so an inactive surface always means a normal terminal.
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
            return Err(SurfaceError::Resume(e));
        }
        self.active = true;
        Ok(())
    }

    /// Restore the normal terminal for good. Idempotent; safe to call after
    /// a suspension.
    ///
    /// # Errors
    /// Returns `SurfaceError::Release` on I/O failure.
    pub fn release(&mut self) -> Result<(), SurfaceError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode().map_err(SurfaceError::Release)?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, Show).map_err(SurfaceError::Release)?;
        self.terminal.show_cursor().map_err(SurfaceError::Release)?;
        Ok(())
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        }
    }
}
