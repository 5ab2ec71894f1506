use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use std::io::{self, Stdout};
use tracing::debug;

/// Leave raw mode and the alternate screen. Safe to call more than once,
/// including from a panic hook where no `Tui` is reachable.
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Owns the terminal for the lifetime of the dashboard. Dropping it puts the
/// terminal back even if `exit` was never reached.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl Tui {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(format!("Failed to enter alternate screen: {}", e).into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
            let _ = restore();
            format!("Failed to create terminal: {}", e)
        })?;

        debug!("terminal initialised");
        Ok(Self {
            terminal,
            active: true,
        })
    }

    pub fn draw<F>(&mut self, render: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), Box<dyn std::error::Error>> {
        self.terminal.resize(Rect::new(0, 0, width, height))?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        debug!("terminal restored");
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            tracing::warn!("failed to restore terminal: {}", err);
        }
    }
}
