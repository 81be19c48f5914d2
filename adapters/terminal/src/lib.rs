#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal frontend implemented on top of crossterm.

use std::{
    io::{self, Stdout, Write},
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use blastgrid_core::{Direction, GridView, InputCommand};
use blastgrid_rendering::Frame;
use blastgrid_system_scheduler::Frontend;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use tracing::{debug, error};

/// Frontend drawing into the alternate screen of the controlling terminal.
///
/// Raw mode and the alternate screen are held until [`restore`] is called or
/// the frontend is dropped.
///
/// [`restore`]: TerminalFrontend::restore
#[derive(Debug)]
pub struct TerminalFrontend {
    stdout: Stdout,
    intro: String,
    active: bool,
}

impl TerminalFrontend {
    /// Switches the terminal into raw mode on the alternate screen.
    pub fn enter(intro: String) -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        // Dropping on the error path below restores raw mode.
        let mut frontend = Self {
            stdout: io::stdout(),
            intro,
            active: true,
        };
        execute!(
            frontend.stdout,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All)
        )
        .context("failed to enter alternate screen")?;
        debug!("terminal frontend active");
        Ok(frontend)
    }

    /// Leaves the alternate screen and disables raw mode.
    ///
    /// Calling this more than once is a no-op.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.stdout, Show, LeaveAlternateScreen)
            .context("failed to leave alternate screen")?;
        disable_raw_mode().context("failed to disable raw mode")?;
        debug!("terminal restored");
        Ok(())
    }

    fn draw_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for (index, line) in lines.into_iter().enumerate() {
            let row = u16::try_from(index).context("frame is taller than the terminal")?;
            queue!(
                self.stdout,
                MoveTo(0, row),
                Print(line),
                Clear(ClearType::UntilNewLine)
            )
            .context("failed to queue frame line")?;
        }
        self.stdout.flush().context("failed to flush terminal")
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            error!(?err, "failed to restore terminal");
        }
    }
}

impl Frontend for TerminalFrontend {
    fn show_intro(&mut self) -> Result<()> {
        queue!(self.stdout, Clear(ClearType::All)).context("failed to clear terminal")?;
        let intro = std::mem::take(&mut self.intro);
        let result = self.draw_lines(intro.lines());
        self.intro = intro;
        result
    }

    fn poll_input(&mut self) -> Result<InputCommand> {
        if !event::poll(Duration::ZERO).context("failed to poll terminal events")? {
            return Ok(InputCommand::Idle);
        }
        match event::read().context("failed to read terminal event")? {
            Event::Key(key) => Ok(translate_key(key)),
            _ => Ok(InputCommand::Idle),
        }
    }

    fn present(&mut self, grid: GridView<'_>) -> Result<()> {
        let frame = Frame::compose(grid).with_rules_panel();
        self.draw_lines(frame.lines().iter().map(String::as_str))
    }

    fn pause(&mut self, duration: Duration) -> Result<()> {
        thread::sleep(duration);
        Ok(())
    }
}

/// Maps a key press to player input.
///
/// Arrow keys steer, space places a hazard, escape or `Ctrl+C` quits. Key
/// releases and every other key are ignored.
#[must_use]
pub fn translate_key(key: KeyEvent) -> InputCommand {
    if key.kind == KeyEventKind::Release {
        return InputCommand::Idle;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Up, _) => InputCommand::Steer(Direction::North),
        (KeyCode::Right, _) => InputCommand::Steer(Direction::East),
        (KeyCode::Down, _) => InputCommand::Steer(Direction::South),
        (KeyCode::Left, _) => InputCommand::Steer(Direction::West),
        (KeyCode::Char(' '), _) => InputCommand::PlaceHazard,
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => InputCommand::Quit,
        _ => InputCommand::Idle,
    }
}
