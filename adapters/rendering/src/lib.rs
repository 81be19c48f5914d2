#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared text rendering contracts for Blastgrid adapters.
//!
//! Frames are plain character grids: grid row `y` is drawn on screen line `y`
//! and column `x` on screen column `x`. Line 0 stays blank because row 0 is
//! never addressed. Frames stop at [`SCREEN_LINES`], so the armor row sealed
//! under a full-size arena is kept off screen.

use std::fmt;

use blastgrid_core::{CellKind, GridView};

/// Screen lines a frame may occupy.
pub const SCREEN_LINES: usize = 24;

/// Screen column where the rules panel starts.
pub const PANEL_COLUMN: usize = 62;

/// Message printed after the player reaches an opened door.
pub const WIN_MESSAGE: &str = "YOU WIN!!!";

/// Message printed after the player dies.
pub const LOSE_MESSAGE: &str = "YOU LOSE!!!";

/// Intro shown when no intro file is supplied.
pub const DEFAULT_INTRO: &str =
    "\n\n\n          B L A S T G R I D\n\n          Find the door. Mind the fuse.\n";

/// Rules panel text keyed by screen line.
pub const RULES_PANEL: [PanelLine; 11] = [
    PanelLine::new(2, " This is a   "),
    PanelLine::new(3, "   Bomberman!    "),
    PanelLine::new(7, "Rules:            "),
    PanelLine::new(8, "You can move 'X'  "),
    PanelLine::new(9, "by pressing keys. "),
    PanelLine::new(10, "Space to put bomb."),
    PanelLine::new(11, "'&' are enemies.  "),
    PanelLine::new(12, "You must find door"),
    PanelLine::new(13, "'O' by destroying "),
    PanelLine::new(14, "blocks.           "),
    PanelLine::new(20, "Esc to quit.      "),
];

/// Single line of panel text anchored to a screen line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelLine {
    /// Screen line receiving the text.
    pub line: usize,
    /// Text drawn from [`PANEL_COLUMN`] onwards.
    pub text: &'static str,
}

impl PanelLine {
    /// Creates a new panel line.
    #[must_use]
    pub const fn new(line: usize, text: &'static str) -> Self {
        Self { line, text }
    }
}

/// Character drawn for a cell kind.
///
/// Closed doors are indistinguishable from walls until a blast opens them.
#[must_use]
pub const fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => ' ',
        CellKind::Armor => '@',
        CellKind::Wall | CellKind::DoorClosed => ':',
        CellKind::Player => 'X',
        CellKind::Hazard => '*',
        CellKind::DoorOpened => 'O',
        CellKind::Adversary => '&',
    }
}

/// Text frame ready to be written to a terminal.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    /// Draws every addressable row of `grid` that fits on screen on its own
    /// screen line.
    #[must_use]
    pub fn compose(grid: GridView<'_>) -> Self {
        let mut lines = vec![String::new()];
        for (row, cells) in grid.rows() {
            let line = row as usize;
            if line >= SCREEN_LINES {
                break;
            }
            if lines.len() <= line {
                lines.resize(line + 1, String::new());
            }
            lines[line] = cells.iter().copied().map(glyph).collect();
        }
        Self { lines }
    }

    /// Writes `text` starting at the given screen position, padding with
    /// spaces as needed.
    pub fn overlay(&mut self, line: usize, column: usize, text: &str) {
        if self.lines.len() <= line {
            self.lines.resize(line + 1, String::new());
        }
        let target = &mut self.lines[line];
        let mut chars: Vec<char> = target.chars().collect();
        if chars.len() < column {
            chars.resize(column, ' ');
        }
        for (offset, ch) in text.chars().enumerate() {
            match chars.get_mut(column + offset) {
                Some(slot) => *slot = ch,
                None => chars.push(ch),
            }
        }
        *target = chars.into_iter().collect();
    }

    /// Adds the rules panel to the right of the arena.
    #[must_use]
    pub fn with_rules_panel(mut self) -> Self {
        for panel in RULES_PANEL {
            self.overlay(panel.line, PANEL_COLUMN, panel.text);
        }
        self
    }

    /// Screen lines from the top of the terminal.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
