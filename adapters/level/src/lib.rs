#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level file loader for Blastgrid.
//!
//! A level file is plain text:
//!
//! ```text
//! N                 number of entity lines (player plus adversaries), one digit
//! XXYY              player column and row, two digits each
//! XXYYMPPPP...      adversary column, row, moving flag and path digits (0-4)
//! <map lines>       one line per row, one digit per cell
//! ```
//!
//! The first map line sits at row 0, which the grid never addresses; it is
//! read and discarded. The following lines fill rows `1..rows`, and the last
//! row, which the file cannot reach, is sealed with armor.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use blastgrid_core::{
    AdversarySeed, CellCoord, CellKind, LayoutError, LevelLayout, PathError, PatrolPath,
    ARENA_COLUMNS, ARENA_ROWS, ROW_ORIGIN,
};
use thiserror::Error;

/// Reads and parses the level stored at `path` into a standard-size layout.
pub fn load(path: &Path) -> Result<LevelLayout, LevelError> {
    let source = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&source)
}

/// Parses level text into a layout of [`ARENA_COLUMNS`] by [`ARENA_ROWS`].
pub fn parse(source: &str) -> Result<LevelLayout, LevelError> {
    parse_with_dimensions(source, ARENA_COLUMNS, ARENA_ROWS)
}

/// Parses level text into a layout with explicit dimensions.
///
/// `rows` counts addressable rows; the text must provide `rows` map lines
/// (one for row 0 and one for each row but the last).
pub fn parse_with_dimensions(
    source: &str,
    columns: u32,
    rows: u32,
) -> Result<LevelLayout, LevelError> {
    let mut lines = source.lines().enumerate().map(|(index, text)| SourceLine {
        number: index + 1,
        text: text.trim_end(),
    });

    let header = next_line(&mut lines, "entity count")?;
    let entities = parse_entity_count(header)?;

    let player_line = next_line(&mut lines, "player position")?;
    let player = parse_cell(player_line, 0)?;
    if player_line.text.len() != 4 {
        return Err(LevelError::LineLength {
            line: player_line.number,
            expected: 4,
            actual: player_line.text.len(),
        });
    }

    let mut adversaries = Vec::with_capacity(entities - 1);
    for _ in 1..entities {
        let line = next_line(&mut lines, "adversary")?;
        adversaries.push(parse_adversary(line)?);
    }

    let cells = parse_map(&mut lines, columns, rows)?;
    Ok(LevelLayout::new(columns, rows, cells, player, adversaries)?)
}

#[derive(Clone, Copy, Debug)]
struct SourceLine<'a> {
    number: usize,
    text: &'a str,
}

impl SourceLine<'_> {
    fn digit_at(&self, column: usize) -> Result<u8, LevelError> {
        let byte = self
            .text
            .as_bytes()
            .get(column)
            .copied()
            .ok_or(LevelError::LineLength {
                line: self.number,
                expected: column + 1,
                actual: self.text.len(),
            })?;
        if byte.is_ascii_digit() {
            Ok(byte - b'0')
        } else {
            Err(LevelError::InvalidDigit {
                line: self.number,
                column: column + 1,
                found: char::from(byte),
            })
        }
    }
}

fn next_line<'a>(
    lines: &mut impl Iterator<Item = SourceLine<'a>>,
    expected: &'static str,
) -> Result<SourceLine<'a>, LevelError> {
    lines.next().ok_or(LevelError::MissingLine { expected })
}

fn parse_entity_count(line: SourceLine<'_>) -> Result<usize, LevelError> {
    let count = line.digit_at(0)?;
    if line.text.len() != 1 || count == 0 {
        return Err(LevelError::EntityCount {
            line: line.number,
            found: line.text.to_owned(),
        });
    }
    Ok(usize::from(count))
}

fn parse_cell(line: SourceLine<'_>, start: usize) -> Result<CellCoord, LevelError> {
    let pair = |offset: usize| -> Result<u32, LevelError> {
        let tens = line.digit_at(start + offset)?;
        let units = line.digit_at(start + offset + 1)?;
        Ok(u32::from(tens) * 10 + u32::from(units))
    };
    Ok(CellCoord::new(pair(0)?, pair(2)?))
}

fn parse_adversary(line: SourceLine<'_>) -> Result<AdversarySeed, LevelError> {
    let cell = parse_cell(line, 0)?;
    let moving = match line.digit_at(4)? {
        0 => false,
        1 => true,
        flag => {
            return Err(LevelError::MovingFlag {
                line: line.number,
                found: flag,
            })
        }
    };

    let codes = (5..line.text.len())
        .map(|column| line.digit_at(column))
        .collect::<Result<Vec<_>, _>>()?;
    let path = PatrolPath::from_codes(&codes).map_err(|source| LevelError::Path {
        line: line.number,
        source,
    })?;

    Ok(AdversarySeed { cell, moving, path })
}

fn parse_map<'a>(
    lines: &mut impl Iterator<Item = SourceLine<'a>>,
    columns: u32,
    rows: u32,
) -> Result<Vec<CellKind>, LevelError> {
    let width = usize::try_from(columns).unwrap_or(usize::MAX);
    let mut cells = Vec::new();

    // Row 0 plus every addressable row except the sealed last one.
    for row in 0..rows {
        let line = next_line(lines, "map row")?;
        if line.text.len() != width {
            return Err(LevelError::LineLength {
                line: line.number,
                expected: width,
                actual: line.text.len(),
            });
        }
        let mut decoded = Vec::with_capacity(width);
        for column in 0..width {
            decoded.push(map_cell(line, column)?);
        }
        if row >= ROW_ORIGIN {
            cells.extend(decoded);
        }
    }
    cells.extend(std::iter::repeat(CellKind::Armor).take(width));

    Ok(cells)
}

fn map_cell(line: SourceLine<'_>, column: usize) -> Result<CellKind, LevelError> {
    let code = line.digit_at(column)?;
    match CellKind::from_code(code) {
        Some(
            kind @ (CellKind::Empty
            | CellKind::Armor
            | CellKind::Wall
            | CellKind::DoorClosed
            | CellKind::DoorOpened),
        ) => Ok(kind),
        _ => Err(LevelError::MapCode {
            line: line.number,
            column: column + 1,
            code,
        }),
    }
}

/// Errors raised while loading a level file. Line and column numbers are
/// one-based.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The file could not be read.
    #[error("failed to read level file {}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file ended before a required line.
    #[error("level file ended early: expected {expected} line")]
    MissingLine {
        /// Description of the missing line.
        expected: &'static str,
    },
    /// The header is not a single non-zero digit.
    #[error("line {line}: entity count must be a single digit from 1 to 9, found {found:?}")]
    EntityCount {
        /// Line number.
        line: usize,
        /// Header text.
        found: String,
    },
    /// A line is shorter or longer than its format allows.
    #[error("line {line}: expected {expected} characters, found {actual}")]
    LineLength {
        /// Line number.
        line: usize,
        /// Required length.
        expected: usize,
        /// Observed length.
        actual: usize,
    },
    /// A character that must be a digit is not.
    #[error("line {line}, column {column}: expected a digit, found {found:?}")]
    InvalidDigit {
        /// Line number.
        line: usize,
        /// Column number.
        column: usize,
        /// Offending character.
        found: char,
    },
    /// An adversary moving flag is neither 0 nor 1.
    #[error("line {line}: moving flag must be 0 or 1, found {found}")]
    MovingFlag {
        /// Line number.
        line: usize,
        /// Offending flag.
        found: u8,
    },
    /// An adversary path contains an invalid code.
    #[error("line {line}: invalid adversary path")]
    Path {
        /// Line number.
        line: usize,
        /// Path decoding failure.
        #[source]
        source: PathError,
    },
    /// A map cell uses a code reserved for entities or unknown to the game.
    #[error("line {line}, column {column}: cell code {code} is not allowed in the map")]
    MapCode {
        /// Line number.
        line: usize,
        /// Column number.
        column: usize,
        /// Offending code.
        code: u8,
    },
    /// Entity positions do not fit the grid.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
