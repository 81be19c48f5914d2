#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Blastgrid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The scheduler submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually happened. Systems read immutable views such as [`GridView`] and
//! [`AdversaryView`] and respond exclusively with new command batches.
//!
//! # Coordinates
//!
//! Cells are addressed by column (`x`) and row (`y`). Rows are counted from
//! [`ROW_ORIGIN`]: a grid with `rows` rows stores rows `ROW_ORIGIN..ROW_ORIGIN +
//! rows`, and row 0 is never addressed. Level files place their first map line
//! at row 0, so entity coordinates in those files are only meaningful under
//! this convention.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of columns in the standard arena.
pub const ARENA_COLUMNS: u32 = 60;

/// Number of rows in the standard arena.
pub const ARENA_ROWS: u32 = 24;

/// Index of the first addressable row.
pub const ROW_ORIGIN: u32 = 1;

/// Macro-ticks a freshly armed hazard waits before detonating.
pub const HAZARD_FUSE: u32 = 7;

/// Number of cells each blast ray travels.
pub const HAZARD_RADIUS: u32 = 2;

/// Kind of content stored in a single grid cell.
///
/// The declaration order matches the numeric codes used by level files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open floor.
    Empty,
    /// Indestructible block that stops blast rays.
    Armor,
    /// Destructible block.
    Wall,
    /// The player.
    Player,
    /// An armed hazard waiting to detonate.
    Hazard,
    /// Exit hidden behind a wall; opened by a blast.
    DoorClosed,
    /// Exit the player can walk into to win.
    DoorOpened,
    /// A live adversary.
    Adversary,
}

impl CellKind {
    /// Decodes a level-file cell code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Armor),
            2 => Some(Self::Wall),
            3 => Some(Self::Player),
            4 => Some(Self::Hazard),
            5 => Some(Self::DoorClosed),
            6 => Some(Self::DoorOpened),
            7 => Some(Self::Adversary),
            _ => None,
        }
    }

    /// Level-file code of the cell kind.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Armor => 1,
            Self::Wall => 2,
            Self::Player => 3,
            Self::Hazard => 4,
            Self::DoorClosed => 5,
            Self::DoorOpened => 6,
            Self::Adversary => 7,
        }
    }

    /// Reports whether the cell is open floor.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Cardinal movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which adversaries probe their neighbourhood for the player.
    pub const PROBE_ORDER: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row delta of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Decodes a patrol path code (1 = up, 2 = right, 3 = down, 4 = left).
    #[must_use]
    pub const fn from_path_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::North),
            2 => Some(Self::East),
            3 => Some(Self::South),
            4 => Some(Self::West),
            _ => None,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Row index of the cell, counted from [`ROW_ORIGIN`].
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Shifts the coordinate by the provided deltas.
    ///
    /// Returns `None` when either component would become negative or overflow.
    /// The result is not checked against any grid extent.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Self::new(column, row))
    }

    /// Neighbouring coordinate one step away in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Computes the dense storage index of `cell` in a grid of the given size.
///
/// Rows are counted from [`ROW_ORIGIN`]; coordinates outside the grid yield
/// `None`.
#[must_use]
pub fn cell_index(cell: CellCoord, columns: u32, rows: u32) -> Option<usize> {
    if cell.column() >= columns || cell.row() < ROW_ORIGIN {
        return None;
    }
    let row = cell.row() - ROW_ORIGIN;
    if row >= rows {
        return None;
    }
    let row = usize::try_from(row).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let width = usize::try_from(columns).ok()?;
    Some(row * width + column)
}

/// Unique identifier assigned to an adversary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(u32);

impl AdversaryId {
    /// Creates a new adversary identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Single entry of a patrol path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathSymbol {
    /// Step one cell in the given direction.
    Step(Direction),
    /// Restart the path from its first symbol.
    Loop,
}

/// Cyclic sequence of steps followed by an adversary.
///
/// A path always ends in [`PathSymbol::Loop`]; reading past the end behaves
/// like reading the loop marker.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatrolPath {
    symbols: Vec<PathSymbol>,
}

impl PatrolPath {
    /// Builds a path from level-file codes (1–4 directions, 0 loop marker).
    ///
    /// A trailing loop marker is always appended, mirroring the terminator the
    /// level format implies at the end of each path line.
    pub fn from_codes(codes: &[u8]) -> Result<Self, PathError> {
        let mut symbols = Vec::with_capacity(codes.len() + 1);
        for (position, &code) in codes.iter().enumerate() {
            let symbol = if code == 0 {
                PathSymbol::Loop
            } else {
                let direction = Direction::from_path_code(code)
                    .ok_or(PathError::InvalidCode { code, position })?;
                PathSymbol::Step(direction)
            };
            symbols.push(symbol);
        }
        symbols.push(PathSymbol::Loop);
        Ok(Self { symbols })
    }

    /// Builds a looping path from a list of directions.
    #[must_use]
    pub fn from_directions(directions: &[Direction]) -> Self {
        let mut symbols: Vec<PathSymbol> =
            directions.iter().copied().map(PathSymbol::Step).collect();
        symbols.push(PathSymbol::Loop);
        Self { symbols }
    }

    /// Symbol stored at `cursor`, or the loop marker when out of range.
    #[must_use]
    pub fn symbol(&self, cursor: usize) -> PathSymbol {
        self.symbols.get(cursor).copied().unwrap_or(PathSymbol::Loop)
    }

    /// All symbols, including the trailing loop marker.
    #[must_use]
    pub fn symbols(&self) -> &[PathSymbol] {
        &self.symbols
    }
}

/// Errors raised while decoding patrol paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The code is neither a direction (1–4) nor the loop marker (0).
    #[error("path code {code} at position {position} is not a direction (1-4) or loop marker (0)")]
    InvalidCode {
        /// Offending code.
        code: u8,
        /// Zero-based position of the code within the path.
        position: usize,
    },
}

/// Player intent sampled once per micro-tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum InputCommand {
    /// No input was observed.
    #[default]
    Idle,
    /// Face and walk toward the given direction.
    Steer(Direction),
    /// Arm a hazard in front of the player.
    PlaceHazard,
    /// Abandon the session immediately.
    Quit,
}

/// Result of testing whether an entity may step into a neighbouring cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveCheck {
    /// The destination is occupied or outside the grid.
    Blocked,
    /// The destination is open floor.
    Open,
    /// The destination is an opened door.
    WinTrigger,
}

/// Reasons a hazard arming request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmError {
    /// Another hazard is already armed.
    AlreadyArmed,
    /// The cell in front of the player is not empty.
    Occupied,
    /// The cell in front of the player lies outside the grid.
    OutOfBounds,
}

/// What eliminated the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// The player stood on a blast ray.
    Blast,
    /// An adversary stepped toward the player's cell.
    Caught {
        /// Adversary that reached the player.
        adversary: AdversaryId,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turns the player toward `direction` and requests a step this micro-tick.
    SteerPlayer {
        /// New heading of the player.
        direction: Direction,
    },
    /// Resolves the player's pending step and clears the moving flag.
    ResolvePlayerMotion,
    /// Arms a hazard on the cell in front of the player.
    ArmHazard,
    /// Advances the hazard countdown, detonating it when it expires.
    TickHazard,
    /// Moves an adversary one step according to an AI decision.
    StepAdversary {
        /// Adversary being moved.
        adversary: AdversaryId,
        /// Path cursor the decision was taken from.
        cursor: usize,
        /// Heading chosen for this macro-tick, if any.
        heading: Option<Direction>,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The player accepted a new heading.
    PlayerSteered {
        /// Heading now faced by the player.
        direction: Direction,
    },
    /// The player moved between two cells.
    PlayerAdvanced {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// The player faced an opened door while resolving motion.
    ExitReached {
        /// Cell holding the opened door.
        door: CellCoord,
    },
    /// A hazard was armed.
    HazardArmed {
        /// Cell holding the hazard.
        cell: CellCoord,
        /// Macro-ticks left before detonation.
        fuse: u32,
    },
    /// A hazard arming request was ignored.
    HazardArmRejected {
        /// Specific reason the request failed.
        reason: ArmError,
    },
    /// The hazard countdown advanced without detonating.
    HazardFuseBurned {
        /// Cell holding the hazard.
        cell: CellCoord,
        /// Macro-ticks left before detonation.
        remaining: u32,
    },
    /// The hazard detonated and was released.
    HazardDetonated {
        /// Cell the hazard occupied.
        center: CellCoord,
        /// Every cell traversed by a blast ray, in traversal order.
        affected: Vec<CellCoord>,
    },
    /// A blast opened a closed door.
    DoorOpened {
        /// Cell holding the door.
        cell: CellCoord,
    },
    /// An adversary moved between two cells.
    AdversaryAdvanced {
        /// Adversary that moved.
        adversary: AdversaryId,
        /// Cell occupied before moving.
        from: CellCoord,
        /// Cell occupied after moving.
        to: CellCoord,
    },
    /// An adversary kept its position this macro-tick.
    AdversaryHeld {
        /// Adversary that held.
        adversary: AdversaryId,
        /// Cell the adversary occupies.
        cell: CellCoord,
    },
    /// A blast removed an adversary from the roster.
    AdversaryEliminated {
        /// Adversary that was removed.
        adversary: AdversaryId,
        /// Cell where the adversary stood.
        cell: CellCoord,
    },
    /// The player's health dropped to zero.
    PlayerKilled {
        /// Cell the player occupies.
        cell: CellCoord,
        /// What eliminated the player.
        cause: DeathCause,
    },
}

/// Read-only view into the dense cell grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellKind],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellKind], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the kind stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellKind> {
        cell_index(cell, self.columns, self.rows).and_then(|index| self.cells.get(index).copied())
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Iterates over the grid one row at a time, yielding the row index and
    /// its cells.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &'a [CellKind])> + 'a {
        let width = usize::try_from(self.columns).unwrap_or(usize::MAX).max(1);
        self.cells
            .chunks(width)
            .zip(ROW_ORIGIN..)
            .map(|(cells, row)| (row, cells))
    }
}

/// Immutable representation of a single adversary used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdversarySnapshot {
    /// Unique identifier assigned to the adversary.
    pub id: AdversaryId,
    /// Grid cell currently occupied by the adversary.
    pub cell: CellCoord,
    /// Heading chosen during the previous macro-tick.
    pub heading: Option<Direction>,
    /// Position within the patrol path.
    pub cursor: usize,
    /// Patrol path followed by the adversary.
    pub path: PatrolPath,
    /// Moving flag read from level data.
    pub moving: bool,
}

/// Read-only snapshot describing all adversaries in the arena.
#[derive(Clone, Debug, Default)]
pub struct AdversaryView {
    snapshots: Vec<AdversarySnapshot>,
}

impl AdversaryView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AdversarySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &AdversarySnapshot> {
        self.snapshots.iter()
    }

    /// Number of adversaries captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no adversaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Initial configuration of one adversary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdversarySeed {
    /// Starting cell.
    pub cell: CellCoord,
    /// Moving flag from level data.
    pub moving: bool,
    /// Patrol path to follow.
    pub path: PatrolPath,
}

/// Fully populated initial state handed to the world.
///
/// The cell grid must not contain player or adversary markers; the world
/// writes those itself from `player` and `adversaries`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
    player: CellCoord,
    adversaries: Vec<AdversarySeed>,
}

impl LevelLayout {
    /// Validates and assembles a layout.
    pub fn new(
        columns: u32,
        rows: u32,
        cells: Vec<CellKind>,
        player: CellCoord,
        adversaries: Vec<AdversarySeed>,
    ) -> Result<Self, LayoutError> {
        let expected = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(usize::MAX);
        if cells.len() != expected {
            return Err(LayoutError::CellCount {
                expected,
                actual: cells.len(),
            });
        }
        if cell_index(player, columns, rows).is_none() {
            return Err(LayoutError::PlayerOutOfBounds { cell: player });
        }
        if let Some((index, seed)) = adversaries
            .iter()
            .enumerate()
            .find(|(_, seed)| cell_index(seed.cell, columns, rows).is_none())
        {
            return Err(LayoutError::AdversaryOutOfBounds {
                index,
                cell: seed.cell,
            });
        }

        Ok(Self {
            columns,
            rows,
            cells,
            player,
            adversaries,
        })
    }

    /// Provides the dimensions of the layout as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Read-only view of the terrain cells.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows)
    }

    /// Overwrites a terrain cell, returning `false` when `cell` is outside the
    /// layout.
    pub fn set_cell(&mut self, cell: CellCoord, kind: CellKind) -> bool {
        match cell_index(cell, self.columns, self.rows) {
            Some(index) => {
                self.cells[index] = kind;
                true
            }
            None => false,
        }
    }

    /// Starting cell of the player.
    #[must_use]
    pub const fn player(&self) -> CellCoord {
        self.player
    }

    /// Initial adversary configurations.
    #[must_use]
    pub fn adversaries(&self) -> &[AdversarySeed] {
        &self.adversaries
    }

    /// Splits the layout into its terrain cells, player cell and adversaries.
    #[must_use]
    pub fn into_parts(self) -> (Vec<CellKind>, CellCoord, Vec<AdversarySeed>) {
        (self.cells, self.player, self.adversaries)
    }
}

/// Reasons a [`LevelLayout`] fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The cell vector does not match the declared dimensions.
    #[error("layout holds {actual} cells but its dimensions require {expected}")]
    CellCount {
        /// Cells required by the dimensions.
        expected: usize,
        /// Cells provided.
        actual: usize,
    },
    /// The player starts outside the grid.
    #[error("player start {cell} lies outside the grid")]
    PlayerOutOfBounds {
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// An adversary starts outside the grid.
    #[error("adversary {index} starts at {cell}, outside the grid")]
    AdversaryOutOfBounds {
        /// Position of the adversary in the seed list.
        index: usize,
        /// Offending coordinate.
        cell: CellCoord,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(12, 7));
    }

    #[test]
    fn cell_codes_match_level_format() {
        for code in 0..=7 {
            let kind = CellKind::from_code(code).expect("codes 0-7 are defined");
            assert_eq!(kind.code(), code);
        }
        assert_eq!(CellKind::from_code(8), None);
        assert_eq!(CellKind::from_code(5), Some(CellKind::DoorClosed));
    }

    #[test]
    fn cell_index_skips_row_zero() {
        assert_eq!(cell_index(CellCoord::new(0, 0), 10, 10), None);
        assert_eq!(cell_index(CellCoord::new(0, 1), 10, 10), Some(0));
        assert_eq!(cell_index(CellCoord::new(3, 2), 10, 10), Some(13));
        assert_eq!(cell_index(CellCoord::new(9, 10), 10, 10), Some(99));
        assert_eq!(cell_index(CellCoord::new(0, 11), 10, 10), None);
        assert_eq!(cell_index(CellCoord::new(10, 1), 10, 10), None);
    }

    #[test]
    fn offset_rejects_negative_coordinates() {
        let origin = CellCoord::new(0, 1);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::North), Some(CellCoord::new(0, 0)));
        assert_eq!(origin.offset(2, 3), Some(CellCoord::new(2, 4)));
    }

    #[test]
    fn patrol_path_appends_loop_marker() {
        let path = PatrolPath::from_codes(&[2, 2]).expect("valid codes");
        assert_eq!(
            path.symbols(),
            &[
                PathSymbol::Step(Direction::East),
                PathSymbol::Step(Direction::East),
                PathSymbol::Loop,
            ]
        );
        assert_eq!(path.symbol(17), PathSymbol::Loop);
    }

    #[test]
    fn patrol_path_rejects_unknown_codes() {
        assert_eq!(
            PatrolPath::from_codes(&[1, 9]),
            Err(PathError::InvalidCode {
                code: 9,
                position: 1
            })
        );
    }

    #[test]
    fn grid_view_rows_start_at_origin() {
        let cells = vec![CellKind::Empty, CellKind::Armor, CellKind::Wall, CellKind::Player];
        let view = GridView::new(&cells, 2, 2);
        let rows: Vec<_> = view.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, ROW_ORIGIN);
        assert_eq!(rows[1].1, &[CellKind::Wall, CellKind::Player]);
        assert_eq!(view.cell(CellCoord::new(1, 2)), Some(CellKind::Player));
    }

    #[test]
    fn layout_rejects_mismatched_cell_count() {
        let error = LevelLayout::new(
            3,
            3,
            vec![CellKind::Empty; 8],
            CellCoord::new(1, 1),
            Vec::new(),
        )
        .expect_err("eight cells cannot fill a 3x3 grid");
        assert_eq!(
            error,
            LayoutError::CellCount {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn layout_rejects_player_on_row_zero() {
        let error = LevelLayout::new(
            3,
            3,
            vec![CellKind::Empty; 9],
            CellCoord::new(1, 0),
            Vec::new(),
        )
        .expect_err("row zero is not addressable");
        assert!(matches!(error, LayoutError::PlayerOutOfBounds { .. }));
    }
}
