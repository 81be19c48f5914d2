//! Dense cell storage shared by every world rule.

use blastgrid_core::{cell_index, CellCoord, CellKind, GridView};

/// Fixed-size rectangular array of cell kinds.
///
/// Rows are addressed from [`blastgrid_core::ROW_ORIGIN`]; see
/// [`blastgrid_core::cell_index`]. Every accessor rejects coordinates outside
/// the extent instead of wrapping into a neighbouring row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl Grid {
    /// Creates a grid filled with empty cells.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![CellKind::Empty; capacity],
        }
    }

    pub(crate) fn from_cells(columns: u32, rows: u32, cells: Vec<CellKind>) -> Self {
        debug_assert_eq!(
            cells.len() as u64,
            u64::from(columns) * u64::from(rows),
            "cell count must match grid dimensions"
        );
        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Returns the kind stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Overwrites the kind stored at `cell`.
    ///
    /// Returns `false` and leaves the grid untouched when `cell` lies outside.
    pub fn set_cell(&mut self, cell: CellCoord, kind: CellKind) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = kind;
                true
            }
            None => {
                debug_assert!(false, "write outside the grid at {cell}");
                false
            }
        }
    }

    /// Moves whatever occupies `from` onto `to`, leaving `from` empty.
    ///
    /// Returns the kind that was moved, or `None` without mutating anything
    /// when either coordinate lies outside the grid.
    pub fn relocate(&mut self, from: CellCoord, to: CellCoord) -> Option<CellKind> {
        let source = self.index(from)?;
        let destination = self.index(to)?;
        let occupant = self.cells[source];
        self.cells[source] = CellKind::Empty;
        self.cells[destination] = occupant;
        Some(occupant)
    }

    /// Counts the cells holding `kind`.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| **cell == kind).count()
    }

    /// Captures a read-only view of the cells.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        cell_index(cell, self.columns, self.rows)
    }
}
