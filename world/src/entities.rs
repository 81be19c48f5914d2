//! Player, adversary and hazard records owned by the world.

use blastgrid_core::{
    AdversaryId, AdversarySeed, AdversarySnapshot, CellCoord, Direction, PatrolPath,
};

/// The single player character.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) heading: Direction,
    pub(crate) moving: bool,
    pub(crate) alive: bool,
}

impl Player {
    /// Spawns a player facing up, standing still.
    pub(crate) fn spawn(cell: CellCoord) -> Self {
        Self {
            cell,
            heading: Direction::North,
            moving: false,
            alive: true,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Adversary {
    pub(crate) id: AdversaryId,
    pub(crate) cell: CellCoord,
    pub(crate) heading: Option<Direction>,
    pub(crate) path: PatrolPath,
    pub(crate) cursor: usize,
    /// Copied from level data; patrol motion does not consult it.
    pub(crate) moving: bool,
}

impl Adversary {
    pub(crate) fn snapshot(&self) -> AdversarySnapshot {
        AdversarySnapshot {
            id: self.id,
            cell: self.cell,
            heading: self.heading,
            cursor: self.cursor,
            path: self.path.clone(),
            moving: self.moving,
        }
    }
}

/// Owning collection of live adversaries.
///
/// Entry order carries no meaning; removal swaps the last entry into the gap.
#[derive(Clone, Debug, Default)]
pub(crate) struct Roster {
    entries: Vec<Adversary>,
}

impl Roster {
    /// Creates the roster, numbering adversaries in seed order.
    pub(crate) fn from_seeds(seeds: Vec<AdversarySeed>) -> Self {
        let entries = seeds
            .into_iter()
            .zip(0..)
            .map(|(seed, id)| Adversary {
                id: AdversaryId::new(id),
                cell: seed.cell,
                heading: None,
                path: seed.path,
                cursor: 0,
                moving: seed.moving,
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Adversary> {
        self.entries.iter()
    }

    pub(crate) fn get_mut(&mut self, id: AdversaryId) -> Option<&mut Adversary> {
        self.entries.iter_mut().find(|adversary| adversary.id == id)
    }

    /// Removes the first adversary standing on `cell`.
    ///
    /// Several adversaries can share a cell after walking over each other;
    /// only one of them is removed per call.
    pub(crate) fn remove_at(&mut self, cell: CellCoord) -> Option<Adversary> {
        let index = self
            .entries
            .iter()
            .position(|adversary| adversary.cell == cell)?;
        Some(self.entries.swap_remove(index))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Armed hazard waiting for its fuse to burn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Hazard {
    pub(crate) cell: CellCoord,
    pub(crate) timer: u32,
    pub(crate) radius: u32,
}
