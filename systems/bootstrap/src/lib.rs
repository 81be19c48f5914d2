#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that turns a parsed level into a playable world.

use blastgrid_core::{CellCoord, CellKind, LevelLayout};
use blastgrid_world::World;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Number of hidden doors placed in every level.
pub const DOOR_COUNT: usize = 3;

/// Configuration parameters required to construct the bootstrap system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    doors: usize,
    seed: u64,
}

impl Config {
    /// Creates a configuration placing [`DOOR_COUNT`] doors with the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self::with_doors(DOOR_COUNT, seed)
    }

    /// Creates a configuration with an explicit door count.
    #[must_use]
    pub const fn with_doors(doors: usize, seed: u64) -> Self {
        Self { doors, seed }
    }
}

/// Places hidden doors and builds the world.
#[derive(Debug)]
pub struct Bootstrap {
    doors: usize,
    rng: ChaCha8Rng,
}

impl Bootstrap {
    /// Creates a bootstrap system from the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            doors: config.doors,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Turns randomly chosen walls into closed doors.
    ///
    /// Each door replaces a distinct wall; a level with fewer walls than the
    /// configured count gets one door per wall. Returns the converted cells.
    pub fn place_doors(&mut self, layout: &mut LevelLayout) -> Vec<CellCoord> {
        let walls: Vec<CellCoord> = layout
            .view()
            .rows()
            .flat_map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .filter(|(_, kind)| **kind == CellKind::Wall)
                    .filter_map(move |(column, _)| {
                        u32::try_from(column)
                            .ok()
                            .map(|column| CellCoord::new(column, row))
                    })
            })
            .collect();

        let doors: Vec<CellCoord> = walls
            .choose_multiple(&mut self.rng, self.doors)
            .copied()
            .collect();
        for &door in &doors {
            let _ = layout.set_cell(door, CellKind::DoorClosed);
        }

        info!(walls = walls.len(), doors = doors.len(), "placed hidden doors");
        doors
    }

    /// Places the doors and hands the finished layout to a new world.
    #[must_use]
    pub fn build(&mut self, mut layout: LevelLayout) -> World {
        let _ = self.place_doors(&mut layout);
        World::new(layout)
    }
}
