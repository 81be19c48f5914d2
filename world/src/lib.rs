#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for Blastgrid.
//!
//! The world owns the grid, the player, the adversary roster and the optional
//! hazard. It is mutated exclusively through [`apply`] and read through the
//! [`query`] module.

mod entities;
mod grid;
mod hazard;
mod movement;

use blastgrid_core::{CellKind, Command, Event, LevelLayout};

use self::entities::{Hazard, Player, Roster};

pub use self::grid::Grid;
pub use self::hazard::HazardRules;
pub use self::movement::can_advance;

/// Represents the authoritative Blastgrid world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    player: Player,
    roster: Roster,
    hazard: Option<Hazard>,
    rules: HazardRules,
}

impl World {
    /// Creates a world from a level layout using the standard hazard rules.
    #[must_use]
    pub fn new(layout: LevelLayout) -> Self {
        Self::with_rules(layout, HazardRules::default())
    }

    /// Creates a world from a level layout with explicit hazard rules.
    ///
    /// Player and adversary markers are written onto the terrain, adversaries
    /// last, so an adversary seeded on the player's cell hides the player.
    #[must_use]
    pub fn with_rules(layout: LevelLayout, rules: HazardRules) -> Self {
        let (columns, rows) = layout.dimensions();
        let (cells, player_cell, seeds) = layout.into_parts();
        let mut grid = Grid::from_cells(columns, rows, cells);

        let player = Player::spawn(player_cell);
        let _ = grid.set_cell(player_cell, CellKind::Player);

        let roster = Roster::from_seeds(seeds);
        for adversary in roster.iter() {
            let _ = grid.set_cell(adversary.cell, CellKind::Adversary);
        }

        Self {
            grid,
            player,
            roster,
            hazard: None,
            rules,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the player is dead every command is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if !world.player.alive {
        return;
    }

    match command {
        Command::SteerPlayer { direction } => world.steer_player(direction, out_events),
        Command::ResolvePlayerMotion => world.resolve_player_motion(out_events),
        Command::ArmHazard => world.arm_hazard(out_events),
        Command::TickHazard => world.tick_hazard(out_events),
        Command::StepAdversary {
            adversary,
            cursor,
            heading,
        } => world.step_adversary(adversary, cursor, heading, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use blastgrid_core::{AdversaryView, CellCoord, CellKind, Direction, GridView};

    use super::World;

    /// Captures a read-only view of the grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Returns the kind stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell(world: &World, cell: CellCoord) -> Option<CellKind> {
        world.grid.cell_at(cell)
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player.cell
    }

    /// Direction the player is facing.
    #[must_use]
    pub fn player_heading(world: &World) -> Direction {
        world.player.heading
    }

    /// Reports whether the player is still alive.
    #[must_use]
    pub fn player_alive(world: &World) -> bool {
        world.player.alive
    }

    /// Captures a read-only view of the adversaries in the arena.
    #[must_use]
    pub fn adversary_view(world: &World) -> AdversaryView {
        AdversaryView::from_snapshots(
            world
                .roster
                .iter()
                .map(|adversary| adversary.snapshot())
                .collect(),
        )
    }

    /// Number of live adversaries.
    #[must_use]
    pub fn adversary_count(world: &World) -> usize {
        world.roster.len()
    }

    /// Snapshot of the armed hazard, if any.
    #[must_use]
    pub fn hazard(world: &World) -> Option<HazardSnapshot> {
        world.hazard.map(|hazard| HazardSnapshot {
            cell: hazard.cell,
            timer: hazard.timer,
            radius: hazard.radius,
        })
    }

    /// Immutable representation of the armed hazard.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct HazardSnapshot {
        /// Cell holding the hazard.
        pub cell: CellCoord,
        /// Macro-ticks left before detonation.
        pub timer: u32,
        /// Cells travelled by each blast ray.
        pub radius: u32,
    }
}
