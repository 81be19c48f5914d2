#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adversary decision system: scripted patrols overridden by player proximity.

use blastgrid_core::{
    AdversarySnapshot, AdversaryView, CellKind, Command, Direction, GridView, PathSymbol,
};

/// Pure system that turns adversary snapshots into step commands.
///
/// Decisions only read the player's position, which does not change while the
/// world applies adversary steps, so a whole macro-tick can be decided from a
/// single snapshot.
#[derive(Debug, Default)]
pub struct Pursuit;

impl Pursuit {
    /// Emits one [`Command::StepAdversary`] per adversary, in identifier order.
    pub fn handle(&self, adversaries: &AdversaryView, grid: GridView<'_>, out: &mut Vec<Command>) {
        out.extend(adversaries.iter().map(|adversary| decide(adversary, grid)));
    }
}

fn decide(adversary: &AdversarySnapshot, grid: GridView<'_>) -> Command {
    let cursor = match adversary.path.symbol(adversary.cursor) {
        PathSymbol::Loop => 0,
        PathSymbol::Step(_) => adversary.cursor,
    };

    // An empty path leaves the previous heading in place.
    let mut heading = match adversary.path.symbol(cursor) {
        PathSymbol::Step(direction) => Some(direction),
        PathSymbol::Loop => adversary.heading,
    };

    for direction in Direction::PROBE_ORDER {
        let neighbour = adversary
            .cell
            .step(direction)
            .and_then(|cell| grid.cell(cell));
        if neighbour == Some(CellKind::Player) {
            heading = Some(direction);
        }
    }

    Command::StepAdversary {
        adversary: adversary.id,
        cursor,
        heading,
    }
}
