//! Collision rules and the motion commands built on them.

use blastgrid_core::{
    AdversaryId, CellCoord, CellKind, DeathCause, Direction, Event, GridView, MoveCheck,
};

use crate::World;

/// Tests whether an entity on `from` may step toward `direction`.
///
/// An opened door is a win trigger; any other non-empty cell, or a cell
/// outside the grid, blocks.
#[must_use]
pub fn can_advance(grid: GridView<'_>, from: CellCoord, direction: Direction) -> MoveCheck {
    match from.step(direction).and_then(|to| grid.cell(to)) {
        Some(CellKind::Empty) => MoveCheck::Open,
        Some(CellKind::DoorOpened) => MoveCheck::WinTrigger,
        Some(_) | None => MoveCheck::Blocked,
    }
}

impl World {
    pub(crate) fn steer_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        self.player.heading = direction;
        self.player.moving = true;
        out_events.push(Event::PlayerSteered { direction });
    }

    /// Applies the player's pending step. The exit check runs even when the
    /// player is standing still, so any accepted input while facing an opened
    /// door wins.
    pub(crate) fn resolve_player_motion(&mut self, out_events: &mut Vec<Event>) {
        let from = self.player.cell;
        let heading = self.player.heading;
        let moving = std::mem::replace(&mut self.player.moving, false);

        let Some(to) = from.step(heading) else {
            return;
        };

        match can_advance(self.grid.view(), from, heading) {
            MoveCheck::WinTrigger => out_events.push(Event::ExitReached { door: to }),
            MoveCheck::Open if moving => {
                if self.grid.relocate(from, to).is_some() {
                    self.player.cell = to;
                    out_events.push(Event::PlayerAdvanced { from, to });
                }
            }
            MoveCheck::Open | MoveCheck::Blocked => {}
        }
    }

    /// Applies an AI decision. Only hazards stop adversaries; walls, armor and
    /// doors are overwritten by the move.
    pub(crate) fn step_adversary(
        &mut self,
        id: AdversaryId,
        cursor: usize,
        heading: Option<Direction>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(adversary) = self.roster.get_mut(id) else {
            return;
        };
        adversary.cursor = cursor;
        adversary.heading = heading;
        let from = adversary.cell;

        let destination = heading
            .and_then(|direction| from.step(direction))
            .and_then(|to| self.grid.cell_at(to).map(|kind| (to, kind)));

        match destination {
            Some((to, CellKind::Player)) => {
                self.player.alive = false;
                out_events.push(Event::PlayerKilled {
                    cell: to,
                    cause: DeathCause::Caught { adversary: id },
                });
            }
            Some((_, CellKind::Hazard)) | None => {
                out_events.push(Event::AdversaryHeld {
                    adversary: id,
                    cell: from,
                });
            }
            Some((to, _)) => {
                let _ = self.grid.relocate(from, to);
                adversary.cell = to;
                adversary.cursor += 1;
                out_events.push(Event::AdversaryAdvanced {
                    adversary: id,
                    from,
                    to,
                });
            }
        }
    }
}
