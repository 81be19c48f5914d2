//! Hazard arming, countdown and blast propagation.

use blastgrid_core::{
    ArmError, CellCoord, CellKind, DeathCause, Direction, Event, HAZARD_FUSE, HAZARD_RADIUS,
};

use crate::{entities::Hazard, World};

/// Order of the four cardinal rays fired from the hazard's cell.
const CARDINAL_RAYS: [Direction; 4] = [
    Direction::East,
    Direction::West,
    Direction::South,
    Direction::North,
];

/// Fuse length and blast reach applied to newly armed hazards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardRules {
    /// Macro-ticks between arming and detonation.
    pub fuse: u32,
    /// Cells travelled by each blast ray.
    pub radius: u32,
}

impl Default for HazardRules {
    fn default() -> Self {
        Self {
            fuse: HAZARD_FUSE,
            radius: HAZARD_RADIUS,
        }
    }
}

impl World {
    pub(crate) fn arm_hazard(&mut self, out_events: &mut Vec<Event>) {
        let target = self.player.cell.step(self.player.heading);
        let rejection = match target.and_then(|cell| self.grid.cell_at(cell)) {
            None => Some(ArmError::OutOfBounds),
            Some(CellKind::Empty) if self.hazard.is_some() => Some(ArmError::AlreadyArmed),
            Some(CellKind::Empty) => None,
            Some(_) => Some(ArmError::Occupied),
        };

        match (rejection, target) {
            (None, Some(cell)) => {
                let _ = self.grid.set_cell(cell, CellKind::Hazard);
                self.hazard = Some(Hazard {
                    cell,
                    timer: self.rules.fuse,
                    radius: self.rules.radius,
                });
                out_events.push(Event::HazardArmed {
                    cell,
                    fuse: self.rules.fuse,
                });
            }
            (Some(reason), _) => out_events.push(Event::HazardArmRejected { reason }),
            (None, None) => {}
        }
    }

    pub(crate) fn tick_hazard(&mut self, out_events: &mut Vec<Event>) {
        let Some(hazard) = self.hazard.as_mut() else {
            return;
        };
        hazard.timer = hazard.timer.saturating_sub(1);
        if hazard.timer > 0 {
            out_events.push(Event::HazardFuseBurned {
                cell: hazard.cell,
                remaining: hazard.timer,
            });
            return;
        }

        if let Some(hazard) = self.hazard.take() {
            self.detonate(hazard, out_events);
        }
    }

    /// Clears the hazard's cell, fires the four cardinal rays, then sweeps
    /// vertical ray pairs across every column within `radius` of the center.
    ///
    /// The sweep turns the plus-shaped blast into a full square. Columns
    /// right of the center are swept first, then columns to the left.
    fn detonate(&mut self, hazard: Hazard, out_events: &mut Vec<Event>) {
        let center = hazard.cell;
        let _ = self.grid.set_cell(center, CellKind::Empty);

        let mut affected = Vec::new();
        for direction in CARDINAL_RAYS {
            self.blast_ray(center, direction, hazard.radius, &mut affected, out_events);
        }

        let reach = i32::try_from(hazard.radius).unwrap_or(i32::MAX);
        let sweep = (1..=reach).chain((1..=reach).map(|offset| -offset));
        for offset in sweep {
            let Some(column_origin) = center.offset(offset, 0) else {
                continue;
            };
            for direction in [Direction::South, Direction::North] {
                self.blast_ray(column_origin, direction, hazard.radius, &mut affected, out_events);
            }
        }

        out_events.push(Event::HazardDetonated { center, affected });
    }

    /// Walks up to `radius` cells from `origin`, excluding `origin` itself.
    /// Armor or the grid edge stops the ray.
    fn blast_ray(
        &mut self,
        origin: CellCoord,
        direction: Direction,
        radius: u32,
        affected: &mut Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        let mut cell = origin;
        for _ in 0..radius {
            let Some(next) = cell.step(direction) else {
                break;
            };
            cell = next;

            match self.grid.cell_at(cell) {
                None | Some(CellKind::Armor) => break,
                Some(CellKind::DoorClosed) => {
                    let _ = self.grid.set_cell(cell, CellKind::DoorOpened);
                    out_events.push(Event::DoorOpened { cell });
                }
                Some(CellKind::Player) => {
                    if self.player.alive {
                        self.player.alive = false;
                        out_events.push(Event::PlayerKilled {
                            cell,
                            cause: DeathCause::Blast,
                        });
                    }
                }
                Some(CellKind::Adversary) => {
                    if let Some(adversary) = self.roster.remove_at(cell) {
                        out_events.push(Event::AdversaryEliminated {
                            adversary: adversary.id,
                            cell,
                        });
                    }
                    let _ = self.grid.set_cell(cell, CellKind::Empty);
                }
                Some(_) => {
                    let _ = self.grid.set_cell(cell, CellKind::Empty);
                }
            }
            affected.push(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_match_arena_constants() {
        let rules = HazardRules::default();
        assert_eq!(rules.fuse, 7);
        assert_eq!(rules.radius, 2);
    }
}
