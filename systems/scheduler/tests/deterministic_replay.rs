use std::time::Duration;

use blastgrid_core::{
    AdversaryId, AdversarySeed, CellCoord, CellKind, Direction, Event, InputCommand, LevelLayout,
    PatrolPath,
};
use blastgrid_system_scheduler::{Outcome, Session, SessionConfig};
use blastgrid_world::{query, HazardRules, World};

const MICRO_TICKS: u32 = 3;

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(scripted_inputs());
    let second = replay(scripted_inputs());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.outcome, None);
    assert_eq!(first.player, Some(CellCoord::new(3, 6)));
    assert_eq!(first.adversaries, 0);
    assert!(first.events.contains(&Event::AdversaryEliminated {
        adversary: AdversaryId::new(0),
        cell: CellCoord::new(5, 4),
    }));
    assert!(!first.grid.contains(&CellKind::Hazard));
}

#[test]
fn replay_without_input_lets_the_patrol_oscillate() {
    let outcome = replay(vec![InputCommand::Idle; 12]);

    assert_eq!(outcome.adversaries, 1);
    let advances = outcome
        .events
        .iter()
        .filter_map(|event| match event {
            Event::AdversaryAdvanced { to, .. } => Some(*to),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        advances,
        vec![
            CellCoord::new(5, 4),
            CellCoord::new(5, 3),
            CellCoord::new(5, 4),
            CellCoord::new(5, 3),
        ]
    );
}

fn replay(inputs: Vec<InputCommand>) -> ReplayOutcome {
    let mut session = Session::new(world(), config());
    session.begin();

    let mut events = Vec::new();
    let mut outcome = None;
    'ticks: for chunk in inputs.chunks(MICRO_TICKS as usize) {
        for &input in chunk {
            outcome = session.micro_tick(input);
            events.extend_from_slice(session.events());
            if outcome.is_some() {
                break 'ticks;
            }
        }
        outcome = session.macro_tick();
        events.extend_from_slice(session.events());
        if outcome.is_some() {
            break;
        }
    }

    let world = session.world();
    ReplayOutcome {
        outcome,
        player: query::player_alive(world).then(|| query::player_cell(world)),
        adversaries: query::adversary_count(world),
        grid: query::grid_view(world)
            .rows()
            .flat_map(|(_, cells)| cells.iter().copied())
            .collect(),
        events,
    }
}

fn world() -> World {
    let columns = 8;
    let rows = 8;
    let mut cells = Vec::new();
    for row in 1..=rows {
        for column in 0..columns {
            let border = row == 1 || row == rows || column == 0 || column == columns - 1;
            cells.push(if border { CellKind::Armor } else { CellKind::Empty });
        }
    }
    let adversaries = vec![AdversarySeed {
        cell: CellCoord::new(5, 3),
        moving: true,
        path: PatrolPath::from_directions(&[Direction::South, Direction::North]),
    }];
    let layout = LevelLayout::new(columns, rows, cells, CellCoord::new(3, 4), adversaries)
        .expect("valid layout");
    World::with_rules(layout, HazardRules { fuse: 3, radius: 2 })
}

fn config() -> SessionConfig {
    SessionConfig {
        micro_ticks_per_macro_tick: MICRO_TICKS,
        micro_tick_pause: Duration::ZERO,
        intro_pause: Duration::ZERO,
        finale_pause: Duration::ZERO,
    }
}

fn scripted_inputs() -> Vec<InputCommand> {
    let mut inputs = vec![
        InputCommand::PlaceHazard,
        InputCommand::Steer(Direction::South),
        InputCommand::Steer(Direction::South),
    ];
    inputs.extend([InputCommand::Idle; 9]);
    inputs
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplayOutcome {
    outcome: Option<Outcome>,
    player: Option<CellCoord>,
    adversaries: usize,
    grid: Vec<CellKind>,
    events: Vec<Event>,
}
