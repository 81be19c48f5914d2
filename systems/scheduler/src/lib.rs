#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Two-rate tick scheduler driving a Blastgrid session.
//!
//! Player input is sampled every micro-tick. Every
//! [`MICRO_TICKS_PER_MACRO_TICK`] micro-ticks the adversaries are re-decided
//! and the hazard fuse burns. The [`Session`] owns the world; the [`run`]
//! driver pairs it with a [`Frontend`] that supplies input, drawing and pacing.

use std::time::Duration;

use anyhow::Result;
use blastgrid_core::{Command, Event, GridView, InputCommand};
use blastgrid_system_pursuit::Pursuit;
use blastgrid_world::{self as world, query, World};
use tracing::{debug, info};

/// Number of micro-ticks that make up one macro-tick.
pub const MICRO_TICKS_PER_MACRO_TICK: u32 = 30;

/// Pause inserted after every rendered micro-tick.
///
/// Fixed pacing value: thirty 50 ms micro-ticks make a 1.5 s macro-tick.
pub const MICRO_TICK_PAUSE: Duration = Duration::from_millis(50);

/// Pause after the intro screen and before the final outcome is reported.
pub const SCREEN_PAUSE: Duration = Duration::from_secs(2);

/// Pacing parameters of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Micro-ticks per macro-tick.
    pub micro_ticks_per_macro_tick: u32,
    /// Pause after each rendered micro-tick.
    pub micro_tick_pause: Duration,
    /// Pause after the intro screen.
    pub intro_pause: Duration,
    /// Pause after the final frame of a lost session.
    pub finale_pause: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            micro_ticks_per_macro_tick: MICRO_TICKS_PER_MACRO_TICK,
            micro_tick_pause: MICRO_TICK_PAUSE,
            intro_pause: SCREEN_PAUSE,
            finale_pause: SCREEN_PAUSE,
        }
    }
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The intro screen is showing; no ticks run yet.
    Intro,
    /// Ticks are running.
    Playing,
    /// The player stepped into an opened door.
    Won,
    /// The player was caught or caught in a blast.
    Lost,
    /// The player asked to leave.
    Quit,
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The player reached an opened door.
    Won,
    /// The player died.
    Lost,
    /// The player quit before the game ended.
    Quit,
}

impl Outcome {
    const fn state(self) -> SessionState {
        match self {
            Self::Won => SessionState::Won,
            Self::Lost => SessionState::Lost,
            Self::Quit => SessionState::Quit,
        }
    }
}

/// Presentation and input seam used by [`run`].
pub trait Frontend {
    /// Displays the intro screen.
    fn show_intro(&mut self) -> Result<()>;

    /// Samples player input without blocking.
    fn poll_input(&mut self) -> Result<InputCommand>;

    /// Draws the current arena.
    fn present(&mut self, grid: GridView<'_>) -> Result<()>;

    /// Waits for the provided duration.
    fn pause(&mut self, duration: Duration) -> Result<()>;
}

/// Owns the world and advances it tick by tick.
#[derive(Debug)]
pub struct Session {
    world: World,
    pursuit: Pursuit,
    config: SessionConfig,
    state: SessionState,
    macro_ticks: u64,
    events: Vec<Event>,
}

impl Session {
    /// Creates a session in the [`SessionState::Intro`] state.
    #[must_use]
    pub fn new(world: World, config: SessionConfig) -> Self {
        Self {
            world,
            pursuit: Pursuit::default(),
            config,
            state: SessionState::Intro,
            macro_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Leaves the intro and starts accepting ticks.
    pub fn begin(&mut self) {
        if self.state == SessionState::Intro {
            self.state = SessionState::Playing;
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Pacing parameters in use.
    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of completed macro-ticks.
    #[must_use]
    pub fn macro_ticks(&self) -> u64 {
        self.macro_ticks
    }

    /// Events produced by the most recent tick.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Processes one micro-tick of player input.
    ///
    /// Returns the outcome when the input ends the session: [`Outcome::Quit`]
    /// on a quit request, [`Outcome::Won`] when the player reaches an opened
    /// door.
    pub fn micro_tick(&mut self, input: InputCommand) -> Option<Outcome> {
        self.events.clear();
        if self.state != SessionState::Playing {
            return None;
        }

        let intent = match input {
            InputCommand::Idle => return None,
            InputCommand::Quit => return Some(self.finish(Outcome::Quit)),
            InputCommand::Steer(direction) => Command::SteerPlayer { direction },
            InputCommand::PlaceHazard => Command::ArmHazard,
        };
        self.apply(intent);
        self.apply(Command::ResolvePlayerMotion);

        let won = self
            .events
            .iter()
            .any(|event| matches!(event, Event::ExitReached { .. }));
        won.then(|| self.finish(Outcome::Won))
    }

    /// Runs the adversary decisions and the hazard fuse for one macro-tick.
    ///
    /// Returns [`Outcome::Lost`] when the player dies during the tick. Once
    /// the player is dead nothing else is updated.
    pub fn macro_tick(&mut self) -> Option<Outcome> {
        self.events.clear();
        if self.state != SessionState::Playing {
            return None;
        }
        self.macro_ticks += 1;

        if query::adversary_count(&self.world) > 0 {
            let mut commands = Vec::new();
            self.pursuit.handle(
                &query::adversary_view(&self.world),
                query::grid_view(&self.world),
                &mut commands,
            );
            for command in commands {
                if !query::player_alive(&self.world) {
                    break;
                }
                self.apply(command);
            }
        }

        if query::player_alive(&self.world) && query::hazard(&self.world).is_some() {
            self.apply(Command::TickHazard);
        }

        if query::player_alive(&self.world) {
            None
        } else {
            Some(self.finish(Outcome::Lost))
        }
    }

    fn apply(&mut self, command: Command) {
        let start = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);
        for event in &self.events[start..] {
            trace_event(event);
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.state = outcome.state();
        info!(?outcome, macro_ticks = self.macro_ticks, "session finished");
        outcome
    }
}

fn trace_event(event: &Event) {
    match event {
        Event::PlayerKilled { cell, cause } => info!(%cell, ?cause, "player killed"),
        Event::ExitReached { door } => info!(%door, "exit reached"),
        Event::HazardDetonated { center, affected } => {
            info!(%center, cells = affected.len(), "hazard detonated");
        }
        Event::AdversaryEliminated { adversary, cell } => {
            info!(adversary = adversary.get(), %cell, "adversary eliminated");
        }
        other => debug!(event = ?other, "world event"),
    }
}

/// Drives `session` to completion against `frontend`.
///
/// Shows the intro, then alternates micro-ticks and macro-ticks until an
/// outcome is reached. A win or quit returns immediately; a loss presents the
/// final frame and pauses first.
pub fn run<F>(session: &mut Session, frontend: &mut F) -> Result<Outcome>
where
    F: Frontend + ?Sized,
{
    let config = session.config();
    info!(
        micro_ticks = config.micro_ticks_per_macro_tick,
        adversaries = query::adversary_count(session.world()),
        "session starting"
    );

    frontend.show_intro()?;
    frontend.pause(config.intro_pause)?;
    session.begin();
    frontend.present(query::grid_view(session.world()))?;

    loop {
        for _ in 0..config.micro_ticks_per_macro_tick {
            let input = frontend.poll_input()?;
            if let Some(outcome) = session.micro_tick(input) {
                return Ok(outcome);
            }
            frontend.present(query::grid_view(session.world()))?;
            frontend.pause(config.micro_tick_pause)?;
        }

        if let Some(outcome) = session.macro_tick() {
            frontend.present(query::grid_view(session.world()))?;
            frontend.pause(config.finale_pause)?;
            return Ok(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastgrid_core::{CellCoord, CellKind, Direction, LevelLayout};

    fn session() -> Session {
        let layout = LevelLayout::new(
            5,
            5,
            vec![CellKind::Empty; 25],
            CellCoord::new(2, 3),
            Vec::new(),
        )
        .expect("valid layout");
        Session::new(World::new(layout), SessionConfig::default())
    }

    #[test]
    fn ticks_are_ignored_during_intro() {
        let mut session = session();

        assert_eq!(
            session.micro_tick(InputCommand::Steer(Direction::East)),
            None
        );
        assert_eq!(session.macro_tick(), None);
        assert_eq!(session.macro_ticks(), 0);
        assert_eq!(query::player_cell(session.world()), CellCoord::new(2, 3));
    }

    #[test]
    fn idle_input_produces_no_events() {
        let mut session = session();
        session.begin();

        assert_eq!(session.micro_tick(InputCommand::Idle), None);
        assert!(session.events().is_empty());
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[test]
    fn quit_ends_the_session() {
        let mut session = session();
        session.begin();

        assert_eq!(session.micro_tick(InputCommand::Quit), Some(Outcome::Quit));
        assert_eq!(session.state(), SessionState::Quit);
        assert_eq!(session.micro_tick(InputCommand::Quit), None);
    }

    #[test]
    fn default_config_uses_built_in_pacing() {
        let config = SessionConfig::default();

        assert_eq!(config.micro_ticks_per_macro_tick, 30);
        assert_eq!(config.micro_tick_pause, Duration::from_millis(50));
        assert_eq!(config.intro_pause, Duration::from_secs(2));
    }
}
