#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn orchestration for a single hunt.
//!
//! A [`GameSession`] owns the cave, the quiver and the move counter. Player
//! actions are translated into world commands and pumped through the
//! movement and archery systems until the cave settles, after which the
//! Wumpus takes its wandering step.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wumpus_core::{
    ActionError, Command, DeathCause, Difficulty, Event, HazardHints, Outcome, RoomId,
    ARROW_HOPS,
};
use wumpus_system_archery::{validate_path, Archery};
use wumpus_system_hazards::HazardPlacement;
use wumpus_system_movement::{Encounter, Movement};
use wumpus_world::{self as world, query, World};

/// Arrows handed to the player when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowAllowance {
    /// A fixed number of arrows regardless of difficulty.
    Fixed(u8),
    /// Five arrows, or three from difficulty 3 upwards.
    ScaledByDifficulty,
}

impl ArrowAllowance {
    /// Number of arrows granted at the provided difficulty.
    #[must_use]
    pub const fn arrows_for(self, difficulty: Difficulty) -> u8 {
        match self {
            Self::Fixed(arrows) => arrows,
            Self::ScaledByDifficulty => {
                if difficulty.get() >= 3 {
                    3
                } else {
                    5
                }
            }
        }
    }
}

impl Default for ArrowAllowance {
    fn default() -> Self {
        Self::Fixed(2)
    }
}

/// Parameters used to build a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// Difficulty the cave is populated for.
    pub difficulty: Difficulty,
    /// Arrows the player starts with.
    pub arrows: ArrowAllowance,
    /// Seed for the session's random source. `None` draws one from entropy.
    pub seed: Option<u64>,
}

/// What the session expects next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The player may move or start a shot.
    AwaitingAction,
    /// An arrow is in flight and waits for its next room.
    Aiming {
        /// 1-based hop the next room is requested for.
        hop: u8,
    },
    /// The hunt is over.
    Ended(Outcome),
}

/// Consequences that follow every completed action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aftermath {
    /// Room the Wumpus wandered into, if it moved.
    pub wumpus_moved: Option<RoomId>,
    /// The wandering Wumpus walked into the player, who slipped away.
    pub escaped_wumpus: bool,
    /// Outcome once the turn has settled.
    pub outcome: Outcome,
}

/// Result of an accepted move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnReport {
    /// Room the player walked into.
    pub entered: RoomId,
    /// Room bats dropped the player in, if they were snatched.
    pub carried_to: Option<RoomId>,
    /// The player met the Wumpus on entry and slipped away.
    pub escaped_wumpus: bool,
    /// What happened after the move itself.
    pub aftermath: Aftermath,
}

/// Result of a single arrow hop or of a whole shot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotReport {
    /// The arrow flew on and awaits its next room.
    InFlight {
        /// Room the arrow occupies.
        room: RoomId,
        /// Hops the arrow may still travel.
        hops_left: u8,
    },
    /// The arrow was spent without hitting anything.
    Missed {
        /// What happened once the arrow fell.
        aftermath: Aftermath,
    },
    /// The arrow killed the Wumpus.
    Hit,
    /// The arrow came back and killed the player.
    SelfShot,
}

/// Authoritative state of one hunt.
#[derive(Debug)]
pub struct GameSession<R = ChaCha8Rng> {
    world: World,
    rng: R,
    difficulty: Difficulty,
    allowance: ArrowAllowance,
    placement: HazardPlacement,
    movement: Movement,
    archery: Archery,
    arrows: u8,
    moves: u32,
}

impl GameSession<ChaCha8Rng> {
    /// Builds a freshly populated cave seeded from the settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
        debug!("session seed {seed}");
        Self::with_rng(settings, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Builds a freshly populated cave drawing from the provided random source.
    pub fn with_rng(settings: Settings, mut rng: R) -> Self {
        let placement = HazardPlacement::new(settings.difficulty);
        let mut world = World::new();
        let mut commands = Vec::new();
        placement.populate(&world, &mut rng, &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        Self::from_world(world, settings, rng)
    }

    /// Wraps an already populated cave.
    pub fn from_world(world: World, settings: Settings, rng: R) -> Self {
        let session = Self {
            world,
            rng,
            difficulty: settings.difficulty,
            allowance: settings.arrows,
            placement: HazardPlacement::new(settings.difficulty),
            movement: Movement::new(settings.difficulty),
            archery: Archery::new(),
            arrows: settings.arrows.arrows_for(settings.difficulty),
            moves: 0,
        };
        info!(
            "hunt started at difficulty {} in room {} with {} arrows",
            session.difficulty,
            session.current_room(),
            session.arrows
        );
        session
    }

    /// Walks the player through a tunnel into `to`.
    ///
    /// Rejected moves leave the session untouched and do not count as a move.
    pub fn submit_move(&mut self, to: RoomId) -> Result<TurnReport, ActionError> {
        self.ensure_awaiting_action()?;

        let events = self.pump(Command::MovePlayer { to });
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::MoveRejected { reason, .. } => Some(*reason),
            _ => None,
        }) {
            return Err(ActionError::InvalidMove(reason));
        }
        self.moves += 1;

        let mut carried_to = None;
        let mut escaped_wumpus = false;
        for encounter in self.movement.take_encounters() {
            match encounter {
                Encounter::BatsSnatched { to, .. } => carried_to = Some(to),
                Encounter::WumpusEscaped { .. } => escaped_wumpus = true,
                Encounter::WumpusCaught { .. } | Encounter::FellIntoPit { .. } => {}
            }
        }

        Ok(TurnReport {
            entered: to,
            carried_to,
            escaped_wumpus,
            aftermath: self.finish_turn(),
        })
    }

    /// Nocks an arrow, consuming it and counting the shot as a move.
    pub fn begin_shot(&mut self) -> Result<(), ActionError> {
        self.ensure_awaiting_action()?;
        if self.arrows == 0 {
            return Err(ActionError::NoArrows);
        }

        self.arrows -= 1;
        self.moves += 1;
        let _ = self.pump(Command::NockArrow);
        debug!("arrow nocked; {} left in the quiver", self.arrows);
        Ok(())
    }

    /// Sends the arrow in flight through a tunnel into `to`.
    ///
    /// A hop into a room that does not connect to the arrow's room is
    /// rejected and may be retried without losing the hop.
    pub fn aim(&mut self, to: RoomId) -> Result<ShotReport, ActionError> {
        let hop = match self.phase() {
            Phase::Aiming { hop } => hop,
            Phase::AwaitingAction => return Err(ActionError::NotAiming),
            Phase::Ended(_) => return Err(ActionError::SessionEnded),
        };

        let events = self.pump(Command::FlyArrow { to });
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::ArrowHopRejected { reason, .. } => Some(*reason),
            _ => None,
        }) {
            return Err(ActionError::InvalidShotHop { hop, reason });
        }

        match query::outcome(&self.world) {
            Outcome::WumpusDead => {
                self.log_conclusion();
                return Ok(ShotReport::Hit);
            }
            Outcome::PlayerDead {
                cause: DeathCause::SelfShot,
            } => {
                self.log_conclusion();
                return Ok(ShotReport::SelfShot);
            }
            Outcome::PlayerDead { .. } | Outcome::InProgress => {}
        }

        match query::arrow(&self.world) {
            Some(arrow) => Ok(ShotReport::InFlight {
                room: arrow.room(),
                hops_left: arrow.hops_left(),
            }),
            None => Ok(ShotReport::Missed {
                aftermath: self.finish_turn(),
            }),
        }
    }

    /// Fires an arrow along a whole path.
    ///
    /// The path is checked against the tunnels before the arrow is nocked, so
    /// an invalid path neither consumes an arrow nor counts as a move.
    pub fn submit_shot_path(
        &mut self,
        path: [RoomId; ARROW_HOPS as usize],
    ) -> Result<ShotReport, ActionError> {
        self.ensure_awaiting_action()?;
        if self.arrows == 0 {
            return Err(ActionError::NoArrows);
        }
        validate_path(self.current_room(), &path)?;

        self.begin_shot()?;
        let mut report = ShotReport::Missed {
            aftermath: Aftermath::default(),
        };
        for to in path {
            report = self.aim(to)?;
            if !matches!(report, ShotReport::InFlight { .. }) {
                break;
            }
        }
        Ok(report)
    }

    /// Re-scatters bats and pits for a new difficulty.
    ///
    /// Only accepted before the first action. The Wumpus keeps its room and
    /// the player only moves when a hazard lands underneath them.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> Result<(), ActionError> {
        if self.moves > 0 {
            return Err(ActionError::DifficultyLocked);
        }
        if query::outcome(&self.world).is_terminal() {
            return Err(ActionError::SessionEnded);
        }

        self.difficulty = difficulty;
        self.placement = HazardPlacement::new(difficulty);
        self.movement = Movement::new(difficulty);
        self.arrows = self.allowance.arrows_for(difficulty);

        let mut commands = Vec::new();
        self.placement
            .reshuffle(&self.world, &mut self.rng, &mut commands);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        info!("difficulty changed to {difficulty}");
        Ok(())
    }

    /// Room the player stands in.
    #[must_use]
    pub fn current_room(&self) -> RoomId {
        query::player_room(&self.world)
    }

    /// Rooms reachable from the player's room.
    #[must_use]
    pub fn neighbors(&self) -> &'static [RoomId] {
        query::exits(&self.world)
    }

    /// Hazards the player can sense next door.
    #[must_use]
    pub fn hazard_hints(&self) -> HazardHints {
        query::hazard_hints(&self.world)
    }

    /// Outcome of the hunt so far.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        query::outcome(&self.world)
    }

    /// Accepted moves and shots so far.
    #[must_use]
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Arrows left in the quiver.
    #[must_use]
    pub fn arrows(&self) -> u8 {
        self.arrows
    }

    /// Difficulty the cave was populated for.
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// What the session expects next.
    #[must_use]
    pub fn phase(&self) -> Phase {
        let outcome = query::outcome(&self.world);
        if outcome.is_terminal() {
            return Phase::Ended(outcome);
        }
        match query::arrow(&self.world) {
            Some(arrow) => Phase::Aiming {
                hop: ARROW_HOPS - arrow.hops_left() + 1,
            },
            None => Phase::AwaitingAction,
        }
    }

    /// Room of the arrow in flight, if any.
    #[must_use]
    pub fn arrow_room(&self) -> Option<RoomId> {
        query::arrow(&self.world).map(|arrow| arrow.room())
    }

    /// Full view of the cave, meant for the end-of-game reveal.
    #[must_use]
    pub fn reveal(&self) -> query::RoomView {
        query::room_view(&self.world)
    }

    fn ensure_awaiting_action(&self) -> Result<(), ActionError> {
        match self.phase() {
            Phase::AwaitingAction => Ok(()),
            Phase::Aiming { .. } => Err(ActionError::AlreadyAiming),
            Phase::Ended(_) => Err(ActionError::SessionEnded),
        }
    }

    /// Lets the Wumpus wander and settles an empty quiver.
    fn finish_turn(&mut self) -> Aftermath {
        let mut aftermath = Aftermath::default();

        if !query::outcome(&self.world).is_terminal() {
            let mut commands = Vec::new();
            self.movement.wander(&self.world, &mut self.rng, &mut commands);
            for command in commands {
                for event in self.pump(command) {
                    if let Event::WumpusMoved { to, .. } = event {
                        aftermath.wumpus_moved = Some(to);
                    }
                }
            }
            aftermath.escaped_wumpus = self
                .movement
                .take_encounters()
                .iter()
                .any(|encounter| matches!(encounter, Encounter::WumpusEscaped { .. }));
        }

        if self.arrows == 0 && !query::outcome(&self.world).is_terminal() {
            let _ = self.pump(Command::Conclude {
                outcome: Outcome::PlayerDead {
                    cause: DeathCause::OutOfArrows,
                },
            });
        }

        aftermath.outcome = query::outcome(&self.world);
        if aftermath.outcome.is_terminal() {
            self.log_conclusion();
        }
        aftermath
    }

    /// Applies the command and feeds the systems until no command is pending.
    fn pump(&mut self, command: Command) -> Vec<Event> {
        let mut pending = vec![command];
        let mut history = Vec::new();

        while let Some(next) = pending.pop() {
            let mut events = Vec::new();
            world::apply(&mut self.world, next, &mut events);

            let mut commands = Vec::new();
            self.movement
                .handle(&events, &self.world, &mut self.rng, &mut commands);
            self.archery.handle(&events, &self.world, &mut commands);

            history.extend(events);
            pending.extend(commands.into_iter().rev());
        }

        history
    }

    fn log_conclusion(&self) {
        info!(
            "hunt ended after {} moves: {:?}",
            self.moves,
            query::outcome(&self.world)
        );
    }
}
