#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wumpus engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative cave, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query the cave read-only, and
//! respond exclusively with new command batches.

use std::{fmt, ops::RangeInclusive};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hunt the Wumpus.";

/// Number of rooms carved into the cave.
pub const ROOM_COUNT: usize = 20;

/// Number of tunnels leaving every room.
pub const NEIGHBOR_COUNT: usize = 3;

/// Number of hops an arrow travels before it is spent.
pub const ARROW_HOPS: u8 = 3;

/// Commands that express all permissible cave mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Moves the Wumpus into the provided room unconditionally.
    PlaceWumpus {
        /// Room that becomes the Wumpus lair.
        room: RoomId,
    },
    /// Tags a room with a hazard unless it already carries one.
    PlaceHazard {
        /// Room receiving the hazard.
        room: RoomId,
        /// Hazard to place.
        kind: HazardKind,
    },
    /// Resets every bat and pit tag back to empty. The Wumpus is untouched.
    ClearHazards,
    /// Drops the player into a room without running any legality checks.
    PlacePlayer {
        /// Room the player starts in.
        room: RoomId,
    },
    /// Requests that the player walk through a tunnel into the provided room.
    MovePlayer {
        /// Destination chosen by the player.
        to: RoomId,
    },
    /// Carries the player to a room after a bat encounter.
    CarryPlayer {
        /// Room the bats drop the player in.
        to: RoomId,
    },
    /// Relocates the Wumpus after it wandered.
    MoveWumpus {
        /// Room the Wumpus settles in.
        to: RoomId,
    },
    /// Readies a fresh arrow in the player's room.
    NockArrow,
    /// Advances the arrow in flight by a single hop.
    FlyArrow {
        /// Room the arrow should fly into.
        to: RoomId,
    },
    /// Records the terminal outcome of the session.
    Conclude {
        /// Outcome that ends the session.
        outcome: Outcome,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the Wumpus settled in a room during placement.
    WumpusPlaced {
        /// Room holding the Wumpus.
        room: RoomId,
    },
    /// Confirms that a hazard tag was written to a room.
    HazardPlaced {
        /// Room that received the hazard.
        room: RoomId,
        /// Hazard that was placed.
        kind: HazardKind,
    },
    /// Announces that every bat and pit tag was cleared.
    HazardsCleared,
    /// Confirms that the player was dropped into a room.
    PlayerPlaced {
        /// Room the player occupies.
        room: RoomId,
    },
    /// Confirms that the player walked from one room into a neighbor.
    PlayerEntered {
        /// Room the player left.
        from: RoomId,
        /// Room the player entered.
        to: RoomId,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Destination provided in the request.
        to: RoomId,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that bats carried the player away.
    PlayerCarried {
        /// Room the bats snatched the player from.
        from: RoomId,
        /// Room the bats dropped the player in.
        to: RoomId,
    },
    /// Confirms that the Wumpus wandered into a new room.
    WumpusMoved {
        /// Room the Wumpus left.
        from: RoomId,
        /// Room the Wumpus entered.
        to: RoomId,
    },
    /// Confirms that an arrow was readied in the player's room.
    ArrowNocked {
        /// Room the arrow leaves from.
        room: RoomId,
    },
    /// Confirms that the arrow in flight advanced by one hop.
    ArrowAdvanced {
        /// Room the arrow left.
        from: RoomId,
        /// Room the arrow entered.
        to: RoomId,
        /// Hops the arrow may still travel after this one.
        hops_left: u8,
    },
    /// Reports that an arrow hop was rejected. No hop is consumed.
    ArrowHopRejected {
        /// Room the arrow currently occupies.
        from: RoomId,
        /// Room requested for the hop.
        to: RoomId,
        /// Specific reason the hop failed.
        reason: ShotError,
    },
    /// Announces that the session reached a terminal outcome.
    SessionConcluded {
        /// Outcome recorded for the session.
        outcome: Outcome,
    },
}

/// Stable identifier of a room, numbered from 1 to [`ROOM_COUNT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u8);

impl RoomId {
    /// Creates a room identifier from its 1-based number.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Creates a room identifier if the number names an existing room.
    #[must_use]
    pub fn checked(value: u8) -> Option<Self> {
        (1..=ROOM_COUNT as u8).contains(&value).then_some(Self(value))
    }

    /// Creates a room identifier from its 0-based storage slot.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        if index < ROOM_COUNT {
            u8::try_from(index + 1).ok().map(Self)
        } else {
            None
        }
    }

    /// Retrieves the 1-based room number.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Retrieves the 0-based storage slot of the room.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0.saturating_sub(1) as usize
    }

    /// Iterates every room of the cave in ascending order.
    pub fn all() -> impl Iterator<Item = RoomId> {
        (1..=ROOM_COUNT as u8).map(Self)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Difficulty knob ranging from 1 (gentle) to 5 (merciless).
///
/// Difficulty governs how densely bats and pits are placed, whether the
/// Wumpus wanders after every player action, and whether the player may
/// escape a Wumpus encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    /// Lowest accepted difficulty.
    pub const MIN: Difficulty = Difficulty(1);
    /// Highest accepted difficulty.
    pub const MAX: Difficulty = Difficulty(5);

    /// Creates a difficulty, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, DifficultyError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DifficultyError::OutOfRange(value))
        }
    }

    /// Retrieves the numeric difficulty.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Chance that a single hazard draw actually places the hazard.
    #[must_use]
    pub const fn placement_chance(&self) -> PlacementChance {
        match self.0 {
            5 => PlacementChance::Always,
            4 => PlacementChance::Percent(85),
            3 => PlacementChance::Percent(75),
            _ => PlacementChance::Percent(40),
        }
    }

    /// Reports whether the Wumpus wanders after every player action.
    #[must_use]
    pub const fn wumpus_wanders(&self) -> bool {
        self.0 > 3
    }

    /// Percent chance of slipping away from the Wumpus, if escape is possible at all.
    #[must_use]
    pub const fn escape_chance(&self) -> Option<u32> {
        if self.0 <= 3 {
            Some(35)
        } else {
            None
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DifficultyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Probability that a hazard draw succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementChance {
    /// Every draw places the hazard.
    Always,
    /// A draw places the hazard when a percentage roll in `0..=100` falls below the value.
    Percent(u32),
}

impl PlacementChance {
    /// Resolves a percentage roll drawn from `0..=100`.
    #[must_use]
    pub const fn succeeds(self, roll: u32) -> bool {
        match self {
            Self::Always => true,
            Self::Percent(threshold) => roll < threshold,
        }
    }
}

/// Hazard tag carried by a room. Mutually exclusive per room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hazard {
    /// Nothing dangerous lives here.
    #[default]
    Empty,
    /// A colony of bats that carries visitors elsewhere.
    Bats,
    /// A bottomless pit.
    Pit,
}

/// Hazards that can be scattered across the cave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Bat colonies.
    Bats,
    /// Bottomless pits.
    Pit,
}

impl HazardKind {
    /// Range from which the number of placement draws is sampled.
    #[must_use]
    pub const fn occurrences(self) -> RangeInclusive<u32> {
        match self {
            Self::Bats => 3..=5,
            Self::Pit => 3..=6,
        }
    }

    /// Room tag written when the hazard is placed.
    #[must_use]
    pub const fn tag(self) -> Hazard {
        match self {
            Self::Bats => Hazard::Bats,
            Self::Pit => Hazard::Pit,
        }
    }
}

/// Reason the player died.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// The Wumpus caught the player.
    Wumpus,
    /// The player fell into a bottomless pit.
    Pit,
    /// The player's own arrow came back around.
    SelfShot,
    /// The quiver ran empty before the Wumpus fell.
    OutOfArrows,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Wumpus => "the Wumpus got you",
            Self::Pit => "you fell into a bottomless pit",
            Self::SelfShot => "you shot yourself with your own arrow",
            Self::OutOfArrows => "you ran out of arrows",
        };
        f.write_str(text)
    }
}

/// State of a session as observed by adapters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The hunt continues.
    #[default]
    InProgress,
    /// The player lost.
    PlayerDead {
        /// What killed the player.
        cause: DeathCause,
    },
    /// The player killed the Wumpus.
    WumpusDead,
}

impl Outcome {
    /// Reports whether the outcome ends the session.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Hazards perceptible from the player's room through its tunnels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HazardHints {
    /// The Wumpus lurks in a neighboring room.
    pub wumpus: bool,
    /// Bats roost in a neighboring room.
    pub bats: bool,
    /// A neighboring room holds a pit.
    pub pit: bool,
}

impl HazardHints {
    /// Reports whether nothing can be sensed.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        !(self.wumpus || self.bats || self.pit)
    }
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum MoveError {
    /// The destination is the room the player already stands in.
    #[error("you are already in room {room}")]
    SameRoom {
        /// Room the player occupies.
        room: RoomId,
    },
    /// No tunnel connects the player's room with the destination.
    #[error("no tunnel leads from room {from} to room {to}")]
    NotAdjacent {
        /// Room the player occupies.
        from: RoomId,
        /// Requested destination.
        to: RoomId,
    },
}

/// Reasons an arrow hop may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
pub enum ShotError {
    /// The requested room does not connect to the arrow's current room.
    #[error("arrows cannot pass through walls: room {to} does not connect to room {from}")]
    NotAdjacent {
        /// Room the arrow occupies.
        from: RoomId,
        /// Requested room.
        to: RoomId,
    },
    /// No arrow is in flight.
    #[error("no arrow is in flight")]
    NoArrow,
}

/// Recoverable errors reported to adapters. None of them changes session state.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    /// The move destination is not a neighbor of the player's room.
    #[error(transparent)]
    InvalidMove(#[from] MoveError),
    /// An arrow hop targets a room not adjacent to the arrow's room.
    #[error("hop {hop}: {reason}")]
    InvalidShotHop {
        /// 1-based hop index that failed.
        hop: u8,
        /// Specific reason the hop failed.
        reason: ShotError,
    },
    /// The provided number does not name a room.
    #[error("room {0} does not exist")]
    UnknownRoom(u8),
    /// The quiver is empty.
    #[error("no arrows left")]
    NoArrows,
    /// A hop was submitted while no arrow is being aimed.
    #[error("no arrow is being aimed")]
    NotAiming,
    /// Another action was submitted while an arrow is still in flight.
    #[error("an arrow is in flight; finish the shot first")]
    AlreadyAiming,
    /// The session already reached a terminal outcome.
    #[error("the session has already ended")]
    SessionEnded,
    /// Difficulty changes are only accepted before the first action.
    #[error("difficulty can only change before the hunt begins")]
    DifficultyLocked,
}

/// Errors raised when constructing a [`Difficulty`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DifficultyError {
    /// The value lies outside `1..=5`.
    #[error("difficulty {0} is outside the accepted range 1..=5")]
    OutOfRange(u8),
}
