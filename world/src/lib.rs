#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative cave state management for Hunt the Wumpus.

pub mod topology;

use log::debug;
use wumpus_core::{
    Command, Event, Hazard, MoveError, Outcome, RoomId, ShotError, ARROW_HOPS, ROOM_COUNT,
};

/// Represents the authoritative cave of a single session.
///
/// The cave tracks one hazard tag per room, the single room holding the
/// Wumpus, the player's room, the arrow in flight and the recorded outcome.
/// Every mutation flows through [`apply`].
#[derive(Clone, Debug)]
pub struct World {
    hazards: [Hazard; ROOM_COUNT],
    wumpus: RoomId,
    player: RoomId,
    arrow: Option<Arrow>,
    outcome: Outcome,
}

impl World {
    /// Creates an unpopulated cave with the Wumpus and the player parked in room 1.
    ///
    /// Callers populate the cave through placement commands before play starts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hazards: [Hazard::Empty; ROOM_COUNT],
            wumpus: RoomId::new(1),
            player: RoomId::new(1),
            arrow: None,
            outcome: Outcome::InProgress,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Arrow currently travelling through the tunnels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arrow {
    room: RoomId,
    hops_left: u8,
}

impl Arrow {
    /// Room the arrow currently occupies.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Hops the arrow may still travel.
    #[must_use]
    pub const fn hops_left(&self) -> u8 {
        self.hops_left
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once a terminal outcome is recorded every command except
/// [`Command::Conclude`] is ignored, and `Conclude` itself only records the
/// first terminal outcome it sees.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.outcome.is_terminal() && !matches!(command, Command::Conclude { .. }) {
        debug!("ignoring {command:?}: session already ended");
        return;
    }

    match command {
        Command::PlaceWumpus { room } => {
            if topology::contains(room) {
                world.wumpus = room;
                out_events.push(Event::WumpusPlaced { room });
            }
        }
        Command::PlaceHazard { room, kind } => {
            if !topology::contains(room) {
                return;
            }
            if let Some(slot) = world.hazards.get_mut(room.index()) {
                if *slot == Hazard::Empty {
                    *slot = kind.tag();
                    out_events.push(Event::HazardPlaced { room, kind });
                }
            }
        }
        Command::ClearHazards => {
            world.hazards.fill(Hazard::Empty);
            out_events.push(Event::HazardsCleared);
        }
        Command::PlacePlayer { room } => {
            if topology::contains(room) {
                world.player = room;
                out_events.push(Event::PlayerPlaced { room });
            }
        }
        Command::MovePlayer { to } => match validate_move(world.player, to) {
            Ok(()) => {
                let from = world.player;
                world.player = to;
                out_events.push(Event::PlayerEntered { from, to });
            }
            Err(reason) => {
                debug!("move to room {to} rejected: {reason}");
                out_events.push(Event::MoveRejected { to, reason });
            }
        },
        Command::CarryPlayer { to } => {
            if topology::contains(to) {
                let from = world.player;
                world.player = to;
                out_events.push(Event::PlayerCarried { from, to });
            }
        }
        Command::MoveWumpus { to } => {
            if topology::contains(to) {
                let from = world.wumpus;
                world.wumpus = to;
                out_events.push(Event::WumpusMoved { from, to });
            }
        }
        Command::NockArrow => {
            let room = world.player;
            world.arrow = Some(Arrow {
                room,
                hops_left: ARROW_HOPS,
            });
            out_events.push(Event::ArrowNocked { room });
        }
        Command::FlyArrow { to } => {
            let Some(arrow) = world.arrow else {
                out_events.push(Event::ArrowHopRejected {
                    from: world.player,
                    to,
                    reason: ShotError::NoArrow,
                });
                return;
            };

            if !topology::are_adjacent(arrow.room, to) {
                debug!("arrow hop {} -> {to} rejected", arrow.room);
                out_events.push(Event::ArrowHopRejected {
                    from: arrow.room,
                    to,
                    reason: ShotError::NotAdjacent {
                        from: arrow.room,
                        to,
                    },
                });
                return;
            }

            let hops_left = arrow.hops_left.saturating_sub(1);
            world.arrow = (hops_left > 0).then_some(Arrow {
                room: to,
                hops_left,
            });
            out_events.push(Event::ArrowAdvanced {
                from: arrow.room,
                to,
                hops_left,
            });
        }
        Command::Conclude { outcome } => {
            if world.outcome.is_terminal() || !outcome.is_terminal() {
                return;
            }
            world.outcome = outcome;
            world.arrow = None;
            out_events.push(Event::SessionConcluded { outcome });
        }
    }
}

fn validate_move(from: RoomId, to: RoomId) -> Result<(), MoveError> {
    if from == to {
        return Err(MoveError::SameRoom { room: from });
    }
    if !topology::are_adjacent(from, to) {
        return Err(MoveError::NotAdjacent { from, to });
    }
    Ok(())
}

/// Query functions that provide read-only access to the cave.
pub mod query {
    use wumpus_core::{Hazard, HazardHints, Outcome, RoomId};

    use super::{topology, Arrow, World};

    /// Room currently occupied by the player.
    #[must_use]
    pub fn player_room(world: &World) -> RoomId {
        world.player
    }

    /// Room currently occupied by the Wumpus.
    #[must_use]
    pub fn wumpus_room(world: &World) -> RoomId {
        world.wumpus
    }

    /// Hazard tag of the provided room. Unknown rooms report [`Hazard::Empty`].
    #[must_use]
    pub fn hazard(world: &World, room: RoomId) -> Hazard {
        if !topology::contains(room) {
            return Hazard::Empty;
        }
        world
            .hazards
            .get(room.index())
            .copied()
            .unwrap_or_default()
    }

    /// Rooms reachable from the player's room.
    #[must_use]
    pub fn exits(world: &World) -> &'static [RoomId] {
        topology::neighbors(world.player)
    }

    /// Hazards the player can sense in the rooms next door.
    #[must_use]
    pub fn hazard_hints(world: &World) -> HazardHints {
        let mut hints = HazardHints::default();
        for &room in topology::neighbors(world.player) {
            hints.wumpus |= room == world.wumpus;
            match hazard(world, room) {
                Hazard::Bats => hints.bats = true,
                Hazard::Pit => hints.pit = true,
                Hazard::Empty => {}
            }
        }
        hints
    }

    /// Rooms free of the Wumpus, bats and pits, in ascending order.
    #[must_use]
    pub fn safe_rooms(world: &World) -> Vec<RoomId> {
        topology::rooms()
            .filter(|room| *room != world.wumpus && hazard(world, *room) == Hazard::Empty)
            .collect()
    }

    /// Rooms whose hazard tag is empty, regardless of the Wumpus, in ascending order.
    #[must_use]
    pub fn empty_rooms(world: &World) -> Vec<RoomId> {
        topology::rooms()
            .filter(|room| hazard(world, *room) == Hazard::Empty)
            .collect()
    }

    /// Arrow currently in flight, if any.
    #[must_use]
    pub fn arrow(world: &World) -> Option<Arrow> {
        world.arrow
    }

    /// Outcome recorded for the session.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Captures a read-only view of every room of the cave.
    #[must_use]
    pub fn room_view(world: &World) -> RoomView {
        let snapshots = topology::rooms()
            .map(|room| RoomSnapshot {
                id: room,
                neighbors: topology::neighbors(room),
                hazard: hazard(world, room),
                wumpus: room == world.wumpus,
                player: room == world.player,
            })
            .collect();
        RoomView { snapshots }
    }

    /// Read-only snapshot describing every room of the cave.
    #[derive(Clone, Debug)]
    pub struct RoomView {
        snapshots: Vec<RoomSnapshot>,
    }

    impl RoomView {
        /// Iterator over the captured room snapshots in ascending room order.
        pub fn iter(&self) -> impl Iterator<Item = &RoomSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<RoomSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single room used for queries.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RoomSnapshot {
        /// Identifier of the room.
        pub id: RoomId,
        /// Rooms reachable through the room's tunnels.
        pub neighbors: &'static [RoomId],
        /// Hazard tag carried by the room.
        pub hazard: Hazard,
        /// Indicates whether the Wumpus lurks in the room.
        pub wumpus: bool,
        /// Indicates whether the player stands in the room.
        pub player: bool,
    }
}
