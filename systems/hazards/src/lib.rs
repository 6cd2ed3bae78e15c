#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised hazard placement that scatters the Wumpus, bats and pits.

use log::{debug, warn};
use rand::{seq::SliceRandom, Rng};
use wumpus_core::{Command, Difficulty, Hazard, HazardKind, RoomId, ROOM_COUNT};
use wumpus_world::{query, topology, World};

/// Placement system that emits commands populating a cave for one difficulty.
#[derive(Clone, Copy, Debug, Default)]
pub struct HazardPlacement {
    difficulty: Difficulty,
}

impl HazardPlacement {
    /// Creates a placement system tuned for the provided difficulty.
    #[must_use]
    pub const fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Emits the commands that populate a fresh cave.
    ///
    /// The Wumpus is placed first in any room, then bats and pits are
    /// scattered, and finally the player is dropped into a room free of all
    /// three.
    pub fn populate<R>(&self, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let mut plan = Plan::from_world(world);

        let wumpus = random_room(rng);
        plan.wumpus = wumpus;
        out.push(Command::PlaceWumpus { room: wumpus });
        debug!("wumpus placed in room {wumpus}");

        self.scatter(HazardKind::Bats, &mut plan, rng, out);
        self.scatter(HazardKind::Pit, &mut plan, rng, out);

        match plan.safe_rooms().choose(rng) {
            Some(&room) => out.push(Command::PlacePlayer { room }),
            None => warn!("no safe room left for the player"),
        }
    }

    /// Emits the commands that clear and re-scatter bats and pits in place.
    ///
    /// The Wumpus keeps its room. The player is only moved when the new
    /// layout puts a hazard underneath them.
    pub fn reshuffle<R>(&self, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let mut plan = Plan::from_world(world);
        plan.hazards = [Hazard::Empty; ROOM_COUNT];
        out.push(Command::ClearHazards);

        self.scatter(HazardKind::Bats, &mut plan, rng, out);
        self.scatter(HazardKind::Pit, &mut plan, rng, out);

        let player = query::player_room(world);
        if plan.hazard(player) != Hazard::Empty {
            match plan.safe_rooms().choose(rng) {
                Some(&room) => {
                    debug!("reshuffle buried room {player}; moving player to {room}");
                    out.push(Command::PlacePlayer { room });
                }
                None => warn!("no safe room left for the player"),
            }
        }
    }

    fn scatter<R>(&self, kind: HazardKind, plan: &mut Plan, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        let occurrences = rng.gen_range(kind.occurrences());
        let chance = self.difficulty.placement_chance();
        let mut placed = 0_u32;

        for _ in 0..occurrences {
            let Some(&room) = plan.empty_rooms().choose(rng) else {
                break;
            };
            if !chance.succeeds(rng.gen_range(0..=100)) {
                continue;
            }
            plan.hazards[room.index()] = kind.tag();
            out.push(Command::PlaceHazard { room, kind });
            placed += 1;
        }

        debug!(
            "placed {placed} of {occurrences} {kind:?} draws at difficulty {}",
            self.difficulty
        );
    }
}

/// Cave layout as it will look once the emitted commands are applied.
#[derive(Clone, Debug)]
struct Plan {
    hazards: [Hazard; ROOM_COUNT],
    wumpus: RoomId,
}

impl Plan {
    fn from_world(world: &World) -> Self {
        let mut hazards = [Hazard::Empty; ROOM_COUNT];
        for room in topology::rooms() {
            hazards[room.index()] = query::hazard(world, room);
        }
        Self {
            hazards,
            wumpus: query::wumpus_room(world),
        }
    }

    fn hazard(&self, room: RoomId) -> Hazard {
        self.hazards.get(room.index()).copied().unwrap_or_default()
    }

    fn empty_rooms(&self) -> Vec<RoomId> {
        topology::rooms()
            .filter(|room| self.hazard(*room) == Hazard::Empty)
            .collect()
    }

    fn safe_rooms(&self) -> Vec<RoomId> {
        topology::rooms()
            .filter(|room| *room != self.wumpus && self.hazard(*room) == Hazard::Empty)
            .collect()
    }
}

fn random_room<R>(rng: &mut R) -> RoomId
where
    R: Rng + ?Sized,
{
    let index = rng.gen_range(0..ROOM_COUNT);
    RoomId::from_index(index).unwrap_or(RoomId::new(1))
}
