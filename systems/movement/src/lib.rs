#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that resolves room entries and lets the Wumpus wander.

use log::{debug, warn};
use rand::{seq::SliceRandom, Rng};
use wumpus_core::{Command, DeathCause, Difficulty, Event, Hazard, Outcome, RoomId};
use wumpus_world::{query, topology, World};

/// Upper bound on neighbor draws while the Wumpus looks for a hazard-free room.
const MAX_WANDER_DRAWS: u32 = 1_000;

/// Noteworthy things that happened while resolving room entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encounter {
    /// The player met the Wumpus and slipped away.
    WumpusEscaped {
        /// Room shared with the Wumpus.
        room: RoomId,
    },
    /// The player met the Wumpus and was caught.
    WumpusCaught {
        /// Room shared with the Wumpus.
        room: RoomId,
    },
    /// The player walked into a pit.
    FellIntoPit {
        /// Room holding the pit.
        room: RoomId,
    },
    /// Bats snatched the player.
    BatsSnatched {
        /// Room holding the bats.
        from: RoomId,
        /// Room the bats will drop the player in.
        to: RoomId,
    },
}

/// Pure system that reacts to room entries and drives the Wumpus.
#[derive(Debug, Default)]
pub struct Movement {
    difficulty: Difficulty,
    encounters: Vec<Encounter>,
}

impl Movement {
    /// Creates a movement system tuned for the provided difficulty.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            encounters: Vec::new(),
        }
    }

    /// Consumes world events and emits the consequences of entering rooms.
    ///
    /// A player entering or being dropped into a room, or the Wumpus
    /// wandering into the player's room, runs the entry check: the Wumpus first (with the escape roll on
    /// low difficulties), then pits, then bats.
    pub fn handle<R>(&mut self, events: &[Event], world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        for event in events {
            match *event {
                Event::PlayerEntered { to, .. } | Event::PlayerCarried { to, .. } => {
                    self.inspect(to, world, rng, out);
                }
                Event::WumpusMoved { to, .. } if to == query::player_room(world) => {
                    debug!("the wumpus wandered into the player's room {to}");
                    self.inspect(to, world, rng, out);
                }
                _ => {}
            }
        }
    }

    /// Emits the Wumpus's wandering step, if the difficulty lets it roam.
    ///
    /// The Wumpus picks a random tunnel. Whenever the chosen room holds bats
    /// or a pit it keeps walking through a random tunnel of that room until it
    /// reaches a room without either.
    pub fn wander<R>(&self, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        if !self.difficulty.wumpus_wanders() {
            return;
        }

        let from = query::wumpus_room(world);
        let Some(&first) = topology::neighbors(from).choose(rng) else {
            return;
        };
        let mut candidate = first;
        let mut draws = 1;
        while query::hazard(world, candidate) != Hazard::Empty {
            if draws >= MAX_WANDER_DRAWS {
                warn!("wumpus found no hazard-free room after {draws} draws; staying in {from}");
                return;
            }
            let Some(&next) = topology::neighbors(candidate).choose(rng) else {
                return;
            };
            candidate = next;
            draws += 1;
        }

        debug!("wumpus wanders {from} -> {candidate}");
        out.push(Command::MoveWumpus { to: candidate });
    }

    /// Drains the encounters recorded since the previous call.
    pub fn take_encounters(&mut self) -> Vec<Encounter> {
        std::mem::take(&mut self.encounters)
    }

    fn inspect<R>(&mut self, room: RoomId, world: &World, rng: &mut R, out: &mut Vec<Command>)
    where
        R: Rng + ?Sized,
    {
        if query::wumpus_room(world) == room {
            let escaped = match self.difficulty.escape_chance() {
                Some(chance) => rng.gen_range(0..=100) < chance,
                None => false,
            };
            if escaped {
                debug!("player escaped the wumpus in room {room}");
                self.encounters.push(Encounter::WumpusEscaped { room });
            } else {
                self.encounters.push(Encounter::WumpusCaught { room });
                out.push(Command::Conclude {
                    outcome: Outcome::PlayerDead {
                        cause: DeathCause::Wumpus,
                    },
                });
            }
            return;
        }

        match query::hazard(world, room) {
            Hazard::Pit => {
                self.encounters.push(Encounter::FellIntoPit { room });
                out.push(Command::Conclude {
                    outcome: Outcome::PlayerDead {
                        cause: DeathCause::Pit,
                    },
                });
            }
            Hazard::Bats => match query::safe_rooms(world).choose(rng) {
                Some(&to) => {
                    self.encounters.push(Encounter::BatsSnatched { from: room, to });
                    out.push(Command::CarryPlayer { to });
                }
                None => warn!("bats in room {room} found nowhere to drop the player"),
            },
            Hazard::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn low_difficulty_wumpus_stays_put() {
        let movement = Movement::new(Difficulty::new(3).expect("valid"));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();

        movement.wander(&World::new(), &mut rng, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let mut movement = Movement::new(Difficulty::MAX);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();

        movement.handle(
            &[Event::HazardsCleared, Event::ArrowNocked { room: RoomId::new(1) }],
            &World::new(),
            &mut rng,
            &mut out,
        );

        assert!(out.is_empty());
        assert!(movement.take_encounters().is_empty());
    }
}
