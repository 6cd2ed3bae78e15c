#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves where an arrow lands after every hop.

use log::debug;
use wumpus_core::{
    ActionError, Command, DeathCause, Event, Outcome, RoomId, ShotError, ARROW_HOPS,
};
use wumpus_world::{query, topology, World};

/// Arrow resolution system that turns arrow hops into hits.
#[derive(Debug, Default)]
pub struct Archery {
    scratch: Vec<Command>,
}

impl Archery {
    /// Creates a new archery system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes arrow hops and emits `Command::Conclude` for hits.
    ///
    /// The player is checked before the Wumpus, so an arrow returning to a
    /// room the player shares with the Wumpus kills the player.
    pub fn handle(&mut self, events: &[Event], world: &World, out: &mut Vec<Command>) {
        self.scratch.clear();

        for event in events {
            let Event::ArrowAdvanced { to, hops_left, .. } = *event else {
                continue;
            };

            if to == query::player_room(world) {
                debug!("arrow returned to the player's room {to}");
                self.scratch.push(Command::Conclude {
                    outcome: Outcome::PlayerDead {
                        cause: DeathCause::SelfShot,
                    },
                });
                break;
            }

            if to == query::wumpus_room(world) {
                debug!("arrow struck the wumpus in room {to}");
                self.scratch.push(Command::Conclude {
                    outcome: Outcome::WumpusDead,
                });
                break;
            }

            if hops_left == 0 {
                debug!("arrow spent in room {to}");
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

/// Checks a complete flight path against the tunnels before any arrow leaves.
///
/// Each hop must lead through a tunnel of the room the arrow occupies after
/// the previous hop. The first offending hop is reported with its 1-based
/// index.
pub fn validate_path(start: RoomId, path: &[RoomId; ARROW_HOPS as usize]) -> Result<(), ActionError> {
    let mut from = start;
    for (index, &to) in path.iter().enumerate() {
        if !topology::are_adjacent(from, to) {
            return Err(ActionError::InvalidShotHop {
                hop: hop_number(index),
                reason: ShotError::NotAdjacent { from, to },
            });
        }
        from = to;
    }
    Ok(())
}

fn hop_number(index: usize) -> u8 {
    u8::try_from(index + 1).unwrap_or(u8::MAX)
}
