//! Fixed tunnel layout of the cave.
//!
//! The twenty rooms sit on the vertices of a dodecahedron: every room opens
//! onto exactly three others and every tunnel can be walked in both
//! directions. The table is the classic Wumpus layout and never changes.

use wumpus_core::{RoomId, NEIGHBOR_COUNT, ROOM_COUNT};

const fn r(value: u8) -> RoomId {
    RoomId::new(value)
}

static TUNNELS: [[RoomId; NEIGHBOR_COUNT]; ROOM_COUNT] = [
    [r(2), r(5), r(8)],
    [r(1), r(3), r(10)],
    [r(2), r(4), r(12)],
    [r(3), r(5), r(14)],
    [r(1), r(4), r(6)],
    [r(5), r(7), r(15)],
    [r(6), r(8), r(17)],
    [r(1), r(7), r(9)],
    [r(8), r(10), r(18)],
    [r(2), r(9), r(11)],
    [r(10), r(12), r(19)],
    [r(3), r(11), r(13)],
    [r(12), r(14), r(20)],
    [r(4), r(13), r(15)],
    [r(6), r(14), r(16)],
    [r(15), r(17), r(20)],
    [r(7), r(16), r(18)],
    [r(9), r(17), r(19)],
    [r(11), r(18), r(20)],
    [r(13), r(16), r(19)],
];

/// Reports whether the identifier names a room of the cave.
#[must_use]
pub fn contains(room: RoomId) -> bool {
    RoomId::checked(room.get()).is_some()
}

/// Rooms reachable through the tunnels of `room`. Unknown rooms have no exits.
#[must_use]
pub fn neighbors(room: RoomId) -> &'static [RoomId] {
    if !contains(room) {
        return &[];
    }
    match TUNNELS.get(room.index()) {
        Some(tunnels) => tunnels.as_slice(),
        None => &[],
    }
}

/// Reports whether a single tunnel connects the two rooms.
#[must_use]
pub fn are_adjacent(from: RoomId, to: RoomId) -> bool {
    neighbors(from).contains(&to)
}

/// Iterates every room of the cave in ascending order.
pub fn rooms() -> impl Iterator<Item = RoomId> {
    RoomId::all()
}
