use serde::{Deserialize, Serialize};

/// Grid offsets `(dx, dy)` per slot for nodes in even columns.
///
/// Even columns sit half a row lower in world space, so the diagonal slots
/// reach one row further down than their odd-column counterparts.
pub const EVEN_OFFSETS: [(i32, i32); 12] = [
    (-2, 0),  // far left
    (-1, 0),  // up-left
    (-1, -1), // far up-left
    (0, -1),  // up
    (1, -1),  // far up-right
    (1, 0),   // up-right
    (2, 0),   // far right
    (1, 1),   // down-right
    (1, 2),   // far down-right
    (0, 1),   // down
    (-1, 2),  // far down-left
    (-1, 1),  // down-left
];

/// Grid offsets `(dx, dy)` per slot for nodes in odd columns.
pub const ODD_OFFSETS: [(i32, i32); 12] = [
    (-2, 0),  // far left
    (-1, -1), // up-left
    (-1, -2), // far up-left
    (0, -1),  // up
    (1, -2),  // far up-right
    (1, -1),  // up-right
    (2, 0),   // far right
    (1, 0),   // down-right
    (1, 1),   // far down-right
    (0, 1),   // down
    (-1, 1),  // far down-left
    (-1, 0),  // down-left
];

/// Scale applied to far steps when scoring them against adjacent ones (1/√3).
pub const FAR_DISTANCE_FACTOR: f64 = 0.577;

/// One of the 12 neighbor slots of a node, counted clockwise-from-left in
/// 30° wedges. Odd slots are the six unit-distance adjacent directions, even
/// slots the six far directions that skip over one tile.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Direction(u8);

impl Direction {
    pub const COUNT: usize = 12;

    pub const LEFT: Direction = Direction(0);
    pub const UP_LEFT: Direction = Direction(1);
    pub const UP: Direction = Direction(3);
    pub const UP_RIGHT: Direction = Direction(5);
    pub const RIGHT: Direction = Direction(6);
    pub const DOWN_RIGHT: Direction = Direction(7);
    pub const DOWN: Direction = Direction(9);
    pub const DOWN_LEFT: Direction = Direction(11);

    /// Wraps any integer onto the 12 slots.
    pub fn new(index: i32) -> Self {
        Direction(index.rem_euclid(Self::COUNT as i32) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Direction> {
        (0..Self::COUNT as u8).map(Direction)
    }

    pub fn adjacent() -> impl Iterator<Item = Direction> {
        (1..Self::COUNT as u8).step_by(2).map(Direction)
    }

    pub fn is_far(self) -> bool {
        self.0 % 2 == 0
    }

    pub fn rotate(self, steps: i32) -> Direction {
        Direction::new(self.0 as i32 + steps)
    }

    pub fn opposite(self) -> Direction {
        self.rotate(6)
    }

    /// The two adjacent slots either side of a far slot. A far move is only
    /// legal while neither of these tiles holds a blocking object.
    pub fn flanks(self) -> (Direction, Direction) {
        (self.rotate(-1), self.rotate(1))
    }

    pub fn distance_factor(self) -> f64 {
        if self.is_far() { FAR_DISTANCE_FACTOR } else { 1. }
    }

    pub fn offset(self, xindex: i32) -> (i32, i32) {
        offsets(xindex)[self.index()]
    }
}

/// The offset table for a column. `-1` counts as odd.
pub fn offsets(xindex: i32) -> &'static [(i32, i32); 12] {
    if xindex.rem_euclid(2) == 0 { &EVEN_OFFSETS } else { &ODD_OFFSETS }
}

/// Rounds halves toward positive infinity, so `-0.5` lands on `0`.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Maps a world-space vector (y pointing down) onto the nearest of the 12
/// slots: `round((180° - atan2(-dy, dx)) / 30°) mod 12`.
pub fn hex_direction(dx: f64, dy: f64) -> Direction {
    let angle = (-dy).atan2(dx).to_degrees();
    Direction::new(round_half_up((180. - angle) / 30.) as i32)
}
