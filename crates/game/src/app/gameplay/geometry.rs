use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A grid cell. Also the identity key of ground items and targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub(crate) struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub(crate) const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Difference between two cells; one grid step per unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub(crate) const ZERO: Offset = Offset { dx: 0, dy: 0 };

    pub(crate) const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub(crate) fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Unit step toward the same quadrant.
    pub(crate) fn signum(self) -> Self {
        Self::new(self.dx.signum(), self.dy.signum())
    }
}

impl Add<Offset> for Position {
    type Output = Position;

    fn add(self, rhs: Offset) -> Position {
        Position::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl Sub for Position {
    type Output = Offset;

    fn sub(self, rhs: Position) -> Offset {
        Offset::new(self.x - rhs.x, self.y - rhs.y)
    }
}
