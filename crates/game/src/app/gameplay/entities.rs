use serde::{Deserialize, Serialize};

use super::geometry::{Offset, Position};

/// Usage of a weapon that was equipped and then dropped: unlimited, never merged.
pub(crate) const DROPPED_WEAPON_USAGE: i32 = -1;

/// One ground item stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct ObjPos {
    pub x: i32,
    pub y: i32,
    pub usage: i32,
}

impl ObjPos {
    pub(crate) fn new(position: Position, usage: i32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            usage,
        }
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub(crate) fn is_unlimited(&self) -> bool {
        self.usage == DROPPED_WEAPON_USAGE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct ProjPos {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
    pub symbol: char,
    pub power: i32,
}

impl ProjPos {
    pub(crate) fn new(position: Position, velocity: Offset, symbol: char, power: i32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            vx: velocity.dx,
            vy: velocity.dy,
            symbol,
            power,
        }
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub(crate) fn velocity(&self) -> Offset {
        Offset::new(self.vx, self.vy)
    }

    pub(crate) fn next_position(&self) -> Position {
        self.position() + self.velocity()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct Target {
    pub x: i32,
    pub y: i32,
    pub symbol: char,
    pub pv: i32,
}

impl Target {
    pub(crate) fn new(position: Position, symbol: char, pv: i32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            symbol,
            pv,
        }
    }

    pub(crate) fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
    }
}

/// Live targets of one map plus the counter and seed that pace spawning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct SpawnerState {
    pub targets: Vec<Target>,
    pub counter: u32,
    pub seed: u32,
}

impl SpawnerState {
    pub(crate) fn new(seed: u32) -> Self {
        Self {
            targets: Vec::new(),
            counter: 0,
            seed,
        }
    }

    /// Map re-entry: the population and cadence restart, the seed carries on.
    pub(crate) fn reset(&mut self) {
        self.targets.clear();
        self.counter = 0;
    }

    pub(crate) fn target_index_at(&self, position: Position) -> Option<usize> {
        self.targets
            .iter()
            .position(|target| target.position() == position)
    }

    /// xorshift32; a zero seed is bumped so the sequence never sticks.
    pub(crate) fn next_random(&mut self) -> u32 {
        let mut x = if self.seed == 0 { 0x9E37_79B9 } else { self.seed };
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.seed = x;
        x
    }
}
