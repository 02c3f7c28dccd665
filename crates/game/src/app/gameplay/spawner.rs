use labyrinth_engine::{Color, SpawnerDef};

use super::entities::{SpawnerState, Target};
use super::geometry::{Offset, Position};

/// Per-map policy for hostile targets: where and how often they appear, how
/// fast they close in, and how they are tinted as they lose hit points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TargetSpawner {
    symbol: char,
    pv: i32,
    vulnerable: bool,
    spawn_every: u32,
    max_targets: usize,
    move_every: u32,
    seed: u32,
    spawn_points: Vec<Position>,
    /// Sorted by descending threshold.
    pv_colors: Vec<(i32, Color)>,
}

impl TargetSpawner {
    pub(crate) fn from_def(def: &SpawnerDef) -> Self {
        let mut pv_colors = def
            .pv_colors
            .iter()
            .map(|entry| (entry.min_pv, entry.color))
            .collect::<Vec<_>>();
        pv_colors.sort_by(|a, b| b.0.cmp(&a.0));
        Self {
            symbol: def.symbol,
            pv: def.pv,
            vulnerable: def.vulnerable,
            spawn_every: def.spawn_every.max(1),
            max_targets: def.max_targets,
            move_every: def.move_every.max(1),
            seed: def.seed,
            spawn_points: def
                .spawn_points
                .iter()
                .map(|(x, y)| Position::new(*x, *y))
                .collect(),
            pv_colors,
        }
    }

    pub(crate) fn initial_state(&self) -> SpawnerState {
        SpawnerState::new(self.seed)
    }

    pub(crate) fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    pub(crate) fn pv_color(&self, pv: i32) -> Option<Color> {
        self.pv_colors
            .iter()
            .find(|(min_pv, _)| pv >= *min_pv)
            .map(|(_, color)| *color)
    }

    /// Advances one tick and returns where the hero stands afterwards.
    /// `is_free` answers whether a target may step onto a cell; `blocks_push`
    /// whether something solid keeps the hero from being pushed there.
    pub(crate) fn update(
        &self,
        state: &mut SpawnerState,
        hero: Position,
        is_free: &dyn Fn(Position) -> bool,
        blocks_push: &dyn Fn(Position) -> bool,
    ) -> Position {
        state.counter = state.counter.wrapping_add(1);
        let mut hero = hero;

        if state.counter % self.move_every == 0 {
            for index in 0..state.targets.len() {
                hero = self.step_target(state, index, hero, is_free, blocks_push);
            }
        }

        if state.counter % self.spawn_every == 0
            && state.targets.len() < self.max_targets
            && !self.spawn_points.is_empty()
        {
            let pick = state.next_random() as usize % self.spawn_points.len();
            let point = self.spawn_points[pick];
            if point != hero && state.target_index_at(point).is_none() && is_free(point) {
                state.targets.push(Target::new(point, self.symbol, self.pv));
            }
        }

        hero
    }

    fn step_target(
        &self,
        state: &mut SpawnerState,
        index: usize,
        hero: Position,
        is_free: &dyn Fn(Position) -> bool,
        blocks_push: &dyn Fn(Position) -> bool,
    ) -> Position {
        let from = state.targets[index].position();
        let toward = (hero - from).signum();
        if toward.is_zero() {
            return hero;
        }

        let mut candidates = vec![toward];
        if toward.dx != 0 && toward.dy != 0 {
            candidates.push(Offset::new(0, toward.dy));
            candidates.push(Offset::new(toward.dx, 0));
        }

        for step in candidates {
            let next = from + step;
            if next == hero {
                let pushed = hero + step;
                if state.target_index_at(pushed).is_some() || blocks_push(pushed) {
                    return hero;
                }
                return pushed;
            }
            let occupied = state
                .targets
                .iter()
                .enumerate()
                .any(|(other, target)| other != index && target.position() == next);
            if !occupied && is_free(next) {
                state.targets[index].set_position(next);
                return hero;
            }
        }
        hero
    }
}
