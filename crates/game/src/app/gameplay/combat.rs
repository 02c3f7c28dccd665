use super::entities::SpawnerState;
use super::geometry::Position;
use super::spawner::TargetSpawner;

/// What touching a cell would do to the target standing there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TargetContact {
    None,
    /// Lethal: the target leaves the map.
    Hit { index: usize, symbol: char },
    /// Blocks movement; `damage` may be zero.
    Push {
        index: usize,
        symbol: char,
        damage: i32,
    },
}

impl TargetContact {
    pub(crate) fn is_none(&self) -> bool {
        matches!(self, TargetContact::None)
    }
}

/// Pure lookup; nothing changes until [`apply_contact`].
pub(crate) fn detect_contact(
    spawner: Option<&TargetSpawner>,
    state: &SpawnerState,
    cell: Position,
    damage: i32,
) -> TargetContact {
    let Some(spawner) = spawner else {
        return TargetContact::None;
    };
    let Some(index) = state.target_index_at(cell) else {
        return TargetContact::None;
    };

    let target = &state.targets[index];
    let dealt = if spawner.is_vulnerable() { damage } else { 0 };
    if dealt != 0 && target.pv - dealt <= 0 {
        TargetContact::Hit {
            index,
            symbol: target.symbol,
        }
    } else {
        TargetContact::Push {
            index,
            symbol: target.symbol,
            damage: dealt,
        }
    }
}

pub(crate) fn apply_contact(state: &mut SpawnerState, contact: TargetContact) {
    match contact {
        TargetContact::None => {}
        TargetContact::Hit { index, .. } => {
            if index < state.targets.len() {
                state.targets.remove(index);
            }
        }
        TargetContact::Push { index, damage, .. } => {
            if let Some(target) = state.targets.get_mut(index) {
                target.pv -= damage;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use labyrinth_engine::SpawnerDef;

    use super::*;
    use crate::app::gameplay::entities::Target;

    fn spawner(vulnerable: bool) -> TargetSpawner {
        TargetSpawner::from_def(&SpawnerDef {
            symbol: 'O',
            pv: 5,
            vulnerable,
            spawn_every: 1,
            max_targets: 1,
            move_every: 1,
            seed: 1,
            spawn_points: vec![(1, 1)],
            pv_colors: Vec::new(),
        })
    }

    fn state_with_target(pv: i32) -> SpawnerState {
        let mut state = SpawnerState::new(1);
        state.targets.push(Target::new(Position::new(4, 4), 'O', pv));
        state
    }

    #[test]
    fn lethal_damage_removes_target_and_reports_hit() {
        let spawner = spawner(true);
        let mut state = state_with_target(5);
        let contact = detect_contact(Some(&spawner), &state, Position::new(4, 4), 5);
        assert_eq!(contact, TargetContact::Hit { index: 0, symbol: 'O' });

        apply_contact(&mut state, contact);
        assert!(state.targets.is_empty());
    }

    #[test]
    fn partial_damage_pushes_and_wounds() {
        let spawner = spawner(true);
        let mut state = state_with_target(5);
        let contact = detect_contact(Some(&spawner), &state, Position::new(4, 4), 3);
        assert_eq!(
            contact,
            TargetContact::Push {
                index: 0,
                symbol: 'O',
                damage: 3
            }
        );

        apply_contact(&mut state, contact);
        assert_eq!(state.targets[0].pv, 2);
    }

    #[test]
    fn detection_alone_leaves_state_untouched() {
        let spawner = spawner(true);
        let state = state_with_target(5);
        let before = state.clone();
        let _ = detect_contact(Some(&spawner), &state, Position::new(4, 4), 5);
        assert_eq!(state, before);
    }

    #[test]
    fn invulnerable_and_bare_handed_contacts_only_push() {
        let armored = spawner(false);
        let state = state_with_target(5);
        assert_eq!(
            detect_contact(Some(&armored), &state, Position::new(4, 4), 5),
            TargetContact::Push {
                index: 0,
                symbol: 'O',
                damage: 0
            }
        );

        let soft = spawner(true);
        assert_eq!(
            detect_contact(Some(&soft), &state, Position::new(4, 4), 0),
            TargetContact::Push {
                index: 0,
                symbol: 'O',
                damage: 0
            }
        );
    }

    #[test]
    fn empty_cells_and_maps_without_spawner_have_no_contact() {
        let spawner = spawner(true);
        let state = state_with_target(5);
        assert!(detect_contact(Some(&spawner), &state, Position::new(1, 1), 5).is_none());
        assert!(detect_contact(None, &state, Position::new(4, 4), 5).is_none());
    }
}
