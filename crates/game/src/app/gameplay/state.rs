use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entities::{ObjPos, ProjPos, SpawnerState};
use super::geometry::Position;
use super::level_map::{LevelMap, LevelMaps, MapLoadError};

pub(crate) const INITIAL_MAP: &str = "bateau";
pub(crate) const DEFAULT_LANGUAGE: &str = "fr";

/// Mutable, savable half of one map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct PersistedMapData {
    pub items: BTreeMap<char, Vec<ObjPos>>,
    pub projectiles: Vec<ProjPos>,
    pub spawner: SpawnerState,
}

impl PersistedMapData {
    pub(crate) fn pristine(map: &LevelMap) -> Self {
        Self {
            items: map.initial_item_positions().clone(),
            projectiles: Vec::new(),
            spawner: map
                .target_spawner()
                .map(|spawner| spawner.initial_state())
                .unwrap_or_default(),
        }
    }

    /// Symbol and index of the first stack lying on `position`.
    pub(crate) fn item_at(&self, position: Position) -> Option<(char, usize)> {
        self.items.iter().find_map(|(symbol, stacks)| {
            stacks
                .iter()
                .position(|stack| stack.position() == position)
                .map(|index| (*symbol, index))
        })
    }

    pub(crate) fn remove_item(&mut self, symbol: char, index: usize) -> Option<ObjPos> {
        let stacks = self.items.get_mut(&symbol)?;
        if index >= stacks.len() {
            return None;
        }
        Some(stacks.remove(index))
    }

    pub(crate) fn drop_item(&mut self, symbol: char, stack: ObjPos) {
        self.items.entry(symbol).or_default().push(stack);
    }
}

/// The whole save. `Clone` is the deep copy used for checkpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PersistedData {
    pub weapon: Option<char>,
    pub rocks: u32,
    pub coins: u32,
    pub hero_position: Position,
    pub map_data: BTreeMap<String, PersistedMapData>,
    pub current_map_name: String,
}

impl PersistedData {
    /// Pristine new-game snapshot: every map gets its authored item layout.
    pub(crate) fn initial(maps: &LevelMaps) -> Result<Self, MapLoadError> {
        let start_map = maps
            .get(INITIAL_MAP)
            .ok_or_else(|| MapLoadError::UnknownStartMap(INITIAL_MAP.to_string()))?;
        let hero_position = start_map
            .start()
            .ok_or_else(|| MapLoadError::MissingStart(INITIAL_MAP.to_string()))?;

        Ok(Self {
            weapon: None,
            rocks: 0,
            coins: 0,
            hero_position,
            map_data: maps
                .iter()
                .map(|map| (map.name().to_string(), PersistedMapData::pristine(map)))
                .collect(),
            current_map_name: INITIAL_MAP.to_string(),
        })
    }

    pub(crate) fn current_map_data(&self) -> Option<&PersistedMapData> {
        self.map_data.get(&self.current_map_name)
    }

    pub(crate) fn current_map_data_mut(&mut self) -> Option<&mut PersistedMapData> {
        self.map_data.get_mut(&self.current_map_name)
    }
}

/// Settings kept apart from the game save.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct PersonalSettings {
    pub lang: String,
}

impl Default for PersonalSettings {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Serializes the weapon slot as `""` when empty, a one-symbol string otherwise.
pub(crate) mod weapon_slot {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(
        weapon: &Option<char>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match weapon {
            Some(symbol) => serializer.serialize_str(&symbol.to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<char>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(None),
            (Some(symbol), None) => Ok(Some(symbol)),
            _ => Err(D::Error::custom(format!(
                "weapon must be empty or a single symbol, got {raw:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::gameplay::entities::Target;
    use crate::app::gameplay::geometry::Offset;

    fn sample() -> PersistedData {
        let mut map_data = BTreeMap::new();
        map_data.insert(
            "bateau".to_string(),
            PersistedMapData {
                items: BTreeMap::from([('*', vec![ObjPos { x: 3, y: 4, usage: 1 }])]),
                projectiles: vec![ProjPos::new(Position::new(1, 1), Offset::new(1, 0), '*', 1)],
                spawner: SpawnerState {
                    targets: vec![Target::new(Position::new(6, 6), 'O', 5)],
                    counter: 3,
                    seed: 9,
                },
            },
        );
        PersistedData {
            weapon: Some('/'),
            rocks: 2,
            coins: 7,
            hero_position: Position::new(2, 2),
            map_data,
            current_map_name: "bateau".to_string(),
        }
    }

    #[test]
    fn clone_is_isolated_both_ways() {
        let working = sample();
        let mut checkpoint = working.clone();
        let mut working = working;

        working.rocks += 1;
        working
            .current_map_data_mut()
            .expect("map")
            .items
            .get_mut(&'*')
            .expect("rocks")
            .clear();
        assert_eq!(checkpoint.rocks, 2);
        assert_eq!(checkpoint.current_map_data().expect("map").items[&'*'].len(), 1);

        checkpoint.current_map_data_mut().expect("map").spawner.targets[0].pv = 1;
        assert_eq!(working.current_map_data().expect("map").spawner.targets[0].pv, 5);
    }

    #[test]
    fn item_lookup_and_removal() {
        let mut data = sample();
        let map = data.current_map_data_mut().expect("map");
        assert_eq!(map.item_at(Position::new(3, 4)), Some(('*', 0)));
        assert_eq!(map.item_at(Position::new(0, 0)), None);

        let removed = map.remove_item('*', 0).expect("removed");
        assert_eq!(removed.usage, 1);
        assert_eq!(map.item_at(Position::new(3, 4)), None);
        assert!(map.remove_item('*', 0).is_none());
        assert!(map.remove_item('$', 0).is_none());
    }

    #[test]
    fn personal_settings_default_to_french() {
        assert_eq!(PersonalSettings::default().lang, "fr");
    }
}
