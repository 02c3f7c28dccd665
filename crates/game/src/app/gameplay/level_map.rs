use std::collections::BTreeMap;

use labyrinth_engine::{
    Color, ContentDatabase, MapDef, ObstacleVisibilityDef, TextLabelDef, MAP_COLUMNS, MAP_ROWS,
};
use thiserror::Error;

use super::entities::ObjPos;
use super::geometry::Position;
use super::spawner::TargetSpawner;
use super::symbols::{
    is_item, is_numbered_teleport, is_stairs, BLANK, FLOOR, HERO, STAIRS_DOWN, STAIRS_UP,
};

pub(crate) const COLUMNS: i32 = MAP_COLUMNS as i32;
pub(crate) const ROWS: i32 = MAP_ROWS as i32;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MapLoadError {
    #[error("map '{map}' has teleporter '{symbol}' but no <teleport symbol=\"{symbol}\"> destination")]
    MissingDestination { map: String, symbol: char },
    #[error("map '{map}' sends teleporter '{symbol}' to unknown map '{destination}'")]
    UnknownDestination {
        map: String,
        symbol: char,
        destination: String,
    },
    #[error(
        "map '{map}' teleporter '{symbol}' #{id} has no paired '{paired}' #{id} in map '{destination}'"
    )]
    UnpairedTeleport {
        map: String,
        symbol: char,
        paired: char,
        id: usize,
        destination: String,
    },
    #[error("start map '{0}' is not defined")]
    UnknownStartMap(String),
    #[error("start map '{0}' has no '@' start marker")]
    MissingStart(String),
}

/// A teleporter cell; `id` is its row-major index among cells of the same symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TeleportPos {
    pub position: Position,
    pub id: usize,
}

/// One named area, immutable after load. Decorations found in the authored
/// grid are lifted into their own tables and their cells become floor.
#[derive(Debug, Clone)]
pub(crate) struct LevelMap {
    name: String,
    grid: Vec<Vec<char>>,
    start: Option<Position>,
    pub background_color: Color,
    pub text_color: Color,
    pub obstacle_color: Color,
    tile_colors: BTreeMap<char, Color>,
    teleports: BTreeMap<char, Vec<TeleportPos>>,
    teleport_map: BTreeMap<char, String>,
    obstacles: BTreeMap<char, Vec<Position>>,
    obstacle_rules: BTreeMap<char, ObstacleVisibilityDef>,
    initial_item_positions: BTreeMap<char, Vec<ObjPos>>,
    target_spawner: Option<TargetSpawner>,
    texts: Vec<TextLabelDef>,
    ending: bool,
}

impl LevelMap {
    pub(crate) fn from_def(def: &MapDef) -> Self {
        let obstacle_rules = def
            .obstacles
            .iter()
            .map(|obstacle| (obstacle.symbol, obstacle.visibility))
            .collect::<BTreeMap<_, _>>();

        let mut grid = def.grid.clone();
        let mut start = None;
        let mut teleports = BTreeMap::<char, Vec<TeleportPos>>::new();
        let mut obstacles = BTreeMap::<char, Vec<Position>>::new();
        let mut items = BTreeMap::<char, Vec<ObjPos>>::new();

        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let symbol = *cell;
                let position = Position::new(x as i32, y as i32);
                if obstacle_rules.contains_key(&symbol) {
                    obstacles.entry(symbol).or_default().push(position);
                    *cell = FLOOR;
                } else if is_numbered_teleport(symbol) || is_stairs(symbol) {
                    let list = teleports.entry(symbol).or_default();
                    list.push(TeleportPos {
                        position,
                        id: list.len(),
                    });
                    if !is_stairs(symbol) {
                        *cell = FLOOR;
                    }
                } else if is_item(symbol) {
                    items.entry(symbol).or_default().push(ObjPos::new(position, 1));
                    *cell = FLOOR;
                } else if symbol == HERO {
                    start = Some(position);
                    *cell = FLOOR;
                }
            }
        }

        Self {
            name: def.name.clone(),
            grid,
            start,
            background_color: def.background_color,
            text_color: def.text_color,
            obstacle_color: def.obstacle_color,
            tile_colors: def.tile_colors.clone(),
            teleports,
            teleport_map: def
                .teleports
                .iter()
                .map(|teleport| (teleport.symbol, teleport.destination_map.clone()))
                .collect(),
            obstacles,
            obstacle_rules,
            initial_item_positions: items,
            target_spawner: def.spawner.as_ref().map(TargetSpawner::from_def),
            texts: def.texts.clone(),
            ending: def.ending,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Out-of-bounds reads return the blank, non-walkable symbol.
    pub(crate) fn get_symbol_at(&self, position: Position) -> char {
        if !in_bounds(position) {
            return BLANK;
        }
        self.grid
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
            .copied()
            .unwrap_or(BLANK)
    }

    pub(crate) fn start(&self) -> Option<Position> {
        self.start
    }

    pub(crate) fn tile_color(&self, symbol: char) -> Option<Color> {
        self.tile_colors.get(&symbol).copied()
    }

    pub(crate) fn teleports(&self, symbol: char) -> &[TeleportPos] {
        self.teleports.get(&symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Numbered teleporter standing on `position`, if any.
    pub(crate) fn numbered_teleport_at(&self, position: Position) -> Option<(char, TeleportPos)> {
        self.teleports
            .iter()
            .filter(|(symbol, _)| is_numbered_teleport(**symbol))
            .find_map(|(symbol, list)| {
                list.iter()
                    .find(|teleport| teleport.position == position)
                    .map(|teleport| (*symbol, *teleport))
            })
    }

    pub(crate) fn teleport_map(&self, symbol: char) -> Option<&str> {
        self.teleport_map.get(&symbol).map(String::as_str)
    }

    pub(crate) fn obstacles(&self) -> impl Iterator<Item = (char, &[Position])> {
        self.obstacles
            .iter()
            .map(|(symbol, positions)| (*symbol, positions.as_slice()))
    }

    /// Obstacles appear or vanish with the hero's gear and purse.
    pub(crate) fn obstacle_visible(&self, weapon: Option<char>, coins: u32, symbol: char) -> bool {
        match self.obstacle_rules.get(&symbol) {
            Some(ObstacleVisibilityDef::Always) => true,
            Some(ObstacleVisibilityDef::UnlessWeapon(required)) => weapon != Some(*required),
            Some(ObstacleVisibilityDef::UnlessCoins(required)) => coins < *required,
            None => false,
        }
    }

    pub(crate) fn visible_obstacle_at(
        &self,
        weapon: Option<char>,
        coins: u32,
        position: Position,
    ) -> bool {
        self.obstacles().any(|(symbol, positions)| {
            positions.contains(&position) && self.obstacle_visible(weapon, coins, symbol)
        })
    }

    pub(crate) fn initial_item_positions(&self) -> &BTreeMap<char, Vec<ObjPos>> {
        &self.initial_item_positions
    }

    pub(crate) fn target_spawner(&self) -> Option<&TargetSpawner> {
        self.target_spawner.as_ref()
    }

    pub(crate) fn texts(&self, lang: &str) -> impl Iterator<Item = &TextLabelDef> {
        let lang = lang.to_string();
        self.texts.iter().filter(move |text| text.lang == lang)
    }

    pub(crate) fn is_ending(&self) -> bool {
        self.ending
    }
}

pub(crate) fn in_bounds(position: Position) -> bool {
    (0..COLUMNS).contains(&position.x) && (0..ROWS).contains(&position.y)
}

/// Every map by name, with teleport pairing checked across maps.
#[derive(Debug, Clone, Default)]
pub(crate) struct LevelMaps {
    maps: BTreeMap<String, LevelMap>,
}

impl LevelMaps {
    pub(crate) fn from_content(content: &ContentDatabase) -> Result<Self, MapLoadError> {
        let maps = content
            .maps()
            .map(|def| (def.name.clone(), LevelMap::from_def(def)))
            .collect::<BTreeMap<_, _>>();
        let level_maps = Self { maps };
        level_maps.validate_teleports()?;
        Ok(level_maps)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&LevelMap> {
        self.maps.get(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &LevelMap> {
        self.maps.values()
    }

    fn validate_teleports(&self) -> Result<(), MapLoadError> {
        for map in self.maps.values() {
            for (&symbol, list) in &map.teleports {
                let Some(destination) = map.teleport_map(symbol) else {
                    return Err(MapLoadError::MissingDestination {
                        map: map.name.clone(),
                        symbol,
                    });
                };
                let Some(destination_map) = self.maps.get(destination) else {
                    return Err(MapLoadError::UnknownDestination {
                        map: map.name.clone(),
                        symbol,
                        destination: destination.to_string(),
                    });
                };
                let paired = paired_symbol(symbol);
                let available = destination_map.teleports(paired).len();
                for teleport in list {
                    let id = paired_index(symbol, teleport.id);
                    if id >= available {
                        return Err(MapLoadError::UnpairedTeleport {
                            map: map.name.clone(),
                            symbol,
                            paired,
                            id,
                            destination: destination.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// `>` lands on `<` and back; numbered teleporters land on their own symbol.
pub(crate) fn paired_symbol(symbol: char) -> char {
    match symbol {
        STAIRS_DOWN => STAIRS_UP,
        STAIRS_UP => STAIRS_DOWN,
        other => other,
    }
}

/// Stairs always land on the first paired cell; numbered ones keep their id.
pub(crate) fn paired_index(symbol: char, id: usize) -> usize {
    if is_stairs(symbol) {
        0
    } else {
        id
    }
}
