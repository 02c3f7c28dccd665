use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::app::Color;

/// Columns in every authored grid.
pub const MAP_COLUMNS: usize = 56;
/// Rows in every authored grid.
pub const MAP_ROWS: usize = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genre {
    Masculine,
    Feminine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeleportDef {
    pub symbol: char,
    pub destination_map: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleVisibilityDef {
    Always,
    UnlessWeapon(char),
    UnlessCoins(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleDef {
    pub symbol: char,
    pub visibility: ObstacleVisibilityDef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvColorDef {
    pub min_pv: i32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnerDef {
    pub symbol: char,
    pub pv: i32,
    pub vulnerable: bool,
    pub spawn_every: u32,
    pub max_targets: usize,
    pub move_every: u32,
    pub seed: u32,
    pub spawn_points: Vec<(i32, i32)>,
    pub pv_colors: Vec<PvColorDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLabelDef {
    pub lang: String,
    pub x: i32,
    pub y: i32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDef {
    pub name: String,
    pub source: PathBuf,
    /// Exactly `MAP_ROWS` rows of exactly `MAP_COLUMNS` symbols, blank padded.
    pub grid: Vec<Vec<char>>,
    pub background_color: Color,
    pub text_color: Color,
    pub obstacle_color: Color,
    pub tile_colors: BTreeMap<char, Color>,
    pub teleports: Vec<TeleportDef>,
    pub obstacles: Vec<ObstacleDef>,
    pub spawner: Option<SpawnerDef>,
    pub texts: Vec<TextLabelDef>,
    pub ending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDescriptionDef {
    pub text: String,
    pub genre: Genre,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderedText {
    pub masculine: String,
    pub feminine: String,
}

impl GenderedText {
    pub fn for_genre(&self, genre: Genre) -> &str {
        match genre {
            Genre::Masculine => &self.masculine,
            Genre::Feminine => &self.feminine,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    pub lang: String,
    pub strings: BTreeMap<String, String>,
    pub items: BTreeMap<char, ItemDescriptionDef>,
    pub gendered: BTreeMap<String, GenderedText>,
    pub game_over: BTreeMap<char, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFingerprint {
    pub xml_file_count: usize,
    pub hash_hex: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContentDatabase {
    maps: BTreeMap<String, MapDef>,
    string_tables: BTreeMap<String, StringTable>,
    fingerprint: ContentFingerprint,
}

impl ContentDatabase {
    pub fn new(
        maps: Vec<MapDef>,
        string_tables: Vec<StringTable>,
        fingerprint: ContentFingerprint,
    ) -> Self {
        Self {
            maps: maps.into_iter().map(|map| (map.name.clone(), map)).collect(),
            string_tables: string_tables
                .into_iter()
                .map(|table| (table.lang.clone(), table))
                .collect(),
            fingerprint,
        }
    }

    pub fn map(&self, name: &str) -> Option<&MapDef> {
        self.maps.get(name)
    }

    pub fn maps(&self) -> impl Iterator<Item = &MapDef> {
        self.maps.values()
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn strings(&self, lang: &str) -> Option<&StringTable> {
        self.string_tables.get(lang)
    }

    pub fn string_tables(&self) -> impl Iterator<Item = &StringTable> {
        self.string_tables.values()
    }

    pub fn fingerprint(&self) -> &ContentFingerprint {
        &self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_map(name: &str) -> MapDef {
        MapDef {
            name: name.to_string(),
            source: PathBuf::from("maps.xml"),
            grid: vec![vec![' '; MAP_COLUMNS]; MAP_ROWS],
            background_color: Color::BLACK,
            text_color: Color::WHITE,
            obstacle_color: Color::WHITE,
            tile_colors: BTreeMap::new(),
            teleports: Vec::new(),
            obstacles: Vec::new(),
            spawner: None,
            texts: Vec::new(),
            ending: false,
        }
    }

    #[test]
    fn lookups_are_keyed_by_name_and_language() {
        let db = ContentDatabase::new(
            vec![blank_map("plage"), blank_map("bateau")],
            vec![StringTable {
                lang: "fr".to_string(),
                ..StringTable::default()
            }],
            ContentFingerprint::default(),
        );
        assert_eq!(db.map_count(), 2);
        assert!(db.map("bateau").is_some());
        assert!(db.map("grotte").is_none());
        assert!(db.strings("fr").is_some());
        assert!(db.strings("en").is_none());
        let names = db.maps().map(|map| map.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["bateau", "plage"]);
    }

    #[test]
    fn gendered_text_selects_by_genre() {
        let text = GenderedText {
            masculine: " pris".to_string(),
            feminine: " prise".to_string(),
        };
        assert_eq!(text.for_genre(Genre::Masculine), " pris");
        assert_eq!(text.for_genre(Genre::Feminine), " prise");
    }
}
