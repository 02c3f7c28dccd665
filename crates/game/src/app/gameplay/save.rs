use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::DROPPED_WEAPON_USAGE;
use super::geometry::Position;
use super::level_map::{in_bounds, LevelMaps};
use super::state::{weapon_slot, PersistedData, PersistedMapData};
use super::storage::{SaveStore, StorageError, SAVE_SLOT};
use super::symbols::{is_item, item_kind, ItemKind};

pub(crate) const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub(crate) enum SaveLoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("encode save json: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("{0}")]
    Parse(String),
    #[error("{0}")]
    Validation(String),
}

type SaveLoadResult<T> = Result<T, SaveLoadError>;

/// On-disk shape of the `save` slot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct SaveDocument {
    pub save_version: u32,
    pub content_fingerprint: String,
    #[serde(with = "weapon_slot")]
    pub weapon: Option<char>,
    pub rocks: u32,
    pub coins: u32,
    pub hero_position: Position,
    pub map_data: BTreeMap<String, PersistedMapData>,
    pub current_map_name: String,
}

impl SaveDocument {
    pub(crate) fn new(data: &PersistedData, content_fingerprint: &str) -> Self {
        Self {
            save_version: SAVE_VERSION,
            content_fingerprint: content_fingerprint.to_string(),
            weapon: data.weapon,
            rocks: data.rocks,
            coins: data.coins,
            hero_position: data.hero_position,
            map_data: data.map_data.clone(),
            current_map_name: data.current_map_name.clone(),
        }
    }

    pub(crate) fn into_persisted(self) -> PersistedData {
        PersistedData {
            weapon: self.weapon,
            rocks: self.rocks,
            coins: self.coins,
            hero_position: self.hero_position,
            map_data: self.map_data,
            current_map_name: self.current_map_name,
        }
    }
}

pub(crate) fn encode_save(data: &PersistedData, content_fingerprint: &str) -> SaveLoadResult<String> {
    serde_json::to_string_pretty(&SaveDocument::new(data, content_fingerprint))
        .map_err(SaveLoadError::Encode)
}

/// Reads, parses and validates the save slot. An empty slot is `Ok(None)`.
pub(crate) fn load_save(
    store: &dyn SaveStore,
    maps: &LevelMaps,
    content_fingerprint: &str,
) -> SaveLoadResult<Option<PersistedData>> {
    let Some(raw) = store.read(SAVE_SLOT)? else {
        return Ok(None);
    };
    decode_save(&raw, maps, content_fingerprint).map(Some)
}

pub(crate) fn decode_save(
    raw: &str,
    maps: &LevelMaps,
    content_fingerprint: &str,
) -> SaveLoadResult<PersistedData> {
    let document = parse_save_document(raw)?;
    validate_save_document(&document, maps, content_fingerprint)?;
    Ok(document.into_persisted())
}

pub(crate) fn parse_save_document(raw: &str) -> SaveLoadResult<SaveDocument> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, SaveDocument>(&mut deserializer) {
        Ok(document) => Ok(document),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(SaveLoadError::Parse(format!("parse save json: {source}")))
            } else {
                Err(SaveLoadError::Parse(format!(
                    "parse save json at {path}: {source}"
                )))
            }
        }
    }
}

fn validation_err(path: &str, message: impl Into<String>) -> SaveLoadError {
    SaveLoadError::Validation(format!("validation failed at {path}: {}", message.into()))
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> SaveLoadError {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

fn check_in_bounds(path: &str, position: Position) -> SaveLoadResult<()> {
    if in_bounds(position) {
        Ok(())
    } else {
        Err(expected_actual(
            path,
            "cell inside the 56x22 grid",
            format!("({}, {})", position.x, position.y),
        ))
    }
}

pub(crate) fn validate_save_document(
    document: &SaveDocument,
    maps: &LevelMaps,
    content_fingerprint: &str,
) -> SaveLoadResult<()> {
    if document.save_version != SAVE_VERSION {
        return Err(expected_actual(
            "save_version",
            SAVE_VERSION,
            document.save_version,
        ));
    }
    if document.content_fingerprint != content_fingerprint {
        return Err(expected_actual(
            "content_fingerprint",
            content_fingerprint,
            &document.content_fingerprint,
        ));
    }
    if !maps.contains(&document.current_map_name) {
        return Err(expected_actual(
            "current_map_name",
            "a known map",
            &document.current_map_name,
        ));
    }
    check_in_bounds("hero_position", document.hero_position)?;
    if let Some(weapon) = document.weapon {
        if !matches!(item_kind(weapon), Some(ItemKind::Weapon { .. })) {
            return Err(expected_actual("weapon", "a weapon symbol", weapon));
        }
    }

    for map in maps.iter() {
        if !document.map_data.contains_key(map.name()) {
            return Err(validation_err(
                &format!("map_data.{}", map.name()),
                "missing entry for known map",
            ));
        }
    }

    for (map_name, data) in &document.map_data {
        if !maps.contains(map_name) {
            return Err(validation_err(
                &format!("map_data.{map_name}"),
                "entry for unknown map",
            ));
        }
        for (symbol, stacks) in &data.items {
            let items_path = format!("map_data.{map_name}.items.{symbol}");
            if !is_item(*symbol) {
                return Err(expected_actual(&items_path, "an item symbol", symbol));
            }
            for (index, stack) in stacks.iter().enumerate() {
                let stack_path = format!("{items_path}[{index}]");
                check_in_bounds(&stack_path, stack.position())?;
                if stack.usage < 1 && stack.usage != DROPPED_WEAPON_USAGE {
                    return Err(expected_actual(
                        &format!("{stack_path}.usage"),
                        "usage >= 1 or -1",
                        stack.usage,
                    ));
                }
            }
        }
        for (index, projectile) in data.projectiles.iter().enumerate() {
            check_in_bounds(
                &format!("map_data.{map_name}.projectiles[{index}]"),
                projectile.position(),
            )?;
        }
        for (index, target) in data.spawner.targets.iter().enumerate() {
            let target_path = format!("map_data.{map_name}.spawner.targets[{index}]");
            check_in_bounds(&target_path, target.position())?;
            if target.pv <= 0 {
                return Err(expected_actual(
                    &format!("{target_path}.pv"),
                    "pv > 0",
                    target.pv,
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use labyrinth_engine::{compile_content_document, CompiledDocument, ContentDatabase, ContentFingerprint};
    use serde_json::json;

    use super::*;
    use crate::app::gameplay::entities::ObjPos;
    use crate::app::gameplay::storage::MemoryStore;

    const FINGERPRINT: &str = "abc123";

    fn maps() -> LevelMaps {
        let xml = r#"<Maps>
            <MapDef name="bateau"><grid>#@*.#</grid></MapDef>
            <MapDef name="plage"><grid>#.$.#</grid></MapDef>
        </Maps>"#;
        let CompiledDocument::Maps(defs) =
            compile_content_document(Path::new("maps.xml"), xml).expect("compile")
        else {
            panic!("expected maps");
        };
        let db = ContentDatabase::new(defs, Vec::new(), ContentFingerprint::default());
        LevelMaps::from_content(&db).expect("maps")
    }

    fn sample(maps: &LevelMaps) -> PersistedData {
        let mut data = PersistedData::initial(maps).expect("initial");
        data.weapon = Some('/');
        data.rocks = 3;
        data.current_map_data_mut()
            .expect("bateau")
            .drop_item('/', ObjPos { x: 3, y: 0, usage: DROPPED_WEAPON_USAGE });
        data
    }

    #[test]
    fn encode_then_decode_reproduces_working_state() {
        let maps = maps();
        let data = sample(&maps);
        let raw = encode_save(&data, FINGERPRINT).expect("encode");
        let decoded = decode_save(&raw, &maps, FINGERPRINT).expect("decode");
        assert_eq!(decoded, data);
    }

    #[test]
    fn json_shape_uses_flat_fields() {
        let maps = maps();
        let raw = encode_save(&sample(&maps), FINGERPRINT).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["weapon"], json!("/"));
        assert_eq!(value["rocks"], json!(3));
        assert_eq!(value["hero_position"], json!({"x": 1, "y": 0}));
        assert_eq!(value["current_map_name"], json!("bateau"));
        assert_eq!(value["save_version"], json!(SAVE_VERSION));
        assert_eq!(
            value["map_data"]["bateau"]["items"]["*"],
            json!([{"x": 2, "y": 0, "usage": 1}])
        );
        assert_eq!(
            value["map_data"]["plage"]["spawner"],
            json!({"targets": [], "counter": 0, "seed": 0})
        );
    }

    #[test]
    fn empty_weapon_round_trips_as_empty_string() {
        let maps = maps();
        let data = PersistedData::initial(&maps).expect("initial");
        let raw = encode_save(&data, FINGERPRINT).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["weapon"], json!(""));
        assert_eq!(decode_save(&raw, &maps, FINGERPRINT).expect("decode").weapon, None);
    }

    #[test]
    fn parse_reports_missing_field_path() {
        let maps = maps();
        let mut value = serde_json::to_value(SaveDocument::new(&sample(&maps), FINGERPRINT))
            .expect("to_value");
        value.as_object_mut().expect("object").remove("coins");
        let error = parse_save_document(&value.to_string()).expect_err("missing");
        let message = error.to_string();
        assert!(message.contains("parse save json"));
        assert!(message.contains("coins"));
        assert!(message.contains("missing field"));
    }

    #[test]
    fn parse_reports_type_mismatch_path() {
        let maps = maps();
        let mut value = serde_json::to_value(SaveDocument::new(&sample(&maps), FINGERPRINT))
            .expect("to_value");
        value["map_data"]["bateau"]["items"]["*"][0]["usage"] = json!("many");
        let error = parse_save_document(&value.to_string()).expect_err("mismatch");
        assert!(error
            .to_string()
            .contains("map_data.bateau.items.*[0].usage"));
    }

    #[test]
    fn negative_currency_is_rejected_by_parse() {
        let maps = maps();
        let mut value = serde_json::to_value(SaveDocument::new(&sample(&maps), FINGERPRINT))
            .expect("to_value");
        value["coins"] = json!(-1);
        assert!(matches!(
            parse_save_document(&value.to_string()),
            Err(SaveLoadError::Parse(_))
        ));
    }

    #[test]
    fn validation_rejects_version_and_fingerprint_mismatch() {
        let maps = maps();
        let mut document = SaveDocument::new(&sample(&maps), FINGERPRINT);
        document.save_version = SAVE_VERSION + 1;
        let error = validate_save_document(&document, &maps, FINGERPRINT).expect_err("version");
        assert!(error.to_string().contains("save_version"));

        let document = SaveDocument::new(&sample(&maps), "stale");
        let error = validate_save_document(&document, &maps, FINGERPRINT).expect_err("stale");
        assert!(error.to_string().contains("content_fingerprint"));
    }

    #[test]
    fn validation_requires_every_known_map() {
        let maps = maps();
        let mut document = SaveDocument::new(&sample(&maps), FINGERPRINT);
        document.map_data.remove("plage");
        let error = validate_save_document(&document, &maps, FINGERPRINT).expect_err("missing");
        assert!(error.to_string().contains("map_data.plage"));

        let mut document = SaveDocument::new(&sample(&maps), FINGERPRINT);
        document
            .map_data
            .insert("atlantis".to_string(), PersistedMapData::default());
        assert!(validate_save_document(&document, &maps, FINGERPRINT).is_err());
    }

    #[test]
    fn validation_rejects_out_of_grid_hero_and_bad_usage() {
        let maps = maps();
        let mut document = SaveDocument::new(&sample(&maps), FINGERPRINT);
        document.hero_position = Position::new(56, 0);
        let error = validate_save_document(&document, &maps, FINGERPRINT).expect_err("hero");
        assert!(error.to_string().contains("hero_position"));

        let mut document = SaveDocument::new(&sample(&maps), FINGERPRINT);
        document
            .map_data
            .get_mut("bateau")
            .expect("bateau")
            .drop_item('*', ObjPos { x: 1, y: 0, usage: 0 });
        let error = validate_save_document(&document, &maps, FINGERPRINT).expect_err("usage");
        assert!(error.to_string().contains("usage"));
    }

    #[test]
    fn load_save_treats_empty_slot_as_none() {
        let maps = maps();
        let mut store = MemoryStore::new();
        assert!(load_save(&store, &maps, FINGERPRINT).expect("load").is_none());

        store.write(SAVE_SLOT, "not json").expect("write");
        assert!(matches!(
            load_save(&store, &maps, FINGERPRINT),
            Err(SaveLoadError::Parse(_))
        ));
    }
}
