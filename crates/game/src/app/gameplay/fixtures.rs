//! Small hand-authored world shared by the tick and session tests.

use std::path::Path;

use labyrinth_engine::{
    compile_content_document, CompiledDocument, ContentDatabase, ContentFingerprint, InputAction,
    InputSnapshot, MapDef, StringTable,
};

use super::level_map::LevelMaps;

pub(crate) const MAPS_XML: &str = r##"<Maps>
    <MapDef name="bateau">
        <teleport symbol=">" map="plage"/>
        <teleport symbol="1" map="grotte"/>
        <obstacle symbol="|" visible="unless-weapon:\"/>
        <grid>
##########
#@*$/...>#
#.....|..#
#~~~~....#
#####1####
</grid>
    </MapDef>
    <MapDef name="plage">
        <teleport symbol="&lt;" map="bateau"/>
        <grid>
#######
#&lt;....#
#.....#
#######
</grid>
    </MapDef>
    <MapDef name="grotte">
        <teleport symbol="1" map="bateau"/>
        <spawner symbol="O" pv="2" spawnEvery="1" maxTargets="1" moveEvery="1" seed="3">
            <spawnPoint x="5" y="1"/>
            <pvColor min="2" color="#FF7700"/>
            <pvColor min="1" color="#FF0000"/>
        </spawner>
        <grid>
###1###
#.....#
#.....#
#~~~~~#
#######
</grid>
    </MapDef>
    <MapDef name="treasure" ending="true">
        <text lang="fr" x="1" y="0">Le trésor</text>
        <grid>
#####
#...#
#####
</grid>
    </MapDef>
</Maps>"##;

pub(crate) const STRINGS_FR_XML: &str = r#"<Strings lang="fr">
    <string key="take">Prendre</string>
    <string key="hit">&gt; Touché!</string>
    <string key="push">&gt; Poussé!</string>
    <string key="thanks">&gt; Merci d'avoir joué!</string>
    <string key="retry">Espace pour recommencer</string>
    <string key="throw">Lancer</string>
    <string key="new_game">Nouvelle partie</string>
    <string key="continue">Continuer</string>
    <string key="load">Charger</string>
    <string key="save">Sauvegarder</string>
    <string key="exit">Menu principal</string>
    <string key="language">Langue: français</string>
    <string key="game_over">Perdu!</string>
    <item symbol="*" genre="M">un caillou</item>
    <item symbol="$" genre="F">une pièce</item>
    <item symbol="/" genre="M">un bâton</item>
    <item symbol="\" genre="F">une épée</item>
    <gendered key="taken" masculine=" pris" feminine=" prise"/>
    <gendered key="thrown" masculine=" lancé" feminine=" lancée"/>
    <gameover symbol="~">Vous vous êtes noyé!</gameover>
</Strings>"#;

pub(crate) const STRINGS_EN_XML: &str = r#"<Strings lang="en">
    <string key="take">Take</string>
    <string key="new_game">New game</string>
    <string key="continue">Continue</string>
    <item symbol="*" genre="M">a rock</item>
    <gendered key="taken" masculine=" taken" feminine=" taken"/>
    <gameover symbol="~">You drowned!</gameover>
</Strings>"#;

pub(crate) const FINGERPRINT: &str = "fixture-fingerprint";

fn compile_maps(raw: &str) -> Vec<MapDef> {
    match compile_content_document(Path::new("maps.xml"), raw).expect("compile maps") {
        CompiledDocument::Maps(maps) => maps,
        CompiledDocument::Strings(_) => panic!("expected maps"),
    }
}

fn compile_strings(raw: &str) -> StringTable {
    match compile_content_document(Path::new("strings.xml"), raw).expect("compile strings") {
        CompiledDocument::Strings(table) => table,
        CompiledDocument::Maps(_) => panic!("expected strings"),
    }
}

pub(crate) fn content() -> ContentDatabase {
    content_with_maps(MAPS_XML)
}

/// The shared string tables over a different set of maps.
pub(crate) fn content_with_maps(maps_xml: &str) -> ContentDatabase {
    ContentDatabase::new(
        compile_maps(maps_xml),
        vec![
            compile_strings(STRINGS_FR_XML),
            compile_strings(STRINGS_EN_XML),
        ],
        ContentFingerprint {
            xml_file_count: 3,
            hash_hex: FINGERPRINT.to_string(),
        },
    )
}

pub(crate) fn maps() -> LevelMaps {
    LevelMaps::from_content(&content()).expect("fixture maps")
}

pub(crate) fn press(actions: &[InputAction]) -> InputSnapshot {
    actions
        .iter()
        .fold(InputSnapshot::empty(), |snapshot, action| {
            snapshot.with_action_down(*action, true)
        })
}
