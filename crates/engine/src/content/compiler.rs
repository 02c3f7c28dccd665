use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use roxmltree::{Document, Node};

use crate::app::Color;

use super::database::{
    GenderedText, Genre, ItemDescriptionDef, MapDef, ObstacleDef, ObstacleVisibilityDef,
    PvColorDef, SpawnerDef, StringTable, TeleportDef, TextLabelDef, MAP_COLUMNS, MAP_ROWS,
};

const DEFAULT_BACKGROUND_COLOR: Color = Color::rgb(0, 0, 0);
const DEFAULT_TEXT_COLOR: Color = Color::rgb(255, 255, 0);
const DEFAULT_OBSTACLE_COLOR: Color = Color::rgb(255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentErrorCode {
    ReadFile,
    XmlMalformed,
    InvalidRoot,
    UnknownElement,
    UnknownField,
    DuplicateField,
    MissingField,
    InvalidValue,
    InvalidGrid,
    DuplicateDef,
}

#[derive(Debug, Clone)]
pub struct ContentCompileError {
    pub code: ContentErrorCode,
    pub message: String,
    pub file_path: PathBuf,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ContentCompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (file={}, line={}, column={})",
                self.code,
                self.message,
                self.file_path.display(),
                loc.line,
                loc.column
            ),
            None => write!(
                f,
                "{:?}: {} (file={})",
                self.code,
                self.message,
                self.file_path.display()
            ),
        }
    }
}

impl std::error::Error for ContentCompileError {}

/// What a single content file contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledDocument {
    Maps(Vec<MapDef>),
    Strings(StringTable),
}

#[derive(Clone, Copy)]
struct DocContext<'a, 'input> {
    file_path: &'a Path,
    doc: &'a Document<'input>,
}

impl DocContext<'_, '_> {
    fn error_at(
        &self,
        code: ContentErrorCode,
        message: String,
        node: Node<'_, '_>,
    ) -> ContentCompileError {
        let pos = self.doc.text_pos_at(node.range().start);
        ContentCompileError {
            code,
            message,
            file_path: self.file_path.to_path_buf(),
            location: Some(SourceLocation {
                line: pos.row as usize,
                column: pos.col as usize,
            }),
        }
    }
}

pub fn compile_content_document(
    file_path: &Path,
    raw: &str,
) -> Result<CompiledDocument, ContentCompileError> {
    let doc = Document::parse(raw).map_err(|error| ContentCompileError {
        code: ContentErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        file_path: file_path.to_path_buf(),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;
    let ctx = DocContext {
        file_path,
        doc: &doc,
    };

    let root = doc.root_element();
    match root.tag_name().name() {
        "Maps" => {
            check_attributes(ctx, root, &[])?;
            let mut maps = Vec::<MapDef>::new();
            let mut seen = HashSet::<String>::new();
            for child in element_children(root) {
                if child.tag_name().name() != "MapDef" {
                    return Err(ctx.error_at(
                        ContentErrorCode::UnknownElement,
                        format!(
                            "unsupported element <{}> in <Maps>; expected <MapDef>",
                            child.tag_name().name()
                        ),
                        child,
                    ));
                }
                let map = parse_map_def(ctx, child)?;
                if !seen.insert(map.name.clone()) {
                    return Err(ctx.error_at(
                        ContentErrorCode::DuplicateDef,
                        format!("duplicate MapDef '{}' in file", map.name),
                        child,
                    ));
                }
                maps.push(map);
            }
            Ok(CompiledDocument::Maps(maps))
        }
        "Strings" => Ok(CompiledDocument::Strings(parse_string_table(ctx, root)?)),
        other => Err(ctx.error_at(
            ContentErrorCode::InvalidRoot,
            format!("root element must be <Maps> or <Strings>, found <{other}>"),
            root,
        )),
    }
}

fn parse_map_def(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
) -> Result<MapDef, ContentCompileError> {
    check_attributes(ctx, node, &["name", "ending"])?;
    let name = required_attr(ctx, node, "name")?.to_string();
    let ending = optional_parsed_attr::<bool>(ctx, node, "ending")?.unwrap_or(false);

    let mut seen_singletons = HashSet::<&str>::new();
    let mut grid: Option<Vec<Vec<char>>> = None;
    let mut background_color = DEFAULT_BACKGROUND_COLOR;
    let mut text_color = DEFAULT_TEXT_COLOR;
    let mut obstacle_color = DEFAULT_OBSTACLE_COLOR;
    let mut tile_colors = BTreeMap::<char, Color>::new();
    let mut teleports = Vec::<TeleportDef>::new();
    let mut obstacles = Vec::<ObstacleDef>::new();
    let mut spawner: Option<SpawnerDef> = None;
    let mut texts = Vec::<TextLabelDef>::new();

    for field in element_children(node) {
        let field_name = field.tag_name().name();
        if matches!(field_name, "grid" | "colors" | "spawner") && !seen_singletons.insert(field_name)
        {
            return Err(ctx.error_at(
                ContentErrorCode::DuplicateField,
                format!("duplicate field <{field_name}> in <MapDef name=\"{name}\">"),
                field,
            ));
        }

        match field_name {
            "grid" => grid = Some(parse_grid(ctx, field)?),
            "colors" => {
                check_attributes(ctx, field, &["background", "text", "obstacle"])?;
                if let Some(color) = optional_color_attr(ctx, field, "background")? {
                    background_color = color;
                }
                if let Some(color) = optional_color_attr(ctx, field, "text")? {
                    text_color = color;
                }
                if let Some(color) = optional_color_attr(ctx, field, "obstacle")? {
                    obstacle_color = color;
                }
            }
            "tile" => {
                check_attributes(ctx, field, &["symbol", "color"])?;
                let symbol = symbol_attr(ctx, field, "symbol")?;
                let color = required_color_attr(ctx, field, "color")?;
                if tile_colors.insert(symbol, color).is_some() {
                    return Err(ctx.error_at(
                        ContentErrorCode::DuplicateDef,
                        format!("tile color for '{symbol}' declared twice"),
                        field,
                    ));
                }
            }
            "teleport" => {
                check_attributes(ctx, field, &["symbol", "map"])?;
                let symbol = symbol_attr(ctx, field, "symbol")?;
                if teleports.iter().any(|teleport| teleport.symbol == symbol) {
                    return Err(ctx.error_at(
                        ContentErrorCode::DuplicateDef,
                        format!("teleport '{symbol}' declared twice"),
                        field,
                    ));
                }
                teleports.push(TeleportDef {
                    symbol,
                    destination_map: required_attr(ctx, field, "map")?.to_string(),
                });
            }
            "obstacle" => {
                check_attributes(ctx, field, &["symbol", "visible"])?;
                let symbol = symbol_attr(ctx, field, "symbol")?;
                let visibility = match field.attribute("visible") {
                    Some(raw) => parse_visibility(raw).ok_or_else(|| {
                        ctx.error_at(
                            ContentErrorCode::InvalidValue,
                            format!(
                                "invalid obstacle visibility '{raw}'; allowed values: always, unless-weapon:<symbol>, unless-coins:<count>"
                            ),
                            field,
                        )
                    })?,
                    None => ObstacleVisibilityDef::Always,
                };
                obstacles.push(ObstacleDef { symbol, visibility });
            }
            "spawner" => spawner = Some(parse_spawner(ctx, field)?),
            "text" => {
                check_attributes(ctx, field, &["lang", "x", "y"])?;
                texts.push(TextLabelDef {
                    lang: required_attr(ctx, field, "lang")?.to_string(),
                    x: parsed_attr::<i32>(ctx, field, "x")?,
                    y: parsed_attr::<i32>(ctx, field, "y")?,
                    text: required_text(ctx, field, "text")?,
                });
            }
            _ => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{field_name}> in <MapDef>"),
                    field,
                ))
            }
        }
    }

    let Some(grid) = grid else {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            format!("missing required field <grid> in <MapDef name=\"{name}\">"),
            node,
        ));
    };

    Ok(MapDef {
        name,
        source: ctx.file_path.to_path_buf(),
        grid,
        background_color,
        text_color,
        obstacle_color,
        tile_colors,
        teleports,
        obstacles,
        spawner,
        texts,
        ending,
    })
}

/// Grid text is taken verbatim, minus the blank first and last lines that XML
/// indentation leaves around it. Short rows and missing rows are blank padded.
fn parse_grid(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
) -> Result<Vec<Vec<char>>, ContentCompileError> {
    check_attributes(ctx, node, &[])?;
    let raw = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect::<String>();

    let mut lines = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect::<Vec<_>>();
    if lines.first().is_some_and(|line| line.trim().is_empty()) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "field <grid> must not be empty".to_string(),
            node,
        ));
    }
    if lines.len() > MAP_ROWS {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidGrid,
            format!("grid has {} rows; at most {MAP_ROWS} allowed", lines.len()),
            node,
        ));
    }

    let mut grid = Vec::with_capacity(MAP_ROWS);
    for (row_index, line) in lines.iter().enumerate() {
        let mut row = line.chars().collect::<Vec<_>>();
        if row.len() > MAP_COLUMNS {
            return Err(ctx.error_at(
                ContentErrorCode::InvalidGrid,
                format!(
                    "grid row {row_index} has {} columns; at most {MAP_COLUMNS} allowed",
                    row.len()
                ),
                node,
            ));
        }
        if let Some(bad) = row.iter().find(|ch| ch.is_control()) {
            return Err(ctx.error_at(
                ContentErrorCode::InvalidGrid,
                format!("grid row {row_index} contains control character {bad:?}"),
                node,
            ));
        }
        row.resize(MAP_COLUMNS, ' ');
        grid.push(row);
    }
    grid.resize(MAP_ROWS, vec![' '; MAP_COLUMNS]);
    Ok(grid)
}

fn parse_spawner(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
) -> Result<SpawnerDef, ContentCompileError> {
    check_attributes(
        ctx,
        node,
        &[
            "symbol",
            "pv",
            "vulnerable",
            "spawnEvery",
            "maxTargets",
            "moveEvery",
            "seed",
        ],
    )?;
    let symbol = symbol_attr(ctx, node, "symbol")?;
    let pv = parsed_attr::<i32>(ctx, node, "pv")?;
    if pv <= 0 {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            "spawner pv must be > 0".to_string(),
            node,
        ));
    }
    let spawn_every = parsed_attr::<u32>(ctx, node, "spawnEvery")?;
    let move_every = parsed_attr::<u32>(ctx, node, "moveEvery")?;
    if spawn_every == 0 || move_every == 0 {
        return Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            "spawnEvery and moveEvery must be >= 1".to_string(),
            node,
        ));
    }

    let mut spawn_points = Vec::<(i32, i32)>::new();
    let mut pv_colors = Vec::<PvColorDef>::new();
    for child in element_children(node) {
        match child.tag_name().name() {
            "spawnPoint" => {
                check_attributes(ctx, child, &["x", "y"])?;
                let x = parsed_attr::<i32>(ctx, child, "x")?;
                let y = parsed_attr::<i32>(ctx, child, "y")?;
                if !(0..MAP_COLUMNS as i32).contains(&x) || !(0..MAP_ROWS as i32).contains(&y) {
                    return Err(ctx.error_at(
                        ContentErrorCode::InvalidValue,
                        format!("spawn point ({x}, {y}) is outside the grid"),
                        child,
                    ));
                }
                spawn_points.push((x, y));
            }
            "pvColor" => {
                check_attributes(ctx, child, &["min", "color"])?;
                pv_colors.push(PvColorDef {
                    min_pv: parsed_attr::<i32>(ctx, child, "min")?,
                    color: required_color_attr(ctx, child, "color")?,
                });
            }
            other => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownField,
                    format!("unknown field <{other}> in <spawner>"),
                    child,
                ))
            }
        }
    }
    if spawn_points.is_empty() {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            "spawner needs at least one <spawnPoint>".to_string(),
            node,
        ));
    }
    pv_colors.sort_by(|a, b| b.min_pv.cmp(&a.min_pv));

    Ok(SpawnerDef {
        symbol,
        pv,
        vulnerable: optional_parsed_attr::<bool>(ctx, node, "vulnerable")?.unwrap_or(true),
        spawn_every,
        max_targets: parsed_attr::<usize>(ctx, node, "maxTargets")?,
        move_every,
        seed: optional_parsed_attr::<u32>(ctx, node, "seed")?.unwrap_or(1),
        spawn_points,
        pv_colors,
    })
}

fn parse_string_table(
    ctx: DocContext<'_, '_>,
    root: Node<'_, '_>,
) -> Result<StringTable, ContentCompileError> {
    check_attributes(ctx, root, &["lang"])?;
    let mut table = StringTable {
        lang: required_attr(ctx, root, "lang")?.to_string(),
        ..StringTable::default()
    };

    for child in element_children(root) {
        let duplicate = match child.tag_name().name() {
            "string" => {
                check_attributes(ctx, child, &["key"])?;
                let key = required_attr(ctx, child, "key")?.to_string();
                let text = required_text(ctx, child, "string")?;
                table.strings.insert(key.clone(), text).map(|_| key)
            }
            "item" => {
                check_attributes(ctx, child, &["symbol", "genre"])?;
                let symbol = symbol_attr(ctx, child, "symbol")?;
                let genre = genre_attr(ctx, child)?;
                let text = required_text(ctx, child, "item")?;
                table
                    .items
                    .insert(symbol, ItemDescriptionDef { text, genre })
                    .map(|_| format!("item '{symbol}'"))
            }
            "gendered" => {
                check_attributes(ctx, child, &["key", "masculine", "feminine"])?;
                let key = required_attr(ctx, child, "key")?.to_string();
                let text = GenderedText {
                    masculine: child.attribute("masculine").unwrap_or_default().to_string(),
                    feminine: child.attribute("feminine").unwrap_or_default().to_string(),
                };
                table.gendered.insert(key.clone(), text).map(|_| key)
            }
            "gameover" => {
                check_attributes(ctx, child, &["symbol"])?;
                let symbol = symbol_attr(ctx, child, "symbol")?;
                let text = required_text(ctx, child, "gameover")?;
                table
                    .game_over
                    .insert(symbol, text)
                    .map(|_| format!("gameover '{symbol}'"))
            }
            other => {
                return Err(ctx.error_at(
                    ContentErrorCode::UnknownElement,
                    format!("unsupported element <{other}> in <Strings>"),
                    child,
                ))
            }
        };
        if let Some(key) = duplicate {
            return Err(ctx.error_at(
                ContentErrorCode::DuplicateDef,
                format!("duplicate entry {key} in <Strings lang=\"{}\">", table.lang),
                child,
            ));
        }
    }

    Ok(table)
}

fn parse_visibility(raw: &str) -> Option<ObstacleVisibilityDef> {
    let raw = raw.trim();
    if raw == "always" {
        return Some(ObstacleVisibilityDef::Always);
    }
    if let Some(symbol) = raw.strip_prefix("unless-weapon:") {
        let mut chars = symbol.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ObstacleVisibilityDef::UnlessWeapon(ch)),
            _ => None,
        };
    }
    if let Some(count) = raw.strip_prefix("unless-coins:") {
        return count.parse().ok().map(ObstacleVisibilityDef::UnlessCoins);
    }
    None
}

fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

fn check_attributes(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
    allowed: &[&str],
) -> Result<(), ContentCompileError> {
    for attribute in node.attributes() {
        if !allowed.contains(&attribute.name()) {
            return Err(ctx.error_at(
                ContentErrorCode::UnknownField,
                format!(
                    "unknown attribute '{}' on <{}>",
                    attribute.name(),
                    node.tag_name().name()
                ),
                node,
            ));
        }
    }
    Ok(())
}

fn required_attr<'a>(
    ctx: DocContext<'_, '_>,
    node: Node<'a, '_>,
    name: &str,
) -> Result<&'a str, ContentCompileError> {
    match node.attribute(name).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ctx.error_at(
            ContentErrorCode::MissingField,
            format!(
                "missing required attribute '{name}' on <{}>",
                node.tag_name().name()
            ),
            node,
        )),
    }
}

fn parsed_attr<T: FromStr>(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
    name: &str,
) -> Result<T, ContentCompileError> {
    let raw = required_attr(ctx, node, name)?;
    raw.parse::<T>().map_err(|_| {
        ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("attribute '{name}' has invalid value '{raw}'"),
            node,
        )
    })
}

fn optional_parsed_attr<T: FromStr>(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
    name: &str,
) -> Result<Option<T>, ContentCompileError> {
    if node.attribute(name).is_none() {
        return Ok(None);
    }
    parsed_attr(ctx, node, name).map(Some)
}

fn symbol_attr(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
    name: &str,
) -> Result<char, ContentCompileError> {
    let raw = node.attribute(name).unwrap_or_default();
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        (None, _) => Err(ctx.error_at(
            ContentErrorCode::MissingField,
            format!(
                "missing required attribute '{name}' on <{}>",
                node.tag_name().name()
            ),
            node,
        )),
        _ => Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("attribute '{name}' must be a single symbol, got '{raw}'"),
            node,
        )),
    }
}

fn required_color_attr(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
    name: &str,
) -> Result<Color, ContentCompileError> {
    let raw = required_attr(ctx, node, name)?;
    Color::from_hex(raw).ok_or_else(|| {
        ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("attribute '{name}' must be a #RRGGBB color, got '{raw}'"),
            node,
        )
    })
}

fn optional_color_attr(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
    name: &str,
) -> Result<Option<Color>, ContentCompileError> {
    if node.attribute(name).is_none() {
        return Ok(None);
    }
    required_color_attr(ctx, node, name).map(Some)
}

fn genre_attr(ctx: DocContext<'_, '_>, node: Node<'_, '_>) -> Result<Genre, ContentCompileError> {
    match required_attr(ctx, node, "genre")? {
        "M" => Ok(Genre::Masculine),
        "F" => Ok(Genre::Feminine),
        other => Err(ctx.error_at(
            ContentErrorCode::InvalidValue,
            format!("invalid genre '{other}'; allowed values: M, F"),
            node,
        )),
    }
}

fn required_text(
    ctx: DocContext<'_, '_>,
    node: Node<'_, '_>,
    field_name: &str,
) -> Result<String, ContentCompileError> {
    let value = node.text().map(str::trim).unwrap_or_default().to_string();
    if value.is_empty() {
        return Err(ctx.error_at(
            ContentErrorCode::MissingField,
            format!("field <{field_name}> must not be empty"),
            node,
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(raw: &str) -> Result<CompiledDocument, ContentCompileError> {
        compile_content_document(Path::new("assets/base/test.xml"), raw)
    }

    fn compile_maps(raw: &str) -> Vec<MapDef> {
        match compile(raw).expect("compile") {
            CompiledDocument::Maps(maps) => maps,
            other => panic!("expected maps, got {other:?}"),
        }
    }

    #[test]
    fn map_def_parses_overlays_and_pads_grid() {
        let maps = compile_maps(
            r##"<Maps>
                <MapDef name="bateau" ending="false">
                    <colors background="#101010" text="#FFFF00" obstacle="#8B4513"/>
                    <tile symbol="~" color="#3366FF"/>
                    <teleport symbol=">" map="plage"/>
                    <obstacle symbol="|" visible="unless-weapon:/"/>
                    <text lang="fr" x="2" y="1">Le bateau</text>
                    <grid><![CDATA[
#####
#.@>#
#####
]]></grid>
                </MapDef>
            </Maps>"##,
        );
        assert_eq!(maps.len(), 1);
        let map = &maps[0];
        assert_eq!(map.name, "bateau");
        assert_eq!(map.grid.len(), MAP_ROWS);
        assert!(map.grid.iter().all(|row| row.len() == MAP_COLUMNS));
        assert_eq!(map.grid[1][3], '>');
        assert_eq!(map.grid[1][10], ' ');
        assert_eq!(map.grid[5][0], ' ');
        assert_eq!(map.background_color, Color::rgb(16, 16, 16));
        assert_eq!(map.tile_colors.get(&'~'), Some(&Color::rgb(0x33, 0x66, 0xFF)));
        assert_eq!(map.teleports[0].destination_map, "plage");
        assert_eq!(
            map.obstacles[0].visibility,
            ObstacleVisibilityDef::UnlessWeapon('/')
        );
        assert_eq!(map.texts[0].text, "Le bateau");
        assert!(!map.ending);
    }

    #[test]
    fn missing_grid_reports_file_and_location() {
        let err = compile(r#"<Maps><MapDef name="a"></MapDef></Maps>"#).expect_err("err");
        assert_eq!(err.code, ContentErrorCode::MissingField);
        assert!(err.file_path.ends_with(Path::new("base").join("test.xml")));
        assert!(err.location.is_some());
    }

    #[test]
    fn unknown_field_errors() {
        let err = compile(
            r#"<Maps><MapDef name="a"><grid>...</grid><mood>Happy</mood></MapDef></Maps>"#,
        )
        .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::UnknownField);
    }

    #[test]
    fn unknown_attribute_errors() {
        let err = compile(r#"<Maps><MapDef name="a" size="big"><grid>...</grid></MapDef></Maps>"#)
            .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::UnknownField);
    }

    #[test]
    fn duplicate_grid_errors() {
        let err = compile(
            r#"<Maps><MapDef name="a"><grid>...</grid><grid>...</grid></MapDef></Maps>"#,
        )
        .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::DuplicateField);
    }

    #[test]
    fn oversized_grid_row_errors() {
        let row = ".".repeat(MAP_COLUMNS + 1);
        let raw = format!(r#"<Maps><MapDef name="a"><grid>{row}</grid></MapDef></Maps>"#);
        let err = compile(&raw).expect_err("err");
        assert_eq!(err.code, ContentErrorCode::InvalidGrid);
    }

    #[test]
    fn malformed_xml_reports_location() {
        let err = compile(r#"<Maps><MapDef name="a"></Maps>"#).expect_err("err");
        assert_eq!(err.code, ContentErrorCode::XmlMalformed);
        assert!(err.location.is_some());
    }

    #[test]
    fn invalid_root_errors() {
        let err = compile(r#"<Defs/>"#).expect_err("err");
        assert_eq!(err.code, ContentErrorCode::InvalidRoot);
    }

    #[test]
    fn same_file_duplicate_map_errors() {
        let err = compile(
            r#"<Maps>
                <MapDef name="a"><grid>...</grid></MapDef>
                <MapDef name="a"><grid>...</grid></MapDef>
            </Maps>"#,
        )
        .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::DuplicateDef);
    }

    #[test]
    fn spawner_parses_points_and_sorts_pv_colors() {
        let maps = compile_maps(
            r##"<Maps><MapDef name="a">
                <spawner symbol="O" pv="5" spawnEvery="4" maxTargets="2" moveEvery="2" seed="7">
                    <spawnPoint x="3" y="4"/>
                    <pvColor min="1" color="#FF0000"/>
                    <pvColor min="4" color="#FF7700"/>
                </spawner>
                <grid>...</grid>
            </MapDef></Maps>"##,
        );
        let spawner = maps[0].spawner.as_ref().expect("spawner");
        assert_eq!(spawner.symbol, 'O');
        assert!(spawner.vulnerable);
        assert_eq!(spawner.seed, 7);
        assert_eq!(spawner.spawn_points, vec![(3, 4)]);
        assert_eq!(spawner.pv_colors[0].min_pv, 4);
        assert_eq!(spawner.pv_colors[1].min_pv, 1);
    }

    #[test]
    fn spawner_without_points_errors() {
        let err = compile(
            r#"<Maps><MapDef name="a">
                <spawner symbol="O" pv="5" spawnEvery="4" maxTargets="2" moveEvery="2"/>
                <grid>...</grid>
            </MapDef></Maps>"#,
        )
        .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::MissingField);
    }

    #[test]
    fn invalid_obstacle_visibility_errors() {
        let err = compile(
            r#"<Maps><MapDef name="a"><obstacle symbol="|" visible="sometimes"/><grid>...</grid></MapDef></Maps>"#,
        )
        .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::InvalidValue);
    }

    #[test]
    fn string_table_keeps_gendered_spacing() {
        let doc = compile(
            r#"<Strings lang="fr">
                <string key="take">Prendre</string>
                <item symbol="*" genre="M">caillou</item>
                <item symbol="=" genre="F">baguette</item>
                <gendered key="taken" masculine=" pris" feminine=" prise"/>
                <gameover symbol="~">Vous vous êtes noyé!</gameover>
            </Strings>"#,
        )
        .expect("compile");
        let CompiledDocument::Strings(table) = doc else {
            panic!("expected strings");
        };
        assert_eq!(table.lang, "fr");
        assert_eq!(table.strings.get("take").map(String::as_str), Some("Prendre"));
        assert_eq!(table.items[&'='].genre, Genre::Feminine);
        assert_eq!(table.gendered["taken"].feminine, " prise");
        assert_eq!(table.game_over[&'~'], "Vous vous êtes noyé!");
    }

    #[test]
    fn string_table_duplicate_key_errors() {
        let err = compile(
            r#"<Strings lang="fr"><string key="a">x</string><string key="a">y</string></Strings>"#,
        )
        .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::DuplicateDef);
    }

    #[test]
    fn invalid_genre_errors() {
        let err = compile(r#"<Strings lang="fr"><item symbol="*" genre="N">x</item></Strings>"#)
            .expect_err("err");
        assert_eq!(err.code, ContentErrorCode::InvalidValue);
    }
}
