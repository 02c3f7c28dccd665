//! Frame drawing. Everything here reads state and never mutates it.

use labyrinth_engine::{
    Color, DrawSurface, InputAction, InputSnapshot, CELL_HEIGHT_PX, CELL_WIDTH_PX,
};

use super::geometry::Position;
use super::i18n::{capitalize, keys, Localizer};
use super::level_map::{LevelMap, COLUMNS, ROWS};
use super::menu::Menu;
use super::symbols::{BLANK, COIN, HEADER_ROWS, HERO, ROCK};
use super::tick::PlayState;

pub(crate) mod palette {
    use labyrinth_engine::Color;

    pub(crate) const DEFAULT_BACKGROUND: Color = Color::rgb(0x00, 0x00, 0x00);
    pub(crate) const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub(crate) const OVERLAY_NORMAL: Color = Color::rgb(0x55, 0x55, 0x55);
    pub(crate) const OVERLAY_HIGHLIGHT: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub(crate) const OVERLAY_SELECTED: Color = Color::rgb(0xFF, 0x00, 0xFF);
}

const BOX_LEFT: i32 = COLUMNS / 2 - 15;
const BOX_TOP: i32 = 10;
const BOX_WIDTH: i32 = 30;
const BOX_HEIGHT: i32 = 7;
const BOX_EDGE: &str = " **************************** ";
const BOX_SIDE: &str = "*                            *";
const MAIN_MENU_LEFT: i32 = COLUMNS / 2 - 7;
const GAME_MENU_LEFT: i32 = COLUMNS / 2 - 5;
const MENU_TOP: i32 = 12;
const HUD_TOP: i32 = ROWS + HEADER_ROWS + 1;

const ARROWS: [(InputAction, &str, i32, i32); 4] = [
    (InputAction::MoveUp, "^", COLUMNS - 8, 0),
    (InputAction::MoveLeft, "<", COLUMNS - 11, 1),
    (InputAction::MoveDown, "v", COLUMNS - 8, 1),
    (InputAction::MoveRight, ">", COLUMNS - 5, 1),
];

fn global_tile_color(symbol: char) -> Option<Color> {
    match symbol {
        '#' | '.' => Some(Color::rgb(0x64, 0x64, 0x64)),
        '~' => Some(Color::rgb(0xC8, 0xC8, 0xC8)),
        _ => None,
    }
}

fn character_color(symbol: char) -> Option<Color> {
    match symbol {
        HERO => Some(Color::rgb(0xFF, 0x00, 0x00)),
        'O' => Some(Color::rgb(0xFF, 0x77, 0x00)),
        _ => None,
    }
}

pub(crate) fn item_color(symbol: char) -> Color {
    match symbol {
        COIN => Color::rgb(0xFF, 0xFF, 0x00),
        '=' => Color::rgb(0xFF, 0x00, 0x00),
        ROCK => Color::rgb(0xDD, 0x99, 0xFF),
        '%' => Color::rgb(0x11, 0x99, 0x00),
        '/' => Color::rgb(0x22, 0x22, 0x22),
        '\\' => Color::rgb(0xAA, 0xAA, 0xAA),
        _ => palette::WHITE,
    }
}

fn projectile_color(symbol: char) -> Color {
    match symbol {
        ROCK => Color::rgb(0x99, 0x99, 0x99),
        '&' => Color::rgb(0xFF, 0x00, 0x00),
        _ => palette::WHITE,
    }
}

fn cell(x: i32, y: i32) -> (i32, i32) {
    (x * CELL_WIDTH_PX, y * CELL_HEIGHT_PX)
}

fn draw_text_at(surface: &mut dyn DrawSurface, x: i32, y: i32, text: &str, color: Color) {
    let (px, py) = cell(x, y);
    surface.draw_text(px, py, text, color);
}

/// A map cell below the header rows.
fn draw_map_sprite(
    surface: &mut dyn DrawSurface,
    x: i32,
    y: i32,
    symbol: char,
    color: Color,
    background: Color,
) {
    let (px, py) = cell(x, y + HEADER_ROWS);
    surface.draw_sprite(px, py, symbol, color, background);
}

/// Everything needed to draw one in-map frame.
pub(crate) struct PlayView<'a> {
    pub map: &'a LevelMap,
    pub play: &'a PlayState,
    pub input: &'a InputSnapshot,
    pub text: Localizer<'a>,
    pub lang: &'a str,
}

pub(crate) fn draw_play(surface: &mut dyn DrawSurface, view: &PlayView<'_>) {
    surface.clear(view.map.background_color);
    draw_map(surface, view);
    draw_world(surface, view);
    draw_overlay(surface, view);
    if let Some(message) = &view.play.game_over {
        draw_box(surface, view.map.background_color);
        let retry = view.text.text(keys::RETRY);
        draw_centered(surface, message, BOX_TOP + 2);
        draw_centered(surface, retry, BOX_TOP + 4);
    }
}

/// Paints runs of identical symbols in one pass per run.
fn draw_map(surface: &mut dyn DrawSurface, view: &PlayView<'_>) {
    let map = view.map;
    for y in 0..ROWS {
        let mut x = 0;
        while x < COLUMNS {
            let symbol = map.get_symbol_at(Position::new(x, y));
            if symbol == BLANK {
                x += 1;
                continue;
            }
            let mut length = 1;
            while x + length < COLUMNS
                && map.get_symbol_at(Position::new(x + length, y)) == symbol
            {
                length += 1;
            }

            let color = map
                .tile_color(symbol)
                .or_else(|| global_tile_color(symbol))
                .unwrap_or(map.text_color);
            let run = symbol.to_string().repeat(length as usize);
            let (px, py) = cell(x, y + HEADER_ROWS);
            surface.draw_rect(px, py, length * CELL_WIDTH_PX, CELL_HEIGHT_PX, map.background_color);
            surface.draw_text(px, py, &run, color);
            x += length;
        }
    }

    for label in map.texts(view.lang) {
        draw_text_at(surface, label.x, label.y, &label.text, map.text_color);
    }
}

fn draw_world(surface: &mut dyn DrawSurface, view: &PlayView<'_>) {
    let map = view.map;
    let data = &view.play.persisted;
    let background = map.background_color;
    let Some(map_data) = data.current_map_data() else {
        return;
    };

    for (symbol, stacks) in &map_data.items {
        for stack in stacks {
            draw_map_sprite(surface, stack.x, stack.y, *symbol, item_color(*symbol), background);
        }
    }

    let hero_color = character_color(HERO).unwrap_or(map.text_color);
    let hero = data.hero_position;
    draw_map_sprite(surface, hero.x, hero.y, HERO, hero_color, background);

    for projectile in &map_data.projectiles {
        draw_map_sprite(
            surface,
            projectile.x,
            projectile.y,
            projectile.symbol,
            projectile_color(projectile.symbol),
            background,
        );
    }

    if let Some(spawner) = map.target_spawner() {
        for target in &map_data.spawner.targets {
            let color = spawner
                .pv_color(target.pv)
                .or_else(|| character_color(target.symbol))
                .unwrap_or(map.text_color);
            draw_map_sprite(surface, target.x, target.y, target.symbol, color, background);
        }
    }

    for (symbol, positions) in map.obstacles() {
        if !map.obstacle_visible(data.weapon, data.coins, symbol) {
            continue;
        }
        for position in positions {
            draw_map_sprite(
                surface,
                position.x,
                position.y,
                symbol,
                map.obstacle_color,
                background,
            );
        }
    }
}

fn draw_overlay(surface: &mut dyn DrawSurface, view: &PlayView<'_>) {
    let play = view.play;
    let data = &play.persisted;
    let text = &view.text;

    draw_text_at(surface, 2, 1, &play.status, palette::WHITE);

    let money = format!("{} {COIN}", data.coins);
    let money_x = COLUMNS - money.chars().count() as i32 - 7;
    draw_text_at(surface, money_x, 1, &money, item_color(COIN));
    draw_text_at(surface, COLUMNS - 6, 1, "[esc]", palette::OVERLAY_NORMAL);

    for (action, arrow, x, dy) in ARROWS {
        let color = if play.throwing {
            palette::OVERLAY_SELECTED
        } else if view.input.is_down(action) {
            palette::OVERLAY_HIGHLIGHT
        } else {
            palette::OVERLAY_NORMAL
        };
        draw_text_at(surface, x, HUD_TOP + dy, arrow, color);
    }

    if let Some(weapon) = data.weapon {
        let line = format!("- {}", capitalize(&text.item_text(weapon)));
        draw_text_at(surface, 3, HUD_TOP, &line, palette::OVERLAY_HIGHLIGHT);
    }

    if data.rocks > 0 {
        let line = format!("- {} (x{})", capitalize(&text.item_text(ROCK)), data.rocks);
        draw_text_at(surface, 3, HUD_TOP + 1, &line, palette::OVERLAY_HIGHLIGHT);

        let hint = format!("⇧ {}", text.text(keys::THROW_HINT));
        let color = if play.throwing {
            palette::OVERLAY_SELECTED
        } else {
            palette::OVERLAY_HIGHLIGHT
        };
        let (px, py) = cell(29, HUD_TOP + 1);
        surface.draw_text(px - 2, py, &hint, color);
    }
}

fn draw_box(surface: &mut dyn DrawSurface, background: Color) {
    let (px, py) = cell(BOX_LEFT, BOX_TOP);
    surface.draw_rect(
        px,
        py,
        BOX_WIDTH * CELL_WIDTH_PX,
        BOX_HEIGHT * CELL_HEIGHT_PX,
        background,
    );
    draw_text_at(surface, BOX_LEFT, BOX_TOP, BOX_EDGE, palette::OVERLAY_HIGHLIGHT);
    for row in BOX_TOP + 1..BOX_TOP + BOX_HEIGHT - 1 {
        draw_text_at(surface, BOX_LEFT, row, BOX_SIDE, palette::OVERLAY_HIGHLIGHT);
    }
    draw_text_at(
        surface,
        BOX_LEFT,
        BOX_TOP + BOX_HEIGHT - 1,
        BOX_EDGE,
        palette::OVERLAY_HIGHLIGHT,
    );
}

fn draw_centered(surface: &mut dyn DrawSurface, text: &str, row: i32) {
    let x = COLUMNS / 2 - text.chars().count() as i32 / 2;
    draw_text_at(surface, x, row, text, palette::OVERLAY_HIGHLIGHT);
}

fn draw_menu_entries(surface: &mut dyn DrawSurface, menu: &Menu, text: &Localizer<'_>, left: i32) {
    for (index, entry) in menu.entries().iter().enumerate() {
        let label = text.text(entry.label_key);
        let (line, x) = if index == menu.cursor() {
            (format!("> {label}"), left)
        } else {
            (label.to_string(), left + 2)
        };
        let color = if entry.enabled {
            palette::OVERLAY_HIGHLIGHT
        } else {
            palette::OVERLAY_NORMAL
        };
        draw_text_at(surface, x, MENU_TOP + index as i32, &line, color);
    }
}

pub(crate) fn draw_main_menu(surface: &mut dyn DrawSurface, menu: &Menu, text: &Localizer<'_>) {
    surface.clear(palette::DEFAULT_BACKGROUND);
    draw_menu_entries(surface, menu, text, MAIN_MENU_LEFT);
}

/// Drawn over an in-map frame.
pub(crate) fn draw_pause_menu(
    surface: &mut dyn DrawSurface,
    menu: &Menu,
    text: &Localizer<'_>,
    background: Color,
) {
    draw_box(surface, background);
    draw_menu_entries(surface, menu, text, GAME_MENU_LEFT);
}
