use labyrinth_engine::{InputAction, InputSnapshot};

use super::geometry::{Offset, Position};
use super::level_map::{paired_index, paired_symbol, LevelMap, LevelMaps, TeleportPos};
use super::symbols::{is_stairs, is_walkable, WALL};

/// Where the hero would go this tick. `walkable` already has the wall slide
/// applied; `aim` is the raw step used for throwing and hitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FutureMove {
    pub walkable: Position,
    pub aim: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TeleportOutcome {
    NoTeleport,
    Teleported { position: Position, map_name: String },
}

pub(crate) fn direction_from_input(input: &InputSnapshot) -> Offset {
    let mut direction = Offset::ZERO;
    if input.is_down(InputAction::MoveDown) {
        direction.dy += 1;
    }
    if input.is_down(InputAction::MoveUp) {
        direction.dy -= 1;
    }
    if input.is_down(InputAction::MoveLeft) {
        direction.dx -= 1;
    }
    if input.is_down(InputAction::MoveRight) {
        direction.dx += 1;
    }
    direction
}

/// Full step first, then vertical-only, then horizontal-only, else stay.
pub(crate) fn future_position(map: &LevelMap, hero: Position, direction: Offset) -> FutureMove {
    let aim = hero + direction;
    let mut candidates = vec![aim];
    if direction.dy != 0 {
        candidates.push(Position::new(hero.x, aim.y));
    }
    if direction.dx != 0 && direction.dy != 0 {
        candidates.push(Position::new(aim.x, hero.y));
    }

    let walkable = candidates
        .into_iter()
        .find(|candidate| is_walkable(map.get_symbol_at(*candidate)))
        .unwrap_or(hero);
    FutureMove { walkable, aim }
}

/// Stairs resolve on the cell itself with no momentum.
pub(crate) fn try_enter_or_exit(maps: &LevelMaps, map: &LevelMap, at: Position) -> TeleportOutcome {
    let symbol = map.get_symbol_at(at);
    if !is_stairs(symbol) {
        return TeleportOutcome::NoTeleport;
    }
    let source = TeleportPos {
        position: at,
        id: 0,
    };
    do_teleport(maps, map, symbol, source, at, at)
}

/// Numbered teleporter on the stepped-to cell, carrying the step as momentum.
pub(crate) fn try_teleport(
    maps: &LevelMaps,
    map: &LevelMap,
    from: Position,
    to: Position,
) -> TeleportOutcome {
    match map.numbered_teleport_at(to) {
        Some((symbol, source)) => do_teleport(maps, map, symbol, source, from, to),
        None => TeleportOutcome::NoTeleport,
    }
}

pub(crate) fn do_teleport(
    maps: &LevelMaps,
    map: &LevelMap,
    symbol: char,
    source: TeleportPos,
    from: Position,
    to: Position,
) -> TeleportOutcome {
    let Some(map_name) = map.teleport_map(symbol) else {
        return TeleportOutcome::NoTeleport;
    };
    let Some(destination) = maps.get(map_name) else {
        return TeleportOutcome::NoTeleport;
    };
    let Some(paired) = destination
        .teleports(paired_symbol(symbol))
        .get(paired_index(symbol, source.id))
    else {
        return TeleportOutcome::NoTeleport;
    };

    let anchor = paired.position;
    let mut landing = anchor + (to - from);
    if destination.get_symbol_at(landing) == WALL {
        if destination.get_symbol_at(Position::new(anchor.x, landing.y)) == WALL {
            landing.y = anchor.y;
        } else {
            landing.x = anchor.x;
        }
    }

    TeleportOutcome::Teleported {
        position: landing,
        map_name: map_name.to_string(),
    }
}
