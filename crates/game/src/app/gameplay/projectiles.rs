use std::mem;

use tracing::debug;

use super::combat::{apply_contact, detect_contact};
use super::entities::ObjPos;
use super::geometry::Position;
use super::level_map::{in_bounds, LevelMaps};
use super::movement::{try_teleport, TeleportOutcome};
use super::state::{PersistedData, PersistedMapData};
use super::symbols::is_walkable;

/// Advances every projectile on the current map by one step. Projectiles that
/// stop are turned into ground items, possibly on another map.
pub(crate) fn move_projectiles(data: &mut PersistedData, maps: &LevelMaps) {
    let Some(map) = maps.get(&data.current_map_name) else {
        return;
    };
    let Some(map_data) = data.map_data.get_mut(&data.current_map_name) else {
        return;
    };

    let mut crossings = Vec::<(String, char, Position)>::new();
    let mut still_flying = Vec::with_capacity(map_data.projectiles.len());

    for mut projectile in mem::take(&mut map_data.projectiles) {
        let here = projectile.position();
        let next = projectile.next_position();

        let struck = [here, next].into_iter().find_map(|cell| {
            let contact =
                detect_contact(map.target_spawner(), &map_data.spawner, cell, projectile.power);
            (!contact.is_none()).then_some((cell, contact))
        });
        if let Some((cell, contact)) = struck {
            apply_contact(&mut map_data.spawner, contact);
            projectile_to_item(map_data, projectile.symbol, cell);
            continue;
        }

        if !in_bounds(next) {
            if let TeleportOutcome::Teleported { position, map_name } =
                try_teleport(maps, map, here, here)
            {
                let beyond = position + projectile.velocity();
                let landing = match maps.get(&map_name) {
                    Some(destination) if is_walkable(destination.get_symbol_at(beyond)) => beyond,
                    _ => position,
                };
                crossings.push((map_name, projectile.symbol, landing));
                continue;
            }
        }

        if !is_walkable(map.get_symbol_at(next)) {
            projectile_to_item(map_data, projectile.symbol, here);
            continue;
        }

        projectile.x = next.x;
        projectile.y = next.y;
        still_flying.push(projectile);
    }
    map_data.projectiles = still_flying;

    for (map_name, symbol, landing) in crossings {
        debug!(
            map = %map_name,
            x = landing.x,
            y = landing.y,
            "projectile_crossed_map"
        );
        if let Some(destination) = data.map_data.get_mut(&map_name) {
            projectile_to_item(destination, symbol, landing);
        }
    }
}

/// Drops a spent projectile as a ground item, merging into a stack already
/// lying on that cell unless it is an unlimited weapon stack.
pub(crate) fn projectile_to_item(map_data: &mut PersistedMapData, symbol: char, at: Position) {
    let stacks = map_data.items.entry(symbol).or_default();
    match stacks
        .iter_mut()
        .find(|stack| stack.position() == at && !stack.is_unlimited())
    {
        Some(stack) => stack.usage += 1,
        None => stacks.push(ObjPos::new(at, 1)),
    }
}
