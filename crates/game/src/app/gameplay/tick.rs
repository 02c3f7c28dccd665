use labyrinth_engine::{Genre, InputAction, InputSnapshot};
use tracing::{debug, info, warn};

use super::combat::{apply_contact, detect_contact, TargetContact};
use super::entities::{ObjPos, ProjPos, DROPPED_WEAPON_USAGE};
use super::geometry::Position;
use super::i18n::{capitalize, keys, Localizer};
use super::level_map::{LevelMap, LevelMaps};
use super::movement::{
    direction_from_input, future_position, try_enter_or_exit, try_teleport, TeleportOutcome,
};
use super::projectiles::move_projectiles;
use super::state::PersistedData;
use super::symbols::{is_walkable, item_kind, weapon_damage, ItemKind, COIN, ROCK};

/// Read-only collaborators for one tick.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TickContext<'a> {
    pub maps: &'a LevelMaps,
    pub text: Localizer<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Continue,
    OpenMenu,
}

/// A running game: the working save, its last checkpoint, and the transient
/// HUD state that is never persisted.
#[derive(Debug, Clone)]
pub(crate) struct PlayState {
    pub persisted: PersistedData,
    last_save: PersistedData,
    pub status: String,
    pub throwing: bool,
    pub game_over: Option<String>,
}

impl PlayState {
    pub(crate) fn new(save: PersistedData) -> Self {
        Self {
            last_save: save.clone(),
            persisted: save,
            status: String::new(),
            throwing: false,
            game_over: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn last_save(&self) -> &PersistedData {
        &self.last_save
    }

    /// Resolves one key press. Branches are tried in priority order and the
    /// first that applies ends the tick.
    pub(crate) fn tick(&mut self, ctx: &TickContext<'_>, input: &InputSnapshot) -> TickOutcome {
        if self.game_over.is_some() {
            if input.is_down(InputAction::Acknowledge) {
                self.game_over = None;
                self.load_last_save();
            }
            return TickOutcome::Continue;
        }

        if input.is_down(InputAction::ToggleThrow) && self.persisted.rocks > 0 {
            self.throwing = !self.throwing;
            return TickOutcome::Continue;
        }

        if input.is_down(InputAction::Menu) {
            return TickOutcome::OpenMenu;
        }

        let Some(map) = ctx.maps.get(&self.persisted.current_map_name) else {
            warn!(map = %self.persisted.current_map_name, "current_map_missing");
            return TickOutcome::Continue;
        };
        let hero = self.persisted.hero_position;
        let direction = direction_from_input(input);
        let future = future_position(map, hero, direction);

        if let TeleportOutcome::Teleported { position, map_name } =
            try_enter_or_exit(ctx.maps, map, future.walkable)
        {
            self.change_map(&map_name, true);
            self.persisted.hero_position = position;
            self.checkpoint();
            return TickOutcome::Continue;
        }

        if input.is_down(InputAction::Interact) {
            self.pick_up_item(&ctx.text, hero);
            self.advance_world(ctx);
            return TickOutcome::Continue;
        }

        // Throw mode owns the tick while rocks remain, even without an aim.
        if self.throwing && self.persisted.rocks > 0 {
            self.status = thrown_status(&ctx.text);
            let aim = future.aim - hero;
            if !aim.is_zero() {
                let power = match item_kind(ROCK) {
                    Some(ItemKind::Throwable { power }) => power,
                    _ => 1,
                };
                if let Some(map_data) = self.persisted.current_map_data_mut() {
                    map_data.projectiles.push(ProjPos::new(hero, aim, ROCK, power));
                }
                self.persisted.rocks -= 1;
                self.throwing = false;
                self.advance_world(ctx);
            }
            return TickOutcome::Continue;
        }

        let contact = self.target_contact(map, future.aim, future.walkable, direction.is_zero());
        if !contact.is_none() {
            if let Some(map_data) = self.persisted.current_map_data_mut() {
                apply_contact(&mut map_data.spawner, contact);
            }
            let key = match contact {
                TargetContact::Hit { .. } => keys::HIT,
                _ => keys::PUSH,
            };
            self.status = ctx.text.text(key).to_string();
            self.advance_world(ctx);
            return TickOutcome::Continue;
        }

        if map.visible_obstacle_at(self.persisted.weapon, self.persisted.coins, future.walkable) {
            return TickOutcome::Continue;
        }

        match try_teleport(ctx.maps, map, hero, future.walkable) {
            TeleportOutcome::Teleported { position, map_name } => {
                self.change_map(&map_name, true);
                self.persisted.hero_position = position;
                self.move_targets_or_die(ctx);
                if self.game_over.is_none() {
                    self.checkpoint();
                }
            }
            TeleportOutcome::NoTeleport => {
                self.persisted.hero_position = future.walkable;
                self.update_current_status(&ctx.text, map);
                self.advance_world(ctx);
            }
        }
        TickOutcome::Continue
    }

    fn target_contact(
        &self,
        map: &LevelMap,
        aim: Position,
        walkable: Position,
        standing_still: bool,
    ) -> TargetContact {
        if standing_still {
            return TargetContact::None;
        }
        let Some(map_data) = self.persisted.current_map_data() else {
            return TargetContact::None;
        };
        let damage = weapon_damage(self.persisted.weapon);
        [aim, walkable]
            .into_iter()
            .map(|cell| detect_contact(map.target_spawner(), &map_data.spawner, cell, damage))
            .find(|contact| !contact.is_none())
            .unwrap_or(TargetContact::None)
    }

    fn advance_world(&mut self, ctx: &TickContext<'_>) {
        move_projectiles(&mut self.persisted, ctx.maps);
        self.move_targets_or_die(ctx);
    }

    /// Takes the first stack under the hero. Weapons swap with the equipped
    /// one, which is left behind as an unlimited stack.
    fn pick_up_item(&mut self, text: &Localizer<'_>, hero: Position) {
        let removed = self.persisted.current_map_data_mut().and_then(|map_data| {
            let (symbol, index) = map_data.item_at(hero)?;
            map_data
                .remove_item(symbol, index)
                .map(|stack| (symbol, stack))
        });
        let Some((symbol, stack)) = removed else {
            self.status.clear();
            return;
        };

        let amount = stack.usage.max(1) as u32;
        match item_kind(symbol) {
            Some(ItemKind::Weapon { .. }) => {
                if let Some(previous) = self.persisted.weapon.replace(symbol) {
                    if let Some(map_data) = self.persisted.current_map_data_mut() {
                        map_data.drop_item(previous, ObjPos::new(hero, DROPPED_WEAPON_USAGE));
                    }
                }
            }
            Some(ItemKind::Throwable { .. }) => {
                self.persisted.rocks = self.persisted.rocks.saturating_add(amount);
            }
            Some(ItemKind::Currency) => {
                self.persisted.coins = self.persisted.coins.saturating_add(amount);
            }
            Some(ItemKind::Spell { .. }) | None => {}
        }
        debug!(
            symbol = %symbol,
            usage = stack.usage,
            x = hero.x,
            y = hero.y,
            "item_picked_up"
        );

        let mut status = format!("> {}", capitalize(&text.item_text(symbol)));
        if stack.usage > 1 {
            status.push_str(&format!(" (x{})", stack.usage));
        }
        status.push_str(text.gendered(keys::TAKEN, text.item_genre(symbol)));
        self.status = status;
    }

    /// Status for the cell the hero just stepped on. Coins are collected on
    /// contact; anything else is previewed.
    fn update_current_status(&mut self, text: &Localizer<'_>, map: &LevelMap) {
        let hero = self.persisted.hero_position;
        let mut collected = 0;
        let mut status = String::new();

        if let Some(map_data) = self.persisted.current_map_data_mut() {
            match map_data.item_at(hero) {
                Some((COIN, index)) => {
                    if let Some(stack) = map_data.remove_item(COIN, index) {
                        collected = stack.usage.max(1) as u32;
                        status = format!(
                            "> {collected} {COIN}{}",
                            text.gendered(keys::TAKEN, Genre::Masculine)
                        );
                    }
                }
                Some((symbol, index)) => {
                    status = format!("{} {}", text.text(keys::TAKE), text.item_text(symbol));
                    let usage = map_data.items[&symbol][index].usage;
                    if usage > 1 {
                        status.push_str(&format!(" (x{usage})"));
                    }
                }
                None => {}
            }
        }

        self.persisted.coins = self.persisted.coins.saturating_add(collected);
        self.status = if map.is_ending() {
            text.text(keys::THANKS).to_string()
        } else {
            status
        };
    }

    /// Runs the spawner, if any, and resolves where the hero stands. Ending
    /// up on a non-walkable cell, pushed or teleported, ends the game.
    fn move_targets_or_die(&mut self, ctx: &TickContext<'_>) {
        let Some(map) = ctx.maps.get(&self.persisted.current_map_name) else {
            return;
        };
        let weapon = self.persisted.weapon;
        let coins = self.persisted.coins;
        let hero = self.persisted.hero_position;

        let pushed_to = match (map.target_spawner(), self.persisted.current_map_data_mut()) {
            (Some(spawner), Some(map_data)) => {
                let gated = |cell: Position| map.visible_obstacle_at(weapon, coins, cell);
                let is_free =
                    |cell: Position| is_walkable(map.get_symbol_at(cell)) && !gated(cell);
                spawner.update(&mut map_data.spawner, hero, &is_free, &gated)
            }
            _ => hero,
        };

        let symbol = map.get_symbol_at(pushed_to);
        if is_walkable(symbol) {
            self.persisted.hero_position = pushed_to;
        } else {
            info!(
                map = %self.persisted.current_map_name,
                symbol = %symbol,
                x = pushed_to.x,
                y = pushed_to.y,
                "game_over"
            );
            self.game_over = Some(ctx.text.game_over(symbol));
        }
    }

    fn change_map(&mut self, map_name: &str, reset_targets: bool) {
        info!(
            from = %self.persisted.current_map_name,
            to = %map_name,
            "map_changed"
        );
        self.persisted.current_map_name = map_name.to_string();
        if reset_targets {
            if let Some(map_data) = self.persisted.current_map_data_mut() {
                map_data.spawner.reset();
            }
        }
    }

    pub(crate) fn checkpoint(&mut self) {
        self.last_save = self.persisted.clone();
    }

    fn load_last_save(&mut self) {
        self.persisted = self.last_save.clone();
    }
}

fn thrown_status(text: &Localizer<'_>) -> String {
    let genre = text.item_genre(ROCK);
    format!(
        "> {}{}",
        capitalize(&text.item_text(ROCK)),
        text.gendered(keys::THROWN, genre)
    )
}
