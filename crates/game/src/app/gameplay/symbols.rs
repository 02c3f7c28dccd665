//! Grid symbol vocabulary shared by the map loader, the tick engine and the view.

pub(crate) const FLOOR: char = '.';
pub(crate) const WALL: char = '#';
pub(crate) const BLANK: char = ' ';
pub(crate) const HERO: char = '@';
pub(crate) const STAIRS_DOWN: char = '>';
pub(crate) const STAIRS_UP: char = '<';
pub(crate) const ROCK: char = '*';
pub(crate) const COIN: char = '$';

/// Rows reserved above the grid for the status line and currency.
pub(crate) const HEADER_ROWS: i32 = 3;

const WALKABLE: [char; 3] = [FLOOR, STAIRS_UP, STAIRS_DOWN];

pub(crate) fn is_walkable(symbol: char) -> bool {
    WALKABLE.contains(&symbol)
}

pub(crate) fn is_stairs(symbol: char) -> bool {
    symbol == STAIRS_UP || symbol == STAIRS_DOWN
}

pub(crate) fn is_numbered_teleport(symbol: char) -> bool {
    symbol.is_ascii_digit()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemKind {
    /// Swapped into the single weapon slot.
    Weapon { damage: i32 },
    /// Added to the throwable count; thrown for `power` damage.
    Throwable { power: i32 },
    Currency,
    /// Picked up and consumed; charges are not tracked yet.
    Spell { charges: u32 },
}

pub(crate) fn item_kind(symbol: char) -> Option<ItemKind> {
    match symbol {
        '/' => Some(ItemKind::Weapon { damage: 1 }),
        '\\' => Some(ItemKind::Weapon { damage: 5 }),
        ROCK => Some(ItemKind::Throwable { power: 1 }),
        COIN => Some(ItemKind::Currency),
        '=' => Some(ItemKind::Spell { charges: 10 }),
        _ => None,
    }
}

pub(crate) fn is_item(symbol: char) -> bool {
    item_kind(symbol).is_some()
}

/// Damage dealt by the equipped weapon; bare hands deal none.
pub(crate) fn weapon_damage(weapon: Option<char>) -> i32 {
    match weapon.and_then(item_kind) {
        Some(ItemKind::Weapon { damage }) => damage,
        _ => 0,
    }
}
