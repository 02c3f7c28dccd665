use super::i18n::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuAction {
    NewGame,
    Continue,
    ToggleLanguage,
    Save,
    Load,
    ExitToMainMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MenuEntry {
    pub label_key: &'static str,
    pub enabled: bool,
    pub action: MenuAction,
}

impl MenuEntry {
    const fn new(label_key: &'static str, enabled: bool, action: MenuAction) -> Self {
        Self {
            label_key,
            enabled,
            action,
        }
    }
}

/// A vertical list with a cursor that only rests on enabled rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Menu {
    entries: Vec<MenuEntry>,
    cursor: usize,
}

impl Menu {
    /// Title-screen menu; the cursor starts on "continue" when a save exists.
    pub(crate) fn main(save_available: bool) -> Self {
        Self {
            entries: vec![
                MenuEntry::new(keys::NEW_GAME, true, MenuAction::NewGame),
                MenuEntry::new(keys::CONTINUE, save_available, MenuAction::Continue),
                MenuEntry::new(keys::LANGUAGE, true, MenuAction::ToggleLanguage),
            ],
            cursor: usize::from(save_available),
        }
    }

    pub(crate) fn game(save_available: bool) -> Self {
        Self {
            entries: vec![
                MenuEntry::new(keys::SAVE, true, MenuAction::Save),
                MenuEntry::new(keys::LOAD, save_available, MenuAction::Load),
                MenuEntry::new(keys::EXIT, true, MenuAction::ExitToMainMenu),
            ],
            cursor: 0,
        }
    }

    pub(crate) fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn move_up(&mut self) {
        if let Some(index) = (0..self.cursor).rev().find(|index| self.entries[*index].enabled) {
            self.cursor = index;
        }
    }

    pub(crate) fn move_down(&mut self) {
        if let Some(index) =
            (self.cursor + 1..self.entries.len()).find(|index| self.entries[*index].enabled)
        {
            self.cursor = index;
        }
    }

    /// Re-evaluates save-dependent rows. A cursor left on a row that just
    /// became disabled falls back to the first row.
    pub(crate) fn refresh(&mut self, save_available: bool) {
        for entry in &mut self.entries {
            if matches!(entry.action, MenuAction::Continue | MenuAction::Load) {
                entry.enabled = save_available;
            }
        }
        if !self.entries.get(self.cursor).is_some_and(|entry| entry.enabled) {
            self.cursor = 0;
        }
    }

    /// The highlighted action, if its row is enabled.
    pub(crate) fn selected(&self) -> Option<MenuAction> {
        self.entries
            .get(self.cursor)
            .filter(|entry| entry.enabled)
            .map(|entry| entry.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_menu_cursor_prefers_continue() {
        assert_eq!(Menu::main(true).cursor(), 1);
        assert_eq!(Menu::main(true).selected(), Some(MenuAction::Continue));
        assert_eq!(Menu::main(false).cursor(), 0);
        assert_eq!(Menu::main(false).selected(), Some(MenuAction::NewGame));
    }

    #[test]
    fn navigation_skips_disabled_rows() {
        let mut menu = Menu::main(false);
        menu.move_down();
        assert_eq!(menu.selected(), Some(MenuAction::ToggleLanguage));
        menu.move_up();
        assert_eq!(menu.selected(), Some(MenuAction::NewGame));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut menu = Menu::game(true);
        menu.move_up();
        assert_eq!(menu.cursor(), 0);
        menu.move_down();
        menu.move_down();
        menu.move_down();
        assert_eq!(menu.selected(), Some(MenuAction::ExitToMainMenu));
    }

    #[test]
    fn refresh_toggles_save_rows_and_rescues_cursor() {
        let mut menu = Menu::game(true);
        menu.move_down();
        assert_eq!(menu.selected(), Some(MenuAction::Load));

        menu.refresh(false);
        assert!(!menu.entries()[1].enabled);
        assert_eq!(menu.selected(), Some(MenuAction::Save));

        menu.refresh(true);
        assert!(menu.entries()[1].enabled);
    }
}
