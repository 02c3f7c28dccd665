use labyrinth_engine::{ContentDatabase, DrawSurface, InputAction, InputSnapshot, Scene};
use tracing::{info, warn};

use super::i18n::{next_language, Localizer};
use super::level_map::{LevelMaps, MapLoadError};
use super::menu::{Menu, MenuAction};
use super::save::{encode_save, load_save};
use super::state::{PersistedData, PersonalSettings};
use super::storage::{SaveStore, PERSONAL_SLOT, SAVE_SLOT};
use super::tick::{PlayState, TickContext, TickOutcome};
use super::view::{draw_main_menu, draw_pause_menu, draw_play, PlayView};

const WINDOW_TITLE: &str = "Labyrinth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionMode {
    MainMenu,
    Paused,
    Playing,
}

/// The whole game: immutable content, the save store, and whichever of the
/// title menu, pause menu or map is active.
pub(crate) struct Session {
    content: ContentDatabase,
    maps: LevelMaps,
    initial: PersistedData,
    store: Box<dyn SaveStore>,
    personal: PersonalSettings,
    mode: SessionMode,
    menu: Menu,
    play: Option<PlayState>,
    last_input: InputSnapshot,
}

impl Session {
    pub(crate) fn new(
        content: ContentDatabase,
        store: Box<dyn SaveStore>,
    ) -> Result<Self, MapLoadError> {
        let maps = LevelMaps::from_content(&content)?;
        let initial = PersistedData::initial(&maps)?;
        let personal = read_personal_settings(store.as_ref());
        let mut session = Self {
            content,
            maps,
            initial,
            store,
            personal,
            mode: SessionMode::MainMenu,
            menu: Menu::main(false),
            play: None,
            last_input: InputSnapshot::empty(),
        };
        session.menu = Menu::main(session.saved_game().is_some());
        Ok(session)
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> SessionMode {
        self.mode
    }

    #[cfg(test)]
    pub(crate) fn menu(&self) -> &Menu {
        &self.menu
    }

    #[cfg(test)]
    pub(crate) fn play(&self) -> Option<&PlayState> {
        self.play.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn personal(&self) -> &PersonalSettings {
        &self.personal
    }

    fn fingerprint(&self) -> &str {
        &self.content.fingerprint().hash_hex
    }

    /// The stored game if it is readable and matches the loaded content.
    fn saved_game(&self) -> Option<PersistedData> {
        match load_save(self.store.as_ref(), &self.maps, self.fingerprint()) {
            Ok(save) => save,
            Err(error) => {
                warn!(
                    slot = %self.store.describe(SAVE_SLOT),
                    error = %error,
                    "save_rejected"
                );
                None
            }
        }
    }

    fn update_menu(&mut self, input: &InputSnapshot) {
        if input.is_down(InputAction::MoveUp) {
            self.menu.move_up();
        }
        if input.is_down(InputAction::MoveDown) {
            self.menu.move_down();
        }
        if input.is_down(InputAction::Interact) {
            if let Some(action) = self.menu.selected() {
                self.dispatch(action);
            }
        }
        if self.mode == SessionMode::Paused && input.is_down(InputAction::Menu) {
            self.mode = SessionMode::Playing;
        }
    }

    fn dispatch(&mut self, action: MenuAction) {
        match action {
            MenuAction::NewGame => self.start(self.initial.clone()),
            MenuAction::Continue | MenuAction::Load => match self.saved_game() {
                Some(save) => self.start(save),
                None => self.menu.refresh(false),
            },
            MenuAction::ToggleLanguage => self.toggle_language(),
            MenuAction::Save => self.save_game(),
            MenuAction::ExitToMainMenu => self.open_main_menu(),
        }
    }

    fn start(&mut self, save: PersistedData) {
        info!(map = %save.current_map_name, "game_started");
        self.play = Some(PlayState::new(save));
        self.mode = SessionMode::Playing;
    }

    fn open_main_menu(&mut self) {
        self.play = None;
        self.menu = Menu::main(self.saved_game().is_some());
        self.mode = SessionMode::MainMenu;
    }

    fn save_game(&mut self) {
        if let Some(play) = &self.play {
            let written = encode_save(&play.persisted, self.fingerprint()).and_then(|json| {
                self.store.write(SAVE_SLOT, &json)?;
                Ok(())
            });
            match written {
                Ok(()) => info!(
                    slot = %self.store.describe(SAVE_SLOT),
                    map = %play.persisted.current_map_name,
                    "save_written"
                ),
                Err(error) => warn!(error = %error, "save_failed"),
            }
        }
        self.mode = SessionMode::Playing;
    }

    fn toggle_language(&mut self) {
        self.personal.lang = next_language(&self.personal.lang).to_string();
        info!(lang = %self.personal.lang, "language_changed");
        match serde_json::to_string(&self.personal) {
            Ok(json) => {
                if let Err(error) = self.store.write(PERSONAL_SLOT, &json) {
                    warn!(error = %error, "personal_settings_write_failed");
                }
            }
            Err(error) => warn!(error = %error, "personal_settings_encode_failed"),
        }
    }

    fn update_play(&mut self, input: &InputSnapshot) {
        let Some(play) = self.play.as_mut() else {
            self.open_main_menu();
            return;
        };
        let ctx = TickContext {
            maps: &self.maps,
            text: Localizer::new(&self.content, &self.personal.lang),
        };
        if play.tick(&ctx, input) == TickOutcome::OpenMenu {
            self.menu = Menu::game(self.saved_game().is_some());
            self.mode = SessionMode::Paused;
        }
    }
}

fn read_personal_settings(store: &dyn SaveStore) -> PersonalSettings {
    let raw = match store.read(PERSONAL_SLOT) {
        Ok(Some(raw)) => raw,
        Ok(None) => return PersonalSettings::default(),
        Err(error) => {
            warn!(error = %error, "personal_settings_unreadable");
            return PersonalSettings::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(settings) => settings,
        Err(error) => {
            warn!(
                slot = %store.describe(PERSONAL_SLOT),
                error = %error,
                "personal_settings_invalid"
            );
            PersonalSettings::default()
        }
    }
}

impl Scene for Session {
    fn load(&mut self) {
        info!(
            maps = self.content.map_count(),
            lang = %self.personal.lang,
            "session_loaded"
        );
    }

    fn update(&mut self, input: &InputSnapshot) {
        self.last_input = *input;
        match self.mode {
            SessionMode::MainMenu | SessionMode::Paused => self.update_menu(input),
            SessionMode::Playing => self.update_play(input),
        }
    }

    fn render(&self, surface: &mut dyn DrawSurface) {
        let text = Localizer::new(&self.content, &self.personal.lang);
        let Some(play) = self.play.as_ref().filter(|_| self.mode != SessionMode::MainMenu) else {
            draw_main_menu(surface, &self.menu, &text);
            return;
        };
        let Some(map) = self.maps.get(&play.persisted.current_map_name) else {
            draw_main_menu(surface, &self.menu, &text);
            return;
        };

        draw_play(
            surface,
            &PlayView {
                map,
                play,
                input: &self.last_input,
                text,
                lang: &self.personal.lang,
            },
        );
        if self.mode == SessionMode::Paused {
            draw_pause_menu(surface, &self.menu, &text, map.background_color);
        }
    }

    fn window_title(&self) -> Option<String> {
        match (&self.play, self.mode) {
            (Some(play), SessionMode::Playing | SessionMode::Paused) => Some(format!(
                "{WINDOW_TITLE} - {}",
                play.persisted.current_map_name
            )),
            _ => Some(WINDOW_TITLE.to_string()),
        }
    }
}
