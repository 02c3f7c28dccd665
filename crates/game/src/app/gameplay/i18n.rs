use labyrinth_engine::{ContentDatabase, Genre, ItemDescriptionDef, StringTable};

use super::state::DEFAULT_LANGUAGE;

pub(crate) const LANGUAGES: [&str; 2] = ["fr", "en"];

/// Semantic keys looked up in `<Strings>` tables.
pub(crate) mod keys {
    pub(crate) const TAKE: &str = "take";
    pub(crate) const TAKEN: &str = "taken";
    pub(crate) const THROWN: &str = "thrown";
    pub(crate) const THROW_HINT: &str = "throw";
    pub(crate) const RETRY: &str = "retry";
    pub(crate) const THANKS: &str = "thanks";
    pub(crate) const HIT: &str = "hit";
    pub(crate) const PUSH: &str = "push";
    pub(crate) const GAME_OVER: &str = "game_over";
    pub(crate) const NEW_GAME: &str = "new_game";
    pub(crate) const CONTINUE: &str = "continue";
    pub(crate) const LOAD: &str = "load";
    pub(crate) const SAVE: &str = "save";
    pub(crate) const EXIT: &str = "exit";
    pub(crate) const LANGUAGE: &str = "language";
}

/// Read-only view over one language's strings. Missing keys fall back to the
/// key itself so a gap in a table never blanks the screen.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Localizer<'a> {
    table: Option<&'a StringTable>,
}

impl<'a> Localizer<'a> {
    pub(crate) fn new(content: &'a ContentDatabase, lang: &str) -> Self {
        Self {
            table: content
                .strings(lang)
                .or_else(|| content.strings(DEFAULT_LANGUAGE)),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_table(table: &'a StringTable) -> Self {
        Self { table: Some(table) }
    }

    pub(crate) fn text(&self, key: &'a str) -> &'a str {
        self.table
            .and_then(|table| table.strings.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub(crate) fn item(&self, symbol: char) -> Option<&'a ItemDescriptionDef> {
        self.table.and_then(|table| table.items.get(&symbol))
    }

    /// Item text with the article, or the bare symbol when undescribed.
    pub(crate) fn item_text(&self, symbol: char) -> String {
        self.item(symbol)
            .map(|item| item.text.clone())
            .unwrap_or_else(|| symbol.to_string())
    }

    pub(crate) fn item_genre(&self, symbol: char) -> Genre {
        self.item(symbol)
            .map(|item| item.genre)
            .unwrap_or(Genre::Masculine)
    }

    pub(crate) fn gendered(&self, key: &str, genre: Genre) -> &'a str {
        self.table
            .and_then(|table| table.gendered.get(key))
            .map(|text| text.for_genre(genre))
            .unwrap_or("")
    }

    pub(crate) fn game_over(&self, symbol: char) -> String {
        self.table
            .and_then(|table| table.game_over.get(&symbol))
            .cloned()
            .unwrap_or_else(|| self.text(keys::GAME_OVER).to_string())
    }
}

pub(crate) fn next_language(current: &str) -> &'static str {
    let index = LANGUAGES
        .iter()
        .position(|lang| *lang == current)
        .unwrap_or(0);
    LANGUAGES[(index + 1) % LANGUAGES.len()]
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
