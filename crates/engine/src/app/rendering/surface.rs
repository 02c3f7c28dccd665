/// Width of one character cell on the reference canvas.
pub const CELL_WIDTH_PX: i32 = 8;
/// Height of one character cell on the reference canvas.
pub const CELL_HEIGHT_PX: i32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `#RGB`, case-insensitive.
    pub fn from_hex(raw: &str) -> Option<Self> {
        let digits = raw.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            6 => Some(Self::rgb(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            3 => {
                let mut channels = [0u8; 3];
                for (index, channel) in channels.iter_mut().enumerate() {
                    let nibble = u8::from_str_radix(&digits[index..index + 1], 16).ok()?;
                    *channel = nibble * 17;
                }
                Some(Self::rgb(channels[0], channels[1], channels[2]))
            }
            _ => None,
        }
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Drawing target in reference-canvas coordinates. Implementors map those
/// coordinates onto whatever pixels they own.
pub trait DrawSurface {
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color);

    /// One character cell painted over its own background.
    fn draw_sprite(&mut self, x: i32, y: i32, symbol: char, color: Color, background: Color) {
        self.draw_rect(x, y, CELL_WIDTH_PX, CELL_HEIGHT_PX, background);
        let mut buffer = [0u8; 4];
        self.draw_text(x, y, symbol.encode_utf8(&mut buffer), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_long_and_short_forms() {
        assert_eq!(Color::from_hex("#FF7700"), Some(Color::rgb(255, 119, 0)));
        assert_eq!(Color::from_hex("#dd99FF"), Some(Color::rgb(221, 153, 255)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
    }

    #[test]
    fn hex_rejects_malformed_values() {
        assert_eq!(Color::from_hex("FF7700"), None);
        assert_eq!(Color::from_hex("#FF77"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[derive(Default)]
    struct Recorder {
        rects: Vec<(i32, i32, i32, i32)>,
        texts: Vec<String>,
    }

    impl DrawSurface for Recorder {
        fn clear(&mut self, _color: Color) {}

        fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, _color: Color) {
            self.rects.push((x, y, width, height));
        }

        fn draw_text(&mut self, _x: i32, _y: i32, text: &str, _color: Color) {
            self.texts.push(text.to_string());
        }
    }

    #[test]
    fn sprite_paints_background_cell_then_symbol() {
        let mut recorder = Recorder::default();
        recorder.draw_sprite(16, 32, '@', Color::WHITE, Color::BLACK);
        assert_eq!(recorder.rects, vec![(16, 32, CELL_WIDTH_PX, CELL_HEIGHT_PX)]);
        assert_eq!(recorder.texts, vec!["@".to_string()]);
    }
}
