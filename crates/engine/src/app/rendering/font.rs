//! Built-in 3x5 bitmap font. Each glyph packs five 3-bit rows into the low
//! 15 bits of a `u16`, top row first.

pub(crate) const GLYPH_COLUMNS: i32 = 3;
pub(crate) const GLYPH_ROWS: i32 = 5;

const FIRST_PRINTABLE: u32 = 0x20;

#[rustfmt::skip]
const ASCII_GLYPHS: [u16; 95] = [
    0x0000, 0x2482, 0x5A00, 0x5F7D, 0x7DDF, 0x52A5, 0x2AAB, 0x2400,
    0x1491, 0x4494, 0x0AA8, 0x05D0, 0x0014, 0x01C0, 0x0002, 0x12A4,
    0x7B6F, 0x2C97, 0x73E7, 0x73CF, 0x5BC9, 0x79CF, 0x79EF, 0x7292,
    0x7BEF, 0x7BCF, 0x0410, 0x0414, 0x1511, 0x0E38, 0x4454, 0x72C2,
    0x7BE7, 0x2BED, 0x6BAE, 0x7927, 0x6B6E, 0x79A7, 0x79A4, 0x796F,
    0x5BED, 0x7497, 0x726F, 0x5BAD, 0x4927, 0x5FED, 0x5FFD, 0x7B6F,
    0x6BA4, 0x7B79, 0x6BAD, 0x79CF, 0x7492, 0x5B6F, 0x5B6A, 0x5BFD,
    0x5AAD, 0x5A92, 0x72A7, 0x6926, 0x4889, 0x324B, 0x2A00, 0x0007,
    0x4400, 0x0E7F, 0x49AE, 0x0F27, 0x13EF, 0x0FA7, 0x39A4, 0x0F79,
    0x49AD, 0x2092, 0x106A, 0x4BAD, 0x4927, 0x0DED, 0x0D6D, 0x0F6F,
    0x0D74, 0x0F79, 0x0D64, 0x0F8F, 0x2E93, 0x0B6F, 0x0B6A, 0x0B7A,
    0x0A95, 0x0B79, 0x0E57, 0x3593, 0x2492, 0x64D6, 0x0780,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph(u16);

impl Glyph {
    pub(crate) const BLANK: Glyph = Glyph(0);

    pub(crate) fn is_lit(self, column: i32, row: i32) -> bool {
        if !(0..GLYPH_COLUMNS).contains(&column) || !(0..GLYPH_ROWS).contains(&row) {
            return false;
        }
        let shift = (GLYPH_ROWS - 1 - row) * GLYPH_COLUMNS + (GLYPH_COLUMNS - 1 - column);
        self.0 & (1 << shift) != 0
    }
}

pub(crate) fn glyph_for(ch: char) -> Option<Glyph> {
    let folded = fold_to_ascii(ch);
    let code = folded as u32;
    if !(FIRST_PRINTABLE..=0x7E).contains(&code) {
        return None;
    }
    Some(Glyph(ASCII_GLYPHS[(code - FIRST_PRINTABLE) as usize]))
}

/// Maps the accented letters and arrows used by the string tables onto the
/// closest printable ASCII glyph.
pub(crate) fn fold_to_ascii(ch: char) -> char {
    match ch {
        'à' | 'â' | 'ä' | 'á' => 'a',
        'À' | 'Â' | 'Ä' | 'Á' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'î' | 'ï' | 'í' => 'i',
        'Î' | 'Ï' | 'Í' => 'I',
        'ô' | 'ö' | 'ó' => 'o',
        'Ô' | 'Ö' | 'Ó' => 'O',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'Ù' | 'Û' | 'Ü' | 'Ú' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        '’' | '‘' => '\'',
        '«' | '»' | '“' | '”' => '"',
        '⇧' | '↑' => '^',
        '↓' => 'v',
        '\u{a0}' => ' ',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_lookup_covers_ascii_printable_range() {
        for code in 32u8..=126u8 {
            let ch = char::from(code);
            assert!(
                glyph_for(ch).is_some(),
                "missing glyph for ASCII code {code} ('{ch}')"
            );
        }
    }

    #[test]
    fn control_characters_have_no_glyph() {
        assert!(glyph_for('\u{7f}').is_none());
        assert!(glyph_for('\n').is_none());
        assert!(glyph_for('☃').is_none());
    }

    #[test]
    fn accented_letters_fold_to_base_glyph() {
        assert_eq!(glyph_for('é'), glyph_for('e'));
        assert_eq!(glyph_for('À'), glyph_for('A'));
        assert_eq!(glyph_for('ç'), glyph_for('c'));
        assert_eq!(glyph_for('⇧'), glyph_for('^'));
    }

    #[test]
    fn space_is_blank_and_hash_is_lit() {
        let space = glyph_for(' ').expect("space");
        assert_eq!(space, Glyph::BLANK);

        let hash = glyph_for('#').expect("hash");
        assert!(hash.is_lit(0, 0));
        assert!(!hash.is_lit(1, 0));
        assert!(hash.is_lit(1, 1));
        assert!(!hash.is_lit(3, 0));
    }
}
