//! Standard Helvetica faces and their glyph metrics.
//!
//! Labels use the PDF base-14 Helvetica family, so no font program is
//! embedded; text widths come from the Adobe AFM advance widths (units of
//! 1/1000 em) for every WinAnsi code.

/// Advance widths for bytes 0x20..=0x7E in Helvetica (shared by Helvetica-Oblique)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Advance widths for bytes 0x20..=0x7E in Helvetica-Bold
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance widths for bytes 0x80..=0xFF in Helvetica; 0 marks codes WinAnsi leaves undefined
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, // 0x80
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

/// Advance widths for bytes 0x80..=0xFF in Helvetica-Bold
const HELVETICA_BOLD_HIGH_WIDTHS: [u16; 128] = [
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
    Oblique,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Oblique];

    /// PostScript name of the base-14 font
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
            Font::Oblique => "Helvetica-Oblique",
        }
    }

    /// Name of the font in each page's resource dictionary
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Oblique => "F3",
        }
    }

    fn byte_width(self, byte: u8) -> u16 {
        let (low, high) = match self {
            Font::Regular | Font::Oblique => (&HELVETICA_WIDTHS, &HELVETICA_HIGH_WIDTHS),
            Font::Bold => (&HELVETICA_BOLD_WIDTHS, &HELVETICA_BOLD_HIGH_WIDTHS),
        };
        match byte {
            0x20..=0x7e => low[(byte - 0x20) as usize],
            0x80..=0xff => high[(byte - 0x80) as usize],
            _ => 0,
        }
    }
}

/// Characters WinAnsi places in 0x80..=0x9F, with their codes
const WIN_ANSI_EXTRAS: [(char, u8); 27] = [
    ('\u{20ac}', 0x80),
    ('\u{201a}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201e}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02c6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8a),
    ('\u{2039}', 0x8b),
    ('\u{0152}', 0x8c),
    ('\u{017d}', 0x8e),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201c}', 0x93),
    ('\u{201d}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02dc}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9a),
    ('\u{203a}', 0x9b),
    ('\u{0153}', 0x9c),
    ('\u{017e}', 0x9e),
    ('\u{0178}', 0x9f),
];

fn win_ansi_byte(c: char) -> Option<u8> {
    match c as u32 {
        0x20..=0x7e | 0xa0..=0xff => Some(c as u32 as u8),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|&&(extra, _)| extra == c)
            .map(|&(_, byte)| byte),
    }
}

/// Encode text for a WinAnsiEncoding font; unrepresentable characters become '?'
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}

/// Rendered width of `text` in points at `size`
pub fn string_width(text: &str, font: Font, size: f64) -> f64 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|b| u32::from(font.byte_width(b)))
        .sum();
    f64::from(units) * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_known_widths() {
        // "Hi": H=722, i=222
        assert!(approx(string_width("Hi", Font::Regular, 10.0), 9.44));
        // Bold "Hi": H=722, i=278
        assert!(approx(string_width("Hi", Font::Bold, 10.0), 10.0));
        assert!(approx(
            string_width("Plot A1", Font::Oblique, 7.0),
            string_width("Plot A1", Font::Regular, 7.0)
        ));
    }

    #[test]
    fn test_empty_string_has_no_width() {
        assert_eq!(string_width("", Font::Bold, 7.0), 0.0);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("A-1"), b"A-1".to_vec());
        assert_eq!(encode_win_ansi("5°C"), vec![b'5', 0xb0, b'C']);
        assert_eq!(encode_win_ansi("株"), b"?".to_vec());
        assert_eq!(encode_win_ansi("a\tb"), b"a?b".to_vec());
    }

    #[test]
    fn test_win_ansi_punctuation_keeps_its_codes() {
        assert_eq!(
            encode_win_ansi("A\u{2013}B \u{2019}x\u{201c}y\u{201d} \u{20ac}"),
            vec![b'A', 0x96, b'B', b' ', 0x92, b'x', 0x93, b'y', 0x94, b' ', 0x80]
        );
        assert_eq!(encode_win_ansi("\u{2022}\u{2122}\u{0178}"), vec![0x95, 0x99, 0x9f]);
    }

    #[test]
    fn test_latin1_widths() {
        assert!(approx(string_width("\u{b0}", Font::Regular, 1000.0), 400.0));
        assert!(approx(string_width("\u{d7}", Font::Regular, 1000.0), 584.0));
        assert!(approx(string_width("\u{2013}", Font::Bold, 1000.0), 556.0));
        assert!(approx(string_width("\u{e9}", Font::Bold, 1000.0), 556.0));
        assert!(approx(string_width("\u{f6}", Font::Bold, 1000.0), 611.0));
        assert!(approx(
            string_width("Mentha \u{d7} piperita", Font::Oblique, 7.0),
            string_width("Mentha \u{d7} piperita", Font::Regular, 7.0)
        ));
    }

    #[test]
    fn test_bold_is_wider_for_lowercase() {
        let text = "arabidopsis";
        assert!(string_width(text, Font::Bold, 7.0) > string_width(text, Font::Regular, 7.0));
    }
}
