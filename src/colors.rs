use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }
}

impl From<Rgb> for Rgba {
    fn from(val: Rgb) -> Self {
        Rgba {
            r: val.r,
            g: val.g,
            b: val.b,
            a: u8::MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color")]
    Empty,

    #[error("unknown color code {0:?}")]
    Unknown(String),

    #[error("invalid hex color {0:?}, expected #RRGGBB or #RRGGBBAA")]
    InvalidHex(String),
}

/// Chat formatting color codes (`§0`..`§f`) and the colors they stand for.
pub const FORMATTING_COLORS: [(char, Rgb); 16] = [
    ('0', Rgb::new(0, 0, 0)),
    ('1', Rgb::new(0, 0, 170)),
    ('2', Rgb::new(0, 170, 0)),
    ('3', Rgb::new(0, 170, 170)),
    ('4', Rgb::new(170, 0, 0)),
    ('5', Rgb::new(170, 0, 170)),
    ('6', Rgb::new(255, 170, 0)),
    ('7', Rgb::new(170, 170, 170)),
    ('8', Rgb::new(85, 85, 85)),
    ('9', Rgb::new(85, 85, 255)),
    ('a', Rgb::new(85, 255, 85)),
    ('b', Rgb::new(85, 255, 255)),
    ('c', Rgb::new(255, 85, 85)),
    ('d', Rgb::new(255, 85, 255)),
    ('e', Rgb::new(255, 255, 85)),
    ('f', Rgb::new(255, 255, 255)),
];

// k-o are obfuscated, bold, strikethrough, underline and italic; r resets
const FORMATTING_MODIFIERS: &str = "klmnor";

fn formatting_color(code: char) -> Option<Rgb> {
    let code = code.to_ascii_lowercase();

    FORMATTING_COLORS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, rgb)| *rgb)
}

/// Parses `§d`, `&d`, `§b§l` (style modifiers are ignored), `#ff55ff` or
/// `#ff55ff80`. Anything else is an error rather than a fallback color.
pub fn parse_color(input: &str) -> Result<Rgba, ColorParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(input.to_string()));
    }

    let mut color = None;
    let mut chars = input.chars();

    while let Some(prefix) = chars.next() {
        let code = match (prefix, chars.next()) {
            ('§' | '&', Some(code)) => code,
            _ => return Err(ColorParseError::Unknown(input.to_string())),
        };

        if let Some(rgb) = formatting_color(code) {
            if color.is_some() {
                return Err(ColorParseError::Unknown(input.to_string()));
            }
            color = Some(rgb);
        } else if !FORMATTING_MODIFIERS.contains(code.to_ascii_lowercase()) {
            return Err(ColorParseError::Unknown(input.to_string()));
        }
    }

    color
        .map(Rgba::from)
        .ok_or_else(|| ColorParseError::Unknown(input.to_string()))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { u8::MAX };

    Some(Rgba::new(channel(0)?, channel(2)?, channel(4)?, alpha))
}
