use serde::Deserialize;
use thiserror::Error;

/// sRGB-encoded colour with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "ColorSpec")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("unknown colour name `{0}`")]
    UnknownName(String),
    #[error("malformed hex colour `{0}`")]
    MalformedHex(String),
    #[error("colour component {0} outside [0, 1]")]
    OutOfRange(f32),
}

/// CSS named colours the scene presets and config files may use
const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("silver", 0xc0c0c0),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("orange", 0xffa500),
    ("tomato", 0xff6347),
    ("teal", 0x008080),
    ("purple", 0x800080),
    ("pink", 0xffc0cb),
    ("hotpink", 0xff69b4),
    ("cyan", 0x00ffff),
    ("magenta", 0xff00ff),
    ("gold", 0xffd700),
    ("navy", 0x000080),
    ("skyblue", 0x87ceeb),
    ("olive", 0x808000),
    ("crimson", 0xdc143c),
    ("coral", 0xff7f50),
    ("salmon", 0xfa8072),
    ("khaki", 0xf0e68c),
    ("lime", 0x00ff00),
    ("indigo", 0x4b0082),
    ("violet", 0xee82ee),
    ("brown", 0xa52a2a),
];

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// 0xRRGGBB
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rgb`, `#rrggbb` or a CSS colour name (case-insensitive)
    pub fn parse(text: &str) -> Result<Self, ColorError> {
        let text = text.trim();

        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| ColorError::MalformedHex(text.to_string()));
        }

        let lower = text.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, hex)| Self::from_hex(hex))
            .ok_or(ColorError::UnknownName(lower))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            3 => {
                // #abc expands to #aabbcc
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).ok().map(Self::from_hex)
            }
            6 => u32::from_str_radix(hex, 16).ok().map(Self::from_hex),
            _ => None,
        }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::rgb(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Converts sRGB-encoded components to linear light for shading
    pub fn to_linear(self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::rgb(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Colours in config files are either a string or an `[r, g, b]` triple
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Text(String),
    Components([f32; 3]),
}

impl TryFrom<ColorSpec> for Color {
    type Error = ColorError;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Text(text) => Color::parse(&text),
            ColorSpec::Components(components) => {
                if let Some(bad) = components.iter().find(|c| !(0.0..=1.0).contains(*c)) {
                    return Err(ColorError::OutOfRange(*bad));
                }
                let [r, g, b] = components;
                Ok(Color::rgb(r, g, b))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::BLACK.to_linear(), Color::BLACK);
        let white = Color::WHITE.to_linear();
        assert!((white.r - 1.0).abs() < 1e-6);
        let mid = Color::rgb(0.5, 0.5, 0.5).to_linear();
        assert!((mid.g - 0.214).abs() < 1e-3);
    }

    #[test]
    fn parses_short_hex() {
        let c = Color::parse("#444").unwrap();
        assert!((c.r - 0x44 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn parses_long_hex() {
        let c = Color::parse("#ff8000").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn parses_css_names_case_insensitively() {
        assert_eq!(Color::parse("Tomato").unwrap(), Color::from_hex(0xff6347));
        assert_eq!(Color::parse("teal").unwrap(), Color::from_hex(0x008080));
        assert_eq!(Color::parse("orange").unwrap(), Color::from_hex(0xffa500));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            Color::parse("#12"),
            Err(ColorError::MalformedHex("#12".to_string()))
        );
        assert_eq!(
            Color::parse("#zzzzzz"),
            Err(ColorError::MalformedHex("#zzzzzz".to_string()))
        );
        assert!(matches!(Color::parse("blurple"), Err(ColorError::UnknownName(_))));
    }

    #[test]
    fn deserializes_from_string_or_triple() {
        let named: Color = serde_json::from_str("\"white\"").unwrap();
        assert_eq!(named, Color::WHITE);

        let triple: Color = serde_json::from_str("[0.5, 0.25, 0.0]").unwrap();
        assert_eq!(triple, Color::rgb(0.5, 0.25, 0.0));

        assert!(serde_json::from_str::<Color>("[2.0, 0.0, 0.0]").is_err());
    }
}
