use plotters::style::RGBColor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An opaque RGB color carried by draw primitives.
///
/// Serializes as a `#rrggbb` string so JSON scenes stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for RGBColor {
    fn from(c: Color) -> Self {
        RGBColor(c.r, c.g, c.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown color '{}'", s)))
    }
}

/// Box fill used by the boxplot.
pub const BOX_FILL: Color = Color::rgb(0x69, 0xb3, 0xa2);

/// Stroke and marker color of the line chart.
pub const LINE_STROKE: Color = Color::rgb(0xe7, 0x4c, 0x3c);

/// Palette cycled by the ordinal color scale of the grouped bar chart.
pub fn default_palette() -> Vec<Color> {
    vec![
        Color::rgb(0x1f, 0x77, 0xb4),
        Color::rgb(0xff, 0x7f, 0x0e),
        Color::rgb(0x2c, 0xa0, 0x2c),
    ]
}

/// Parse a color string, supporting hex (#RRGGBB, #RGB) and a few named colors
pub fn parse_color(color_str: &str) -> Option<Color> {
    let color_str = color_str.trim();

    if color_str.starts_with('#') {
        return parse_hex_color(color_str);
    }

    match color_str.to_lowercase().as_str() {
        "white" => Some(Color::WHITE),
        "black" => Some(Color::BLACK),
        "red" => Some(Color::rgb(255, 0, 0)),
        "green" => Some(Color::rgb(0, 128, 0)),
        "blue" => Some(Color::rgb(0, 0, 255)),
        "orange" => Some(Color::rgb(255, 165, 0)),
        "purple" => Some(Color::rgb(128, 0, 128)),
        "gray" | "grey" => Some(Color::rgb(128, 128, 128)),
        "steelblue" => Some(Color::rgb(70, 130, 180)),
        _ => None,
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::rgb(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_color("#69b3a2"), Some(BOX_FILL));
        assert_eq!(parse_color("#E74C3C"), Some(LINE_STROKE));
        assert_eq!(parse_color("#F00"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_parse_named_color() {
        assert_eq!(parse_color("Black"), Some(Color::BLACK));
        assert_eq!(parse_color("steelblue"), Some(Color::rgb(70, 130, 180)));
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_hex_roundtrip_through_json() {
        let json = serde_json::to_string(&BOX_FILL).unwrap();
        assert_eq!(json, "\"#69b3a2\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BOX_FILL);
    }
}
