//! Visualization styling: colors, image ramps, boundary strokes, and base
//! map styles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// An RGBA color, written as six (`"FF0000"`) or eight (`"00000000"`) hex
/// digits with an optional leading `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Fully transparent black, used as the "no fill" color.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha channel.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `true` if the color is fully transparent.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

/// Error returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid color {:?}: expected RRGGBB or RRGGBBAA hex digits",
            self.input
        )
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_string(),
        };
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// Min/max stretch and palette for a single-band image layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVisParams {
    /// Value mapped to the first palette entry.
    pub min: f64,
    /// Value mapped to the last palette entry.
    pub max: f64,
    /// Color ramp.
    pub palette: Vec<Color>,
}

impl ImageVisParams {
    /// A `[0, 1]` stretch with a single color, as used for binary masks.
    #[must_use]
    pub fn single_color(color: Color) -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            palette: vec![color],
        }
    }
}

/// Outline styling for a polygon feature collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryStyle {
    /// Stroke color.
    pub color: Color,
    /// Interior fill color.
    pub fill_color: Color,
    /// Stroke width in pixels.
    pub width: u32,
}

impl BoundaryStyle {
    /// An unfilled outline with the given stroke.
    #[must_use]
    pub const fn outline(color: Color, width: u32) -> Self {
        Self {
            color,
            fill_color: Color::TRANSPARENT,
            width,
        }
    }

    /// Returns `true` if the interior is not drawn.
    #[must_use]
    pub const fn is_unfilled(&self) -> bool {
        self.fill_color.is_transparent()
    }
}

/// How a resolved layer is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerStyle {
    /// Raster stretch + palette.
    Image(ImageVisParams),
    /// Polygon outline.
    Boundary(BoundaryStyle),
}

/// Base map imagery shown beneath all layers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum BaseMapStyle {
    /// Street map.
    Roadmap,
    /// Satellite imagery only.
    Satellite,
    /// Satellite imagery with road and place labels.
    #[default]
    Hybrid,
    /// Shaded relief.
    Terrain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!("FF0000".parse::<Color>(), Ok(Color::RED));
        assert_eq!("#000000".parse::<Color>(), Ok(Color::BLACK));
        assert_eq!("00000000".parse::<Color>(), Ok(Color::TRANSPARENT));
        assert_eq!("ff8000".parse::<Color>(), Ok(Color::rgb(255, 128, 0)));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("FF00".parse::<Color>().is_err());
        assert!("GG0000".parse::<Color>().is_err());
        assert!("FF00000".parse::<Color>().is_err());
        assert!("é0000".parse::<Color>().is_err());
    }

    #[test]
    fn displays_alpha_only_when_translucent() {
        assert_eq!(Color::RED.to_string(), "FF0000");
        assert_eq!(Color::TRANSPARENT.to_string(), "00000000");
    }

    #[test]
    fn outline_has_no_fill() {
        let style = BoundaryStyle::outline(Color::BLACK, 2);
        assert!(style.is_unfilled());
        assert_eq!(style.width, 2);
    }

    #[test]
    fn base_map_names() {
        assert_eq!(BaseMapStyle::Hybrid.to_string(), "HYBRID");
        assert_eq!("satellite".parse::<BaseMapStyle>(), Ok(BaseMapStyle::Satellite));
        assert_eq!(BaseMapStyle::default(), BaseMapStyle::Hybrid);
    }

    #[test]
    fn base_map_names_round_trip() {
        use strum::IntoEnumIterator as _;

        for style in BaseMapStyle::iter() {
            assert_eq!(style.as_ref().parse::<BaseMapStyle>(), Ok(style));
        }
        assert_eq!(BaseMapStyle::iter().count(), 4);
    }
}
