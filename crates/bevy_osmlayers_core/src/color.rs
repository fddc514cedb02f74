//! Layer color assignment.

use std::fmt;

use thiserror::Error;

/// Colors assigned to new layers, in allocation order.
pub const DEFAULT_PALETTE: [&str; 5] = ["#FF5733", "#33FF57", "#3357FF", "#FF33A6", "#FF8C33"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color {0:?}, expected #RRGGBB")]
    InvalidHex(String),

    #[error("Palette must contain at least one color")]
    EmptyPalette,
}

/// A layer color: the configured hex string plus its decomposed channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayerColor {
    hex: String,
    rgb: [u8; 3],
}

impl LayerColor {
    /// Parse a `#RRGGBB` color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let rgb = parse_hex(hex)?;
        Ok(Self {
            hex: hex.to_string(),
            rgb,
        })
    }

    /// The hex string as configured.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    /// CSS `rgba(...)` form of this color at `alpha`.
    pub fn to_rgba(&self, alpha: f64) -> String {
        let [r, g, b] = self.rgb;
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}

impl fmt::Display for LayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

fn parse_hex(hex: &str) -> Result<[u8; 3], ColorError> {
    let invalid = || ColorError::InvalidHex(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Blend a hex color with `alpha`, e.g. `#FF5733` at 0.6 gives `rgba(255, 87, 51, 0.6)`.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String, ColorError> {
    Ok(LayerColor::from_hex(hex)?.to_rgba(alpha))
}

/// A validated, non-empty color palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<LayerColor>,
}

impl Palette {
    pub fn new<I, S>(colors: I) -> Result<Self, ColorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = colors
            .into_iter()
            .map(|hex| LayerColor::from_hex(hex.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if colors.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[LayerColor] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE
                .iter()
                .filter_map(|hex| LayerColor::from_hex(hex).ok())
                .collect(),
        }
    }
}

/// Hands out palette colors round-robin.
///
/// The index only grows; it is never reset for the lifetime of the allocator.
#[derive(Debug, Clone, Default)]
pub struct ColorAllocator {
    palette: Palette,
    index: usize,
}

impl ColorAllocator {
    pub fn new(palette: Palette) -> Self {
        Self { palette, index: 0 }
    }

    /// Return `palette[index % len]` and advance.
    pub fn next_color(&mut self) -> LayerColor {
        let color = self.palette.colors[self.index % self.palette.len()].clone();
        self.index = self.index.wrapping_add(1);
        color
    }

    /// Number of colors handed out so far.
    pub fn allocated(&self) -> usize {
        self.index
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgba_is_exact() {
        assert_eq!(hex_to_rgba("#FF5733", 0.6).unwrap(), "rgba(255, 87, 51, 0.6)");
        assert_eq!(hex_to_rgba("#3357ff", 1.0).unwrap(), "rgba(51, 87, 255, 1)");
    }

    #[test]
    fn test_invalid_hex_rejected() {
        for bad in ["FF5733", "#FF573", "#GG5733", "", "#FF57331"] {
            assert_eq!(
                LayerColor::from_hex(bad),
                Err(ColorError::InvalidHex(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_next_color_cycles_palette() {
        let mut allocator = ColorAllocator::default();
        let colors: Vec<String> = (0..12)
            .map(|_| allocator.next_color().hex().to_string())
            .collect();

        for (i, color) in colors.iter().enumerate() {
            assert_eq!(color, DEFAULT_PALETTE[i % 5]);
        }
        for pair in colors.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(allocator.allocated(), 12);
    }

    #[test]
    fn test_single_color_palette_repeats() {
        let mut allocator = ColorAllocator::new(Palette::new(["#000000"]).unwrap());
        assert_eq!(allocator.next_color(), allocator.next_color());
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(
            Palette::new(Vec::<String>::new()),
            Err(ColorError::EmptyPalette)
        );
    }
}
