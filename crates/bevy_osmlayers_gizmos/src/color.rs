//! CSS color strings → Bevy colors.

use std::collections::HashMap;

use bevy::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported CSS color {0:?}")]
pub struct ParseColorError(pub String);

/// Parse `#RRGGBB`, `rgb(r, g, b)` or `rgba(r, g, b, a)`.
pub fn parse_css_color(css: &str) -> Result<Color, ParseColorError> {
    let css = css.trim();
    let invalid = || ParseColorError(css.to_string());

    if let Some(hex) = css.strip_prefix('#') {
        return Srgba::hex(hex).map(Color::from).map_err(|_| invalid());
    }

    let (args, has_alpha) = if let Some(args) = css.strip_prefix("rgba(") {
        (args, true)
    } else if let Some(args) = css.strip_prefix("rgb(") {
        (args, false)
    } else {
        return Err(invalid());
    };

    let args = args.strip_suffix(')').ok_or_else(invalid)?;
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if has_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return Err(invalid());
    }

    let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
    let (r, g, b) = (channel(parts[0])?, channel(parts[1])?, channel(parts[2])?);
    let alpha = if has_alpha {
        parts[3]
            .parse::<f32>()
            .ok()
            .filter(|a| (0.0..=1.0).contains(a))
            .ok_or_else(invalid)?
    } else {
        1.0
    };

    Ok(Color::srgba_u8(r, g, b, 255).with_alpha(alpha))
}

/// Parsed colors keyed by their CSS string.
#[derive(Debug, Default)]
pub struct ColorCache {
    colors: HashMap<String, Color>,
}

impl ColorCache {
    /// Parse (once) and return `css`, or `fallback` if it does not parse.
    pub fn get(&mut self, css: &str, fallback: Color) -> Color {
        if let Some(color) = self.colors.get(css) {
            return *color;
        }
        let color = parse_css_color(css).unwrap_or_else(|e| {
            warn!("{}", e);
            fallback
        });
        self.colors.insert(css.to_string(), color);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        let color = parse_css_color("#FF5733").unwrap().to_srgba();
        assert_eq!(color, Srgba::rgb_u8(255, 87, 51));
    }

    #[test]
    fn test_rgba() {
        let color = parse_css_color("rgba(255, 87, 51, 0.6)").unwrap().to_srgba();
        assert_eq!(color.red, 1.0);
        assert!((color.alpha - 0.6).abs() < f32::EPSILON);

        let outline = parse_css_color("rgba(0, 0, 0, 0.3)").unwrap();
        assert!((outline.alpha() - 0.3).abs() < f32::EPSILON);

        let opaque = parse_css_color("rgb(0,0,0)").unwrap();
        assert_eq!(opaque.alpha(), 1.0);
    }

    #[test]
    fn test_rejects_garbage() {
        for css in ["red", "#GG0000", "rgba(1, 2, 3)", "rgba(1, 2, 3, 2)", "rgb(300, 0, 0)", "rgba(1,2,3,0.5"] {
            assert!(parse_css_color(css).is_err(), "{css:?} should not parse");
        }
    }

    #[test]
    fn test_cache_falls_back() {
        let mut cache = ColorCache::default();
        assert_eq!(cache.get("nope", Color::WHITE), Color::WHITE);
        assert_eq!(
            cache.get("#000000", Color::WHITE).to_srgba(),
            Srgba::rgb_u8(0, 0, 0)
        );
    }
}
