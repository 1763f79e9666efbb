// UI state, persistence and theming

pub mod app_state;
pub mod error;
pub mod store;
pub mod theme;

pub use app_state::AppState;
pub use error::ConfigError;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use theme::{get_theme, AppTheme, SpreadsheetTheme};

/// Framework-agnostic RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert from hex u32 (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            Some(u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()? as f32 / 255.0)
        };
        let a = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::from_rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color = Color::parse_hex("#3b82f6").unwrap();
        assert!((color.r - 0.231).abs() < 0.01);
        assert!((color.g - 0.510).abs() < 0.01);
        assert!((color.b - 0.965).abs() < 0.01);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        let color = Color::parse_hex("#00000080").unwrap();
        assert!((color.a - 0.502).abs() < 0.01);
        assert!(Color::parse_hex("#12345").is_none());
        assert!(Color::parse_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_from_hex_matches_parse() {
        assert_eq!(Color::from_hex(0x3b82f6), Color::parse_hex("3b82f6").unwrap());
    }
}
