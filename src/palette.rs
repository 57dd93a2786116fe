//! Property-Set Palette - Canonical Color Order
//!
//! The ten property-set colors form a closed palette with a fixed sequence.
//! Every wild visual (rent wheel, multicolor stripe) iterates this sequence so
//! that wild cards render identically regardless of input ordering.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// One of the ten fixed property-set colors.
///
/// Variant order is the canonical rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyColor {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
    Railroad,
    Utility,
}

impl PropertyColor {
    /// All ten colors in canonical order.
    pub const ALL: [PropertyColor; 10] = [
        PropertyColor::Brown,
        PropertyColor::LightBlue,
        PropertyColor::Pink,
        PropertyColor::Orange,
        PropertyColor::Red,
        PropertyColor::Yellow,
        PropertyColor::Green,
        PropertyColor::DarkBlue,
        PropertyColor::Railroad,
        PropertyColor::Utility,
    ];

    /// The snake_case name used in card records and token files.
    pub fn name(&self) -> &'static str {
        match self {
            PropertyColor::Brown => "brown",
            PropertyColor::LightBlue => "light_blue",
            PropertyColor::Pink => "pink",
            PropertyColor::Orange => "orange",
            PropertyColor::Red => "red",
            PropertyColor::Yellow => "yellow",
            PropertyColor::Green => "green",
            PropertyColor::DarkBlue => "dark_blue",
            PropertyColor::Railroad => "railroad",
            PropertyColor::Utility => "utility",
        }
    }

    /// Parse a record-level color name. Returns `None` for anything outside
    /// the palette; callers decide whether that is a validation error or a
    /// fallback case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Default hex value, used when the token file omits the palette entry.
    pub fn default_hex(&self) -> &'static str {
        match self {
            PropertyColor::Brown => "#8B4513",
            PropertyColor::LightBlue => "#87CEEB",
            PropertyColor::Pink => "#FF69B4",
            PropertyColor::Orange => "#FF8C00",
            PropertyColor::Red => "#DC143C",
            PropertyColor::Yellow => "#FFD700",
            PropertyColor::Green => "#228B22",
            PropertyColor::DarkBlue => "#00008B",
            PropertyColor::Railroad => "#2F2F2F",
            PropertyColor::Utility => "#9ACD32",
        }
    }
}

/// Parse a `#RRGGBB` or `#RRGGBBAA` hex string into an RGBA pixel.
pub fn parse_hex(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let r = byte(0)?;
    let g = byte(2)?;
    let b = byte(4)?;
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(Rgba([r, g, b, a]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_stable() {
        assert_eq!(PropertyColor::ALL.len(), 10);
        assert_eq!(PropertyColor::ALL[0], PropertyColor::Brown);
        assert_eq!(PropertyColor::ALL[9], PropertyColor::Utility);
        // Ord agrees with the canonical sequence
        for pair in PropertyColor::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn name_roundtrip() {
        for color in PropertyColor::ALL {
            assert_eq!(PropertyColor::from_name(color.name()), Some(color));
        }
        assert_eq!(PropertyColor::from_name("magenta"), None);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("#FF8C00"), Some(Rgba([255, 140, 0, 255])));
        assert_eq!(parse_hex("#00008B80"), Some(Rgba([0, 0, 139, 128])));
        assert_eq!(parse_hex("not-a-color"), None);
        assert_eq!(parse_hex("#FFF"), None);
    }
}
