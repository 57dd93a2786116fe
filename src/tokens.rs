//! Design Token Store
//!
//! All visual constants live here: card geometry, the property-set palette,
//! typography, badge metrics, and per-card-type layout blocks. Loaded once
//! from JSON at startup and passed by reference everywhere; never mutated
//! after load. Every field carries a serde default, so a token file can
//! override any subset of keys and leave the rest at the documented values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::{parse_hex, PropertyColor};

/// Ink color used when a configured hex value fails to resolve.
pub const FALLBACK_INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to read token file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse token JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid color for token '{key}': '{value}'")]
    InvalidColor { key: String, value: String },

    #[error("Card dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct DesignTokens {
    #[serde(default)]
    pub card: CardGeometry,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub typography: Typography,
    #[serde(default)]
    pub value_badge: BadgeTokens,
    #[serde(default)]
    pub card_types: CardTypeTokens,
    /// Drawn centered at each layout's `footer_y` when non-empty.
    #[serde(default)]
    pub footer_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardGeometry {
    #[serde(default = "default_card_width")]
    pub width: u32,
    #[serde(default = "default_card_height")]
    pub height: u32,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: u32,
    #[serde(default = "default_edge_margin")]
    pub edge_margin: i32,
}

fn default_card_width() -> u32 { 413 }
fn default_card_height() -> u32 { 455 }
fn default_corner_radius() -> u32 { 20 }
fn default_edge_margin() -> i32 { 10 }

impl Default for CardGeometry {
    fn default() -> Self {
        Self {
            width: default_card_width(),
            height: default_card_height(),
            corner_radius: default_corner_radius(),
            edge_margin: default_edge_margin(),
        }
    }
}

/// The ten property-set colors plus shared ink colors.
///
/// `property_sets` only needs to list overrides; any omitted color falls back
/// to [`PropertyColor::default_hex`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub property_sets: BTreeMap<PropertyColor, String>,
    #[serde(default = "default_ink")]
    pub ink: String,
    #[serde(default = "default_muted")]
    pub muted: String,
    #[serde(default = "default_paper")]
    pub paper: String,
}

fn default_ink() -> String { "#000000".to_string() }
fn default_muted() -> String { "#505050".to_string() }
fn default_paper() -> String { "#FFFFFF".to_string() }

impl Default for Palette {
    fn default() -> Self {
        Self {
            property_sets: BTreeMap::new(),
            ink: default_ink(),
            muted: default_muted(),
            paper: default_paper(),
        }
    }
}

impl Palette {
    /// Concrete pixel value for a property-set color.
    pub fn property(&self, color: PropertyColor) -> Rgba<u8> {
        let hex = self
            .property_sets
            .get(&color)
            .map(String::as_str)
            .unwrap_or_else(|| color.default_hex());
        parse_hex(hex).unwrap_or(FALLBACK_INK)
    }

    /// Resolve a record-level color name. Names outside the palette resolve
    /// to green, matching the reference deck; validation rejects them before
    /// rendering, so this fallback only matters for direct template calls.
    pub fn resolve_name(&self, name: &str) -> Rgba<u8> {
        match PropertyColor::from_name(name) {
            Some(color) => self.property(color),
            None => self.property(PropertyColor::Green),
        }
    }

    pub fn ink(&self) -> Rgba<u8> {
        parse_hex(&self.ink).unwrap_or(FALLBACK_INK)
    }

    pub fn muted(&self) -> Rgba<u8> {
        parse_hex(&self.muted).unwrap_or(FALLBACK_INK)
    }

    pub fn paper(&self) -> Rgba<u8> {
        parse_hex(&self.paper).unwrap_or(Rgba([255, 255, 255, 255]))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Typography {
    /// Optional path to a TTF file. When absent or missing on disk, the font
    /// book falls back to a system face with a warning.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    #[serde(default)]
    pub bold_font_path: Option<PathBuf>,
    #[serde(default = "default_title_size")]
    pub title_size: f32,
    #[serde(default = "default_heading_size")]
    pub heading_size: f32,
    #[serde(default = "default_body_size")]
    pub body_size: f32,
    #[serde(default = "default_footer_size")]
    pub footer_size: f32,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
}

fn default_title_size() -> f32 { 18.0 }
fn default_heading_size() -> f32 { 24.0 }
fn default_body_size() -> f32 { 12.0 }
fn default_footer_size() -> f32 { 10.0 }
fn default_line_spacing() -> f32 { 1.2 }

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_path: None,
            bold_font_path: None,
            title_size: default_title_size(),
            heading_size: default_heading_size(),
            body_size: default_body_size(),
            footer_size: default_footer_size(),
            line_spacing: default_line_spacing(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeTokens {
    #[serde(default = "default_badge_diameter")]
    pub diameter: u32,
    /// Badge center offset from the top-left corner.
    #[serde(default = "default_badge_offset")]
    pub corner_offset: i32,
    #[serde(default = "default_badge_border")]
    pub border_width: u32,
}

fn default_badge_diameter() -> u32 { 50 }
fn default_badge_offset() -> i32 { 45 }
fn default_badge_border() -> u32 { 3 }

impl Default for BadgeTokens {
    fn default() -> Self {
        Self {
            diameter: default_badge_diameter(),
            corner_offset: default_badge_offset(),
            border_width: default_badge_border(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CardTypeTokens {
    #[serde(default)]
    pub property: PropertyLayout,
    #[serde(default)]
    pub action: ActionLayout,
    #[serde(default)]
    pub rent: RentLayout,
    #[serde(default)]
    pub wildcard: WildcardLayout,
    #[serde(default)]
    pub money: MoneyLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyLayout {
    #[serde(default = "default_property_bg")]
    pub background: String,
    #[serde(default = "default_header_y")]
    pub header_y: i32,
    #[serde(default = "default_header_height")]
    pub header_height: i32,
    #[serde(default = "default_header_padding")]
    pub header_padding: i32,
    #[serde(default = "default_rent_start_y")]
    pub rent_start_y: i32,
    #[serde(default = "default_rent_row_height")]
    pub rent_row_height: i32,
    #[serde(default = "default_footer_y")]
    pub footer_y: i32,
}

fn default_property_bg() -> String { "#F8F4E8".to_string() }
fn default_header_y() -> i32 { 15 }
fn default_header_height() -> i32 { 55 }
fn default_header_padding() -> i32 { 15 }
fn default_rent_start_y() -> i32 { 215 }
fn default_rent_row_height() -> i32 { 48 }
fn default_footer_y() -> i32 { 432 }

impl Default for PropertyLayout {
    fn default() -> Self {
        Self {
            background: default_property_bg(),
            header_y: default_header_y(),
            header_height: default_header_height(),
            header_padding: default_header_padding(),
            rent_start_y: default_rent_start_y(),
            rent_row_height: default_rent_row_height(),
            footer_y: default_footer_y(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLayout {
    #[serde(default = "default_action_bg")]
    pub background: String,
    #[serde(default = "default_circle_bg")]
    pub circle_background: String,
    #[serde(default = "default_title_y")]
    pub title_y: i32,
    #[serde(default = "default_action_circle_y")]
    pub circle_center_y: i32,
    #[serde(default = "default_action_circle_diameter")]
    pub circle_diameter: u32,
    #[serde(default = "default_circle_border")]
    pub circle_border_width: u32,
    #[serde(default = "default_description_y")]
    pub description_y: i32,
    #[serde(default = "default_description_width")]
    pub description_width: i32,
    #[serde(default = "default_footer_y")]
    pub footer_y: i32,
}

fn default_action_bg() -> String { "#FDF5E6".to_string() }
fn default_circle_bg() -> String { "#FFFFFF".to_string() }
fn default_title_y() -> i32 { 42 }
fn default_action_circle_y() -> i32 { 160 }
fn default_action_circle_diameter() -> u32 { 170 }
fn default_circle_border() -> u32 { 4 }
fn default_description_y() -> i32 { 270 }
fn default_description_width() -> i32 { 320 }

impl Default for ActionLayout {
    fn default() -> Self {
        Self {
            background: default_action_bg(),
            circle_background: default_circle_bg(),
            title_y: default_title_y(),
            circle_center_y: default_action_circle_y(),
            circle_diameter: default_action_circle_diameter(),
            circle_border_width: default_circle_border(),
            description_y: default_description_y(),
            description_width: default_description_width(),
            footer_y: default_footer_y(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentLayout {
    #[serde(default = "default_rent_bg")]
    pub background: String,
    #[serde(default = "default_title_y")]
    pub title_y: i32,
    #[serde(default = "default_rent_circle_y")]
    pub circle_center_y: i32,
    #[serde(default = "default_rent_outer_diameter")]
    pub outer_diameter: u32,
    #[serde(default = "default_rent_inner_diameter")]
    pub inner_diameter: u32,
    #[serde(default = "default_rent_description_y")]
    pub description_y: i32,
    #[serde(default = "default_description_width")]
    pub description_width: i32,
    #[serde(default = "default_footer_y")]
    pub footer_y: i32,
}

fn default_rent_bg() -> String { "#F5EFDC".to_string() }
fn default_rent_circle_y() -> i32 { 170 }
fn default_rent_outer_diameter() -> u32 { 150 }
fn default_rent_inner_diameter() -> u32 { 80 }
fn default_rent_description_y() -> i32 { 285 }

impl Default for RentLayout {
    fn default() -> Self {
        Self {
            background: default_rent_bg(),
            title_y: default_title_y(),
            circle_center_y: default_rent_circle_y(),
            outer_diameter: default_rent_outer_diameter(),
            inner_diameter: default_rent_inner_diameter(),
            description_y: default_rent_description_y(),
            description_width: default_description_width(),
            footer_y: default_footer_y(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WildcardLayout {
    #[serde(default = "default_wildcard_bg")]
    pub background: String,
    #[serde(default = "default_stripe_y")]
    pub stripe_y: i32,
    #[serde(default = "default_stripe_height")]
    pub stripe_height: i32,
    #[serde(default = "default_stripe_margin")]
    pub stripe_margin: i32,
    #[serde(default = "default_wildcard_title_y")]
    pub title_y: i32,
    #[serde(default = "default_wild_label_y")]
    pub wild_label_y: i32,
    #[serde(default = "default_wildcard_description_y")]
    pub description_y: i32,
    #[serde(default = "default_wildcard_description_width")]
    pub description_width: i32,
    #[serde(default = "default_footer_y")]
    pub footer_y: i32,
}

fn default_wildcard_bg() -> String { "#F8F4E8".to_string() }
fn default_stripe_y() -> i32 { 15 }
fn default_stripe_height() -> i32 { 50 }
fn default_stripe_margin() -> i32 { 30 }
fn default_wildcard_title_y() -> i32 { 90 }
fn default_wild_label_y() -> i32 { 215 }
fn default_wildcard_description_y() -> i32 { 300 }
fn default_wildcard_description_width() -> i32 { 330 }

impl Default for WildcardLayout {
    fn default() -> Self {
        Self {
            background: default_wildcard_bg(),
            stripe_y: default_stripe_y(),
            stripe_height: default_stripe_height(),
            stripe_margin: default_stripe_margin(),
            title_y: default_wildcard_title_y(),
            wild_label_y: default_wild_label_y(),
            description_y: default_wildcard_description_y(),
            description_width: default_wildcard_description_width(),
            footer_y: default_footer_y(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoneyLayout {
    #[serde(default = "default_money_bg")]
    pub background: String,
    #[serde(default = "default_circle_bg")]
    pub circle_background: String,
    #[serde(default = "default_money_circle_y")]
    pub circle_center_y: i32,
    #[serde(default = "default_money_circle_diameter")]
    pub circle_diameter: u32,
    #[serde(default = "default_money_circle_border")]
    pub circle_border_width: u32,
    #[serde(default = "default_footer_y")]
    pub footer_y: i32,
}

fn default_money_bg() -> String { "#FAF3E3".to_string() }
fn default_money_circle_y() -> i32 { 210 }
fn default_money_circle_diameter() -> u32 { 220 }
fn default_money_circle_border() -> u32 { 5 }

impl Default for MoneyLayout {
    fn default() -> Self {
        Self {
            background: default_money_bg(),
            circle_background: default_circle_bg(),
            circle_center_y: default_money_circle_y(),
            circle_diameter: default_money_circle_diameter(),
            circle_border_width: default_money_circle_border(),
            footer_y: default_footer_y(),
        }
    }
}

impl DesignTokens {
    /// Load and verify a token file. Any parse failure or unparseable color
    /// literal aborts the run; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, TokenError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, TokenError> {
        let tokens: DesignTokens = serde_json::from_str(content)?;
        tokens.verify()?;
        Ok(tokens)
    }

    fn verify(&self) -> Result<(), TokenError> {
        if self.card.width == 0 || self.card.height == 0 {
            return Err(TokenError::ZeroDimensions {
                width: self.card.width,
                height: self.card.height,
            });
        }

        let mut colors: Vec<(String, &str)> = vec![
            ("palette.ink".into(), &self.palette.ink),
            ("palette.muted".into(), &self.palette.muted),
            ("palette.paper".into(), &self.palette.paper),
            ("card_types.property.background".into(), &self.card_types.property.background),
            ("card_types.action.background".into(), &self.card_types.action.background),
            ("card_types.action.circle_background".into(), &self.card_types.action.circle_background),
            ("card_types.rent.background".into(), &self.card_types.rent.background),
            ("card_types.wildcard.background".into(), &self.card_types.wildcard.background),
            ("card_types.money.background".into(), &self.card_types.money.background),
            ("card_types.money.circle_background".into(), &self.card_types.money.circle_background),
        ];
        for (color, hex) in &self.palette.property_sets {
            colors.push((format!("palette.property_sets.{}", color.name()), hex));
        }

        for (key, hex) in colors {
            if parse_hex(hex).is_none() {
                return Err(TokenError::InvalidColor {
                    key,
                    value: hex.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_token() {
        let tokens = DesignTokens::from_json("{}").unwrap();
        assert_eq!(tokens.card.width, 413);
        assert_eq!(tokens.card.height, 455);
        assert_eq!(tokens.card.corner_radius, 20);
        assert_eq!(tokens.value_badge.diameter, 50);
        assert_eq!(tokens.card_types.property.rent_row_height, 48);
    }

    #[test]
    fn partial_override_keeps_rest_default() {
        let tokens = DesignTokens::from_json(r#"{"card": {"width": 826}}"#).unwrap();
        assert_eq!(tokens.card.width, 826);
        assert_eq!(tokens.card.height, 455);
    }

    #[test]
    fn palette_override_and_fallback() {
        let tokens = DesignTokens::from_json(
            r##"{"palette": {"property_sets": {"brown": "#101010"}}}"##,
        )
        .unwrap();
        assert_eq!(
            tokens.palette.property(PropertyColor::Brown),
            Rgba([16, 16, 16, 255])
        );
        // Unlisted colors keep their documented defaults
        assert_eq!(
            tokens.palette.property(PropertyColor::Red),
            Rgba([220, 20, 60, 255])
        );
    }

    #[test]
    fn unknown_name_resolves_to_green() {
        let tokens = DesignTokens::default();
        assert_eq!(
            tokens.palette.resolve_name("magenta"),
            tokens.palette.property(PropertyColor::Green)
        );
    }

    #[test]
    fn invalid_hex_is_fatal() {
        let result = DesignTokens::from_json(r#"{"palette": {"ink": "black"}}"#);
        assert!(matches!(result, Err(TokenError::InvalidColor { .. })));
    }

    #[test]
    fn zero_dimensions_rejected() {
        let result = DesignTokens::from_json(r#"{"card": {"width": 0}}"#);
        assert!(matches!(result, Err(TokenError::ZeroDimensions { .. })));
    }

    #[test]
    fn invalid_json_is_fatal() {
        assert!(DesignTokens::from_json("not json {{").is_err());
    }
}
