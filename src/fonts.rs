//! Font Resolution
//!
//! Fonts are the only environment-dependent asset. Resolution order: the path
//! configured in the token file, then a fixed list of common system faces. A
//! missing configured font degrades to the system fallback with a warning;
//! only a machine with no usable face at all is an error.

use std::fs;
use std::path::Path;

use rusttype::Font;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tokens::Typography;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("No usable font found; searched the configured path and {0} system candidates")]
    NoFontAvailable(usize),
}

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
];

/// Regular and bold faces, resolved once and shared read-only by every
/// template call.
#[derive(Clone)]
pub struct FontBook {
    pub regular: Font<'static>,
    pub bold: Font<'static>,
}

impl FontBook {
    pub fn load(typography: &Typography) -> Result<Self, FontError> {
        let regular = resolve(typography.font_path.as_deref(), REGULAR_CANDIDATES)
            .ok_or(FontError::NoFontAvailable(REGULAR_CANDIDATES.len()))?;
        // Missing bold face falls back to the regular one; weight is cosmetic.
        let bold = resolve(typography.bold_font_path.as_deref(), BOLD_CANDIDATES)
            .unwrap_or_else(|| regular.clone());
        Ok(Self { regular, bold })
    }
}

fn resolve(configured: Option<&Path>, candidates: &[&str]) -> Option<Font<'static>> {
    if let Some(path) = configured {
        match load_font_file(path) {
            Some(font) => return Some(font),
            None => warn!(
                path = %path.display(),
                "Configured font not usable, falling back to a system face"
            ),
        }
    }
    for candidate in candidates {
        if let Some(font) = load_font_file(Path::new(candidate)) {
            debug!(path = candidate, "Resolved system font");
            return Some(font);
        }
    }
    None
}

fn load_font_file(path: &Path) -> Option<Font<'static>> {
    let bytes = fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}
