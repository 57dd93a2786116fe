//! DeckForge Core - Deterministic Card Renderer
//!
//! # The Ground Rules (Non-Negotiable)
//! 1. Design Tokens Are Truth
//! 2. Templates Are Contracts
//! 3. Validation Is Protective
//! 4. Deterministic Output
//! 5. Manifests Enable Reproduction

pub mod cards;
pub mod elements;
pub mod fonts;
pub mod hashing;
pub mod palette;
pub mod pipeline;
pub mod primitives;
pub mod templates;
pub mod tokens;
pub mod validation;

pub use cards::{Card, CardKind, DeckError, DeckFile};
pub use fonts::{FontBook, FontError};
pub use hashing::{canonical_json, compute_manifest_digest, pixel_digest, sha256_hex};
pub use palette::PropertyColor;
pub use pipeline::{DeckPipeline, DeckSummary, OutputFormat, PipelineError, RenderPlan};
pub use tokens::{DesignTokens, TokenError};
pub use validation::{CardReport, ValidationRule, Validator, Violation, ViolationSeverity};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
