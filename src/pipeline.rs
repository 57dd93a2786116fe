//! Deck Pipeline - Single Entry Point
//!
//! Drives a full render: expand definitions, validate every record, render
//! the survivors, encode and write them, and emit a manifest so the run can
//! be reproduced and verified later.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::cards::{CardKind, DeckFile};
use crate::fonts::FontBook;
use crate::hashing::{compute_manifest_digest, sha256_hex};
use crate::templates::render_card;
use crate::tokens::DesignTokens;
use crate::validation::{CardReport, Validator};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no {0} cards in deck file")]
    NoCards(CardKind),

    #[error(transparent)]
    Deck(#[from] crate::cards::DeckError),

    #[error(transparent)]
    Tokens(#[from] crate::tokens::TokenError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Encoded output format for rendered cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Webp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    fn image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Png => image::ImageFormat::Png,
            OutputFormat::Webp => image::ImageFormat::WebP,
        }
    }
}

/// What to render and where to put it.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub kinds: BTreeSet<CardKind>,
    pub format: OutputFormat,
    pub out_dir: PathBuf,
}

impl RenderPlan {
    pub fn all_kinds(format: OutputFormat, out_dir: PathBuf) -> Self {
        Self {
            kinds: CardKind::ALL.iter().copied().collect(),
            format,
            out_dir,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub kind: CardKind,
    pub file: String,
    pub sha256: String,
}

/// Written as `manifest.json` next to the rendered images. The digest covers
/// the manifest itself (with the digest field blank), canonical-JSON encoded.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub engine_version: String,
    pub format: OutputFormat,
    pub card_count: usize,
    pub entries: Vec<ManifestEntry>,
    pub digest: String,
}

#[derive(Debug)]
pub struct DeckSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub per_kind: BTreeMap<CardKind, usize>,
    pub rejected: Vec<CardReport>,
    pub manifest_path: PathBuf,
    pub manifest_digest: String,
}

/// The deck pipeline - single entry point for rendering and validation.
pub struct DeckPipeline {
    tokens: DesignTokens,
    fonts: FontBook,
    validator: Validator,
}

impl DeckPipeline {
    pub fn new(tokens: DesignTokens, fonts: FontBook) -> Self {
        Self {
            tokens,
            fonts,
            validator: Validator::new(),
        }
    }

    /// Validate every definition of the requested kinds without rendering.
    pub fn validate_deck(&self, deck: &DeckFile, kinds: &BTreeSet<CardKind>) -> Vec<CardReport> {
        self.report_input_problems(deck);
        self.validator.validate_deck(deck, kinds)
    }

    /// Render the deck per the plan.
    ///
    /// Validation always runs first. Records with error-level violations are
    /// skipped with a warning; the rest of the batch proceeds. A requested
    /// kind with zero definitions is an error.
    pub fn render_deck(&self, deck: &DeckFile, plan: &RenderPlan) -> Result<DeckSummary, PipelineError> {
        self.report_input_problems(deck);

        for kind in &plan.kinds {
            if deck.definition_count(*kind) == 0 {
                return Err(PipelineError::NoCards(*kind));
            }
        }

        fs::create_dir_all(&plan.out_dir)?;

        let mut per_kind: BTreeMap<CardKind, usize> = BTreeMap::new();
        let mut rejected = Vec::new();
        let mut entries = Vec::new();

        for card in deck.expand(&plan.kinds) {
            let report = self.validator.validate(&card);
            if report.has_errors() {
                for v in &report.violations {
                    warn!(card = %card.id(), rule = %v.rule, "{}", v.message);
                }
                rejected.push(report);
                continue;
            }

            let canvas = render_card(&card, &self.tokens, &self.fonts);
            let bytes = encode(&canvas, plan.format)?;
            let filename = format!("{}.{}", card.id(), plan.format.extension());
            fs::write(plan.out_dir.join(&filename), &bytes)?;

            *per_kind.entry(card.kind()).or_insert(0) += 1;
            entries.push(ManifestEntry {
                id: card.id().to_string(),
                kind: card.kind(),
                file: filename,
                sha256: sha256_hex(&bytes),
            });
        }

        let mut manifest = Manifest {
            engine_version: ENGINE_VERSION.to_string(),
            format: plan.format,
            card_count: entries.len(),
            entries,
            digest: String::new(),
        };
        manifest.digest = compute_manifest_digest(&manifest)?;

        let manifest_path = plan.out_dir.join("manifest.json");
        fs::write(&manifest_path, crate::hashing::canonical_json(&manifest)?)?;

        info!(
            rendered = manifest.card_count,
            skipped = rejected.len(),
            out_dir = %plan.out_dir.display(),
            "deck render complete"
        );

        Ok(DeckSummary {
            rendered: manifest.card_count,
            skipped: rejected.len(),
            per_kind,
            rejected,
            manifest_path,
            manifest_digest: manifest.digest,
        })
    }

    fn report_input_problems(&self, deck: &DeckFile) {
        for (section, value) in &deck.unknown_sections {
            let count = value.as_array().map(|a| a.len()).unwrap_or(0);
            warn!(section = %section, records = count, "unknown deck section ignored");
        }
        for m in &deck.malformed {
            warn!(section = %m.section, index = m.index, "malformed record skipped: {}", m.error);
        }
    }
}

fn encode(canvas: &crate::primitives::Canvas, format: OutputFormat) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Cursor::new(Vec::new());
    canvas.write_to(&mut buf, format.image_format())?;
    Ok(buf.into_inner())
}

/// Load a deck and tokens from disk. An unusable token file is fatal; an
/// absent `--tokens` argument means the documented defaults.
pub fn load_inputs(
    deck_path: &Path,
    tokens_path: Option<&Path>,
) -> Result<(DeckFile, DesignTokens), PipelineError> {
    let deck = DeckFile::load(deck_path)?;
    let tokens = match tokens_path {
        Some(p) => DesignTokens::load(p)?,
        None => DesignTokens::default(),
    };
    Ok((deck, tokens))
}
