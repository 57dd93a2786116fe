//! Deck Invariant Tests
//!
//! These tests verify the non-negotiable guarantees: expansion matches
//! declared quantities, a bad record never aborts a batch, output is
//! manifest-verified, and the shipped data files actually pass their own
//! validation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use deckforge_core::{
    cards::CardKind,
    pipeline::{DeckPipeline, OutputFormat, PipelineError, RenderPlan},
    validation::Validator,
    DeckFile, DesignTokens, FontBook,
};

fn data_path(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn all_kinds() -> BTreeSet<CardKind> {
    CardKind::ALL.iter().copied().collect()
}

fn fonts() -> Option<FontBook> {
    match FontBook::load(&Default::default()) {
        Ok(f) => Some(f),
        Err(_) => {
            eprintln!("skipping: no system font available");
            None
        }
    }
}

const SMALL_DECK: &str = r#"{
    "property_cards": [
        {"id": "brown-01", "name": "Mediterranean Avenue", "color": "brown",
         "value": 1, "set_size": 2, "rent_values": [[1, 1], [2, 2]]}
    ],
    "action_cards": [
        {"id": "pass-go", "name": "Pass Go", "value": 1,
         "description": "Draw two extra cards.", "quantity": 2}
    ],
    "rent_cards": [
        {"id": "rent-brown-light-blue", "name": "Rent",
         "colors": ["brown", "light_blue"], "value": 1}
    ],
    "wildcard_cards": [
        {"id": "wild-multi", "is_multicolor": true, "value": 0}
    ],
    "money_cards": [
        {"denomination": 5, "quantity": 2}
    ]
}"#;

#[test]
fn invariant_shipped_deck_expands_to_declared_totals() {
    let deck = DeckFile::load(&data_path("cards.json")).unwrap();

    assert!(deck.unknown_sections.is_empty());
    assert!(deck.malformed.is_empty());

    assert_eq!(deck.instance_count(CardKind::Property), 28);
    assert_eq!(deck.instance_count(CardKind::Action), 34);
    assert_eq!(deck.instance_count(CardKind::Rent), 13);
    assert_eq!(deck.instance_count(CardKind::Wildcard), 11);
    assert_eq!(deck.instance_count(CardKind::Money), 20);

    let cards = deck.expand(&all_kinds());
    assert_eq!(cards.len(), 106);

    // Expanded ids are unique.
    let ids: BTreeSet<&str> = cards.iter().map(|c| c.id()).collect();
    assert_eq!(ids.len(), cards.len());
}

#[test]
fn invariant_shipped_deck_validates_clean() {
    let deck = DeckFile::load(&data_path("cards.json")).unwrap();
    let reports = Validator::new().validate_deck(&deck, &all_kinds());

    assert_eq!(reports.len(), 28 + 10 + 6 + 8 + 6);
    for report in &reports {
        assert!(report.valid, "{} has violations: {:?}", report.card_id, report.violations);
    }
}

#[test]
fn invariant_shipped_tokens_parse_and_verify() {
    let tokens = DesignTokens::load(&data_path("design_tokens.json")).unwrap();
    assert_eq!(tokens.card.width, 413);
    assert_eq!(tokens.card.height, 455);
    assert!(!tokens.footer_text.is_empty());
}

#[test]
fn invariant_full_shipped_deck_renders_106_files() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::load(&data_path("cards.json")).unwrap();
    let tokens = DesignTokens::load(&data_path("design_tokens.json")).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let plan = RenderPlan::all_kinds(OutputFormat::Png, dir.path().to_path_buf());
    let summary = DeckPipeline::new(tokens, fonts).render_deck(&deck, &plan).unwrap();

    assert_eq!(summary.rendered, 106);
    assert_eq!(summary.skipped, 0);

    let mut image_files = 0;
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let entry = entry.unwrap();
        assert!(entry.metadata().unwrap().len() > 0, "zero-byte output: {:?}", entry.path());
        if entry.path().extension().is_some_and(|e| e == "png") {
            image_files += 1;
        }
    }
    assert_eq!(image_files, 106);
}

#[test]
fn invariant_render_writes_one_file_per_instance_plus_manifest() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::from_json(SMALL_DECK).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let plan = RenderPlan::all_kinds(OutputFormat::Png, dir.path().to_path_buf());
    let pipeline = DeckPipeline::new(DesignTokens::default(), fonts);
    let summary = pipeline.render_deck(&deck, &plan).unwrap();

    // 1 property + 2 actions + 1 rent + 1 wildcard + 2 money
    assert_eq!(summary.rendered, 7);
    assert_eq!(summary.skipped, 0);

    let mut image_files = 0;
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let entry = entry.unwrap();
        assert!(entry.metadata().unwrap().len() > 0, "zero-byte output");
        if entry.path().extension().is_some_and(|e| e == "png") {
            image_files += 1;
        }
    }
    assert_eq!(image_files, 7);
    assert!(summary.manifest_path.exists());
}

#[test]
fn invariant_bad_record_is_skipped_without_aborting_batch() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::from_json(
        r#"{
            "property_cards": [
                {"id": "bad", "name": "Nowhere", "color": "mauve",
                 "value": 1, "set_size": 2, "rent_values": [[1, 1]]}
            ],
            "money_cards": [
                {"denomination": 1}
            ]
        }"#,
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();

    let plan = RenderPlan {
        kinds: [CardKind::Property, CardKind::Money].into_iter().collect(),
        format: OutputFormat::Png,
        out_dir: dir.path().to_path_buf(),
    };
    let pipeline = DeckPipeline::new(DesignTokens::default(), fonts);
    let summary = pipeline.render_deck(&deck, &plan).unwrap();

    assert_eq!(summary.rendered, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.rejected[0].card_id, "bad");
    assert!(dir.path().join("money-1m.png").exists());
    assert!(!dir.path().join("bad.png").exists());
}

#[test]
fn invariant_pipeline_validate_reports_without_writing() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::from_json(
        r#"{
            "rent_cards": [
                {"id": "rent-bad", "name": "Rent", "colors": ["brown"], "value": 1}
            ],
            "money_cards": [
                {"denomination": 2}
            ]
        }"#,
    )
    .unwrap();

    let pipeline = DeckPipeline::new(DesignTokens::default(), fonts);
    let reports = pipeline.validate_deck(&deck, &all_kinds());

    assert_eq!(reports.len(), 2);
    let bad = reports.iter().find(|r| r.card_id == "rent-bad").unwrap();
    assert!(bad.has_errors());
    assert_eq!(bad.violations[0].rule, "rent_shape");
}

#[test]
fn invariant_requested_kind_with_no_records_is_an_error() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::from_json(r#"{"money_cards": [{"denomination": 1}]}"#).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let plan = RenderPlan {
        kinds: [CardKind::Property, CardKind::Money].into_iter().collect(),
        format: OutputFormat::Png,
        out_dir: dir.path().to_path_buf(),
    };
    let pipeline = DeckPipeline::new(DesignTokens::default(), fonts);

    match pipeline.render_deck(&deck, &plan) {
        Err(PipelineError::NoCards(kind)) => assert_eq!(kind, CardKind::Property),
        other => panic!("expected NoCards, got {other:?}"),
    }
}

#[test]
fn invariant_manifest_digest_matches_recomputation() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::from_json(SMALL_DECK).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let plan = RenderPlan::all_kinds(OutputFormat::Png, dir.path().to_path_buf());
    let pipeline = DeckPipeline::new(DesignTokens::default(), fonts);
    let summary = pipeline.render_deck(&deck, &plan).unwrap();

    let raw = std::fs::read_to_string(&summary.manifest_path).unwrap();
    let mut manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stored = manifest["digest"].as_str().unwrap().to_string();
    assert_eq!(stored, summary.manifest_digest);

    manifest["digest"] = serde_json::Value::String(String::new());
    let recomputed = deckforge_core::compute_manifest_digest(&manifest).unwrap();
    assert_eq!(recomputed, stored);

    // Every manifest entry points at an existing file with the listed digest.
    for entry in manifest["entries"].as_array().unwrap() {
        let bytes = std::fs::read(dir.path().join(entry["file"].as_str().unwrap())).unwrap();
        assert_eq!(deckforge_core::sha256_hex(&bytes), entry["sha256"].as_str().unwrap());
    }
}

#[test]
fn invariant_repeat_runs_are_bit_identical() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::from_json(SMALL_DECK).unwrap();

    let run = |fonts: FontBook| {
        let dir = tempfile::tempdir().unwrap();
        let plan = RenderPlan::all_kinds(OutputFormat::Png, dir.path().to_path_buf());
        let summary = DeckPipeline::new(DesignTokens::default(), fonts)
            .render_deck(&deck, &plan)
            .unwrap();
        summary.manifest_digest
    };

    assert_eq!(run(fonts.clone()), run(fonts));
}

#[test]
fn invariant_webp_output_uses_webp_extension() {
    let Some(fonts) = fonts() else { return };
    let deck = DeckFile::from_json(r#"{"money_cards": [{"denomination": 10}]}"#).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let plan = RenderPlan {
        kinds: [CardKind::Money].into_iter().collect(),
        format: OutputFormat::Webp,
        out_dir: dir.path().to_path_buf(),
    };
    let summary = DeckPipeline::new(DesignTokens::default(), fonts)
        .render_deck(&deck, &plan)
        .unwrap();

    assert_eq!(summary.rendered, 1);
    assert!(dir.path().join("money-10m.webp").exists());
}
