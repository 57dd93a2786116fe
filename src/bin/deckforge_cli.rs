//! DeckForge CLI
//!
//! Commands: render, validate, cards
//! Outputs JSON to stdout
//! `validate` returns 2 when any record has violations; everything else
//! returns 1 on failure

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, layer::SubscriberExt, util::SubscriberInitExt};

use deckforge_core::{
    cards::CardKind,
    pipeline::{load_inputs, OutputFormat, RenderPlan},
    validation::Validator,
    DeckPipeline, FontBook,
};

#[derive(Parser)]
#[command(name = "deckforge-cli")]
#[command(about = "DeckForge CLI - Deterministic card deck renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Render card images and a manifest to a directory
    Render {
        /// Path to the deck JSON file
        #[arg(short, long, default_value = "data/cards.json")]
        cards: PathBuf,

        /// Path to the design token JSON file
        #[arg(short, long)]
        tokens: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        output: PathBuf,

        /// Encoded image format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
        format: OutputFormat,

        /// Card types to render (default: all)
        #[arg(long, value_delimiter = ',')]
        types: Vec<CardKind>,
    },

    /// Validate deck records without rendering
    Validate {
        #[arg(short, long, default_value = "data/cards.json")]
        cards: PathBuf,

        #[arg(short, long)]
        tokens: Option<PathBuf>,

        #[arg(long, value_delimiter = ',')]
        types: Vec<CardKind>,
    },

    /// List deck contents with definition and instance counts
    Cards {
        #[arg(short, long, default_value = "data/cards.json")]
        cards: PathBuf,
    },
}

fn initialize_logging(level: LevelFilter) {
    tracing_subscriber::registry()
        .with(Targets::new().with_default(level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn kind_set(types: &[CardKind]) -> BTreeSet<CardKind> {
    if types.is_empty() {
        CardKind::ALL.iter().copied().collect()
    } else {
        types.iter().copied().collect()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logging(cli.log_level);

    match cli.command {
        Commands::Render { cards, tokens, output, format, types } => {
            let (deck, tokens) = match load_inputs(&cards, tokens.as_deref()) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("failed to load inputs: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let fonts = match FontBook::load(&tokens.typography) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{e}");
                    return ExitCode::FAILURE;
                }
            };

            let plan = RenderPlan { kinds: kind_set(&types), format, out_dir: output };
            let pipeline = DeckPipeline::new(tokens, fonts);

            match pipeline.render_deck(&deck, &plan) {
                Ok(summary) => {
                    let output = serde_json::json!({
                        "rendered": summary.rendered,
                        "skipped": summary.skipped,
                        "per_kind": summary.per_kind,
                        "manifest": summary.manifest_path,
                        "manifest_digest": summary.manifest_digest,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("render failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }

        Commands::Validate { cards, tokens, types } => {
            // Validation never rasterizes, so no font book is needed here.
            let (deck, _tokens) = match load_inputs(&cards, tokens.as_deref()) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("failed to load inputs: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let reports = Validator::new().validate_deck(&deck, &kind_set(&types));
            let failing: Vec<_> = reports.iter().filter(|r| r.has_errors()).collect();

            println!("{}", serde_json::to_string_pretty(&reports).unwrap());
            if failing.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }

        Commands::Cards { cards } => {
            let deck = match deckforge_core::DeckFile::load(&cards) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("failed to load deck: {e}");
                    return ExitCode::FAILURE;
                }
            };

            let counts: Vec<_> = CardKind::ALL
                .iter()
                .map(|k| serde_json::json!({
                    "kind": k.to_string(),
                    "definitions": deck.definition_count(*k),
                    "instances": deck.instance_count(*k),
                }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&counts).unwrap());
            ExitCode::SUCCESS
        }
    }
}
