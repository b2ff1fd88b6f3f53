use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;

use flashcards_core::{CompletionClient, Config, Flashcard, Upload, process_upload};
use flashcards_pdf::MupdfExtractor;

/// PDF Flashcards - generate question/answer flashcards from a PDF
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the PDF file
    pdf_path: PathBuf,

    /// Print the flashcards as a JSON array
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Chat-completion endpoint URL
    #[arg(long)]
    api_url: Option<String>,

    /// Model identifier sent to the completion endpoint
    #[arg(long)]
    model: Option<String>,

    /// Number of text chunks sent for completion
    #[arg(long)]
    max_chunks: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let defaults = Config::default();
    let config = Config {
        api_url: args
            .api_url
            .or_else(|| std::env::var("FLASHCARDS_API_URL").ok())
            .unwrap_or(defaults.api_url.clone()),
        api_key: std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty()),
        model: args
            .model
            .or_else(|| std::env::var("FLASHCARDS_MODEL").ok())
            .unwrap_or(defaults.model.clone()),
        max_chunks: args.max_chunks.unwrap_or(defaults.max_chunks),
        ..defaults
    };

    let filename = args
        .pdf_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| args.pdf_path.display().to_string());
    let bytes = read_pdf(&args.pdf_path)?;

    let client = CompletionClient::new(config.clone())?;
    let flashcards = process_upload(
        Some(Upload::new(filename, bytes)),
        Arc::new(MupdfExtractor),
        &client,
        &config,
    )
    .await?;

    if args.json {
        println!("{}", render_json(&flashcards)?);
    } else {
        print!("{}", render_text(&flashcards, !args.no_color));
    }

    Ok(())
}

fn read_pdf(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read PDF file {}", path.display()))
}

fn render_json(flashcards: &[Flashcard]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(flashcards)
}

fn render_text(flashcards: &[Flashcard], color: bool) -> String {
    if flashcards.is_empty() {
        return "No flashcards found in the completion output.\n".to_string();
    }

    let mut out = String::new();
    for (i, card) in flashcards.iter().enumerate() {
        let number = format!("{:>3}.", i + 1);
        if color {
            out.push_str(&format!(
                "{} {} {}\n     {} {}\n\n",
                number.dimmed(),
                "Q:".bold().cyan(),
                card.question,
                "A:".bold().green(),
                card.answer
            ));
        } else {
            out.push_str(&format!(
                "{} Q: {}\n     A: {}\n\n",
                number, card.question, card.answer
            ));
        }
    }
    out
}
