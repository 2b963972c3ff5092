use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lectern::{
    config::Config,
    extraction::DocumentLocation,
    logging,
    processing::{LengthPreset, SummaryProvider, SummaryService},
};

#[derive(Parser)]
#[command(
    name = "lectern-summarize",
    about = "Summarize a lecture document (PDF, DOCX, or plain text) from the command line"
)]
struct Cli {
    /// Document to summarize.
    file: PathBuf,
    /// Summary length preset.
    #[arg(long, default_value = "medium", value_parser = parse_length)]
    length: LengthPreset,
    /// MIME type hint used to pick the extractor when the extension is ambiguous.
    #[arg(long)]
    mime: Option<String>,
    /// Print the full result as JSON instead of the summary text.
    #[arg(long)]
    json: bool,
}

fn parse_length(value: &str) -> Result<LengthPreset, String> {
    value
        .parse()
        .map_err(|()| format!("expected one of short, medium, long; got `{value}`"))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = Config::from_env().context("loading configuration")?;
    let service = SummaryService::new(&config).context("building summarization client")?;

    let mut document = DocumentLocation::new(cli.file.clone());
    if let Some(mime) = cli.mime {
        document = document.with_mime_hint(mime);
    }

    let result = service
        .produce_summary(&document, cli.length)
        .await
        .with_context(|| format!("summarizing {}", cli.file.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if result.provider == SummaryProvider::Fallback {
            tracing::info!("Summary produced by the local extractive fallback");
        }
        println!("{}", result.text);
    }
    Ok(())
}
