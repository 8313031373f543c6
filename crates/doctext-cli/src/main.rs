use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use doctext_core::FormatTag;
use doctext_ingest::UploadedDocument;

/// Extract plain text from PDF, DOCX and PPTX files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text content of a document
    Read {
        /// Path to the PDF, DOCX or PPTX file
        file_path: PathBuf,

        /// Declared MIME type (default: guessed from the file extension)
        #[arg(long)]
        content_type: Option<String>,

        /// Print the `{"filename", "content"}` JSON body instead of raw text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Read {
            file_path,
            content_type,
            json,
        } => read(&file_path, content_type, json),
    }
}

fn read(file_path: &Path, content_type: Option<String>, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read(file_path)
        .with_context(|| format!("failed to read {}", file_path.display()))?;

    let filename = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = resolve_content_type(file_path, content_type);

    let document = UploadedDocument::new(filename, content_type, data);
    let result = doctext_ingest::extract(&document)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.content);
    }
    Ok(())
}

/// An explicit `--content-type` wins; otherwise the extension picks one.
/// Unknown extensions yield an empty type, which extraction rejects.
fn resolve_content_type(file_path: &Path, explicit: Option<String>) -> String {
    if let Some(content_type) = explicit {
        return content_type;
    }
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(FormatTag::from_extension)
        .and_then(FormatTag::mime)
        .unwrap_or_default()
        .to_string()
}
