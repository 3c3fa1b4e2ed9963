//! Print the OpenAPI document as JSON, or write it to a file.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use subscriptions_aggregator::ApiDoc;
use utoipa::OpenApi;

/// Dump the generated OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Args {
    /// Destination file; stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let json = if args.pretty {
        doc.to_pretty_json()?
    } else {
        doc.to_json()?
    };

    match args.output {
        Some(path) => std::fs::write(path, json)?,
        None => writeln!(std::io::stdout().lock(), "{json}")?,
    }
    Ok(())
}
