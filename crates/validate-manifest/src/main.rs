use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validate_manifest::{OutputFormat, run};

#[derive(Parser)]
#[command(name = "validate-manifest")]
#[command(about = "Lint a Pod manifest against the deployment schema")]
#[command(version)]
struct Cli {
    /// Path to the manifest file to validate
    manifest: PathBuf,

    /// Emit diagnostics as JSON, one object per line
    #[arg(long)]
    json: bool,

    /// Exit non-zero when any diagnostic is produced
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "validate_manifest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let lines = run(&cli.manifest, format)?;
    for line in &lines {
        println!("{line}");
    }

    if cli.strict && !lines.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
