//! CLI commands implementation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;

use yomu::document::guess_mime;
use yomu::runtime;
use yomu::{ExtractionMode, Extractor, ExtractorConfig};

use super::helpers::{open_source, print_metadata};

#[derive(Parser)]
#[command(name = "yomu")]
#[command(about = "Extract text and metadata from documents with Apache Tika")]
#[command(version)]
pub struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true, env = "YOMU_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the tika-app jar
    #[arg(long, global = true)]
    jar: Option<PathBuf>,

    /// Java installation root (overrides JAVA_HOME)
    #[arg(long, global = true)]
    java_home: Option<PathBuf>,

    /// Kill the engine after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plain text of a document
    Text {
        /// File path, URI, or "-" for stdin
        input: String,
    },

    /// Print the document as XHTML
    Html {
        /// File path, URI, or "-" for stdin
        input: String,
    },

    /// Print document metadata as "key: value" lines
    Metadata {
        /// File path, URI, or "-" for stdin
        input: String,
        /// Print a JSON object instead
        #[arg(long)]
        json: bool,
    },

    /// Print the document's MIME type
    Mimetype {
        /// File path, URI, or "-" for stdin
        input: String,
    },

    /// Check that Java and the Tika jar are available
    Check,
}

impl Cli {
    fn extractor_config(&self) -> anyhow::Result<ExtractorConfig> {
        let mut config = ExtractorConfig::load(self.config.as_deref())?;
        if let Some(ref jar) = self.jar {
            config.jar_path = jar.clone();
        }
        if let Some(ref home) = self.java_home {
            config.java_home = Some(home.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let extractor = Extractor::new(cli.extractor_config()?);

    match cli.command {
        Commands::Text { input } => cmd_extract(&extractor, &input, ExtractionMode::Text).await,
        Commands::Html { input } => cmd_extract(&extractor, &input, ExtractionMode::Html).await,
        Commands::Metadata { input, json } => cmd_metadata(&extractor, &input, json).await,
        Commands::Mimetype { input } => cmd_mimetype(&extractor, &input).await,
        Commands::Check => cmd_check(&extractor),
    }
}

async fn cmd_extract(extractor: &Extractor, input: &str, mode: ExtractionMode) -> anyhow::Result<()> {
    let mut source = open_source(input)?;
    let extracted = extractor
        .extract_async(&mut source, mode)
        .await
        .with_context(|| format!("Failed to extract {} from {}", mode, input))?;
    println!("{}", extracted.as_text().unwrap_or_default());
    Ok(())
}

async fn cmd_metadata(extractor: &Extractor, input: &str, json: bool) -> anyhow::Result<()> {
    let mut source = open_source(input)?;
    let metadata = extractor
        .extract_async(&mut source, ExtractionMode::Metadata)
        .await
        .with_context(|| format!("Failed to extract metadata from {}", input))?
        .into_metadata()
        .unwrap_or_default();
    print_metadata(&metadata, json)
}

async fn cmd_mimetype(extractor: &Extractor, input: &str) -> anyhow::Result<()> {
    let mut source = open_source(input)?;
    let metadata = extractor
        .extract_async(&mut source, ExtractionMode::Metadata)
        .await
        .with_context(|| format!("Failed to extract metadata from {}", input))?
        .into_metadata()
        .unwrap_or_default();

    match metadata.mime_type().or_else(|| guess_mime(&source)) {
        Some(mime) => println!("{}", mime),
        None => anyhow::bail!("Could not determine the MIME type of {}", input),
    }
    Ok(())
}

fn cmd_check(extractor: &Extractor) -> anyhow::Result<()> {
    println!("\n{}", style("Engine Status").bold());
    println!("{}", "-".repeat(50));

    let java = extractor.java();
    let java_found = runtime::locate(&java);
    let java_status = match java_found {
        Some(ref path) => style(format!("✓ {}", path.display())).green(),
        None => style(format!("✗ {} not found", java.display())).red(),
    };
    println!("  {:<15} {}", "java", java_status);

    let jar = &extractor.config().jar_path;
    let jar_found = jar.is_file();
    let jar_status = if jar_found {
        style(format!("✓ {}", jar.display())).green()
    } else {
        style(format!("✗ {} not found", jar.display())).red()
    };
    println!("  {:<15} {}", "tika-app.jar", jar_status);

    println!();
    if java_found.is_some() && jar_found {
        println!("{} Ready to extract documents", style("✓").green());
    } else {
        println!(
            "{} Some components are missing:",
            style("!").yellow()
        );
        if java_found.is_none() {
            println!("  - java: install a JRE or set {}", runtime::JAVA_HOME_VAR);
        }
        if !jar_found {
            println!("  - tika-app.jar: download it and pass --jar or set YOMU_TIKA_JAR");
        }
    }

    Ok(())
}
