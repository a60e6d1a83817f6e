//! QuoteArt CLI
//!
//! Commands: generate, params, data-url, download, compile, verify, samples,
//! mint-request
//! Outputs JSON to stdout (SVG for `generate` without `--out`)
//! Returns 1 on invalid input, 2 on validation failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use quoteart_core::{
    chain,
    logging::{default_log_level, init_logging},
    samples::SAMPLE_QUOTES,
    data_url, download, AppConfig, ArtworkManifest, ArtworkPipeline, GenerateRequest,
    GeneratedArtwork, PipelineError,
};

#[derive(Parser)]
#[command(name = "quoteart-cli")]
#[command(about = "QuoteArt CLI - deterministic quote artwork")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or write the SVG for a quote
    Generate {
        #[arg(short, long)]
        quote: String,
        #[arg(short, long)]
        author: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the digest and derived visual parameters
    Params {
        #[arg(short, long)]
        quote: String,
        #[arg(short, long)]
        author: String,
    },

    /// Print a base64 data URL of the artwork
    DataUrl {
        #[arg(short, long)]
        quote: String,
        #[arg(short, long)]
        author: String,
    },

    /// Save the artwork as quote-nft-<author>.svg
    Download {
        #[arg(short, long)]
        quote: String,
        #[arg(short, long)]
        author: String,
        /// Target directory (defaults to the configured output dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Override the file name
        #[arg(short, long)]
        filename: Option<String>,
    },

    /// Run the full pipeline on a JSON payload {"quote", "author"}
    Compile {
        #[arg(short, long)]
        payload: String,
    },

    /// Check that a manifest still reproduces
    Verify {
        /// JSON manifest (as produced by compile)
        #[arg(short, long)]
        manifest: String,
    },

    /// List the curated sample quotes
    Samples,

    /// Print the mint transaction request for a quote
    MintRequest {
        #[arg(short, long)]
        quote: String,
        #[arg(short, long)]
        author: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match AppConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    let level = if cli.verbose { default_log_level() } else { config.log_level.as_str() };
    if let Err(e) = init_logging(level, config.log_dir.as_deref()) {
        eprintln!("{}", serde_json::json!({ "error": e }));
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "success": false, "error": e.to_string() }));
            match e {
                PipelineError::ValidationFailed(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(command: Commands, config: &AppConfig) -> Result<String, PipelineError> {
    let pipeline = ArtworkPipeline::default();

    match command {
        Commands::Generate { quote, author, out } => {
            let svg = pipeline.generate_svg(&quote, &author);
            match out {
                Some(path) => {
                    std::fs::write(&path, &svg)?;
                    Ok(serde_json::json!({ "success": true, "path": path }).to_string())
                }
                None => Ok(svg),
            }
        }

        Commands::Params { quote, author } => {
            let artwork = GeneratedArtwork::generate(&quote, &author);
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "digest": artwork.digest(),
                "parameters": artwork.params(),
                "pattern": artwork.params().pattern(),
                "texture": artwork.params().texture(),
                "shape": artwork.params().shape(),
                "layers": artwork.scene().kinds(),
                "title": chain::token_title(&quote),
            }))?)
        }

        Commands::DataUrl { quote, author } => {
            Ok(data_url(&pipeline.generate_svg(&quote, &author)))
        }

        Commands::Download { quote, author, dir, filename } => {
            let blob = download(&quote, &author, filename.as_deref());
            let dir = dir.unwrap_or_else(|| config.output_dir.clone());
            let path = blob.save_in(&dir)?;
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "success": true,
                "path": path,
                "mime": blob.mime(),
                "bytes": blob.len(),
                "hash": blob.content_hash(),
            }))?)
        }

        Commands::Compile { payload } => {
            let request = GenerateRequest::from_json(&payload)?;
            let compiled = pipeline.compile(&request)?;
            Ok(serde_json::to_string_pretty(&serde_json::json!({
                "success": true,
                "artwork": compiled,
            }))?)
        }

        Commands::Verify { manifest } => {
            let manifest: ArtworkManifest = serde_json::from_str(&manifest)?;
            let reproduces = pipeline.verify(&manifest)?;
            Ok(serde_json::json!({ "id": manifest.id, "reproduces": reproduces }).to_string())
        }

        Commands::Samples => {
            let samples: Vec<_> = SAMPLE_QUOTES
                .iter()
                .map(|s| serde_json::json!({
                    "text": s.text,
                    "author": s.author,
                    "title": chain::token_title(s.text),
                }))
                .collect();
            Ok(serde_json::to_string_pretty(&samples)?)
        }

        Commands::MintRequest { quote, author } => {
            let tx = chain::mint_transaction(&config.chain, &quote, &author);
            Ok(serde_json::to_string_pretty(&tx.to_json())?)
        }
    }
}
