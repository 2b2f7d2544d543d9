//! Shaper CLI
//!
//! Runs the built-in extraction tasks against a DeepSeek-compatible endpoint.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

mod config;
mod display;
mod error;
mod samples;

use clap::{Args, Parser, Subcommand};
use error::{CliError, Result};
use shaper::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, IssueLevel, ShaperConfig, config_path, load_config_from};

/// Shaper - structured output from LLM replies
#[derive(Parser)]
#[command(name = "shaper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "SHAPER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize, classify the tone of and rewrite a paragraph
    Transform(InputArgs),

    /// Extract structured fields from a resume
    Extract(InputArgs),

    /// Analyze product reviews (runs the built-in samples without input)
    Analyze(InputArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Input selection shared by the task commands
#[derive(Args)]
struct InputArgs {
    /// Input text
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// Read input from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Arguments for the config command
#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose);

    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        tracing::warn!("failed to load .env: {e}");
    }

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "shaper={level},shaper_cli={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let path = cli.config.unwrap_or_else(config_path);
    match cli.command {
        Commands::Transform(args) => cmd_transform(args, &path).await,
        Commands::Extract(args) => cmd_extract(args, &path).await,
        Commands::Analyze(args) => cmd_analyze(args, &path).await,
        Commands::Config(args) => cmd_config(args, &path).await,
    }
}

/// Loads and validates settings, then builds the model client.
async fn setup(path: &Path) -> Result<(ShaperConfig, SharedChatProvider)> {
    let config = load_config_from(path).await?;

    let issues = config.validate();
    for issue in &issues {
        tracing::warn!("{issue}");
    }
    let errors = issues
        .iter()
        .filter(|i| i.level == IssueLevel::Error)
        .count();
    if errors > 0 {
        return Err(CliError::InvalidConfig(errors));
    }

    let credentials = config.provider.resolve(|key| std::env::var(key).ok())?;
    let client = DeepSeek::new(credentials)?;
    tracing::info!(base_url = %client.base_url(), model = %client.model(), "model client ready");
    Ok((config, Arc::new(client)))
}

/// Returns the given text, the file's contents, or `None`.
async fn read_input(args: &InputArgs) -> Result<Option<String>> {
    if let Some(text) = &args.text {
        return Ok(Some(text.clone()));
    }
    let Some(path) = &args.file else {
        return Ok(None);
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Input {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(content))
}

async fn cmd_transform(args: InputArgs, path: &Path) -> Result<()> {
    let (config, provider) = setup(path).await?;
    let settings = config.tasks.transform.settings(shaper::tasks::transformer::DEFAULT_TEMPERATURE);
    let transformer = TextTransformer::with_settings(provider, settings)?;

    let paragraph = read_input(&args)
        .await?
        .unwrap_or_else(|| samples::PARAGRAPH.to_owned());
    let out = transformer.transform(&paragraph).await?;

    if args.json {
        let value = serde_json::json!({
            "summary": out.transformation.summary,
            "tone": out.transformation.tone,
            "improved_version": out.transformation.improved_version,
            "error": out.error.as_ref().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", display::transformation(&out));
    }
    Ok(())
}

async fn cmd_extract(args: InputArgs, path: &Path) -> Result<()> {
    let (config, provider) = setup(path).await?;
    let settings = config.tasks.extract.settings(shaper::tasks::resume::DEFAULT_TEMPERATURE);
    let extractor = ResumeExtractor::with_settings(provider, settings)?;

    let resume = read_input(&args)
        .await?
        .unwrap_or_else(|| samples::RESUME.to_owned());
    let out = extractor.extract(&resume).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&out.to_json())?);
    } else {
        print!("{}", display::resume(&out)?);
    }
    Ok(())
}

async fn cmd_analyze(args: InputArgs, path: &Path) -> Result<()> {
    let (config, provider) = setup(path).await?;
    let settings = config.tasks.analyze.settings(shaper::tasks::review::DEFAULT_TEMPERATURE);
    let analyzer = ReviewAnalyzer::with_settings(provider, settings)?;

    let reviews = match read_input(&args).await? {
        Some(text) => vec![text],
        None => samples::REVIEWS.iter().map(|r| (*r).to_owned()).collect(),
    };

    let mut results = Vec::with_capacity(reviews.len());
    for review in &reviews {
        results.push(analyzer.analyze(review).await?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for (i, analysis) in results.iter().enumerate() {
            println!("{}", display::review(i + 1, analysis.as_ref()));
        }
    }
    Ok(())
}

/// Configuration management.
async fn cmd_config(args: ConfigArgs, path: &Path) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let config = load_config_from(path).await?;
            let content = toml::to_string_pretty(&config).map_err(ConfigError::from)?;
            if !path.exists() {
                println!("# {} does not exist; showing defaults", path.display());
            }
            println!("{content}");
        }
        ConfigCommands::Validate => {
            let config = load_config_from(path).await?;
            let issues = config.validate();
            if issues.is_empty() {
                println!("Configuration is valid");
            }
            for issue in &issues {
                println!("{issue}");
            }
            if !config.is_valid() {
                return Err(CliError::InvalidConfig(
                    issues
                        .iter()
                        .filter(|i| i.level == IssueLevel::Error)
                        .count(),
                ));
            }
        }
    }
    Ok(())
}
