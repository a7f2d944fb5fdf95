use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use outline_bridge_config::Config;
use outline_bridge_engine::FormatBridge;
use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

/// Convert chat-message markdown to sanitized HTML or outline text, and
/// outline text back to markdown.
#[derive(Debug, Parser)]
#[command(name = "outline-bridge", version, about)]
struct Cli {
    /// Config file to use instead of ~/.config/outline-bridge/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Markdown to sanitized HTML
    Html(Input),
    /// Markdown to outline text
    Outline(Input),
    /// Outline text to markdown
    Markdown(Input),
    /// Write the default configuration if none exists yet
    InitConfig,
}

#[derive(Debug, Args)]
struct Input {
    /// File to read; standard input when omitted
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .as_deref()
        .map(|path| Config::expand_path(path).unwrap_or_else(|| path.to_path_buf()));

    match &cli.command {
        Command::InitConfig => init_config(config_path.as_deref()),
        Command::Html(input) => {
            convert(config_path.as_deref(), input, FormatBridge::render_to_html)
        }
        Command::Outline(input) => {
            convert(config_path.as_deref(), input, FormatBridge::to_outline_format)
        }
        Command::Markdown(input) => {
            convert(config_path.as_deref(), input, FormatBridge::from_outline_format)
        }
    }
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let loaded = match config_path {
        Some(path) => {
            log::debug!("Config path: {}", path.display());
            Config::load_from_path(path)?
        }
        None => {
            log::debug!("Config path: {}", Config::config_path().display());
            Config::load()?
        }
    };
    Ok(loaded.unwrap_or_else(|| {
        log::debug!("No config file found, using defaults");
        Config::default()
    }))
}

fn convert(
    config_path: Option<&Path>,
    input: &Input,
    operation: fn(&FormatBridge, &str) -> String,
) -> Result<()> {
    let config = load_config(config_path)?;
    let bridge = FormatBridge::new(config.bridge_options());
    let output = operation(&bridge, &read_input(input)?);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

fn read_input(input: &Input) -> Result<String> {
    match &input.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read standard input")?;
            Ok(text)
        }
    }
}

fn init_config(config_path: Option<&Path>) -> Result<()> {
    let target = config_path.map_or_else(Config::config_path, Path::to_path_buf);
    if target.exists() {
        log::warn!("Config already exists at {}", target.display());
        return Ok(());
    }
    match config_path {
        Some(path) => Config::default().save_to_path(path)?,
        None => Config::default().save()?,
    }
    println!("Wrote default config to {}", target.display());
    Ok(())
}
