use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mosaic_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "mosaic")]
#[command(author, version, about = "A terminal masonry gallery with a deep-linkable lightbox")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Manifest to open (shorthand for `run <manifest>`)
    manifest: Option<PathBuf>,

    /// Deep link to open at start: a URL carrying the item parameter, or a bare key
    #[arg(short = 'l', long)]
    link: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the gallery in the terminal
    Run {
        /// Gallery manifest (TOML or JSON)
        manifest: PathBuf,
        /// Deep link to open at start: a URL carrying the item parameter, or a bare key
        #[arg(short = 'l', long)]
        link: Option<String>,
    },
    /// Print the masonry layout for a container width
    Layout {
        manifest: PathBuf,
        /// Container width in logical pixels
        #[arg(short = 'w', long)]
        width: f64,
        /// Column count (defaults to the configured breakpoints)
        #[arg(short = 'c', long)]
        columns: Option<usize>,
    },
    /// Show which item a deep-link key opens
    Resolve {
        manifest: PathBuf,
        /// Item id, title slug, or URL
        key: String,
    },
    /// Validate a manifest and summarise its contents
    Check {
        manifest: PathBuf,
    },
}

impl Cli {
    /// Whether this invocation takes over the terminal
    fn starts_tui(&self) -> bool {
        match &self.command {
            Some(Commands::Run { .. }) => true,
            Some(_) => false,
            None => self.manifest.is_some(),
        }
    }
}

fn tui_log_writer() -> BoxMakeWriter {
    let path = AppConfig::log_path();
    let file = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));
    match file {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Arc::new(AppConfig::load()?);

    // Initialize logging; the TUI draws on the terminal, so its logs go to a file
    let tui = cli.starts_tui();
    let writer = if tui {
        tui_log_writer()
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(!tui)
                .with_writer(writer),
        )
        .init();

    match cli.command {
        Some(Commands::Run { manifest, link }) => commands::run::run(config, &manifest, link).await,
        Some(Commands::Layout {
            manifest,
            width,
            columns,
        }) => commands::layout::run(&config, &manifest, width, columns),
        Some(Commands::Resolve { manifest, key }) => commands::resolve::run(&config, &manifest, &key),
        Some(Commands::Check { manifest }) => commands::check::run(&config, &manifest),
        None => match cli.manifest {
            Some(manifest) => commands::run::run(config, &manifest, cli.link).await,
            None => bail!("No manifest given.\n\nUsage:\n  mosaic <manifest.toml>\n  mosaic --help"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_run_takes_over_the_terminal() {
        assert!(Cli::parse_from(["mosaic", "gallery.toml"]).starts_tui());
        assert!(Cli::parse_from(["mosaic", "run", "gallery.toml"]).starts_tui());
        assert!(!Cli::parse_from(["mosaic", "check", "gallery.toml"]).starts_tui());
        assert!(!Cli::parse_from(["mosaic", "resolve", "gallery.toml", "harbour"]).starts_tui());
        assert!(!Cli::parse_from(["mosaic"]).starts_tui());
    }
}
