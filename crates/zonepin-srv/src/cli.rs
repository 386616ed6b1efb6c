//! Command-line interface and command dispatch.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{info, Level};
use zonepin_core::config::DEFAULT_CONFIG_PATH;
use zonepin_core::{Config, DiskStore};

use crate::app::AppState;
use crate::reload::ShellReload;
use crate::routes;
use crate::server;
use crate::telemetry::{init_tracing, LogConfig, LogFormat};

/// Pin a DNS host to a list of addresses through a web form.
///
/// Rewrites the host's A/AAAA lines in a zone fragment, keeps a timestamped
/// backup of the previous file and runs the configured reload command.
#[derive(Parser, Debug)]
#[command(name = "zonepin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, global = true, env = "ZONEPIN_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(short = 'l', long, global = true, default_value = "info")]
    pub log_level: Level,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the web form on all configured addresses (default)
    Serve,

    /// Validate the configuration and print the current records
    Check,

    /// Apply addresses from a file ("-" for stdin) and reload DNS
    Apply {
        /// File with one address per line
        input: PathBuf,
    },
}

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&LogConfig {
        level: cli.log_level,
        format: cli.log_format,
    });

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Check => check(config).await,
        Commands::Apply { input } => apply(config, &input).await,
    }
}

fn app_state(config: Config) -> Result<AppState> {
    let reloader = Arc::new(ShellReload::new(config.command.clone()));
    Ok(AppState::new(config, Arc::new(DiskStore), reloader)?)
}

async fn serve(config: Config) -> Result<()> {
    let addrs = config.listen_addrs()?;
    let state = Arc::new(app_state(config)?);
    let router = routes::router(state);

    tokio::select! {
        result = server::serve(&addrs, router) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}

async fn check(config: Config) -> Result<()> {
    println!("zone file:  {}", config.file.display());
    println!("host:       {}", config.host);
    println!("backup dir: {}", config.backup_dir.display());
    for addr in config.listen_addrs()? {
        println!("listen:     {addr}");
    }

    let state = app_state(config)?;
    let addresses = state.current_addresses().await?;
    if addresses.is_empty() {
        println!("no records");
    }
    for address in addresses {
        println!("record:     {address}");
    }
    Ok(())
}

async fn apply(config: Config, input: &Path) -> Result<()> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?
    };

    let state = app_state(config)?;
    let outcome = state.apply(raw).await;
    println!("{}", outcome.status.message());
    if outcome.status.is_error() {
        bail!("update failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["zonepin"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("conf.toml"));
        assert_eq!(cli.log_level, Level::INFO);
        assert_eq!(cli.log_format, LogFormat::Text);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_apply_args() {
        let cli = Cli::try_parse_from([
            "zonepin",
            "--config",
            "/etc/zonepin.json",
            "--log-format",
            "json",
            "apply",
            "-",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(cli.command, Some(Commands::Apply { ref input }) if input == Path::new("-")));
    }
}
