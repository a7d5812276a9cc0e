//! clonedir - mirror a directory tree into one or more destinations
//!
//! Entries whose fingerprint already matches are skipped, everything else is
//! copied, and destination entries that no longer exist in the source are
//! deleted.

mod display;
mod json_output;
mod progress;

use anyhow::{bail, Context, Result};
use clap::Parser;
use clonedir_config::{Config, ConfigLoader};
use clonedir_sync::{MirrorEngine, MirrorOptions, MirrorRequest};
use clonedir_types::ErrorPolicy;
use console::style;
use json_output::MirrorResultJson;
use progress::ConsoleObserver;
use std::path::PathBuf;
use tracing::info;

/// clonedir - mirror a directory tree into one or more destinations
#[derive(Parser, Debug)]
#[command(
    name = "clonedir",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mirror a source directory into one or more destination directories",
    long_about = "clonedir makes every destination an exact copy of the source tree.\n\
                  Unchanged entries are detected by a length and byte-sum checksum and\n\
                  skipped; entries missing from the source are deleted."
)]
struct Cli {
    /// The source directory to use
    source: PathBuf,

    /// The destination directories to use
    #[arg(required = true, num_args = 1..)]
    clones: Vec<PathBuf>,

    /// Skip entries whose checksum matches ("true" enables, anything else disables)
    #[arg(long = "use-checksum", visible_alias = "use_checksum", value_name = "BOOL", value_parser = parse_bool_flag)]
    use_checksum: Option<bool>,

    /// Dry run - show what would be done
    #[arg(long)]
    dry_run: bool,

    /// Keep mirroring the remaining destinations after one fails
    #[arg(long)]
    keep_going: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,
}

/// Only the case-insensitive string "true" enables a flag
fn parse_bool_flag(value: &str) -> std::result::Result<bool, String> {
    Ok(value.to_lowercase() == "true")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&cli, &config)?;

    info!("clonedir v{} starting", env!("CARGO_PKG_VERSION"));

    let options = resolve_options(&cli, &config);
    mirror_command(&cli, options)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load_default().context("Failed to load configuration")?,
    };
    Ok(config)
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Invalid log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

/// Command-line flags override the configuration file and environment
fn resolve_options(cli: &Cli, config: &Config) -> MirrorOptions {
    let mut options = MirrorOptions::from(&config.mirror);
    if let Some(use_checksum) = cli.use_checksum {
        options.use_checksum = use_checksum;
    }
    if cli.dry_run {
        options.dry_run = true;
    }
    if cli.keep_going {
        options.on_error = ErrorPolicy::Continue;
    }
    options
}

fn mirror_command(cli: &Cli, options: MirrorOptions) -> Result<()> {
    let console_output = !cli.quiet && !cli.json;

    if console_output && options.dry_run {
        println!(
            "{} Dry run mode - no changes will be made",
            style("ℹ").yellow()
        );
    }

    let engine = MirrorEngine::with_options(options);
    let request = MirrorRequest::new(&cli.source, &cli.clones);
    let mut observer = ConsoleObserver::new(console_output, options.dry_run);

    let report = engine.run(&request, &mut observer)?;

    if cli.json {
        let json = MirrorResultJson::new(&cli.source, &report);
        println!("{}", json.to_json().context("Failed to serialize report")?);
    } else if !cli.quiet {
        display::display_report(&report);
    }

    let failed = report.failures().count();
    if failed > 0 {
        bail!("{} of {} destination(s) failed", failed, report.destinations.len());
    }

    info!("Mirror operation completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case("true", true)]
    #[case("TRUE", true)]
    #[case("True", true)]
    #[case("false", false)]
    #[case("yes", false)]
    #[case("1", false)]
    fn test_parse_bool_flag(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(parse_bool_flag(value), Ok(expected));
    }

    #[test]
    fn test_requires_a_destination() {
        assert!(Cli::try_parse_from(["clonedir", "src"]).is_err());
    }

    #[test]
    fn test_multiple_clones_and_underscore_alias() {
        let cli = Cli::try_parse_from([
            "clonedir",
            "src",
            "a",
            "b",
            "--use_checksum",
            "False",
        ])
        .unwrap();

        assert_eq!(cli.source, PathBuf::from("src"));
        assert_eq!(cli.clones, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.use_checksum, Some(false));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "clonedir",
            "src",
            "dst",
            "--use-checksum",
            "true",
            "--dry-run",
            "--keep-going",
        ])
        .unwrap();
        let mut config = Config::default();
        config.mirror.use_checksum = false;

        let options = resolve_options(&cli, &config);
        assert!(options.use_checksum);
        assert!(options.dry_run);
        assert_eq!(options.on_error, ErrorPolicy::Continue);
    }

    #[test]
    fn test_config_applies_without_flags() {
        let cli = Cli::try_parse_from(["clonedir", "src", "dst"]).unwrap();
        let mut config = Config::default();
        config.mirror.use_checksum = false;
        config.mirror.on_error = ErrorPolicy::Continue;

        let options = resolve_options(&cli, &config);
        assert!(!options.use_checksum);
        assert!(!options.dry_run);
        assert_eq!(options.on_error, ErrorPolicy::Continue);
    }
}
