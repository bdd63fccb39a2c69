//! classlens: look up the CSS rules behind class names from the command line.
//!
//! Provides `classlens query` for class-to-rule lookups, `classlens classes`
//! for listing every class in aggregate order, and `classlens check` for
//! reporting stylesheets that could not be fully indexed.

#![warn(missing_docs)]

mod check;
mod classes;
mod inputs;
mod query;

use std::io::IsTerminal;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// classlens: a CSS class index.
#[derive(Parser, Debug)]
#[command(name = "classlens", version, about = "Map CSS class names to their rules")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `classlens.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print classes with the rules that reference them.
    Query(QueryArgs),
    /// List class names in the order they are first seen.
    Classes(FilesArgs),
    /// Report unreadable stylesheets and malformed rules.
    Check(FilesArgs),
}

/// Stylesheet arguments shared by every command.
#[derive(Args, Debug)]
pub struct FilesArgs {
    /// Stylesheets in query order. Defaults to `[stylesheets] files` from
    /// `classlens.toml`.
    pub files: Vec<String>,
}

/// Arguments for the `classlens query` subcommand.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Stylesheets to query.
    #[command(flatten)]
    pub inputs: FilesArgs,

    /// Only print the rules of this class.
    #[arg(short, long)]
    pub class: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Query output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    Text,
    /// A JSON array of `[class, rule text]` pairs.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("warning: {e}");
    }

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Query(ref args) => query::run(args, &global),
        Command::Classes(ref args) => classes::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `CLASSLENS_LOG` overrides the level chosen by
/// `--quiet` and `--verbose`.
fn init_tracing(quiet: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CLASSLENS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_query_default() {
        let cli = Cli::parse_from(["classlens", "query"]);
        match cli.command {
            Command::Query(ref args) => {
                assert!(args.inputs.files.is_empty());
                assert!(args.class.is_none());
                assert_eq!(args.format, OutputFormat::Text);
            }
            _ => panic!("expected Query command"),
        }
    }

    #[test]
    fn parse_query_with_args() {
        let cli = Cli::parse_from([
            "classlens",
            "query",
            "a.css",
            "b.css",
            "--class",
            "btn",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Query(ref args) => {
                assert_eq!(args.inputs.files, vec!["a.css", "b.css"]);
                assert_eq!(args.class.as_deref(), Some("btn"));
                assert_eq!(args.format, OutputFormat::Json);
            }
            _ => panic!("expected Query command"),
        }
    }

    #[test]
    fn parse_classes() {
        let cli = Cli::parse_from(["classlens", "classes", "app.css"]);
        match cli.command {
            Command::Classes(ref args) => assert_eq!(args.files, vec!["app.css"]),
            _ => panic!("expected Classes command"),
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["classlens", "check"]);
        assert!(matches!(cli.command, Command::Check(_)));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["classlens", "--quiet", "--color", "never", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["classlens", "query", "a.css", "--verbose"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["classlens", "--config", "site/classlens.toml", "classes"]);
        assert_eq!(cli.config.as_deref(), Some("site/classlens.toml"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["classlens", "query", "--format", "xml"]).is_err());
    }
}
