//! Command-line interface for gqltag.
//!
//! # Usage
//!
//! ```bash
//! # Parse every file through one cache and report fragment name conflicts
//! gqltag check queries/*.graphql
//!
//! # Fail when a fragment name has more than one body
//! gqltag check --strict queries/*.graphql
//!
//! # Print the cache key for a file
//! gqltag normalize query.graphql
//!
//! # Print the cached, location-free AST
//! gqltag parse query.graphql --format json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use gqltag::{CacheOptions, DocumentCache, FragmentConflict, ParseError};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "gqltag")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rust debug representation
    #[default]
    Pretty,
    /// JSON
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse GraphQL files through one shared cache
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Do not report fragment name conflicts
        #[arg(long)]
        no_fragment_warnings: bool,

        /// Accept variable definitions on fragments
        #[arg(long)]
        legacy_fragment_variables: bool,

        /// Treat fragment name conflicts as errors
        #[arg(long)]
        strict: bool,
    },

    /// Print the normalized cache key of a file
    Normalize {
        /// File to normalize
        file: PathBuf,
    },

    /// Parse a GraphQL file and print the cached AST
    Parse {
        /// File to parse
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,

        /// Accept variable definitions on fragments
        #[arg(long)]
        legacy_fragment_variables: bool,
    },

    /// Print version information
    Version,
}

pub fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check {
            files,
            no_fragment_warnings,
            legacy_fragment_variables,
            strict,
        } => {
            let options = CacheOptions::new()
                .with_fragment_warnings(!no_fragment_warnings)
                .with_legacy_fragment_variables(legacy_fragment_variables);
            check_files(&files, options, strict, cli.verbose, cli.quiet)
        }
        Commands::Normalize { file } => {
            let source = std::fs::read_to_string(&file)?;
            println!("{}", gqltag::normalize(&source));
            Ok(0)
        }
        Commands::Parse {
            file,
            format,
            legacy_fragment_variables,
        } => parse_file(&file, format, legacy_fragment_variables),
        Commands::Version => {
            println!("gqltag {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

/// Outcome of running sources through one cache.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub checked: usize,
    pub parse_errors: Vec<(String, ParseError)>,
    /// Conflicts that were reported, tagged with the source that caused them.
    pub conflicts: Vec<(String, FragmentConflict)>,
    /// Conflicts detected, including those not reported.
    pub detected_conflicts: u64,
}

impl CheckReport {
    #[must_use]
    pub fn exit_code(&self, strict: bool) -> i32 {
        let failed = !self.parse_errors.is_empty() || (strict && self.detected_conflicts > 0);
        i32::from(failed)
    }
}

/// Parses `(name, source)` pairs in order through a fresh cache.
pub fn check_sources<'a>(
    sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    options: CacheOptions,
) -> CheckReport {
    let pending = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&pending);
    let cache = DocumentCache::with_options(options)
        .with_conflict_handler(move |conflict| sink.lock().push(conflict.clone()));

    let mut report = CheckReport::default();
    for (name, source) in sources {
        report.checked += 1;
        match cache.parse_document(source) {
            Ok(document) => debug!(
                file = name,
                definitions = document.definitions.len(),
                "checked"
            ),
            Err(error) => {
                debug!(file = name, %error, "parse failed");
                report.parse_errors.push((name.to_string(), error));
            }
        }
        report.conflicts.extend(
            pending
                .lock()
                .drain(..)
                .map(|conflict| (name.to_string(), conflict)),
        );
    }
    let stats = cache.stats();
    debug!(
        documents = stats.documents,
        fragment_names = stats.fragment_names,
        conflicts = stats.conflicts,
        "check finished"
    );
    report.detected_conflicts = stats.conflicts;
    report
}

fn check_files(
    files: &[PathBuf],
    options: CacheOptions,
    strict: bool,
    verbose: bool,
    quiet: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        if verbose {
            println!("{} {}", "Checking".blue(), file.display());
        }
        sources.push((file.display().to_string(), std::fs::read_to_string(file)?));
    }

    let report = check_sources(
        sources.iter().map(|(name, source)| (name.as_str(), source.as_str())),
        options,
    );

    for (name, error) in &report.parse_errors {
        eprintln!("{} {}", "Error".red().bold(), name);
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }

    for (name, conflict) in &report.conflicts {
        let label = if strict {
            "Error".red().bold()
        } else {
            "Warning".yellow().bold()
        };
        eprintln!("{} {}: {}", label, name, conflict);
        if verbose {
            for body in &conflict.previous {
                eprintln!("  {} {}", "previous:".dimmed(), body);
            }
            eprintln!("  {} {}", "new:".dimmed(), conflict.body);
        }
    }

    let code = report.exit_code(strict);
    if code == 0 && !quiet {
        println!(
            "{} {} file(s) checked",
            "Success:".green().bold(),
            report.checked
        );
    }
    Ok(code)
}

fn parse_file(
    file: &Path,
    format: OutputFormat,
    legacy_fragment_variables: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(file)?;
    let cache = DocumentCache::with_options(
        CacheOptions::new().with_legacy_fragment_variables(legacy_fragment_variables),
    );

    let document = match cache.parse_document(&source) {
        Ok(document) => document,
        Err(error) => {
            eprintln!("{} Parse failed", "Error:".red().bold());
            eprintln!("{:?}", miette::Report::new(error));
            return Ok(1);
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*document)?),
        OutputFormat::Pretty => println!("{:#?}", document.definitions),
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_args() {
        let cli = Cli::try_parse_from([
            "gqltag",
            "check",
            "--strict",
            "--no-fragment-warnings",
            "a.graphql",
            "b.graphql",
        ])
        .unwrap();
        match cli.command {
            Commands::Check {
                files,
                no_fragment_warnings,
                legacy_fragment_variables,
                strict,
            } => {
                assert_eq!(files.len(), 2);
                assert!(no_fragment_warnings);
                assert!(!legacy_fragment_variables);
                assert!(strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_reports_conflicts_per_source() {
        let report = check_sources(
            [
                ("a.graphql", "query A { ...F }\nfragment F on T { x }"),
                ("b.graphql", "query B { ...F }\nfragment F on T {x}"),
                ("c.graphql", "fragment F on T { y }"),
            ],
            CacheOptions::default(),
        );

        assert_eq!(report.checked, 3);
        assert!(report.parse_errors.is_empty());
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].0, "c.graphql");
        assert_eq!(report.exit_code(false), 0);
        assert_eq!(report.exit_code(true), 1);
    }

    #[test]
    fn test_check_without_warnings_still_counts_conflicts() {
        let report = check_sources(
            [
                ("a.graphql", "fragment F on T { x }"),
                ("b.graphql", "fragment F on T { y }"),
            ],
            CacheOptions::new().with_fragment_warnings(false),
        );

        assert!(report.conflicts.is_empty());
        assert_eq!(report.detected_conflicts, 1);
        assert_eq!(report.exit_code(true), 1);
    }

    #[test]
    fn test_check_collects_parse_errors() {
        let report = check_sources(
            [("bad.graphql", "query {"), ("good.graphql", "{ a }")],
            CacheOptions::default(),
        );

        assert_eq!(report.parse_errors.len(), 1);
        assert_eq!(report.parse_errors[0].0, "bad.graphql");
        assert_eq!(report.exit_code(false), 1);
    }
}
