//! Command-line interface for numex
//! This binary extracts the numbers found in JSON, YAML, CSV, TOML, INI and .env files, and
//! dedupes, sorts, filters and analyzes lists of numbers.
//!
//! Usage:
//!   numex extract `<path>` [--type `<type>`] [--dedupe] [--sort `<mode>`] [--columns `<i,j>` | --all-columns]
//!   numex dedupe `<path>` [--in-place]
//!   numex sort `<path>` [--mode `<mode>`] [--in-place]
//!   numex analyze `<path>` [--json] [--in-place]
//!   numex filter `<path>` [--min `<x>`] [--max `<y>`] [--in-place]
//!   numex detect `<path>`
//!   numex formats
//!   numex safety `<path>`
//!
//! Results go to stdout, notifications and logs to stderr. Set `NUMEX_LOG` to control logging.

mod commands;
mod error;
mod host;
mod notifier;

use clap::{Arg, ArgAction, ArgMatches, Command};
use commands::{ColumnSelection, Context, ExtractArgs};
use error::CliError;
use host::Delivery;
use numex_config::Loader;
use numex_core::performance::{
    format_metrics, is_performance_acceptable, performance_optimizations, PerformanceMonitor,
};
use numex_core::{FileType, SortMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the document")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .index(1)
}

fn in_place_arg() -> Arg {
    Arg::new("in-place")
        .long("in-place")
        .short('i')
        .help("Replace the document's content instead of printing the result")
        .action(ArgAction::SetTrue)
}

fn sort_mode_parser(value: &str) -> Result<SortMode, String> {
    value.parse()
}

fn file_type_parser(value: &str) -> Result<FileType, String> {
    value.parse()
}

fn build_cli() -> Command {
    Command::new("numex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract, dedupe, sort and analyze the numbers in structured text files")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("notifications")
                .long("notifications")
                .help("Which notifications to show (default from configuration)")
                .value_parser(["all", "important", "silent"])
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("perf")
                .long("perf")
                .help("Print a performance report to stderr when done")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .help("Proceed despite failed safety checks and skip confirmations")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("extract")
                .about("Extract every number from a document")
                .arg(path_arg())
                .arg(
                    Arg::new("type")
                        .long("type")
                        .short('t')
                        .help("File type to parse as (default: detected from the extension)")
                        .value_parser(file_type_parser),
                )
                .arg(
                    Arg::new("dedupe")
                        .long("dedupe")
                        .help("Remove repeated numbers, keeping the first occurrence")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("Sort mode: off, numeric-asc, numeric-desc, magnitude-asc, magnitude-desc")
                        .value_parser(sort_mode_parser),
                )
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .help("Zero-based CSV columns to extract, comma separated")
                        .value_parser(clap::value_parser!(usize))
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .conflicts_with("all-columns"),
                )
                .arg(
                    Arg::new("all-columns")
                        .long("all-columns")
                        .help("Extract every CSV column into its own document")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("header")
                        .long("header")
                        .help("Skip the first CSV line when extracting columns")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("streaming")
                        .long("streaming")
                        .help("Write each CSV column as soon as it is ready")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .short('o')
                        .help("Directory for per-column files (default: stdout)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("analyze")
                        .long("analyze")
                        .help("Append an analysis report to the output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("dedupe")
                .about("Remove repeated numbers")
                .arg(path_arg())
                .arg(in_place_arg()),
        )
        .subcommand(
            Command::new("sort")
                .about("Sort numbers, asking for the mode when none is given")
                .arg(path_arg())
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .short('m')
                        .help("Sort mode: numeric-asc, numeric-desc, magnitude-asc, magnitude-desc")
                        .value_parser(sort_mode_parser),
                )
                .arg(in_place_arg()),
        )
        .subcommand(
            Command::new("analyze")
                .about("Report descriptive statistics and outliers")
                .arg(path_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Render the report as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(in_place_arg()),
        )
        .subcommand(
            Command::new("filter")
                .about("Keep numbers within inclusive bounds")
                .arg(path_arg())
                .arg(
                    Arg::new("min")
                        .long("min")
                        .help("Lower bound")
                        .value_parser(clap::value_parser!(f64))
                        .allow_negative_numbers(true),
                )
                .arg(
                    Arg::new("max")
                        .long("max")
                        .help("Upper bound")
                        .value_parser(clap::value_parser!(f64))
                        .allow_negative_numbers(true),
                )
                .arg(in_place_arg()),
        )
        .subcommand(
            Command::new("detect")
                .about("Print the file type detected from the extension")
                .arg(path_arg()),
        )
        .subcommand(Command::new("formats").about("List the available extractors"))
        .subcommand(
            Command::new("safety")
                .about("Print the safety report for a file")
                .arg(path_arg()),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("NUMEX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(level) = matches.get_one::<String>("notifications") {
        loader = loader.set_override("notifications.level", level.as_str())?;
    }
    let config = loader.build()?;

    let ctx = Context::new(config, matches.get_flag("force"));
    let mut monitor = PerformanceMonitor::new(ctx.config.performance.thresholds());

    let outcome = dispatch(&ctx, &mut monitor, matches);
    if matches.get_flag("perf") {
        print_performance(&ctx, &monitor);
    }
    outcome
}

fn dispatch(
    ctx: &Context,
    monitor: &mut PerformanceMonitor,
    matches: &ArgMatches,
) -> Result<(), CliError> {
    if let Some((name, _)) = matches.subcommand() {
        tracing::debug!(command = name, "running command");
    }
    match matches.subcommand() {
        Some(("extract", sub)) => {
            let columns = if sub.get_flag("all-columns") {
                ColumnSelection::All
            } else if let Some(columns) = sub.get_many::<usize>("columns") {
                ColumnSelection::Columns(columns.copied().collect())
            } else {
                ColumnSelection::Whole
            };
            let args = ExtractArgs {
                path: required_path(sub)?,
                file_type: sub.get_one::<FileType>("type").copied(),
                dedupe: sub.get_flag("dedupe"),
                sort: sub.get_one::<SortMode>("sort").copied(),
                columns,
                header: sub.get_flag("header"),
                streaming: sub.get_flag("streaming"),
                out_dir: sub.get_one::<PathBuf>("out-dir").cloned(),
                analyze: sub.get_flag("analyze"),
            };
            commands::extract(ctx, monitor, &args)
        }
        Some(("dedupe", sub)) => {
            commands::dedupe(ctx, monitor, &required_path(sub)?, delivery(sub))
        }
        Some(("sort", sub)) => commands::sort(
            ctx,
            monitor,
            &required_path(sub)?,
            sub.get_one::<SortMode>("mode").copied(),
            delivery(sub),
        ),
        Some(("analyze", sub)) => commands::analyze(
            ctx,
            monitor,
            &required_path(sub)?,
            sub.get_flag("json"),
            delivery(sub),
        ),
        Some(("filter", sub)) => commands::filter(
            ctx,
            monitor,
            &required_path(sub)?,
            sub.get_one::<f64>("min").copied(),
            sub.get_one::<f64>("max").copied(),
            delivery(sub),
        ),
        Some(("detect", sub)) => commands::detect(&required_path(sub)?),
        Some(("formats", _)) => commands::formats(),
        Some(("safety", sub)) => commands::safety(ctx, &required_path(sub)?),
        Some((other, _)) => Err(CliError::Usage(format!("Unknown command '{}'", other))),
        None => Err(CliError::Usage("No command given".to_string())),
    }
}

fn required_path(matches: &ArgMatches) -> Result<PathBuf, CliError> {
    matches
        .get_one::<PathBuf>("path")
        .cloned()
        .ok_or_else(|| CliError::Usage("A document path is required".to_string()))
}

fn delivery(matches: &ArgMatches) -> Delivery {
    Delivery::from_flag(matches.get_flag("in-place"))
}

fn print_performance(ctx: &Context, monitor: &PerformanceMonitor) {
    if !ctx.config.performance.enabled {
        eprintln!("Performance monitoring is disabled in settings");
        return;
    }

    let report = monitor.report();
    let stats = monitor.cache_stats();
    eprintln!("{}", format_metrics(&report.metrics));
    eprintln!(
        "**Cache**: {} entries, {}% hit rate",
        stats.size,
        (stats.hit_rate * 100.0).round()
    );
    if is_performance_acceptable(&report.metrics, monitor.thresholds()) {
        eprintln!("Performance is within the configured thresholds");
    }
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    let mut suggestions = report.recommendations.clone();
    suggestions.extend(report.optimizations.iter().cloned());
    suggestions.extend(performance_optimizations(&report.metrics, monitor.thresholds()));
    suggestions.dedup();
    for suggestion in suggestions {
        eprintln!("- {}", suggestion);
    }
}
