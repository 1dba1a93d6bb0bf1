//! Command workflows
//!
//! Each command opens one document, runs the core pipeline over it and delivers the result
//! through [`crate::host`]. Anything that should end the process with a failure status comes
//! back as a [`CliError`]. Everything else (empty files, nothing to do, cancelled prompts) is
//! reported through the [`Notifier`] and exits cleanly.
//!
//! Every workflow runs inside [`tracked`], so the performance monitor sees it whether it
//! succeeds or not.

use crate::error::CliError;
use crate::host::{self, Delivery, Document};
use crate::notifier::Notifier;
use numex_config::NumexConfig;
use numex_core::formats::{csv_column_count, extract_csv_column};
use numex_core::performance::{PerformanceMonitor, PerformanceTracker};
use numex_core::safety::{
    check_output_safety, format_safety_report, perform_safety_checks, safety_recommendations,
    should_exclude_file, should_proceed, SafetyCheckResult,
};
use numex_core::{
    dedupe_numbers, detect_file_type, extract_numbers, filter_numbers, join_lines,
    parse_numbers_document, sort_numbers, AnalysisReport, ExtractorRegistry, FileType, SortMode,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Settings and user-facing channels shared by every command.
pub struct Context {
    pub config: NumexConfig,
    pub notifier: Notifier,
    /// Proceed past failed safety checks and skip the many-documents confirmation.
    pub force: bool,
}

impl Context {
    pub fn new(config: NumexConfig, force: bool) -> Self {
        Context {
            notifier: Notifier::new(config.notifications.level),
            config,
            force,
        }
    }

    fn check_input(&self, document: &Document) -> Result<(), CliError> {
        if !self.config.safety.enabled {
            return Ok(());
        }
        self.enforce(perform_safety_checks(document.size(), &self.config.safety))
    }

    fn check_output(&self, number_count: usize) -> Result<(), CliError> {
        if !self.config.safety.enabled {
            return Ok(());
        }
        self.enforce(check_output_safety(number_count, &self.config.safety))
    }

    fn enforce(&self, result: SafetyCheckResult) -> Result<(), CliError> {
        for warning in &result.warnings {
            self.notifier.warn(warning);
        }
        if should_proceed(&result, &self.config.safety) {
            return Ok(());
        }
        if self.force {
            self.notifier
                .warn("Proceeding despite failed safety checks (--force)");
            return Ok(());
        }
        Err(CliError::Unsafe(result.errors.join("; ")))
    }

    /// Flags win over configuration. `--sort off` turns configured sorting off.
    fn post_process(&self, dedupe: bool, sort: Option<SortMode>) -> PostProcess {
        let sort = match sort {
            Some(SortMode::Off) => None,
            Some(mode) => Some(mode),
            None => self.config.effective_sort(),
        };
        PostProcess {
            dedupe: dedupe || self.config.extraction.dedupe_enabled,
            sort,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PostProcess {
    dedupe: bool,
    sort: Option<SortMode>,
}

impl PostProcess {
    fn apply(&self, numbers: Vec<f64>) -> Vec<f64> {
        let numbers = if self.dedupe {
            dedupe_numbers(&numbers)
        } else {
            numbers
        };
        match self.sort {
            Some(mode) => sort_numbers(&numbers, mode),
            None => numbers,
        }
    }

    fn any(&self) -> bool {
        self.dedupe || self.sort.is_some()
    }
}

/// Run `work` as one measured operation and record its metrics, failed or not.
fn tracked<T>(
    monitor: &mut PerformanceMonitor,
    operation: &str,
    file_size: u64,
    work: impl FnOnce(&mut PerformanceTracker<'_>) -> Result<T, CliError>,
    count: impl Fn(&T) -> usize,
) -> Result<T, CliError> {
    let mut tracker = monitor.start_operation(operation);
    let outcome = work(&mut tracker);
    let number_count = outcome.as_ref().map_or(0, |value| count(value));
    let metrics = tracker.end(number_count, file_size);
    monitor.record_metrics(metrics);
    outcome
}

/// Which CSV columns `extract` reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    /// The whole document through its format's extractor.
    #[default]
    Whole,
    /// These zero-based columns, in the order given.
    Columns(Vec<usize>),
    /// Every column of the first non-blank line.
    All,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractArgs {
    pub path: PathBuf,
    pub file_type: Option<FileType>,
    pub dedupe: bool,
    pub sort: Option<SortMode>,
    pub columns: ColumnSelection,
    pub header: bool,
    pub streaming: bool,
    pub out_dir: Option<PathBuf>,
    pub analyze: bool,
}

pub fn extract(
    ctx: &Context,
    monitor: &mut PerformanceMonitor,
    args: &ExtractArgs,
) -> Result<(), CliError> {
    let document = Document::open(&args.path)?;
    if document.text.trim().is_empty() {
        ctx.notifier.info("File is empty");
        return Ok(());
    }

    let name = document.name();
    let file_type = args.file_type.unwrap_or_else(|| detect_file_type(&name));
    ctx.check_input(&document)?;
    let post = ctx.post_process(args.dedupe, args.sort);

    match (&args.columns, file_type) {
        (ColumnSelection::Whole, _) => {}
        (ColumnSelection::Columns(columns), FileType::Csv) if columns.len() == 1 => {
            let has_header = args.header || ctx.config.csv.has_header;
            let numbers = tracked(
                monitor,
                "extract",
                document.size(),
                |_| {
                    Ok(post.apply(extract_csv_column(
                        &document.text,
                        columns[0],
                        has_header,
                    )))
                },
                Vec::len,
            )?;
            return finish_extraction(ctx, &document, file_type, numbers, post, args.analyze);
        }
        (_, FileType::Csv) => return extract_columns(ctx, monitor, &document, args, post),
        (_, other) => {
            return Err(CliError::Usage(format!(
                "Column selection needs a CSV document, got {}",
                other
            )))
        }
    }

    let numbers = tracked(
        monitor,
        "extract",
        document.size(),
        |_| {
            let result = extract_numbers(&document.text, file_type, &name);
            if !result.success() {
                let message = match result.first_error_message() {
                    Some(message) if ctx.config.extraction.show_parse_errors => message,
                    _ => "Extraction failed",
                };
                return Err(CliError::Extraction(message.to_string()));
            }
            Ok(post.apply(result.into_numbers()))
        },
        Vec::len,
    )?;

    finish_extraction(ctx, &document, file_type, numbers, post, args.analyze)
}

fn finish_extraction(
    ctx: &Context,
    document: &Document,
    file_type: FileType,
    numbers: Vec<f64>,
    post: PostProcess,
    analyze: bool,
) -> Result<(), CliError> {
    if numbers.is_empty() {
        ctx.notifier.info("No numbers found");
        return Ok(());
    }
    if post.any() {
        ctx.notifier.info("Dedupe/Sort applied");
    }
    ctx.check_output(numbers.len())?;

    let mut content = join_lines(&numbers);
    if analyze {
        if ctx.config.analysis.enabled {
            let report = AnalysisReport::new(document.name(), file_type.as_str(), &numbers);
            content.push_str("\n\n");
            content.push_str(&report.to_string());
        } else {
            ctx.notifier.warn("Analysis is disabled in settings");
        }
    }
    host::deliver(document, &content, Delivery::FreshView)?;

    tracing::info!(count = numbers.len(), file_type = %file_type, "numbers.extracted");
    ctx.notifier.info(&format!("Extracted {}", numbers.len()));
    Ok(())
}

/// One output document per CSV column.
fn extract_columns(
    ctx: &Context,
    monitor: &mut PerformanceMonitor,
    document: &Document,
    args: &ExtractArgs,
    post: PostProcess,
) -> Result<(), CliError> {
    let indexes: Vec<usize> = match &args.columns {
        ColumnSelection::All => (0..csv_column_count(&document.text)).collect(),
        ColumnSelection::Columns(columns) => columns.clone(),
        ColumnSelection::Whole => Vec::new(),
    };
    let has_header = args.header || ctx.config.csv.has_header;
    let streaming = args.streaming || ctx.config.csv.streaming_enabled;

    let rows = document
        .text
        .split('\n')
        .count()
        .saturating_sub(usize::from(has_header));
    let estimated_total = rows * indexes.len();
    let safety = &ctx.config.safety;
    if safety.enabled
        && !ctx.force
        && (indexes.len() >= safety.many_documents_threshold
            || estimated_total > safety.large_output_lines_threshold)
    {
        let question = format!(
            "This will create {} documents with about {} numbers in total. Continue?",
            indexes.len(),
            estimated_total
        );
        if !host::confirm(&question, &mut io::stdin().lock())? {
            ctx.notifier.info("Cancelled");
            return Ok(());
        }
    }

    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir).map_err(|source| CliError::Write {
            path: dir.clone(),
            source,
        })?;
    }
    let out_dir = args.out_dir.as_deref();
    let name = document.name();

    let written = tracked(
        monitor,
        "extract-columns",
        document.size(),
        |tracker| {
            let mut pending = Vec::new();
            let mut written = Vec::new();
            for &index in &indexes {
                let key = format!("{}#column-{}:{}", name, index, has_header);
                let column = tracker.get_cached(&key, || {
                    extract_csv_column(&document.text, index, has_header)
                });
                let numbers = post.apply(column);
                if numbers.is_empty() {
                    continue;
                }
                ctx.check_output(numbers.len())?;

                if streaming {
                    match write_column(out_dir, index, &numbers) {
                        Ok(()) => written.push(numbers.len()),
                        Err(err) => ctx
                            .notifier
                            .error(&format!("Column {} streaming failed: {}", index, err)),
                    }
                } else {
                    pending.push((index, numbers));
                }
            }
            for (index, numbers) in &pending {
                write_column(out_dir, *index, numbers)?;
                written.push(numbers.len());
            }
            Ok(written)
        },
        |written| written.iter().sum(),
    )?;

    tracing::info!(count = "multi", file_type = "csv", "numbers.extracted");
    ctx.notifier
        .info(&format!("Extracted {} columns", written.len()));
    Ok(())
}

fn write_column(out_dir: Option<&Path>, index: usize, numbers: &[f64]) -> Result<(), CliError> {
    match out_dir {
        Some(dir) => host::write_file(
            &dir.join(format!("column-{}.txt", index)),
            &join_lines(numbers),
        ),
        None => host::show(&format!("==> column {} <==\n{}", index, join_lines(numbers))),
    }
}

/// Numbers of a document and where they came from.
struct LoadedNumbers {
    numbers: Vec<f64>,
    /// `numbers` for plain lists, otherwise the detected file type.
    source_type: String,
}

/// Read `document` as a plain list of numbers if it is one, otherwise extract from it.
///
/// `Ok(None)` means there is nothing to work on and the user has been told.
fn load_numbers(
    ctx: &Context,
    document: &Document,
    activity: &str,
) -> Result<Option<LoadedNumbers>, CliError> {
    if let Some(numbers) = parse_numbers_document(&document.text) {
        if numbers.is_empty() {
            ctx.notifier
                .info("No valid numbers found in the current file");
            return Ok(None);
        }
        return Ok(Some(LoadedNumbers {
            numbers,
            source_type: "numbers".to_string(),
        }));
    }

    let name = document.name();
    let file_type = detect_file_type(&name);
    ctx.notifier
        .info(&format!("{} numbers from {} file...", activity, file_type));

    let result = extract_numbers(&document.text, file_type, &name);
    if !result.success() {
        return Err(CliError::Extraction(format!(
            "Failed to extract numbers: {}",
            result.first_error_message().unwrap_or("unknown error")
        )));
    }
    if result.numbers().is_empty() {
        ctx.notifier.info("No numbers found in the file");
        return Ok(None);
    }
    Ok(Some(LoadedNumbers {
        numbers: result.into_numbers(),
        source_type: file_type.to_string(),
    }))
}

pub fn dedupe(
    ctx: &Context,
    monitor: &mut PerformanceMonitor,
    path: &Path,
    delivery: Delivery,
) -> Result<(), CliError> {
    let document = Document::open(path)?;
    ctx.check_input(&document)?;

    tracked(
        monitor,
        "dedupe",
        document.size(),
        |_| {
            let Some(loaded) = load_numbers(ctx, &document, "Deduplicating")? else {
                return Ok(0);
            };
            let deduped = dedupe_numbers(&loaded.numbers);
            let removed = loaded.numbers.len() - deduped.len();
            if removed == 0 {
                ctx.notifier.info("No duplicate numbers found");
                return Ok(0);
            }

            host::deliver_numbers(&document, &deduped, delivery)?;
            ctx.notifier.info(&format!(
                "Removed {} duplicates ({} unique numbers remaining)",
                removed,
                deduped.len()
            ));
            tracing::info!(
                original_count = loaded.numbers.len(),
                final_count = deduped.len(),
                duplicates_removed = removed,
                file_type = %loaded.source_type,
                "numbers.deduped"
            );
            Ok(deduped.len())
        },
        |count| *count,
    )?;
    Ok(())
}

pub fn sort(
    ctx: &Context,
    monitor: &mut PerformanceMonitor,
    path: &Path,
    mode: Option<SortMode>,
    delivery: Delivery,
) -> Result<(), CliError> {
    let document = Document::open(path)?;
    ctx.check_input(&document)?;

    tracked(
        monitor,
        "sort",
        document.size(),
        |_| {
            let Some(loaded) = load_numbers(ctx, &document, "Sorting")? else {
                return Ok(0);
            };
            let mode = match mode {
                Some(mode) => mode,
                None => match host::pick_sort_mode(&mut io::stdin().lock())? {
                    Some(mode) => mode,
                    None => {
                        ctx.notifier.info("Sort cancelled");
                        return Ok(0);
                    }
                },
            };

            let sorted = sort_numbers(&loaded.numbers, mode);
            host::deliver_numbers(&document, &sorted, delivery)?;
            ctx.notifier.info(&format!(
                "Sorted {} numbers ({})",
                sorted.len(),
                mode.label()
            ));
            tracing::info!(
                count = sorted.len(),
                file_type = %loaded.source_type,
                sort_mode = %mode,
                "numbers.sorted"
            );
            Ok(sorted.len())
        },
        |count| *count,
    )?;
    Ok(())
}

pub fn analyze(
    ctx: &Context,
    monitor: &mut PerformanceMonitor,
    path: &Path,
    json: bool,
    delivery: Delivery,
) -> Result<(), CliError> {
    let document = Document::open(path)?;
    ctx.check_input(&document)?;

    tracked(
        monitor,
        "analyze",
        document.size(),
        |_| {
            let Some(loaded) = load_numbers(ctx, &document, "Analyzing")? else {
                return Ok(0);
            };
            let report = AnalysisReport::new(document.name(), &loaded.source_type, &loaded.numbers);
            let rendered = if json {
                serde_json::to_string_pretty(&report)?
            } else {
                report.to_string()
            };

            host::deliver(&document, &rendered, delivery)?;
            ctx.notifier.info(&format!(
                "Analysis complete! Found {} numbers",
                loaded.numbers.len()
            ));
            tracing::info!(
                count = loaded.numbers.len(),
                outliers = report.outliers.len(),
                file_type = %loaded.source_type,
                "numbers.analyzed"
            );
            Ok(loaded.numbers.len())
        },
        |count| *count,
    )?;
    Ok(())
}

pub fn filter(
    ctx: &Context,
    monitor: &mut PerformanceMonitor,
    path: &Path,
    min: Option<f64>,
    max: Option<f64>,
    delivery: Delivery,
) -> Result<(), CliError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CliError::Usage(format!(
                "--min ({}) must not be greater than --max ({})",
                min, max
            )));
        }
    }

    let document = Document::open(path)?;
    ctx.check_input(&document)?;

    tracked(
        monitor,
        "filter",
        document.size(),
        |_| {
            let Some(loaded) = load_numbers(ctx, &document, "Filtering")? else {
                return Ok(0);
            };
            let kept = filter_numbers(&loaded.numbers, min, max);
            if kept.is_empty() {
                ctx.notifier.info("No numbers in range");
                return Ok(0);
            }

            host::deliver_numbers(&document, &kept, delivery)?;
            ctx.notifier.info(&format!(
                "Kept {} of {} numbers",
                kept.len(),
                loaded.numbers.len()
            ));
            Ok(kept.len())
        },
        |count| *count,
    )?;
    Ok(())
}

pub fn detect(path: &Path) -> Result<(), CliError> {
    host::show(detect_file_type(&path.display().to_string()).as_str())
}

pub fn formats() -> Result<(), CliError> {
    let registry = ExtractorRegistry::with_defaults();
    let lines: Vec<String> = registry
        .list_extractors()
        .into_iter()
        .map(|(name, types)| {
            let types: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
            format!("{:<10} {}", name, types.join(", "))
        })
        .collect();
    host::show(&lines.join("\n"))
}

/// Safety report for a file, sized from its metadata so huge files are never read.
pub fn safety(ctx: &Context, path: &Path) -> Result<(), CliError> {
    let size = fs::metadata(path)
        .map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let settings = &ctx.config.safety;
    let mut result = perform_safety_checks(size, settings);
    result.recommendations = safety_recommendations(
        &result,
        settings,
        ctx.config.csv.streaming_enabled,
        ctx.config.analysis.enabled && ctx.config.analysis.include_stats,
    );
    let mut report = format_safety_report(&result);
    if should_exclude_file(size, settings) {
        report.push_str("\n**Excluded**: more than ten times the size limit, needs --force\n");
    }
    host::show(&report)
}
