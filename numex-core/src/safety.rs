//! Size and output safety checks
//!
//! Heuristics only: they estimate cost from byte counts and never look at the content. The
//! estimates assume roughly 1 MB/s of extraction throughput, parsing overhead equal to the file
//! size, and 16 bytes per output number.

use serde::{Deserialize, Serialize};

const MB: u64 = 1024 * 1024;
const LONG_PROCESSING_ERROR_MS: f64 = 10_000.0;
const LONG_PROCESSING_WARN_MS: f64 = 5_000.0;
const HIGH_MEMORY_BYTES: u64 = 100 * MB;
const MANY_NUMBERS_FOR_ANALYSIS: f64 = 10_000.0;

/// Thresholds that drive the checks. Values below the minimums are clamped by the config loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetySettings {
    pub enabled: bool,
    pub file_size_warn_bytes: u64,
    pub large_output_lines_threshold: usize,
    pub many_documents_threshold: usize,
}

impl Default for SafetySettings {
    fn default() -> Self {
        SafetySettings {
            enabled: true,
            file_size_warn_bytes: 1_000_000,
            large_output_lines_threshold: 50_000,
            many_documents_threshold: 8,
        }
    }
}

/// Cost estimates behind a [`SafetyCheckResult`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SafetyMetrics {
    pub file_size: u64,
    pub number_count: f64,
    pub estimated_processing_ms: f64,
    pub memory_bytes: u64,
    pub output_lines: f64,
}

impl SafetyMetrics {
    fn for_file(file_size: u64) -> Self {
        // ~10 numbers per KB
        let numbers = file_size as f64 / 1024.0 * 10.0;
        SafetyMetrics {
            file_size,
            number_count: numbers,
            estimated_processing_ms: file_size as f64 / MB as f64 * 1000.0,
            memory_bytes: file_size.saturating_mul(2),
            output_lines: numbers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SafetyCheckResult {
    /// No errors were raised. Warnings do not make a check unsafe.
    pub safe: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub metrics: SafetyMetrics,
    pub recommendations: Vec<String>,
}

impl SafetyCheckResult {
    fn new(metrics: SafetyMetrics) -> Self {
        SafetyCheckResult {
            safe: true,
            metrics,
            ..Default::default()
        }
    }

    fn finish(mut self) -> Self {
        self.safe = self.errors.is_empty();
        self
    }
}

fn whole_mb(bytes: u64) -> u64 {
    (bytes as f64 / MB as f64).round() as u64
}

/// Check a file of `file_size` bytes before extracting from it.
pub fn perform_safety_checks(file_size: u64, settings: &SafetySettings) -> SafetyCheckResult {
    let mut result = SafetyCheckResult::new(SafetyMetrics::for_file(file_size));
    let warn_bytes = settings.file_size_warn_bytes;

    if file_size > warn_bytes.saturating_mul(10) {
        result.errors.push(format!(
            "File size too large ({} MB). This may cause performance issues.",
            whole_mb(file_size)
        ));
        result.recommendations.push(
            "Consider using CSV streaming mode or splitting the file into smaller chunks".into(),
        );
    } else if file_size > warn_bytes {
        result.warnings.push(format!(
            "Large file detected ({} MB). Processing may take longer.",
            whole_mb(file_size)
        ));
        result
            .recommendations
            .push("Enable CSV streaming in settings for better performance with large files".into());
    }

    let processing_ms = result.metrics.estimated_processing_ms;
    let seconds = (processing_ms / 1000.0).round();
    if processing_ms > LONG_PROCESSING_ERROR_MS {
        result.errors.push(format!(
            "Estimated processing time too long ({} seconds). This may cause long waits.",
            seconds
        ));
        result
            .recommendations
            .push("Consider disabling automatic analysis or using CSV streaming".into());
    } else if processing_ms > LONG_PROCESSING_WARN_MS {
        result.warnings.push(format!(
            "Long processing time expected ({} seconds). Consider adjusting settings.",
            seconds
        ));
    }

    if result.metrics.memory_bytes > HIGH_MEMORY_BYTES {
        result.warnings.push(format!(
            "High memory usage expected ({} MB). Monitor system resources.",
            whole_mb(result.metrics.memory_bytes)
        ));
        result.recommendations.push(
            "Use CSV streaming mode or disable automatic sorting/deduplication to reduce memory usage"
                .into(),
        );
    }

    result.finish()
}

/// Check an output of `number_count` lines before delivering it.
pub fn check_output_safety(number_count: usize, settings: &SafetySettings) -> SafetyCheckResult {
    let mut result = SafetyCheckResult::new(SafetyMetrics {
        number_count: number_count as f64,
        memory_bytes: (number_count as u64).saturating_mul(16),
        output_lines: number_count as f64,
        ..Default::default()
    });
    let threshold = settings.large_output_lines_threshold;

    if number_count > threshold.saturating_mul(2) {
        result.errors.push(format!(
            "Output too large ({} numbers). This may overwhelm the output view.",
            number_count
        ));
        result.recommendations.push(
            "Consider writing the output to a file instead, or enable deduplication".into(),
        );
    } else if number_count > threshold {
        result.warnings.push(format!(
            "Large output detected ({} numbers). Displaying may be slow.",
            number_count
        ));
        result
            .recommendations
            .push("Consider writing large outputs to a file".into());
    }

    result.finish()
}

/// Whether an operation may go ahead: always when checks are disabled, otherwise only without
/// errors.
pub fn should_proceed(result: &SafetyCheckResult, settings: &SafetySettings) -> bool {
    !settings.enabled || result.errors.is_empty()
}

/// The check's own recommendations plus ones that depend on current settings.
pub fn safety_recommendations(
    result: &SafetyCheckResult,
    settings: &SafetySettings,
    csv_streaming_enabled: bool,
    analysis_with_stats: bool,
) -> Vec<String> {
    let mut recommendations = result.recommendations.clone();

    if result.metrics.file_size > settings.file_size_warn_bytes && !csv_streaming_enabled {
        recommendations.push(
            "Enable CSV streaming mode in settings for better performance with large files".into(),
        );
    }
    if result.metrics.number_count > MANY_NUMBERS_FOR_ANALYSIS && analysis_with_stats {
        recommendations.push(
            "Consider disabling automatic analysis for faster extraction with large datasets".into(),
        );
    }

    recommendations
}

/// Files this large are skipped outright when checks are enabled.
pub fn should_exclude_file(file_size: u64, settings: &SafetySettings) -> bool {
    settings.enabled && file_size > settings.file_size_warn_bytes.saturating_mul(10)
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{} KB", (bytes as f64 / 1024.0).round())
    } else {
        format!("{} MB", whole_mb(bytes))
    }
}

/// Markdown rendering of a check result.
pub fn format_safety_report(result: &SafetyCheckResult) -> String {
    let metrics = &result.metrics;
    let mut lines = vec![
        "# numex Safety Report".to_string(),
        String::new(),
        format!(
            "**Status**: {}",
            if result.safe { "Safe" } else { "Warnings/Errors" }
        ),
        String::new(),
        "## Metrics".to_string(),
        format!("- **File Size**: {}", format_file_size(metrics.file_size)),
        format!("- **Estimated Numbers**: {}", metrics.number_count.round()),
        format!(
            "- **Estimated Processing Time**: {}s",
            (metrics.estimated_processing_ms / 1000.0).round()
        ),
        format!(
            "- **Estimated Memory Usage**: {}",
            format_file_size(metrics.memory_bytes)
        ),
        format!("- **Output Lines**: {}", metrics.output_lines.round()),
        String::new(),
    ];

    for (heading, items) in [
        ("## Warnings", &result.warnings),
        ("## Errors", &result.errors),
        ("## Recommendations", &result.recommendations),
    ] {
        if items.is_empty() {
            continue;
        }
        lines.push(heading.to_string());
        lines.extend(items.iter().map(|item| format!("- {}", item)));
        lines.push(String::new());
    }

    lines.join("\n")
}
