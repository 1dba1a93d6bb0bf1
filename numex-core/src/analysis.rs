//! Descriptive statistics over an extracted list
//!
//! Variance and standard deviation are population statistics. Outliers use Tukey fences: a
//! value is an outlier when it lies more than 1.5 IQR below Q1 or above Q3, with quartiles
//! taken by linear interpolation over the sorted values.

use crate::numeric::format_number;
use crate::postprocess::value_key;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisResult {
    pub count: usize,
    pub sum: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Most frequent value, present only when some value occurs more than once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<f64>,
    pub range: f64,
}

fn sorted_copy(numbers: &[f64]) -> Vec<f64> {
    let mut sorted = numbers.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Basic statistics. An empty input yields all zeros and no mode.
pub fn analyze_numbers(numbers: &[f64]) -> AnalysisResult {
    if numbers.is_empty() {
        return AnalysisResult::default();
    }

    let sorted = sorted_copy(numbers);
    let count = numbers.len();
    let sum: f64 = numbers.iter().sum();
    let min = sorted[0];
    let max = sorted[count - 1];

    AnalysisResult {
        count,
        sum,
        average: sum / count as f64,
        min,
        max,
        median: median(&sorted),
        mode: mode(numbers),
        range: max - min,
    }
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Ties go to the value seen first.
fn mode(numbers: &[f64]) -> Option<f64> {
    let mut slots: HashMap<u64, usize> = HashMap::new();
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for &n in numbers {
        let slot = *slots.entry(value_key(n)).or_insert_with(|| {
            counts.push((n, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    let mut best: Option<(f64, usize)> = None;
    for &(value, count) in &counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.filter(|(_, count)| *count > 1).map(|(value, _)| value)
}

pub fn variance(numbers: &[f64]) -> f64 {
    if numbers.is_empty() {
        return 0.0;
    }
    let n = numbers.len() as f64;
    let mean = numbers.iter().sum::<f64>() / n;
    numbers.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
}

pub fn standard_deviation(numbers: &[f64]) -> f64 {
    variance(numbers).sqrt()
}

fn quartile(sorted: &[f64], percentile: f64) -> f64 {
    let index = percentile * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let weight = index.fract();

    if upper >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Values outside the 1.5 IQR fences, in input order. Needs at least four values.
pub fn find_outliers(numbers: &[f64]) -> Vec<f64> {
    if numbers.len() < 4 {
        return Vec::new();
    }

    let sorted = sorted_copy(numbers);
    let q1 = quartile(&sorted, 0.25);
    let q3 = quartile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;

    numbers
        .iter()
        .copied()
        .filter(|n| *n < lower || *n > upper)
        .collect()
}

/// Full analysis of one document, rendered as the plain-text report.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub filepath: String,
    /// Detected file type, or `numbers` for documents that are already a list of numbers.
    pub source_type: String,
    pub basic: AnalysisResult,
    pub standard_deviation: f64,
    pub variance: f64,
    pub outliers: Vec<f64>,
}

impl AnalysisReport {
    pub fn new(filepath: impl Into<String>, source_type: impl Into<String>, numbers: &[f64]) -> Self {
        AnalysisReport {
            filepath: filepath.into(),
            source_type: source_type.into(),
            basic: analyze_numbers(numbers),
            standard_deviation: standard_deviation(numbers),
            variance: variance(numbers),
            outliers: find_outliers(numbers),
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let basic = &self.basic;
        writeln!(f, "=== Number Analysis Report ===")?;
        writeln!(f)?;
        writeln!(f, "File: {}", self.filepath)?;
        writeln!(f, "Type: {}", self.source_type)?;
        writeln!(f, "Numbers Found: {}", basic.count)?;
        writeln!(f)?;

        writeln!(f, "--- Basic Statistics ---")?;
        writeln!(f, "Count: {}", basic.count)?;
        writeln!(f, "Sum: {}", format_number(basic.sum))?;
        writeln!(f, "Average: {:.4}", basic.average)?;
        writeln!(f, "Median: {}", format_number(basic.median))?;
        if let Some(mode) = basic.mode {
            writeln!(f, "Mode: {}", format_number(mode))?;
        }
        writeln!(f, "Min: {}", format_number(basic.min))?;
        writeln!(f, "Max: {}", format_number(basic.max))?;
        writeln!(f, "Range: {}", format_number(basic.range))?;
        writeln!(f)?;

        writeln!(f, "--- Advanced Statistics ---")?;
        writeln!(f, "Standard Deviation: {:.4}", self.standard_deviation)?;
        writeln!(f, "Variance: {:.4}", self.variance)?;
        if self.outliers.is_empty() {
            writeln!(f, "Outliers: None detected")
        } else {
            let listed: Vec<String> = self.outliers.iter().map(|n| format_number(*n)).collect();
            writeln!(f, "Outliers: {} ({})", self.outliers.len(), listed.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_nine_and_hundred() -> Vec<f64> {
        let mut numbers: Vec<f64> = (1..=9).map(f64::from).collect();
        numbers.push(100.0);
        numbers
    }

    #[test]
    fn test_empty_is_all_zero() {
        let result = analyze_numbers(&[]);
        assert_eq!(result, AnalysisResult::default());
        assert_eq!(result.count, 0);
        assert_eq!(result.mode, None);
    }

    #[test]
    fn test_single_value() {
        let result = analyze_numbers(&[42.0]);
        assert_eq!(result.count, 1);
        assert_eq!(result.sum, 42.0);
        assert_eq!(result.min, 42.0);
        assert_eq!(result.max, 42.0);
        assert_eq!(result.median, 42.0);
        assert_eq!(result.range, 0.0);
        assert_eq!(result.mode, None);
    }

    #[test]
    fn test_basic_statistics() {
        let result = analyze_numbers(&[5.0, 1.0, 4.0, 2.0, 3.0]);
        assert_eq!(result.count, 5);
        assert_eq!(result.sum, 15.0);
        assert_eq!(result.average, 3.0);
        assert_eq!(result.median, 3.0);
        assert_eq!(result.min, 1.0);
        assert_eq!(result.max, 5.0);
        assert_eq!(result.range, 4.0);
    }

    #[test]
    fn test_even_median_is_mean_of_central_pair() {
        assert_eq!(analyze_numbers(&[4.0, 1.0, 3.0, 2.0]).median, 2.5);
    }

    #[test]
    fn test_mode() {
        assert_eq!(analyze_numbers(&[1.0, 2.0, 2.0, 3.0]).mode, Some(2.0));
        assert_eq!(analyze_numbers(&[1.0, 2.0, 3.0]).mode, None);
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(
            analyze_numbers(&[3.0, 1.0, 1.0, 3.0, 2.0]).mode,
            Some(3.0)
        );
    }

    #[test]
    fn test_variance_and_standard_deviation() {
        let numbers = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(variance(&numbers), 4.0);
        assert_eq!(standard_deviation(&numbers), 2.0);
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(standard_deviation(&[7.0]), 0.0);
    }

    #[test]
    fn test_outliers() {
        assert_eq!(find_outliers(&one_to_nine_and_hundred()), vec![100.0]);
        assert!(find_outliers(&[1.0, 2.0, 3.0]).is_empty());
        assert!(find_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_empty());
    }

    #[test]
    fn test_outliers_keep_input_order_and_duplicates() {
        let numbers = [-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, -50.0, 100.0];
        assert_eq!(find_outliers(&numbers), vec![-50.0, -50.0, 100.0]);
    }

    #[test]
    fn test_report_rendering() {
        let report = AnalysisReport::new("data.json", "json", &one_to_nine_and_hundred());
        insta::assert_snapshot!(report.to_string(), @r"
        === Number Analysis Report ===

        File: data.json
        Type: json
        Numbers Found: 10

        --- Basic Statistics ---
        Count: 10
        Sum: 145
        Average: 14.5000
        Median: 5.5
        Min: 1
        Max: 100
        Range: 99

        --- Advanced Statistics ---
        Standard Deviation: 28.6051
        Variance: 818.2500
        Outliers: 1 (100)
        ");
    }

    #[test]
    fn test_report_with_mode_and_no_outliers() {
        let report = AnalysisReport::new("list.txt", "numbers", &[2.0, 2.0, 3.0]).to_string();
        assert!(report.contains("Type: numbers\n"));
        assert!(report.contains("Mode: 2\n"));
        assert!(report.ends_with("Outliers: None detected\n"));
    }
}
