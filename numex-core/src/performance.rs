//! Operation metrics and the result cache
//!
//! A [`PerformanceMonitor`] is owned by whoever runs commands. Each command opens a
//! [`PerformanceTracker`], may route expensive computations through its cache, and hands the
//! finished [`PerformanceMetrics`] back to the monitor. Nothing here influences results: a cache
//! hit returns exactly what the computation returned when it was stored.
//!
//! Cached results are held in a `moka` cache bounded by entry count and entry age.

use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics kept for reporting.
const METRICS_HISTORY: usize = 100;
/// Operations averaged by [`PerformanceMonitor::report`].
const REPORT_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceThresholds {
    pub max_duration_ms: u64,
    /// Numbers per second.
    pub min_throughput: f64,
    pub max_cache_size: usize,
    pub cache_ttl_secs: u64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        PerformanceThresholds {
            max_duration_ms: 5000,
            min_throughput: 1000.0,
            max_cache_size: 1000,
            cache_ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PerformanceMetrics {
    pub operation: String,
    /// Wall time in milliseconds, with sub-millisecond precision.
    pub duration_ms: f64,
    pub number_count: usize,
    pub file_size: u64,
    /// Numbers per second, 0 when the operation took no measurable time.
    pub throughput: f64,
    pub cache_hits: u32,
    pub cache_misses: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PerformanceReport {
    /// Most recent operation, or defaults when nothing has been recorded.
    pub metrics: PerformanceMetrics,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub optimizations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CacheStats {
    pub size: u64,
    pub hit_rate: f64,
    pub total_hits: u64,
    pub total_misses: u64,
}

/// Extraction results keyed by document, with hit/miss tracking.
pub struct ResultCache {
    cache: Cache<String, Vec<f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<f64>> {
        match self.cache.get(key) {
            Some(v) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(v)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: Vec<f64>) {
        self.cache.insert(key.into(), value);
    }

    /// Live entries, after pending evictions have run.
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let h = self.hits() as f64;
        let m = self.misses() as f64;
        let total = h + m;
        if total == 0.0 {
            0.0
        } else {
            h / total
        }
    }
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

/// Collects metrics across operations and owns the shared result cache.
#[derive(Debug)]
pub struct PerformanceMonitor {
    thresholds: PerformanceThresholds,
    cache: ResultCache,
    metrics: VecDeque<PerformanceMetrics>,
}

impl PerformanceMonitor {
    pub fn new(thresholds: PerformanceThresholds) -> Self {
        PerformanceMonitor {
            cache: ResultCache::new(
                thresholds.max_cache_size as u64,
                Duration::from_secs(thresholds.cache_ttl_secs),
            ),
            thresholds,
            metrics: VecDeque::new(),
        }
    }

    pub fn thresholds(&self) -> &PerformanceThresholds {
        &self.thresholds
    }

    pub fn start_operation(&self, operation: &str) -> PerformanceTracker<'_> {
        tracing::debug!(operation, "operation started");
        PerformanceTracker {
            operation: operation.to_string(),
            started: Instant::now(),
            cache: &self.cache,
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    pub fn record_metrics(&mut self, metrics: PerformanceMetrics) {
        tracing::debug!(
            operation = %metrics.operation,
            duration_ms = metrics.duration_ms,
            numbers = metrics.number_count,
            "operation finished"
        );
        self.metrics.push_back(metrics);
        while self.metrics.len() > METRICS_HISTORY {
            self.metrics.pop_front();
        }
    }

    pub fn recorded(&self) -> impl Iterator<Item = &PerformanceMetrics> {
        self.metrics.iter()
    }

    /// Assess the last few operations against the thresholds.
    pub fn report(&self) -> PerformanceReport {
        let recent: Vec<&PerformanceMetrics> = self
            .metrics
            .iter()
            .skip(self.metrics.len().saturating_sub(REPORT_WINDOW))
            .collect();
        let Some(latest) = recent.last() else {
            return PerformanceReport::default();
        };

        let mut report = PerformanceReport {
            metrics: (*latest).clone(),
            ..Default::default()
        };
        let n = recent.len() as f64;
        let avg_duration = recent.iter().map(|m| m.duration_ms).sum::<f64>() / n;
        let avg_throughput = recent.iter().map(|m| m.throughput).sum::<f64>() / n;

        if avg_duration > self.thresholds.max_duration_ms as f64 {
            report.warnings.push(format!(
                "Operations are taking longer than expected ({}ms average)",
                avg_duration.round()
            ));
            report
                .recommendations
                .push("Consider using CSV streaming for large files or disabling analysis".into());
        }
        if avg_throughput < self.thresholds.min_throughput {
            report.warnings.push(format!(
                "Low throughput detected ({} numbers/sec average)",
                avg_throughput.round()
            ));
            report.recommendations.push(
                "Consider disabling automatic sorting/deduplication for faster extraction".into(),
            );
        }

        let hits: u64 = recent.iter().map(|m| u64::from(m.cache_hits)).sum();
        let misses: u64 = recent.iter().map(|m| u64::from(m.cache_misses)).sum();
        if hits + misses > 0 {
            let hit_rate = hits as f64 / (hits + misses) as f64;
            if hit_rate < 0.5 {
                report.optimizations.push(format!(
                    "Low cache hit rate ({}%). Consider increasing cache size in settings",
                    (hit_rate * 100.0).round()
                ));
            }
        }

        report
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            size: self.cache.entry_count(),
            hit_rate: self.cache.hit_rate(),
            total_hits: self.cache.hits(),
            total_misses: self.cache.misses(),
        }
    }
}

/// Measures one operation. Finish it with [`PerformanceTracker::end`].
pub struct PerformanceTracker<'a> {
    operation: String,
    started: Instant,
    cache: &'a ResultCache,
    cache_hits: u32,
    cache_misses: u32,
}

impl PerformanceTracker<'_> {
    /// Cached value for `key`, or the result of `compute`, which is then cached.
    pub fn get_cached<F>(&mut self, key: &str, compute: F) -> Vec<f64>
    where
        F: FnOnce() -> Vec<f64>,
    {
        if let Some(value) = self.cache.get(key) {
            self.cache_hits += 1;
            return value;
        }
        let value = compute();
        self.cache.insert(key, value.clone());
        self.cache_misses += 1;
        value
    }

    pub fn end(self, number_count: usize, file_size: u64) -> PerformanceMetrics {
        let elapsed = self.started.elapsed().as_secs_f64();
        let throughput = if elapsed > 0.0 {
            number_count as f64 / elapsed
        } else {
            0.0
        };

        PerformanceMetrics {
            operation: self.operation,
            duration_ms: elapsed * 1000.0,
            number_count,
            file_size,
            throughput,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
        }
    }
}

pub fn is_performance_acceptable(
    metrics: &PerformanceMetrics,
    thresholds: &PerformanceThresholds,
) -> bool {
    metrics.duration_ms <= thresholds.max_duration_ms as f64
        && metrics.throughput >= thresholds.min_throughput
}

pub fn performance_optimizations(
    metrics: &PerformanceMetrics,
    thresholds: &PerformanceThresholds,
) -> Vec<String> {
    let mut optimizations = Vec::new();
    if metrics.duration_ms > thresholds.max_duration_ms as f64 {
        optimizations.push("Consider enabling CSV streaming or disabling automatic analysis".into());
    }
    if metrics.throughput < thresholds.min_throughput {
        optimizations
            .push("Disable automatic sorting and deduplication to improve throughput".into());
    }
    if metrics.cache_misses > metrics.cache_hits.saturating_mul(2) {
        optimizations.push("Improve cache efficiency by increasing cache size in settings".into());
    }
    optimizations
}

pub fn format_metrics(metrics: &PerformanceMetrics) -> String {
    [
        format!("**Operation**: {}", metrics.operation),
        format!("**Duration**: {:.2}ms", metrics.duration_ms),
        format!("**Numbers Extracted**: {}", metrics.number_count),
        format!(
            "**File Size**: {}",
            crate::safety::format_file_size(metrics.file_size)
        ),
        format!("**Throughput**: {} numbers/sec", metrics.throughput.round()),
        format!("**Cache Hits**: {}", metrics.cache_hits),
        format!("**Cache Misses**: {}", metrics.cache_misses),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(duration_ms: f64, throughput: f64, hits: u32, misses: u32) -> PerformanceMetrics {
        PerformanceMetrics {
            operation: "extract".to_string(),
            duration_ms,
            number_count: 100,
            file_size: 2048,
            throughput,
            cache_hits: hits,
            cache_misses: misses,
        }
    }

    #[test]
    fn test_cache_counts_hits_and_misses() {
        let cache = ResultCache::new(10, Duration::from_secs(60));
        cache.insert("a", vec![1.0]);

        assert_eq!(cache.get("a"), Some(vec![1.0]));
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hit_rate(), 0.5);
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn test_cache_entries_expire() {
        let cache = ResultCache::new(10, Duration::from_millis(50));
        cache.insert("a", vec![1.0]);
        std::thread::sleep(Duration::from_millis(150));

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_cache_stays_within_capacity() {
        let cache = ResultCache::new(2, Duration::from_secs(60));
        for i in 0..20 {
            cache.insert(format!("doc-{i}"), vec![f64::from(i)]);
        }
        assert!(cache.entry_count() <= 2);
    }

    #[test]
    fn test_tracker_uses_cache() {
        let mut monitor = PerformanceMonitor::new(PerformanceThresholds::default());

        let mut tracker = monitor.start_operation("extract");
        let first = tracker.get_cached("doc", || vec![1.0, 2.0]);
        let second = tracker.get_cached("doc", || unreachable!("served from cache"));
        assert_eq!(first, second);
        let finished = tracker.end(2, 10);
        assert_eq!(finished.cache_hits, 1);
        assert_eq!(finished.cache_misses, 1);
        assert_eq!(finished.operation, "extract");

        monitor.record_metrics(finished);
        let stats = monitor.cache_stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.total_hits, 1);
        assert_eq!(stats.total_misses, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_sub_millisecond_operation_keeps_throughput() {
        let mut monitor = PerformanceMonitor::new(PerformanceThresholds::default());
        let tracker = monitor.start_operation("extract");
        std::thread::sleep(Duration::from_micros(50));
        let finished = tracker.end(500, 100);

        assert!(finished.duration_ms > 0.0);
        assert!(finished.throughput > 1000.0);
        monitor.record_metrics(finished);
        assert!(monitor.report().warnings.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut monitor = PerformanceMonitor::new(PerformanceThresholds::default());
        for _ in 0..150 {
            monitor.record_metrics(metrics(1.0, 5000.0, 0, 0));
        }
        assert_eq!(monitor.recorded().count(), 100);
    }

    #[test]
    fn test_empty_report() {
        let monitor = PerformanceMonitor::new(PerformanceThresholds::default());
        assert_eq!(monitor.report(), PerformanceReport::default());
    }

    #[test]
    fn test_report_flags_slow_and_low_throughput() {
        let mut monitor = PerformanceMonitor::new(PerformanceThresholds::default());
        monitor.record_metrics(metrics(8000.0, 10.0, 1, 3));
        monitor.record_metrics(metrics(6000.0, 30.0, 0, 0));

        let report = monitor.report();
        assert_eq!(report.metrics.duration_ms, 6000.0);
        assert_eq!(
            report.warnings,
            vec![
                "Operations are taking longer than expected (7000ms average)".to_string(),
                "Low throughput detected (20 numbers/sec average)".to_string(),
            ]
        );
        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(
            report.optimizations,
            vec!["Low cache hit rate (25%). Consider increasing cache size in settings".to_string()]
        );
    }

    #[test]
    fn test_report_only_averages_recent_operations() {
        let mut monitor = PerformanceMonitor::new(PerformanceThresholds::default());
        monitor.record_metrics(metrics(100_000.0, 5000.0, 0, 0));
        for _ in 0..10 {
            monitor.record_metrics(metrics(10.0, 5000.0, 0, 0));
        }
        assert!(monitor.report().warnings.is_empty());
    }

    #[test]
    fn test_acceptability_and_optimizations() {
        let thresholds = PerformanceThresholds::default();
        assert!(is_performance_acceptable(&metrics(10.0, 5000.0, 0, 0), &thresholds));
        assert!(!is_performance_acceptable(&metrics(6000.0, 5000.0, 0, 0), &thresholds));

        let slow = metrics(6000.0, 10.0, 1, 3);
        assert_eq!(performance_optimizations(&slow, &thresholds).len(), 3);
        assert!(performance_optimizations(&metrics(10.0, 5000.0, 2, 4), &thresholds).is_empty());
    }

    #[test]
    fn test_format_metrics() {
        let text = format_metrics(&metrics(12.5, 8333.4, 0, 1));
        insta::assert_snapshot!(text, @r"
        **Operation**: extract
        **Duration**: 12.50ms
        **Numbers Extracted**: 100
        **File Size**: 2 KB
        **Throughput**: 8333 numbers/sec
        **Cache Hits**: 0
        **Cache Misses**: 1
        ");
    }
}
