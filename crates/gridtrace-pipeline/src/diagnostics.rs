//! Trace diagnostics: timing and counts for one trace run.
//!
//! Every call to [`trace_into`](crate::trace_into) returns diagnostics
//! alongside the rendered output. Timestamps come from the `web-time`
//! crate so the core stays usable on WASM targets.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coverage::CoverageStrategy;
use crate::scanner::ScanStats;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single trace run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDiagnostics {
    /// Grid height in cells.
    pub rows: usize,
    /// Grid width in cells.
    pub cols: usize,
    /// Coverage strategy the scanner used.
    pub strategy: CoverageStrategy,
    /// Polygons filled with color 0.
    pub light_polygons: usize,
    /// Polygons filled with color 1.
    pub dark_polygons: usize,
    /// Points emitted by the walker, closing repeats included.
    pub traced_points: usize,
    /// Points handed to the renderer after reduction.
    pub reduced_points: usize,
    /// Cells the scanner asked the coverage index about.
    pub coverage_queries: usize,
    /// Queries answered "already captured".
    pub captured_hits: usize,
    /// Checkerboard vertices resolved by the walker.
    pub saddles: usize,
    /// Wall-clock duration of the region scan, walks included (seconds).
    #[serde(with = "duration_serde")]
    pub scan_duration: Duration,
    /// Wall-clock duration of the whole trace (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

impl TraceDiagnostics {
    /// Start a diagnostics record for a grid of the given shape.
    #[must_use]
    pub const fn new(rows: usize, cols: usize, strategy: CoverageStrategy) -> Self {
        Self {
            rows,
            cols,
            strategy,
            light_polygons: 0,
            dark_polygons: 0,
            traced_points: 0,
            reduced_points: 0,
            coverage_queries: 0,
            captured_hits: 0,
            saddles: 0,
            scan_duration: Duration::ZERO,
            total_duration: Duration::ZERO,
        }
    }

    /// Fold the scanner's counters in.
    pub const fn record_scan(&mut self, stats: &ScanStats) {
        self.traced_points = stats.traced_points;
        self.coverage_queries = stats.coverage_queries;
        self.captured_hits = stats.captured_hits;
        self.saddles = stats.saddles;
    }

    /// Total polygons emitted.
    #[must_use]
    pub const fn polygon_count(&self) -> usize {
        self.light_polygons + self.dark_polygons
    }

    /// Fraction of traced points removed by reduction.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reduction_ratio(&self) -> f64 {
        // Closing repeats are not points the renderer ever sees.
        let open = self.traced_points.saturating_sub(self.polygon_count());
        if open == 0 {
            0.0
        } else {
            1.0 - self.reduced_points as f64 / open as f64
        }
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Trace Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {}x{} ({} cells), coverage: {}",
            self.cols,
            self.rows,
            self.rows * self.cols,
            self.strategy.name(),
        ));
        lines.push(format!(
            "Total duration: {:.3}ms (scan {:.3}ms)",
            duration_ms(self.total_duration),
            duration_ms(self.scan_duration),
        ));
        lines.push(String::new());
        lines.push(format!(
            "Polygons: {} ({} light, {} dark)",
            self.polygon_count(),
            self.light_polygons,
            self.dark_polygons,
        ));
        lines.push(format!(
            "Points: {} traced -> {} reduced ({:.1}% reduction)",
            self.traced_points,
            self.reduced_points,
            self.reduction_ratio() * 100.0,
        ));
        lines.push(format!(
            "Coverage queries: {}  |  captured: {}  |  saddles: {}",
            self.coverage_queries, self.captured_hits, self.saddles,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> TraceDiagnostics {
        let mut diag = TraceDiagnostics::new(2, 2, CoverageStrategy::ComponentMap);
        diag.record_scan(&ScanStats {
            coverage_queries: 4,
            captured_hits: 0,
            saddles: 3,
            traced_points: 20,
        });
        diag.light_polygons = 2;
        diag.dark_polygons = 2;
        diag.reduced_points = 16;
        diag.scan_duration = Duration::from_millis(250);
        diag.total_duration = Duration::from_millis(500);
        diag
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let d = Duration::from_millis(1234);
        let ms = duration_ms(d);
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn polygon_count_sums_colors() {
        assert_eq!(sample().polygon_count(), 4);
    }

    #[test]
    fn unit_squares_are_not_reduced() {
        assert!(sample().reduction_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn empty_record_has_zero_ratio() {
        let diag = TraceDiagnostics::new(1, 1, CoverageStrategy::EdgeScan);
        assert!(diag.reduction_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn report_mentions_counts() {
        let report = sample().report();
        assert!(report.contains("Grid: 2x2 (4 cells), coverage: component-map"));
        assert!(report.contains("Polygons: 4 (2 light, 2 dark)"));
        assert!(report.contains("saddles: 3"));
    }

    #[test]
    fn serializes_durations_as_seconds() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!((json["total_duration"].as_f64().unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(json["strategy"], "ComponentMap");
    }

    #[test]
    fn json_round_trip() {
        let diag = sample();
        let json = serde_json::to_string(&diag).unwrap();
        let back: TraceDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diag);
    }

    #[test]
    fn negative_duration_rejected() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["total_duration"] = serde_json::json!(-1.0);
        assert!(serde_json::from_value::<TraceDiagnostics>(json).is_err());
    }
}
