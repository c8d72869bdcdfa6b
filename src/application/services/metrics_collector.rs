//! Gallery load-quality metrics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// A perceptual-quality signal reported by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformanceSignal {
    /// Largest contentful paint candidate.
    LargestContentfulPaint {
        /// Paint time since navigation start.
        start_time_ms: f64,
    },
    /// First user input and when its handler started.
    FirstInput {
        /// Input time since navigation start.
        start_time_ms: f64,
        /// Handler start time since navigation start.
        processing_start_ms: f64,
    },
    /// One layout shift.
    LayoutShift {
        /// Shift score.
        value: f64,
        /// Shifts right after user input do not count.
        had_recent_input: bool,
    },
}

/// Point-in-time copy of the collected metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GalleryMetrics {
    /// Largest contentful paint, ms.
    pub lcp: f64,
    /// First input delay, ms.
    pub fid: f64,
    /// Cumulative layout shift.
    pub cls: f64,
    /// Time from collector start to the latest completion, ms.
    pub load_time_ms: u64,
    /// Completed image loads.
    pub images_loaded: u64,
    /// Images the page expects to load.
    pub total_images: u64,
}

/// Counts completions and folds in perceptual signals.
///
/// Only counts are kept; the collector never holds image data.
#[derive(Debug)]
pub struct MetricsCollector {
    started: Instant,
    metrics: Mutex<GalleryMetrics>,
}

impl MetricsCollector {
    /// Creates a collector whose clock starts now.
    #[must_use]
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Creates a collector with an explicit start instant.
    #[must_use]
    pub fn started_at(started: Instant) -> Self {
        Self {
            started,
            metrics: Mutex::new(GalleryMetrics::default()),
        }
    }

    /// Records one completed image load.
    pub fn record_completion(&self) {
        let elapsed = duration_ms(self.started.elapsed());
        let mut metrics = self.metrics.lock();
        metrics.images_loaded += 1;
        metrics.load_time_ms = elapsed;
        trace!(
            loaded = metrics.images_loaded,
            elapsed_ms = elapsed,
            "Image completion recorded"
        );
    }

    /// Declares how many images the page expects.
    pub fn set_expected_total(&self, total: u64) {
        self.metrics.lock().total_images = total;
    }

    /// Adds `count` images to the expected total.
    pub fn expect_more(&self, count: u64) {
        let mut metrics = self.metrics.lock();
        metrics.total_images = metrics.total_images.saturating_add(count);
    }

    /// Percentage of expected images loaded, 0 when nothing is expected.
    ///
    /// Reloads count as extra completions, so the result is capped at 100.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress(&self) -> u32 {
        let metrics = self.metrics.lock();
        if metrics.total_images == 0 {
            return 0;
        }
        let percent = (metrics.images_loaded as f64 / metrics.total_images as f64) * 100.0;
        percent.round().min(100.0) as u32
    }

    /// Folds one perceptual signal into the metrics.
    pub fn observe_signal(&self, signal: PerformanceSignal) {
        let mut metrics = self.metrics.lock();
        match signal {
            PerformanceSignal::LargestContentfulPaint { start_time_ms } => {
                metrics.lcp = start_time_ms;
            }
            PerformanceSignal::FirstInput {
                start_time_ms,
                processing_start_ms,
            } => {
                metrics.fid = processing_start_ms - start_time_ms;
            }
            PerformanceSignal::LayoutShift {
                value,
                had_recent_input,
            } => {
                if !had_recent_input {
                    metrics.cls += value;
                }
            }
        }
    }

    /// Drains `signals` in the background until the sender side closes.
    ///
    /// A surface that never reports anything is fine; the task just waits.
    pub fn listen(
        self: &Arc<Self>,
        mut signals: mpsc::UnboundedReceiver<PerformanceSignal>,
    ) -> JoinHandle<()> {
        let collector = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(signal) = signals.recv().await {
                collector.observe_signal(signal);
            }
            debug!("Performance signal source closed");
        })
    }

    /// Returns a copy of the current metrics.
    #[must_use]
    pub fn snapshot(&self) -> GalleryMetrics {
        self.metrics.lock().clone()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_zero_when_nothing_expected() {
        let collector = MetricsCollector::new();
        collector.set_expected_total(0);
        assert_eq!(collector.progress(), 0);

        collector.record_completion();
        assert_eq!(collector.progress(), 0);
    }

    #[test]
    fn test_progress_half_loaded() {
        let collector = MetricsCollector::new();
        collector.set_expected_total(4);
        collector.record_completion();
        collector.record_completion();

        assert_eq!(collector.progress(), 50);
    }

    #[test]
    fn test_progress_rounds() {
        let collector = MetricsCollector::new();
        collector.set_expected_total(3);
        collector.record_completion();
        assert_eq!(collector.progress(), 33);
        collector.record_completion();
        assert_eq!(collector.progress(), 67);
    }

    #[test]
    fn test_expect_more_accumulates_and_progress_caps() {
        let collector = MetricsCollector::new();
        collector.expect_more(1);
        collector.record_completion();
        collector.expect_more(1);
        assert_eq!(collector.progress(), 50);

        collector.record_completion();
        collector.record_completion();
        assert_eq!(collector.snapshot().total_images, 2);
        assert_eq!(collector.progress(), 100);
    }

    #[test]
    fn test_completion_records_elapsed_time() {
        let start = Instant::now()
            .checked_sub(Duration::from_millis(250))
            .unwrap();
        let collector = MetricsCollector::started_at(start);
        collector.record_completion();

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.images_loaded, 1);
        assert!(snapshot.load_time_ms >= 250);
    }

    #[test]
    fn test_signals_fold_into_metrics() {
        let collector = MetricsCollector::new();
        collector.observe_signal(PerformanceSignal::LargestContentfulPaint {
            start_time_ms: 120.0,
        });
        collector.observe_signal(PerformanceSignal::LargestContentfulPaint {
            start_time_ms: 340.0,
        });
        collector.observe_signal(PerformanceSignal::FirstInput {
            start_time_ms: 1000.0,
            processing_start_ms: 1012.5,
        });
        collector.observe_signal(PerformanceSignal::LayoutShift {
            value: 0.05,
            had_recent_input: false,
        });
        collector.observe_signal(PerformanceSignal::LayoutShift {
            value: 0.5,
            had_recent_input: true,
        });
        collector.observe_signal(PerformanceSignal::LayoutShift {
            value: 0.025,
            had_recent_input: false,
        });

        let snapshot = collector.snapshot();
        assert!((snapshot.lcp - 340.0).abs() < f64::EPSILON);
        assert!((snapshot.fid - 12.5).abs() < f64::EPSILON);
        assert!((snapshot.cls - 0.075).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_listen_drains_channel() {
        let collector = Arc::new(MetricsCollector::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = collector.listen(rx);

        tx.send(PerformanceSignal::LargestContentfulPaint {
            start_time_ms: 99.0,
        })
        .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert!((collector.snapshot().lcp - 99.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_signals_are_not_an_error() {
        let collector = Arc::new(MetricsCollector::new());
        let (tx, rx) = mpsc::unbounded_channel::<PerformanceSignal>();
        drop(tx);
        collector.listen(rx).await.unwrap();

        assert_eq!(collector.snapshot(), GalleryMetrics::default());
    }
}
