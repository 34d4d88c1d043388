use prometheus::Histogram;
use std::time::Instant;

/// Records the time between creation and drop into a histogram.
pub struct LatencyGuard {
    start: Instant,
    histogram: Histogram,
}

impl LatencyGuard {
    pub fn new(histogram: Histogram) -> Self {
        Self {
            start: Instant::now(),
            histogram,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for LatencyGuard {
    fn drop(&mut self) {
        self.histogram.observe(self.elapsed_secs());
    }
}
