//! Fixed-bucket histograms.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{LabelValues, format_labels, to_key, write_header};

/// `count` bucket bounds starting at `start`, each `factor` times the last.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Vec<f64> {
    let mut bounds = Vec::with_capacity(count);
    let mut bound = start;
    for _ in 0..count {
        bounds.push(bound);
        bound *= factor;
    }
    bounds
}

/// One labelled series: per-bucket counts (non-cumulative), sum, and count.
#[derive(Debug)]
struct Series {
    buckets: Vec<AtomicU64>,
    sum_bits: AtomicU64,
    count: AtomicU64,
}

impl Series {
    fn new(len: usize) -> Self {
        Self {
            buckets: (0..len).map(|_| AtomicU64::new(0)).collect(),
            sum_bits: AtomicU64::new(0f64.to_bits()),
            count: AtomicU64::new(0),
        }
    }

    fn add_sum(&self, value: f64) {
        let mut current = self.sum_bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + value).to_bits();
            match self.sum_bits.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

/// A family of histograms sharing one name, label set, and bucket layout.
#[derive(Debug)]
pub struct HistogramVec {
    name: String,
    help: &'static str,
    labels: &'static [&'static str],
    bounds: Vec<f64>,
    series: DashMap<LabelValues, Series>,
}

impl HistogramVec {
    /// Creates an empty family with the given upper bounds (ascending).
    pub fn new(
        name: impl Into<String>,
        help: &'static str,
        labels: &'static [&'static str],
        bounds: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            help,
            labels,
            bounds,
            series: DashMap::new(),
        }
    }

    /// Records one observation.
    pub fn observe(&self, values: &[&str], value: f64) {
        debug_assert_eq!(values.len(), self.labels.len(), "label arity for {}", self.name);
        let series = self
            .series
            .entry(to_key(values))
            .or_insert_with(|| Series::new(self.bounds.len()));
        // Values above the last bound only land in +Inf, i.e. the count.
        if let Some(idx) = self.bounds.iter().position(|b| value <= *b) {
            series.buckets[idx].fetch_add(1, Ordering::Relaxed);
        }
        series.add_sum(value);
        series.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of observations for a series.
    pub fn count(&self, values: &[&str]) -> u64 {
        self.series
            .get(&to_key(values))
            .map(|s| s.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum of observations for a series.
    pub fn sum(&self, values: &[&str]) -> f64 {
        self.series
            .get(&to_key(values))
            .map(|s| f64::from_bits(s.sum_bits.load(Ordering::Relaxed)))
            .unwrap_or(0.0)
    }

    pub(crate) fn render(&self, out: &mut String) {
        write_header(out, &self.name, self.help, "histogram");
        let mut keys: Vec<LabelValues> = self.series.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        for key in keys {
            let Some(series) = self.series.get(&key) else {
                continue;
            };
            let mut cumulative = 0u64;
            for (bound, bucket) in self.bounds.iter().zip(&series.buckets) {
                cumulative += bucket.load(Ordering::Relaxed);
                let le = bound.to_string();
                out.push_str(&format!(
                    "{}_bucket{} {cumulative}\n",
                    self.name,
                    format_labels(self.labels, &key, Some(("le", &le)))
                ));
            }
            let count = series.count.load(Ordering::Relaxed);
            let labels = format_labels(self.labels, &key, None);
            out.push_str(&format!(
                "{}_bucket{} {count}\n",
                self.name,
                format_labels(self.labels, &key, Some(("le", "+Inf")))
            ));
            out.push_str(&format!(
                "{}_sum{labels} {}\n",
                self.name,
                f64::from_bits(series.sum_bits.load(Ordering::Relaxed))
            ));
            out.push_str(&format!("{}_count{labels} {count}\n", self.name));
        }
    }
}
