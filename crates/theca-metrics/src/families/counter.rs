//! Monotonic counters.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{LabelValues, format_labels, to_key, write_header};

/// A family of counters sharing one name and label set.
#[derive(Debug)]
pub struct CounterVec {
    name: String,
    help: &'static str,
    labels: &'static [&'static str],
    series: DashMap<LabelValues, AtomicU64>,
}

impl CounterVec {
    /// Creates an empty family.
    pub fn new(name: impl Into<String>, help: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            name: name.into(),
            help,
            labels,
            series: DashMap::new(),
        }
    }

    /// Fully qualified metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds one to the series identified by `values`.
    pub fn inc(&self, values: &[&str]) {
        self.inc_by(values, 1);
    }

    /// Adds `n` to the series identified by `values`.
    pub fn inc_by(&self, values: &[&str], n: u64) {
        debug_assert_eq!(values.len(), self.labels.len(), "label arity for {}", self.name);
        self.series
            .entry(to_key(values))
            .or_default()
            .fetch_add(n, Ordering::Relaxed);
    }

    /// Current value of a series; zero if it was never touched.
    pub fn get(&self, values: &[&str]) -> u64 {
        self.series
            .get(&to_key(values))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub(crate) fn render(&self, out: &mut String) {
        write_header(out, &self.name, self.help, "counter");
        let mut rows: Vec<(LabelValues, u64)> = self
            .series
            .iter()
            .map(|e| (e.key().clone(), e.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (values, count) in rows {
            out.push_str(&format!(
                "{}{} {count}\n",
                self.name,
                format_labels(self.labels, &values, None)
            ));
        }
    }
}
