//! Gauges holding an `f64` as raw bits in an `AtomicU64`.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{LabelValues, format_labels, to_key, write_header};

/// A family of gauges sharing one name and label set.
#[derive(Debug)]
pub struct GaugeVec {
    name: String,
    help: &'static str,
    labels: &'static [&'static str],
    series: DashMap<LabelValues, AtomicU64>,
}

impl GaugeVec {
    /// Creates an empty family.
    pub fn new(name: impl Into<String>, help: &'static str, labels: &'static [&'static str]) -> Self {
        Self {
            name: name.into(),
            help,
            labels,
            series: DashMap::new(),
        }
    }

    /// Sets the series identified by `values`.
    pub fn set(&self, values: &[&str], value: f64) {
        debug_assert_eq!(values.len(), self.labels.len(), "label arity for {}", self.name);
        self.series
            .entry(to_key(values))
            .or_default()
            .store(value.to_bits(), Ordering::Relaxed);
    }

    /// Current value; zero for a series never set.
    pub fn get(&self, values: &[&str]) -> f64 {
        self.series
            .get(&to_key(values))
            .map(|g| f64::from_bits(g.load(Ordering::Relaxed)))
            .unwrap_or(0.0)
    }

    pub(crate) fn render(&self, out: &mut String) {
        write_header(out, &self.name, self.help, "gauge");
        let mut rows: Vec<(LabelValues, f64)> = self
            .series
            .iter()
            .map(|e| (e.key().clone(), f64::from_bits(e.value().load(Ordering::Relaxed))))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (values, value) in rows {
            out.push_str(&format!(
                "{}{} {value}\n",
                self.name,
                format_labels(self.labels, &values, None)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let g = GaugeVec::new("t_rps", "test", &["path", "method"]);
        assert_eq!(g.get(&["/a", "GET"]), 0.0);
        g.set(&["/a", "GET"], 2.4);
        assert_eq!(g.get(&["/a", "GET"]), 2.4);
        g.set(&["/a", "GET"], 0.0);
        assert_eq!(g.get(&["/a", "GET"]), 0.0);
    }
}
