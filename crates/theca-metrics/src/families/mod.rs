//! Labelled metric families rendered in the Prometheus text format.
//!
//! Each family owns a `DashMap` from label values to atomic cells, so
//! increments and observations never take a lock shared with other series.

pub mod counter;
pub mod gauge;
pub mod histogram;

use std::fmt::Write;

pub use counter::CounterVec;
pub use gauge::GaugeVec;
pub use histogram::HistogramVec;

/// Label values identifying one series in a family.
pub type LabelValues = Vec<String>;

pub(crate) fn to_key(values: &[&str]) -> LabelValues {
    values.iter().map(|v| (*v).to_string()).collect()
}

pub(crate) fn write_header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
}

/// Formats `{a="x",b="y"}`, with optional trailing extra pair (used for `le`).
pub(crate) fn format_labels(names: &[&str], values: &[String], extra: Option<(&str, &str)>) -> String {
    let mut pairs: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(n, v)| format!("{n}=\"{}\"", escape(v)))
        .collect();
    if let Some((n, v)) = extra {
        pairs.push(format!("{n}=\"{v}\""));
    }
    if pairs.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", pairs.join(","))
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
