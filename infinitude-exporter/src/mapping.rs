//! Metric descriptors, measurements, and the Prometheus text encoding.

use std::fmt::Write;

/// Parse a numeric string, yielding `0.0` when it is blank or malformed.
///
/// Upstream fields are frequently blank placeholders, and a single bad field
/// must never suppress the rest of a scrape.
pub fn parse_or_zero(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

/// Prometheus metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrometheusType {
    Counter,
    Gauge,
}

impl PrometheusType {
    /// Get the TYPE comment string for Prometheus exposition format.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrometheusType::Counter => "counter",
            PrometheusType::Gauge => "gauge",
        }
    }
}

/// Static description of a metric family.
///
/// The label names are fixed when the descriptor is built; only label
/// values and the sample value change from scrape to scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    name: String,
    help: String,
    metric_type: PrometheusType,
    label_names: Vec<&'static str>,
}

impl MetricDesc {
    /// Describe a gauge family.
    pub fn gauge(
        name: impl Into<String>,
        help: impl Into<String>,
        label_names: &[&'static str],
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            metric_type: PrometheusType::Gauge,
            label_names: label_names.to_vec(),
        }
    }

    /// Describe a counter family.
    pub fn counter(
        name: impl Into<String>,
        help: impl Into<String>,
        label_names: &[&'static str],
    ) -> Self {
        Self {
            metric_type: PrometheusType::Counter,
            ..Self::gauge(name, help, label_names)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn metric_type(&self) -> PrometheusType {
        self.metric_type
    }

    pub fn label_names(&self) -> &[&'static str] {
        &self.label_names
    }

    /// Build a sample of this family.
    ///
    /// `label_values` pairs positionally with the declared label names.
    pub fn measure(&self, value: f64, label_values: &[&str]) -> Measurement {
        debug_assert_eq!(
            label_values.len(),
            self.label_names.len(),
            "label cardinality mismatch for {}",
            self.name
        );

        let labels = self
            .label_names
            .iter()
            .zip(label_values)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Measurement {
            key: SeriesKey {
                name: self.name.clone(),
                labels,
            },
            value,
        }
    }
}

/// A unique identifier for a metric time series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    /// The full Prometheus metric name.
    pub name: String,
    /// Label key-value pairs, in declaration order.
    pub labels: Vec<(String, String)>,
}

impl SeriesKey {
    /// Format labels for Prometheus exposition format.
    pub fn format_labels(&self) -> String {
        format_labels(&self.labels)
    }

    /// Value of a label, if present.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One emitted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub key: SeriesKey,
    pub value: f64,
}

impl Measurement {
    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.key.label(name)
    }
}

/// Append one metric family (HELP, TYPE and samples) to `output`.
///
/// Nothing is written when `samples` is empty.
pub fn encode_family(output: &mut String, desc: &MetricDesc, samples: &[&Measurement]) {
    if samples.is_empty() {
        return;
    }

    if !desc.help.is_empty() {
        writeln!(output, "# HELP {} {}", desc.name, escape_help(&desc.help)).ok();
    }
    writeln!(output, "# TYPE {} {}", desc.name, desc.metric_type.as_str()).ok();

    for sample in samples {
        writeln!(
            output,
            "{}{} {}",
            sample.key.name,
            sample.key.format_labels(),
            format_value(sample.value)
        )
        .ok();
    }
}

/// Escape special characters in label values.
fn escape_label_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape special characters in HELP text.
fn escape_help(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Format a floating point value for Prometheus.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Format labels for Prometheus exposition format.
fn format_labels(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return String::new();
    }

    let parts: Vec<String> = labels
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
        .collect();

    format!("{{{}}}", parts.join(","))
}
