//! Metric name filtering.

use crate::config::FilterConfig;

/// Include/exclude filter over metric family names.
pub struct MetricFilter {
    include_metrics: Vec<glob::Pattern>,
    exclude_metrics: Vec<glob::Pattern>,
}

impl MetricFilter {
    /// Create a new filter from configuration.
    ///
    /// Invalid patterns are rejected by config validation, so any that
    /// slip through here are skipped.
    pub fn new(config: &FilterConfig) -> Self {
        let include_metrics = config
            .include_metrics
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();

        let exclude_metrics = config
            .exclude_metrics
            .iter()
            .filter_map(|p| glob::Pattern::new(p).ok())
            .collect();

        Self {
            include_metrics,
            exclude_metrics,
        }
    }

    /// Check if a metric family should be exported.
    pub fn should_include(&self, name: &str) -> bool {
        if !self.include_metrics.is_empty() && !self.include_metrics.iter().any(|p| p.matches(name))
        {
            return false;
        }

        !self.exclude_metrics.iter().any(|p| p.matches(name))
    }
}

impl Default for MetricFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
