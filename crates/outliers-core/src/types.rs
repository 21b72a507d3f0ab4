use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed sample.
///
/// Immutable once constructed; a metric has no identity beyond its position
/// in the request sequence that carries it. The name is an opaque series
/// label and is never validated against a fixed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub time: DateTime<Utc>,
    pub name: String,
    pub value: f64,
}

impl Metric {
    /// Sample captured now.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self::at(Utc::now(), name, value)
    }

    pub fn at(time: DateTime<Utc>, name: impl Into<String>, value: f64) -> Self {
        Self {
            time,
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_serializes_round_trip() {
        let metric = Metric::new("CPU", 38.5);
        let json = serde_json::to_string(&metric).unwrap();
        let back: Metric = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metric);
    }
}
