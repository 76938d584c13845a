use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised by the heat-budget core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RTempError {
    #[error("unknown {kind} method '{name}'; valid options: {valid}")]
    UnknownMethod {
        kind: &'static str,
        name: String,
        valid: String,
    },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("timestamps must be non-decreasing: record {index} at {current} follows {previous}")]
    NonMonotonicTime {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error(
        "numerical instability at {timestamp}: water temperature changed by {change:.3} °C \
         (threshold {threshold} °C); reduce the timestep"
    )]
    NumericalInstability {
        timestamp: NaiveDateTime,
        change: f64,
        threshold: f64,
    },

    #[error("invalid wind height: measured {measured} m, target {target} m (both must be > 0)")]
    InvalidHeight { measured: f64, target: f64 },
}

pub type Result<T> = std::result::Result<T, RTempError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_lists_options() {
        let err = RTempError::UnknownMethod {
            kind: "solar",
            name: "Foo".to_string(),
            valid: "Bras, Bird".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Foo"), "got {msg}");
        assert!(msg.contains("Bras, Bird"), "got {msg}");
    }

    #[test]
    fn test_instability_message_carries_magnitude() {
        let ts = NaiveDateTime::parse_from_str("2024-07-15 03:00:00", "%Y-%m-%d %H:%M:%S")
            .expect("valid timestamp");
        let err = RTempError::NumericalInstability {
            timestamp: ts,
            change: 7.25,
            threshold: 5.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("7.250"), "got {msg}");
        assert!(msg.contains("threshold 5"), "got {msg}");
    }
}
