//! Trace sampler values.

use crate::error::ConfigError;
use opentelemetry_sdk::trace::Sampler;

/// Parses a sampler setting.
///
/// `"always"` is `1.0`, `"never"` is `0.0`, and anything else must be a
/// floating point literal. An empty string or a negative number is unset.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSampler`] for values that are not finite
/// numbers.
pub fn parse_sampler(value: &str) -> Result<Option<f64>, ConfigError> {
    match value {
        "always" => Ok(Some(1.0)),
        "never" => Ok(Some(0.0)),
        "" => Ok(None),
        other => {
            let probability = other
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| ConfigError::InvalidSampler {
                    value: other.to_string(),
                })?;
            Ok(checked_probability(probability))
        }
    }
}

/// Normalises a numeric sampler: negative values are unset.
pub(crate) fn checked_probability(probability: f64) -> Option<f64> {
    if probability < 0.0 {
        return None;
    }
    if probability > 1.0 {
        tracing::warn!(
            target: "occonfig",
            probability,
            "Trace sampler above 1.0, every trace will be sampled"
        );
    }
    Some(probability)
}

/// Builds the SDK sampler for a sampling probability.
pub fn sampler_for(probability: f64) -> Sampler {
    if probability <= 0.0 {
        Sampler::AlwaysOff
    } else if probability >= 1.0 {
        Sampler::AlwaysOn
    } else {
        Sampler::TraceIdRatioBased(probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(parse_sampler("always").unwrap(), Some(1.0));
        assert_eq!(parse_sampler("never").unwrap(), Some(0.0));
    }

    #[test]
    fn empty_is_unset() {
        assert_eq!(parse_sampler("").unwrap(), None);
    }

    #[test]
    fn numeric_literal() {
        assert_eq!(parse_sampler("0.25").unwrap(), Some(0.25));
        assert_eq!(parse_sampler("1").unwrap(), Some(1.0));
    }

    #[test]
    fn negative_is_unset() {
        assert_eq!(parse_sampler("-1").unwrap(), None);
        assert_eq!(parse_sampler("-0.5").unwrap(), None);
    }

    #[test]
    fn malformed_is_rejected() {
        for value in ["sometimes", "0.5x", "NaN", "inf", " 0.5"] {
            let err = parse_sampler(value).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidSampler { value: ref v } if v == value),
                "unexpected error for {value:?}: {err:?}"
            );
            assert!(err.is_parse_error());
        }
    }

    #[test]
    fn sdk_sampler_selection() {
        assert!(matches!(sampler_for(0.0), Sampler::AlwaysOff));
        assert!(matches!(sampler_for(1.0), Sampler::AlwaysOn));
        assert!(matches!(sampler_for(3.0), Sampler::AlwaysOn));
        assert!(matches!(sampler_for(0.25), Sampler::TraceIdRatioBased(p) if p == 0.25));
    }
}
