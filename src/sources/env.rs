//! Environment variables.
//!
//! | Variable            | Field            |
//! |---------------------|------------------|
//! | `OC_SERVICE_NAME`   | `service_name`   |
//! | `OC_SERVICE_URL`    | `service_url`    |
//! | `OC_ZPAGE`          | `zpage`          |
//! | `OC_CONFIG_JSON`    | `config_file`    |
//! | `OC_TRACE_EXPORTER` | `trace_exporter` |
//! | `OC_TRACE_SAMPLER`  | `trace_sampler`  |
//! | `OC_STATS_EXPORTER` | `stats_exporter` |

use crate::config::{Config, non_empty};
use crate::error::ConfigError;
use crate::sampler::parse_sampler;

/// Builds a config from key/value pairs shaped like the process environment.
///
/// Unrecognised keys are ignored and missing keys leave their field unset.
///
/// ```
/// use occonfig::sources::env::from_env_map;
///
/// let config = from_env_map([("OC_SERVICE_NAME", "checkout"), ("HOME", "/root")]).unwrap();
/// assert_eq!(config.service_name.as_deref(), Some("checkout"));
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSampler`] if `OC_TRACE_SAMPLER` is malformed.
pub fn from_env_map<I, K, V>(vars: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut config = Config::default();
    for (key, value) in vars {
        let value = value.as_ref();
        match key.as_ref() {
            "OC_SERVICE_NAME" => config.service_name = non_empty(value),
            "OC_SERVICE_URL" => config.service_url = non_empty(value),
            "OC_ZPAGE" => config.zpage = non_empty(value),
            "OC_CONFIG_JSON" => config.config_file = non_empty(value),
            "OC_TRACE_EXPORTER" => config.trace_exporter = non_empty(value),
            "OC_TRACE_SAMPLER" => config.trace_sampler = parse_sampler(value)?,
            "OC_STATS_EXPORTER" => config.stats_exporter = non_empty(value),
            _ => {}
        }
    }
    Ok(config)
}

/// Builds a config from the current process environment.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSampler`] if `OC_TRACE_SAMPLER` is malformed.
pub fn from_process_env() -> Result<Config, ConfigError> {
    from_env_map(std::env::vars_os().filter_map(|(key, value)| {
        Some((key.into_string().ok()?, value.into_string().ok()?))
    }))
}
