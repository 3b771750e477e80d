//! JSON configuration documents.
//!
//! ```json
//! {
//!   "extends": "../base.json",
//!   "serviceName": "checkout",
//!   "serviceUrl": "http://localhost:8080",
//!   "zpage": "http://:8888/debug",
//!   "trace": { "exporter": "zipkin://collector", "sampler": 0.25 },
//!   "stats": { "exporter": "prometheus://:8888" }
//! }
//! ```
//!
//! Every key is optional. `trace.sampler` accepts `"always"`, `"never"`, a
//! number, or a numeric string.

use crate::config::{Config, non_empty};
use crate::error::ConfigError;
use crate::sampler::{checked_probability, parse_sampler};
use serde_json::{Map, Value};

/// Parses a JSON document into a config.
///
/// The `extends` pointer is copied into `config_file` as written; resolving
/// it against the document's directory is up to the caller.
///
/// ```
/// use occonfig::sources::json::from_json;
///
/// let config = from_json(r#"{"serviceName": "my-service"}"#).unwrap();
/// assert_eq!(config.service_name.as_deref(), Some("my-service"));
/// assert_eq!(config.trace_sampler, None);
/// ```
///
/// # Errors
///
/// [`ConfigError::InvalidJson`] if the text is not a JSON object, and
/// [`ConfigError::InvalidSampler`] for a malformed `trace.sampler` string.
pub fn from_json(text: &str) -> Result<Config, ConfigError> {
    parse_document(text, "<inline>")
}

pub(crate) fn parse_document(text: &str, origin: &str) -> Result<Config, ConfigError> {
    let root: Map<String, Value> =
        serde_json::from_str(text).map_err(|source| ConfigError::InvalidJson {
            origin: origin.to_string(),
            source,
        })?;

    let mut config = Config {
        service_name: string(&root, "serviceName"),
        service_url: string(&root, "serviceUrl"),
        zpage: string(&root, "zpage"),
        config_file: string(&root, "extends"),
        ..Config::default()
    };

    if let Some(Value::Object(trace)) = root.get("trace") {
        // Written later, so it wins over `extends`. Only an explicit key counts.
        if trace.contains_key("configFile") {
            config.config_file = string(trace, "configFile");
        }
        config.trace_exporter = string(trace, "exporter");
        config.trace_sampler = match trace.get("sampler") {
            Some(Value::String(sampler)) => parse_sampler(sampler)?,
            Some(Value::Number(sampler)) => sampler.as_f64().and_then(checked_probability),
            _ => None,
        };
    }

    if let Some(Value::Object(stats)) = root.get("stats") {
        config.stats_exporter = string(stats, "exporter");
    }

    Ok(config)
}

fn string(tree: &Map<String, Value>, key: &str) -> Option<String> {
    tree.get(key).and_then(Value::as_str).and_then(non_empty)
}
