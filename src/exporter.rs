//! Exporter selection.
//!
//! Turns a user-supplied exporter identifier such as `zipkin://collector` or
//! `sd://my-project-id` into an [`Exporter`] whose `host` can be handed
//! directly to the exporter client. Each family fills in its own default
//! host, port and path.

use crate::error::ConfigError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

const JAEGER_DEFAULT_PORT: u16 = 6832;
const ZIPKIN_DEFAULT_PORT: u16 = 9411;
const ZIPKIN_DEFAULT_PATH: &str = "/api/v2/spans";
const PROMETHEUS_DEFAULT_PORT: u16 = 8888;

/// `scheme://:port` shorthand accepted for stats exporters.
static PORT_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9]+)://:([0-9]{1,4})").expect("port-only pattern is valid")
});

/// Exporter family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExporterKind {
    /// Google Stackdriver; `host` is the GCP project id.
    Stackdriver,
    /// Jaeger collector.
    Jaeger,
    /// Zipkin collector.
    Zipkin,
    /// Prometheus scrape endpoint.
    Prometheus,
}

impl fmt::Display for ExporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExporterKind::Stackdriver => "stackdriver",
            ExporterKind::Jaeger => "jaeger",
            ExporterKind::Zipkin => "zipkin",
            ExporterKind::Prometheus => "prometheus",
        };
        f.write_str(name)
    }
}

/// A selected exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exporter {
    /// Exporter family.
    pub kind: ExporterKind,
    /// Fully qualified URL, or the project id for Stackdriver.
    pub host: String,
}

impl Exporter {
    fn new(kind: ExporterKind, host: impl Into<String>) -> Self {
        Self {
            kind,
            host: host.into(),
        }
    }
}

/// Selects the trace exporter described by `identifier`.
///
/// Returns `Ok(None)` for an empty identifier or an unknown scheme.
///
/// ```
/// use occonfig::{ExporterKind, select_trace_exporter};
///
/// let exporter = select_trace_exporter("zipkin://collector").unwrap().unwrap();
/// assert_eq!(exporter.kind, ExporterKind::Zipkin);
/// assert_eq!(exporter.host, "http://collector:9411/api/v2/spans");
/// ```
///
/// # Errors
///
/// [`ConfigError::InvalidExporterUrl`] if the identifier is not a URL and
/// not a bare keyword, [`ConfigError::MisspelledScheme`] for `jeager://`.
pub fn select_trace_exporter(identifier: &str) -> Result<Option<Exporter>, ConfigError> {
    match identifier {
        "" => return Ok(None),
        "jaeger" => {
            return Ok(Some(Exporter::new(
                ExporterKind::Jaeger,
                "http://localhost:6832",
            )));
        }
        "zipkin" => {
            return Ok(Some(Exporter::new(
                ExporterKind::Zipkin,
                "http://localhost:9411/api/v2/spans",
            )));
        }
        _ => {}
    }

    let url = parse(identifier)?;
    let exporter = match url.scheme() {
        "sd" | "stackdriver" => Some(Exporter::new(ExporterKind::Stackdriver, project_id(&url))),
        "jaeger" => Some(Exporter::new(
            ExporterKind::Jaeger,
            http_endpoint(&url, JAEGER_DEFAULT_PORT, ""),
        )),
        "jeager" => {
            return Err(ConfigError::MisspelledScheme {
                found: "jeager".to_string(),
                expected: "jaeger",
            });
        }
        "zipkin" => Some(Exporter::new(
            ExporterKind::Zipkin,
            http_endpoint(&url, ZIPKIN_DEFAULT_PORT, ZIPKIN_DEFAULT_PATH),
        )),
        _ => None,
    };
    Ok(exporter)
}

/// Selects the stats exporter described by `identifier`.
///
/// The `scheme://:port` shorthand is accepted. Prometheus always serves on
/// `localhost`, whatever host is given.
///
/// # Errors
///
/// [`ConfigError::InvalidExporterUrl`] if the identifier is not a URL.
pub fn select_stats_exporter(identifier: &str) -> Result<Option<Exporter>, ConfigError> {
    if identifier.is_empty() {
        return Ok(None);
    }

    // The replacement host is kept byte for byte, and so is the missing
    // colon: the port folds into the host and the default port applies.
    let rewritten = PORT_ONLY
        .captures(identifier)
        .map(|caps| format!("{}://localhsot{}", &caps[1], &caps[2]));
    let url = parse(rewritten.as_deref().unwrap_or(identifier))?;

    let exporter = match url.scheme() {
        "sd" | "stackdriver" => Some(Exporter::new(ExporterKind::Stackdriver, project_id(&url))),
        "prometheus" | "p8s" => {
            let port = url.port().unwrap_or(PROMETHEUS_DEFAULT_PORT);
            Some(Exporter::new(
                ExporterKind::Prometheus,
                format!("http://localhost:{port}"),
            ))
        }
        _ => None,
    };
    Ok(exporter)
}

fn parse(identifier: &str) -> Result<Url, ConfigError> {
    Url::parse(identifier).map_err(|source| ConfigError::InvalidExporterUrl {
        value: identifier.to_string(),
        source,
    })
}

fn project_id(url: &Url) -> &str {
    url.host_str().unwrap_or_default()
}

/// Reassembles `url` as `http://host:port/path`, filling in `localhost`,
/// `default_port`, and `default_path` where the identifier left them out.
/// A path that is present, even just `/`, is kept.
fn http_endpoint(url: &Url, default_port: u16, default_path: &str) -> String {
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .unwrap_or("localhost");
    let port = url.port().unwrap_or(default_port);
    let path = match url.path() {
        "" => default_path,
        path => path,
    };
    format!("http://{host}:{port}{path}")
}
