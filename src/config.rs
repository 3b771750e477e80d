//! The configuration model.
//!
//! [`Config`] is a flat record with one optional value per setting. `None`
//! means "not set by this source", which is the only thing [`Config::merge`]
//! looks at when layering sources on top of each other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Effective instrumentation configuration.
///
/// Each source parser produces a standalone `Config`; unset fields are
/// `None`. Fields left unset are not serialised, so layering two configs
/// through figment lets the lower layer show through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name reported to exporters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    /// Service URL, used as the local endpoint by some trace exporters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,

    /// In-process debug console URL (e.g. `http://:8888/debug`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zpage: Option<String>,

    /// Path of a JSON file this config extends, relative to the file (or
    /// working directory) it came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,

    /// Trace exporter identifier (e.g. `jaeger://localhost:6831`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_exporter: Option<String>,

    /// Trace sampling probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_sampler: Option<f64>,

    /// Stats exporter identifier (e.g. `prometheus://:8888`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_exporter: Option<String>,
}

impl Config {
    /// Layers `high` over `low`, field by field.
    ///
    /// Every field takes `high`'s value unless it is unset there.
    #[must_use]
    pub fn merge(low: Config, high: Config) -> Config {
        Config {
            service_name: high.service_name.or(low.service_name),
            service_url: high.service_url.or(low.service_url),
            zpage: high.zpage.or(low.zpage),
            config_file: high.config_file.or(low.config_file),
            trace_exporter: high.trace_exporter.or(low.trace_exporter),
            trace_sampler: high.trace_sampler.or(low.trace_sampler),
            stats_exporter: high.stats_exporter.or(low.stats_exporter),
        }
    }

    /// Returns true when no field is set.
    pub fn is_unset(&self) -> bool {
        *self == Config::default()
    }

    /// The built-in bottom layer: always-on sampling and, if known, the
    /// program name as service name.
    pub(crate) fn defaults(program_name: Option<String>) -> Config {
        Config {
            service_name: program_name,
            trace_sampler: Some(1.0),
            ..Config::default()
        }
    }
}

/// Maps an empty string to `None`.
pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() { None } else { Some(value) }
}

/// A signal an application wants instrumented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Distributed tracing.
    Trace,
    /// Metrics.
    Stats,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Trace => write!(f, "trace"),
            Mode::Stats => write!(f, "stats"),
        }
    }
}

impl BitOr for Mode {
    type Output = Modes;

    fn bitor(self, rhs: Mode) -> Modes {
        Modes::from(self) | rhs
    }
}

/// A set of [`Mode`]s. Any subset can be selected.
///
/// ```
/// use occonfig::{Mode, Modes};
///
/// let modes = Mode::Trace | Mode::Stats;
/// assert!(modes.contains(Mode::Stats));
/// assert_eq!(modes, Modes::ALL);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modes {
    trace: bool,
    stats: bool,
}

impl Modes {
    /// No signals.
    pub const NONE: Modes = Modes {
        trace: false,
        stats: false,
    };
    /// Tracing only.
    pub const TRACE: Modes = Modes {
        trace: true,
        stats: false,
    };
    /// Stats only.
    pub const STATS: Modes = Modes {
        trace: false,
        stats: true,
    };
    /// Tracing and stats.
    pub const ALL: Modes = Modes {
        trace: true,
        stats: true,
    };

    /// Returns true if `mode` is in the set.
    pub fn contains(self, mode: Mode) -> bool {
        match mode {
            Mode::Trace => self.trace,
            Mode::Stats => self.stats,
        }
    }

    /// Returns the set with `mode` added.
    #[must_use]
    pub fn with(mut self, mode: Mode) -> Modes {
        match mode {
            Mode::Trace => self.trace = true,
            Mode::Stats => self.stats = true,
        }
        self
    }

    /// Iterates the modes in the set, trace first.
    pub fn iter(self) -> impl Iterator<Item = Mode> {
        [Mode::Trace, Mode::Stats]
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

impl From<Mode> for Modes {
    fn from(mode: Mode) -> Self {
        Modes::NONE.with(mode)
    }
}

impl BitOr<Mode> for Modes {
    type Output = Modes;

    fn bitor(self, rhs: Mode) -> Modes {
        self.with(rhs)
    }
}

impl FromIterator<Mode> for Modes {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        iter.into_iter().fold(Modes::NONE, Modes::with)
    }
}
