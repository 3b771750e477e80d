//! Error types for configuration resolution and exporter installation.

use crate::config::Mode;
use crate::exporter::ExporterKind;
use figment::Error as FigmentError;
use std::path::PathBuf;

/// Boxed error returned by exporter sinks and finalizers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from resolving the configuration or installing exporters.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A JSON configuration document could not be parsed.
    #[error("invalid JSON configuration in {origin}")]
    InvalidJson {
        /// File path, or `<inline>` for text passed directly.
        origin: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// An exporter identifier is not a valid URL.
    #[error("invalid exporter identifier: {value}")]
    InvalidExporterUrl {
        /// The identifier as supplied.
        value: String,
        /// Underlying URL parser error.
        #[source]
        source: url::ParseError,
    },

    /// A sampler value is neither a keyword nor a finite number.
    #[error("invalid trace sampler {value:?} (expected 'always', 'never' or a number between 0 and 1)")]
    InvalidSampler {
        /// The sampler value as supplied.
        value: String,
    },

    /// A referenced configuration file could not be read.
    #[error("cannot read configuration file {}", .path.display())]
    FileNotFound {
        /// Path that was resolved for the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An exporter scheme looks like a typo of a known one.
    #[error("misspelled exporter scheme: {found} -> {expected}")]
    MisspelledScheme {
        /// The scheme that was given.
        found: String,
        /// The scheme that was probably meant.
        expected: &'static str,
    },

    /// A file was reached twice while following `extends` pointers.
    #[error("circular extends chain at {}", .path.display())]
    ExtendsCycle {
        /// The file that closed the cycle.
        path: PathBuf,
    },

    /// The working directory needed to resolve relative paths is unavailable.
    #[error("cannot determine working directory")]
    WorkingDirectory(#[source] std::io::Error),

    /// Failed to extract the layered configuration.
    #[error("configuration error: {0}")]
    Extract(#[source] Box<FigmentError>),

    /// The exporter sink refused an exporter.
    #[error("failed to install {kind} exporter for {mode}")]
    ExporterInstall {
        /// Signal the exporter was selected for.
        mode: Mode,
        /// Exporter family.
        kind: ExporterKind,
        /// Error reported by the sink.
        #[source]
        source: BoxError,
    },

    /// A finalizer returned by the sink failed.
    #[error("failed to finalize exporter")]
    Finalize(#[source] BoxError),
}

impl ConfigError {
    /// Returns true for malformed input: JSON, URLs and sampler values.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidJson { .. } | Self::InvalidExporterUrl { .. } | Self::InvalidSampler { .. }
        )
    }

    /// Returns true when a referenced file could not be read.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }
}
