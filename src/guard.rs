//! Exporter installation and lifecycle.
//!
//! The crate does not talk to exporter backends itself. An [`ExporterSink`]
//! receives each selected [`Exporter`] and may hand back a finalizer; the
//! [`OcGuard`] runs those finalizers on [`close()`](OcGuard::close) or when
//! dropped.

use crate::config::{Config, Mode, Modes};
use crate::error::{BoxError, ConfigError};
use crate::exporter::{Exporter, select_stats_exporter, select_trace_exporter};
use crate::sampler::sampler_for;
use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::Sampler;
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
use std::fmt;

/// Cleanup returned by a sink, e.g. flushing a batching exporter.
pub type Finalizer = Box<dyn FnOnce() -> Result<(), BoxError> + Send>;

/// Performs the real exporter setup.
pub trait ExporterSink {
    /// Installs `exporter` for `mode`.
    ///
    /// `config` is the fully resolved configuration, for settings such as
    /// the service name.
    fn install(
        &mut self,
        mode: Mode,
        exporter: &Exporter,
        config: &Config,
    ) -> Result<Option<Finalizer>, BoxError>;
}

/// Guard returned by [`OcConfigBuilder::init`](crate::OcConfigBuilder::init).
///
/// On drop, runs the finalizers of every installed exporter. Use
/// [`close()`](Self::close) to see finalizer errors.
pub struct OcGuard {
    config: Config,
    trace_exporter: Option<Exporter>,
    stats_exporter: Option<Exporter>,
    finalizers: Vec<Finalizer>,
}

impl OcGuard {
    pub(crate) fn install(
        config: Config,
        modes: Modes,
        sink: &mut dyn ExporterSink,
    ) -> Result<Self, ConfigError> {
        let mut guard = Self {
            config,
            trace_exporter: None,
            stats_exporter: None,
            finalizers: Vec::new(),
        };

        for mode in modes.iter() {
            let selected = match mode {
                Mode::Trace => select_trace_exporter(identifier(&guard.config.trace_exporter))?,
                Mode::Stats => select_stats_exporter(identifier(&guard.config.stats_exporter))?,
            };

            let Some(exporter) = selected else {
                tracing::warn!(target: "occonfig", %mode, "No {mode} exporter configured");
                continue;
            };

            let finalizer = sink
                .install(mode, &exporter, &guard.config)
                .map_err(|source| ConfigError::ExporterInstall {
                    mode,
                    kind: exporter.kind,
                    source,
                })?;
            guard.finalizers.extend(finalizer);
            tracing::debug!(
                target: "occonfig",
                %mode,
                kind = %exporter.kind,
                host = %exporter.host,
                "Installed exporter"
            );

            match mode {
                Mode::Trace => guard.trace_exporter = Some(exporter),
                Mode::Stats => guard.stats_exporter = Some(exporter),
            }
        }

        Ok(guard)
    }

    /// Returns the resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the installed trace exporter, if any.
    pub fn trace_exporter(&self) -> Option<&Exporter> {
        self.trace_exporter.as_ref()
    }

    /// Returns the installed stats exporter, if any.
    pub fn stats_exporter(&self) -> Option<&Exporter> {
        self.stats_exporter.as_ref()
    }

    /// Returns the SDK sampler for the configured sampling probability.
    pub fn sampler(&self) -> Sampler {
        sampler_for(self.config.trace_sampler.unwrap_or(1.0))
    }

    /// Returns an SDK resource carrying the service name.
    pub fn resource(&self) -> Resource {
        let mut builder = Resource::builder();
        if let Some(name) = &self.config.service_name {
            builder = builder.with_attributes([KeyValue::new(SERVICE_NAME, name.clone())]);
        }
        builder.build()
    }

    /// Runs every finalizer in install order and returns the first error.
    pub fn close(mut self) -> Result<(), ConfigError> {
        let mut first_error = None;
        for finalizer in std::mem::take(&mut self.finalizers) {
            if let Err(e) = finalizer() {
                first_error.get_or_insert(ConfigError::Finalize(e));
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn identifier(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

impl fmt::Debug for OcGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcGuard")
            .field("config", &self.config)
            .field("trace_exporter", &self.trace_exporter)
            .field("stats_exporter", &self.stats_exporter)
            .field("finalizers", &self.finalizers.len())
            .finish()
    }
}

impl Drop for OcGuard {
    fn drop(&mut self) {
        for finalizer in self.finalizers.drain(..) {
            if let Err(e) = finalizer() {
                tracing::error!(target: "occonfig", error = %e, "Failed to finalize exporter");
            }
        }
    }
}
