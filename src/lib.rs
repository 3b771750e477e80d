//! Layered instrumentation configuration.
//!
//! Resolves one effective [`Config`] from environment variables, JSON files
//! chained through `extends`, command-line flags, and built-in defaults, then
//! selects trace and stats exporters from it.
//!
//! # Example
//!
//! ```no_run
//! use occonfig::{Config, ConfigError, Exporter, ExporterSink, Finalizer, Mode, OcConfigBuilder};
//!
//! struct PrintSink;
//!
//! impl ExporterSink for PrintSink {
//!     fn install(
//!         &mut self,
//!         mode: Mode,
//!         exporter: &Exporter,
//!         config: &Config,
//!     ) -> Result<Option<Finalizer>, occonfig::BoxError> {
//!         let service = config.service_name.as_deref().unwrap_or("<unnamed>");
//!         println!("{mode}: {} at {} for {service}", exporter.kind, exporter.host);
//!         Ok(None)
//!     }
//! }
//!
//! fn main() -> Result<(), ConfigError> {
//!     let guard = OcConfigBuilder::new().init(Mode::Trace | Mode::Stats, &mut PrintSink)?;
//!     occonfig::tracing::info!(sampler = ?guard.sampler(), "Instrumentation ready");
//!     guard.close()
//! }
//! ```
//!
//! # Precedence
//!
//! Lowest to highest: defaults, environment (`OC_*`), command line
//! (`--oc-*`). Each of the last two may point at a JSON file, and each JSON
//! file may `extends` another; a file only fills in what its extender left
//! unset.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod chain;
mod config;
mod error;
mod exporter;
mod guard;
mod sampler;
pub mod sources;

pub use builder::OcConfigBuilder;
pub use chain::resolve_chain;
pub use config::{Config, Mode, Modes};
pub use error::{BoxError, ConfigError};
pub use exporter::{Exporter, ExporterKind, select_stats_exporter, select_trace_exporter};
pub use guard::{ExporterSink, Finalizer, OcGuard};
pub use sampler::{parse_sampler, sampler_for};

/// Re-exported for version compatibility with this crate's dependencies.
pub use opentelemetry;
/// Re-exported for version compatibility with this crate's dependencies.
pub use opentelemetry_sdk;
/// Re-exported for version compatibility with this crate's dependencies.
pub use tracing;

/// Re-exported for callers registering the `--oc-*` flags.
pub use clap;
