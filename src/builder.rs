//! Builder that resolves the effective configuration.
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults (always-on sampling, program name as service name)
//! 2. Environment variables, with their `extends` chain
//! 3. Command-line flags, with their own `extends` chain
//!
//! Each layer only overrides the fields it sets.

use crate::chain::resolve_chain;
use crate::config::{Config, Modes};
use crate::error::ConfigError;
use crate::guard::{ExporterSink, OcGuard};
use crate::sources::env::{from_env_map, from_process_env};
use crate::sources::flags::CommandLineSource;
use figment::Figment;
use figment::providers::Serialized;
use std::path::{Path, PathBuf};

/// Builder for resolving configuration and installing exporters.
///
/// # Example
///
/// ```no_run
/// use clap::Command;
/// use occonfig::{Mode, OcConfigBuilder, ConfigError, sources::flags::register_flags};
///
/// fn main() -> Result<(), ConfigError> {
///     let matches = register_flags(Command::new("server"), Mode::Trace | Mode::Stats)
///         .get_matches();
///
///     let config = OcConfigBuilder::new()
///         .with_command_line(&matches)
///         .resolve()?;
///
///     println!("trace exporter: {:?}", config.trace_exporter);
///     Ok(())
/// }
/// ```
#[must_use = "builders do nothing unless .resolve() or .init() is called"]
#[derive(Default)]
pub struct OcConfigBuilder<'a> {
    env: Option<Vec<(String, String)>>,
    command_line: Option<&'a dyn CommandLineSource>,
    base_dir: Option<PathBuf>,
    program_name: Option<String>,
}

impl<'a> OcConfigBuilder<'a> {
    /// Creates a builder that reads the process environment and the
    /// current working directory, with no command-line source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `vars` instead of the process environment.
    pub fn with_env_map<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Layers command-line configuration over the environment.
    pub fn with_command_line(mut self, source: &'a dyn CommandLineSource) -> Self {
        self.command_line = Some(source);
        self
    }

    /// Sets the directory that top-level `extends` paths are relative to.
    ///
    /// Defaults to the current working directory.
    pub fn base_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the service name used when no source provides one.
    ///
    /// Defaults to the file name of the running executable.
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    /// Resolves the effective configuration.
    ///
    /// Every call reads all sources again.
    ///
    /// # Errors
    ///
    /// Fails on the first source that cannot be read or parsed; there is no
    /// partial result.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(ConfigError::WorkingDirectory)?,
        };

        let env = match &self.env {
            Some(vars) => from_env_map(vars.iter().map(|(key, value)| (key, value)))?,
            None => from_process_env()?,
        };
        let env = resolve_chain(env, &base_dir)?;
        tracing::debug!(
            target: "occonfig",
            layer = "environment",
            config = ?env,
            "Applying configuration layer"
        );

        let program_name = self.program_name.clone().or_else(program_basename);
        let mut figment = Figment::from(Serialized::defaults(Config::defaults(program_name)))
            .merge(Serialized::defaults(env));

        if let Some(source) = self.command_line {
            let command_line = resolve_chain(source.command_line_config()?, &base_dir)?;
            tracing::debug!(
                target: "occonfig",
                layer = "command_line",
                config = ?command_line,
                "Applying configuration layer"
            );
            figment = figment.merge(Serialized::defaults(command_line));
        }

        figment
            .extract()
            .map_err(|e| ConfigError::Extract(Box::new(e)))
    }

    /// Resolves the configuration and hands the selected exporters to `sink`.
    ///
    /// Only the signals in `modes` are considered. A signal without an
    /// exporter is logged and skipped.
    ///
    /// # Errors
    ///
    /// Fails if resolution fails, an exporter identifier is invalid, or the
    /// sink rejects an exporter.
    pub fn init(
        &self,
        modes: impl Into<Modes>,
        sink: &mut dyn ExporterSink,
    ) -> Result<OcGuard, ConfigError> {
        let config = self.resolve()?;
        OcGuard::install(config, modes.into(), sink)
    }
}

fn program_basename() -> Option<String> {
    let argv0 = std::env::args_os().next()?;
    Path::new(&argv0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
