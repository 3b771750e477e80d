//! Command-line flags, registered on a `clap` command.
//!
//! `--oc-service-name`, `--oc-service-url`, `--oc-config-json` and
//! `--oc-zpage` are always added. `--oc-trace-exporter` and
//! `--oc-trace-sampler` need [`Mode::Trace`], `--oc-stats-exporter` needs
//! [`Mode::Stats`].

use crate::config::{Config, Mode, Modes, non_empty};
use crate::error::ConfigError;
use crate::sampler::parse_sampler;
use clap::{Arg, ArgMatches, Command};

const SERVICE_NAME: &str = "oc-service-name";
const SERVICE_URL: &str = "oc-service-url";
const CONFIG_JSON: &str = "oc-config-json";
const ZPAGE: &str = "oc-zpage";
const TRACE_EXPORTER: &str = "oc-trace-exporter";
const TRACE_SAMPLER: &str = "oc-trace-sampler";
const STATS_EXPORTER: &str = "oc-stats-exporter";

/// A source of command-line configuration.
///
/// Passed to [`OcConfigBuilder::with_command_line`](crate::OcConfigBuilder::with_command_line)
/// and consulted on every resolution.
pub trait CommandLineSource {
    /// Returns the configuration given on the command line.
    ///
    /// # Errors
    ///
    /// Fails if a flag value cannot be parsed.
    fn command_line_config(&self) -> Result<Config, ConfigError>;
}

impl CommandLineSource for ArgMatches {
    fn command_line_config(&self) -> Result<Config, ConfigError> {
        from_arg_matches(self)
    }
}

impl CommandLineSource for Config {
    fn command_line_config(&self) -> Result<Config, ConfigError> {
        Ok(self.clone())
    }
}

/// Adds the `--oc-*` flags relevant to `modes` to `command`.
///
/// ```
/// use clap::Command;
/// use occonfig::{Mode, sources::flags::{from_arg_matches, register_flags}};
///
/// let command = register_flags(Command::new("server"), Mode::Trace);
/// let matches = command.get_matches_from(["server", "--oc-trace-sampler", "never"]);
/// let config = from_arg_matches(&matches).unwrap();
/// assert_eq!(config.trace_sampler, Some(0.0));
/// ```
pub fn register_flags(command: Command, modes: impl Into<Modes>) -> Command {
    let modes = modes.into();
    let mut command = command
        .arg(flag(SERVICE_NAME, "NAME", "Service name reported to exporters"))
        .arg(flag(SERVICE_URL, "URL", "Service URL"))
        .arg(flag(CONFIG_JSON, "PATH", "Config JSON file path"))
        .arg(flag(
            ZPAGE,
            "URL",
            "ZPage in-process debug console url (e.g. http://:8888/debug)",
        ));

    if modes.contains(Mode::Trace) {
        command = command
            .arg(flag(
                TRACE_EXPORTER,
                "URL",
                "Trace exporter (e.g. stackdriver://demo-project-id, jaeger://localhost:6831)",
            ))
            .arg(flag(
                TRACE_SAMPLER,
                "PROB",
                "Trace sampling rate ('always' (default), 'never', '0-1')",
            ));
    }

    if modes.contains(Mode::Stats) {
        command = command.arg(flag(
            STATS_EXPORTER,
            "URL",
            "Stats exporter (e.g. stackdriver://demo-project-id, prometheus://:8888)",
        ));
    }

    command
}

/// Reads the `--oc-*` flags out of parsed matches.
///
/// Flags that were never registered read as unset.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSampler`] if `--oc-trace-sampler` is malformed.
pub fn from_arg_matches(matches: &ArgMatches) -> Result<Config, ConfigError> {
    Ok(Config {
        service_name: value(matches, SERVICE_NAME),
        service_url: value(matches, SERVICE_URL),
        zpage: value(matches, ZPAGE),
        config_file: value(matches, CONFIG_JSON),
        trace_exporter: value(matches, TRACE_EXPORTER),
        trace_sampler: match value(matches, TRACE_SAMPLER) {
            Some(sampler) => parse_sampler(&sampler)?,
            None => None,
        },
        stats_exporter: value(matches, STATS_EXPORTER),
    })
}

fn flag(id: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).value_name(value_name).help(help)
}

fn value(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .try_get_one::<String>(id)
        .ok()
        .flatten()
        .and_then(|value| non_empty(value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(modes: Modes, args: &[&str]) -> Config {
        let command = register_flags(Command::new("app"), modes);
        let matches = command
            .try_get_matches_from(std::iter::once("app").chain(args.iter().copied()))
            .unwrap();
        from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn no_flags_is_unset() {
        assert!(parse(Modes::ALL, &[]).is_unset());
    }

    #[test]
    fn common_flags() {
        let config = parse(
            Modes::NONE,
            &[
                "--oc-service-name",
                "my-service",
                "--oc-service-url",
                "http://localhost:8080",
                "--oc-config-json",
                "./testdata/config.json",
                "--oc-zpage=http://:8080/debug",
            ],
        );
        assert_eq!(config.service_name.as_deref(), Some("my-service"));
        assert_eq!(config.service_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.config_file.as_deref(), Some("./testdata/config.json"));
        assert_eq!(config.zpage.as_deref(), Some("http://:8080/debug"));
        assert_eq!(config.trace_sampler, None);
    }

    #[test]
    fn trace_flags() {
        let config = parse(
            Modes::TRACE,
            &["--oc-trace-exporter", "jaeger://localhost:6831", "--oc-trace-sampler", "0.25"],
        );
        assert_eq!(config.trace_exporter.as_deref(), Some("jaeger://localhost:6831"));
        assert_eq!(config.trace_sampler, Some(0.25));
    }

    #[test]
    fn stats_flags() {
        let config = parse(Modes::STATS, &["--oc-stats-exporter", "p8s://:8888"]);
        assert_eq!(config.stats_exporter.as_deref(), Some("p8s://:8888"));
    }

    #[test]
    fn flags_are_gated_by_mode() {
        let stats_only = register_flags(Command::new("app"), Mode::Stats);
        let result = stats_only.try_get_matches_from(["app", "--oc-trace-exporter", "zipkin"]);
        assert!(result.is_err());

        let trace_only = register_flags(Command::new("app"), Mode::Trace);
        let result = trace_only.try_get_matches_from(["app", "--oc-stats-exporter", "p8s://:8888"]);
        assert!(result.is_err());
    }

    #[test]
    fn accepts_a_single_mode() {
        let command = register_flags(Command::new("server"), Mode::Trace);
        let matches = command
            .try_get_matches_from(["server", "--oc-trace-sampler", "never"])
            .unwrap();
        let config = from_arg_matches(&matches).unwrap();
        assert_eq!(config.trace_sampler, Some(0.0));
    }

    #[test]
    fn unregistered_flags_read_as_unset() {
        let config = parse(Modes::NONE, &["--oc-service-name", "svc"]);
        assert_eq!(config.trace_exporter, None);
        assert_eq!(config.stats_exporter, None);
    }

    #[test]
    fn malformed_sampler_flag_fails() {
        let command = register_flags(Command::new("app"), Mode::Trace);
        let matches = command
            .try_get_matches_from(["app", "--oc-trace-sampler", "half"])
            .unwrap();
        assert!(matches!(
            matches.command_line_config(),
            Err(ConfigError::InvalidSampler { .. })
        ));
    }
}
