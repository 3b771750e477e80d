//! Following `extends` pointers across JSON files.

use crate::config::Config;
use crate::error::ConfigError;
use crate::sources::json::parse_document;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves the `extends` chain starting at `config.config_file`.
///
/// The pointer is resolved against `base_dir`; each file's own pointer is
/// resolved against that file's directory. A file only fills in what the
/// configs that extend it left unset, so the nearer file always wins.
/// The returned config has no `config_file`.
///
/// # Errors
///
/// [`ConfigError::FileNotFound`] if a file cannot be read,
/// [`ConfigError::InvalidJson`] if one does not parse, and
/// [`ConfigError::ExtendsCycle`] if a file is reached twice.
pub fn resolve_chain(mut config: Config, base_dir: &Path) -> Result<Config, ConfigError> {
    let mut base_dir = base_dir.to_path_buf();
    let mut visited = HashSet::new();

    while let Some(file) = config.config_file.take().filter(|file| !file.is_empty()) {
        let path = base_dir.join(&file);
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::FileNotFound {
            path: path.clone(),
            source,
        })?;

        let identity = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
        if !visited.insert(identity) {
            return Err(ConfigError::ExtendsCycle { path });
        }

        let extended = parse_document(&text, &path.display().to_string())?;
        tracing::debug!(
            target: "occonfig",
            path = %path.display(),
            "Merging extended configuration file"
        );

        base_dir = parent_dir(&path);
        config = Config::merge(extended, config);
    }

    Ok(config)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::json::from_json;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn no_config_file_is_returned_unchanged() {
        let config = Config {
            service_name: Some("svc".to_string()),
            ..Config::default()
        };
        let resolved = resolve_chain(config.clone(), Path::new("/nonexistent")).unwrap();
        assert_eq!(resolved, config);
    }

    #[test]
    fn extending_file_wins_over_extended_file() {
        let dir = TempDir::new().unwrap();
        let a = r#"{"extends": "B.json", "serviceName": "low"}"#;
        write(dir.path(), "A.json", a);
        write(dir.path(), "B.json", r#"{"serviceName": "high", "zpage": "http://:9000/debug"}"#);

        let resolved = resolve_chain(from_json(a).unwrap(), dir.path()).unwrap();
        assert_eq!(resolved.service_name.as_deref(), Some("low"));
        assert_eq!(resolved.zpage.as_deref(), Some("http://:9000/debug"));
        assert_eq!(resolved.config_file, None);
    }

    #[test]
    fn nested_extends_resolve_relative_to_each_file() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "app/config.json",
            r#"{"extends": "../shared/base.json", "serviceName": "app"}"#,
        );
        write(
            dir.path(),
            "shared/base.json",
            r#"{"extends": "defaults/tracing.json", "trace": {"exporter": "zipkin"}}"#,
        );
        write(
            dir.path(),
            "shared/defaults/tracing.json",
            r#"{
                "serviceName": "base",
                "trace": {"exporter": "jaeger", "sampler": "never"},
                "stats": {"exporter": "p8s://:8888"}
            }"#,
        );

        let start = Config {
            config_file: Some("app/config.json".to_string()),
            ..Config::default()
        };
        let resolved = resolve_chain(start, dir.path()).unwrap();

        assert_eq!(resolved.service_name.as_deref(), Some("app"));
        assert_eq!(resolved.trace_exporter.as_deref(), Some("zipkin"));
        assert_eq!(resolved.trace_sampler, Some(0.0));
        assert_eq!(resolved.stats_exporter.as_deref(), Some("p8s://:8888"));
        assert_eq!(resolved.config_file, None);
    }

    #[test]
    fn in_hand_values_override_every_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "base.json", r#"{"trace": {"sampler": 0.5, "exporter": "zipkin"}}"#);

        let start = Config {
            config_file: Some("base.json".to_string()),
            trace_sampler: Some(0.1),
            ..Config::default()
        };
        let resolved = resolve_chain(start, dir.path()).unwrap();
        assert_eq!(resolved.trace_sampler, Some(0.1));
        assert_eq!(resolved.trace_exporter.as_deref(), Some("zipkin"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let start = Config {
            config_file: Some("missing.json".to_string()),
            ..Config::default()
        };
        let err = resolve_chain(start, dir.path()).unwrap_err();
        assert!(err.is_not_found());
        let missing = dir.path().join("missing.json");
        assert!(matches!(err, ConfigError::FileNotFound { ref path, .. } if *path == missing));
    }

    #[test]
    fn missing_file_deeper_in_chain_is_not_found() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{"extends": "gone.json"}"#);
        let start = Config {
            config_file: Some("a.json".to_string()),
            ..Config::default()
        };
        assert!(resolve_chain(start, dir.path()).unwrap_err().is_not_found());
    }

    #[test]
    fn invalid_json_reports_the_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "broken.json", "{ not json");
        let start = Config {
            config_file: Some("broken.json".to_string()),
            ..Config::default()
        };
        let err = resolve_chain(start, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidJson { ref origin, .. } if origin.ends_with("broken.json")
        ));
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "loop.json", r#"{"extends": "./loop.json"}"#);
        let start = Config {
            config_file: Some("loop.json".to_string()),
            ..Config::default()
        };
        let err = resolve_chain(start, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ExtendsCycle { .. }));
    }

    #[test]
    fn two_file_loop_is_a_cycle() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.json", r#"{"extends": "sub/b.json"}"#);
        write(dir.path(), "sub/b.json", r#"{"extends": "../a.json"}"#);
        let start = Config {
            config_file: Some("a.json".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            resolve_chain(start, dir.path()),
            Err(ConfigError::ExtendsCycle { .. })
        ));
    }

    #[test]
    fn absolute_extends_ignores_base_dir() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "abs.json", r#"{"serviceUrl": "http://abs"}"#);
        let start = Config {
            config_file: Some(dir.path().join("abs.json").display().to_string()),
            ..Config::default()
        };
        let resolved = resolve_chain(start, Path::new("/definitely/elsewhere")).unwrap();
        assert_eq!(resolved.service_url.as_deref(), Some("http://abs"));
    }
}
