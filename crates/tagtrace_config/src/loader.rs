//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::TraceConfig;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "tagtrace.toml";

/// Loads and validates `tagtrace.toml` from a project directory.
///
/// Fails if the file is missing; see [`load_config_or_default`] for the
/// lenient variant used by the scanner.
pub fn load_config(project_dir: &Path) -> Result<TraceConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Loads `tagtrace.toml` if present, otherwise returns the validated
/// default configuration.
///
/// A file that exists but cannot be read or parsed is still an error.
pub fn load_config_or_default(project_dir: &Path) -> Result<TraceConfig, ConfigError> {
    if project_dir.join(CONFIG_FILE).is_file() {
        load_config(project_dir)
    } else {
        let config = TraceConfig::default();
        validate_config(&config)?;
        Ok(config)
    }
}

/// Parses and validates a `tagtrace.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<TraceConfig, ConfigError> {
    let config: TraceConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Renders the default configuration as TOML, for `tagtrace init`.
pub fn default_config_toml() -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&TraceConfig::default())?)
}

/// Validates taxonomy shape and that numeric settings are usable.
pub fn validate_config(config: &TraceConfig) -> Result<(), ConfigError> {
    config.taxonomy.validate()?;

    let w = &config.report.weights;
    let weights = [w.coverage, w.integrity, w.confidence];
    let checks = [
        (config.scan.pattern.trim().is_empty(), "scan.pattern", "must not be empty"),
        (
            config.scan.scopes.iter().any(|s| s.trim().is_empty()),
            "scan.scopes",
            "must not contain empty entries",
        ),
        (config.search.max_parallel == 0, "search.max_parallel", "must be at least 1"),
        (config.search.timeout_secs == 0, "search.timeout_secs", "must be at least 1"),
        (
            weights.iter().any(|v| !v.is_finite() || *v < 0.0),
            "report.weights",
            "must be finite and non-negative",
        ),
        (weights.iter().sum::<f64>() <= 0.0, "report.weights", "must not all be zero"),
    ];
    match checks.into_iter().find(|(failed, _, _)| *failed) {
        Some((_, key, problem)) => Err(ConfigError::out_of_range(key, problem)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Tier;

    #[test]
    fn empty_file_is_default() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, TraceConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
name = "auth-service"

[taxonomy]
primary = ["STORY", "DESIGN", "CODE", "TEST"]
implementation = ["API"]
steering = []
quality = ["SECURITY"]

[scan]
scopes = ["src", "requirements"]
pattern = "@{category}:"

[cache]
dir = ".cache/tagtrace"
ttl_secs = 60

[search]
binary = "/usr/local/bin/rg"
timeout_secs = 10
max_parallel = 8

[graph]
max_cycles = 50

[report]
deny = ["orphaned-tag"]
allow = ["naming-violation"]

[report.weights]
coverage = 0.5
integrity = 0.5
confidence = 0.0
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.name, "auth-service");
        assert_eq!(config.taxonomy.tier_of("CODE"), Some(Tier::Primary));
        assert!(config.taxonomy.steering.is_empty());
        assert_eq!(config.scan.scopes, vec!["src", "requirements"]);
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.search.max_parallel, 8);
        assert_eq!(config.graph.max_cycles, 50);
        assert_eq!(config.report.deny, vec!["orphaned-tag"]);
        assert_eq!(config.report.weights.confidence, 0.0);
        assert_eq!(config.scan.expand_patterns(&config.taxonomy).len(), 6);
    }

    #[test]
    fn partial_taxonomy_keeps_other_defaults() {
        let toml = r#"
[taxonomy]
quality = ["PERF"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.taxonomy.quality, vec!["PERF"]);
        assert_eq!(config.taxonomy.primary.len(), 4);
    }

    #[test]
    fn overlapping_tiers_rejected() {
        let toml = r#"
[taxonomy]
implementation = ["TEST"]
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTaxonomy(_)));
    }

    #[test]
    fn zero_parallelism_rejected() {
        let toml = r#"
[search]
max_parallel = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn all_zero_weights_rejected() {
        let toml = r#"
[report.weights]
coverage = 0.0
integrity = 0.0
confidence = 0.0
"#;
        assert!(load_config_from_str(toml).is_err());
    }

    #[test]
    fn empty_pattern_rejected() {
        let toml = r#"
[scan]
pattern = "  "
"#;
        assert!(matches!(
            load_config_from_str(toml),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path()).unwrap();
        assert_eq!(config, TraceConfig::default());
        assert!(matches!(
            load_config(dir.path()),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"demo\"\n",
        )
        .unwrap();
        let config = load_config_or_default(dir.path()).unwrap();
        assert_eq!(config.project.name, "demo");
    }

    #[test]
    fn default_template_round_trips() {
        let text = default_config_toml().unwrap();
        let parsed = load_config_from_str(&text).unwrap();
        assert_eq!(parsed, TraceConfig::default());
    }
}
