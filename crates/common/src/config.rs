use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub guard: GuardSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
}

/// SQL guardrail policy values.
///
/// These are deployment policy, not code: per-deployment overrides go through
/// the config file, never through edits to the validators.
#[derive(Debug, Deserialize, Clone)]
pub struct GuardSettings {
    #[serde(default = "default_max_rows")]
    pub max_rows: u64,
    #[serde(default = "default_allowed_tables")]
    pub allowed_tables: Vec<String>,
    #[serde(default = "default_forbidden_keywords")]
    pub forbidden_keywords: Vec<String>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            allowed_tables: default_allowed_tables(),
            forbidden_keywords: default_forbidden_keywords(),
        }
    }
}

fn default_max_rows() -> u64 {
    10000
}

fn default_allowed_tables() -> Vec<String> {
    ["dim_date", "dim_product", "dim_customer", "fact_sales"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_forbidden_keywords() -> Vec<String> {
    [
        "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "GRANT", "REVOKE",
        "EXECUTE", "EXEC",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Response cache configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_seconds: default_cache_ttl_seconds(),
            max_entries: default_cache_max_entries(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_seconds() -> u64 {
    3600 // 1 hour
}

fn default_cache_max_entries() -> u64 {
    10000
}

/// External generator settings. The generator itself is an injected
/// collaborator; these values are forwarded to whichever backend is wired in.
#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorSettings {
    #[serde(default = "default_generator_model")]
    pub model: String,
    #[serde(default = "default_generator_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_generator_temperature")]
    pub temperature: f32,
    #[serde(default = "default_generator_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: default_generator_model(),
            max_tokens: default_generator_max_tokens(),
            temperature: default_generator_temperature(),
            timeout_secs: default_generator_timeout_secs(),
        }
    }
}

fn default_generator_model() -> String {
    "gpt-4".to_string()
}

fn default_generator_max_tokens() -> u32 {
    2000
}

fn default_generator_temperature() -> f32 {
    0.1
}

fn default_generator_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).context(format!("Failed to read config file at {}", path))?;
        let mut config: AppConfig = serde_yaml::from_str(&content)
            .context(format!("Failed to parse config file at {}", path))?;

        config.apply_env_overrides();
        tracing::info!(
            target: "config",
            path,
            max_rows = config.guard.max_rows,
            cache_ttl_seconds = config.cache.ttl_seconds,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Environment variable overrides for deployment-time tuning.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("QUERYGATE_GUARD__MAX_ROWS") {
            if let Ok(n) = v.parse() {
                tracing::debug!(target: "config", max_rows = n, "Env override applied");
                self.guard.max_rows = n;
            }
        }
        if let Ok(v) = std::env::var("QUERYGATE_CACHE__TTL_SECONDS") {
            if let Ok(n) = v.parse() {
                tracing::debug!(target: "config", ttl_seconds = n, "Env override applied");
                self.cache.ttl_seconds = n;
            }
        }
        if let Ok(v) = std::env::var("QUERYGATE_GENERATOR__TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                tracing::debug!(target: "config", timeout_secs = n, "Env override applied");
                self.generator.timeout_secs = n;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let yaml = r#"
guard:
  max_rows: 500
  allowed_tables:
    - dim_date
    - fact_sales
cache:
  enabled: true
  ttl_seconds: 60
generator:
  timeout_secs: 5
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.guard.max_rows, 500);
        assert_eq!(config.guard.allowed_tables.len(), 2);
        // Unspecified sections fall back to defaults
        assert_eq!(config.guard.forbidden_keywords.len(), 11);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.generator.timeout_secs, 5);
        assert_eq!(config.generator.model, "gpt-4");
    }

    #[test]
    fn test_from_file_reads_and_applies_env_override() {
        let path = std::env::temp_dir().join("querygate_config_test.yaml");
        fs::write(&path, "guard:\n  max_rows: 500\n").unwrap();

        std::env::set_var("QUERYGATE_GUARD__MAX_ROWS", "250");
        let config = AppConfig::from_file(path.to_str().unwrap()).unwrap();
        std::env::remove_var("QUERYGATE_GUARD__MAX_ROWS");
        let _ = fs::remove_file(&path);

        // Env override wins over the file value
        assert_eq!(config.guard.max_rows, 250);
        assert_eq!(config.cache.ttl_seconds, 3600);
    }

    #[test]
    fn test_from_file_missing_path_is_contextual_error() {
        let err = AppConfig::from_file("/nonexistent/querygate.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/querygate.yaml"));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.guard.max_rows, 10000);
        assert!(config
            .guard
            .allowed_tables
            .contains(&"fact_sales".to_string()));
        assert!(config
            .guard
            .forbidden_keywords
            .contains(&"TRUNCATE".to_string()));
        assert_eq!(config.cache.ttl_seconds, 3600);
    }
}
