//! Config command implementation.
//!
//! View configuration settings.
//! Config file is located at ~/.config/ofq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use omnifocus_filter_rs::filter::Target;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable that overrides the config file location.
const CONFIG_ENV: &str = "OFQ_CONFIG";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default dialect when `--target` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,

    /// Validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            target: None,
            validation: ValidationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Validation configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Fail `check` and `compile` when warnings are reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings_as_errors: Option<bool>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config file path.
///
/// Resolution order: `$OFQ_CONFIG`, `$XDG_CONFIG_HOME/ofq/config.toml`,
/// then `~/.config/ofq/config.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("ofq").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("ofq").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk. A missing file yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    parse_config(&content)
}

fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
            "effective": {
                "target": ctx.target,
                "warnings_as_errors": ctx.warnings_as_errors,
                "color": ctx.use_colors,
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("Settings:");
        println!("  version: {}", config.version);
        if let Some(target) = config.target {
            println!("  target: {}", target);
        }

        println!("\n[validation]");
        if let Some(strict) = config.validation.warnings_as_errors {
            println!("  warnings_as_errors: {}", strict);
        }

        println!("\n[output]");
        if let Some(color) = config.output.color {
            println!("  color: {}", color);
        }

        println!("\nEffective:");
        println!("  target: {}", ctx.target);
        println!("  warnings_as_errors: {}", ctx.warnings_as_errors);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    /// Runs `f` with an environment variable set, restoring the old value after.
    fn with_env<T>(key: &str, value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let original = env::var(key).ok();
        match value {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
        let result = f();
        match original {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
        result
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.target.is_none());
        assert!(config.validation.warnings_as_errors.is_none());
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1
target = "omnijs"

[validation]
warnings_as_errors = true

[output]
color = false
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.target, Some(Target::OmniJs));
        assert_eq!(config.validation.warnings_as_errors, Some(true));
        assert_eq!(config.output.color, Some(false));
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config = parse_config("").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.target.is_none());
    }

    #[test]
    fn test_config_invalid_target() {
        let err = parse_config(r#"target = "applescript""#).unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            version: CONFIG_VERSION,
            target: Some(Target::Jxa),
            validation: ValidationConfig {
                warnings_as_errors: Some(false),
            },
            output: OutputConfig { color: Some(true) },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains(r#"target = "jxa""#));
        assert!(toml_str.contains("[validation]"));
        assert!(toml_str.contains("color = true"));
    }

    #[test]
    fn test_migrate_config_rejects_future_version() {
        let err = parse_config("version = 999").unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        let path = with_env(CONFIG_ENV, Some("/tmp/ofq-test/custom.toml"), get_config_path);
        assert_eq!(path.unwrap(), PathBuf::from("/tmp/ofq-test/custom.toml"));
    }

    #[test]
    #[serial]
    fn test_config_path_from_xdg() {
        let path = with_env(CONFIG_ENV, None, || {
            with_env("XDG_CONFIG_HOME", Some("/tmp/ofq-xdg"), get_config_path)
        });
        assert_eq!(path.unwrap(), PathBuf::from("/tmp/ofq-xdg/ofq/config.toml"));
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.toml");
        let config = with_env(CONFIG_ENV, path.to_str(), load_config).unwrap();
        assert!(config.target.is_none());
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "target = \"omnijs\"\n").unwrap();

        let config = with_env(CONFIG_ENV, path.to_str(), load_config).unwrap();
        assert_eq!(config.target, Some(Target::OmniJs));
    }

    #[test]
    #[serial]
    fn test_load_config_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "target = [").unwrap();

        let result = with_env(CONFIG_ENV, path.to_str(), load_config);
        assert!(matches!(result, Err(CommandError::Config(_))));
    }
}
