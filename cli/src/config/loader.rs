//! CLI configuration loader for tooltrace
//!
//! Implements single-source priority loading with overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./tooltrace.json or ./.tooltrace/config.json
//! 3. User config: $XDG_CONFIG_HOME/tooltrace/config.json or ~/.config/tooltrace/config.json
//! 4. Built-in defaults (no files)
//!
//! `TOOLTRACE_*` environment variables are applied on top of the file, and
//! flag overrides on top of those.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tooltrace_core::{ReuseGuard, TraceConfig};
use tracing::debug;

pub const ENV_MAX_DEPTH: &str = "TOOLTRACE_MAX_DEPTH";
pub const ENV_MAX_STRING_LEN: &str = "TOOLTRACE_MAX_STRING_LEN";
pub const ENV_MAX_ITEMS: &str = "TOOLTRACE_MAX_ITEMS";
pub const ENV_REUSE_GUARD: &str = "TOOLTRACE_REUSE_GUARD";

/// Where the base configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// CLI configuration loader
#[derive(Debug, Default)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Directory searched for project config (defaults to the cwd)
    search_dir: Option<PathBuf>,
    /// User config directory (defaults to the platform config dir)
    user_config_dir: Option<PathBuf>,
    /// Flag overrides
    max_depth_override: Option<usize>,
    max_string_len_override: Option<usize>,
    max_items_override: Option<usize>,
    reuse_guard_override: Option<ReuseGuard>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Search a directory other than the current one for project config
    #[cfg(test)]
    pub fn with_search_dir(mut self, dir: PathBuf) -> Self {
        self.search_dir = Some(dir);
        self
    }

    /// Use a user config directory other than the platform one
    #[cfg(test)]
    pub fn with_user_config_dir(mut self, dir: PathBuf) -> Self {
        self.user_config_dir = Some(dir);
        self
    }

    /// Set max depth override
    pub fn with_max_depth_override(mut self, max_depth: usize) -> Self {
        self.max_depth_override = Some(max_depth);
        self
    }

    /// Set max string length override
    pub fn with_max_string_len_override(mut self, max_string_len: usize) -> Self {
        self.max_string_len_override = Some(max_string_len);
        self
    }

    /// Set max items override
    pub fn with_max_items_override(mut self, max_items: usize) -> Self {
        self.max_items_override = Some(max_items);
        self
    }

    /// Set reuse guard override
    pub fn with_reuse_guard_override(mut self, reuse_guard: ReuseGuard) -> Self {
        self.reuse_guard_override = Some(reuse_guard);
        self
    }

    /// Load and resolve configuration from the process environment
    pub fn load(&self) -> Result<TraceConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
            .map(|(config, _)| config)
    }

    /// Load and resolve configuration, reporting where the base came from
    pub fn load_with_source(&self) -> Result<(TraceConfig, ConfigSource)> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Load and resolve configuration with a custom environment lookup
    pub fn load_with_env<F>(&self, env: F) -> Result<(TraceConfig, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Step 1: Find and load base configuration
        let (mut config, source) = if let Some(override_path) = &self.config_override {
            let (config, path) = self.load_from_path(override_path).with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?;
            (config, ConfigSource::File(path))
        } else {
            self.search_and_load()?
        };
        debug!("Loaded base configuration from {}", source);

        // Step 2: Apply environment overrides
        if let Some(value) = env(ENV_MAX_DEPTH) {
            config.capture.max_depth = parse_usize(ENV_MAX_DEPTH, &value)?;
        }
        if let Some(value) = env(ENV_MAX_STRING_LEN) {
            config.capture.max_string_len = parse_usize(ENV_MAX_STRING_LEN, &value)?;
        }
        if let Some(value) = env(ENV_MAX_ITEMS) {
            config.capture.max_items = parse_usize(ENV_MAX_ITEMS, &value)?;
        }
        if let Some(value) = env(ENV_REUSE_GUARD) {
            config.reuse_guard = value
                .parse()
                .with_context(|| format!("Invalid value in {}", ENV_REUSE_GUARD))?;
        }

        // Step 3: Apply flag overrides
        if let Some(max_depth) = self.max_depth_override {
            config.capture.max_depth = max_depth;
        }
        if let Some(max_string_len) = self.max_string_len_override {
            config.capture.max_string_len = max_string_len;
        }
        if let Some(max_items) = self.max_items_override {
            config.capture.max_items = max_items;
        }
        if let Some(reuse_guard) = self.reuse_guard_override {
            config.reuse_guard = reuse_guard;
        }

        // Step 4: Validate
        config
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok((config, source))
    }

    /// Search for config in priority order
    fn search_and_load(&self) -> Result<(TraceConfig, ConfigSource)> {
        // 1. Project directory
        if let Some(found) = self.try_load_project()? {
            return Ok(found);
        }

        // 2. User config directory
        if let Some(found) = self.try_load_user()? {
            return Ok(found);
        }

        // 3. Defaults only
        Ok((TraceConfig::default(), ConfigSource::Defaults))
    }

    /// Try loading from the project directory
    fn try_load_project(&self) -> Result<Option<(TraceConfig, ConfigSource)>> {
        let dir = match &self.search_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        // Try ./tooltrace.json first
        let tooltrace_json = dir.join("tooltrace.json");
        if tooltrace_json.exists() {
            let config = self.load_file(&tooltrace_json)?;
            return Ok(Some((config, ConfigSource::File(tooltrace_json))));
        }

        // Try ./.tooltrace/config.json
        let dir_config = dir.join(".tooltrace").join("config.json");
        if dir_config.exists() {
            let config = self.load_file(&dir_config)?;
            return Ok(Some((config, ConfigSource::File(dir_config))));
        }

        Ok(None)
    }

    /// Try loading from the user config directory
    fn try_load_user(&self) -> Result<Option<(TraceConfig, ConfigSource)>> {
        let Some(config_dir) = self.user_config_dir.clone().or_else(dirs::config_dir) else {
            return Ok(None);
        };

        let config_path = config_dir.join("tooltrace").join("config.json");
        if config_path.exists() {
            let config = self.load_file(&config_path)?;
            return Ok(Some((config, ConfigSource::File(config_path))));
        }

        Ok(None)
    }

    /// Load configuration from a specific path (file or directory)
    fn load_from_path(&self, path: &Path) -> Result<(TraceConfig, PathBuf)> {
        if path.is_file() {
            Ok((self.load_file(path)?, path.to_path_buf()))
        } else if path.is_dir() {
            // Try config.json in the directory
            let config_file = path.join("config.json");
            if config_file.exists() {
                Ok((self.load_file(&config_file)?, config_file))
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    fn load_file(&self, path: &Path) -> Result<TraceConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn parse_usize(var: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a positive integer, got '{}'", var, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    /// Loader isolated from the real cwd and user config
    fn isolated(project: &TempDir, user: &TempDir) -> CliConfigLoader {
        CliConfigLoader::new()
            .with_search_dir(project.path().to_path_buf())
            .with_user_config_dir(user.path().to_path_buf())
    }

    #[test]
    fn test_defaults_when_nothing_is_found() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();

        let (config, source) = isolated(&project, &user).load_with_env(no_env).unwrap();
        assert_eq!(config, TraceConfig::default());
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn test_project_file_beats_user_file() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        fs::write(
            project.path().join("tooltrace.json"),
            r#"{"capture": {"max_items": 5}}"#,
        )
        .unwrap();
        fs::create_dir_all(user.path().join("tooltrace")).unwrap();
        fs::write(
            user.path().join("tooltrace").join("config.json"),
            r#"{"capture": {"max_items": 7}}"#,
        )
        .unwrap();

        let (config, source) = isolated(&project, &user).load_with_env(no_env).unwrap();
        assert_eq!(config.capture.max_items, 5);
        assert_eq!(config.capture.max_depth, 3);
        assert_eq!(
            source,
            ConfigSource::File(project.path().join("tooltrace.json"))
        );
    }

    #[test]
    fn test_dot_dir_and_user_fallbacks() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        fs::create_dir_all(user.path().join("tooltrace")).unwrap();
        fs::write(
            user.path().join("tooltrace").join("config.json"),
            r#"{"reuse_guard": "off"}"#,
        )
        .unwrap();

        let (config, _) = isolated(&project, &user).load_with_env(no_env).unwrap();
        assert_eq!(config.reuse_guard, ReuseGuard::Off);

        fs::create_dir_all(project.path().join(".tooltrace")).unwrap();
        fs::write(
            project.path().join(".tooltrace").join("config.json"),
            r#"{"capture": {"max_depth": 6}}"#,
        )
        .unwrap();

        let (config, _) = isolated(&project, &user).load_with_env(no_env).unwrap();
        assert_eq!(config.capture.max_depth, 6);
        assert_eq!(config.reuse_guard, ReuseGuard::Warn);
    }

    #[test]
    fn test_config_override_accepts_directory() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        let custom = TempDir::new().unwrap();
        fs::write(
            custom.path().join("config.json"),
            r#"{"capture": {"max_string_len": 64}}"#,
        )
        .unwrap();

        let (config, source) = isolated(&project, &user)
            .with_config_override(custom.path().to_path_buf())
            .load_with_env(no_env)
            .unwrap();
        assert_eq!(config.capture.max_string_len, 64);
        assert_eq!(source, ConfigSource::File(custom.path().join("config.json")));
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();

        let err = isolated(&project, &user)
            .with_config_override(project.path().join("missing.json"))
            .load_with_env(no_env)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Config path does not exist"));
    }

    #[test]
    fn test_env_then_flags_override_file() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        fs::write(
            project.path().join("tooltrace.json"),
            r#"{"capture": {"max_depth": 4, "max_items": 10}}"#,
        )
        .unwrap();

        let env = |key: &str| match key {
            ENV_MAX_DEPTH => Some("8".to_string()),
            ENV_MAX_ITEMS => Some("20".to_string()),
            ENV_REUSE_GUARD => Some("off".to_string()),
            _ => None,
        };

        let (config, _) = isolated(&project, &user)
            .with_max_items_override(2)
            .load_with_env(env)
            .unwrap();
        assert_eq!(config.capture.max_depth, 8);
        assert_eq!(config.capture.max_items, 2);
        assert_eq!(config.capture.max_string_len, 1000);
        assert_eq!(config.reuse_guard, ReuseGuard::Off);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();

        let env = |key: &str| (key == ENV_MAX_DEPTH).then(|| "deep".to_string());
        assert!(isolated(&project, &user).load_with_env(env).is_err());

        let err = isolated(&project, &user)
            .with_max_string_len_override(0)
            .load_with_env(no_env)
            .unwrap_err();
        assert!(err.to_string().contains("capture.max_string_len"));

        fs::write(project.path().join("tooltrace.json"), "{not json").unwrap();
        let err = isolated(&project, &user).load_with_env(no_env).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
