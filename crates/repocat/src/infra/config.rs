//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::{DEFAULT_MIME_PATTERNS, MimeFilter};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from built-in defaults, the user's config file, and env.
///
/// Nothing is read from the repository being bundled: tool paths decide which
/// programs get spawned, so only the invoking user may set them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tools: Tools,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default)]
    pub behavior: Behavior,
    #[serde(default)]
    pub clipboard: Clipboard,
}

/// External executables the pipeline drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tools {
    #[serde(default)]
    git: Option<String>,
    #[serde(default)]
    file: Option<String>,
}

impl Tools {
    pub fn git(&self) -> &str {
        self.git.as_deref().unwrap_or("git")
    }

    pub fn file(&self) -> &str {
        self.file.as_deref().unwrap_or("file")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Filter {
    #[serde(default)]
    mime_patterns: Option<Vec<String>>,
}

impl Filter {
    pub fn mime_filter(&self) -> MimeFilter {
        match &self.mime_patterns {
            Some(patterns) => MimeFilter::new(patterns.iter().cloned()),
            None => MimeFilter::new(DEFAULT_MIME_PATTERNS.iter().copied()),
        }
    }
}

/// What to do when a single file cannot be classified or read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => anyhow::bail!("unknown failure policy '{other}' (expected 'abort' or 'skip')"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Behavior {
    #[serde(default)]
    on_classify_error: Option<FailurePolicy>,
}

impl Behavior {
    pub fn on_classify_error(&self) -> FailurePolicy {
        self.on_classify_error.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Clipboard {
    /// Argv of a clipboard program tried before the built-in probes.
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    git: Option<String>,
    file: Option<String>,
    on_classify_error: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            git: env::var("REPOCAT_GIT").ok(),
            file: env::var("REPOCAT_FILE").ok(),
            on_classify_error: env::var("REPOCAT_ON_CLASSIFY_ERROR").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(git: &str, on_classify_error: &str) -> Self {
        Self {
            git: Some(git.to_owned()),
            file: None,
            on_classify_error: Some(on_classify_error.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration for the invoking user.
    pub fn load() -> Result<Self> {
        Self::load_with_layers(global_config_path(), EnvOverrides::from_env())
    }

    fn load_with_layers(global: Option<PathBuf>, env_overrides: EnvOverrides) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            layers.push(Self::from_file(&global_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("failed to load config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            tools: Tools {
                git: other.tools.git.or(self.tools.git),
                file: other.tools.file.or(self.tools.file),
            },
            filter: Filter {
                mime_patterns: other.filter.mime_patterns.or(self.filter.mime_patterns),
            },
            behavior: Behavior {
                on_classify_error: other
                    .behavior
                    .on_classify_error
                    .or(self.behavior.on_classify_error),
            },
            clipboard: Clipboard {
                command: other.clipboard.command.or(self.clipboard.command),
            },
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("repocat/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(git) = env.git.filter(|value| !value.trim().is_empty()) {
        config.tools.git = Some(git);
    }
    if let Some(file) = env.file.filter(|value| !value.trim().is_empty()) {
        config.tools.file = Some(file);
    }
    if let Some(policy) = env.on_classify_error {
        let policy = policy
            .parse::<FailurePolicy>()
            .context("invalid REPOCAT_ON_CLASSIFY_ERROR")?;
        config.behavior.on_classify_error = Some(policy);
    }
    Ok(config)
}
