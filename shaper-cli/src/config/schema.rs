//! Configuration schema definitions.
//!
//! The settings file never holds the API key; that always comes from the
//! environment (or a `.env` file).

use serde::{Deserialize, Serialize};
use shaper::invoker::ModelSettings;
use shaper::llms::DeepSeekConfig;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaperConfig {
    /// Model endpoint settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Per-task model settings.
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Model endpoint settings. Environment variables take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Default model id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Per-task settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TasksConfig {
    /// `transform` settings.
    #[serde(default)]
    pub transform: TaskConfig,

    /// `extract` settings.
    #[serde(default)]
    pub extract: TaskConfig,

    /// `analyze` settings.
    #[serde(default)]
    pub analyze: TaskConfig,
}

/// Model overrides for one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Model id override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Temperature override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl TaskConfig {
    /// Model settings for this task, starting from `default_temperature`.
    #[must_use]
    pub fn settings(&self, default_temperature: f32) -> ModelSettings {
        let mut settings =
            ModelSettings::with_temperature(self.temperature.unwrap_or(default_temperature));
        if let Some(model) = &self.model {
            settings = settings.model(model.clone());
        }
        settings
    }
}

impl ProviderConfig {
    /// Resolves the credential source with `env` first, then this file.
    ///
    /// # Errors
    ///
    /// Returns [`shaper::Error::Configuration`] if no API key is available.
    pub fn resolve(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> shaper::Result<DeepSeekConfig> {
        let config = DeepSeekConfig::from_lookup(|key| {
            env(key).or_else(|| match key {
                DeepSeekConfig::BASE_URL_VAR => self.base_url.clone(),
                DeepSeekConfig::MODEL_VAR => self.model.clone(),
                _ => None,
            })
        })?;
        Ok(match self.timeout_secs {
            Some(secs) => config.with_timeout(secs),
            None => config,
        })
    }
}

impl ShaperConfig {
    /// Validate the configuration and return any issues found.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(url) = &self.provider.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            issues.push(ConfigIssue::error(
                "provider.base_url",
                format!("'{url}' is not an http(s) URL"),
            ));
        }

        if self.provider.timeout_secs == Some(0) {
            issues.push(ConfigIssue::warning(
                "provider.timeout_secs",
                "Timeout is 0, requests will time out immediately",
            ));
        }

        for (name, task) in [
            ("transform", &self.tasks.transform),
            ("extract", &self.tasks.extract),
            ("analyze", &self.tasks.analyze),
        ] {
            if let Some(t) = task.temperature
                && !(0.0..=2.0).contains(&t)
            {
                issues.push(ConfigIssue::error(
                    format!("tasks.{name}.temperature"),
                    format!("Temperature {t} is outside 0.0..=2.0"),
                ));
            }
            if task.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
                issues.push(ConfigIssue::warning(
                    format!("tasks.{name}.model"),
                    "Model is empty, the provider default will be used",
                ));
            }
        }

        issues
    }

    /// Check if the configuration is valid (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate()
            .iter()
            .all(|issue| issue.level != IssueLevel::Error)
    }
}

/// Configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    /// Issue severity level.
    pub level: IssueLevel,
    /// Configuration path (e.g., "tasks.analyze.temperature").
    pub path: String,
    /// Human-readable message.
    pub message: String,
}

impl ConfigIssue {
    /// Create an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            IssueLevel::Error => "ERROR",
            IssueLevel::Warning => "WARN",
        };
        write!(f, "[{}] {}: {}", prefix, self.path, self.message)
    }
}

/// Severity level for configuration issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Error that prevents a task from running correctly.
    Error,
    /// Warning about potential issues.
    Warning,
}
