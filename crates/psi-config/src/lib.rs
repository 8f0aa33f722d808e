//! TOML configuration for the PSI tools and the tracing subscriber they log
//! through.

use std::path::Path;

use psi_java::{AssertionMode, EditSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PsiConfig {
    pub logging: LoggingConfig,
    pub assertions: AssertionsConfig,
    pub editing: EditingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive
    /// string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,

    /// Write logs to stderr. When disabled logs are dropped.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured directives, with `RUST_LOG`
    /// merged in when it is set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let config_directives = Self::normalize_level_directives(&self.level);
        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssertionsConfig {
    /// What a violated tree contract does: `panic`, `log` or `disabled`.
    pub mode: AssertionMode,
}

impl AssertionsConfig {
    /// Install the configured mode process-wide.
    pub fn apply(&self) {
        let previous = psi_java::assertions::set_mode(self.mode);
        if previous != self.mode {
            tracing::debug!(target: "psi.config", ?previous, mode = ?self.mode, "assertion mode changed");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditingConfig {
    /// One level of indentation for synthesized lines.
    pub indent: String,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            indent: EditSettings::default().indent,
        }
    }
}

impl From<&EditingConfig> for EditSettings {
    fn from(config: &EditingConfig) -> Self {
        EditSettings {
            indent: config.indent.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` quotes the offending source line.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl PsiConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn edit_settings(&self) -> EditSettings {
        EditSettings::from(&self.editing)
    }
}

/// Install the global tracing subscriber described by `config`.
///
/// Returns `false` when a global subscriber was already installed; the
/// existing one stays in place.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = config.env_filter();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(if config.stderr {
            tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr)
        } else {
            tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::sink)
        });
    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    if installed {
        tracing::debug!(target: "psi.config", level = %config.level, json = config.json, "tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        assert_eq!(PsiConfig::from_toml_str("").unwrap(), PsiConfig::default());
        let config = PsiConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.stderr);
        assert!(!config.logging.json);
        assert_eq!(config.editing.indent, "    ");
    }

    #[test]
    fn sections_override_fields() {
        let config = PsiConfig::from_toml_str(
            "[logging]\nlevel = \"debug\"\njson = true\n\n[assertions]\nmode = \"log\"\n\n[editing]\nindent = \"\\t\"\n",
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(config.logging.stderr);
        assert_eq!(config.assertions.mode, AssertionMode::Log);
        assert_eq!(config.edit_settings().indent, "\t");
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        let err = PsiConfig::from_toml_str("[logging]\nlevl = \"debug\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(ref msg) if msg.contains("levl")), "{err}");
        let err = PsiConfig::from_toml_str("[assertions]\nmode = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(PsiConfig::from_toml_str("[unknown]\n").is_err());
    }

    #[test]
    fn level_directives_are_normalized() {
        assert_eq!(LoggingConfig::normalize_level_directives(" WARNING "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
        assert_eq!(
            LoggingConfig::normalize_level_directives("psi_java=trace,info"),
            "psi_java=trace,info"
        );
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("psi.toml");
        let err = PsiConfig::load(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        std::fs::write(&missing, "[editing]\nindent = \"  \"\n").unwrap();
        assert_eq!(PsiConfig::load(&missing).unwrap().editing.indent, "  ");
    }
}
