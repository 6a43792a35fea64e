use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::knowledge::history::DEFAULT_HISTORY_LIMIT;
use crate::knowledge::search::{SearchSettings, DEFAULT_DISTANCE, DEFAULT_THRESHOLD};
use crate::knowledge::StoreSettings;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct InstructConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub knowledge: KnowledgeConfig,
    pub search: SearchConfig,
    pub agents: AgentsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// `stdio` or `http`.
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub profile: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Maximum history entries kept in the document.
    pub history_limit: usize,
    /// Entries returned by history queries that don't pass a limit.
    pub default_history: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub threshold: f64,
    pub distance: usize,
    pub default_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentsConfig {
    pub agents_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 3939,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = default_instruct_dir()
            .join("kb")
            .to_string_lossy()
            .into_owned();
        Self {
            data_dir,
            profile: "default".into(),
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_history: 20,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            distance: DEFAULT_DISTANCE,
            default_limit: 10,
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        let agents_dir = default_instruct_dir()
            .join("agents")
            .to_string_lossy()
            .into_owned();
        Self { agents_dir }
    }
}

/// Returns `~/.mcp-instruct/`, or `./.mcp-instruct/` when there is no home directory.
pub fn default_instruct_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mcp-instruct")
}

/// Returns the default config file path: `~/.mcp-instruct/config.toml`
pub fn default_config_path() -> PathBuf {
    default_instruct_dir().join("config.toml")
}

impl InstructConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            InstructConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MCP_INSTRUCT_DATA_DIR, MCP_INSTRUCT_PROFILE,
    /// MCP_INSTRUCT_AGENTS_DIR, MCP_INSTRUCT_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MCP_INSTRUCT_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("MCP_INSTRUCT_PROFILE") {
            self.storage.profile = val;
        }
        if let Ok(val) = std::env::var("MCP_INSTRUCT_AGENTS_DIR") {
            self.agents.agents_dir = val;
        }
        if let Ok(val) = std::env::var("MCP_INSTRUCT_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the knowledge base directory, expanding `~` if needed.
    pub fn resolved_data_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.data_dir)
    }

    pub fn resolved_agents_dir(&self) -> PathBuf {
        expand_tilde(&self.agents.agents_dir)
    }

    /// Engine settings derived from the `[knowledge]` and `[search]` sections.
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            history_limit: self.knowledge.history_limit,
            search: SearchSettings {
                threshold: self.search.threshold,
                distance: self.search.distance,
            },
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = InstructConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.storage.profile, "default");
        assert_eq!(config.knowledge.history_limit, 100);
        assert_eq!(config.search.threshold, 0.3);
        assert!(config.storage.data_dir.ends_with("kb"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
transport = "http"

[storage]
data_dir = "/tmp/kb"
profile = "work"

[search]
threshold = 0.4
"#;
        let config: InstructConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.transport, "http");
        assert_eq!(config.storage.data_dir, "/tmp/kb");
        assert_eq!(config.storage.profile, "work");
        assert_eq!(config.search.threshold, 0.4);
        // defaults still apply for unset fields
        assert_eq!(config.search.distance, 100);
        assert_eq!(config.server.port, 3939);

        let settings = config.store_settings();
        assert_eq!(settings.search.threshold, 0.4);
        assert_eq!(settings.history_limit, 100);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = InstructConfig::default();
        std::env::set_var("MCP_INSTRUCT_DATA_DIR", "/tmp/override");
        std::env::set_var("MCP_INSTRUCT_PROFILE", "env-profile");
        std::env::set_var("MCP_INSTRUCT_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.data_dir, "/tmp/override");
        assert_eq!(config.storage.profile, "env-profile");
        assert_eq!(config.server.log_level, "trace");

        // Clean up
        std::env::remove_var("MCP_INSTRUCT_DATA_DIR");
        std::env::remove_var("MCP_INSTRUCT_PROFILE");
        std::env::remove_var("MCP_INSTRUCT_LOG_LEVEL");
    }

    #[test]
    fn tilde_expands_to_home() {
        let expanded = expand_tilde("~/kb");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("kb"));
        }
        assert_eq!(expand_tilde("/abs/kb"), PathBuf::from("/abs/kb"));
    }
}
