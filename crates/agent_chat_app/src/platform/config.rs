use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agent_chat_engine::TransportSettings;
use chat_logging::LogDestination;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILENAME: &str = "agent_chat.ron";
const CONFIG_ENV: &str = "AGENT_CHAT_CONFIG";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Host configuration; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ChatConfig {
    pub base_url: String,
    pub sse_path: String,
    pub start_conversation_path: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub reconnect_delay_ms: u64,
    pub snapshot_path: PathBuf,
    pub log_destination: LogDestination,
    pub log_path: PathBuf,
}

impl Default for ChatConfig {
    fn default() -> Self {
        let transport = TransportSettings::default();
        Self {
            base_url: transport.base_url,
            sse_path: transport.sse_path,
            start_conversation_path: transport.start_conversation_path,
            connect_timeout_ms: millis(transport.connect_timeout),
            request_timeout_ms: millis(transport.request_timeout),
            reconnect_delay_ms: millis(transport.reconnect_delay),
            snapshot_path: PathBuf::from("./chat.html"),
            log_destination: LogDestination::File,
            log_path: PathBuf::from("./agent_chat.log"),
        }
    }
}

impl ChatConfig {
    pub(crate) fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            base_url: self.base_url.clone(),
            sse_path: self.sse_path.clone(),
            start_conversation_path: self.start_conversation_path.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// `$AGENT_CHAT_CONFIG`, or `./agent_chat.ron`.
pub(crate) fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Loads the config at `path`. A missing file yields the defaults.
pub(crate) fn load_config(path: &Path) -> Result<ChatConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(ChatConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use chat_logging::LogDestination;
    use pretty_assertions::assert_eq;

    use super::{load_config, ChatConfig, ConfigError};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, ChatConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent_chat.ron");
        fs::write(
            &path,
            r#"(
                base_url: "http://agents.internal:9000",
                request_timeout_ms: 500,
                log_destination: Both,
            )"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.base_url, "http://agents.internal:9000");
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.sse_path, "/sse");

        let settings = config.transport_settings();
        assert_eq!(settings.request_timeout, Duration::from_millis(500));
        assert_eq!(settings.reconnect_delay, Duration::from_secs(3));
    }

    #[test]
    fn invalid_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent_chat.ron");
        fs::write(&path, "(base_url: 42").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
