use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for the telemetry commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TmConfig {
    /// Transport channel selector handed to every `send`.
    pub channel: String,
    /// Transport flags handed to every `send`.
    pub flags: u32,
    /// Keep only the low byte of an out-of-range destination node instead of
    /// rejecting the command.
    pub truncate_node_id: bool,
    /// Fail `send_payload` for unknown payload kinds instead of sending an
    /// empty frame.
    pub reject_unknown_payload: bool,
}

impl TmConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Narrow a parsed node id to the 8-bit destination field.
    pub fn destination_node(&self, raw: u64) -> Option<u8> {
        match u8::try_from(raw) {
            Ok(node) => Some(node),
            Err(_) if self.truncate_node_id => Some(raw as u8),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TmConfig::from_json(r#"{"channel":"uhf"}"#).unwrap();
        assert_eq!(config.channel, "uhf");
        assert_eq!(config.flags, 0);
        assert!(!config.truncate_node_id);
        assert!(!config.reject_unknown_payload);
    }

    #[test]
    fn test_empty_json_matches_default() {
        let config = TmConfig::from_json("{}").unwrap();
        assert_eq!(config, TmConfig::default());
        assert!(config.channel.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TmConfig::from_json(r#"{"chanel":"uhf"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_destination_node_policy() {
        let mut config = TmConfig::default();
        assert_eq!(config.destination_node(5), Some(5));
        assert_eq!(config.destination_node(255), Some(255));
        assert_eq!(config.destination_node(256), None);

        config.truncate_node_id = true;
        assert_eq!(config.destination_node(261), Some(5));
    }
}
