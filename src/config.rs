// Topics, queue depths, drive params
//
// Params are read once at startup: defaults below, optionally overridden by a
// YAML params file, then by CLI flags.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{NodeError, Result};
use crate::translator::DriveParams;

// Topic defaults (ROS-style names, mapped to zenoh key expressions on use)
pub const DEFAULT_KEYBOARD_TOPIC: &str = "/key"; // key presses in
pub const DEFAULT_MUX_TOPIC: &str = "/drive"; // drive commands out
pub const DEFAULT_MUX_STATE_TOPIC: &str = "/mux"; // mux enable flags in

// Slot of the keyboard in the mux flag array
pub const DEFAULT_KEY_MUX_IDX: usize = 1;

pub const DEFAULT_KEYBOARD_SPEED: f64 = 1.8; // m/s
pub const DEFAULT_KEYBOARD_STEER_ANGLE: f64 = 0.3; // rad

// Only the latest key press matters
pub const KEY_QUEUE_DEPTH: usize = 1;
// Outbound drive commands beyond this are dropped
pub const DRIVE_QUEUE_DEPTH: usize = 10;

// Keyboard source poll interval
pub const KEYBOARD_POLL_MS: u64 = 20;

#[derive(Debug, Clone, Deserialize, PartialEq)]
// Unknown keys are ignored so a params file can be shared with other nodes
#[serde(default)]
pub struct NodeParams {
    /// Drive command output topic (named after the mux input it feeds)
    pub mux_topic: String,
    pub keyboard_topic: String,
    pub mux_state_topic: String,
    pub key_mux_idx: usize,
    pub keyboard_speed: f64,
    pub keyboard_steer_angle: f64,
    pub frame_id: String,
    pub keyboard_enabled_at_start: bool,
}

impl Default for NodeParams {
    fn default() -> Self {
        Self {
            mux_topic: DEFAULT_MUX_TOPIC.to_string(),
            keyboard_topic: DEFAULT_KEYBOARD_TOPIC.to_string(),
            mux_state_topic: DEFAULT_MUX_STATE_TOPIC.to_string(),
            key_mux_idx: DEFAULT_KEY_MUX_IDX,
            keyboard_speed: DEFAULT_KEYBOARD_SPEED,
            keyboard_steer_angle: DEFAULT_KEYBOARD_STEER_ANGLE,
            frame_id: String::new(),
            keyboard_enabled_at_start: false,
        }
    }
}

impl NodeParams {
    /// Load params from a YAML file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading params from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| NodeError::ParamsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn drive_params(&self) -> DriveParams {
        DriveParams {
            keyboard_speed: self.keyboard_speed,
            keyboard_steer_angle: self.keyboard_steer_angle,
        }
    }

    /// Check params before any topic is declared
    pub fn validate(&self) -> Result<()> {
        if !self.keyboard_speed.is_finite() || self.keyboard_speed <= 0.0 {
            return Err(NodeError::InvalidParam {
                name: "keyboard_speed",
                reason: format!("must be finite and > 0, got {}", self.keyboard_speed),
            });
        }
        if !self.keyboard_steer_angle.is_finite() {
            return Err(NodeError::InvalidParam {
                name: "keyboard_steer_angle",
                reason: format!("must be finite, got {}", self.keyboard_steer_angle),
            });
        }
        for (name, topic) in [
            ("mux_topic", &self.mux_topic),
            ("keyboard_topic", &self.keyboard_topic),
            ("mux_state_topic", &self.mux_state_topic),
        ] {
            topic_key_expr(name, topic)?;
        }
        Ok(())
    }
}

/// Map a ROS-style topic name to a zenoh key expression.
/// Zenoh keys can't start or end with '/', so `/key` becomes `key`.
pub fn topic_key_expr(name: &'static str, topic: &str) -> Result<String> {
    let key = topic.trim().trim_matches('/');
    if key.is_empty() {
        return Err(NodeError::InvalidParam {
            name,
            reason: format!("topic {:?} is empty", topic),
        });
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let params = NodeParams::default();
        params.validate().unwrap();
        assert_eq!(params.key_mux_idx, 1);
        assert!(!params.keyboard_enabled_at_start);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let params = NodeParams::from_yaml(
            "mux_topic: /keyboard_drive\nkeyboard_speed: 1.5\nkeyboard_steer_angle: 0.3\n",
        )
        .unwrap();
        assert_eq!(params.mux_topic, "/keyboard_drive");
        assert_eq!(params.keyboard_speed, 1.5);
        assert_eq!(params.keyboard_topic, DEFAULT_KEYBOARD_TOPIC);
        assert_eq!(
            params.drive_params(),
            DriveParams {
                keyboard_speed: 1.5,
                keyboard_steer_angle: 0.3
            }
        );
    }

    #[test]
    fn test_shared_params_file() {
        let params =
            NodeParams::from_yaml("scan_beams: 1080\nkeyboard_speed: 2.0\n").unwrap();
        assert_eq!(params.keyboard_speed, 2.0);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = NodeParams::from_yaml("keyboard_speed: fast\n").unwrap_err();
        assert!(matches!(err, NodeError::ParamsParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "keyboard_topic: /teleop/key").unwrap();
        writeln!(file, "key_mux_idx: 3").unwrap();

        let params = NodeParams::from_file(file.path()).unwrap();
        assert_eq!(params.keyboard_topic, "/teleop/key");
        assert_eq!(params.key_mux_idx, 3);
    }

    #[test]
    fn test_missing_file() {
        let err = NodeParams::from_file("/nonexistent/params.yaml").unwrap_err();
        assert!(matches!(err, NodeError::ParamsIo { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_speed() {
        for speed in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let params = NodeParams {
                keyboard_speed: speed,
                ..NodeParams::default()
            };
            assert!(matches!(
                params.validate(),
                Err(NodeError::InvalidParam {
                    name: "keyboard_speed",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_validate_rejects_empty_topic() {
        let params = NodeParams {
            keyboard_topic: "/".to_string(),
            ..NodeParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(NodeError::InvalidParam {
                name: "keyboard_topic",
                ..
            })
        ));
    }

    #[test]
    fn test_topic_key_expr() {
        assert_eq!(topic_key_expr("t", "/key").unwrap(), "key");
        assert_eq!(topic_key_expr("t", "/vesc/drive/").unwrap(), "vesc/drive");
        assert_eq!(topic_key_expr("t", "drive").unwrap(), "drive");
        assert!(topic_key_expr("t", " ").is_err());
    }
}
