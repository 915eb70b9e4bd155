//! Teleoperator configuration – reads/writes `~/.telegrip/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use telegrip_types::{LogLevel, TeleopError};

use crate::subsystem::{FollowerPorts, SubsystemConfig};

/// Left follower port used when `left_arm_port` is not configured.
pub const FALLBACK_LEFT_ARM_PORT: &str = "/dev/ttySO100red";

/// Options of the telegrip VR / keyboard teleoperator for SO100 arms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegripConfig {
    /// Control both arms; action keys gain `left_` / `right_` prefixes.
    #[serde(default)]
    pub bimanual: bool,

    /// Serial port of the left arm.  Falls back to
    /// [`FALLBACK_LEFT_ARM_PORT`] when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_arm_port: Option<String>,

    #[serde(default = "default_right_arm_port")]
    pub right_arm_port: String,

    /// HTTPS port of the subsystem's web interface.
    #[serde(default = "default_https_port")]
    pub https_port: u16,

    /// WebSocket port for the VR controllers.
    #[serde(default = "default_websocket_port")]
    pub websocket_port: u16,

    #[serde(default = "default_host_ip")]
    pub host_ip: String,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Engage the follower motors as part of `connect`.
    #[serde(default)]
    pub autoconnect: bool,

    #[serde(default = "enabled")]
    pub enable_robot: bool,
    #[serde(default = "enabled")]
    pub enable_pybullet: bool,
    #[serde(default = "enabled")]
    pub enable_pybullet_gui: bool,
    #[serde(default = "enabled")]
    pub enable_vr: bool,
    #[serde(default = "enabled")]
    pub enable_keyboard: bool,
}

fn default_right_arm_port() -> String {
    "/dev/ttyACM0".to_string()
}
fn default_https_port() -> u16 {
    8443
}
fn default_websocket_port() -> u16 {
    8442
}
fn default_host_ip() -> String {
    "0.0.0.0".to_string()
}
fn enabled() -> bool {
    true
}

impl Default for TelegripConfig {
    fn default() -> Self {
        Self {
            bimanual: false,
            left_arm_port: None,
            right_arm_port: default_right_arm_port(),
            https_port: default_https_port(),
            websocket_port: default_websocket_port(),
            host_ip: default_host_ip(),
            log_level: LogLevel::default(),
            autoconnect: false,
            enable_robot: true,
            enable_pybullet: true,
            enable_pybullet_gui: true,
            enable_vr: true,
            enable_keyboard: true,
        }
    }
}

impl TelegripConfig {
    /// Configuration handed to the control subsystem on connect.
    pub fn subsystem_config(&self) -> SubsystemConfig {
        SubsystemConfig {
            follower_ports: FollowerPorts {
                left: self
                    .left_arm_port
                    .clone()
                    .unwrap_or_else(|| FALLBACK_LEFT_ARM_PORT.to_string()),
                right: self.right_arm_port.clone(),
            },
            enable_robot: self.enable_robot,
            enable_pybullet: self.enable_pybullet,
            enable_pybullet_gui: self.enable_pybullet_gui,
            enable_vr: self.enable_vr,
            enable_keyboard: self.enable_keyboard,
            autoconnect: self.autoconnect,
            log_level: self.log_level,
            https_port: self.https_port,
            websocket_port: self.websocket_port,
            host_ip: self.host_ip.clone(),
        }
    }
}

/// Return the path to `~/.telegrip/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".telegrip").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<TelegripConfig>, TeleopError> {
    load_from(&config_path())
}

/// Load the config from a specific path and apply environment overrides.
pub fn load_from(path: &Path) -> Result<Option<TelegripConfig>, TeleopError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        TeleopError::Config(format!("failed to read config at {}: {e}", path.display()))
    })?;
    let mut cfg: TelegripConfig = toml::from_str(&raw)
        .map_err(|e| TeleopError::Config(format!("failed to parse config: {e}")))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `TELEGRIP_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `TELEGRIP_BIMANUAL` | `bimanual` |
/// | `TELEGRIP_LEFT_ARM_PORT` | `left_arm_port` |
/// | `TELEGRIP_RIGHT_ARM_PORT` | `right_arm_port` |
/// | `TELEGRIP_HTTPS_PORT` | `https_port` |
/// | `TELEGRIP_WEBSOCKET_PORT` | `websocket_port` |
/// | `TELEGRIP_HOST_IP` | `host_ip` |
/// | `TELEGRIP_LOG_LEVEL` | `log_level` |
/// | `TELEGRIP_AUTOCONNECT` | `autoconnect` |
///
/// Values that do not parse are ignored.
pub fn apply_env_overrides(cfg: &mut TelegripConfig) {
    apply_overrides_from(cfg, |name| std::env::var(name).ok());
}

/// [`apply_env_overrides`] with the variables read through `lookup`.
pub fn apply_overrides_from(cfg: &mut TelegripConfig, lookup: impl Fn(&str) -> Option<String>) {
    let parse = |name: &str| lookup(name).map(|v| v.trim().to_string());

    if let Some(v) = parse("TELEGRIP_BIMANUAL").and_then(|v| v.parse().ok()) {
        cfg.bimanual = v;
    }
    if let Some(v) = lookup("TELEGRIP_LEFT_ARM_PORT") {
        cfg.left_arm_port = Some(v);
    }
    if let Some(v) = lookup("TELEGRIP_RIGHT_ARM_PORT") {
        cfg.right_arm_port = v;
    }
    if let Some(port) = parse("TELEGRIP_HTTPS_PORT").and_then(|v| v.parse().ok()) {
        cfg.https_port = port;
    }
    if let Some(port) = parse("TELEGRIP_WEBSOCKET_PORT").and_then(|v| v.parse().ok()) {
        cfg.websocket_port = port;
    }
    if let Some(v) = lookup("TELEGRIP_HOST_IP") {
        cfg.host_ip = v;
    }
    if let Some(level) = parse("TELEGRIP_LOG_LEVEL").and_then(|v| v.parse::<LogLevel>().ok()) {
        cfg.log_level = level;
    }
    if let Some(v) = parse("TELEGRIP_AUTOCONNECT").and_then(|v| v.parse().ok()) {
        cfg.autoconnect = v;
    }
}

/// Save the config to a specific path, creating the parent directory.
pub fn save_to(cfg: &TelegripConfig, path: &Path) -> Result<(), TeleopError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TeleopError::Config(format!("failed to create config directory: {e}"))
        })?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| TeleopError::Config(format!("failed to serialize config: {e}")))?;
    fs::write(path, raw).map_err(|e| {
        TeleopError::Config(format!("failed to write config at {}: {e}", path.display()))
    })
}
