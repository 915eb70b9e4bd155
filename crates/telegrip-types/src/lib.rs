//! `telegrip-types` – shared vocabulary for the telegrip teleoperator.
//!
//! Everything that crosses the boundary between the recording framework, the
//! adapter and the control subsystem lives here: the error type, the action
//! and event records, arm sides and the raw VR event shape.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// One arm of an SO100 pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmSide {
    Left,
    Right,
}

impl ArmSide {
    /// Name used by the control subsystem when addressing this arm.
    pub fn as_str(self) -> &'static str {
        match self {
            ArmSide::Left => "left",
            ArmSide::Right => "right",
        }
    }

    /// Prefix applied to action keys in bimanual mode.
    pub fn key_prefix(self) -> &'static str {
        match self {
            ArmSide::Left => "left_",
            ArmSide::Right => "right_",
        }
    }
}

impl fmt::Display for ArmSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type advertised for a feature key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Float,
}

/// Ordered mapping from motor-position key to joint angle.
///
/// Keys keep their insertion order, so a bimanual record always lists the
/// left arm before the right one, each in motor order.  Serialises as a JSON
/// object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionRecord {
    entries: Vec<(String, f64)>,
}

impl ActionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, overwriting an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ActionRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut record = ActionRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl Serialize for ActionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Raw event record emitted by the control subsystem's VR channel, e.g.
/// `{"type": "button_a", "hand": "right"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrEvent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Any other fields the subsystem attached to the event.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VrEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            extra: serde_json::Map::new(),
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }
}

/// Episode-control signals understood by the recording framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeleopEvent {
    Success,
    Failure,
    RerecordEpisode,
    IsIntervention,
    TerminateEpisode,
}

impl TeleopEvent {
    pub const ALL: [TeleopEvent; 5] = [
        TeleopEvent::Success,
        TeleopEvent::Failure,
        TeleopEvent::RerecordEpisode,
        TeleopEvent::IsIntervention,
        TeleopEvent::TerminateEpisode,
    ];

    /// Key used by the recording framework for this signal.
    pub fn as_str(self) -> &'static str {
        match self {
            TeleopEvent::Success => "success",
            TeleopEvent::Failure => "failure",
            TeleopEvent::RerecordEpisode => "rerecord_episode",
            TeleopEvent::IsIntervention => "is_intervention",
            TeleopEvent::TerminateEpisode => "terminate_episode",
        }
    }

    /// Signals raised by a raw VR event of type `kind`.  Unknown types raise
    /// nothing.
    pub fn raised_by(kind: &str) -> &'static [TeleopEvent] {
        match kind {
            "button_a" => &[TeleopEvent::Success, TeleopEvent::TerminateEpisode],
            "button_b" => &[TeleopEvent::RerecordEpisode, TeleopEvent::TerminateEpisode],
            _ => &[],
        }
    }
}

/// Folded episode-control signals for one poll.
///
/// Folding is a union: later events can only raise flags, never clear them,
/// so the result does not depend on event order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleopEventFlags {
    pub success: bool,
    pub failure: bool,
    pub rerecord_episode: bool,
    pub is_intervention: bool,
    pub terminate_episode: bool,
}

impl TeleopEventFlags {
    pub fn get(&self, event: TeleopEvent) -> bool {
        match event {
            TeleopEvent::Success => self.success,
            TeleopEvent::Failure => self.failure,
            TeleopEvent::RerecordEpisode => self.rerecord_episode,
            TeleopEvent::IsIntervention => self.is_intervention,
            TeleopEvent::TerminateEpisode => self.terminate_episode,
        }
    }

    pub fn raise(&mut self, event: TeleopEvent) {
        match event {
            TeleopEvent::Success => self.success = true,
            TeleopEvent::Failure => self.failure = true,
            TeleopEvent::RerecordEpisode => self.rerecord_episode = true,
            TeleopEvent::IsIntervention => self.is_intervention = true,
            TeleopEvent::TerminateEpisode => self.terminate_episode = true,
        }
    }

    /// Fold a single raw event in and return the signals it raised.
    pub fn apply(&mut self, event: &VrEvent) -> &'static [TeleopEvent] {
        let raised = event.kind().map_or(&[][..], TeleopEvent::raised_by);
        for signal in raised {
            self.raise(*signal);
        }
        raised
    }

    /// Fold a batch of raw events into a fresh set of flags.
    pub fn fold<'a>(events: impl IntoIterator<Item = &'a VrEvent>) -> Self {
        let mut flags = Self::default();
        for event in events {
            flags.apply(event);
        }
        flags
    }

    pub fn any(&self) -> bool {
        TeleopEvent::ALL.iter().any(|e| self.get(*e))
    }

    /// The five signals keyed by their framework names.
    pub fn to_map(&self) -> BTreeMap<&'static str, bool> {
        TeleopEvent::ALL
            .iter()
            .map(|e| (e.as_str(), self.get(*e)))
            .collect()
    }
}

/// Verbosity handed to the control subsystem and used as the default log
/// filter by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    #[serde(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }

    /// Equivalent `tracing` filter directive.
    pub fn tracing_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = TeleopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            other => Err(TeleopError::Config(format!("unknown log level '{other}'"))),
        }
    }
}

/// Errors surfaced by the teleoperator contract.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TeleopError {
    #[error("{0} is already connected")]
    AlreadyConnected(String),

    #[error("{0} is not connected")]
    NotConnected(String),

    /// Failure raised by the control subsystem, passed through unchanged.
    #[error("Control subsystem error: {0}")]
    Subsystem(String),

    #[error("Background worker error: {0}")]
    Worker(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
