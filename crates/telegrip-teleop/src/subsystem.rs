//! Seams towards the external control subsystem.
//!
//! The control subsystem owns the hardware loop, the simulation, the VR
//! transport and the keyboard listener.  The adapter never reaches into any
//! of that; it only needs the handful of entry points below.
//!
//! # Overview
//!
//! - [`ControlSubsystem`] – lifecycle (`start` / `stop` run on the subsystem's
//!   own event loop), run status, the control loop's robot interface and the
//!   VR event queue.
//! - [`RobotInterface`] – per-arm joint angles and motor engagement.
//! - [`SubsystemConfig`] – construction parameters derived from
//!   [`TelegripConfig`][crate::config::TelegripConfig].
//! - [`SubsystemFactory`] – injectable constructor used by
//!   [`TelegripTeleoperator::connect`][crate::telegrip::TelegripTeleoperator].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use telegrip_types::{ArmSide, LogLevel, TeleopError, VrEvent};

/// Serial device paths of the follower arms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerPorts {
    pub left: String,
    pub right: String,
}

impl FollowerPorts {
    pub fn port(&self, side: ArmSide) -> &str {
        match side {
            ArmSide::Left => &self.left,
            ArmSide::Right => &self.right,
        }
    }
}

/// Configuration object the control subsystem is constructed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsystemConfig {
    pub follower_ports: FollowerPorts,
    pub enable_robot: bool,
    pub enable_pybullet: bool,
    pub enable_pybullet_gui: bool,
    pub enable_vr: bool,
    pub enable_keyboard: bool,
    pub autoconnect: bool,
    pub log_level: LogLevel,
    pub https_port: u16,
    pub websocket_port: u16,
    pub host_ip: String,
}

/// Robot-side handle exposed by the subsystem's control loop.
pub trait RobotInterface: Send + Sync {
    /// Current joint angles of `side`, one per motor in motor order.
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::Subsystem`] if the arm cannot be read.
    fn get_arm_angles(&self, side: ArmSide) -> Result<Vec<f64>, TeleopError>;

    /// Energise the follower motors.
    fn engage(&self) -> Result<(), TeleopError>;
}

/// The external VR / keyboard / robot control system.
///
/// `start` and `stop` are always driven on the subsystem's own event loop
/// (see [`SubsystemWorker`][crate::worker::SubsystemWorker]); tasks spawned
/// from inside them keep running on that loop until it is shut down.  The
/// synchronous accessors may be called from any thread.
#[async_trait]
pub trait ControlSubsystem: Send + Sync {
    async fn start(&self) -> Result<(), TeleopError>;

    async fn stop(&self) -> Result<(), TeleopError>;

    fn is_running(&self) -> bool;

    /// Robot interface of the control loop, if one has been brought up.
    fn robot_interface(&self) -> Option<Arc<dyn RobotInterface>>;

    /// Drain VR events queued since the previous call.
    ///
    /// Subsystems without a VR channel keep the default, which never yields
    /// events.
    fn drain_vr_events(&self) -> Result<Vec<VrEvent>, TeleopError> {
        Ok(Vec::new())
    }
}

/// Builds a control subsystem from its configuration.
pub type SubsystemFactory =
    Arc<dyn Fn(&SubsystemConfig) -> Result<Arc<dyn ControlSubsystem>, TeleopError> + Send + Sync>;
