//! `telegrip-teleop` – VR / keyboard teleoperator for SO100 arms
//!
//! Lets a recording framework use the telegrip control system as a leader
//! device.  The control system itself (control loop, simulation, VR
//! transport) stays external; this crate only starts it, polls it and shuts
//! it down.
//!
//! # Modules
//!
//! - [`teleoperator`] – the [`Teleoperator`] contract the recording framework
//!   drives.
//! - [`subsystem`] – [`ControlSubsystem`] / [`RobotInterface`] seams towards
//!   the external control system.
//! - [`config`] – [`TelegripConfig`], loaded from `~/.telegrip/config.toml`
//!   with `TELEGRIP_*` overrides.
//! - [`worker`] – [`SubsystemWorker`]: dedicated thread owning the control
//!   system's event loop.
//! - [`readiness`] – strategies deciding when a freshly started control
//!   system may be polled.
//! - [`features`] – SO100 motor list and action-key derivation.
//! - [`telegrip`] – [`TelegripTeleoperator`], the adapter itself.
//! - [`sim`] – [`SimSubsystem`]: in-process control system for headless runs.

pub mod config;
pub mod features;
pub mod readiness;
pub mod sim;
pub mod subsystem;
pub mod telegrip;
pub mod teleoperator;
pub mod worker;

pub use config::{TelegripConfig, FALLBACK_LEFT_ARM_PORT};
pub use features::MOTOR_NAMES;
pub use readiness::{FixedDelay, ReadinessStrategy, StartSignal};
pub use sim::{SimRobot, SimSubsystem, SimSubsystemBuilder};
pub use subsystem::{ControlSubsystem, FollowerPorts, RobotInterface, SubsystemConfig, SubsystemFactory};
pub use telegrip::{ShutdownTimeouts, TelegripTeleoperator, TELEOPERATOR_NAME};
pub use teleoperator::Teleoperator;
pub use worker::{StartupSignal, StartupStatus, SubsystemWorker};
