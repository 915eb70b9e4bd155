//! The `Teleoperator` contract every leader-input device implements for the
//! recording framework.
//!
//! The recording loop only ever talks to this trait, so a VR rig, a leader
//! arm or a gamepad can be swapped without touching the recording logic.

use std::collections::BTreeMap;

use telegrip_types::{ActionRecord, FeatureKind, TeleopError, TeleopEventFlags};

/// Lifecycle and polling surface of a leader-input device.
///
/// # Contract
///
/// * `connect` / `disconnect` move the device between the Disconnected and
///   Connected states.  `connect` on a connected device fails with
///   [`TeleopError::AlreadyConnected`]; `disconnect` on a disconnected one
///   fails with [`TeleopError::NotConnected`].
/// * `get_action` requires a connected device.
/// * `get_teleop_events` never fails; devices without an event channel
///   return all-false flags.
/// * Feature discovery and calibration queries are state-independent.
pub trait Teleoperator: Send {
    /// Registry name of this teleoperator, e.g. `"telegrip"`.
    fn name(&self) -> &str;

    /// Keys and value kinds produced by [`get_action`][Self::get_action].
    fn action_features(&self) -> BTreeMap<String, FeatureKind>;

    /// Keys accepted by [`send_feedback`][Self::send_feedback].
    fn feedback_features(&self) -> BTreeMap<String, FeatureKind>;

    fn is_connected(&self) -> bool;

    /// Bring the device online.
    ///
    /// # Errors
    ///
    /// [`TeleopError::AlreadyConnected`] if already connected, or any failure
    /// raised while starting the device.
    fn connect(&mut self, calibrate: bool) -> Result<(), TeleopError>;

    fn is_calibrated(&self) -> bool;

    fn calibrate(&mut self) -> Result<(), TeleopError>;

    fn configure(&mut self) -> Result<(), TeleopError>;

    /// Read the current leader pose.
    ///
    /// # Errors
    ///
    /// [`TeleopError::NotConnected`] when disconnected, or any failure raised
    /// by the device while reading.
    fn get_action(&mut self) -> Result<ActionRecord, TeleopError>;

    /// Episode-control signals raised since the previous poll.
    fn get_teleop_events(&mut self) -> TeleopEventFlags;

    fn send_feedback(&mut self, feedback: &BTreeMap<String, f64>) -> Result<(), TeleopError>;

    /// Take the device offline.
    ///
    /// # Errors
    ///
    /// [`TeleopError::NotConnected`] when not connected.
    fn disconnect(&mut self) -> Result<(), TeleopError>;
}
