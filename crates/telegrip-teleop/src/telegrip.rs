//! [`TelegripTeleoperator`] – VR / keyboard leader input for SO100 arms.
//!
//! Bridges the [`Teleoperator`] contract to an externally owned
//! [`ControlSubsystem`].  The subsystem runs on a dedicated
//! [`SubsystemWorker`] for the whole connected lifetime; the adapter polls it
//! for joint angles and VR button events and translates both into the
//! recording framework's action and event records.
//!
//! # Lifecycle
//!
//! ```text
//! Disconnected ──connect()──▶ Connected ──disconnect()──▶ Disconnected
//! ```
//!
//! Connected means a session installed by a completed `connect` whose
//! subsystem still reports itself running.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use telegrip_types::{ActionRecord, FeatureKind, TeleopError, TeleopEventFlags, VrEvent};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::TelegripConfig;
use crate::features::{action_features, action_key, polled_sides, MOTOR_NAMES};
use crate::readiness::{FixedDelay, ReadinessStrategy};
use crate::subsystem::{ControlSubsystem, RobotInterface, SubsystemFactory};
use crate::teleoperator::Teleoperator;
use crate::worker::{StartupSignal, StartupStatus, SubsystemWorker};

/// Registry name of this teleoperator.
pub const TELEOPERATOR_NAME: &str = "telegrip";

/// Bounds on the two waits performed while tearing a session down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownTimeouts {
    /// Wait for the subsystem's `stop()` to complete.
    pub stop: Duration,
    /// Wait for the worker thread to exit after its loop is stopped.
    pub join: Duration,
}

impl Default for ShutdownTimeouts {
    fn default() -> Self {
        Self {
            stop: Duration::from_secs(5),
            join: Duration::from_secs(5),
        }
    }
}

struct Session {
    id: Uuid,
    subsystem: Arc<dyn ControlSubsystem>,
    worker: SubsystemWorker,
}

/// Telegrip teleoperator.
///
/// Construct with [`TelegripTeleoperator::new`], optionally swap the
/// readiness strategy or shutdown timeouts, then drive it through the
/// [`Teleoperator`] trait.
pub struct TelegripTeleoperator {
    config: TelegripConfig,
    factory: SubsystemFactory,
    readiness: Box<dyn ReadinessStrategy>,
    timeouts: ShutdownTimeouts,
    session: Option<Session>,
    last_action: Option<ActionRecord>,
}

impl TelegripTeleoperator {
    /// Create a disconnected teleoperator.  `factory` builds the control
    /// subsystem on every `connect`.
    pub fn new(config: TelegripConfig, factory: SubsystemFactory) -> Self {
        Self {
            config,
            factory,
            readiness: Box::new(FixedDelay::default()),
            timeouts: ShutdownTimeouts::default(),
            session: None,
            last_action: None,
        }
    }

    pub fn with_readiness(mut self, readiness: impl ReadinessStrategy + 'static) -> Self {
        self.readiness = Box::new(readiness);
        self
    }

    pub fn with_shutdown_timeouts(mut self, timeouts: ShutdownTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn config(&self) -> &TelegripConfig {
        &self.config
    }

    /// Most recent record returned by `get_action`.
    pub fn last_action(&self) -> Option<&ActionRecord> {
        self.last_action.as_ref()
    }

    /// Identifier of the current session, used to correlate log lines.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id)
    }

    fn start_session(&self) -> Result<Session, TeleopError> {
        let subsystem = (self.factory)(&self.config.subsystem_config())?;
        let (worker, mut startup) =
            SubsystemWorker::spawn(TELEOPERATOR_NAME, Arc::clone(&subsystem))?;
        let session = Session {
            id: Uuid::new_v4(),
            subsystem,
            worker,
        };

        if let Err(e) = self.bring_up(&session, &mut startup) {
            // A start still in flight is stopped by the worker if it succeeds.
            let started = startup.poll() == StartupStatus::Started;
            teardown(session, self.timeouts, started);
            return Err(e);
        }
        Ok(session)
    }

    fn bring_up(&self, session: &Session, startup: &mut StartupSignal) -> Result<(), TeleopError> {
        self.readiness.wait_until_ready(startup)?;

        if self.config.autoconnect && self.config.enable_robot {
            info!(session = %session.id, "auto-engaging follower motors");
            self.readiness.wait_before_engage();
            if let Some(robot) = session.subsystem.robot_interface() {
                robot.engage()?;
            }
        }
        Ok(())
    }

    fn drain_vr_events(&self) -> Vec<VrEvent> {
        let Some(session) = &self.session else {
            warn!("no control subsystem; no VR events to pull");
            return Vec::new();
        };
        if !session.subsystem.is_running() {
            warn!(session = %session.id, "control subsystem not running; no VR events to pull");
            return Vec::new();
        }
        session.subsystem.drain_vr_events().unwrap_or_else(|e| {
            warn!(session = %session.id, error = %e, "failed to pull VR events");
            Vec::new()
        })
    }
}

/// Read every polled arm into one action record.
fn read_arms(robot: &dyn RobotInterface, bimanual: bool) -> Result<ActionRecord, TeleopError> {
    let mut record = ActionRecord::new();
    for &side in polled_sides(bimanual) {
        let angles = robot.get_arm_angles(side)?;
        if angles.len() != MOTOR_NAMES.len() {
            return Err(TeleopError::Subsystem(format!(
                "expected {} joint angles for the {side} arm, got {}",
                MOTOR_NAMES.len(),
                angles.len()
            )));
        }
        for (motor, angle) in MOTOR_NAMES.iter().zip(angles) {
            record.insert(action_key(bimanual, side, motor), angle);
        }
    }
    Ok(record)
}

/// Stop the subsystem on its loop, then stop the loop.  Both waits are
/// bounded and failures only log.
fn teardown(session: Session, timeouts: ShutdownTimeouts, stop_subsystem: bool) {
    let Session { id, worker, .. } = session;

    if stop_subsystem && worker.is_alive() {
        match worker.stop_subsystem(timeouts.stop) {
            Ok(Ok(())) => debug!(session = %id, "control subsystem stopped"),
            Ok(Err(e)) => warn!(session = %id, error = %e, "control subsystem failed to stop cleanly"),
            Err(e) => warn!(session = %id, error = %e, "timed out stopping control subsystem"),
        }
    }

    if let Err(e) = worker.shutdown(timeouts.join) {
        warn!(session = %id, error = %e, "event loop thread did not shut down cleanly");
    }
}

impl Teleoperator for TelegripTeleoperator {
    fn name(&self) -> &str {
        TELEOPERATOR_NAME
    }

    fn action_features(&self) -> BTreeMap<String, FeatureKind> {
        action_features(self.config.bimanual)
    }

    /// No haptics: nothing can be fed back.
    fn feedback_features(&self) -> BTreeMap<String, FeatureKind> {
        BTreeMap::new()
    }

    fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.subsystem.is_running())
    }

    fn connect(&mut self, _calibrate: bool) -> Result<(), TeleopError> {
        if self.is_connected() {
            return Err(TeleopError::AlreadyConnected(self.name().to_string()));
        }
        if let Some(stale) = self.session.take() {
            warn!(session = %stale.id, "discarding session whose subsystem stopped running");
            teardown(stale, self.timeouts, true);
        }

        info!(bimanual = self.config.bimanual, "starting telegrip control subsystem");
        match self.start_session() {
            Ok(session) => {
                info!(session = %session.id, "telegrip connected");
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to connect telegrip");
                Err(e)
            }
        }
    }

    fn is_calibrated(&self) -> bool {
        true
    }

    fn calibrate(&mut self) -> Result<(), TeleopError> {
        Ok(())
    }

    fn configure(&mut self) -> Result<(), TeleopError> {
        Ok(())
    }

    fn get_action(&mut self) -> Result<ActionRecord, TeleopError> {
        let Some(session) = self.session.as_ref().filter(|s| s.subsystem.is_running()) else {
            return Err(TeleopError::NotConnected(self.name().to_string()));
        };

        let record = match session.subsystem.robot_interface() {
            Some(robot) => read_arms(robot.as_ref(), self.config.bimanual).inspect_err(|e| {
                error!(session = %session.id, error = %e, "failed to read arm angles");
            })?,
            None => {
                warn!(session = %session.id, "robot interface not available; returning empty action");
                ActionRecord::new()
            }
        };

        self.last_action = Some(record.clone());
        Ok(record)
    }

    fn get_teleop_events(&mut self) -> TeleopEventFlags {
        let mut flags = TeleopEventFlags::default();
        for event in self.drain_vr_events() {
            let raised = flags.apply(&event);
            if !raised.is_empty() {
                info!(
                    kind = event.kind().unwrap_or_default(),
                    signals = ?raised.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
                    "VR button raised episode signals"
                );
            }
        }
        flags
    }

    fn send_feedback(&mut self, _feedback: &BTreeMap<String, f64>) -> Result<(), TeleopError> {
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), TeleopError> {
        if !self.is_connected() {
            if let Some(stale) = self.session.take() {
                teardown(stale, self.timeouts, true);
            }
            return Err(TeleopError::NotConnected(self.name().to_string()));
        }

        info!("stopping telegrip control subsystem");
        if let Some(session) = self.session.take() {
            let id = session.id;
            teardown(session, self.timeouts, true);
            info!(session = %id, "telegrip disconnected");
        }
        Ok(())
    }
}

impl Drop for TelegripTeleoperator {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            teardown(session, self.timeouts, true);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FALLBACK_LEFT_ARM_PORT;
    use crate::readiness::StartSignal;
    use crate::sim::{SimSubsystem, SimSubsystemBuilder};
    use std::time::Instant;
    use telegrip_types::ArmSide;

    fn quick(config: TelegripConfig, sim: &Arc<SimSubsystem>) -> TelegripTeleoperator {
        TelegripTeleoperator::new(config, sim.factory())
            .with_readiness(StartSignal::new(Duration::from_secs(5)))
            .with_shutdown_timeouts(ShutdownTimeouts {
                stop: Duration::from_millis(200),
                join: Duration::from_secs(2),
            })
    }

    fn connected(builder: SimSubsystemBuilder, bimanual: bool) -> (Arc<SimSubsystem>, TelegripTeleoperator) {
        let sim = builder.build();
        let mut teleop = quick(
            TelegripConfig {
                bimanual,
                ..Default::default()
            },
            &sim,
        );
        teleop.connect(true).expect("connect");
        (sim, teleop)
    }

    fn ramp(from: f64) -> Vec<f64> {
        (0..6).map(|i| from + i as f64).collect()
    }

    // ------------------------------------------------------------------
    // Feature discovery & no-op surface
    // ------------------------------------------------------------------

    #[test]
    fn features_follow_bimanual_flag() {
        let sim = SimSubsystem::builder().build();
        let single = quick(TelegripConfig::default(), &sim);
        assert_eq!(single.action_features().len(), 6);
        assert!(single.action_features().contains_key("gripper.pos"));

        let both = quick(
            TelegripConfig {
                bimanual: true,
                ..Default::default()
            },
            &sim,
        );
        assert_eq!(both.action_features().len(), 12);
        assert!(both.feedback_features().is_empty());
    }

    #[test]
    fn calibration_and_feedback_are_noops() {
        let sim = SimSubsystem::builder().build();
        let mut teleop = quick(TelegripConfig::default(), &sim);
        assert!(teleop.is_calibrated());
        teleop.calibrate().unwrap();
        teleop.configure().unwrap();
        teleop
            .send_feedback(&BTreeMap::from([("gripper.pos".to_string(), 1.0)]))
            .unwrap();
        assert_eq!(teleop.name(), "telegrip");
        assert!(!teleop.is_connected());
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    #[test]
    fn connect_starts_subsystem_with_fallback_left_port() {
        let (sim, teleop) = connected(SimSubsystem::builder(), false);
        assert!(teleop.is_connected());
        assert!(teleop.session_id().is_some());
        assert_eq!(sim.start_count(), 1);

        let cfg = sim.last_config().expect("factory called");
        assert_eq!(cfg.follower_ports.left, FALLBACK_LEFT_ARM_PORT);
        assert_eq!(cfg.follower_ports.right, "/dev/ttyACM0");
    }

    #[test]
    fn subsystem_event_loop_runs_while_connected() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), false);
        let deadline = Instant::now() + Duration::from_secs(2);
        while sim.heartbeats() < 3 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(sim.heartbeats() >= 3, "heartbeat task must run on the worker loop");

        teleop.disconnect().unwrap();
        let after = sim.heartbeats();
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(sim.heartbeats(), after, "heartbeat must stop with the loop");
    }

    #[test]
    fn connect_twice_fails_and_keeps_state() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), false);
        let session = teleop.session_id();

        let err = teleop.connect(true).unwrap_err();
        assert_eq!(err, TeleopError::AlreadyConnected("telegrip".to_string()));
        assert!(teleop.is_connected());
        assert_eq!(teleop.session_id(), session);
        assert_eq!(sim.start_count(), 1);
    }

    #[test]
    fn disconnect_stops_subsystem() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), false);
        teleop.disconnect().unwrap();
        assert!(!teleop.is_connected());
        assert!(teleop.session_id().is_none());
        assert_eq!(sim.stop_count(), 1);
        assert!(!sim.is_running());
    }

    #[test]
    fn disconnect_when_disconnected_fails() {
        let sim = SimSubsystem::builder().build();
        let mut teleop = quick(TelegripConfig::default(), &sim);
        assert_eq!(
            teleop.disconnect(),
            Err(TeleopError::NotConnected("telegrip".to_string()))
        );
    }

    #[test]
    fn disconnect_survives_failing_stop() {
        let (_sim, mut teleop) = connected(SimSubsystem::builder().failing_stop("bus fault"), false);
        teleop.disconnect().expect("stop failure is only logged");
        assert!(!teleop.is_connected());
        assert!(teleop.session_id().is_none());
    }

    #[test]
    fn disconnect_survives_hanging_stop() {
        let (sim, mut teleop) = connected(SimSubsystem::builder().hanging_stop(), false);
        let t0 = Instant::now();
        teleop.disconnect().expect("stop timeout is only logged");
        assert!(t0.elapsed() < Duration::from_secs(3));
        assert!(!teleop.is_connected());
        assert!(teleop.session_id().is_none());
        assert_eq!(sim.stop_count(), 1);
    }

    #[test]
    fn reconnect_after_disconnect() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), false);
        teleop.disconnect().unwrap();
        teleop.connect(false).unwrap();
        assert!(teleop.is_connected());
        assert_eq!(sim.start_count(), 2);
        teleop.disconnect().unwrap();
    }

    #[test]
    fn failed_start_leaves_adapter_disconnected() {
        let sim = SimSubsystem::builder().failing_start("no follower on port").build();
        let mut teleop = quick(TelegripConfig::default(), &sim);

        let err = teleop.connect(true).unwrap_err();
        assert_eq!(err, TeleopError::Subsystem("no follower on port".to_string()));
        assert!(!teleop.is_connected());
        assert!(teleop.session_id().is_none());
        assert_eq!(sim.stop_count(), 0, "a subsystem that never started is not stopped");
    }

    #[test]
    fn failed_engage_stops_started_subsystem() {
        let sim = SimSubsystem::builder().failing_engage("torque fault").build();
        let mut teleop = quick(
            TelegripConfig {
                autoconnect: true,
                ..Default::default()
            },
            &sim,
        );

        let err = teleop.connect(true).unwrap_err();
        assert_eq!(err, TeleopError::Subsystem("torque fault".to_string()));
        assert!(!teleop.is_connected());
        assert!(teleop.session_id().is_none());
        assert_eq!(sim.stop_count(), 1);
        assert!(!sim.is_running());
    }

    #[test]
    fn start_timeout_does_not_leave_subsystem_running() {
        let sim = SimSubsystem::builder()
            .slow_start(Duration::from_millis(300))
            .build();
        let mut teleop = TelegripTeleoperator::new(TelegripConfig::default(), sim.factory())
            .with_readiness(StartSignal::new(Duration::from_millis(50)))
            .with_shutdown_timeouts(ShutdownTimeouts {
                stop: Duration::from_millis(200),
                join: Duration::from_millis(100),
            });

        let err = teleop.connect(true).unwrap_err();
        assert!(matches!(err, TeleopError::Timeout(_)));
        assert!(teleop.session_id().is_none());

        // start() completes on the detached loop, which then stops it.
        let deadline = Instant::now() + Duration::from_secs(5);
        while sim.stop_count() == 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(sim.start_count(), 1);
        assert_eq!(sim.stop_count(), 1);
        assert!(!sim.is_running());
        assert!(!teleop.is_connected());
    }

    #[test]
    fn factory_failure_propagates() {
        let factory: SubsystemFactory = Arc::new(
            |_: &crate::subsystem::SubsystemConfig| -> Result<Arc<dyn ControlSubsystem>, TeleopError> {
                Err(TeleopError::Subsystem("telegrip not installed".to_string()))
            },
        );
        let mut teleop = TelegripTeleoperator::new(TelegripConfig::default(), factory)
            .with_readiness(StartSignal::new(Duration::from_secs(1)));

        let err = teleop.connect(true).unwrap_err();
        assert!(err.to_string().contains("telegrip not installed"));
        assert!(!teleop.is_connected());
    }

    #[test]
    fn autoconnect_engages_motors() {
        let sim = SimSubsystem::builder().build();
        let mut teleop = quick(
            TelegripConfig {
                autoconnect: true,
                ..Default::default()
            },
            &sim,
        );
        teleop.connect(true).unwrap();
        assert_eq!(sim.robot().unwrap().engage_count(), 1);
    }

    #[test]
    fn autoconnect_without_robot_hardware_skips_engage() {
        let sim = SimSubsystem::builder().build();
        let mut teleop = quick(
            TelegripConfig {
                autoconnect: true,
                enable_robot: false,
                ..Default::default()
            },
            &sim,
        );
        teleop.connect(true).unwrap();
        assert_eq!(sim.robot().unwrap().engage_count(), 0);
    }

    #[test]
    fn stale_session_is_replaced_on_connect() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), false);

        // The subsystem shuts itself down behind the adapter's back.
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(sim.stop()).unwrap();
        assert!(!teleop.is_connected());

        teleop.connect(true).expect("stale session must not block reconnect");
        assert!(teleop.is_connected());
        assert_eq!(sim.start_count(), 2);
    }

    #[test]
    fn drop_tears_down_live_session() {
        let (sim, teleop) = connected(SimSubsystem::builder(), false);
        drop(teleop);
        assert_eq!(sim.stop_count(), 1);
        assert!(!sim.is_running());
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    #[test]
    fn get_action_requires_connection() {
        let sim = SimSubsystem::builder().build();
        let mut teleop = quick(TelegripConfig::default(), &sim);
        assert_eq!(
            teleop.get_action(),
            Err(TeleopError::NotConnected("telegrip".to_string()))
        );
    }

    #[test]
    fn bimanual_action_maps_left_then_right() {
        let (_sim, mut teleop) = connected(
            SimSubsystem::builder()
                .with_angles(ArmSide::Left, ramp(1.0))
                .with_angles(ArmSide::Right, ramp(7.0)),
            true,
        );

        let action = teleop.get_action().unwrap();
        assert_eq!(action.len(), 12);
        assert_eq!(action.get("left_shoulder_pan.pos"), Some(1.0));
        assert_eq!(action.get("left_gripper.pos"), Some(6.0));
        assert_eq!(action.get("right_shoulder_pan.pos"), Some(7.0));
        assert_eq!(action.get("right_gripper.pos"), Some(12.0));

        let keys: Vec<&str> = action.keys().collect();
        let expected = crate::features::action_keys(true);
        assert_eq!(keys, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(teleop.last_action(), Some(&action));
    }

    #[test]
    fn single_arm_action_reads_right_arm() {
        let (_sim, mut teleop) = connected(
            SimSubsystem::builder()
                .with_angles(ArmSide::Left, ramp(100.0))
                .with_angles(ArmSide::Right, ramp(7.0)),
            false,
        );
        let action = teleop.get_action().unwrap();
        assert_eq!(action.len(), 6);
        assert_eq!(action.get("shoulder_pan.pos"), Some(7.0));
        assert_eq!(action.get("gripper.pos"), Some(12.0));
    }

    #[test]
    fn action_key_set_is_stable_across_polls() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), true);
        let first: Vec<String> = teleop.get_action().unwrap().keys().map(str::to_string).collect();
        sim.robot().unwrap().set_angles(ArmSide::Left, ramp(3.0));
        let second: Vec<String> = teleop.get_action().unwrap().keys().map(str::to_string).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_robot_interface_yields_empty_action() {
        let (_sim, mut teleop) = connected(SimSubsystem::builder().without_robot(), false);
        let action = teleop.get_action().expect("missing robot is not an error");
        assert!(action.is_empty());
    }

    #[test]
    fn angle_query_failure_is_passed_through() {
        let (_sim, mut teleop) =
            connected(SimSubsystem::builder().failing_angles("read timeout"), false);
        assert_eq!(
            teleop.get_action(),
            Err(TeleopError::Subsystem("read timeout".to_string()))
        );
        assert!(teleop.last_action().is_none());
        assert!(teleop.is_connected());
    }

    #[test]
    fn short_angle_vector_is_rejected() {
        let (_sim, mut teleop) = connected(
            SimSubsystem::builder().with_angles(ArmSide::Right, vec![1.0, 2.0]),
            false,
        );
        let err = teleop.get_action().unwrap_err();
        assert!(matches!(err, TeleopError::Subsystem(ref m) if m.contains("got 2")));
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    #[test]
    fn events_without_subsystem_are_all_false() {
        let sim = SimSubsystem::builder().build();
        let mut teleop = quick(TelegripConfig::default(), &sim);
        assert_eq!(teleop.get_teleop_events(), TeleopEventFlags::default());
    }

    #[test]
    fn button_events_are_folded_and_drained() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), false);
        sim.push_vr_event(VrEvent::new("button_a"));
        sim.push_vr_event(VrEvent::new("thumbstick"));

        let flags = teleop.get_teleop_events();
        assert!(flags.success && flags.terminate_episode);
        assert!(!flags.rerecord_episode && !flags.failure && !flags.is_intervention);

        // Drained: the next poll starts from scratch.
        assert!(!teleop.get_teleop_events().any());

        sim.push_vr_event(VrEvent::new("button_b"));
        let flags = teleop.get_teleop_events();
        assert!(flags.rerecord_episode && flags.terminate_episode && !flags.success);
    }

    #[test]
    fn failing_event_pull_yields_all_false() {
        let (_sim, mut teleop) = connected(SimSubsystem::builder().failing_vr("socket closed"), false);
        assert_eq!(teleop.get_teleop_events(), TeleopEventFlags::default());
    }

    #[test]
    fn events_after_disconnect_are_all_false() {
        let (sim, mut teleop) = connected(SimSubsystem::builder(), false);
        teleop.disconnect().unwrap();
        sim.push_vr_event(VrEvent::new("button_a"));
        assert_eq!(teleop.get_teleop_events(), TeleopEventFlags::default());
    }
}
