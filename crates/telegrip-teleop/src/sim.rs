//! In-process control subsystem for headless runs and CI without VR
//! hardware or follower arms.
//!
//! [`SimSubsystem`] behaves like the real control system from the adapter's
//! point of view: `start()` spawns a heartbeat task on the worker's event
//! loop, the robot interface reports per-arm joint angles, and VR button
//! events can be queued from any thread.  Every failure mode the adapter has
//! to survive can be injected through [`SimSubsystemBuilder`].
//!
//! # Example
//!
//! ```rust
//! use telegrip_teleop::sim::SimSubsystem;
//! use telegrip_types::ArmSide;
//!
//! let sim = SimSubsystem::builder()
//!     .with_angles(ArmSide::Right, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0])
//!     .build();
//! let factory = sim.factory();
//! # let _ = factory;
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use telegrip_types::{ArmSide, TeleopError, VrEvent};
use tokio::sync::oneshot;
use tracing::debug;

use crate::features::MOTOR_NAMES;
use crate::subsystem::{ControlSubsystem, RobotInterface, SubsystemConfig, SubsystemFactory};

const HEARTBEAT_PERIOD: Duration = Duration::from_millis(20);

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated robot interface
// ────────────────────────────────────────────────────────────────────────────

/// Simulated follower pair that reports whatever angles it was given.
pub struct SimRobot {
    base: BTreeMap<ArmSide, Vec<f64>>,
    angles: Mutex<BTreeMap<ArmSide, Vec<f64>>>,
    fail_angles: Option<String>,
    fail_engage: Option<String>,
    engaged: AtomicUsize,
}

impl SimRobot {
    fn new(
        base: BTreeMap<ArmSide, Vec<f64>>,
        fail_angles: Option<String>,
        fail_engage: Option<String>,
    ) -> Self {
        Self {
            angles: Mutex::new(base.clone()),
            base,
            fail_angles,
            fail_engage,
            engaged: AtomicUsize::new(0),
        }
    }

    /// Overwrite the angles reported for `side`.
    pub fn set_angles(&self, side: ArmSide, angles: Vec<f64>) {
        lock(&self.angles).insert(side, angles);
    }

    /// Number of `engage()` calls received.
    pub fn engage_count(&self) -> usize {
        self.engaged.load(Ordering::SeqCst)
    }

    // Sweep every joint around its base angle.
    fn animate(&self, tick: u64) {
        let offset = 10.0 * (tick as f64 * 0.05).sin();
        let mut angles = lock(&self.angles);
        for (side, base) in &self.base {
            angles.insert(*side, base.iter().map(|a| a + offset).collect());
        }
    }
}

impl RobotInterface for SimRobot {
    fn get_arm_angles(&self, side: ArmSide) -> Result<Vec<f64>, TeleopError> {
        if let Some(msg) = &self.fail_angles {
            return Err(TeleopError::Subsystem(msg.clone()));
        }
        Ok(lock(&self.angles)
            .get(&side)
            .cloned()
            .unwrap_or_else(|| vec![0.0; MOTOR_NAMES.len()]))
    }

    fn engage(&self) -> Result<(), TeleopError> {
        self.engaged.fetch_add(1, Ordering::SeqCst);
        match &self.fail_engage {
            Some(msg) => Err(TeleopError::Subsystem(msg.clone())),
            None => Ok(()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated control subsystem
// ────────────────────────────────────────────────────────────────────────────

/// Simulated control subsystem.  Build it with [`SimSubsystem::builder`].
pub struct SimSubsystem {
    robot: Option<Arc<SimRobot>>,
    running: AtomicBool,
    vr_events: Mutex<VecDeque<VrEvent>>,
    fail_start: Option<String>,
    start_delay: Option<Duration>,
    fail_stop: Option<String>,
    hang_on_stop: bool,
    fail_vr: Option<String>,
    animate: bool,
    heartbeats: Arc<AtomicU64>,
    heartbeat_stop: Mutex<Option<oneshot::Sender<()>>>,
    starts: AtomicUsize,
    stops: AtomicUsize,
    config: Mutex<Option<SubsystemConfig>>,
}

impl SimSubsystem {
    pub fn builder() -> SimSubsystemBuilder {
        SimSubsystemBuilder::default()
    }

    /// Factory that hands out this instance and records the configuration it
    /// was asked to build with.
    pub fn factory(self: &Arc<Self>) -> SubsystemFactory {
        let sim = Arc::clone(self);
        Arc::new(
            move |cfg: &SubsystemConfig| -> Result<Arc<dyn ControlSubsystem>, TeleopError> {
                *lock(&sim.config) = Some(cfg.clone());
                Ok(Arc::clone(&sim) as Arc<dyn ControlSubsystem>)
            },
        )
    }

    pub fn robot(&self) -> Option<&Arc<SimRobot>> {
        self.robot.as_ref()
    }

    /// Queue a VR event for the next drain.
    pub fn push_vr_event(&self, event: VrEvent) {
        lock(&self.vr_events).push_back(event);
    }

    /// Heartbeat ticks served by the event loop so far.
    pub fn heartbeats(&self) -> u64 {
        self.heartbeats.load(Ordering::SeqCst)
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Configuration passed to the most recent factory call.
    pub fn last_config(&self) -> Option<SubsystemConfig> {
        lock(&self.config).clone()
    }
}

#[async_trait]
impl ControlSubsystem for SimSubsystem {
    async fn start(&self) -> Result<(), TeleopError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.start_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(msg) = &self.fail_start {
            return Err(TeleopError::Subsystem(msg.clone()));
        }

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        *lock(&self.heartbeat_stop) = Some(stop_tx);
        let heartbeats = Arc::clone(&self.heartbeats);
        let robot = self.robot.clone().filter(|_| self.animate);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(HEARTBEAT_PERIOD);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let tick = heartbeats.fetch_add(1, Ordering::SeqCst);
                        if let Some(robot) = &robot {
                            robot.animate(tick);
                        }
                    }
                }
            }
            debug!("sim heartbeat stopped");
        });

        self.running.store(true, Ordering::SeqCst);
        debug!("sim control subsystem started");
        Ok(())
    }

    async fn stop(&self) -> Result<(), TeleopError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.hang_on_stop {
            std::future::pending::<()>().await;
        }
        if let Some(stop) = lock(&self.heartbeat_stop).take() {
            let _ = stop.send(());
        }
        self.running.store(false, Ordering::SeqCst);
        match &self.fail_stop {
            Some(msg) => Err(TeleopError::Subsystem(msg.clone())),
            None => Ok(()),
        }
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn robot_interface(&self) -> Option<Arc<dyn RobotInterface>> {
        self.robot
            .as_ref()
            .map(|r| Arc::clone(r) as Arc<dyn RobotInterface>)
    }

    fn drain_vr_events(&self) -> Result<Vec<VrEvent>, TeleopError> {
        if let Some(msg) = &self.fail_vr {
            return Err(TeleopError::Subsystem(msg.clone()));
        }
        Ok(lock(&self.vr_events).drain(..).collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder for [`SimSubsystem`].  Both arms report zeros unless configured.
pub struct SimSubsystemBuilder {
    angles: BTreeMap<ArmSide, Vec<f64>>,
    with_robot: bool,
    vr_events: VecDeque<VrEvent>,
    fail_start: Option<String>,
    start_delay: Option<Duration>,
    fail_stop: Option<String>,
    hang_on_stop: bool,
    fail_vr: Option<String>,
    fail_angles: Option<String>,
    fail_engage: Option<String>,
    animate: bool,
}

impl Default for SimSubsystemBuilder {
    fn default() -> Self {
        let zeros = vec![0.0; MOTOR_NAMES.len()];
        Self {
            angles: BTreeMap::from([(ArmSide::Left, zeros.clone()), (ArmSide::Right, zeros)]),
            with_robot: true,
            vr_events: VecDeque::new(),
            fail_start: None,
            start_delay: None,
            fail_stop: None,
            hang_on_stop: false,
            fail_vr: None,
            fail_angles: None,
            fail_engage: None,
            animate: false,
        }
    }
}

impl SimSubsystemBuilder {
    pub fn with_angles(mut self, side: ArmSide, angles: Vec<f64>) -> Self {
        self.angles.insert(side, angles);
        self
    }

    /// Leave the control loop without a robot interface.
    pub fn without_robot(mut self) -> Self {
        self.with_robot = false;
        self
    }

    pub fn with_vr_events(mut self, events: impl IntoIterator<Item = VrEvent>) -> Self {
        self.vr_events.extend(events);
        self
    }

    /// Sweep the joints around their configured angles while running.
    pub fn animated(mut self) -> Self {
        self.animate = true;
        self
    }

    pub fn failing_start(mut self, msg: impl Into<String>) -> Self {
        self.fail_start = Some(msg.into());
        self
    }

    /// `start()` takes `delay` before completing.
    pub fn slow_start(mut self, delay: Duration) -> Self {
        self.start_delay = Some(delay);
        self
    }

    pub fn failing_stop(mut self, msg: impl Into<String>) -> Self {
        self.fail_stop = Some(msg.into());
        self
    }

    /// `stop()` never completes.
    pub fn hanging_stop(mut self) -> Self {
        self.hang_on_stop = true;
        self
    }

    pub fn failing_vr(mut self, msg: impl Into<String>) -> Self {
        self.fail_vr = Some(msg.into());
        self
    }

    pub fn failing_angles(mut self, msg: impl Into<String>) -> Self {
        self.fail_angles = Some(msg.into());
        self
    }

    pub fn failing_engage(mut self, msg: impl Into<String>) -> Self {
        self.fail_engage = Some(msg.into());
        self
    }

    pub fn build(self) -> Arc<SimSubsystem> {
        let robot = self
            .with_robot
            .then(|| Arc::new(SimRobot::new(self.angles, self.fail_angles, self.fail_engage)));
        Arc::new(SimSubsystem {
            robot,
            running: AtomicBool::new(false),
            vr_events: Mutex::new(self.vr_events),
            fail_start: self.fail_start,
            start_delay: self.start_delay,
            fail_stop: self.fail_stop,
            hang_on_stop: self.hang_on_stop,
            fail_vr: self.fail_vr,
            animate: self.animate,
            heartbeats: Arc::new(AtomicU64::new(0)),
            heartbeat_stop: Mutex::new(None),
            starts: AtomicUsize::new(0),
            stops: AtomicUsize::new(0),
            config: Mutex::new(None),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
