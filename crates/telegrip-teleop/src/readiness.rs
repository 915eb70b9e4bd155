//! Readiness strategies: how long `connect` waits before the subsystem may be
//! polled.
//!
//! The control subsystem exposes no readiness handshake beyond the return of
//! its `start()`, and hardware bring-up keeps going after that.  The adapter
//! therefore delegates the wait to a [`ReadinessStrategy`]:
//!
//! - [`FixedDelay`] – settle for a fixed time after launch (default).
//! - [`StartSignal`] – block on the worker's startup report, no extra delay.

use std::thread;
use std::time::Duration;

use telegrip_types::TeleopError;

use crate::worker::{StartupSignal, StartupStatus};

/// Decides when a freshly spawned subsystem is ready to be polled.
pub trait ReadinessStrategy: Send + Sync {
    /// Block until polling may begin.
    ///
    /// # Errors
    ///
    /// Returns the subsystem's start failure, or [`TeleopError::Timeout`] if
    /// the strategy gives up waiting.
    fn wait_until_ready(&self, startup: &mut StartupSignal) -> Result<(), TeleopError>;

    /// Extra wait before engaging the follower motors.
    fn wait_before_engage(&self);
}

/// Sleep a fixed settle time after launch.
///
/// A `start()` that is still pending after the settle time is tolerated; one
/// that already failed is reported.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    pub settle: Duration,
    pub engage_settle: Duration,
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(2),
            engage_settle: Duration::from_secs(1),
        }
    }
}

impl ReadinessStrategy for FixedDelay {
    fn wait_until_ready(&self, startup: &mut StartupSignal) -> Result<(), TeleopError> {
        thread::sleep(self.settle);
        match startup.poll() {
            StartupStatus::Failed(e) => Err(e),
            StartupStatus::Started | StartupStatus::Pending => Ok(()),
        }
    }

    fn wait_before_engage(&self) {
        thread::sleep(self.engage_settle);
    }
}

/// Wait for `start()` to return, up to `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct StartSignal {
    pub timeout: Duration,
}

impl StartSignal {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl ReadinessStrategy for StartSignal {
    fn wait_until_ready(&self, startup: &mut StartupSignal) -> Result<(), TeleopError> {
        match startup.wait(self.timeout) {
            StartupStatus::Started => Ok(()),
            StartupStatus::Failed(e) => Err(e),
            StartupStatus::Pending => Err(TeleopError::Timeout(format!(
                "control subsystem did not start within {:?}",
                self.timeout
            ))),
        }
    }

    fn wait_before_engage(&self) {}
}
