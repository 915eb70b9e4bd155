//! [`SubsystemWorker`] – the dedicated thread that owns the control
//! subsystem's event loop.
//!
//! The worker builds a single-threaded Tokio runtime on its own OS thread,
//! runs [`ControlSubsystem::start`] on it and then keeps the loop alive until
//! a stop signal arrives.  Anything the subsystem spawns during `start` runs
//! on that loop.  Callers never drive the subsystem's futures themselves: they
//! schedule them onto the loop with [`SubsystemWorker::run_with_timeout`].
//!
//! Teardown is explicit: [`SubsystemWorker::stop_subsystem`] runs `stop()`
//! on the loop, then [`SubsystemWorker::shutdown`] sends the stop signal and
//! waits a bounded time for the thread to exit.  A subsystem that started but
//! was never stopped through the worker is stopped on the loop before it
//! closes.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use telegrip_types::TeleopError;
use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use crate::subsystem::ControlSubsystem;

// ────────────────────────────────────────────────────────────────────────────
// Startup signal
// ────────────────────────────────────────────────────────────────────────────

/// Where the subsystem's `start()` currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum StartupStatus {
    Started,
    Failed(TeleopError),
    /// `start()` has not returned yet.
    Pending,
}

/// Receiving end of the worker's report on `start()`.
pub struct StartupSignal {
    rx: mpsc::Receiver<Result<(), TeleopError>>,
    outcome: Option<StartupStatus>,
}

impl StartupSignal {
    pub(crate) fn pair() -> (mpsc::Sender<Result<(), TeleopError>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx, outcome: None })
    }

    /// Current status without blocking.
    pub fn poll(&mut self) -> StartupStatus {
        self.wait(Duration::ZERO)
    }

    /// Wait up to `timeout` for `start()` to report.
    pub fn wait(&mut self, timeout: Duration) -> StartupStatus {
        if let Some(status) = &self.outcome {
            return status.clone();
        }
        let received = if timeout.is_zero() {
            self.rx.try_recv().map_err(|e| match e {
                mpsc::TryRecvError::Empty => RecvTimeoutError::Timeout,
                mpsc::TryRecvError::Disconnected => RecvTimeoutError::Disconnected,
            })
        } else {
            self.rx.recv_timeout(timeout)
        };
        let status = match received {
            Ok(Ok(())) => StartupStatus::Started,
            Ok(Err(e)) => StartupStatus::Failed(e),
            Err(RecvTimeoutError::Timeout) => return StartupStatus::Pending,
            Err(RecvTimeoutError::Disconnected) => StartupStatus::Failed(TeleopError::Worker(
                "event loop exited before the subsystem finished starting".to_string(),
            )),
        };
        self.outcome = Some(status.clone());
        status
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Worker
// ────────────────────────────────────────────────────────────────────────────

/// Owned handle to the background thread running the subsystem's event loop.
///
/// Dropping the worker sends the stop signal but does not wait for the
/// thread; use [`shutdown`][Self::shutdown] for a bounded join.
pub struct SubsystemWorker {
    handle: Handle,
    subsystem: Arc<dyn ControlSubsystem>,
    // Set once the owner has scheduled `stop()`.
    owner_stopped: Arc<AtomicBool>,
    stop_tx: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
    // Disconnects when the worker thread returns.
    exited_rx: mpsc::Receiver<()>,
}

impl SubsystemWorker {
    /// Spawn the worker thread `<name>-loop` and start `subsystem` on it.
    ///
    /// Returns once the event loop is up; `start()` itself may still be
    /// running.  Its outcome arrives on the returned [`StartupSignal`].
    ///
    /// # Errors
    ///
    /// Returns [`TeleopError::Worker`] if the thread or its runtime cannot be
    /// created.
    pub fn spawn(
        name: &str,
        subsystem: Arc<dyn ControlSubsystem>,
    ) -> Result<(Self, StartupSignal), TeleopError> {
        let (handle_tx, handle_rx) = mpsc::channel::<Result<Handle, TeleopError>>();
        let (startup_tx, startup) = StartupSignal::pair();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let owner_stopped = Arc::new(AtomicBool::new(false));
        let loop_owner_stopped = Arc::clone(&owner_stopped);
        let loop_subsystem = Arc::clone(&subsystem);
        let (exited_tx, exited_rx) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name(format!("{name}-loop"))
            .spawn(move || {
                let runtime = match Builder::new_current_thread().enable_all().build() {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = handle_tx.send(Err(TeleopError::Worker(format!(
                            "failed to build event loop: {e}"
                        ))));
                        return;
                    }
                };
                let _ = handle_tx.send(Ok(runtime.handle().clone()));

                runtime.block_on(async move {
                    let subsystem = loop_subsystem;
                    let outcome = subsystem.start().await;
                    if let Err(e) = &outcome {
                        error!(error = %e, "control subsystem failed to start");
                    }
                    let started = outcome.is_ok();
                    let _ = startup_tx.send(outcome);
                    if !started {
                        return;
                    }
                    // Keep serving the subsystem's tasks until told to stop.
                    let _ = stop_rx.await;
                    if !loop_owner_stopped.load(Ordering::SeqCst) {
                        warn!("control subsystem was never stopped by its owner; stopping it");
                        if let Err(e) = subsystem.stop().await {
                            warn!(error = %e, "control subsystem failed to stop on loop exit");
                        }
                    }
                });
                drop(runtime);
                debug!("subsystem event loop closed");
                let _ = exited_tx.send(());
            })
            .map_err(|e| TeleopError::Worker(format!("failed to spawn worker thread: {e}")))?;

        let handle = match handle_rx.recv() {
            Ok(Ok(handle)) => handle,
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(TeleopError::Worker(
                    "worker thread exited before its event loop came up".to_string(),
                ));
            }
        };

        Ok((
            Self {
                handle,
                subsystem,
                owner_stopped,
                stop_tx: Some(stop_tx),
                thread: Some(thread),
                exited_rx,
            },
            startup,
        ))
    }

    /// Schedule `fut` onto the worker's event loop and wait up to `timeout`
    /// for its output.  The task is aborted when the timeout expires.
    ///
    /// # Errors
    ///
    /// [`TeleopError::Timeout`] when `timeout` expires, or
    /// [`TeleopError::Worker`] if the event loop is gone.
    pub fn run_with_timeout<F, T>(&self, fut: F, timeout: Duration) -> Result<T, TeleopError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let task = self.handle.spawn(async move {
            let _ = tx.send(fut.await);
        });
        match rx.recv_timeout(timeout) {
            Ok(output) => Ok(output),
            Err(RecvTimeoutError::Timeout) => {
                task.abort();
                Err(TeleopError::Timeout(format!(
                    "event loop task did not finish within {timeout:?}"
                )))
            }
            Err(RecvTimeoutError::Disconnected) => Err(TeleopError::Worker(
                "event loop dropped the task before it finished".to_string(),
            )),
        }
    }

    /// Run the subsystem's `stop()` on the loop, waiting up to `timeout`.
    ///
    /// Once called, the loop no longer stops the subsystem itself on exit,
    /// even when this attempt times out.
    ///
    /// # Errors
    ///
    /// As [`run_with_timeout`][Self::run_with_timeout]; the inner result is
    /// `stop()`'s own.
    pub fn stop_subsystem(&self, timeout: Duration) -> Result<Result<(), TeleopError>, TeleopError> {
        self.owner_stopped.store(true, Ordering::SeqCst);
        let subsystem = Arc::clone(&self.subsystem);
        self.run_with_timeout(async move { subsystem.stop().await }, timeout)
    }

    /// Whether the worker thread is still running.
    pub fn is_alive(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the event loop and wait up to `join_timeout` for the thread.
    ///
    /// The worker is consumed either way; a thread that overstays the
    /// timeout is detached.
    ///
    /// # Errors
    ///
    /// [`TeleopError::Timeout`] if the thread did not exit in time, or
    /// [`TeleopError::Worker`] if it panicked.
    pub fn shutdown(mut self, join_timeout: Duration) -> Result<(), TeleopError> {
        if let Some(stop) = self.stop_tx.take() {
            let _ = stop.send(());
        }
        match self.exited_rx.recv_timeout(join_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => match self.thread.take() {
                Some(thread) => thread
                    .join()
                    .map_err(|_| TeleopError::Worker("worker thread panicked".to_string())),
                None => Ok(()),
            },
            Err(RecvTimeoutError::Timeout) => {
                self.thread.take();
                Err(TeleopError::Timeout(format!(
                    "worker thread did not exit within {join_timeout:?}"
                )))
            }
        }
    }
}

impl Drop for SubsystemWorker {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_tx.take() {
            let _ = stop.send(());
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
