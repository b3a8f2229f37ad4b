use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use super::process::SupervisedProcess;

/// How often the watcher checks for a stop request
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that tells the watcher that the user wants the game stopped
pub trait CancelSource: Send {
	/// Whether a stop was requested since the last check
	fn cancel_requested(&mut self) -> anyhow::Result<bool>;
}

/// What the watcher did while the game was running
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatcherReport {
	/// How many times the cancel source was checked
	pub checks: u64,
	/// How many times a stop was requested
	pub triggers: u64,
	/// How many times the process was asked to terminate
	pub termination_requests: u64,
	/// How many errors happened
	pub failures: u64,
	/// The most recent error
	pub last_failure: Option<String>,
}

impl WatcherReport {
	fn record_failure(&mut self, error: impl Display) {
		self.failures += 1;
		self.last_failure = Some(error.to_string());
	}
}

/// Check the cancel source until the active flag is cleared, stopping the
/// process whenever a stop is requested. Errors are recorded in the report
pub(crate) fn run_watcher<P: SupervisedProcess>(
	process: &Mutex<P>,
	active: &AtomicBool,
	cancel: &mut impl CancelSource,
	interval: Duration,
) -> WatcherReport {
	let mut report = WatcherReport::default();

	while active.load(Ordering::SeqCst) {
		report.checks += 1;
		match cancel.cancel_requested() {
			Ok(true) => {
				report.triggers += 1;
				stop_process(process, &mut report);
			}
			Ok(false) => {}
			Err(e) => report.record_failure(format!("Failed to check for the stop key: {e:#}")),
		}

		thread::sleep(interval);
	}

	report
}

/// Terminate the process if it is still running and wait for it to exit. The
/// lock is held the whole time so that the process can't be terminated twice
fn stop_process<P: SupervisedProcess>(process: &Mutex<P>, report: &mut WatcherReport) {
	let mut process = process.lock().unwrap_or_else(PoisonError::into_inner);

	match process.poll_exit() {
		Ok(Some(..)) => return,
		Ok(None) => {}
		Err(e) => {
			report.record_failure(format!("Failed to check the game process: {e}"));
			return;
		}
	}

	report.termination_requests += 1;
	if let Err(e) = process.terminate() {
		report.record_failure(format!("Failed to stop the game: {e}"));
		return;
	}
	if let Err(e) = process.wait_exit() {
		report.record_failure(format!("Failed to wait for the game to stop: {e}"));
	}
}
