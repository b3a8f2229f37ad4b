use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use anyhow::Context;

use super::process::{ExitInfo, SupervisedProcess};
use super::watcher::{run_watcher, CancelSource, WatcherReport, POLL_INTERVAL};

/// How often the session checks if the game has exited
pub const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// How long the session waits for the watcher to finish after the game exits
pub const WATCHER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// One run of the game, from the moment it is spawned until it has exited and
/// the watcher is done
pub struct LaunchSession<P: SupervisedProcess> {
	process: Arc<Mutex<P>>,
	watcher_active: Arc<AtomicBool>,
	version: String,
	account: String,
	command: Vec<String>,
}

/// The result of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
	/// The exit code of the game, if it had one
	pub exit_code: Option<i32>,
	/// Whether the game was stopped with the stop key
	pub stopped_by_hotkey: bool,
	/// The watcher's report. None if the watcher could not be started or did
	/// not finish in time
	pub watcher: Option<WatcherReport>,
}

impl<P: SupervisedProcess + 'static> LaunchSession<P> {
	/// Create a session for a process that has just been spawned
	pub fn new(process: P, version: String, account: String, command: Vec<String>) -> Self {
		Self {
			process: Arc::new(Mutex::new(process)),
			watcher_active: Arc::new(AtomicBool::new(false)),
			version,
			account,
			command,
		}
	}

	/// The version that is running
	pub fn version(&self) -> &str {
		&self.version
	}

	/// The name of the account that is playing
	pub fn account(&self) -> &str {
		&self.account
	}

	/// The command that was run
	pub fn command(&self) -> &[String] {
		&self.command
	}

	/// Block until the game exits, stopping it whenever the cancel source asks to
	pub fn supervise<C: CancelSource + 'static>(self, cancel: C) -> anyhow::Result<SessionOutcome> {
		self.watcher_active.store(true, Ordering::SeqCst);

		let (report_tx, report_rx) = mpsc::channel();
		let process = self.process.clone();
		let active = self.watcher_active.clone();
		let watcher = thread::Builder::new()
			.name("cobalt-watcher".into())
			.spawn(move || {
				let mut cancel = cancel;
				let report = run_watcher(&process, &active, &mut cancel, POLL_INTERVAL);
				let _ = report_tx.send(report);
			})
			.ok();

		let exit = self.wait_for_exit();
		self.watcher_active.store(false, Ordering::SeqCst);

		let report = match watcher {
			Some(handle) => match report_rx.recv_timeout(WATCHER_JOIN_TIMEOUT) {
				Ok(report) => {
					let _ = handle.join();
					Some(report)
				}
				// The watcher is left running on its own
				Err(RecvTimeoutError::Timeout) => None,
				// The watcher panicked
				Err(RecvTimeoutError::Disconnected) => {
					let _ = handle.join();
					None
				}
			},
			None => None,
		};

		let exit = exit?;
		Ok(SessionOutcome {
			exit_code: exit.code,
			stopped_by_hotkey: report
				.as_ref()
				.is_some_and(|x| x.termination_requests > 0),
			watcher: report,
		})
	}

	fn wait_for_exit(&self) -> anyhow::Result<ExitInfo> {
		loop {
			{
				let mut process = self.process.lock().unwrap_or_else(PoisonError::into_inner);
				if let Some(exit) = process
					.poll_exit()
					.context("Failed to check if the game is still running")?
				{
					return Ok(exit);
				}
			}

			thread::sleep(EXIT_POLL_INTERVAL);
		}
	}
}
