#[cfg(any(windows, target_os = "macos"))]
mod device;
#[cfg(all(unix, not(target_os = "macos")))]
mod x11;

#[cfg(any(windows, target_os = "macos"))]
use device::KeyboardState;
#[cfg(all(unix, not(target_os = "macos")))]
use x11::KeyboardState;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Context;
use cobalt::core::CancelSource;
use cobalt::shared::output::{CobaltOutput, MessageContents, MessageLevel};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

/// The combination that closes the game from anywhere on the desktop
pub const GLOBAL_STOP_KEY_NAME: &str = "Ctrl+Shift+Q";
/// The combination that closes the game when typed in the launcher's terminal
pub const TERMINAL_STOP_KEY_NAME: &str = "Ctrl+Q";

/// Stops the game when the stop combination is pressed. The keyboard state of
/// the whole desktop is checked when the system allows it, so the game window
/// can keep focus. Otherwise key presses are read from the terminal
pub struct StopKey {
	backend: Backend,
	terminal: TerminalHandle,
}

enum Backend {
	/// Polls whether the combination is held down right now
	Global(KeyboardState),
	/// Reads key presses from the terminal in raw mode
	Terminal,
	/// Never requests a stop
	Disabled,
}

impl StopKey {
	/// Pick the best stop key that is available. Terminal input is only used
	/// when the input is a terminal
	pub fn detect(interactive: bool, o: &mut impl CobaltOutput) -> Self {
		let backend = match KeyboardState::connect() {
			Ok(keyboard) => Backend::Global(keyboard),
			Err(e) => {
				o.display(
					MessageContents::Simple(format!(
						"Desktop keyboard is not available for the stop key: {e:#}"
					)),
					MessageLevel::Debug,
				);
				if interactive {
					Backend::Terminal
				} else {
					Backend::Disabled
				}
			}
		};

		Self {
			backend,
			terminal: TerminalHandle::default(),
		}
	}

	/// The combination the user should press, if there is one
	pub fn name(&self) -> Option<&'static str> {
		match self.backend {
			Backend::Global(..) => Some(GLOBAL_STOP_KEY_NAME),
			Backend::Terminal => Some(TERMINAL_STOP_KEY_NAME),
			Backend::Disabled => None,
		}
	}

	/// Whether the combination works while another window has focus
	pub fn is_global(&self) -> bool {
		matches!(self.backend, Backend::Global(..))
	}

	/// A handle that gives the terminal back after the game has exited, even
	/// if this stop key is still owned by a watcher that has not finished
	pub fn terminal(&self) -> TerminalHandle {
		self.terminal.clone()
	}
}

impl CancelSource for StopKey {
	fn cancel_requested(&mut self) -> anyhow::Result<bool> {
		match &mut self.backend {
			Backend::Global(keyboard) => keyboard.stop_combo_held(),
			Backend::Terminal => self.terminal.stop_key_pressed(),
			Backend::Disabled => Ok(false),
		}
	}
}

impl Drop for StopKey {
	fn drop(&mut self) {
		self.terminal.release();
	}
}

#[derive(Debug, Default)]
struct TerminalState {
	raw_mode: bool,
	released: bool,
}

/// Shared raw mode state of the terminal. Once released, raw mode is off and
/// is never turned on again by this stop key
#[derive(Debug, Clone, Default)]
pub struct TerminalHandle(Arc<Mutex<TerminalState>>);

impl TerminalHandle {
	/// Turn raw mode off and stop reading keys from the terminal
	pub fn release(&self) {
		let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
		state.released = true;
		if state.raw_mode {
			let _ = terminal::disable_raw_mode();
			state.raw_mode = false;
		}
	}

	fn stop_key_pressed(&self) -> anyhow::Result<bool> {
		let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
		if state.released {
			return Ok(false);
		}

		if !state.raw_mode {
			terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
			state.raw_mode = true;
		}

		let mut requested = false;
		while event::poll(Duration::ZERO).context("Failed to poll for key presses")? {
			if let Event::Key(key) = event::read().context("Failed to read key press")? {
				requested |= is_stop_key(&key);
			}
		}

		Ok(requested)
	}

	#[cfg(test)]
	fn is_raw_mode(&self) -> bool {
		self.0.lock().unwrap_or_else(PoisonError::into_inner).raw_mode
	}
}

/// Checks if a key event from the terminal is the stop key being pressed.
/// Terminals report Ctrl+Shift+Q the same way as Ctrl+Q
fn is_stop_key(key: &KeyEvent) -> bool {
	key.kind == KeyEventKind::Press
		&& key.modifiers.contains(KeyModifiers::CONTROL)
		&& matches!(key.code, KeyCode::Char('q' | 'Q'))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn stop_key(backend: Backend) -> StopKey {
		StopKey {
			backend,
			terminal: TerminalHandle::default(),
		}
	}

	#[test]
	fn test_stop_key() {
		assert!(is_stop_key(&KeyEvent::new(
			KeyCode::Char('q'),
			KeyModifiers::CONTROL
		)));
		assert!(is_stop_key(&KeyEvent::new(
			KeyCode::Char('Q'),
			KeyModifiers::CONTROL | KeyModifiers::SHIFT
		)));
		assert!(!is_stop_key(&KeyEvent::new(
			KeyCode::Char('q'),
			KeyModifiers::NONE
		)));
		assert!(!is_stop_key(&KeyEvent::new(
			KeyCode::Char('c'),
			KeyModifiers::CONTROL
		)));
		let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
		release.kind = KeyEventKind::Release;
		assert!(!is_stop_key(&release));
	}

	#[test]
	fn test_disabled_stop_key() {
		let mut key = stop_key(Backend::Disabled);
		assert_eq!(key.name(), None);
		assert!(!key.is_global());
		assert!(!key.cancel_requested().unwrap());
		assert!(!key.terminal.is_raw_mode());
	}

	#[test]
	fn test_released_terminal_is_not_read() {
		let mut key = stop_key(Backend::Terminal);
		assert_eq!(key.name(), Some(TERMINAL_STOP_KEY_NAME));

		// The launcher gives the terminal back while a late watcher still
		// owns the stop key
		let handle = key.terminal();
		handle.release();

		assert!(!key.cancel_requested().unwrap());
		assert!(!handle.is_raw_mode());
		assert!(!key.cancel_requested().unwrap());
		assert!(!handle.is_raw_mode());
	}

	#[test]
	fn test_dropping_releases_the_terminal() {
		let key = stop_key(Backend::Terminal);
		let handle = key.terminal();
		drop(key);
		assert!(handle.0.lock().unwrap().released);
		assert!(!handle.is_raw_mode());
	}
}
