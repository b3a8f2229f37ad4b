use device_query::{DeviceQuery, DeviceState, Keycode};

/// Keyboard state of the whole system, which sees keys no matter which
/// window has focus
pub struct KeyboardState {
	device: DeviceState,
}

impl KeyboardState {
	pub fn connect() -> anyhow::Result<Self> {
		Ok(Self {
			device: DeviceState::new(),
		})
	}

	/// Whether Ctrl, Shift and Q are all held down right now
	pub fn stop_combo_held(&mut self) -> anyhow::Result<bool> {
		Ok(combo_held(&self.device.get_keys()))
	}
}

fn combo_held(keys: &[Keycode]) -> bool {
	let control = keys
		.iter()
		.any(|x| matches!(x, Keycode::LControl | Keycode::RControl));
	let shift = keys
		.iter()
		.any(|x| matches!(x, Keycode::LShift | Keycode::RShift));

	control && shift && keys.contains(&Keycode::Q)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_combo_held() {
		assert!(combo_held(&[Keycode::LControl, Keycode::RShift, Keycode::Q]));
		assert!(combo_held(&[
			Keycode::Q,
			Keycode::W,
			Keycode::RControl,
			Keycode::LShift
		]));
		assert!(!combo_held(&[Keycode::LControl, Keycode::Q]));
		assert!(!combo_held(&[Keycode::LControl, Keycode::LShift]));
		assert!(!combo_held(&[]));
	}
}
