use anyhow::{ensure, Context};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::rust_connection::RustConnection;

const XK_SHIFT_L: u32 = 0xffe1;
const XK_SHIFT_R: u32 = 0xffe2;
const XK_CONTROL_L: u32 = 0xffe3;
const XK_CONTROL_R: u32 = 0xffe4;
const XK_UPPER_Q: u32 = 0x0051;
const XK_LOWER_Q: u32 = 0x0071;

/// Keyboard state of the X server, which sees keys no matter which window
/// has focus
pub struct KeyboardState {
	conn: RustConnection,
	combo: StopCombo,
}

impl KeyboardState {
	pub fn connect() -> anyhow::Result<Self> {
		let (conn, _) = x11rb::connect(None).context("Failed to connect to the X server")?;
		let (min, max) = {
			let setup = conn.setup();
			(setup.min_keycode, setup.max_keycode)
		};
		let mapping = conn
			.get_keyboard_mapping(min, (max - min).saturating_add(1))
			.context("Failed to request the keyboard mapping")?
			.reply()
			.context("Failed to get the keyboard mapping")?;

		let combo = StopCombo::from_mapping(min, mapping.keysyms_per_keycode, &mapping.keysyms);
		ensure!(
			combo.is_complete(),
			"The keyboard has no keys for the stop combination"
		);

		Ok(Self { conn, combo })
	}

	/// Whether Ctrl, Shift and Q are all held down right now
	pub fn stop_combo_held(&mut self) -> anyhow::Result<bool> {
		let keymap = self
			.conn
			.query_keymap()
			.context("Failed to request the keyboard state")?
			.reply()
			.context("Failed to get the keyboard state")?;

		Ok(self.combo.held(&keymap.keys))
	}
}

/// The keycodes that make up the stop combination. A key can be on several
/// keycodes, such as the left and right Ctrl
#[derive(Debug, Default, PartialEq, Eq)]
struct StopCombo {
	control: Vec<u8>,
	shift: Vec<u8>,
	q: Vec<u8>,
}

impl StopCombo {
	/// Find the keycodes from the keysym table, which has `per_keycode`
	/// entries for every keycode starting at `min_keycode`
	fn from_mapping(min_keycode: u8, per_keycode: u8, keysyms: &[u32]) -> Self {
		let mut out = Self::default();
		if per_keycode == 0 {
			return out;
		}

		for (i, syms) in keysyms.chunks(per_keycode.into()).enumerate() {
			let Some(code) = u8::try_from(i)
				.ok()
				.and_then(|i| min_keycode.checked_add(i))
			else {
				break;
			};
			for sym in syms {
				let list = match *sym {
					XK_CONTROL_L | XK_CONTROL_R => &mut out.control,
					XK_SHIFT_L | XK_SHIFT_R => &mut out.shift,
					XK_LOWER_Q | XK_UPPER_Q => &mut out.q,
					_ => continue,
				};
				if !list.contains(&code) {
					list.push(code);
				}
			}
		}

		out
	}

	fn is_complete(&self) -> bool {
		!self.control.is_empty() && !self.shift.is_empty() && !self.q.is_empty()
	}

	/// Checks the combination against the keymap bit vector, where every
	/// keycode has one bit
	fn held(&self, keys: &[u8; 32]) -> bool {
		let any_held = |codes: &[u8]| {
			codes
				.iter()
				.any(|code| keys[usize::from(code / 8)] & (1 << (code % 8)) != 0)
		};

		any_held(&self.control) && any_held(&self.shift) && any_held(&self.q)
	}
}
