use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use cfg_match::cfg_match;

/// Gets the current UTC timestamp in seconds
pub fn utc_timestamp() -> anyhow::Result<u64> {
	Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

// Command for opening files and folders with the desktop
cfg_match! {
	target_os = "linux" => {
		const OPEN_CMD: Option<&str> = Some("xdg-open");
	}
	target_os = "windows" => {
		const OPEN_CMD: Option<&str> = Some("explorer");
	}
	target_os = "macos" => {
		const OPEN_CMD: Option<&str> = Some("open");
	}
	_ => {
		const OPEN_CMD: Option<&str> = None;
	}
}

/// Attempt to open a file, folder, or link with the user's desktop environment.
/// Returns false if there is no known way to open things on this platform
pub fn open_path(path: impl AsRef<Path>) -> anyhow::Result<bool> {
	let Some(cmd) = OPEN_CMD else {
		return Ok(false);
	};

	Command::new(cmd)
		.arg(path.as_ref())
		.stderr(Stdio::null())
		.stdout(Stdio::null())
		.spawn()
		.with_context(|| format!("Failed to run '{cmd}'"))?;

	Ok(true)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_timestamp_is_recent() {
		// 2020-01-01
		assert!(utc_timestamp().unwrap() > 1_577_836_800);
	}
}
