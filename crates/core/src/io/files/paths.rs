use anyhow::{anyhow, Context};
use directories::{BaseDirs, UserDirs};

use std::path::{Path, PathBuf};

/// Name of the launcher data directory inside the home directory
pub const DATA_DIR_NAME: &str = ".cobalt_launcher_nano";
/// Name of the shared game directory inside the home directory
pub const GAME_DIR_NAME: &str = ".minecraft";

/// Store for all of the paths that are used throughout the application
#[derive(Debug, Clone)]
pub struct Paths {
	/// The user's home directory. Per-version game directories are created here
	pub home: PathBuf,
	/// Holds launcher data like the config and accounts
	pub data: PathBuf,
	/// Holds custom Java installations
	pub java: PathBuf,
	/// Holds launcher log files
	pub logs: PathBuf,
	/// Holds the output of launched game processes
	pub launch_logs: PathBuf,
	/// The shared game directory
	pub game: PathBuf,
	/// Where backups and copied logs are put
	pub desktop: PathBuf,
}

impl Paths {
	/// Create a new Paths object for the current user. This will create all of the
	/// launcher directories if they do not already exist.
	pub fn new() -> anyhow::Result<Paths> {
		let base = BaseDirs::new().ok_or(anyhow!("Failed to find the home directory"))?;
		let home = base.home_dir().to_owned();
		let desktop = UserDirs::new()
			.and_then(|x| x.desktop_dir().map(Path::to_path_buf))
			.unwrap_or_else(|| home.join("Desktop"));

		Self::from_roots(home, desktop)
	}

	/// Create a Paths object rooted at a custom home and desktop directory
	pub fn from_roots(home: PathBuf, desktop: PathBuf) -> anyhow::Result<Paths> {
		let data = home.join(DATA_DIR_NAME);
		let java = data.join("java");
		let logs = data.join("logs");
		let launch_logs = logs.join("launch");
		let game = home.join(GAME_DIR_NAME);

		for dir in [&data, &java, &logs, &launch_logs] {
			std::fs::create_dir_all(dir)
				.with_context(|| format!("Failed to create directory {}", dir.display()))?;
		}

		Ok(Paths {
			home,
			data,
			java,
			logs,
			launch_logs,
			game,
			desktop,
		})
	}

	/// The launcher config file
	pub fn config_file(&self) -> PathBuf {
		self.data.join("config.json")
	}

	/// The accounts file
	pub fn accounts_file(&self) -> PathBuf {
		self.data.join("accounts.json")
	}

	/// The notes file
	pub fn notes_file(&self) -> PathBuf {
		self.data.join("notes.txt")
	}

	/// The dedicated game directory for a single version
	pub fn version_game_dir(&self, version: &str) -> PathBuf {
		let sanitized: String = version
			.chars()
			.map(|c| match c {
				'/' | '\\' | ':' => '_',
				c => c,
			})
			.collect();
		self.home.join(format!("{GAME_DIR_NAME}_{sanitized}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_paths_layout() {
		let dir = tempfile::tempdir().unwrap();
		let home = dir.path().to_path_buf();
		let paths = Paths::from_roots(home.clone(), home.join("Desktop")).unwrap();

		assert!(paths.data.is_dir());
		assert!(paths.java.is_dir());
		assert!(paths.launch_logs.is_dir());
		assert_eq!(paths.game, home.join(".minecraft"));
		assert_eq!(
			paths.config_file(),
			home.join(".cobalt_launcher_nano/config.json")
		);
		assert_eq!(
			paths.version_game_dir("1.20.1"),
			home.join(".minecraft_1.20.1")
		);
		assert_eq!(
			paths.version_game_dir("../evil"),
			home.join(".minecraft_.._evil")
		);
	}
}
