use std::path::{Path, PathBuf};

use anyhow::Context;
use cobalt_core::io::java::args::{set_memory, DEFAULT_JAVA_ARGS};
use cobalt_core::io::java::java_executable;
use cobalt_core::io::{json_from_file, json_to_file_pretty};
use cobalt_core::Paths;
use cobalt_shared::output::{CobaltOutput, MessageContents, MessageLevel};
use serde::{Deserialize, Serialize};

/// Settings for the launcher. The whole record is written back on every change
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LauncherConfig {
	/// Arguments passed to Java, separated by spaces
	pub java_args: String,
	/// The version that is launched
	pub selected_version: Option<String>,
	/// The ID of the account that plays
	pub current_account: Option<u32>,
	/// Whether every version gets its own game directory
	pub separate_version_dirs: bool,
	/// A custom Java executable. The one on the search path is used otherwise
	pub java_path: Option<PathBuf>,
	/// The lowest ID a new account may get. IDs only ever go up, even when
	/// the newest account is deleted
	pub next_account_id: u32,
}

impl Default for LauncherConfig {
	fn default() -> Self {
		Self {
			java_args: DEFAULT_JAVA_ARGS.into(),
			selected_version: None,
			current_account: None,
			separate_version_dirs: false,
			java_path: None,
			next_account_id: 1,
		}
	}
}

impl LauncherConfig {
	/// Load the config. A missing or broken file gives the default config
	pub fn load(paths: &Paths, o: &mut impl CobaltOutput) -> Self {
		let path = paths.config_file();
		if !path.exists() {
			return Self::default();
		}

		match json_from_file(&path) {
			Ok(config) => config,
			Err(e) => {
				o.display(
					MessageContents::Simple(format!(
						"Config file is invalid and defaults will be used: {e:?}"
					)),
					MessageLevel::Debug,
				);
				Self::default()
			}
		}
	}

	/// Write the config to its file
	pub fn save(&self, paths: &Paths) -> anyhow::Result<()> {
		json_to_file_pretty(paths.config_file(), self).context("Failed to write the config file")
	}

	/// The game directory that a version is installed to and launched from
	pub fn game_dir_for(&self, version: &str, paths: &Paths) -> PathBuf {
		if self.separate_version_dirs {
			paths.version_game_dir(version)
		} else {
			paths.game.clone()
		}
	}

	/// The game directory of the selected version, or the shared one if there is none
	pub fn active_game_dir(&self, paths: &Paths) -> PathBuf {
		match &self.selected_version {
			Some(version) => self.game_dir_for(version, paths),
			None => paths.game.clone(),
		}
	}

	/// The Java executable that the game is launched with
	pub fn java_executable(&self) -> String {
		java_executable(self.java_path.as_deref())
	}

	/// Replace the Java arguments. Returns false without changing anything if
	/// the new arguments are empty
	pub fn set_java_args(&mut self, args: &str) -> bool {
		let args = args.trim();
		if args.is_empty() {
			return false;
		}
		self.java_args = args.to_string();
		true
	}

	/// Set the minimum and maximum heap size in gigabytes
	pub fn set_memory(&mut self, gb: u8) -> anyhow::Result<()> {
		self.java_args = set_memory(&self.java_args, gb)?;
		Ok(())
	}

	/// Set the custom Java path. An empty path goes back to the system Java.
	/// Returns whether the new path exists
	pub fn set_java_path(&mut self, path: &str) -> bool {
		let path = path.trim();
		if path.is_empty() {
			self.java_path = None;
			return true;
		}
		let path = PathBuf::from(path);
		let exists = path.exists();
		self.java_path = Some(path);
		exists
	}

	/// Turn per-version game directories on or off. Returns the new state
	pub fn toggle_separate_dirs(&mut self) -> bool {
		self.separate_version_dirs = !self.separate_version_dirs;
		self.separate_version_dirs
	}

	/// The custom Java path, if one is set
	pub fn java_path(&self) -> Option<&Path> {
		self.java_path.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use cobalt_shared::output::Recorder;

	fn test_paths() -> (tempfile::TempDir, Paths) {
		let dir = tempfile::tempdir().unwrap();
		let paths =
			Paths::from_roots(dir.path().to_path_buf(), dir.path().join("Desktop")).unwrap();
		(dir, paths)
	}

	#[test]
	fn test_missing_file_gives_defaults() {
		let (_dir, paths) = test_paths();
		let config = LauncherConfig::load(&paths, &mut Recorder::default());
		assert_eq!(config, LauncherConfig::default());
		assert_eq!(config.java_args, "-Xmx2G -Xms1G");
	}

	#[test]
	fn test_round_trip() {
		let (_dir, paths) = test_paths();
		let config = LauncherConfig {
			java_args: "-Xmx4G -Xms4G".into(),
			selected_version: Some("1.20.1".into()),
			current_account: Some(2),
			separate_version_dirs: true,
			java_path: Some("/usr/bin/java".into()),
			next_account_id: 4,
		};
		config.save(&paths).unwrap();
		assert_eq!(
			LauncherConfig::load(&paths, &mut Recorder::default()),
			config
		);
	}

	#[test]
	fn test_missing_keys_are_filled() {
		let (_dir, paths) = test_paths();
		std::fs::write(
			paths.config_file(),
			r#"{"java_args": "-Xmx3G", "selected_version": "1.8.9", "current_account": 1}"#,
		)
		.unwrap();
		let config = LauncherConfig::load(&paths, &mut Recorder::default());
		assert_eq!(config.java_args, "-Xmx3G");
		assert_eq!(config.selected_version.as_deref(), Some("1.8.9"));
		assert!(!config.separate_version_dirs);
		assert_eq!(config.java_path, None);
		assert_eq!(config.next_account_id, 1);
	}

	#[test]
	fn test_malformed_file_gives_defaults() {
		let (_dir, paths) = test_paths();
		std::fs::write(paths.config_file(), "{ \"java_args\": ").unwrap();
		let mut o = Recorder::default();
		let config = LauncherConfig::load(&paths, &mut o);
		assert_eq!(config, LauncherConfig::default());
		assert!(o
			.messages
			.iter()
			.all(|(level, _)| *level == MessageLevel::Debug));
	}

	#[test]
	fn test_game_dirs() {
		let (dir, paths) = test_paths();
		let mut config = LauncherConfig::default();
		assert_eq!(config.active_game_dir(&paths), dir.path().join(".minecraft"));

		config.selected_version = Some("1.20.1".into());
		assert_eq!(config.active_game_dir(&paths), dir.path().join(".minecraft"));

		assert!(config.toggle_separate_dirs());
		assert_eq!(
			config.active_game_dir(&paths),
			dir.path().join(".minecraft_1.20.1")
		);
		assert_eq!(
			config.game_dir_for("1.19.4", &paths),
			dir.path().join(".minecraft_1.19.4")
		);
		assert!(!config.toggle_separate_dirs());
	}

	#[test]
	fn test_settings() {
		let mut config = LauncherConfig::default();
		assert!(!config.set_java_args("   "));
		assert_eq!(config.java_args, DEFAULT_JAVA_ARGS);
		assert!(config.set_java_args(" -Xmx8G -Xms4G -XX:+UseG1GC "));
		assert_eq!(config.java_args, "-Xmx8G -Xms4G -XX:+UseG1GC");

		config.set_memory(6).unwrap();
		assert_eq!(config.java_args, "-Xmx6G -Xms6G -XX:+UseG1GC");
		assert!(config.set_memory(40).is_err());

		assert_eq!(config.java_executable(), "java");
		assert!(!config.set_java_path("/does/not/exist/java"));
		assert_eq!(config.java_executable(), "/does/not/exist/java");
		assert!(config.set_java_path(""));
		assert_eq!(config.java_path(), None);
	}
}
