/// Java argument strings and memory flags
pub mod args;

use std::path::{Path, PathBuf};

/// The Java executable used when no custom path is configured
pub const DEFAULT_JAVA: &str = "java";

/// Get the Java executable to launch the game with. The custom path is
/// used if it is set, otherwise Java is taken from the search path
pub fn java_executable(custom: Option<&Path>) -> String {
	match custom {
		Some(path) => path.to_string_lossy().to_string(),
		None => DEFAULT_JAVA.to_string(),
	}
}

/// Find the system Java on the search path, if it is installed
pub fn find_system_java() -> Option<PathBuf> {
	which::which(DEFAULT_JAVA).ok()
}
