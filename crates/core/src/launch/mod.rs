/// Building the final launch command
mod command;
/// Spawning the game process and the interface used to supervise it
mod process;
/// A single launch-and-supervise cycle
mod session;
/// The background task that stops the game on request
mod watcher;

pub use self::command::assemble_command;
pub use self::process::{
	launch_log_path, spawn_game_process, ExitInfo, GameProcessParameters, SupervisedProcess,
};
pub use self::session::{LaunchSession, SessionOutcome, EXIT_POLL_INTERVAL, WATCHER_JOIN_TIMEOUT};
pub use self::watcher::{CancelSource, WatcherReport, POLL_INTERVAL};
