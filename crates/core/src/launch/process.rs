use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use anyhow::Context;
use cobalt_shared::output::{CobaltOutput, MessageContents, MessageLevel};
use cobalt_shared::util::utc_timestamp;

use crate::io::files::paths::Paths;

/// How a supervised process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
	/// The exit code. This is None when the process was ended by a signal
	pub code: Option<i32>,
}

impl ExitInfo {
	/// Whether the process exited successfully
	pub fn success(&self) -> bool {
		self.code == Some(0)
	}
}

impl From<ExitStatus> for ExitInfo {
	fn from(value: ExitStatus) -> Self {
		Self { code: value.code() }
	}
}

/// A running process that a launch session can watch and stop
pub trait SupervisedProcess: Send {
	/// Check if the process has exited without blocking
	fn poll_exit(&mut self) -> io::Result<Option<ExitInfo>>;

	/// Ask the process to stop
	fn terminate(&mut self) -> io::Result<()>;

	/// Block until the process has exited
	fn wait_exit(&mut self) -> io::Result<ExitInfo>;
}

impl SupervisedProcess for Child {
	fn poll_exit(&mut self) -> io::Result<Option<ExitInfo>> {
		Ok(self.try_wait()?.map(ExitInfo::from))
	}

	fn terminate(&mut self) -> io::Result<()> {
		self.kill()
	}

	fn wait_exit(&mut self) -> io::Result<ExitInfo> {
		self.wait().map(ExitInfo::from)
	}
}

/// Container struct for parameters for spawning the game process
pub struct GameProcessParameters<'a> {
	/// The full command. The first element is the program
	pub command: &'a [String],
	/// The working directory, which is the game directory
	pub cwd: &'a Path,
	/// The file that the output of the game is written to
	pub log_file: &'a Path,
}

/// Spawn the game process. Its output goes to the log file instead of the
/// terminal and it gets no input
pub fn spawn_game_process(
	params: GameProcessParameters<'_>,
	o: &mut impl CobaltOutput,
) -> anyhow::Result<Child> {
	let Some((program, args)) = params.command.split_first() else {
		anyhow::bail!("Launch command is empty");
	};

	std::fs::create_dir_all(params.cwd).context("Failed to create the game directory")?;
	let stdout = File::create(params.log_file).context("Failed to create the launch log file")?;
	let stderr = stdout
		.try_clone()
		.context("Failed to share the launch log file")?;

	let mut cmd = Command::new(program);
	cmd.args(args);
	cmd.current_dir(params.cwd);
	cmd.stdin(Stdio::null());
	cmd.stdout(Stdio::from(stdout));
	cmd.stderr(Stdio::from(stderr));

	output_launch_command(&cmd, params.log_file, o);

	let child = cmd.spawn().context("Failed to spawn the game process")?;
	o.display(
		MessageContents::Property(
			"Game process".into(),
			Box::new(MessageContents::Simple(child.id().to_string())),
		),
		MessageLevel::Debug,
	);

	Ok(child)
}

/// Get a new path for the log file of a launch
pub fn launch_log_path(paths: &Paths, version: &str) -> anyhow::Result<PathBuf> {
	let timestamp = utc_timestamp()?;
	let version: String = version
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
		.collect();
	Ok(paths.launch_logs.join(format!("{version}-{timestamp}.log")))
}

/// Display the launch command for debugging
fn output_launch_command(command: &Command, log_file: &Path, o: &mut impl CobaltOutput) {
	o.display(
		MessageContents::Property(
			"Launch command".into(),
			Box::new(MessageContents::Simple(
				command.get_program().to_string_lossy().into(),
			)),
		),
		MessageLevel::Debug,
	);

	o.display(
		MessageContents::Header("Launch command arguments".into()),
		MessageLevel::Debug,
	);
	for arg in command.get_args() {
		o.display(
			MessageContents::ListItem(Box::new(MessageContents::Simple(
				arg.to_string_lossy().into(),
			))),
			MessageLevel::Debug,
		);
	}

	if let Some(dir) = command.get_current_dir() {
		o.display(
			MessageContents::Property(
				"Launch command directory".into(),
				Box::new(MessageContents::Copyable(dir.to_string_lossy().into())),
			),
			MessageLevel::Debug,
		);
	}

	o.display(
		MessageContents::Property(
			"Game output".into(),
			Box::new(MessageContents::Copyable(log_file.to_string_lossy().into())),
		),
		MessageLevel::Debug,
	);
}
