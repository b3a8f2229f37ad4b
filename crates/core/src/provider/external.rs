use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::process::Command;

use super::{GameProvider, IdentityOptions, ProviderError, VersionEntry};

/// The environment variable that overrides which provider program is used
pub static PROVIDER_ENV: &str = "COBALT_PROVIDER";
/// The provider program that is looked up on the PATH by default
pub static DEFAULT_PROVIDER: &str = "cobalt-provider";
/// The environment variable for the game directory the provider works in
pub static GAME_DIR_ENV: &str = "COBALT_GAME_DIR";
/// The environment variable for the version of the launcher passed to the provider
pub static LAUNCHER_VERSION_ENV: &str = "COBALT_VERSION";

/// A provider backed by a separate program. Every operation is one run of the
/// program with a subcommand:
///
/// - `list-versions <root>` prints a JSON array of `{"id", "type"}` objects
/// - `install <version> <dir>` installs with its output going to the terminal
/// - `command <version> <dir> <identity>` prints the launch command as a JSON array of strings
///
/// A non-zero exit is a failure, described by whatever the program wrote to stderr.
#[derive(Debug, Clone)]
pub struct ExternalProvider {
	program: PathBuf,
	launcher_version: Option<String>,
}

impl ExternalProvider {
	/// Create a provider that runs a specific program
	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			launcher_version: None,
		}
	}

	/// Find the provider program from the environment or the PATH
	pub fn from_env() -> Result<Self, ProviderError> {
		let name = std::env::var(PROVIDER_ENV).unwrap_or_else(|_| DEFAULT_PROVIDER.to_string());
		let program = which::which(&name).map_err(|_| ProviderError::NotFound(name))?;
		Ok(Self::new(program))
	}

	/// Set the launcher version that is reported to the program
	pub fn with_launcher_version(mut self, version: impl Into<String>) -> Self {
		self.launcher_version = Some(version.into());
		self
	}

	/// The program that this provider runs
	pub fn program(&self) -> &Path {
		&self.program
	}

	fn command(&self, dir: &Path) -> Command {
		let mut cmd = Command::new(&self.program);
		cmd.env(GAME_DIR_ENV, dir);
		if let Some(version) = &self.launcher_version {
			cmd.env(LAUNCHER_VERSION_ENV, version);
		}
		cmd.stdin(Stdio::null());
		cmd.kill_on_drop(true);
		cmd
	}

	/// Run a subcommand and capture what it prints
	async fn run_captured<I, S>(
		&self,
		operation: &'static str,
		dir: &Path,
		args: I,
	) -> anyhow::Result<Output>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<OsStr>,
	{
		let output = self
			.command(dir)
			.args(args)
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.output()
			.await
			.with_context(|| format!("Failed to run provider {}", self.program.display()))?;

		check_status(operation, &output)?;
		Ok(output)
	}
}

#[async_trait]
impl GameProvider for ExternalProvider {
	async fn list_versions(&self, root: &Path) -> anyhow::Result<Vec<VersionEntry>> {
		let operation = "list versions";
		let output = self
			.run_captured(operation, root, [OsStr::new("list-versions"), root.as_os_str()])
			.await?;

		Ok(parse_json_output(operation, &output.stdout)?)
	}

	async fn install(&self, version: &str, dir: &Path) -> anyhow::Result<()> {
		let status = self
			.command(dir)
			.arg("install")
			.arg(version)
			.arg(dir)
			.stdout(Stdio::inherit())
			.stderr(Stdio::inherit())
			.status()
			.await
			.with_context(|| format!("Failed to run provider {}", self.program.display()))?;

		if !status.success() {
			return Err(ProviderError::Failed {
				operation: "install",
				message: describe_exit(status.code()),
			}
			.into());
		}

		Ok(())
	}

	async fn build_command(
		&self,
		version: &str,
		dir: &Path,
		identity: &IdentityOptions,
	) -> anyhow::Result<Vec<String>> {
		let operation = "build the launch command";
		let identity =
			serde_json::to_string(identity).context("Failed to serialize player identity")?;
		let output = self
			.run_captured(
				operation,
				dir,
				[
					OsStr::new("command"),
					OsStr::new(version),
					dir.as_os_str(),
					OsStr::new(&identity),
				],
			)
			.await?;

		let command: Vec<String> = parse_json_output(operation, &output.stdout)?;
		if command.is_empty() {
			return Err(ProviderError::InvalidOutput {
				operation,
				message: "The command is empty".into(),
			}
			.into());
		}

		Ok(command)
	}
}

fn check_status(operation: &'static str, output: &Output) -> Result<(), ProviderError> {
	if output.status.success() {
		return Ok(());
	}

	let stderr = String::from_utf8_lossy(&output.stderr);
	let stderr = stderr.trim();
	let message = if stderr.is_empty() {
		describe_exit(output.status.code())
	} else {
		stderr.to_string()
	};

	Err(ProviderError::Failed { operation, message })
}

fn describe_exit(code: Option<i32>) -> String {
	match code {
		Some(code) => format!("Exited with code {code}"),
		None => "Terminated by a signal".into(),
	}
}

fn parse_json_output<T: DeserializeOwned>(
	operation: &'static str,
	stdout: &[u8],
) -> Result<T, ProviderError> {
	serde_json::from_slice(stdout).map_err(|e| ProviderError::InvalidOutput {
		operation,
		message: e.to_string(),
	})
}
