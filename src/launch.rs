use std::path::PathBuf;

use anyhow::Context;
use cobalt_core::io::java::args::MemoryArg;
use cobalt_core::launch::{
	assemble_command, launch_log_path, spawn_game_process, GameProcessParameters,
};
use cobalt_core::{CancelSource, GameProvider, LaunchSession, Paths, SessionOutcome};
use cobalt_shared::output::{CobaltOutput, MessageContents, MessageLevel, OutputProcess};

use crate::accounts::{Account, AccountStore};
use crate::config::LauncherConfig;

/// Reasons that the game can't be launched with the current settings
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LaunchError {
	/// There is no version to launch
	#[error("No version is selected. Install one with the 'install' command first")]
	NoVersionSelected,
	/// There is no account to play with
	#[error("No account is selected. Set one up with the 'accounts' command first")]
	NoAccountSelected,
	/// The selected account was removed
	#[error("The selected account with ID {0} does not exist. Choose another one with the 'accounts' command")]
	AccountNotFound(u32),
}

/// What is going to be launched
#[derive(Debug, Clone)]
pub struct LaunchTarget {
	/// The version to launch
	pub version: String,
	/// The account to play with
	pub account: Account,
	/// The game directory to launch in
	pub game_dir: PathBuf,
}

/// A launch target with the full command that will be run
#[derive(Debug, Clone)]
pub struct LaunchPlan {
	/// What is launched
	pub target: LaunchTarget,
	/// The command, starting with the Java executable
	pub command: Vec<String>,
}

/// Check that everything needed to launch is selected
pub fn prepare_launch(
	config: &LauncherConfig,
	accounts: &AccountStore,
	paths: &Paths,
) -> Result<LaunchTarget, LaunchError> {
	let version = config
		.selected_version
		.clone()
		.ok_or(LaunchError::NoVersionSelected)?;
	let account_id = config
		.current_account
		.ok_or(LaunchError::NoAccountSelected)?;
	let account = accounts
		.get(account_id)
		.ok_or(LaunchError::AccountNotFound(account_id))?;

	Ok(LaunchTarget {
		game_dir: config.game_dir_for(&version, paths),
		version,
		account: account.clone(),
	})
}

/// Get the launch command from the provider and put our Java settings in it
pub async fn plan_launch(
	target: LaunchTarget,
	config: &LauncherConfig,
	provider: &dyn GameProvider,
	o: &mut impl CobaltOutput,
) -> anyhow::Result<LaunchPlan> {
	o.display(
		MessageContents::StartProcess("Preparing to launch".into()),
		MessageLevel::Important,
	);

	let provider_command = provider
		.build_command(&target.version, &target.game_dir, &target.account.identity())
		.await
		.context("Failed to get the launch command from the provider")?;
	let command = assemble_command(
		&config.java_executable(),
		&config.java_args,
		&provider_command,
	)?;

	Ok(LaunchPlan { target, command })
}

/// Spawn the game and block until it exits, stopping it when the cancel source asks
pub async fn run_launch<C: CancelSource + 'static>(
	plan: LaunchPlan,
	paths: &Paths,
	cancel: C,
	o: &mut impl CobaltOutput,
) -> anyhow::Result<SessionOutcome> {
	let LaunchPlan { target, command } = plan;

	let log_file =
		launch_log_path(paths, &target.version).context("Failed to pick a launch log file")?;
	let params = GameProcessParameters {
		command: &command,
		cwd: &target.game_dir,
		log_file: &log_file,
	};
	let child = spawn_game_process(params, o)?;

	o.display(
		MessageContents::Success("Minecraft is running".into()),
		MessageLevel::Important,
	);

	let session = LaunchSession::new(child, target.version, target.account.username, command);
	let outcome = tokio::task::spawn_blocking(move || session.supervise(cancel))
		.await
		.context("The game supervisor stopped unexpectedly")?
		.context("Failed to supervise the game")?;

	report_outcome(&outcome, o);

	Ok(outcome)
}

/// Check the settings, build the command, and run the game until it exits
pub async fn launch<C: CancelSource + 'static>(
	paths: &Paths,
	config: &LauncherConfig,
	accounts: &AccountStore,
	provider: &dyn GameProvider,
	cancel: C,
	o: &mut impl CobaltOutput,
) -> anyhow::Result<SessionOutcome> {
	let target = prepare_launch(config, accounts, paths)?;
	display_target(&target, config, o);

	let plan = {
		let process = OutputProcess::new(o);
		plan_launch(target, config, provider, &mut *process.0).await?
	};

	run_launch(plan, paths, cancel, o).await
}

/// Show what is about to be launched
fn display_target(target: &LaunchTarget, config: &LauncherConfig, o: &mut impl CobaltOutput) {
	o.display(
		MessageContents::Header("Launching Minecraft".into()),
		MessageLevel::Important,
	);
	o.start_section();
	o.display(
		MessageContents::Property(
			"Version".into(),
			Box::new(MessageContents::Simple(target.version.clone())),
		),
		MessageLevel::Important,
	);
	o.display(
		MessageContents::Property(
			"Account".into(),
			Box::new(MessageContents::Simple(target.account.username.clone())),
		),
		MessageLevel::Important,
	);
	let memory = MemoryArg::Max
		.find_in(&config.java_args)
		.map(|x| x.to_string())
		.unwrap_or_else(|| "Java default".into());
	o.display(
		MessageContents::Property("Memory".into(), Box::new(MessageContents::Simple(memory))),
		MessageLevel::Important,
	);
	o.display(
		MessageContents::Property(
			"Folder".into(),
			Box::new(MessageContents::Copyable(
				target.game_dir.to_string_lossy().into(),
			)),
		),
		MessageLevel::Important,
	);
	o.end_section();
}

/// Report how the game ended and anything the watcher ran into
fn report_outcome(outcome: &SessionOutcome, o: &mut impl CobaltOutput) {
	if outcome.stopped_by_hotkey {
		o.display(
			MessageContents::Success("Minecraft was closed".into()),
			MessageLevel::Important,
		);
	} else {
		let code = match outcome.exit_code {
			Some(code) => code.to_string(),
			None => "none".into(),
		};
		o.display(
			MessageContents::Success(format!("Minecraft has exited (code {code})")),
			MessageLevel::Important,
		);
	}

	match &outcome.watcher {
		Some(report) => {
			o.display(
				MessageContents::Simple(format!(
					"Stop key watcher: {} checks, {} requests, {} failures",
					report.checks, report.triggers, report.failures
				)),
				MessageLevel::Debug,
			);
			if let Some(failure) = &report.last_failure {
				o.display(
					MessageContents::Simple(format!("Last stop key watcher failure: {failure}")),
					MessageLevel::Debug,
				);
			}
		}
		None => o.display(
			MessageContents::Simple("Stop key watcher did not report back".into()),
			MessageLevel::Debug,
		),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::path::Path;
	use std::sync::Mutex;

	use async_trait::async_trait;
	use cobalt_core::{IdentityOptions, VersionEntry};
	use cobalt_shared::output::Recorder;

	/// Provider that returns a fixed command and records what it was asked
	struct FixedCommand {
		command: Vec<String>,
		calls: Mutex<Vec<(String, PathBuf, IdentityOptions)>>,
	}

	impl FixedCommand {
		fn new(command: &[&str]) -> Self {
			Self {
				command: command.iter().map(|x| x.to_string()).collect(),
				calls: Mutex::new(Vec::new()),
			}
		}
	}

	#[async_trait]
	impl GameProvider for FixedCommand {
		async fn list_versions(&self, _root: &Path) -> anyhow::Result<Vec<VersionEntry>> {
			Ok(Vec::new())
		}

		async fn install(&self, _version: &str, _dir: &Path) -> anyhow::Result<()> {
			Ok(())
		}

		async fn build_command(
			&self,
			version: &str,
			dir: &Path,
			identity: &IdentityOptions,
		) -> anyhow::Result<Vec<String>> {
			self.calls.lock().unwrap().push((
				version.to_string(),
				dir.to_path_buf(),
				identity.clone(),
			));
			Ok(self.command.clone())
		}
	}

	struct Never;

	impl CancelSource for Never {
		fn cancel_requested(&mut self) -> anyhow::Result<bool> {
			Ok(false)
		}
	}

	struct Immediately;

	impl CancelSource for Immediately {
		fn cancel_requested(&mut self) -> anyhow::Result<bool> {
			Ok(true)
		}
	}

	struct Setup {
		_dir: tempfile::TempDir,
		paths: Paths,
		config: LauncherConfig,
		accounts: AccountStore,
		o: Recorder,
	}

	fn setup() -> Setup {
		let dir = tempfile::tempdir().unwrap();
		let paths =
			Paths::from_roots(dir.path().to_path_buf(), dir.path().join("Desktop")).unwrap();
		let mut o = Recorder::default();
		let accounts = AccountStore::open(&paths, &mut o);
		Setup {
			_dir: dir,
			paths,
			config: LauncherConfig::default(),
			accounts,
			o,
		}
	}

	#[tokio::test]
	async fn test_preconditions() {
		let mut s = setup();
		let provider = FixedCommand::new(&["java", "Main"]);

		let err = launch(&s.paths, &s.config, &s.accounts, &provider, Never, &mut s.o)
			.await
			.unwrap_err();
		assert_eq!(
			err.downcast_ref::<LaunchError>(),
			Some(&LaunchError::NoVersionSelected)
		);

		s.config.selected_version = Some("1.20.1".into());
		let err = launch(&s.paths, &s.config, &s.accounts, &provider, Never, &mut s.o)
			.await
			.unwrap_err();
		assert_eq!(
			err.downcast_ref::<LaunchError>(),
			Some(&LaunchError::NoAccountSelected)
		);

		s.config.current_account = Some(5);
		let err = launch(&s.paths, &s.config, &s.accounts, &provider, Never, &mut s.o)
			.await
			.unwrap_err();
		assert_eq!(
			err.downcast_ref::<LaunchError>(),
			Some(&LaunchError::AccountNotFound(5))
		);

		assert!(provider.calls.lock().unwrap().is_empty());
		assert_eq!(std::fs::read_dir(&s.paths.launch_logs).unwrap().count(), 0);
	}

	#[tokio::test]
	async fn test_plan_command() {
		let mut s = setup();
		s.config.selected_version = Some("1.20.1".into());
		s.accounts
			.add_offline("Steve", &mut s.config, &mut s.o)
			.unwrap();
		let provider = FixedCommand::new(&[
			"/provider/java",
			"-cp",
			"client.jar",
			"net.minecraft.client.main.Main",
			"--username",
			"Steve",
		]);

		let target = prepare_launch(&s.config, &s.accounts, &s.paths).unwrap();
		assert_eq!(target.game_dir, s.paths.game);
		let plan = plan_launch(target, &s.config, &provider, &mut s.o)
			.await
			.unwrap();
		assert_eq!(
			plan.command,
			vec![
				"java",
				"-Xmx2G",
				"-Xms1G",
				"-cp",
				"client.jar",
				"net.minecraft.client.main.Main",
				"--username",
				"Steve",
			]
		);

		let calls = provider.calls.lock().unwrap();
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].0, "1.20.1");
		assert_eq!(calls[0].1, s.paths.game);
		assert_eq!(calls[0].2, IdentityOptions::offline("Steve"));
	}

	#[tokio::test]
	async fn test_plan_uses_version_dir_and_custom_java() {
		let mut s = setup();
		s.config.selected_version = Some("1.8.9".into());
		s.config.separate_version_dirs = true;
		s.config.java_path = Some("/opt/jdk8/bin/java".into());
		s.config.java_args = "-Xmx1G -XX:+UseG1GC".into();
		s.accounts
			.add_offline("Alex", &mut s.config, &mut s.o)
			.unwrap();
		let provider = FixedCommand::new(&["java", "Main"]);

		let target = prepare_launch(&s.config, &s.accounts, &s.paths).unwrap();
		assert_eq!(target.game_dir, s.paths.version_game_dir("1.8.9"));
		let plan = plan_launch(target, &s.config, &provider, &mut s.o)
			.await
			.unwrap();
		assert_eq!(
			plan.command,
			vec!["/opt/jdk8/bin/java", "-Xmx1G", "-XX:+UseG1GC", "Main"]
		);
	}

	#[tokio::test]
	async fn test_empty_provider_command() {
		let mut s = setup();
		s.config.selected_version = Some("1.20.1".into());
		s.accounts
			.add_offline("Steve", &mut s.config, &mut s.o)
			.unwrap();
		let provider = FixedCommand::new(&[]);

		let target = prepare_launch(&s.config, &s.accounts, &s.paths).unwrap();
		assert!(plan_launch(target, &s.config, &provider, &mut s.o)
			.await
			.is_err());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn test_launch_stopped_by_hotkey() {
		let mut s = setup();
		s.config.selected_version = Some("1.20.1".into());
		s.config.java_path = Some("sleep".into());
		s.config.java_args = String::new();
		s.accounts
			.add_offline("Steve", &mut s.config, &mut s.o)
			.unwrap();
		let provider = FixedCommand::new(&["java", "30"]);

		let start = std::time::Instant::now();
		let outcome = launch(
			&s.paths,
			&s.config,
			&s.accounts,
			&provider,
			Immediately,
			&mut s.o,
		)
		.await
		.unwrap();

		assert!(start.elapsed() < std::time::Duration::from_secs(10));
		assert!(outcome.stopped_by_hotkey);
		assert!(s.o.contains("Minecraft was closed"));
		assert!(s.paths.game.is_dir());
		assert_eq!(std::fs::read_dir(&s.paths.launch_logs).unwrap().count(), 1);
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn test_launch_exits_by_itself() {
		let mut s = setup();
		s.config.selected_version = Some("1.20.1".into());
		s.config.java_path = Some("sh".into());
		s.config.java_args = "-c".into();
		s.accounts
			.add_offline("Steve", &mut s.config, &mut s.o)
			.unwrap();
		let provider = FixedCommand::new(&["java", "echo playing; exit 4"]);

		let outcome = launch(&s.paths, &s.config, &s.accounts, &provider, Never, &mut s.o)
			.await
			.unwrap();

		assert!(!outcome.stopped_by_hotkey);
		assert_eq!(outcome.exit_code, Some(4));
		assert!(s.o.contains("code 4"));
		assert!(s.o.contains("Launching Minecraft"));

		let log = std::fs::read_dir(&s.paths.launch_logs)
			.unwrap()
			.next()
			.unwrap()
			.unwrap()
			.path();
		assert_eq!(std::fs::read_to_string(log).unwrap(), "playing\n");
	}
}
