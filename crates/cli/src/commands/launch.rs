use cobalt::core::io::java::find_system_java;
use cobalt::launch::prepare_launch;
use cobalt::shared::output::{CobaltOutput, MessageContents, MessageLevel};
use color_print::cformat;

use super::super::hotkey::StopKey;
use super::CmdData;

pub async fn launch(data: &mut CmdData) -> anyhow::Result<()> {
	let config = data.config();
	let accounts = data.accounts();

	// Settings are checked before looking for the provider so that the user
	// is told what to set up first
	prepare_launch(&config, &accounts, &data.paths)?;
	let provider = data.provider()?;

	let stop_key = StopKey::detect(data.interactive, &mut data.output);
	if let Some(name) = stop_key.name() {
		let notice = if stop_key.is_global() {
			cformat!("Press <s>{name}</> at any time to close the game")
		} else {
			cformat!("Press <s>{name}</> in this terminal to close the game")
		};
		data.output
			.display(MessageContents::Notice(notice), MessageLevel::Important);
	}
	let terminal = stop_key.terminal();

	let result = cobalt::launch::launch(
		&data.paths,
		&config,
		&accounts,
		&provider,
		stop_key,
		&mut data.output,
	)
	.await;
	// The watcher may still own the stop key if it did not finish in time
	terminal.release();
	result?;

	Ok(())
}

pub fn status(data: &mut CmdData) -> anyhow::Result<()> {
	let config = data.config();
	let accounts = data.accounts();

	let version = config
		.selected_version
		.clone()
		.unwrap_or_else(|| cformat!("<k!>none</>"));
	let account = match config.current_account {
		Some(id) => match accounts.get(id) {
			Some(account) => format!("{} ({})", account.username, account.kind),
			None => cformat!("<r>missing (ID {id})</>"),
		},
		None => cformat!("<k!>none</>"),
	};
	let java = match config.java_path() {
		Some(path) => path.to_string_lossy().to_string(),
		None => match find_system_java() {
			Some(path) => cformat!("{} <k!>(system)</>", path.display()),
			None => cformat!("<r>not found</> <k!>(install Java or set a path with 'java')</>"),
		},
	};
	let separate = if config.separate_version_dirs {
		"on"
	} else {
		"off"
	};

	let o = &mut data.output;
	o.display(
		MessageContents::Header("Status".into()),
		MessageLevel::Important,
	);
	o.start_section();
	let properties = [
		("Version", MessageContents::Simple(version)),
		("Account", MessageContents::Simple(account)),
		("Accounts", MessageContents::Simple(accounts.len().to_string())),
		("Java", MessageContents::Simple(java)),
		("Java arguments", MessageContents::Simple(config.java_args.clone())),
		("Separate folders", MessageContents::Simple(separate.into())),
		(
			"Game folder",
			MessageContents::Copyable(
				config.active_game_dir(&data.paths).to_string_lossy().into(),
			),
		),
		(
			"Launcher folder",
			MessageContents::Copyable(data.paths.data.to_string_lossy().into()),
		),
	];
	for (key, value) in properties {
		o.display(
			MessageContents::Property(key.into(), Box::new(value)),
			MessageLevel::Important,
		);
	}
	o.end_section();

	Ok(())
}
