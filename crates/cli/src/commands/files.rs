use std::path::Path;

use anyhow::Context;
use chrono::Local;
use cobalt::files::{copy_latest_log, create_backup, ensure_folder, GameFolder};
use cobalt::notes::{add_note as write_note, read_notes};
use cobalt::shared::output::{CobaltOutput, MessageContents, MessageLevel, OutputProcess};
use cobalt::shared::util::open_path;

use super::CmdData;

/// Open one of the folders in the game directory, creating it if needed
pub fn open_folder(data: &mut CmdData, folder: GameFolder) -> anyhow::Result<()> {
	let path = folder.path_in(&data.config().active_game_dir(&data.paths));
	if ensure_folder(&path)? {
		data.output.display(
			MessageContents::Simple(format!("The {folder} folder did not exist and was created")),
			MessageLevel::Important,
		);
	}

	open(data, &path, &format!("The {folder} folder"))
}

/// Open the game directory
pub fn open_game_dir(data: &mut CmdData) -> anyhow::Result<()> {
	let path = data.config().active_game_dir(&data.paths);
	ensure_folder(&path)?;

	open(data, &path, "The Minecraft folder")
}

fn open(data: &mut CmdData, path: &Path, name: &str) -> anyhow::Result<()> {
	let opened = open_path(path).context("Failed to open the folder")?;
	let message = if opened {
		MessageContents::Success(format!("{name} was opened"))
	} else {
		MessageContents::Warning(format!(
			"{name} can't be opened automatically on this system"
		))
	};
	data.output.display(message, MessageLevel::Important);
	data.output.display(
		MessageContents::Copyable(path.to_string_lossy().into()),
		MessageLevel::Important,
	);

	Ok(())
}

/// Copy the latest game log to the desktop
pub fn copy_log(data: &mut CmdData) -> anyhow::Result<()> {
	let game_dir = data.config().active_game_dir(&data.paths);
	let copied = copy_latest_log(&game_dir, &data.paths.desktop, &Local::now().naive_local())
		.context("Failed to copy the log")?;

	match copied {
		Some(path) => data.output.display(
			MessageContents::Property(
				"Log was copied to the desktop".into(),
				Box::new(MessageContents::Copyable(path.to_string_lossy().into())),
			),
			MessageLevel::Important,
		),
		None => data.output.display(
			MessageContents::Warning("No log files were found".into()),
			MessageLevel::Important,
		),
	}

	Ok(())
}

/// Back up the player's data to the desktop
pub fn backup(data: &mut CmdData) -> anyhow::Result<()> {
	let game_dir = data.config().active_game_dir(&data.paths);

	let backup = {
		let process = OutputProcess::new(&mut data.output);
		process.0.display(
			MessageContents::StartProcess("Creating a backup".into()),
			MessageLevel::Important,
		);
		create_backup(&game_dir, &data.paths.desktop, &Local::now().naive_local())
			.context("Failed to create the backup")?
	};

	let o = &mut data.output;
	o.display(
		MessageContents::Success("Backup was created".into()),
		MessageLevel::Important,
	);
	o.start_section();
	o.display(
		MessageContents::Property(
			"File".into(),
			Box::new(MessageContents::Copyable(backup.path.to_string_lossy().into())),
		),
		MessageLevel::Important,
	);
	o.display(
		MessageContents::Property(
			"Files saved".into(),
			Box::new(MessageContents::Simple(backup.file_count.to_string())),
		),
		MessageLevel::Important,
	);
	o.end_section();

	Ok(())
}

pub fn add_note(data: &mut CmdData, text: &str) -> anyhow::Result<()> {
	write_note(&data.paths, text)?;
	data.output.display(
		MessageContents::Success("Note was added".into()),
		MessageLevel::Important,
	);

	Ok(())
}

pub fn show_notes(data: &mut CmdData) -> anyhow::Result<()> {
	let notes = read_notes(&data.paths)?;
	let notes = notes.as_deref().map(str::trim_end).unwrap_or_default();
	if notes.is_empty() {
		data.output.display(
			MessageContents::Simple("There are no notes yet".into()),
			MessageLevel::Important,
		);
		return Ok(());
	}

	data.output.display(
		MessageContents::Header("Notes".into()),
		MessageLevel::Important,
	);
	data.output
		.display(MessageContents::Simple(notes.into()), MessageLevel::Important);

	Ok(())
}
