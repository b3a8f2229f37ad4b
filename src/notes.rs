use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{bail, Context};
use chrono::{Local, NaiveDateTime};
use cobalt_core::Paths;

/// Format of the time at the start of every note
pub const NOTE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a note as a line in the notes file
pub fn format_note(time: &NaiveDateTime, text: &str) -> String {
	format!("{}: {text}\n", time.format(NOTE_TIME_FORMAT))
}

/// Add a note to the end of the notes file
pub fn add_note(paths: &Paths, text: &str) -> anyhow::Result<()> {
	let text = text.trim();
	if text.is_empty() {
		bail!("Note cannot be empty");
	}

	let mut file = OpenOptions::new()
		.create(true)
		.append(true)
		.open(paths.notes_file())
		.context("Failed to open the notes file")?;
	let line = format_note(&Local::now().naive_local(), text);
	file.write_all(line.as_bytes())
		.context("Failed to write the note")?;

	Ok(())
}

/// Read all of the notes. Returns None if no note has been written yet
pub fn read_notes(paths: &Paths) -> anyhow::Result<Option<String>> {
	let path = paths.notes_file();
	if !path.exists() {
		return Ok(None);
	}

	let text = std::fs::read_to_string(path).context("Failed to read the notes file")?;
	Ok(Some(text))
}
