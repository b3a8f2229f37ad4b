use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use chrono::NaiveDateTime;
use cobalt_core::io::files::{create_dir, files_recursive};
use itertools::Itertools;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Format of the timestamp in the names of backups and copied logs
pub const FILE_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Folders in the game directory that are put in backups
pub const BACKUP_FOLDERS: [&str; 6] = [
	"saves",
	"resourcepacks",
	"config",
	"shaderpacks",
	"schematics",
	"mods",
];

/// A folder inside the game directory that can be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFolder {
	/// Mod jars
	Mods,
	/// Resource packs
	ResourcePacks,
	/// Worlds
	Saves,
	/// Mod configuration
	Config,
	/// Building schematics
	Schematics,
}

impl GameFolder {
	/// The name of the folder on disk
	pub fn dir_name(&self) -> &'static str {
		match self {
			Self::Mods => "mods",
			Self::ResourcePacks => "resourcepacks",
			Self::Saves => "saves",
			Self::Config => "config",
			Self::Schematics => "schematics",
		}
	}

	/// The path to this folder in a game directory
	pub fn path_in(&self, game_dir: &Path) -> PathBuf {
		game_dir.join(self.dir_name())
	}
}

impl Display for GameFolder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.dir_name())
	}
}

/// Create a folder if it doesn't exist. Returns true if it was created
pub fn ensure_folder(path: &Path) -> anyhow::Result<bool> {
	if path.is_dir() {
		return Ok(false);
	}
	create_dir(path).with_context(|| format!("Failed to create folder {}", path.display()))?;
	Ok(true)
}

/// A finished backup
#[derive(Debug)]
pub struct Backup {
	/// The archive that was written
	pub path: PathBuf,
	/// How many files are in it
	pub file_count: usize,
}

/// Zip the player's data folders from the game directory into an archive in
/// the output directory. Folders that don't exist are skipped
pub fn create_backup(
	game_dir: &Path,
	out_dir: &Path,
	time: &NaiveDateTime,
) -> anyhow::Result<Backup> {
	create_dir(out_dir).context("Failed to create the backup directory")?;
	let path = out_dir.join(format!(
		"minecraft_backup_{}.zip",
		time.format(FILE_TIME_FORMAT)
	));

	let file = File::create(&path).context("Failed to create the backup file")?;
	let mut arc = ZipWriter::new(BufWriter::new(file));
	let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

	let mut file_count = 0;
	for folder in BACKUP_FOLDERS {
		let folder = game_dir.join(folder);
		if !folder.is_dir() {
			continue;
		}

		let files = files_recursive(&folder, game_dir)
			.with_context(|| format!("Failed to read folder {}", folder.display()))?;
		for rel_path in files {
			let name = rel_path
				.components()
				.map(|x| x.as_os_str().to_string_lossy())
				.join("/");
			let mut reader = File::open(game_dir.join(&rel_path))
				.with_context(|| format!("Failed to open {}", rel_path.display()))?;
			arc.start_file(name, options)
				.context("Failed to add file to the backup")?;
			std::io::copy(&mut reader, &mut arc)
				.with_context(|| format!("Failed to compress {}", rel_path.display()))?;
			file_count += 1;
		}
	}

	arc.finish().context("Failed to finish the backup")?;

	Ok(Backup { path, file_count })
}

/// Copy the newest log file of the game to the output directory. Returns
/// None if the game has no logs
pub fn copy_latest_log(
	game_dir: &Path,
	out_dir: &Path,
	time: &NaiveDateTime,
) -> anyhow::Result<Option<PathBuf>> {
	let Some(latest) = find_latest_log(&game_dir.join("logs"))? else {
		return Ok(None);
	};

	create_dir(out_dir).context("Failed to create the output directory")?;
	let dest = out_dir.join(format!(
		"minecraft_log_{}.log",
		time.format(FILE_TIME_FORMAT)
	));
	std::fs::copy(&latest, &dest)
		.with_context(|| format!("Failed to copy log {}", latest.display()))?;

	Ok(Some(dest))
}

/// Find the most recently modified .log or .txt file in a directory
fn find_latest_log(logs_dir: &Path) -> anyhow::Result<Option<PathBuf>> {
	if !logs_dir.is_dir() {
		return Ok(None);
	}

	let mut logs = Vec::new();
	for entry in std::fs::read_dir(logs_dir).context("Failed to read the logs folder")? {
		let path = entry?.path();
		let is_log = path
			.extension()
			.is_some_and(|x| x == "log" || x == "txt");
		if !is_log || !path.is_file() {
			continue;
		}
		let modified = path
			.metadata()
			.and_then(|x| x.modified())
			.unwrap_or(SystemTime::UNIX_EPOCH);
		logs.push((modified, path));
	}

	Ok(logs
		.into_iter()
		.max_by_key(|(modified, _)| *modified)
		.map(|(_, path)| path))
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::fs;
	use std::time::Duration;

	use chrono::NaiveDate;

	fn time() -> NaiveDateTime {
		NaiveDate::from_ymd_opt(2024, 5, 1)
			.unwrap()
			.and_hms_opt(12, 30, 5)
			.unwrap()
	}

	#[test]
	fn test_game_folder_paths() {
		let game = Path::new("/home/steve/.minecraft");
		assert_eq!(
			GameFolder::ResourcePacks.path_in(game),
			PathBuf::from("/home/steve/.minecraft/resourcepacks")
		);
		assert_eq!(GameFolder::Saves.to_string(), "saves");
	}

	#[test]
	fn test_ensure_folder() {
		let dir = tempfile::tempdir().unwrap();
		let path = GameFolder::Mods.path_in(dir.path());
		assert!(ensure_folder(&path).unwrap());
		assert!(path.is_dir());
		assert!(!ensure_folder(&path).unwrap());
	}

	#[test]
	fn test_backup() {
		let dir = tempfile::tempdir().unwrap();
		let game = dir.path().join(".minecraft");
		fs::create_dir_all(game.join("saves/world/region")).unwrap();
		fs::write(game.join("saves/world/level.dat"), "level").unwrap();
		fs::write(game.join("saves/world/region/r.0.0.mca"), "region").unwrap();
		fs::create_dir_all(game.join("mods")).unwrap();
		fs::write(game.join("mods/sodium.jar"), "jar").unwrap();
		fs::create_dir_all(game.join("versions")).unwrap();
		fs::write(game.join("versions/client.jar"), "not backed up").unwrap();

		let desktop = dir.path().join("Desktop");
		let backup = create_backup(&game, &desktop, &time()).unwrap();
		assert_eq!(backup.file_count, 3);
		assert_eq!(
			backup.path,
			desktop.join("minecraft_backup_20240501_123005.zip")
		);

		let mut arc = zip::ZipArchive::new(File::open(&backup.path).unwrap()).unwrap();
		let names: Vec<String> = arc.file_names().map(str::to_string).sorted().collect();
		assert_eq!(
			names,
			vec![
				"mods/sodium.jar",
				"saves/world/level.dat",
				"saves/world/region/r.0.0.mca",
			]
		);
		let mut contents = String::new();
		std::io::Read::read_to_string(
			&mut arc.by_name("saves/world/level.dat").unwrap(),
			&mut contents,
		)
		.unwrap();
		assert_eq!(contents, "level");
	}

	#[test]
	fn test_backup_of_empty_game_dir() {
		let dir = tempfile::tempdir().unwrap();
		let backup = create_backup(&dir.path().join(".minecraft"), dir.path(), &time()).unwrap();
		assert_eq!(backup.file_count, 0);
		assert!(backup.path.exists());
	}

	#[test]
	fn test_copy_latest_log() {
		let dir = tempfile::tempdir().unwrap();
		let game = dir.path().join(".minecraft");
		let desktop = dir.path().join("Desktop");
		assert_eq!(copy_latest_log(&game, &desktop, &time()).unwrap(), None);

		let logs = game.join("logs");
		fs::create_dir_all(&logs).unwrap();
		fs::write(logs.join("debug.log"), "old").unwrap();
		fs::write(logs.join("notes.md"), "ignored").unwrap();
		std::thread::sleep(Duration::from_millis(20));
		fs::write(logs.join("latest.log"), "new").unwrap();
		let newer = SystemTime::now() + Duration::from_secs(60);
		File::options()
			.write(true)
			.open(logs.join("latest.log"))
			.unwrap()
			.set_modified(newer)
			.unwrap();

		let copied = copy_latest_log(&game, &desktop, &time()).unwrap().unwrap();
		assert_eq!(copied, desktop.join("minecraft_log_20240501_123005.log"));
		assert_eq!(fs::read_to_string(copied).unwrap(), "new");
	}
}
