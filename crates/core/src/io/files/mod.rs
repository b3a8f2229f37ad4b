/// The launcher's directories and files
pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

/// Create a directory that may already exist without an error
pub fn create_dir(path: &Path) -> std::io::Result<()> {
	if path.exists() {
		Ok(())
	} else {
		fs::create_dir_all(path)
	}
}

/// Create all the directories leading up to a path
pub fn create_leading_dirs(path: &Path) -> std::io::Result<()> {
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}

	Ok(())
}

/// Gets the paths of all files inside a directory recursively. The returned paths
/// are relative to the base directory
pub fn files_recursive(dir: &Path, base: &Path) -> std::io::Result<Vec<PathBuf>> {
	let mut out = Vec::new();
	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_dir() {
			out.extend(files_recursive(&path, base)?);
		} else if let Ok(rel) = path.strip_prefix(base) {
			out.push(rel.to_path_buf());
		}
	}
	out.sort();

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_files_recursive() {
		let dir = tempfile::tempdir().unwrap();
		let base = dir.path();
		fs::create_dir_all(base.join("saves/world/region")).unwrap();
		fs::write(base.join("saves/world/level.dat"), "a").unwrap();
		fs::write(base.join("saves/world/region/r.0.0.mca"), "b").unwrap();

		let files = files_recursive(&base.join("saves"), base).unwrap();
		assert_eq!(
			files,
			vec![
				PathBuf::from("saves/world/level.dat"),
				PathBuf::from("saves/world/region/r.0.0.mca"),
			]
		);
	}
}
