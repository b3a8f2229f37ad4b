use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Utilities for dealing with the filesystem
pub mod files;
/// Java executables and arguments
pub mod java;

/// Reads JSON from a file with a buffer
pub fn json_from_file<D: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<D> {
	let file = BufReader::new(File::open(path).context("Failed to open file")?);
	Ok(serde_json::from_reader(file)?)
}

/// Writes JSON to a file with a buffer and pretty formatting
pub fn json_to_file_pretty<S: Serialize>(path: impl AsRef<Path>, data: &S) -> anyhow::Result<()> {
	let path = path.as_ref();
	files::create_leading_dirs(path).context("Failed to create parent directories")?;
	let mut file = BufWriter::new(File::create(path).context("Failed to open file")?);
	serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize data to file")?;
	file.flush().context("Failed to flush file")?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::collections::HashMap;

	#[test]
	fn test_json_file_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested/data.json");
		let mut data = HashMap::new();
		data.insert("hello".to_string(), 7);

		json_to_file_pretty(&path, &data).unwrap();
		let read: HashMap<String, i32> = json_from_file(&path).unwrap();
		assert_eq!(read, data);
	}
}
