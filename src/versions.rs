use std::path::Path;

use anyhow::{bail, Context};
use cobalt_core::{GameProvider, Paths, VersionEntry, VersionType};
use cobalt_shared::output::{CobaltOutput, MessageContents, MessageLevel};

use crate::config::LauncherConfig;

/// Get the versions of one type from a catalog, oldest first. The provider
/// lists versions newest first, so the order is reversed
pub fn filter_versions(versions: &[VersionEntry], ty: VersionType) -> Vec<&VersionEntry> {
	versions.iter().rev().filter(|x| x.ty == ty).collect()
}

/// Ask the provider for the versions of one type, oldest first
pub async fn list_versions_of_type(
	provider: &dyn GameProvider,
	root: &Path,
	ty: VersionType,
) -> anyhow::Result<Vec<VersionEntry>> {
	let versions = provider
		.list_versions(root)
		.await
		.context("Failed to get the list of versions")?;

	Ok(filter_versions(&versions, ty).into_iter().cloned().collect())
}

/// Install a version with the provider and select it. The selection is only
/// changed if the install succeeded
pub async fn install_version(
	version: &str,
	config: &mut LauncherConfig,
	paths: &Paths,
	provider: &dyn GameProvider,
	o: &mut impl CobaltOutput,
) -> anyhow::Result<()> {
	let version = version.trim();
	if version.is_empty() {
		bail!("Version cannot be empty");
	}

	let dir = config.game_dir_for(version, paths);
	o.display(
		MessageContents::StartProcess(format!("Installing version {version}")),
		MessageLevel::Important,
	);
	o.display(
		MessageContents::Property(
			"Install directory".into(),
			Box::new(MessageContents::Copyable(dir.to_string_lossy().into())),
		),
		MessageLevel::Debug,
	);

	provider
		.install(version, &dir)
		.await
		.with_context(|| format!("Failed to install version {version}"))?;

	config.selected_version = Some(version.to_string());
	config.save(paths)?;

	o.display(
		MessageContents::Success(format!("Version {version} was installed")),
		MessageLevel::Important,
	);

	Ok(())
}

/// Title for a list of versions of a type
pub fn version_type_title(ty: VersionType) -> &'static str {
	match ty {
		VersionType::Release => "Releases",
		VersionType::Snapshot => "Snapshots",
		VersionType::OldBeta => "Beta versions",
		VersionType::OldAlpha => "Alpha versions",
		VersionType::Other => "Other versions",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::path::PathBuf;
	use std::sync::Mutex;

	use async_trait::async_trait;
	use cobalt_core::IdentityOptions;
	use cobalt_shared::output::Recorder;

	fn entry(id: &str, ty: VersionType) -> VersionEntry {
		VersionEntry { id: id.into(), ty }
	}

	fn catalog() -> Vec<VersionEntry> {
		vec![
			entry("1.20.1", VersionType::Release),
			entry("23w31a", VersionType::Snapshot),
			entry("1.20", VersionType::Release),
			entry("1.19.4", VersionType::Release),
			entry("b1.7.3", VersionType::OldBeta),
			entry("a1.2.6", VersionType::OldAlpha),
		]
	}

	#[derive(Default)]
	struct Catalog {
		roots: Mutex<Vec<PathBuf>>,
		installs: Mutex<Vec<(String, PathBuf)>>,
		fail_install: bool,
	}

	#[async_trait]
	impl GameProvider for Catalog {
		async fn list_versions(&self, root: &Path) -> anyhow::Result<Vec<VersionEntry>> {
			self.roots.lock().unwrap().push(root.to_path_buf());
			Ok(catalog())
		}

		async fn install(&self, version: &str, dir: &Path) -> anyhow::Result<()> {
			if self.fail_install {
				bail!("download failed");
			}
			self.installs
				.lock()
				.unwrap()
				.push((version.to_string(), dir.to_path_buf()));
			Ok(())
		}

		async fn build_command(
			&self,
			_version: &str,
			_dir: &Path,
			_identity: &IdentityOptions,
		) -> anyhow::Result<Vec<String>> {
			unimplemented!()
		}
	}

	#[test]
	fn test_filter_versions() {
		let catalog = catalog();
		let ids: Vec<&str> = filter_versions(&catalog, VersionType::Release)
			.iter()
			.map(|x| x.id.as_str())
			.collect();
		assert_eq!(ids, vec!["1.19.4", "1.20", "1.20.1"]);
		assert!(filter_versions(&catalog, VersionType::Other).is_empty());
	}

	#[tokio::test]
	async fn test_list_versions_of_type() {
		let provider = Catalog::default();
		let root = Path::new("/home/steve/.minecraft");
		let versions = list_versions_of_type(&provider, root, VersionType::OldBeta)
			.await
			.unwrap();
		assert_eq!(versions, vec![entry("b1.7.3", VersionType::OldBeta)]);
		assert_eq!(*provider.roots.lock().unwrap(), vec![root.to_path_buf()]);
	}

	#[tokio::test]
	async fn test_install_selects_version() {
		let dir = tempfile::tempdir().unwrap();
		let paths =
			Paths::from_roots(dir.path().to_path_buf(), dir.path().join("Desktop")).unwrap();
		let mut o = Recorder::default();
		let mut config = LauncherConfig::default();
		config.separate_version_dirs = true;
		let provider = Catalog::default();

		install_version("1.20.1", &mut config, &paths, &provider, &mut o)
			.await
			.unwrap();
		assert_eq!(config.selected_version.as_deref(), Some("1.20.1"));
		assert_eq!(
			*provider.installs.lock().unwrap(),
			vec![("1.20.1".to_string(), paths.version_game_dir("1.20.1"))]
		);
		let saved = LauncherConfig::load(&paths, &mut o);
		assert_eq!(saved.selected_version.as_deref(), Some("1.20.1"));
		assert!(o.contains("was installed"));
	}

	#[tokio::test]
	async fn test_failed_install_keeps_selection() {
		let dir = tempfile::tempdir().unwrap();
		let paths =
			Paths::from_roots(dir.path().to_path_buf(), dir.path().join("Desktop")).unwrap();
		let mut o = Recorder::default();
		let mut config = LauncherConfig::default();
		config.selected_version = Some("1.19.4".into());
		let provider = Catalog {
			fail_install: true,
			..Default::default()
		};

		let err = install_version("1.20.1", &mut config, &paths, &provider, &mut o)
			.await
			.unwrap_err();
		assert!(format!("{err:?}").contains("download failed"));
		assert_eq!(config.selected_version.as_deref(), Some("1.19.4"));
		assert!(!paths.config_file().exists());
	}
}
