/// Provider that runs an external installer program
pub mod external;

use std::fmt::Display;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use external::ExternalProvider;

/// Something that knows the catalog of game versions, can install them, and
/// can produce the command that runs an installed version
#[async_trait]
pub trait GameProvider: Send + Sync {
	/// List the versions that are available to install, newest first
	async fn list_versions(&self, root: &Path) -> anyhow::Result<Vec<VersionEntry>>;

	/// Install a version into a game directory
	async fn install(&self, version: &str, dir: &Path) -> anyhow::Result<()>;

	/// Build the full command that launches an installed version. The first
	/// element is the provider's choice of Java executable
	async fn build_command(
		&self,
		version: &str,
		dir: &Path,
		identity: &IdentityOptions,
	) -> anyhow::Result<Vec<String>>;
}

/// Entry for a version in the provider's catalog
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
	/// The identifier for the version (e.g. "1.19.2" or "22w13a")
	pub id: String,
	/// What type of version this is
	#[serde(rename = "type")]
	#[serde(default)]
	pub ty: VersionType,
}

/// Type of a version in the catalog
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
	/// A release version
	#[default]
	Release,
	/// A snapshot / development version
	Snapshot,
	/// An old beta version
	OldBeta,
	/// An old alpha version
	OldAlpha,
	/// Any other kind of version, such as a modded one
	#[serde(other)]
	Other,
}

impl Display for VersionType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}",
			match self {
				Self::Release => "release",
				Self::Snapshot => "snapshot",
				Self::OldBeta => "old_beta",
				Self::OldAlpha => "old_alpha",
				Self::Other => "other",
			}
		)
	}
}

/// Identity of the player that is passed to the game
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOptions {
	/// The player's username
	pub username: String,
	/// The player's UUID. Empty for offline players
	pub uuid: String,
	/// The access token. Empty for offline players
	pub token: String,
}

impl IdentityOptions {
	/// Identity for an offline player, which is only a name
	pub fn offline(username: &str) -> Self {
		Self {
			username: username.to_string(),
			uuid: String::new(),
			token: String::new(),
		}
	}
}

/// Errors from a provider
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
	/// The provider program could not be found
	#[error("Provider program '{0}' was not found. Set the COBALT_PROVIDER environment variable to its path")]
	NotFound(String),
	/// The provider ran but reported a failure
	#[error("Provider failed to {operation}: {message}")]
	Failed {
		/// What the provider was asked to do
		operation: &'static str,
		/// What the provider said
		message: String,
	},
	/// The provider returned something that could not be understood
	#[error("Provider returned invalid output for {operation}: {message}")]
	InvalidOutput {
		/// What the provider was asked to do
		operation: &'static str,
		/// Why the output was rejected
		message: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_version_entry_deser() {
		let text = r#"[
			{"id": "1.20.1", "type": "release"},
			{"id": "23w31a", "type": "snapshot"},
			{"id": "b1.7.3", "type": "old_beta"},
			{"id": "a1.2.6", "type": "old_alpha"},
			{"id": "fabric-loader-0.14.21-1.20.1", "type": "modified"},
			{"id": "1.8.9"}
		]"#;
		let versions: Vec<VersionEntry> = serde_json::from_str(text).unwrap();
		let types: Vec<VersionType> = versions.iter().map(|x| x.ty).collect();
		assert_eq!(
			types,
			vec![
				VersionType::Release,
				VersionType::Snapshot,
				VersionType::OldBeta,
				VersionType::OldAlpha,
				VersionType::Other,
				VersionType::Release,
			]
		);
	}

	#[test]
	fn test_offline_identity() {
		let identity = IdentityOptions::offline("Steve");
		assert_eq!(identity.username, "Steve");
		assert!(identity.uuid.is_empty());
		assert!(identity.token.is_empty());
	}
}
