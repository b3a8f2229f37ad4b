use std::fmt::Display;

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use cobalt_core::io::{json_from_file, json_to_file_pretty};
use cobalt_core::{IdentityOptions, Paths};
use cobalt_shared::output::{CobaltOutput, MessageContents, MessageLevel};
use serde::{Deserialize, Serialize};

use crate::config::LauncherConfig;

/// The longest username that the game accepts
pub const MAX_USERNAME_LENGTH: usize = 16;

/// A player account
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
	/// Unique ID of the account
	pub id: u32,
	/// The name the player has in game
	pub username: String,
	/// What kind of account this is
	#[serde(rename = "type")]
	pub kind: AccountKind,
	/// When the account was added, in local time
	pub created_at: NaiveDateTime,
}

impl Account {
	/// The identity that is given to the game for this account
	pub fn identity(&self) -> IdentityOptions {
		match self.kind {
			AccountKind::Offline => IdentityOptions::offline(&self.username),
		}
	}
}

/// Different kinds of accounts
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
	/// A local account without authentication
	Offline,
}

impl Display for AccountKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Offline => write!(f, "offline"),
		}
	}
}

/// Checks if the game would accept a username
pub fn is_valid_username(username: &str) -> bool {
	!username.is_empty()
		&& username.len() <= MAX_USERNAME_LENGTH
		&& username
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The list of accounts, in the order they were added
#[derive(Debug)]
pub struct AccountStore {
	accounts: Vec<Account>,
}

impl AccountStore {
	/// Open the accounts file. A missing or broken file gives an empty list
	pub fn open(paths: &Paths, o: &mut impl CobaltOutput) -> Self {
		let path = paths.accounts_file();
		let accounts = if path.exists() {
			match json_from_file(&path) {
				Ok(accounts) => accounts,
				Err(e) => {
					o.display(
						MessageContents::Simple(format!(
							"Accounts file is invalid and will be replaced: {e:?}"
						)),
						MessageLevel::Debug,
					);
					Vec::new()
				}
			}
		} else {
			Vec::new()
		};

		Self { accounts }
	}

	/// Write the accounts to their file
	pub fn save(&self, paths: &Paths) -> anyhow::Result<()> {
		json_to_file_pretty(paths.accounts_file(), &self.accounts)
			.context("Failed to write the accounts file")
	}

	/// Add an offline account and return it. The new account becomes the current
	/// one if no account is selected. Names that the game would reject are
	/// allowed with a warning
	pub fn add_offline(
		&mut self,
		username: &str,
		config: &mut LauncherConfig,
		o: &mut impl CobaltOutput,
	) -> anyhow::Result<&Account> {
		let username = username.trim();
		if username.is_empty() {
			bail!("Username cannot be empty");
		}
		if !is_valid_username(username) {
			o.display(
				MessageContents::Warning(format!(
					"The game may not accept the name '{username}'. Names should be at most {MAX_USERNAME_LENGTH} letters, digits, and underscores"
				)),
				MessageLevel::Important,
			);
		}

		let id = self.next_id(config);
		config.next_account_id = id + 1;
		self.accounts.push(Account {
			id,
			username: username.to_string(),
			kind: AccountKind::Offline,
			created_at: chrono::Local::now().naive_local(),
		});

		if config.current_account.is_none() {
			config.current_account = Some(id);
		}

		Ok(&self.accounts[self.accounts.len() - 1])
	}

	/// Remove an account. Returns false if there was no account with that ID.
	/// The current account is cleared if it was the one removed
	pub fn remove(&mut self, id: u32, config: &mut LauncherConfig) -> bool {
		let len = self.accounts.len();
		self.accounts.retain(|x| x.id != id);
		let removed = self.accounts.len() != len;

		if removed && config.current_account == Some(id) {
			config.current_account = None;
		}

		removed
	}

	/// Get an account by its ID
	pub fn get(&self, id: u32) -> Option<&Account> {
		self.accounts.iter().find(|x| x.id == id)
	}

	/// Make an account the current one. Returns the account, or None if it doesn't exist
	pub fn select(&self, id: u32, config: &mut LauncherConfig) -> Option<&Account> {
		let account = self.get(id)?;
		config.current_account = Some(account.id);
		Some(account)
	}

	/// Iterate over the accounts in order
	pub fn iter(&self) -> impl Iterator<Item = &Account> {
		self.accounts.iter()
	}

	/// The number of accounts
	pub fn len(&self) -> usize {
		self.accounts.len()
	}

	/// Whether there are no accounts
	pub fn is_empty(&self) -> bool {
		self.accounts.is_empty()
	}

	/// The next ID is past both the highest existing account and every ID
	/// that was ever handed out, so deleted IDs are never reused
	fn next_id(&self, config: &LauncherConfig) -> u32 {
		let after_existing = self.accounts.iter().map(|x| x.id).max().unwrap_or(0) + 1;
		after_existing.max(config.next_account_id).max(1)
	}
}
