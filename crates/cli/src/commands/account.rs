use std::fmt::Display;

use anyhow::Context;
use cobalt::accounts::{Account, AccountStore};
use cobalt::config::LauncherConfig;
use cobalt::shared::output::{CobaltOutput, MessageContents, MessageLevel};
use inquire::{Confirm, Select, Text};

use super::CmdData;

/// How many accounts are shown on one page of a list
const PAGE_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
	View,
	Add,
	Delete,
	Choose,
	Back,
}

impl Display for MenuAction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::View => write!(f, "View accounts"),
			Self::Add => write!(f, "Add an offline account"),
			Self::Delete => write!(f, "Delete an account"),
			Self::Choose => write!(f, "Choose the current account"),
			Self::Back => write!(f, "Back"),
		}
	}
}

/// An account in a selection list
struct AccountOption<'a> {
	account: &'a Account,
	current: bool,
}

impl Display for AccountOption<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:3}. {}", self.account.id, self.account.username)?;
		if self.current {
			write!(f, " (current)")?;
		}
		Ok(())
	}
}

/// Run the account menu until the user goes back
pub fn run(data: &mut CmdData) -> anyhow::Result<()> {
	let mut config = data.config();
	let mut accounts = data.accounts();

	if accounts.is_empty() {
		data.output.display(
			MessageContents::Warning("No accounts found".into()),
			MessageLevel::Important,
		);
		let add = Confirm::new("Add an offline account now?")
			.with_default(true)
			.prompt()?;
		if add {
			add_account(data, &mut accounts, &mut config)?;
		}
	}

	let actions = vec![
		MenuAction::View,
		MenuAction::Add,
		MenuAction::Delete,
		MenuAction::Choose,
		MenuAction::Back,
	];
	loop {
		let action = Select::new("Accounts", actions.clone()).prompt_skippable()?;
		match action {
			Some(MenuAction::View) => view_accounts(data, &accounts, &config)?,
			Some(MenuAction::Add) => add_account(data, &mut accounts, &mut config)?,
			Some(MenuAction::Delete) => delete_account(data, &mut accounts, &mut config)?,
			Some(MenuAction::Choose) => choose_account(data, &accounts, &mut config)?,
			Some(MenuAction::Back) | None => break,
		}
	}

	Ok(())
}

fn view_accounts(
	data: &mut CmdData,
	accounts: &AccountStore,
	config: &LauncherConfig,
) -> anyhow::Result<()> {
	let Some(account) = pick_account(data, accounts, config, "Choose an account to view")? else {
		return Ok(());
	};

	let o = &mut data.output;
	o.display(
		MessageContents::Header(account.username.clone()),
		MessageLevel::Important,
	);
	o.start_section();
	for (key, value) in [
		("Name", account.username.clone()),
		("Type", account.kind.to_string()),
		("ID", account.id.to_string()),
		("Created", account.created_at.format("%Y-%m-%d %H:%M").to_string()),
	] {
		o.display(
			MessageContents::Property(key.into(), Box::new(MessageContents::Simple(value))),
			MessageLevel::Important,
		);
	}
	o.end_section();

	Ok(())
}

fn add_account(
	data: &mut CmdData,
	accounts: &mut AccountStore,
	config: &mut LauncherConfig,
) -> anyhow::Result<()> {
	let Some(username) = Text::new("Username:").prompt_skippable()? else {
		return Ok(());
	};
	if username.trim().is_empty() {
		data.output.display(
			MessageContents::Error("Username cannot be empty".into()),
			MessageLevel::Important,
		);
		return Ok(());
	}

	let account = accounts.add_offline(&username, config, &mut data.output)?;
	let message = format!(
		"Account '{}' was added with ID {}",
		account.username, account.id
	);
	accounts.save(&data.paths)?;
	config.save(&data.paths)?;

	data.output
		.display(MessageContents::Success(message), MessageLevel::Important);

	Ok(())
}

fn delete_account(
	data: &mut CmdData,
	accounts: &mut AccountStore,
	config: &mut LauncherConfig,
) -> anyhow::Result<()> {
	let Some(id) =
		pick_account(data, accounts, config, "Choose an account to delete")?.map(|x| x.id)
	else {
		return Ok(());
	};

	if accounts.remove(id, config) {
		accounts.save(&data.paths)?;
		config.save(&data.paths)?;
		data.output.display(
			MessageContents::Success("Account was deleted".into()),
			MessageLevel::Important,
		);
	} else {
		data.output.display(
			MessageContents::Error("Account not found".into()),
			MessageLevel::Important,
		);
	}

	Ok(())
}

fn choose_account(
	data: &mut CmdData,
	accounts: &AccountStore,
	config: &mut LauncherConfig,
) -> anyhow::Result<()> {
	let Some(id) =
		pick_account(data, accounts, config, "Choose the current account")?.map(|x| x.id)
	else {
		return Ok(());
	};

	let Some(account) = accounts.select(id, config) else {
		data.output.display(
			MessageContents::Error("Account not found".into()),
			MessageLevel::Important,
		);
		return Ok(());
	};
	let message = format!("Current account: {}", account.username);
	config.save(&data.paths)?;

	data.output
		.display(MessageContents::Success(message), MessageLevel::Important);

	Ok(())
}

/// Let the user pick an account from a paged list. Returns None if there
/// are no accounts or the user pressed Escape
fn pick_account<'a>(
	data: &mut CmdData,
	accounts: &'a AccountStore,
	config: &LauncherConfig,
	message: &str,
) -> anyhow::Result<Option<&'a Account>> {
	if accounts.is_empty() {
		data.output.display(
			MessageContents::Warning("No accounts found".into()),
			MessageLevel::Important,
		);
		return Ok(None);
	}

	let options = accounts
		.iter()
		.map(|account| AccountOption {
			account,
			current: config.current_account == Some(account.id),
		})
		.collect();
	let selection = Select::new(message, options)
		.with_page_size(PAGE_SIZE)
		.prompt_skippable()
		.context("Failed to choose an account")?;

	Ok(selection.map(|x| x.account))
}

#[cfg(test)]
mod tests {
	use super::*;

	use chrono::NaiveDate;
	use cobalt::accounts::AccountKind;

	#[test]
	fn test_account_option_display() {
		let account = Account {
			id: 7,
			username: "Steve".into(),
			kind: AccountKind::Offline,
			created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
				.unwrap()
				.and_hms_opt(0, 0, 0)
				.unwrap(),
		};
		let option = AccountOption {
			account: &account,
			current: false,
		};
		assert_eq!(option.to_string(), "  7. Steve");
		let option = AccountOption {
			account: &account,
			current: true,
		};
		assert_eq!(option.to_string(), "  7. Steve (current)");
	}
}
