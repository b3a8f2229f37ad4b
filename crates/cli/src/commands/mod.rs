mod account;
mod files;
mod help;
mod launch;
mod settings;
mod version;

use std::io::{BufRead, IsTerminal};

use anyhow::Context;
use clap::{Parser, Subcommand};
use cobalt::accounts::AccountStore;
use cobalt::config::LauncherConfig;
use cobalt::core::provider::ExternalProvider;
use cobalt::core::{Paths, VersionType};
use cobalt::files::GameFolder;
use cobalt::shared::output::{CobaltOutput, MessageContents, MessageLevel};
use color_print::cformat;
use inquire::InquireError;

use super::output::TerminalOutput;

/// The words that start the two-word toggle for per-version directories
const SEPARATE_DIRS_PHRASE: &str = "отдельные папки";

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
	#[command(about = "Show the list of commands")]
	#[clap(alias = "помощь")]
	Help,
	#[command(about = "Manage accounts")]
	#[clap(aliases = ["акк", "acc"])]
	Accounts,
	#[command(about = "Show alpha versions")]
	#[clap(alias = "альфа")]
	Alpha,
	#[command(about = "Show beta versions")]
	#[clap(alias = "бета")]
	Beta,
	#[command(about = "Show snapshots")]
	#[clap(alias = "снапшоты")]
	Snapshots,
	#[command(about = "Show release versions")]
	#[clap(alias = "релизы")]
	Releases,
	#[command(about = "Install a version")]
	#[clap(alias = "установить")]
	Install {
		/// The version to install
		version: String,
	},
	#[command(about = "Launch Minecraft")]
	#[clap(aliases = ["запуск", "play"])]
	Launch,
	#[command(about = "Show the current settings")]
	#[clap(alias = "статус")]
	Status,
	#[command(about = "Set the Java arguments")]
	#[clap(alias = "арг")]
	Args,
	#[command(about = "Set the amount of memory for the game")]
	#[clap(alias = "память")]
	Memory {
		/// The amount of memory in gigabytes
		#[arg(value_parser = clap::value_parser!(u8).range(1..=32))]
		gb: u8,
	},
	#[command(about = "Set the path to Java")]
	#[clap(alias = "джава")]
	Java,
	#[command(about = "Turn separate folders for every version on or off")]
	SeparateDirs,
	#[command(about = "Open the mods folder")]
	#[clap(alias = "моды")]
	Mods,
	#[command(name = "resourcepacks", about = "Open the resource packs folder")]
	#[clap(alias = "ресурспак")]
	ResourcePacks,
	#[command(about = "Open the worlds folder")]
	#[clap(alias = "миры")]
	Saves,
	#[command(about = "Open the mod config folder")]
	#[clap(alias = "конфиги")]
	Configs,
	#[command(about = "Open the schematics folder")]
	#[clap(alias = "схемы")]
	Schematics,
	#[command(about = "Open the Minecraft folder")]
	#[clap(alias = "папка")]
	Folder,
	#[command(about = "Copy the latest game log to the desktop")]
	#[clap(alias = "лог")]
	Log,
	#[command(about = "Back up worlds and other data to the desktop")]
	#[clap(alias = "бэкап")]
	Backup,
	#[command(about = "Add a note")]
	#[clap(alias = "заметка")]
	Note {
		/// The text of the note
		#[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
		text: Vec<String>,
	},
	#[command(about = "Show all notes")]
	#[clap(alias = "заметки")]
	Notes,
	#[command(about = "Show useful links")]
	#[clap(alias = "инфо")]
	Info,
	#[command(about = "Leave the launcher")]
	#[clap(aliases = ["quit", "выход"])]
	Exit,
}

/// A single line typed at the prompt
#[derive(Debug, Parser)]
#[command(
	no_binary_name = true,
	disable_help_subcommand = true,
	disable_help_flag = true,
	disable_version_flag = true
)]
struct ReplLine {
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Parser)]
#[command(about = "A small text-console launcher for Minecraft", version)]
pub struct Cli {
	/// Show debug messages
	#[arg(short, long)]
	debug: bool,
	/// Show every message
	#[arg(short = 'D', long)]
	trace: bool,
}

/// Run the command line interface
pub async fn run_cli() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let mut data = CmdData::new().context("Failed to start the launcher")?;
	data.output.set_log_level(get_log_level(&cli));

	help::print_banner();

	loop {
		let line = match next_input(data.interactive).await? {
			Input::Line(line) => line,
			Input::Eof | Input::Interrupted => break,
		};

		let command = match parse_line(&line) {
			Ok(Some(command)) => command,
			Ok(None) => continue,
			Err(e) => {
				report_parse_error(&line, e, &mut data.output);
				continue;
			}
		};
		data.output.log_message(&format!("> {}", line.trim()), MessageLevel::Trace)?;

		if command == Command::Exit {
			break;
		}

		let result = tokio::select! {
			result = run_command(command, &mut data) => Some(result),
			_ = tokio::signal::ctrl_c() => None,
		};
		match result {
			Some(Ok(())) => {}
			Some(Err(e)) if is_interrupted(&e) => break,
			// Escape in a prompt goes back to the command line
			Some(Err(e)) if is_canceled(&e) => {}
			Some(Err(e)) => data.output.display(
				MessageContents::Error(format!("{e:?}")),
				MessageLevel::Important,
			),
			None => break,
		}
	}

	help::print_farewell();

	Ok(())
}

async fn run_command(command: Command, data: &mut CmdData) -> anyhow::Result<()> {
	match command {
		Command::Help => {
			help::print_help();
			Ok(())
		}
		Command::Accounts => account::run(data),
		Command::Alpha => version::list(data, VersionType::OldAlpha).await,
		Command::Beta => version::list(data, VersionType::OldBeta).await,
		Command::Snapshots => version::list(data, VersionType::Snapshot).await,
		Command::Releases => version::list(data, VersionType::Release).await,
		Command::Install { version } => version::install(data, &version).await,
		Command::Launch => launch::launch(data).await,
		Command::Status => launch::status(data),
		Command::Args => settings::java_args(data),
		Command::Memory { gb } => settings::memory(data, gb),
		Command::Java => settings::java_path(data),
		Command::SeparateDirs => settings::separate_dirs(data),
		Command::Mods => files::open_folder(data, GameFolder::Mods),
		Command::ResourcePacks => files::open_folder(data, GameFolder::ResourcePacks),
		Command::Saves => files::open_folder(data, GameFolder::Saves),
		Command::Configs => files::open_folder(data, GameFolder::Config),
		Command::Schematics => files::open_folder(data, GameFolder::Schematics),
		Command::Folder => files::open_game_dir(data),
		Command::Log => files::copy_log(data),
		Command::Backup => files::backup(data),
		Command::Note { text } => files::add_note(data, &text.join(" ")),
		Command::Notes => files::show_notes(data),
		Command::Info => {
			help::print_info();
			Ok(())
		}
		Command::Exit => Ok(()),
	}
}

/// Parse a line from the prompt. Returns None for an empty line
fn parse_line(line: &str) -> Result<Option<Command>, clap::Error> {
	let line = line.trim();
	if line.is_empty() {
		return Ok(None);
	}

	let mut words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
	if words.len() == 2 && words.join(" ").to_lowercase() == SEPARATE_DIRS_PHRASE {
		return Ok(Some(Command::SeparateDirs));
	}
	words[0] = words[0].to_lowercase();

	ReplLine::try_parse_from(words).map(|x| Some(x.command))
}

fn report_parse_error(line: &str, error: clap::Error, o: &mut TerminalOutput) {
	let message = match error.kind() {
		clap::error::ErrorKind::InvalidSubcommand => {
			let cmd = line.split_whitespace().next().unwrap_or_default();
			format!("Unknown command: {cmd}")
		}
		_ => error
			.to_string()
			.trim()
			.trim_start_matches("error: ")
			.to_string(),
	};
	o.display(MessageContents::Error(message), MessageLevel::Important);
	o.display(
		MessageContents::Simple(cformat!("Type '<g>help</>' for the list of commands")),
		MessageLevel::Important,
	);
}

/// Get the log level based on the debug options
fn get_log_level(cli: &Cli) -> MessageLevel {
	if cli.trace {
		MessageLevel::Trace
	} else if cli.debug {
		MessageLevel::Debug
	} else {
		MessageLevel::Important
	}
}

/// Something read from the command line
enum Input {
	Line(String),
	Eof,
	Interrupted,
}

/// Read the next line, stopping early if Ctrl+C is pressed
async fn next_input(interactive: bool) -> anyhow::Result<Input> {
	let read = tokio::task::spawn_blocking(move || read_line(interactive));
	tokio::select! {
		input = read => input.context("Input reader stopped unexpectedly")?,
		_ = tokio::signal::ctrl_c() => Ok(Input::Interrupted),
	}
}

fn read_line(interactive: bool) -> anyhow::Result<Input> {
	if interactive {
		match inquire::Text::new("cobalt>").prompt() {
			Ok(line) => Ok(Input::Line(line)),
			Err(InquireError::OperationInterrupted) => Ok(Input::Interrupted),
			Err(InquireError::OperationCanceled) => Ok(Input::Line(String::new())),
			Err(e) => Err(e).context("Failed to read the command"),
		}
	} else {
		let mut line = String::new();
		let count = std::io::stdin()
			.lock()
			.read_line(&mut line)
			.context("Failed to read the command")?;
		if count == 0 {
			Ok(Input::Eof)
		} else {
			Ok(Input::Line(line))
		}
	}
}

/// Checks if an error came from Ctrl+C in a prompt
fn is_interrupted(error: &anyhow::Error) -> bool {
	error.chain().any(|x| {
		matches!(
			x.downcast_ref::<InquireError>(),
			Some(InquireError::OperationInterrupted)
		)
	})
}

/// Checks if an error came from Escape in a prompt
fn is_canceled(error: &anyhow::Error) -> bool {
	error.chain().any(|x| {
		matches!(
			x.downcast_ref::<InquireError>(),
			Some(InquireError::OperationCanceled)
		)
	})
}

/// Data passed to commands
pub struct CmdData {
	pub paths: Paths,
	pub output: TerminalOutput,
	/// Whether the input is a terminal that prompts and the stop key can use
	pub interactive: bool,
	provider: Option<ExternalProvider>,
}

impl CmdData {
	pub fn new() -> anyhow::Result<Self> {
		let paths = Paths::new().context("Failed to set up system paths")?;
		let output = TerminalOutput::new(&paths).context("Failed to set up output")?;
		Ok(Self {
			paths,
			output,
			interactive: std::io::stdin().is_terminal(),
			provider: None,
		})
	}

	/// Load the launcher config from its file
	pub fn config(&mut self) -> LauncherConfig {
		LauncherConfig::load(&self.paths, &mut self.output)
	}

	/// Load the accounts from their file
	pub fn accounts(&mut self) -> AccountStore {
		AccountStore::open(&self.paths, &mut self.output)
	}

	/// Find the provider program the first time it is needed
	pub fn provider(&mut self) -> anyhow::Result<ExternalProvider> {
		if let Some(provider) = &self.provider {
			return Ok(provider.clone());
		}

		let provider = ExternalProvider::from_env()?
			.with_launcher_version(env!("CARGO_PKG_VERSION"));
		self.output.display(
			MessageContents::Property(
				"Provider".into(),
				Box::new(MessageContents::Copyable(
					provider.program().to_string_lossy().into(),
				)),
			),
			MessageLevel::Debug,
		);
		self.provider = Some(provider.clone());

		Ok(provider)
	}
}
