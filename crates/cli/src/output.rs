use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use cobalt::core::Paths;
use cobalt::shared::output::{CobaltOutput, Message, MessageContents, MessageLevel};
use cobalt::shared::util::utc_timestamp;
use color_print::{cformat, cstr};
use inquire::{Confirm, Text};

/// A nice colored bullet point for terminal output
pub const HYPHEN_POINT: &str = cstr!("<k!> - </k!>");
/// Indentation for each section level
const INDENT: &str = "  ";

/// Output to the terminal that is also written to log files
pub struct TerminalOutput {
	level: MessageLevel,
	indent_level: u8,
	log_file: File,
	latest_log_file: File,
}

impl CobaltOutput for TerminalOutput {
	fn display_text(&mut self, text: String, level: MessageLevel) {
		let _ = self.log_message(&text, level);
		self.display_text_impl(text, level);
	}

	fn display_message(&mut self, message: Message) {
		let _ = self.log_message(
			&Self::format_message_log(message.contents.clone()),
			message.level,
		);
		self.display_text_impl(Self::format_message(message.contents), message.level);
	}

	fn start_section(&mut self) {
		self.indent_level = self.indent_level.saturating_add(1);
	}

	fn end_section(&mut self) {
		self.indent_level = self.indent_level.saturating_sub(1);
	}

	fn prompt_yes_no(&mut self, default: bool, message: MessageContents) -> anyhow::Result<bool> {
		let ans = Confirm::new(&Self::format_message(message))
			.with_default(default)
			.prompt()
			.context("Inquire prompt failed")?;

		Ok(ans)
	}

	fn prompt_text(&mut self, message: MessageContents) -> anyhow::Result<String> {
		let ans = Text::new(&Self::format_message(message))
			.prompt()
			.context("Inquire prompt failed")?;

		Ok(ans)
	}
}

impl TerminalOutput {
	pub fn new(paths: &Paths) -> anyhow::Result<Self> {
		let path = get_log_file_path(paths).context("Failed to get log file path")?;
		let file = File::create(path).context("Failed to open log file")?;
		let latest_file = File::create(get_latest_log_file_path(paths))
			.context("Failed to open latest.txt log file")?;
		Ok(Self {
			level: MessageLevel::Important,
			indent_level: 0,
			log_file: file,
			latest_log_file: latest_file,
		})
	}

	/// Display text
	fn display_text_impl(&mut self, text: String, level: MessageLevel) {
		if !level.at_least(&self.level) {
			return;
		}

		let indent = INDENT.repeat(self.indent_level.into());
		for line in text.lines() {
			println!("{indent}{line}");
		}
	}

	/// Formatting for messages
	fn format_message(contents: MessageContents) -> String {
		match contents {
			MessageContents::Simple(text) => text,
			MessageContents::Notice(text) => cformat!("<m>{}", text),
			MessageContents::Warning(text) => cformat!("<y><s>Warning:</> {}", text),
			MessageContents::Error(text) => cformat!("<r><s,u>Error:</> {}", text),
			MessageContents::Success(text) => cformat!("<g>{}", add_period(text)),
			MessageContents::Property(key, value) => {
				cformat!("<g>{}:</> {}", key, Self::format_message(*value))
			}
			MessageContents::Header(text) => cformat!("<c><s>{}", text),
			MessageContents::StartProcess(text) => cformat!("<c>{text}..."),
			MessageContents::Hyperlink(url) => cformat!("<b,u>{}", url),
			MessageContents::ListItem(item) => {
				HYPHEN_POINT.to_string() + &Self::format_message(*item)
			}
			MessageContents::Copyable(text) => cformat!("<u>{}", text),
			contents => contents.default_format(),
		}
	}

	/// Formatting for messages in the log file
	fn format_message_log(contents: MessageContents) -> String {
		match contents {
			MessageContents::Simple(text) => text,
			MessageContents::Notice(text) => format!("[NOTICE] {}", text),
			MessageContents::Warning(text) => format!("[WARN] {}", text),
			MessageContents::Error(text) => format!("[ERR] {}", text),
			MessageContents::Success(text) => format!("[SUCCESS] {}", add_period(text)),
			MessageContents::Property(key, value) => {
				format!("{}: {}", key, Self::format_message_log(*value))
			}
			MessageContents::Header(text) => format!("### {} ###", text),
			MessageContents::ListItem(item) => " - ".to_string() + &Self::format_message_log(*item),
			contents => contents.default_format(),
		}
	}

	/// Log a message to the log file
	pub fn log_message(&mut self, text: &str, level: MessageLevel) -> anyhow::Result<()> {
		let level_indicator = match level {
			MessageLevel::Important => "I",
			MessageLevel::Extra => "E",
			MessageLevel::Debug => "D",
			MessageLevel::Trace => "T",
		};
		writeln!(self.log_file, "[{level_indicator}] {text}")?;
		writeln!(self.latest_log_file, "[{level_indicator}] {text}")?;

		Ok(())
	}

	/// Set the log level of the output
	pub fn set_log_level(&mut self, level: MessageLevel) {
		self.level = level;
	}
}

/// Get the path to a log file
fn get_log_file_path(paths: &Paths) -> anyhow::Result<PathBuf> {
	Ok(paths.logs.join(format!("log-{}.txt", utc_timestamp()?)))
}

/// Get the path to the latest log file
fn get_latest_log_file_path(paths: &Paths) -> PathBuf {
	paths.logs.join("latest.txt")
}

/// Adds a period to the end of a string if it isn't punctuated already
fn add_period(string: String) -> String {
	if string.ends_with(['.', ',', ';', ':', '!', '?', ')']) {
		string
	} else {
		string + "."
	}
}
