use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Trait for a type that can show information about launcher operations to the user
pub trait CobaltOutput {
	/// Base function for a simple message. Used as a fallback
	fn display_text(&mut self, text: String, level: MessageLevel);

	/// Function to display a message to the user
	fn display_message(&mut self, message: Message) {
		self.display_text(message.contents.default_format(), message.level);
	}

	/// Convenience function to remove the need to construct a message
	fn display(&mut self, contents: MessageContents, level: MessageLevel) {
		self.display_message(Message { contents, level })
	}

	/// Start a process of multiple messages. Implementations can use this to replace a line
	/// multiple times
	fn start_process(&mut self) {}

	/// End an existing process
	fn end_process(&mut self) {}

	/// Start a new section / level of hierarchy. Implementations can use this to set the indent level
	fn start_section(&mut self) {}

	/// End the current section and go down a level of hierarchy
	fn end_section(&mut self) {}

	/// Offer a confirmation / yes no prompt to the user.
	/// The default is the default value of the prompt.
	fn prompt_yes_no(&mut self, default: bool, message: MessageContents) -> anyhow::Result<bool> {
		let _message = message;
		Ok(default)
	}

	/// Offer a free text prompt to the user
	fn prompt_text(&mut self, message: MessageContents) -> anyhow::Result<String> {
		let _ = message;
		bail!("No text prompt available")
	}
}

/// A message supplied to the output
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
	/// The contents of the message
	pub contents: MessageContents,
	/// The printing level of the message
	pub level: MessageLevel,
}

/// Contents of a message. Different types represent different formatting
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum MessageContents {
	/// Simple message with no formatting
	Simple(String),
	/// An important notice to the user
	Notice(String),
	/// A warning to the user
	Warning(String),
	/// An error
	Error(String),
	/// A success / finish message
	Success(String),
	/// A key-value property
	Property(String, Box<MessageContents>),
	/// A header / big message
	Header(String),
	/// An start of some long running process. Usually ends with ...
	StartProcess(String),
	/// A hyperlink
	Hyperlink(String),
	/// An item in an unordered list
	ListItem(Box<MessageContents>),
	/// Text that can be copied, such as a file path
	Copyable(String),
}

impl MessageContents {
	/// Message formatting for the default implementation
	pub fn default_format(self) -> String {
		match self {
			MessageContents::Simple(text)
			| MessageContents::Success(text)
			| MessageContents::Hyperlink(text)
			| MessageContents::Copyable(text) => text,
			MessageContents::Notice(text) => format!("Notice: {text}"),
			MessageContents::Warning(text) => format!("Warning: {text}"),
			MessageContents::Error(text) => format!("Error: {text}"),
			MessageContents::Property(key, value) => {
				format!("{key}: {}", value.default_format())
			}
			MessageContents::Header(text) => text.to_uppercase(),
			MessageContents::StartProcess(text) => format!("{text}..."),
			MessageContents::ListItem(item) => format!(" - {}", item.default_format()),
		}
	}
}

/// The level of logging that a message has
#[derive(Copy, Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
	/// Messages that should always be displayed
	Important,
	/// Messages that can be displayed but are not required
	Extra,
	/// Debug-level messages. Good for logging but should not be displayed to
	/// the user unless they ask
	Debug,
	/// Very Debug-level messages. Should only be used for logging
	Trace,
}

impl MessageLevel {
	/// Checks if this level is at least another level
	pub fn at_least(&self, other: &Self) -> bool {
		match &self {
			Self::Important => matches!(
				other,
				Self::Important | Self::Extra | Self::Debug | Self::Trace
			),
			Self::Extra => matches!(other, Self::Extra | Self::Debug | Self::Trace),
			Self::Debug => matches!(other, Self::Debug | Self::Trace),
			Self::Trace => matches!(other, Self::Trace),
		}
	}
}

/// CobaltOutput that keeps every message in memory. Useful for checking what
/// an operation reported
#[derive(Default, Debug)]
pub struct Recorder {
	/// The formatted messages, in order, with their levels
	pub messages: Vec<(MessageLevel, String)>,
}

impl Recorder {
	/// Checks if any recorded message contains a piece of text
	pub fn contains(&self, text: &str) -> bool {
		self.messages.iter().any(|(_, msg)| msg.contains(text))
	}
}

impl CobaltOutput for Recorder {
	fn display_text(&mut self, text: String, level: MessageLevel) {
		self.messages.push((level, text));
	}
}

/// RAII struct that opens and closes an output process
pub struct OutputProcess<'a, O: CobaltOutput>(pub &'a mut O);

impl<'a, O> OutputProcess<'a, O>
where
	O: CobaltOutput,
{
	/// Create a new OutputProcess from a CobaltOutput
	pub fn new(o: &'a mut O) -> Self {
		o.start_process();
		Self(o)
	}
}

impl<'a, O> Drop for OutputProcess<'a, O>
where
	O: CobaltOutput,
{
	fn drop(&mut self) {
		self.0.end_process();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_level_is_at_least() {
		assert!(MessageLevel::Extra.at_least(&MessageLevel::Debug));
		assert!(MessageLevel::Debug.at_least(&MessageLevel::Debug));
		assert!(!MessageLevel::Debug.at_least(&MessageLevel::Extra));
	}

	#[test]
	fn test_default_format() {
		let msg = MessageContents::Property(
			"Version".into(),
			Box::new(MessageContents::Simple("1.20.1".into())),
		);
		assert_eq!(msg.default_format(), "Version: 1.20.1");
		assert_eq!(
			MessageContents::ListItem(Box::new(MessageContents::Warning("careful".into())))
				.default_format(),
			" - Warning: careful"
		);
	}

	#[test]
	fn test_recorder() {
		let mut o = Recorder::default();
		o.display(
			MessageContents::Success("Account added".into()),
			MessageLevel::Important,
		);
		assert!(o.contains("Account added"));
		assert!(!o.contains("removed"));
	}
}
