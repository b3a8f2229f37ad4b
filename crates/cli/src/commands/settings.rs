use cobalt::shared::output::{CobaltOutput, MessageContents, MessageLevel};
use color_print::cformat;
use inquire::Text;

use super::super::output::HYPHEN_POINT;
use super::CmdData;

pub fn java_args(data: &mut CmdData) -> anyhow::Result<()> {
	let mut config = data.config();

	let o = &mut data.output;
	o.display(
		MessageContents::Property(
			"Current Java arguments".into(),
			Box::new(MessageContents::Copyable(config.java_args.clone())),
		),
		MessageLevel::Important,
	);
	print_examples(
		o,
		&[
			("-Xmx4G -Xms2G", "4 GB at most, 2 GB at least"),
			("-Xmx8G -Xms4G -XX:+UseG1GC", "with the G1 garbage collector"),
		],
	);

	let Some(args) = Text::new("New arguments (leave empty to cancel):").prompt_skippable()? else {
		return Ok(());
	};
	if !config.set_java_args(&args) {
		o.display(
			MessageContents::Simple("Arguments were not changed".into()),
			MessageLevel::Important,
		);
		return Ok(());
	}
	config.save(&data.paths)?;

	o.display(
		MessageContents::Success("Java arguments were updated".into()),
		MessageLevel::Important,
	);

	Ok(())
}

pub fn memory(data: &mut CmdData, gb: u8) -> anyhow::Result<()> {
	let mut config = data.config();
	config.set_memory(gb)?;
	config.save(&data.paths)?;

	data.output.display(
		MessageContents::Success(format!("Memory was set to {gb} GB")),
		MessageLevel::Important,
	);
	data.output.display(
		MessageContents::Property(
			"Java arguments".into(),
			Box::new(MessageContents::Copyable(config.java_args)),
		),
		MessageLevel::Debug,
	);

	Ok(())
}

pub fn java_path(data: &mut CmdData) -> anyhow::Result<()> {
	let mut config = data.config();

	let current = match config.java_path() {
		Some(path) => path.to_string_lossy().to_string(),
		None => "system Java".into(),
	};
	let o = &mut data.output;
	o.display(
		MessageContents::Property(
			"Current Java path".into(),
			Box::new(MessageContents::Copyable(current)),
		),
		MessageLevel::Important,
	);
	print_examples(
		o,
		&[
			(r"C:\Program Files\Java\jdk-17\bin\java.exe", "Windows"),
			("/usr/lib/jvm/java-17-openjdk/bin/java", "Linux"),
		],
	);

	let Some(path) =
		Text::new("New path (leave empty to use the system Java):").prompt_skippable()?
	else {
		return Ok(());
	};
	let exists = config.set_java_path(&path);
	config.save(&data.paths)?;

	match config.java_path() {
		Some(path) => {
			if !exists {
				o.display(
					MessageContents::Warning(format!(
						"The file {} does not exist. The game will not start until it does",
						path.display()
					)),
					MessageLevel::Important,
				);
			}
			o.display(
				MessageContents::Success("Java path was updated".into()),
				MessageLevel::Important,
			);
		}
		None => o.display(
			MessageContents::Success("Java path was reset. The system Java will be used".into()),
			MessageLevel::Important,
		),
	}

	Ok(())
}

pub fn separate_dirs(data: &mut CmdData) -> anyhow::Result<()> {
	let mut config = data.config();
	let enabled = config.toggle_separate_dirs();
	config.save(&data.paths)?;

	let o = &mut data.output;
	o.display(
		MessageContents::Property(
			"Separate folders for versions".into(),
			Box::new(MessageContents::Simple(cformat!(
				"<g>{}",
				if enabled { "on" } else { "off" }
			))),
		),
		MessageLevel::Important,
	);
	let message = if enabled {
		"Every version will now be installed in its own folder, like .minecraft_1.20.1"
	} else {
		"All versions will share the .minecraft folder"
	};
	o.display(
		MessageContents::Notice(message.into()),
		MessageLevel::Important,
	);

	Ok(())
}

fn print_examples(o: &mut impl CobaltOutput, examples: &[(&str, &str)]) {
	o.display(
		MessageContents::Simple(cformat!("<y>Examples:")),
		MessageLevel::Important,
	);
	for (example, description) in examples {
		o.display(
			MessageContents::Simple(cformat!(
				"{}<g>{}</> <k!>-</> {}",
				HYPHEN_POINT,
				example,
				description
			)),
			MessageLevel::Important,
		);
	}
}
