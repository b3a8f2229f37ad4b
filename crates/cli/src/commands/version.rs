use anyhow::Context;
use cobalt::core::VersionType;
use cobalt::shared::output::{CobaltOutput, MessageContents, MessageLevel, OutputProcess};
use cobalt::versions::{install_version, list_versions_of_type, version_type_title};
use inquire::{Confirm, Select};

use super::CmdData;

/// How many versions are shown on one page of a list
const PAGE_SIZE: usize = 15;

/// Show the versions of one type and offer to install the one that is picked
pub async fn list(data: &mut CmdData, ty: VersionType) -> anyhow::Result<()> {
	let provider = data.provider()?;

	let versions = {
		let process = OutputProcess::new(&mut data.output);
		process.0.display(
			MessageContents::StartProcess("Getting the list of versions".into()),
			MessageLevel::Important,
		);
		list_versions_of_type(&provider, &data.paths.game, ty).await?
	};

	if versions.is_empty() {
		data.output.display(
			MessageContents::Warning("No versions of this type were found".into()),
			MessageLevel::Important,
		);
		return Ok(());
	}

	let ids: Vec<String> = versions.into_iter().map(|x| x.id).collect();
	let title = format!("{} ({})", version_type_title(ty), ids.len());
	let Some(version) = Select::new(&title, ids)
		.with_page_size(PAGE_SIZE)
		.prompt_skippable()
		.context("Failed to choose a version")?
	else {
		return Ok(());
	};

	data.output.display(
		MessageContents::Property(
			"Selected version".into(),
			Box::new(MessageContents::Simple(version.clone())),
		),
		MessageLevel::Important,
	);

	let confirmed = Confirm::new(&format!("Install {version}?"))
		.with_default(true)
		.prompt()?;
	if confirmed {
		install(data, &version).await?;
	}

	Ok(())
}

/// Install a version by name and select it
pub async fn install(data: &mut CmdData, version: &str) -> anyhow::Result<()> {
	let provider = data.provider()?;
	let mut config = data.config();

	install_version(version, &mut config, &data.paths, &provider, &mut data.output).await
}
