use crate::io::java::args::split_java_args;
use crate::provider::ProviderError;

/// Create the command that is actually run from the one the provider built.
/// The provider's own Java executable is replaced with ours and the Java
/// arguments are put right after it, before all of the provider's arguments
pub fn assemble_command(
	java: &str,
	java_args: &str,
	provider_command: &[String],
) -> anyhow::Result<Vec<String>> {
	let Some((_, provider_args)) = provider_command.split_first() else {
		return Err(ProviderError::InvalidOutput {
			operation: "build the launch command",
			message: "The command is empty".into(),
		}
		.into());
	};

	let mut out = Vec::with_capacity(provider_command.len() + 4);
	out.push(java.to_string());
	out.extend(split_java_args(java_args));
	out.extend(provider_args.iter().cloned());

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(|x| x.to_string()).collect()
	}

	#[test]
	fn test_assemble_command() {
		let provider = strings(&[
			"/opt/provider/java",
			"-Djava.library.path=natives",
			"-cp",
			"client.jar",
			"net.minecraft.client.main.Main",
		]);
		let command = assemble_command("java", "-Xmx2G -Xms1G", &provider).unwrap();
		assert_eq!(
			command,
			strings(&[
				"java",
				"-Xmx2G",
				"-Xms1G",
				"-Djava.library.path=natives",
				"-cp",
				"client.jar",
				"net.minecraft.client.main.Main",
			])
		);
	}

	#[test]
	fn test_assemble_without_java_args() {
		let provider = strings(&["java", "Main"]);
		let command = assemble_command("/usr/bin/java", "   ", &provider).unwrap();
		assert_eq!(command, strings(&["/usr/bin/java", "Main"]));
	}

	#[test]
	fn test_assemble_empty_provider_command() {
		assert!(assemble_command("java", "-Xmx2G", &[]).is_err());
	}
}
