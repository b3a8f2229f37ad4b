mod commands;
mod hotkey;
mod output;

use anyhow::Context;
use commands::run_cli;

fn main() -> anyhow::Result<()> {
	let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
	let result = runtime.block_on(run_cli());
	// A line read from the input may still be blocking
	runtime.shutdown_background();
	result
}
