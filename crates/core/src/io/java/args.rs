use std::fmt::Display;
use std::sync::OnceLock;

use anyhow::ensure;
use regex::Regex;

/// Java arguments used when none are configured
pub const DEFAULT_JAVA_ARGS: &str = "-Xmx2G -Xms1G";
/// The smallest amount of memory in gigabytes that can be set with [set_memory]
pub const MIN_MEMORY_GB: u8 = 1;
/// The largest amount of memory in gigabytes that can be set with [set_memory]
pub const MAX_MEMORY_GB: u8 = 32;

/// An amount of memory, used for Java memory arguments
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryNum {
	/// Bytes
	B(u64),
	/// Kilobytes
	Kb(u64),
	/// Megabytes
	Mb(u64),
	/// Gigabytes
	Gb(u64),
}

impl MemoryNum {
	/// Parse a string into a MemoryNum
	pub fn parse(string: &str) -> Option<Self> {
		Some(match string.chars().last()? {
			'k' | 'K' => Self::Kb(string[..string.len() - 1].parse().ok()?),
			'm' | 'M' => Self::Mb(string[..string.len() - 1].parse().ok()?),
			'g' | 'G' => Self::Gb(string[..string.len() - 1].parse().ok()?),
			_ => Self::B(string.parse().ok()?),
		})
	}

	/// Converts into the equivalent amount in bytes
	pub fn to_bytes(&self) -> u64 {
		match self {
			Self::B(n) => *n,
			Self::Kb(n) => *n * 1024,
			Self::Mb(n) => *n * 1024 * 1024,
			Self::Gb(n) => *n * 1024 * 1024 * 1024,
		}
	}
}

impl Display for MemoryNum {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::B(n) => write!(f, "{n}"),
			Self::Kb(n) => write!(f, "{n}K"),
			Self::Mb(n) => write!(f, "{n}M"),
			Self::Gb(n) => write!(f, "{n}G"),
		}
	}
}

/// Different types of Java memory arguments
#[derive(Debug, Clone, Copy)]
pub enum MemoryArg {
	/// Minimum heap size
	Min,
	/// Maximum heap size
	Max,
}

impl MemoryArg {
	/// The flag prefix for this argument
	pub fn flag(&self) -> &'static str {
		match self {
			Self::Min => "-Xms",
			Self::Max => "-Xmx",
		}
	}

	/// Convert this memory arg to an argument string with a memory num
	pub fn to_string(&self, n: &MemoryNum) -> String {
		format!("{}{n}", self.flag())
	}

	/// Find the value of this argument in a list of Java arguments
	pub fn find_in(&self, args: &str) -> Option<MemoryNum> {
		split_java_args(args)
			.iter()
			.rev()
			.find_map(|arg| arg.strip_prefix(self.flag()).and_then(MemoryNum::parse))
	}

	fn regex(&self) -> &'static Regex {
		static MIN: OnceLock<Regex> = OnceLock::new();
		static MAX: OnceLock<Regex> = OnceLock::new();
		let (cell, pattern) = match self {
			Self::Min => (&MIN, r"-Xms\d+[kKmMgG]?\b"),
			Self::Max => (&MAX, r"-Xmx\d+[kKmMgG]?\b"),
		};
		cell.get_or_init(|| Regex::new(pattern).expect("Memory pattern should be valid"))
	}
}

/// Split a space separated string of Java arguments
pub fn split_java_args(args: &str) -> Vec<String> {
	args.split_whitespace().map(str::to_string).collect()
}

/// Set both the minimum and maximum heap size in a string of Java arguments to
/// an amount of gigabytes. Existing memory flags are replaced in place and
/// new ones are put at the front if there is no maximum heap flag
pub fn set_memory(args: &str, gb: u8) -> anyhow::Result<String> {
	ensure!(
		(MIN_MEMORY_GB..=MAX_MEMORY_GB).contains(&gb),
		"Memory must be between {MIN_MEMORY_GB} and {MAX_MEMORY_GB} GB"
	);

	let amount = MemoryNum::Gb(gb.into());
	let max = MemoryArg::Max.to_string(&amount);
	let min = MemoryArg::Min.to_string(&amount);

	let out = MemoryArg::Max.regex().replace_all(args, max.as_str());
	let out = MemoryArg::Min.regex().replace_all(&out, min.as_str());

	let out = if out.contains(MemoryArg::Max.flag()) {
		out.to_string()
	} else {
		format!("{max} {min} {out}")
	};

	Ok(out.trim().to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mem_parse() {
		assert_eq!(MemoryNum::parse("2358"), Some(MemoryNum::B(2358)));
		assert_eq!(MemoryNum::parse("0798m"), Some(MemoryNum::Mb(798)));
		assert_eq!(MemoryNum::parse("1G"), Some(MemoryNum::Gb(1)));
		assert_eq!(MemoryNum::parse("5a"), None);
		assert_eq!(MemoryNum::parse("fooG"), None);
		assert_eq!(MemoryNum::parse(""), None);
		assert_eq!(MemoryNum::Gb(8).to_bytes(), 8 * 1024 * 1024 * 1024);
	}

	#[test]
	fn test_mem_arg_output() {
		assert_eq!(MemoryArg::Max.to_string(&MemoryNum::Gb(4)), "-Xmx4G");
		assert_eq!(MemoryArg::Min.to_string(&MemoryNum::B(128)), "-Xms128");
	}

	#[test]
	fn test_find_memory_arg() {
		assert_eq!(
			MemoryArg::Max.find_in(DEFAULT_JAVA_ARGS),
			Some(MemoryNum::Gb(2))
		);
		assert_eq!(
			MemoryArg::Min.find_in("-XX:+UseG1GC -Xms512m"),
			Some(MemoryNum::Mb(512))
		);
		assert_eq!(MemoryArg::Max.find_in("-XX:+UseG1GC"), None);
	}

	#[test]
	fn test_set_memory_replaces_existing() {
		assert_eq!(set_memory("-Xmx2G -Xms1G", 4).unwrap(), "-Xmx4G -Xms4G");
		assert_eq!(
			set_memory("-Xmx2048M -XX:+UseG1GC -Xms1G", 6).unwrap(),
			"-Xmx6G -XX:+UseG1GC -Xms6G"
		);
	}

	#[test]
	fn test_set_memory_prepends_when_missing() {
		assert_eq!(
			set_memory("-XX:+UseG1GC", 8).unwrap(),
			"-Xmx8G -Xms8G -XX:+UseG1GC"
		);
		assert_eq!(set_memory("", 2).unwrap(), "-Xmx2G -Xms2G");
	}

	#[test]
	fn test_set_memory_range() {
		assert!(set_memory(DEFAULT_JAVA_ARGS, 0).is_err());
		assert!(set_memory(DEFAULT_JAVA_ARGS, 33).is_err());
		assert!(set_memory(DEFAULT_JAVA_ARGS, 32).is_ok());
	}

	#[test]
	fn test_split_java_args() {
		assert_eq!(
			split_java_args("  -Xmx2G   -Xms1G "),
			vec!["-Xmx2G".to_string(), "-Xms1G".to_string()]
		);
		assert!(split_java_args("").is_empty());
	}
}
