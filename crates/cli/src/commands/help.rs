use color_print::{cprint, cprintln};

use super::super::output::HYPHEN_POINT;

/// Where the launcher's source lives
const REPOSITORY: &str = "https://github.com/m1r0tv0rets/Cobalt_Launcher_Nano";

/// Commands shown in the help list, with their description
const HELP_ENTRIES: &[(&str, &str)] = &[
	("help", "Show this list"),
	("accounts", "Manage accounts"),
	("alpha, beta, snapshots, releases", "List versions of a type"),
	("install <version>", "Install a version and select it"),
	("launch", "Launch Minecraft"),
	("status", "Show the current settings"),
	("args", "Set the Java arguments"),
	("memory <gb>", "Set memory from 1 to 32 GB"),
	("java", "Set or reset the path to Java"),
	("separate-dirs", "Use a separate folder for every version"),
	("mods, resourcepacks, saves, configs, schematics", "Open a game folder"),
	("folder", "Open the Minecraft folder"),
	("log", "Copy the latest game log to the desktop"),
	("backup", "Back up worlds and other data to the desktop"),
	("note <text>", "Add a note"),
	("notes", "Show all notes"),
	("info", "Show useful links"),
	("exit", "Leave the launcher"),
];

/// Links shown by the info command
const INFO_LINKS: &[(&str, &str)] = &[
	("https://t.me/nerkinboat", "Minecraft news"),
	("https://www.youtube.com/@Nerkin/", "Minecraft news"),
	(
		"https://t.me/minecraft_cubach",
		"Vanilla+ server with plugins, bosses, and custom items. IP: cubach.com",
	),
	(
		"https://t.me/playdacha",
		"Small vanilla server with claims and /home. IP: playdacha.ru",
	),
];

pub fn print_banner() {
	cprintln!("<s><b>Cobalt Launcher</> <k!>v{}</>", env!("CARGO_PKG_VERSION"));
	cprintln!("<c>Repository:</> <b,u>{}</>", REPOSITORY);
	cprintln!("<m>Don't know the commands? Type '<g>help</>' for the list</>");
}

pub fn print_help() {
	cprintln!("<s>Commands:");
	for (command, description) in HELP_ENTRIES {
		cprint!("{}", HYPHEN_POINT);
		cprintln!("<g>{}</> <k!>-</> {}", command, description);
	}
	cprintln!("<k!>Every command also has its original Russian name, like '<g>запуск</>'");
}

pub fn print_info() {
	cprintln!("<s>Links:");
	for (link, description) in INFO_LINKS {
		cprint!("{}", HYPHEN_POINT);
		cprintln!("<b,u>{}</> {}", link, description);
	}
}

pub fn print_farewell() {
	cprintln!("<c>Goodbye!");
}
