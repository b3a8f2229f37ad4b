#![warn(missing_docs)]

//! The Cobalt launcher: a small text-console launcher for Minecraft. This
//! library holds the launcher's records (settings, accounts, notes) and the
//! actions that the command line runs on them.

pub use cobalt_core as core;
pub use cobalt_shared as shared;

/// Player accounts
pub mod accounts;
/// Launcher settings
pub mod config;
/// Game folders, backups, and logs
pub mod files;
/// Checking settings and launching the game
pub mod launch;
/// The notes file
pub mod notes;
/// Listing and installing versions
pub mod versions;
