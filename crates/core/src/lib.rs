#![warn(missing_docs)]

//! This library is used by the Cobalt launcher to lay out its files, talk to the
//! game provider, and run the game as a supervised process that can be stopped
//! from the keyboard.
//!
//! Note: The provider functions in this library expect the use of the Tokio runtime

/// Input / output with data formats and the system
pub mod io;
/// Running and supervising the game process
pub mod launch;
/// Listing, installing, and building commands for game versions
pub mod provider;

pub use io::files::paths::Paths;
pub use launch::{CancelSource, LaunchSession, SessionOutcome, SupervisedProcess, WatcherReport};
pub use provider::{ExternalProvider, GameProvider, IdentityOptions, VersionEntry, VersionType};
