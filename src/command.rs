//! Command execution for the `release` CLI.
//!
//! Each command wires the configuration, the GitHub gateway, git, the Go
//! toolchain and the terminal prompt into an [`Orchestrator`] and runs one
//! flow:
//!
//! - **major**: release the framework, the packages and the applications,
//!   upgrading dependents in between and opening the maintenance line
//! - **patch**: release the framework and the patch applications from their
//!   maintenance branches
//! - **preview**: print the release information of a tag, read only
//!
//! Major and patch run in preview mode unless `--real` is given: nothing is
//! created on GitHub and nothing is pushed.
//!
//! [`Orchestrator`]: crate::orchestrator::Orchestrator

/// Configuration loading and orchestrator construction shared by commands.
pub mod common;

/// Major release of the whole repository family.
pub mod major;

/// Patch release of the framework and the patch applications.
pub mod patch;

/// Read-only release information preview.
pub mod preview;
