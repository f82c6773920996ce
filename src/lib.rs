//! Release orchestration for the goravel framework, its satellite packages
//! and the applications built on them.
pub mod cli;
pub mod command;
pub mod config;
pub mod console;
mod error;
pub mod forge;
pub mod orchestrator;
pub mod resolver;
pub mod toolchain;
pub mod vcs;

pub use error::{ReleaseError, Result};
pub use orchestrator::{MajorOptions, Orchestrator};
