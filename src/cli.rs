//! CLI argument parsing and GitHub connection configuration.
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::path::PathBuf;

use crate::{
    ReleaseError, Result, config::DEFAULT_CONFIG_FILE,
    forge::config::RemoteConfig, orchestrator::MajorOptions,
};

/// Global CLI arguments for the GitHub connection and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        long,
        env = "GITHUB_TOKEN",
        default_value = "",
        hide_env_values = true,
        global = true
    )]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Release configuration file. Defaults apply when it does not exist.
    pub config: PathBuf,

    #[arg(long, global = true)]
    /// Directory repositories are cloned into. Overrides the configuration.
    pub workdir: Option<PathBuf>,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Release the framework, every package and the applications.
    Major {
        /// Tag to release, e.g. v1.16.0.
        tag: String,

        #[arg(short, long, default_value_t = false)]
        /// Create releases, pull requests and branches. Preview otherwise.
        real: bool,

        #[arg(long, default_value_t = false)]
        /// Refresh the Go module proxy before releasing.
        refresh: bool,

        #[arg(long, visible_alias = "fb")]
        /// Framework branch packages are tested and refreshed against.
        framework_branch: Option<String>,
    },

    /// Release the framework and the patch applications from their
    /// maintenance branches.
    Patch {
        /// Tag to release, e.g. v1.16.2.
        tag: String,

        #[arg(short, long, default_value_t = false)]
        /// Create releases and pull requests. Preview otherwise.
        real: bool,
    },

    /// Print the release information of a tag without changing anything.
    Preview {
        /// Tag to preview.
        tag: String,

        #[arg(short, long, default_value_t = false)]
        /// Include every package.
        packages: bool,
    },
}

impl Command {
    /// Whether the command may mutate remote state.
    pub fn real(&self) -> bool {
        match self {
            Command::Major { real, .. } | Command::Patch { real, .. } => *real,
            Command::Preview { .. } => false,
        }
    }

    /// Major release options, `None` for other commands.
    pub fn major_options(&self) -> Option<MajorOptions> {
        match self {
            Command::Major {
                tag,
                refresh,
                framework_branch,
                ..
            } => Some(MajorOptions {
                tag: tag.clone(),
                refresh: *refresh,
                framework_branch: framework_branch.clone(),
            }),
            _ => None,
        }
    }
}

impl Args {
    /// Access token, required by every command.
    pub fn token(&self) -> Result<SecretString> {
        if self.github_token.is_empty() {
            return Err(ReleaseError::MissingToken);
        }

        Ok(SecretString::from(self.github_token.clone()))
    }

    /// Remote configuration for the repositories of `owner`.
    pub fn remote_config(
        &self,
        owner: &str,
        real: bool,
    ) -> Result<RemoteConfig> {
        Ok(RemoteConfig {
            owner: owner.to_string(),
            token: self.token()?,
            real,
            ..Default::default()
        })
    }
}
