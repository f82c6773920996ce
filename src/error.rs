//! Error types for release orchestration.

use thiserror::Error;

/// Main error type for release operations.
#[derive(Error, Debug)]
pub enum ReleaseError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("github token is not set: use --github-token or GITHUB_TOKEN")]
    MissingToken,

    // Operator decisions
    #[error("{owner}/{repo} not confirmed")]
    NotConfirmed { owner: String, repo: String },

    // Forge/Git errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Git operation failed: {0}")]
    GitError(#[from] git2::Error),

    #[error("could not extract {owner}/{repo} version from {path}")]
    VersionNotFound {
        owner: String,
        repo: String,
        path: String,
    },

    // Toolchain errors
    #[error("failed to {purpose}: {output}")]
    CommandFailed { purpose: String, output: String },

    #[error("tests failed for {0}")]
    TestFailed(String),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Parsing errors
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    // Console errors
    #[error("Prompt failed: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ReleaseError
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a not-confirmed error for a rejected repository
    pub fn not_confirmed(
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self::NotConfirmed {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Create a command failure error
    pub fn command_failed(
        purpose: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            purpose: purpose.into(),
            output: output.into(),
        }
    }
}

// Implement From for std::io::Error: wraps in Other for generic I/O errors
impl From<std::io::Error> for ReleaseError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for ReleaseError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::NetworkError(err.to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 | 403 => Self::AuthenticationError(err.to_string()),
                429 => Self::RateLimitExceeded,
                _ => Self::NetworkError(err.to_string()),
            }
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ReleaseError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            octocrab::Error::GitHub { source, .. }
                if source.status_code.as_u16() == 401 =>
            {
                Self::AuthenticationError(source.message.clone())
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
