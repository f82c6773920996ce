//! Configuration loading for `release.toml`.
//!
//! The configuration describes the repository family a release touches: the
//! framework, its satellite packages and the applications that depend on
//! them. Every field is optional in the file; missing fields fall back to the
//! goravel project layout.
use log::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{ReleaseError, Result};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";
/// Default GitHub organization.
pub const DEFAULT_OWNER: &str = "goravel";
/// Default branch every repository releases from.
pub const DEFAULT_BASE_BRANCH: &str = "master";
/// Source file that embeds the framework version constant.
pub const DEFAULT_VERSION_FILE: &str = "support/constant.go";
/// Go module proxy refreshed before a major release.
pub const DEFAULT_GO_PROXY: &str = "https://proxy.golang.org";
/// Name of the framework repository, also used as a dependency name.
pub const FRAMEWORK: &str = "framework";

const DEFAULT_PACKAGES: [&str; 11] = [
    "gin",
    "fiber",
    "s3",
    "oss",
    "cos",
    "minio",
    "postgres",
    "mysql",
    "sqlserver",
    "sqlite",
    "redis",
];

/// A repository that takes part in a release.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Repository name under the configured owner.
    pub name: String,
    /// Sibling modules bumped by this repository's upgrade PR. Empty means
    /// the repository never needs an upgrade PR.
    pub dependencies: Vec<String>,
    /// Whether the repository embeds its version in the version file.
    pub embeds_version: bool,
    /// Whether a GitHub release is created for the repository.
    pub release: bool,
    /// Whether the repository takes part in patch releases.
    pub patch: bool,
    /// Whether the `{major}.{minor}.x` branch is pushed on a new minor line.
    pub maintenance_branch: bool,
    /// Whether the maintenance branch becomes the default branch.
    pub default_branch: bool,
}

impl RepositoryConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn framework() -> Self {
        Self {
            name: FRAMEWORK.into(),
            embeds_version: true,
            release: true,
            patch: true,
            maintenance_branch: true,
            ..Default::default()
        }
    }

    fn package(name: &str) -> Self {
        Self {
            name: name.into(),
            dependencies: vec![FRAMEWORK.into()],
            release: true,
            ..Default::default()
        }
    }
}

/// Complete release configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// GitHub organization owning every repository.
    pub owner: String,
    /// Branch releases and upgrade PRs target on a major release.
    pub base_branch: String,
    /// Path of the version constant file inside repositories that embed it.
    pub version_file: String,
    /// Go module proxy used by `--refresh`.
    pub go_proxy: String,
    /// Directory repositories are cloned into.
    pub workdir: PathBuf,
    /// The framework repository.
    pub framework: RepositoryConfig,
    /// Satellite packages, released with the framework on a major release.
    pub packages: Vec<String>,
    /// Applications upgraded after the packages are released.
    pub applications: Vec<RepositoryConfig>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        let packages = DEFAULT_PACKAGES
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>();

        let mut example_dependencies = vec![FRAMEWORK.to_string()];
        example_dependencies.extend(packages.iter().cloned());

        Self {
            owner: DEFAULT_OWNER.into(),
            base_branch: DEFAULT_BASE_BRANCH.into(),
            version_file: DEFAULT_VERSION_FILE.into(),
            go_proxy: DEFAULT_GO_PROXY.into(),
            workdir: PathBuf::from("."),
            framework: RepositoryConfig::framework(),
            packages,
            applications: vec![
                RepositoryConfig {
                    name: "goravel".into(),
                    dependencies: vec![
                        FRAMEWORK.into(),
                        "gin".into(),
                        "postgres".into(),
                    ],
                    release: true,
                    maintenance_branch: true,
                    default_branch: true,
                    ..Default::default()
                },
                RepositoryConfig {
                    name: "goravel-lite".into(),
                    dependencies: vec![FRAMEWORK.into()],
                    release: true,
                    patch: true,
                    maintenance_branch: true,
                    default_branch: true,
                    ..Default::default()
                },
                RepositoryConfig {
                    name: "example".into(),
                    dependencies: example_dependencies,
                    maintenance_branch: true,
                    default_branch: true,
                    ..Default::default()
                },
                RepositoryConfig {
                    name: "example-client".into(),
                    dependencies: vec![FRAMEWORK.into(), "gin".into()],
                    ..Default::default()
                },
                RepositoryConfig {
                    name: "installer".into(),
                    embeds_version: true,
                    release: true,
                    ..Default::default()
                },
            ],
        }
    }
}

impl ReleaseConfig {
    /// Load configuration from `path` when it exists, defaults otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(
                "no configuration found at {}: using default",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.owner.is_empty() {
            return Err(ReleaseError::invalid_config("owner must not be empty"));
        }

        if self.framework.name.is_empty() {
            return Err(ReleaseError::invalid_config(
                "framework repository name must not be empty",
            ));
        }

        if let Some(app) = self.applications.iter().find(|a| a.name.is_empty())
        {
            return Err(ReleaseError::invalid_config(format!(
                "application with dependencies {:?} has no name",
                app.dependencies
            )));
        }

        Ok(())
    }

    /// Repository configurations for every satellite package.
    pub fn package_repositories(&self) -> Vec<RepositoryConfig> {
        self.packages
            .iter()
            .map(|p| RepositoryConfig::package(p))
            .collect()
    }

    /// Applications that take part in patch releases.
    pub fn patch_applications(&self) -> Vec<RepositoryConfig> {
        self.applications
            .iter()
            .filter(|a| a.patch)
            .cloned()
            .collect()
    }

    /// Go module path for a repository of this family.
    pub fn module_path(&self, repo: &str) -> String {
        format!("github.com/{}/{}", self.owner, repo)
    }
}
