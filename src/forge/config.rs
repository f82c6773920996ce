//! Configuration for the GitHub connection.
use secrecy::SecretString;

/// Default GitHub host.
pub const DEFAULT_HOST: &str = "github.com";
/// Default host serving raw repository content.
pub const DEFAULT_RAW_HOST: &str = "raw.githubusercontent.com";
/// Number of releases inspected when checking whether a tag was released.
pub const RELEASE_EXIST_PAGE_SIZE: u8 = 10;
/// Number of releases inspected when looking for the latest release.
pub const LATEST_RELEASE_PAGE_SIZE: u8 = 50;
/// Number of open pull requests inspected when reusing an upgrade PR.
pub const PULL_REQUEST_PAGE_SIZE: u8 = 100;

/// Remote connection configuration shared by every repository of the
/// configured owner.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// Host serving raw file content.
    pub raw_host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Organization owning the repositories.
    pub owner: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Whether mutating operations are executed.
    pub real: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            raw_host: DEFAULT_RAW_HOST.to_string(),
            scheme: "https".to_string(),
            owner: "".to_string(),
            token: SecretString::from("".to_string()),
            real: false,
        }
    }
}

impl RemoteConfig {
    /// Web URL of a repository.
    pub fn repo_url(&self, repo: &str) -> String {
        format!("{}://{}/{}/{}", self.scheme, self.host, self.owner, repo)
    }

    /// Clone URL of a repository.
    pub fn clone_url(&self, repo: &str) -> String {
        format!("{}.git", self.repo_url(repo))
    }

    /// Web URL of a pull request or branch comparison.
    pub fn pull_url(&self, repo: &str, head: &str) -> String {
        format!("{}/pull/{}", self.repo_url(repo), head)
    }

    /// Web URL of a release tag.
    pub fn release_url(&self, repo: &str, tag: &str) -> String {
        format!("{}/releases/tag/{}", self.repo_url(repo), tag)
    }
}
