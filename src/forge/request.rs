#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Pull request state filter.
pub enum PrState {
    Open,
    Closed,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pull request information.
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
    pub title: String,
    pub body: String,
    pub merged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Release as listed by the forge.
pub struct Release {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub html_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Generated release notes.
pub struct ReleaseNotes {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a new pull request.
pub struct CreatePrRequest {
    pub repo: String,
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a release.
pub struct CreateReleaseRequest {
    pub repo: String,
    pub tag: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to generate release notes between two tags.
pub struct GenerateNotesRequest {
    pub repo: String,
    pub tag: String,
    /// Previous tag; empty lets the forge pick the starting point.
    pub previous_tag: String,
    pub target_commitish: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to read a file from a branch.
pub struct GetFileContentRequest {
    pub repo: String,
    pub branch: String,
    pub path: String,
}
