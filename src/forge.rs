//! GitHub gateway for the release family.
//!
//! Provides token-based authentication, release management, pull request
//! operations, branch queries and raw file access through a common trait, with
//! a manager that gates every mutating call behind real mode.

/// Configuration and authentication for the GitHub connection.
pub mod config;

/// GitHub API client implementation.
pub mod github;

/// Wrapper that skips mutating calls unless running in real mode.
pub mod manager;

/// Request and response types shared by forge implementations.
pub mod request;

/// Common traits for forge platform abstraction.
pub mod traits;

/// Pure helpers for selecting releases.
pub mod util;
