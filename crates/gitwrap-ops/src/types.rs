//! Option and result types for git operations.
//!
//! Option structs replace free-form keyword maps: every supported flag is a
//! named field, and `Default` means "pass no flag".

use serde::{Deserialize, Serialize};

/// Default remote used by `fetch` when neither a remote nor `all` is given.
pub const DEFAULT_REMOTE: &str = "origin";

/// Options for `git fetch`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Ref or commit to fetch from the remote.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Limit history to this many commits. Must be positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default)]
    pub tags: bool,
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub prune: bool,
    #[serde(default)]
    pub prune_tags: bool,
    #[serde(default)]
    pub unshallow: bool,
}

/// Options for `git push`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOptions {
    /// Branch (or refspec) to push. When unset git's `push.default` decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Also push all tags, as a second invocation.
    #[serde(default)]
    pub tags: bool,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub mirror: bool,
}

/// Options for `git clone`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneOptions {
    #[serde(default)]
    pub bare: bool,
    #[serde(default)]
    pub mirror: bool,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Name to use for the remote instead of `origin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    /// `key=value` pairs written into the new repository's config.
    #[serde(default)]
    pub config: Vec<String>,
}

/// Options for `git init`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitOptions {
    #[serde(default)]
    pub bare: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_branch: Option<String>,
}

/// Options for `git remote add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRemoteOptions {
    /// Fetch from the remote right after adding it.
    #[serde(default)]
    pub fetch: bool,
    /// Only track this branch of the remote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

/// Options for `git merge`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub no_ff: bool,
    #[serde(default)]
    pub no_commit: bool,
}

/// Options for `git tag` when creating a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagOptions {
    /// Create an annotated tag with this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub force: bool,
    /// Commit to tag. Defaults to HEAD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSpec {
    pub name: String,
    pub fetch_url: String,
    /// Push URL, when `git remote -v` reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_url: Option<String>,
}

impl RemoteSpec {
    /// The URL fetches go to.
    pub fn url(&self) -> &str {
        &self.fetch_url
    }
}

/// A branch as listed by `git branch -a`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    /// Name as printed by git, e.g. `master` or `remotes/origin/master`.
    pub full: String,
    /// Branch name without the `remotes/<remote>/` prefix.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    pub is_current: bool,
}

impl BranchInfo {
    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }
}

/// Result of `GitRepository::branches`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchesResult {
    pub branches: Vec<BranchInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

impl BranchesResult {
    pub fn local(&self) -> impl Iterator<Item = &BranchInfo> {
        self.branches.iter().filter(|b| !b.is_remote())
    }

    pub fn remote(&self) -> impl Iterator<Item = &BranchInfo> {
        self.branches.iter().filter(|b| b.is_remote())
    }

    /// Whether a branch with this full name (as git prints it) exists.
    pub fn contains_full(&self, full: &str) -> bool {
        self.branches.iter().any(|b| b.full == full)
    }
}

/// Result of `GitRepository::push`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushResult {
    pub remote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub tags_pushed: bool,
    /// Combined output of every push invocation, in order.
    pub output: String,
}

/// Output captured from a finished git process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub exit_code: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr. git writes progress and ref updates of
    /// `fetch` and `push` to stderr, so most callers want both.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (true, _) => self.stderr.clone(),
            (false, true) => self.stdout.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }

    /// Trimmed stdout, for commands whose answer is a single value.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}
