//! Repository-bound operations.
//!
//! [`GitRepository`] pairs a working directory with an invoker and turns each
//! operation into builder call, invocation and (where there is something to
//! read back) output parsing. It keeps no state between calls: everything
//! lives in the repository on disk.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::builders;
use crate::command_line::CommandLine;
use crate::error::{GitOpsError, GitOpsResult};
use crate::invoker::{GitInvoker, SystemInvoker};
use crate::parse;
use crate::types::{
    AddRemoteOptions, BranchesResult, CloneOptions, CommandOutput, FetchOptions, InitOptions,
    MergeOptions, PushOptions, PushResult, RemoteSpec, TagOptions,
};

/// A git working directory driven through an invoker.
#[derive(Debug, Clone)]
pub struct GitRepository<I: GitInvoker = SystemInvoker> {
    path: PathBuf,
    invoker: I,
}

impl GitRepository<SystemInvoker> {
    /// Open `path` with the default system invoker.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_invoker(path, SystemInvoker::new())
    }
}

impl<I: GitInvoker> GitRepository<I> {
    pub fn with_invoker(path: impl Into<PathBuf>, invoker: I) -> Self {
        Self {
            path: path.into(),
            invoker,
        }
    }

    /// Clone `url` into `dir` and return the new repository.
    pub fn clone_repo(
        invoker: I,
        url: &str,
        dir: &Path,
        opts: &CloneOptions,
    ) -> GitOpsResult<Self> {
        let cmd = builders::clone(url, dir, opts)?;
        info!(url = %url, dir = %dir.display(), "Cloning repository");
        invoker.invoke(&cmd, None)?;
        Ok(Self::with_invoker(dir, invoker))
    }

    /// Initialise a repository at `dir`.
    pub fn init(invoker: I, dir: &Path, opts: &InitOptions) -> GitOpsResult<Self> {
        let cmd = builders::init(dir, opts)?;
        info!(dir = %dir.display(), bare = opts.bare, "Initialising repository");
        invoker.invoke(&cmd, None)?;
        Ok(Self::with_invoker(dir, invoker))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    fn run(&self, cmd: &CommandLine) -> GitOpsResult<CommandOutput> {
        self.invoker.invoke(cmd, Some(&self.path))
    }

    // --- remotes ---

    pub fn add_remote(
        &self,
        name: &str,
        url: &str,
        opts: &AddRemoteOptions,
    ) -> GitOpsResult<RemoteSpec> {
        let cmd = builders::remote_add(name, url, opts)?;
        info!(remote = %name, url = %url, fetch = opts.fetch, "Adding remote");
        self.run(&cmd)?;
        Ok(RemoteSpec {
            name: name.to_string(),
            fetch_url: url.to_string(),
            push_url: None,
        })
    }

    pub fn remove_remote(&self, name: &str) -> GitOpsResult<()> {
        let cmd = builders::remote_remove(name)?;
        info!(remote = %name, "Removing remote");
        self.run(&cmd)?;
        Ok(())
    }

    pub fn set_remote_url(&self, name: &str, url: &str) -> GitOpsResult<()> {
        let cmd = builders::remote_set_url(name, url)?;
        info!(remote = %name, url = %url, "Setting remote url");
        self.run(&cmd)?;
        Ok(())
    }

    pub fn remote_url(&self, name: &str) -> GitOpsResult<String> {
        let output = self.run(&builders::remote_get_url(name)?)?;
        Ok(output.stdout_trimmed().to_string())
    }

    pub fn remotes(&self) -> GitOpsResult<Vec<RemoteSpec>> {
        let output = self.run(&builders::remote_list())?;
        parse::parse_remotes(&output.stdout)
    }

    /// Look up a single remote by name.
    pub fn remote(&self, name: &str) -> GitOpsResult<Option<RemoteSpec>> {
        Ok(self.remotes()?.into_iter().find(|r| r.name == name))
    }

    // --- transfer ---

    /// Fetch and return git's output, which lists the refs that were updated.
    pub fn fetch(&self, remote: Option<&str>, opts: &FetchOptions) -> GitOpsResult<CommandOutput> {
        let cmd = builders::fetch(remote, opts)?;
        info!(command = %cmd, "Fetching");
        self.run(&cmd)
    }

    pub fn push(&self, remote: &str, opts: &PushOptions) -> GitOpsResult<PushResult> {
        let commands = builders::push(remote, opts)?;
        info!(
            remote = %remote,
            branch = ?opts.branch,
            tags = opts.tags,
            "Pushing"
        );

        let mut outputs = Vec::with_capacity(commands.len());
        for cmd in &commands {
            outputs.push(self.run(cmd)?.combined());
        }

        Ok(PushResult {
            remote: remote.to_string(),
            branch: opts.branch.clone(),
            tags_pushed: opts.tags,
            output: outputs.join(""),
        })
    }

    pub fn merge<S: AsRef<str>>(
        &self,
        commits: &[S],
        opts: &MergeOptions,
    ) -> GitOpsResult<CommandOutput> {
        let cmd = builders::merge(commits, opts)?;
        info!(command = %cmd, "Merging");
        self.run(&cmd)
    }

    // --- branches ---

    pub fn branches(&self) -> GitOpsResult<BranchesResult> {
        let output = self.run(&builders::branch_list())?;
        Ok(parse::parse_branches(&output.stdout))
    }

    pub fn create_branch(&self, name: &str, start_point: Option<&str>) -> GitOpsResult<()> {
        let cmd = builders::branch_create(name, start_point)?;
        info!(branch = %name, "Creating branch");
        self.run(&cmd)?;
        Ok(())
    }

    pub fn delete_branch(&self, name: &str, force: bool) -> GitOpsResult<()> {
        let cmd = builders::branch_delete(name, force)?;
        info!(branch = %name, force, "Deleting branch");
        self.run(&cmd)?;
        Ok(())
    }

    pub fn checkout(&self, name: &str) -> GitOpsResult<()> {
        let cmd = builders::checkout(name)?;
        info!(branch = %name, "Checking out");
        self.run(&cmd)?;
        Ok(())
    }

    /// Current branch, or `None` on a detached HEAD. A freshly initialised
    /// repository reports its unborn branch.
    pub fn current_branch(&self) -> GitOpsResult<Option<String>> {
        let output = match self.run(&builders::current_branch()) {
            Ok(output) => output,
            Err(GitOpsError::ExecutionFailed { exit_code: 1, .. }) => return Ok(None),
            Err(other) => return Err(other),
        };
        let name = output.stdout_trimmed();
        if name.is_empty() {
            Ok(None)
        } else {
            Ok(Some(name.to_string()))
        }
    }

    // --- tags ---

    pub fn tags(&self) -> GitOpsResult<Vec<String>> {
        let output = self.run(&builders::tag_list())?;
        Ok(parse::parse_tags(&output.stdout))
    }

    pub fn add_tag(&self, name: &str, opts: &TagOptions) -> GitOpsResult<()> {
        let cmd = builders::tag_create(name, opts)?;
        info!(tag = %name, annotated = opts.message.is_some(), "Creating tag");
        self.run(&cmd)?;
        Ok(())
    }

    pub fn delete_tag(&self, name: &str) -> GitOpsResult<()> {
        let cmd = builders::tag_delete(name)?;
        info!(tag = %name, "Deleting tag");
        self.run(&cmd)?;
        Ok(())
    }

    /// Commit sha a tag points at.
    ///
    /// # Errors
    ///
    /// [`GitOpsError::TagNotFound`] when git does not know the tag.
    pub fn tag_sha(&self, name: &str) -> GitOpsResult<String> {
        let cmd = builders::tag_lookup(name)?;
        let output = match self.run(&cmd) {
            Ok(output) => output,
            Err(GitOpsError::ExecutionFailed { .. }) => {
                return Err(GitOpsError::TagNotFound(name.to_string()))
            }
            Err(other) => return Err(other),
        };

        parse::parse_tag_commit(&output.stdout)
            .ok_or_else(|| GitOpsError::TagNotFound(name.to_string()))
    }
}
