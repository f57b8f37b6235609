//! CLI command implementations.
//!
//! Each command takes the shared [`Context`] and returns an [`Outcome`](crate::output::Outcome) for
//! `main` to print, so the same code path serves normal and dry runs.

mod branch;
mod remote;
mod tag;
mod transfer;

pub use branch::{branch_checkout, branch_create, branch_current, branch_delete, branch_list};
pub use remote::{remote_add, remote_get_url, remote_list, remote_remove, remote_set_url};
pub use tag::{tag_create, tag_delete, tag_list, tag_show};
pub use transfer::{clone, fetch, init, merge, push};

use gitwrap_ops::{GitInvoker, GitRepository};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared invoker handed to every repository a command opens.
pub type SharedInvoker = Arc<dyn GitInvoker>;

/// Where commands run and how git is invoked.
pub struct Context {
    repo_dir: PathBuf,
    invoker: SharedInvoker,
}

impl Context {
    pub fn new(repo_dir: PathBuf, invoker: SharedInvoker) -> Self {
        Self { repo_dir, invoker }
    }

    /// The repository selected with `--repo`.
    pub fn repo(&self) -> GitRepository<SharedInvoker> {
        GitRepository::with_invoker(self.repo_dir.clone(), Arc::clone(&self.invoker))
    }

    pub fn invoker(&self) -> SharedInvoker {
        Arc::clone(&self.invoker)
    }
}
