//! # gitwrap-ops
//!
//! Typed orchestration of the `git` command-line tool.
//!
//! The crate owns option translation, process execution and output parsing
//! for remote lifecycle work (clone, remotes, fetch, push, merge, branches,
//! tags). Git itself remains the system of record: nothing here touches the
//! object store directly.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  caller ──► GitRepository::fetch(remote, &FetchOptions)         │
//! │                    │                                            │
//! │                    ▼                                            │
//! │            builders::fetch ──► CommandLine                      │
//! │                                 ["fetch","--depth","2",         │
//! │                                  "--","origin","master"]        │
//! │                    │                                            │
//! │                    ▼                                            │
//! │            dyn GitInvoker ──► SystemInvoker (spawns git)        │
//! │                           └─► DryRunInvoker (records only)      │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Caller-supplied values (remote names, refs, URLs) are always placed after
//! a literal `--`, so a remote called `--upload-pack=...` is data, not an
//! option.
//!
//! ## Example Usage
//!
//! ```ignore
//! use gitwrap_ops::{FetchOptions, GitRepository, PushOptions};
//!
//! let repo = GitRepository::open("/path/to/repo");
//! let output = repo.fetch(
//!     Some("origin"),
//!     &FetchOptions { git_ref: Some("main".into()), depth: Some(2), ..Default::default() },
//! )?;
//! println!("{}", output.combined());
//!
//! repo.push("origin", &PushOptions { branch: Some("main".into()), tags: true, ..Default::default() })?;
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`GitOpsResult`]. Options that cannot be expressed
//! safely fail with [`GitOpsError::InvalidOption`] before any process is
//! started; a nonzero git exit becomes [`GitOpsError::ExecutionFailed`] with
//! the exit code and captured output.

pub mod builders;
mod command_line;
mod error;
mod invoker;
pub mod parse;
mod repository;
mod types;

pub use command_line::{validate_ref_name, CommandLine, TERMINATOR};
pub use error::{GitOpsError, GitOpsResult};
pub use invoker::{DryRunInvoker, GitInvoker, RecordedCommand, SystemInvoker};
pub use repository::GitRepository;
pub use types::{
    AddRemoteOptions, BranchInfo, BranchesResult, CloneOptions, CommandOutput, FetchOptions,
    InitOptions, MergeOptions, PushOptions, PushResult, RemoteSpec, TagOptions, DEFAULT_REMOTE,
};
