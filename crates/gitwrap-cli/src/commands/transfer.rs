//! Repository creation and transfer commands: clone, init, fetch, push, merge.

use super::Context;
use crate::output::Outcome;
use anyhow::Result;
use gitwrap_ops::{CloneOptions, FetchOptions, GitRepository, InitOptions, MergeOptions, PushOptions};
use std::path::Path;
use tracing::debug;

/// Clone `url` into `dir`. Runs outside `--repo`.
pub fn clone(ctx: &Context, url: &str, dir: &Path, opts: &CloneOptions) -> Result<Outcome> {
    let repo = GitRepository::clone_repo(ctx.invoker(), url, dir, opts)?;
    Ok(Outcome::done(format!(
        "Cloned {} into {}",
        url,
        repo.path().display()
    )))
}

/// Create a repository at `dir`.
pub fn init(ctx: &Context, dir: &Path, opts: &InitOptions) -> Result<Outcome> {
    let repo = GitRepository::init(ctx.invoker(), dir, opts)?;
    let kind = if opts.bare { "bare repository" } else { "repository" };
    Ok(Outcome::done(format!(
        "Initialized {} in {}",
        kind,
        repo.path().display()
    )))
}

pub fn fetch(ctx: &Context, remote: Option<&str>, opts: &FetchOptions) -> Result<Outcome> {
    let output = ctx.repo().fetch(remote, opts)?;
    debug!(exit_code = output.exit_code, "fetch finished");
    Ok(Outcome::GitOutput {
        command: "fetch".to_string(),
        output: output.combined(),
    })
}

pub fn push(ctx: &Context, remote: &str, opts: &PushOptions) -> Result<Outcome> {
    let result = ctx.repo().push(remote, opts)?;
    Ok(Outcome::Pushed(result))
}

pub fn merge(ctx: &Context, commits: &[String], opts: &MergeOptions) -> Result<Outcome> {
    let output = ctx.repo().merge(commits, opts)?;
    Ok(Outcome::GitOutput {
        command: "merge".to_string(),
        output: output.combined(),
    })
}
