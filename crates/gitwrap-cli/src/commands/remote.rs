//! Remote management commands.

use super::Context;
use crate::output::Outcome;
use anyhow::Result;
use gitwrap_ops::AddRemoteOptions;

/// List configured remotes.
pub fn remote_list(ctx: &Context) -> Result<Outcome> {
    let remotes = ctx.repo().remotes()?;
    Ok(Outcome::Remotes { remotes })
}

/// Add a remote, optionally fetching it right away.
pub fn remote_add(ctx: &Context, name: &str, url: &str, opts: &AddRemoteOptions) -> Result<Outcome> {
    let remote = ctx.repo().add_remote(name, url, opts)?;
    Ok(Outcome::done(format!(
        "Added remote {} ({})",
        remote.name, remote.fetch_url
    )))
}

pub fn remote_remove(ctx: &Context, name: &str) -> Result<Outcome> {
    ctx.repo().remove_remote(name)?;
    Ok(Outcome::done(format!("Removed remote {}", name)))
}

pub fn remote_set_url(ctx: &Context, name: &str, url: &str) -> Result<Outcome> {
    ctx.repo().set_remote_url(name, url)?;
    Ok(Outcome::done(format!("Remote {} now points at {}", name, url)))
}

pub fn remote_get_url(ctx: &Context, name: &str) -> Result<Outcome> {
    let url = ctx.repo().remote_url(name)?;
    Ok(Outcome::RemoteUrl {
        name: name.to_string(),
        url,
    })
}
