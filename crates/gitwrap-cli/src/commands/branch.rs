//! Branch commands.

use super::Context;
use crate::output::Outcome;
use anyhow::Result;

/// List local and remote-tracking branches.
pub fn branch_list(ctx: &Context) -> Result<Outcome> {
    let result = ctx.repo().branches()?;
    Ok(Outcome::Branches {
        current: result.current,
        branches: result.branches,
    })
}

pub fn branch_create(ctx: &Context, name: &str, start_point: Option<&str>) -> Result<Outcome> {
    ctx.repo().create_branch(name, start_point)?;
    Ok(Outcome::done(format!("Created branch {}", name)))
}

pub fn branch_delete(ctx: &Context, name: &str, force: bool) -> Result<Outcome> {
    ctx.repo().delete_branch(name, force)?;
    Ok(Outcome::done(format!("Deleted branch {}", name)))
}

pub fn branch_checkout(ctx: &Context, name: &str) -> Result<Outcome> {
    ctx.repo().checkout(name)?;
    Ok(Outcome::done(format!("Switched to branch {}", name)))
}

/// Print the checked-out branch, or report a detached HEAD.
pub fn branch_current(ctx: &Context) -> Result<Outcome> {
    let branch = ctx.repo().current_branch()?;
    Ok(Outcome::CurrentBranch { branch })
}
