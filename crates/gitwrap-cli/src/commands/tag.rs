//! Tag commands.

use super::Context;
use crate::output::Outcome;
use anyhow::Result;
use gitwrap_ops::TagOptions;

pub fn tag_list(ctx: &Context) -> Result<Outcome> {
    let tags = ctx.repo().tags()?;
    Ok(Outcome::Tags { tags })
}

/// Create a tag; annotated when `opts.message` is set.
pub fn tag_create(ctx: &Context, name: &str, opts: &TagOptions) -> Result<Outcome> {
    ctx.repo().add_tag(name, opts)?;
    Ok(Outcome::done(format!("Created tag {}", name)))
}

pub fn tag_delete(ctx: &Context, name: &str) -> Result<Outcome> {
    ctx.repo().delete_tag(name)?;
    Ok(Outcome::done(format!("Deleted tag {}", name)))
}

/// Resolve a tag to the commit it points at.
pub fn tag_show(ctx: &Context, name: &str) -> Result<Outcome> {
    let sha = ctx.repo().tag_sha(name)?;
    Ok(Outcome::Tag {
        name: name.to_string(),
        sha,
    })
}
