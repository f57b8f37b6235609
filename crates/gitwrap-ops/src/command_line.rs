//! Ordered git argument lists.
//!
//! A [`CommandLine`] keeps three groups of tokens apart: the fixed subcommand
//! (`fetch`, `remote add`), the flags, and the operands. Operands are always
//! rendered after a literal `--`, so a caller-supplied value such as
//! `--upload-pack=touch x` reaches git as data and never as an option.
//!
//! Flags can only be `&'static str`; flag values go through [`CommandLine::option`]
//! and are emitted as their own token after the flag.

use std::fmt;

use serde::Serialize;

use crate::error::{GitOpsError, GitOpsResult};

/// The end-of-options marker.
pub const TERMINATOR: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    subcommand: Vec<&'static str>,
    flags: Vec<String>,
    operands: Vec<String>,
    force_terminator: bool,
}

impl CommandLine {
    pub fn new(subcommand: &[&'static str]) -> Self {
        Self {
            subcommand: subcommand.to_vec(),
            flags: Vec::new(),
            operands: Vec::new(),
            force_terminator: false,
        }
    }

    pub fn flag(mut self, flag: &'static str) -> Self {
        self.flags.push(flag.to_string());
        self
    }

    pub fn flag_if(self, enabled: bool, flag: &'static str) -> Self {
        if enabled {
            self.flag(flag)
        } else {
            self
        }
    }

    /// A flag followed by its value as a separate token.
    pub fn option(mut self, flag: &'static str, value: impl Into<String>) -> Self {
        self.flags.push(flag.to_string());
        self.flags.push(value.into());
        self
    }

    pub fn option_if_some(self, flag: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.option(flag, value),
            None => self,
        }
    }

    /// An untrusted positional value, rendered after `--`.
    pub fn operand(mut self, value: impl Into<String>) -> Self {
        self.operands.push(value.into());
        self
    }

    pub fn operand_if_some(self, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.operand(value),
            None => self,
        }
    }

    /// A revision placed before the terminator.
    ///
    /// Some commands (`checkout`, `rev-parse`) read everything after `--` as
    /// a pathspec, so the revision has to come first. The value must pass
    /// [`validate_ref_name`], which rules out anything git could parse as a
    /// flag.
    pub fn revision(mut self, value: &str) -> GitOpsResult<Self> {
        validate_ref_name(value)?;
        self.flags.push(value.to_string());
        Ok(self)
    }

    /// Emit `--` even when there are no operands.
    pub fn terminate(mut self) -> Self {
        self.force_terminator = true;
        self
    }

    /// Subcommand words joined by a space, e.g. `remote add`.
    pub fn name(&self) -> String {
        self.subcommand.join(" ")
    }

    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// The full argument list passed to the git binary.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = self.subcommand.iter().map(|s| s.to_string()).collect();
        tokens.extend(self.flags.iter().cloned());
        if !self.operands.is_empty() || self.force_terminator {
            tokens.push(TERMINATOR.to_string());
        }
        tokens.extend(self.operands.iter().cloned());
        tokens
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", render_tokens(&self.tokens()))
    }
}

/// Space-joined tokens, quoting any that are empty or contain whitespace.
pub(crate) fn render_tokens(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| {
            if token.is_empty() || token.contains(char::is_whitespace) {
                format!("{:?}", token)
            } else {
                token.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reject ref names git could misread or would refuse anyway.
pub fn validate_ref_name(name: &str) -> GitOpsResult<()> {
    if name.is_empty() {
        return Err(GitOpsError::invalid("ref name must not be empty"));
    }
    if name.starts_with('-') {
        return Err(GitOpsError::invalid(format!(
            "ref name '{}' must not start with '-'",
            name
        )));
    }
    if name.contains("..") {
        return Err(GitOpsError::invalid(format!(
            "ref name '{}' must not contain '..'",
            name
        )));
    }
    if name == "@" || name.contains("@{") {
        return Err(GitOpsError::invalid(format!(
            "ref name '{}' must not be '@' or contain '@{{'",
            name
        )));
    }
    if name.ends_with('.') {
        return Err(GitOpsError::invalid(format!(
            "ref name '{}' must not end with '.'",
            name
        )));
    }
    // Slash-separated components: none empty, none hidden, none a lock file.
    if let Some(component) = name
        .split('/')
        .find(|c| c.is_empty() || c.starts_with('.') || c.ends_with(".lock"))
    {
        return Err(GitOpsError::invalid(format!(
            "ref name '{}' has an invalid component '{}'",
            name, component
        )));
    }
    const FORBIDDEN: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN.contains(c))
    {
        return Err(GitOpsError::invalid(format!(
            "ref name '{}' contains forbidden character {:?}",
            name, c
        )));
    }
    Ok(())
}

/// Reject empty values for required operands.
pub(crate) fn require_non_empty(field: &str, value: &str) -> GitOpsResult<()> {
    if value.trim().is_empty() {
        return Err(GitOpsError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}
