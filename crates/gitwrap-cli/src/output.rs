//! Output formatting for the CLI.

use clap::ValueEnum;
use gitwrap_ops::{BranchInfo, PushResult, RecordedCommand, RemoteSpec};
use serde::Serialize;
use std::fmt;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What a command produced, printed as text or JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Done {
        message: String,
    },
    /// Raw output of a git invocation (fetch, merge).
    GitOutput {
        command: String,
        output: String,
    },
    Remotes {
        remotes: Vec<RemoteSpec>,
    },
    RemoteUrl {
        name: String,
        url: String,
    },
    Branches {
        current: Option<String>,
        branches: Vec<BranchInfo>,
    },
    CurrentBranch {
        branch: Option<String>,
    },
    Tags {
        tags: Vec<String>,
    },
    Tag {
        name: String,
        sha: String,
    },
    Pushed(PushResult),
}

impl Outcome {
    pub fn done(message: impl Into<String>) -> Self {
        Self::Done {
            message: message.into(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done { message } => write!(f, "{}", message),
            Outcome::GitOutput { command, output } => {
                let output = output.trim_end();
                if output.is_empty() {
                    write!(f, "{} completed", command)
                } else {
                    write!(f, "{}", output)
                }
            }
            Outcome::Remotes { remotes } => {
                if remotes.is_empty() {
                    return write!(f, "No remotes configured");
                }
                let lines: Vec<String> = remotes
                    .iter()
                    .map(|remote| match &remote.push_url {
                        Some(push) if push != &remote.fetch_url => format!(
                            "{:<16} {} (push: {})",
                            remote.name, remote.fetch_url, push
                        ),
                        _ => format!("{:<16} {}", remote.name, remote.fetch_url),
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Outcome::RemoteUrl { url, .. } => write!(f, "{}", url),
            Outcome::Branches { branches, .. } => {
                if branches.is_empty() {
                    return write!(f, "No branches");
                }
                let lines: Vec<String> = branches
                    .iter()
                    .map(|b| format!("{} {}", if b.is_current { "*" } else { " " }, b.full))
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Outcome::CurrentBranch { branch } => match branch {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "HEAD (detached)"),
            },
            Outcome::Tags { tags } => {
                if tags.is_empty() {
                    write!(f, "No tags")
                } else {
                    write!(f, "{}", tags.join("\n"))
                }
            }
            Outcome::Tag { sha, .. } => write!(f, "{}", sha),
            Outcome::Pushed(result) => {
                let what = result.branch.as_deref().unwrap_or("current branch");
                write!(f, "Pushed {} to {}", what, result.remote)?;
                if result.tags_pushed {
                    write!(f, " with tags")?;
                }
                Ok(())
            }
        }
    }
}

/// Print output in the specified format.
pub fn print<T: Serialize + fmt::Display>(value: &T, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            } else {
                println!("{}", value);
            }
        }
    }
}

/// Print the command lines a dry run would have executed.
pub fn print_dry_run(commands: &[RecordedCommand], format: &OutputFormat) {
    match format {
        OutputFormat::Text => {
            for command in commands {
                println!("{}", command);
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({ "dry_run": true, "commands": commands });
            println!("{}", value);
        }
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => {
            let value = serde_json::json!({ "status": "error", "message": message });
            eprintln!("{}", value);
        }
    }
}
