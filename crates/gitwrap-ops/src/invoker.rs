//! Running command lines.
//!
//! [`GitInvoker`] is the seam between building a command and executing it.
//! [`SystemInvoker`] spawns the real binary; [`DryRunInvoker`] records what
//! would have run and answers from a queue of canned outputs.

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, warn};

use crate::command_line::{render_tokens, CommandLine};
use crate::error::{GitOpsError, GitOpsResult};
use crate::types::CommandOutput;

/// Executes git command lines.
///
/// Implementations return `Ok` only for a zero exit status; a nonzero exit
/// becomes [`GitOpsError::ExecutionFailed`].
pub trait GitInvoker: Send + Sync {
    fn invoke(&self, command: &CommandLine, working_dir: Option<&Path>)
        -> GitOpsResult<CommandOutput>;
}

impl<T: GitInvoker + ?Sized> GitInvoker for &T {
    fn invoke(
        &self,
        command: &CommandLine,
        working_dir: Option<&Path>,
    ) -> GitOpsResult<CommandOutput> {
        (**self).invoke(command, working_dir)
    }
}

impl<T: GitInvoker + ?Sized> GitInvoker for Arc<T> {
    fn invoke(
        &self,
        command: &CommandLine,
        working_dir: Option<&Path>,
    ) -> GitOpsResult<CommandOutput> {
        (**self).invoke(command, working_dir)
    }
}

impl<T: GitInvoker + ?Sized> GitInvoker for Box<T> {
    fn invoke(
        &self,
        command: &CommandLine,
        working_dir: Option<&Path>,
    ) -> GitOpsResult<CommandOutput> {
        (**self).invoke(command, working_dir)
    }
}

/// Map a finished process to `Ok` or [`GitOpsError::ExecutionFailed`].
pub(crate) fn ensure_success(
    command: &CommandLine,
    output: CommandOutput,
) -> GitOpsResult<CommandOutput> {
    if output.success() {
        return Ok(output);
    }

    warn!(
        command = %command,
        exit_code = output.exit_code,
        "git exited with failure"
    );

    Err(GitOpsError::ExecutionFailed {
        command: command.name(),
        exit_code: output.exit_code,
        output: output.combined().trim().to_string(),
    })
}

/// Spawns the git binary directly, one blocking process per call.
#[derive(Debug, Clone)]
pub struct SystemInvoker {
    binary: PathBuf,
    disable_terminal_prompt: bool,
    env: Vec<(String, String)>,
}

impl Default for SystemInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemInvoker {
    /// Uses `git` from `PATH` and disables credential prompts.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("git"),
            disable_terminal_prompt: true,
            env: Vec::new(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Whether to set `GIT_TERMINAL_PROMPT=0` for every invocation.
    pub fn with_terminal_prompt_disabled(mut self, disabled: bool) -> Self {
        self.disable_terminal_prompt = disabled;
        self
    }

    /// Extra environment variable for every invocation.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl GitInvoker for SystemInvoker {
    fn invoke(
        &self,
        command: &CommandLine,
        working_dir: Option<&Path>,
    ) -> GitOpsResult<CommandOutput> {
        debug!(
            command = %command,
            working_dir = ?working_dir,
            binary = %self.binary.display(),
            "Running git"
        );

        let mut process = Command::new(&self.binary);
        process.args(command.tokens()).stdin(Stdio::null());

        if let Some(dir) = working_dir {
            process.current_dir(dir);
        }
        if self.disable_terminal_prompt {
            process.env("GIT_TERMINAL_PROMPT", "0");
        }
        for (key, value) in &self.env {
            process.env(key, value);
        }

        let output = process.output()?;
        let captured = CommandOutput {
            // Killed by a signal: no exit code.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        ensure_success(command, captured)
    }
}

/// A command line seen by [`DryRunInvoker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedCommand {
    pub tokens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl fmt::Display for RecordedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", render_tokens(&self.tokens))
    }
}

/// Records command lines instead of running them.
///
/// Each call pops the next queued response, or succeeds with empty output
/// when the queue is empty. Queued responses with a nonzero exit code fail the
/// same way a real process would.
#[derive(Debug, Default)]
pub struct DryRunInvoker {
    recorded: Mutex<Vec<RecordedCommand>>,
    responses: Mutex<VecDeque<CommandOutput>>,
}

impl DryRunInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next unanswered invocation.
    pub fn respond(&self, output: CommandOutput) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(output);
        self
    }

    /// Queue a successful invocation printing `stdout`.
    pub fn respond_stdout(&self, stdout: impl Into<String>) -> &Self {
        self.respond(CommandOutput {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        })
    }

    pub fn recorded(&self) -> Vec<RecordedCommand> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Token lists of every recorded invocation, in order.
    pub fn recorded_tokens(&self) -> Vec<Vec<String>> {
        self.recorded().into_iter().map(|r| r.tokens).collect()
    }
}

impl GitInvoker for DryRunInvoker {
    fn invoke(
        &self,
        command: &CommandLine,
        working_dir: Option<&Path>,
    ) -> GitOpsResult<CommandOutput> {
        debug!(command = %command, "Dry run");

        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCommand {
                tokens: command.tokens(),
                working_dir: working_dir.map(Path::to_path_buf),
            });

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_default();

        ensure_success(command, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_records_and_defaults_to_success() {
        let invoker = DryRunInvoker::new();
        let cmd = CommandLine::new(&["fetch"]).operand("origin");

        let output = invoker
            .invoke(&cmd, Some(Path::new("/tmp/repo")))
            .expect("dry run succeeds");
        assert!(output.success());

        let recorded = invoker.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].tokens, vec!["fetch", "--", "origin"]);
        assert_eq!(recorded[0].working_dir.as_deref(), Some(Path::new("/tmp/repo")));
    }

    #[test]
    fn dry_run_failure_response_maps_to_execution_failed() {
        let invoker = DryRunInvoker::new();
        invoker.respond(CommandOutput {
            exit_code: 128,
            stdout: String::new(),
            stderr: "fatal: 'nope' does not appear to be a git repository\n".into(),
        });

        let err = invoker
            .invoke(&CommandLine::new(&["fetch"]).operand("nope"), None)
            .expect_err("should fail");
        match err {
            GitOpsError::ExecutionFailed {
                command,
                exit_code,
                output,
            } => {
                assert_eq!(command, "fetch");
                assert_eq!(exit_code, 128);
                assert!(output.contains("does not appear to be a git repository"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn recorded_command_displays_like_a_shell_line() {
        let invoker = DryRunInvoker::new();
        let cmd = CommandLine::new(&["merge", "--no-edit"])
            .option("-m", "merge two branches")
            .operand("testrem/master");
        invoker.invoke(&cmd, None).expect("ok");

        let recorded = &invoker.recorded()[0];
        assert_eq!(recorded.to_string(), cmd.to_string());
        assert_eq!(
            recorded.to_string(),
            r#"git merge --no-edit -m "merge two branches" -- testrem/master"#
        );
    }

    #[test]
    fn shared_invoker_through_arc() {
        let invoker = Arc::new(DryRunInvoker::new());
        let shared: Arc<DryRunInvoker> = Arc::clone(&invoker);
        shared
            .invoke(&CommandLine::new(&["remote", "-v"]), None)
            .expect("ok");
        assert_eq!(invoker.recorded_tokens(), vec![vec!["remote", "-v"]]);
    }

    #[test]
    fn system_invoker_missing_binary_is_spawn_error() {
        let invoker = SystemInvoker::new().with_binary("/nonexistent/gitwrap-no-such-git");
        let err = invoker
            .invoke(&CommandLine::new(&["--version"]), None)
            .expect_err("spawn must fail");
        assert!(matches!(err, GitOpsError::Spawn(_)));
    }

    #[test]
    fn system_invoker_builder() {
        let invoker = SystemInvoker::new()
            .with_binary("/usr/local/bin/git")
            .with_terminal_prompt_disabled(false)
            .with_env("GIT_CONFIG_NOSYSTEM", "1");
        assert_eq!(invoker.binary(), Path::new("/usr/local/bin/git"));
        assert!(!invoker.disable_terminal_prompt);
        assert_eq!(invoker.env.len(), 1);
    }
}
