//! Option translation: typed options in, [`CommandLine`]s out.
//!
//! Every builder is a pure function. Flags come out in a fixed order
//! independent of how the options struct was populated, and every value a
//! caller supplies either follows its flag as a separate token or sits after
//! the `--` terminator.

use std::path::Path;

use crate::command_line::{require_non_empty, validate_ref_name, CommandLine};
use crate::error::{GitOpsError, GitOpsResult};
use crate::types::{
    AddRemoteOptions, CloneOptions, FetchOptions, InitOptions, MergeOptions, PushOptions,
    TagOptions, DEFAULT_REMOTE,
};

fn check_depth(depth: Option<u32>) -> GitOpsResult<Option<String>> {
    match depth {
        Some(0) => Err(GitOpsError::invalid("depth must be a positive integer")),
        Some(n) => Ok(Some(n.to_string())),
        None => Ok(None),
    }
}

fn path_operand(path: &Path) -> GitOpsResult<String> {
    let rendered = path.to_string_lossy().into_owned();
    require_non_empty("directory", &rendered)?;
    Ok(rendered)
}

/// `git fetch`.
///
/// Flag order: `--all`, `--tags`, `--prune`, `--prune-tags`, `--force`,
/// `--unshallow`, `--depth <n>`. The remote defaults to `origin` unless
/// `all` is set.
pub fn fetch(remote: Option<&str>, opts: &FetchOptions) -> GitOpsResult<CommandLine> {
    if opts.all && (remote.is_some() || opts.git_ref.is_some()) {
        return Err(GitOpsError::invalid(
            "fetch --all does not take a remote or ref",
        ));
    }
    if opts.unshallow && opts.depth.is_some() {
        return Err(GitOpsError::invalid(
            "depth and unshallow cannot be used together",
        ));
    }
    let depth = check_depth(opts.depth)?;
    if let Some(remote) = remote {
        require_non_empty("remote", remote)?;
    }
    if let Some(git_ref) = opts.git_ref.as_deref() {
        require_non_empty("ref", git_ref)?;
    }

    let cmd = CommandLine::new(&["fetch"])
        .flag_if(opts.all, "--all")
        .flag_if(opts.tags, "--tags")
        .flag_if(opts.prune, "--prune")
        .flag_if(opts.prune_tags, "--prune-tags")
        .flag_if(opts.force, "--force")
        .flag_if(opts.unshallow, "--unshallow")
        .option_if_some("--depth", depth);

    if opts.all {
        return Ok(cmd);
    }

    Ok(cmd
        .operand(remote.unwrap_or(DEFAULT_REMOTE))
        .operand_if_some(opts.git_ref.as_deref()))
}

/// `git push`, plus a second `git push --tags` when `tags` is set.
pub fn push(remote: &str, opts: &PushOptions) -> GitOpsResult<Vec<CommandLine>> {
    require_non_empty("remote", remote)?;
    if let Some(branch) = opts.branch.as_deref() {
        require_non_empty("branch", branch)?;
    }
    if opts.mirror && (opts.branch.is_some() || opts.tags) {
        return Err(GitOpsError::invalid(
            "mirror cannot be combined with a branch or tags",
        ));
    }
    if opts.delete && opts.branch.is_none() {
        return Err(GitOpsError::invalid("delete requires a branch"));
    }

    let mut commands = vec![CommandLine::new(&["push"])
        .flag_if(opts.mirror, "--mirror")
        .flag_if(opts.delete, "--delete")
        .flag_if(opts.force, "--force")
        .operand(remote)
        .operand_if_some(opts.branch.as_deref())];

    if opts.tags {
        commands.push(
            CommandLine::new(&["push"])
                .flag("--tags")
                .flag_if(opts.force, "--force")
                .operand(remote),
        );
    }

    Ok(commands)
}

/// `git clone`.
pub fn clone(url: &str, dir: &Path, opts: &CloneOptions) -> GitOpsResult<CommandLine> {
    require_non_empty("url", url)?;
    let dir = path_operand(dir)?;
    let depth = check_depth(opts.depth)?;
    if let Some(entry) = opts.config.iter().find(|entry| !entry.contains('=')) {
        return Err(GitOpsError::invalid(format!(
            "config entry '{}' must be key=value",
            entry
        )));
    }

    let mut cmd = CommandLine::new(&["clone"])
        .flag_if(opts.bare, "--bare")
        .flag_if(opts.mirror, "--mirror")
        .flag_if(opts.recursive, "--recursive")
        .option_if_some("--branch", opts.branch.as_deref())
        .option_if_some("--origin", opts.origin.as_deref())
        .option_if_some("--depth", depth);

    for entry in &opts.config {
        cmd = cmd.option("--config", entry.as_str());
    }

    Ok(cmd.operand(url).operand(dir))
}

/// `git init`.
pub fn init(dir: &Path, opts: &InitOptions) -> GitOpsResult<CommandLine> {
    let dir = path_operand(dir)?;
    Ok(CommandLine::new(&["init"])
        .flag_if(opts.bare, "--bare")
        .option_if_some("--initial-branch", opts.initial_branch.as_deref())
        .operand(dir))
}

pub fn remote_add(name: &str, url: &str, opts: &AddRemoteOptions) -> GitOpsResult<CommandLine> {
    require_non_empty("remote name", name)?;
    require_non_empty("url", url)?;
    Ok(CommandLine::new(&["remote", "add"])
        .flag_if(opts.fetch, "-f")
        .option_if_some("-t", opts.track.as_deref())
        .operand(name)
        .operand(url))
}

pub fn remote_remove(name: &str) -> GitOpsResult<CommandLine> {
    require_non_empty("remote name", name)?;
    Ok(CommandLine::new(&["remote", "remove"]).operand(name))
}

pub fn remote_set_url(name: &str, url: &str) -> GitOpsResult<CommandLine> {
    require_non_empty("remote name", name)?;
    require_non_empty("url", url)?;
    Ok(CommandLine::new(&["remote", "set-url"])
        .operand(name)
        .operand(url))
}

pub fn remote_get_url(name: &str) -> GitOpsResult<CommandLine> {
    require_non_empty("remote name", name)?;
    Ok(CommandLine::new(&["remote", "get-url"]).operand(name))
}

pub fn remote_list() -> CommandLine {
    CommandLine::new(&["remote", "-v"])
}

/// `git merge`. `--no-edit` is always passed so git never waits for an editor.
pub fn merge<S: AsRef<str>>(commits: &[S], opts: &MergeOptions) -> GitOpsResult<CommandLine> {
    if commits.is_empty() {
        return Err(GitOpsError::invalid("merge requires at least one commit"));
    }

    let mut cmd = CommandLine::new(&["merge"])
        .flag("--no-edit")
        .flag_if(opts.no_ff, "--no-ff")
        .flag_if(opts.no_commit, "--no-commit")
        .option_if_some("-m", opts.message.as_deref());

    for commit in commits {
        let commit = commit.as_ref();
        require_non_empty("commit", commit)?;
        cmd = cmd.operand(commit);
    }
    Ok(cmd)
}

pub fn branch_list() -> CommandLine {
    CommandLine::new(&["branch", "-a", "--no-color"])
}

pub fn branch_create(name: &str, start_point: Option<&str>) -> GitOpsResult<CommandLine> {
    validate_ref_name(name)?;
    Ok(CommandLine::new(&["branch"])
        .operand(name)
        .operand_if_some(start_point))
}

pub fn branch_delete(name: &str, force: bool) -> GitOpsResult<CommandLine> {
    require_non_empty("branch", name)?;
    Ok(CommandLine::new(&["branch"])
        .flag(if force { "-D" } else { "-d" })
        .operand(name))
}

/// `git checkout <branch> --`.
///
/// After `--` checkout expects paths, so the branch goes first and is
/// validated as a ref name instead.
pub fn checkout(name: &str) -> GitOpsResult<CommandLine> {
    Ok(CommandLine::new(&["checkout"]).revision(name)?.terminate())
}

/// `git symbolic-ref --quiet --short HEAD`.
///
/// Prints the branch name even before the first commit; exits 1 without
/// output on a detached HEAD.
pub fn current_branch() -> CommandLine {
    CommandLine::new(&["symbolic-ref", "--quiet", "--short", "HEAD"])
}

pub fn tag_list() -> CommandLine {
    CommandLine::new(&["tag", "--list"])
}

pub fn tag_create(name: &str, opts: &TagOptions) -> GitOpsResult<CommandLine> {
    validate_ref_name(name)?;
    let annotate = opts.message.is_some();
    Ok(CommandLine::new(&["tag"])
        .flag_if(annotate, "-a")
        .option_if_some("-m", opts.message.as_deref())
        .flag_if(opts.force, "-f")
        .operand(name)
        .operand_if_some(opts.target.as_deref()))
}

pub fn tag_delete(name: &str) -> GitOpsResult<CommandLine> {
    require_non_empty("tag", name)?;
    Ok(CommandLine::new(&["tag", "-d"]).operand(name))
}

/// `git show-ref --verify --dereference -- refs/tags/<name>`.
pub fn tag_lookup(name: &str) -> GitOpsResult<CommandLine> {
    require_non_empty("tag", name)?;
    Ok(CommandLine::new(&["show-ref", "--verify", "--dereference"])
        .operand(format!("refs/tags/{}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(cmd: &CommandLine) -> Vec<String> {
        cmd.tokens()
    }

    #[test]
    fn fetch_with_no_args_defaults_to_origin() {
        let cmd = fetch(None, &FetchOptions::default()).expect("build");
        assert_eq!(tokens(&cmd), vec!["fetch", "--", "origin"]);
    }

    #[test]
    fn fetch_with_origin_and_branch() {
        let opts = FetchOptions {
            git_ref: Some("master".into()),
            depth: Some(2),
            ..Default::default()
        };
        let cmd = fetch(Some("origin"), &opts).expect("build");
        assert_eq!(
            tokens(&cmd),
            vec!["fetch", "--depth", "2", "--", "origin", "master"]
        );
    }

    #[test]
    fn fetch_with_all() {
        let opts = FetchOptions {
            all: true,
            ..Default::default()
        };
        let cmd = fetch(None, &opts).expect("build");
        assert_eq!(tokens(&cmd), vec!["fetch", "--all"]);
    }

    #[test]
    fn fetch_with_all_with_other_args() {
        let opts = FetchOptions {
            all: true,
            force: true,
            depth: Some(2),
            ..Default::default()
        };
        let cmd = fetch(None, &opts).expect("build");
        assert_eq!(
            tokens(&cmd),
            vec!["fetch", "--all", "--force", "--depth", "2"]
        );
    }

    #[test]
    fn fetch_flag_order_is_fixed() {
        let opts = FetchOptions {
            force: true,
            prune_tags: true,
            tags: true,
            prune: true,
            ..Default::default()
        };
        let cmd = fetch(Some("upstream"), &opts).expect("build");
        assert_eq!(
            tokens(&cmd),
            vec![
                "fetch",
                "--tags",
                "--prune",
                "--prune-tags",
                "--force",
                "--",
                "upstream"
            ]
        );
        assert_eq!(cmd, fetch(Some("upstream"), &opts.clone()).expect("build"));
    }

    #[test]
    fn fetch_injection_stays_after_terminator() {
        let origin = "--upload-pack=touch VULNERABILITY_EXISTS;";
        let opts = FetchOptions {
            git_ref: Some("some/ref/head".into()),
            ..Default::default()
        };
        let cmd = fetch(Some(origin), &opts).expect("build");
        let tokens = tokens(&cmd);
        assert_eq!(tokens, vec!["fetch", "--", origin, "some/ref/head"]);

        let terminator = tokens.iter().position(|t| t == "--").expect("terminator");
        let injected = tokens.iter().position(|t| t == origin).expect("origin");
        assert!(injected > terminator);
    }

    #[test]
    fn fetch_ref_that_looks_like_a_flag_is_an_operand() {
        let opts = FetchOptions {
            git_ref: Some("--upload-pack=evil".into()),
            ..Default::default()
        };
        let cmd = fetch(None, &opts).expect("build");
        assert_eq!(
            tokens(&cmd),
            vec!["fetch", "--", "origin", "--upload-pack=evil"]
        );
    }

    #[test]
    fn fetch_rejects_invalid_combinations() {
        let all_with_remote = FetchOptions {
            all: true,
            ..Default::default()
        };
        assert!(matches!(
            fetch(Some("origin"), &all_with_remote),
            Err(GitOpsError::InvalidOption { .. })
        ));

        let all_with_ref = FetchOptions {
            all: true,
            git_ref: Some("master".into()),
            ..Default::default()
        };
        assert!(matches!(
            fetch(None, &all_with_ref),
            Err(GitOpsError::InvalidOption { .. })
        ));

        let zero_depth = FetchOptions {
            depth: Some(0),
            ..Default::default()
        };
        assert!(fetch(None, &zero_depth).is_err());

        let unshallow_and_depth = FetchOptions {
            depth: Some(3),
            unshallow: true,
            ..Default::default()
        };
        assert!(fetch(None, &unshallow_and_depth).is_err());

        assert!(fetch(Some(""), &FetchOptions::default()).is_err());
    }

    #[test]
    fn push_branch_then_tags() {
        let opts = PushOptions {
            branch: Some("testbranch".into()),
            tags: true,
            ..Default::default()
        };
        let commands = push("testrem", &opts).expect("build");
        assert_eq!(commands.len(), 2);
        assert_eq!(
            tokens(&commands[0]),
            vec!["push", "--", "testrem", "testbranch"]
        );
        assert_eq!(tokens(&commands[1]), vec!["push", "--tags", "--", "testrem"]);
    }

    #[test]
    fn push_force_delete() {
        let opts = PushOptions {
            branch: Some("old".into()),
            force: true,
            delete: true,
            ..Default::default()
        };
        let commands = push("origin", &opts).expect("build");
        assert_eq!(
            tokens(&commands[0]),
            vec!["push", "--delete", "--force", "--", "origin", "old"]
        );
    }

    #[test]
    fn push_rejects_mirror_with_branch_and_delete_without_branch() {
        let mirror = PushOptions {
            mirror: true,
            branch: Some("main".into()),
            ..Default::default()
        };
        assert!(push("origin", &mirror).is_err());

        let delete = PushOptions {
            delete: true,
            ..Default::default()
        };
        assert!(push("origin", &delete).is_err());
    }

    #[test]
    fn clone_with_config_and_depth() {
        let opts = CloneOptions {
            bare: true,
            branch: Some("develop".into()),
            depth: Some(1),
            config: vec!["receive.denyCurrentBranch=ignore".into()],
            ..Default::default()
        };
        let cmd = clone("https://example.com/repo.git", Path::new("local"), &opts)
            .expect("build");
        assert_eq!(
            tokens(&cmd),
            vec![
                "clone",
                "--bare",
                "--branch",
                "develop",
                "--depth",
                "1",
                "--config",
                "receive.denyCurrentBranch=ignore",
                "--",
                "https://example.com/repo.git",
                "local"
            ]
        );
    }

    #[test]
    fn clone_rejects_malformed_config() {
        let opts = CloneOptions {
            config: vec!["novalue".into()],
            ..Default::default()
        };
        assert!(clone("url", Path::new("dir"), &opts).is_err());
    }

    #[test]
    fn init_bare_with_branch() {
        let opts = InitOptions {
            bare: true,
            initial_branch: Some("main".into()),
        };
        let cmd = init(Path::new("repo.git"), &opts).expect("build");
        assert_eq!(
            tokens(&cmd),
            vec!["init", "--bare", "--initial-branch", "main", "--", "repo.git"]
        );
    }

    #[test]
    fn remote_commands() {
        let add = remote_add(
            "testremote3",
            "../remote",
            &AddRemoteOptions {
                fetch: true,
                track: Some("master".into()),
            },
        )
        .expect("build");
        assert_eq!(
            tokens(&add),
            vec!["remote", "add", "-f", "-t", "master", "--", "testremote3", "../remote"]
        );

        assert_eq!(
            tokens(&remote_remove("testremote").expect("build")),
            vec!["remote", "remove", "--", "testremote"]
        );
        assert_eq!(
            tokens(&remote_set_url("testremote", "../remote2").expect("build")),
            vec!["remote", "set-url", "--", "testremote", "../remote2"]
        );
        assert_eq!(
            tokens(&remote_get_url("-v").expect("build")),
            vec!["remote", "get-url", "--", "-v"]
        );
        assert_eq!(tokens(&remote_list()), vec!["remote", "-v"]);
        assert!(remote_add("", "url", &AddRemoteOptions::default()).is_err());
    }

    #[test]
    fn merge_flags_and_commits() {
        let opts = MergeOptions {
            message: Some("merge testbranch".into()),
            no_ff: true,
            no_commit: false,
        };
        let cmd = merge(&["testrem/testbranch"], &opts).expect("build");
        assert_eq!(
            tokens(&cmd),
            vec![
                "merge",
                "--no-edit",
                "--no-ff",
                "-m",
                "merge testbranch",
                "--",
                "testrem/testbranch"
            ]
        );

        let empty: [&str; 0] = [];
        assert!(merge(&empty, &MergeOptions::default()).is_err());
    }

    #[test]
    fn branch_commands() {
        assert_eq!(
            tokens(&branch_create("testbranch", Some("master")).expect("build")),
            vec!["branch", "--", "testbranch", "master"]
        );
        assert!(branch_create("-D", None).is_err());
        assert_eq!(
            tokens(&branch_delete("testbranch", true).expect("build")),
            vec!["branch", "-D", "--", "testbranch"]
        );
        assert_eq!(
            tokens(&checkout("testbranch").expect("build")),
            vec!["checkout", "testbranch", "--"]
        );
        assert!(checkout("--detach").is_err());
    }

    #[test]
    fn tag_commands() {
        let annotated = TagOptions {
            message: Some("release".into()),
            force: true,
            target: Some("HEAD~1".into()),
        };
        assert_eq!(
            tokens(&tag_create("v1.0", &annotated).expect("build")),
            vec!["tag", "-a", "-m", "release", "-f", "--", "v1.0", "HEAD~1"]
        );
        assert_eq!(
            tokens(&tag_create("test-tag", &TagOptions::default()).expect("build")),
            vec!["tag", "--", "test-tag"]
        );
        assert_eq!(
            tokens(&tag_delete("test-tag").expect("build")),
            vec!["tag", "-d", "--", "test-tag"]
        );
        assert_eq!(
            tokens(&tag_lookup("test-tag").expect("build")),
            vec!["show-ref", "--verify", "--dereference", "--", "refs/tags/test-tag"]
        );
    }
}
