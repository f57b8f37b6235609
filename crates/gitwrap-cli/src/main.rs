//! gitwrap - typed front end for git remote, branch and tag operations.

mod commands;
mod config;
mod output;
mod paths;

use clap::{Parser, Subcommand};
use commands::{Context, SharedInvoker};
use config::Config;
use gitwrap_ops::{
    AddRemoteOptions, CloneOptions, DryRunInvoker, FetchOptions, GitOpsError, InitOptions,
    MergeOptions, PushOptions, TagOptions, DEFAULT_REMOTE,
};
use output::{OutputFormat, Outcome};
use paths::Paths;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// gitwrap - run git clone, remote, fetch, push, merge, branch and tag
/// operations with validated arguments.
#[derive(Parser)]
#[command(name = "gitwrap")]
#[command(about = "Typed front end for git remote, branch and tag operations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository to operate on
    #[arg(long, default_value = ".", global = true)]
    repo: PathBuf,

    /// Output format (text or json)
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print the git command lines instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Directory holding config.json (defaults to ~/.gitwrap)
    #[arg(long, env = "GITWRAP_HOME", global = true)]
    base_dir: Option<PathBuf>,

    /// git executable to run; overrides the config file
    #[arg(long, global = true)]
    git_binary: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository into a new directory
    Clone {
        /// Repository URL or path
        url: String,
        /// Target directory
        dir: PathBuf,
        #[arg(long)]
        bare: bool,
        #[arg(long)]
        mirror: bool,
        /// Branch to check out instead of the remote HEAD
        #[arg(long)]
        branch: Option<String>,
        /// Name for the remote instead of origin
        #[arg(long)]
        origin: Option<String>,
        /// Create a shallow clone with this many commits
        #[arg(long)]
        depth: Option<u32>,
        /// Set a config value in the new repository
        #[arg(long = "config", value_name = "KEY=VALUE")]
        config: Vec<String>,
        /// Also clone submodules
        #[arg(long)]
        recursive: bool,
    },

    /// Create an empty repository
    Init {
        /// Directory to initialise
        dir: PathBuf,
        #[arg(long)]
        bare: bool,
        /// Name of the first branch
        #[arg(long)]
        initial_branch: Option<String>,
    },

    /// Manage remotes
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },

    /// Download objects and refs from a remote
    Fetch {
        /// Remote to fetch from (defaults to origin unless --all)
        remote: Option<String>,
        /// Ref or commit to fetch
        #[arg(long = "ref")]
        git_ref: Option<String>,
        #[arg(long)]
        depth: Option<u32>,
        /// Fetch all tags
        #[arg(long)]
        tags: bool,
        /// Fetch every remote
        #[arg(long)]
        all: bool,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        prune: bool,
        #[arg(long)]
        prune_tags: bool,
        #[arg(long)]
        unshallow: bool,
    },

    /// Update a remote with local refs
    Push {
        /// Remote to push to
        #[arg(default_value = DEFAULT_REMOTE)]
        remote: String,
        /// Branch to push
        branch: Option<String>,
        /// Also push all tags
        #[arg(long)]
        tags: bool,
        #[arg(long)]
        force: bool,
        /// Delete the branch on the remote
        #[arg(long)]
        delete: bool,
        #[arg(long)]
        mirror: bool,
    },

    /// Merge commits into the current branch
    Merge {
        /// Commits or branches to merge
        #[arg(required = true)]
        commits: Vec<String>,
        /// Merge commit message
        #[arg(short, long)]
        message: Option<String>,
        #[arg(long)]
        no_ff: bool,
        #[arg(long)]
        no_commit: bool,
    },

    /// Manage branches
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },

    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
}

#[derive(Subcommand)]
enum RemoteCommands {
    /// List remotes with their URLs
    List,
    /// Add a remote
    Add {
        name: String,
        url: String,
        /// Fetch the remote right after adding it
        #[arg(long)]
        fetch: bool,
        /// Only track this branch
        #[arg(long)]
        track: Option<String>,
    },
    /// Remove a remote
    Remove { name: String },
    /// Change a remote's URL
    SetUrl { name: String, url: String },
    /// Print a remote's URL
    GetUrl { name: String },
}

#[derive(Subcommand)]
enum BranchCommands {
    /// List local and remote-tracking branches
    List,
    /// Create a branch
    Create {
        name: String,
        /// Commit to start from (defaults to HEAD)
        start: Option<String>,
    },
    /// Delete a branch
    Delete {
        name: String,
        /// Delete even if not merged
        #[arg(long)]
        force: bool,
    },
    /// Switch to a branch
    Checkout { name: String },
    /// Print the checked-out branch
    Current,
}

#[derive(Subcommand)]
enum TagCommands {
    /// List tags
    List,
    /// Create a tag
    Create {
        name: String,
        /// Commit to tag (defaults to HEAD)
        target: Option<String>,
        /// Annotation message; creates an annotated tag
        #[arg(short, long)]
        message: Option<String>,
        /// Replace an existing tag
        #[arg(long)]
        force: bool,
    },
    /// Delete a tag
    Delete { name: String },
    /// Print the commit a tag points at
    Show { name: String },
}

fn dispatch(ctx: &Context, command: Commands) -> anyhow::Result<Outcome> {
    match command {
        Commands::Clone {
            url,
            dir,
            bare,
            mirror,
            branch,
            origin,
            depth,
            config,
            recursive,
        } => commands::clone(
            ctx,
            &url,
            &dir,
            &CloneOptions {
                bare,
                mirror,
                recursive,
                branch,
                origin,
                depth,
                config,
            },
        ),
        Commands::Init {
            dir,
            bare,
            initial_branch,
        } => commands::init(
            ctx,
            &dir,
            &InitOptions {
                bare,
                initial_branch,
            },
        ),
        Commands::Remote { command } => match command {
            RemoteCommands::List => commands::remote_list(ctx),
            RemoteCommands::Add {
                name,
                url,
                fetch,
                track,
            } => commands::remote_add(ctx, &name, &url, &AddRemoteOptions { fetch, track }),
            RemoteCommands::Remove { name } => commands::remote_remove(ctx, &name),
            RemoteCommands::SetUrl { name, url } => commands::remote_set_url(ctx, &name, &url),
            RemoteCommands::GetUrl { name } => commands::remote_get_url(ctx, &name),
        },
        Commands::Fetch {
            remote,
            git_ref,
            depth,
            tags,
            all,
            force,
            prune,
            prune_tags,
            unshallow,
        } => commands::fetch(
            ctx,
            remote.as_deref(),
            &FetchOptions {
                git_ref,
                depth,
                tags,
                all,
                force,
                prune,
                prune_tags,
                unshallow,
            },
        ),
        Commands::Push {
            remote,
            branch,
            tags,
            force,
            delete,
            mirror,
        } => commands::push(
            ctx,
            &remote,
            &PushOptions {
                branch,
                tags,
                force,
                delete,
                mirror,
            },
        ),
        Commands::Merge {
            commits,
            message,
            no_ff,
            no_commit,
        } => commands::merge(
            ctx,
            &commits,
            &MergeOptions {
                message,
                no_ff,
                no_commit,
            },
        ),
        Commands::Branch { command } => match command {
            BranchCommands::List => commands::branch_list(ctx),
            BranchCommands::Create { name, start } => {
                commands::branch_create(ctx, &name, start.as_deref())
            }
            BranchCommands::Delete { name, force } => commands::branch_delete(ctx, &name, force),
            BranchCommands::Checkout { name } => commands::branch_checkout(ctx, &name),
            BranchCommands::Current => commands::branch_current(ctx),
        },
        Commands::Tag { command } => match command {
            TagCommands::List => commands::tag_list(ctx),
            TagCommands::Create {
                name,
                target,
                message,
                force,
            } => commands::tag_create(
                ctx,
                &name,
                &TagOptions {
                    message,
                    force,
                    target,
                },
            ),
            TagCommands::Delete { name } => commands::tag_delete(ctx, &name),
            TagCommands::Show { name } => commands::tag_show(ctx, &name),
        },
    }
}

/// Whether an error was raised by argument validation, before git ran.
fn is_invalid_option(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<GitOpsError>(),
        Some(GitOpsError::InvalidOption { .. })
    )
}

/// git's own exit code when it failed, otherwise 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<GitOpsError>()
        .and_then(GitOpsError::exit_code)
        .filter(|code| *code > 0)
        .unwrap_or(1)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = match &cli.base_dir {
        Some(dir) => Paths::with_base_dir(dir.clone()),
        None => Paths::new()?,
    };

    let mut config = Config::load(&paths)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(binary) = &cli.git_binary {
        config.git_binary = binary.clone();
    }

    observability::init_with_config(observability::LogConfig {
        service_name: "gitwrap".into(),
        default_level: config.log_level.clone(),
        json: config.log_json,
        log_path: config.log_file.clone(),
    })?;
    debug!(config_file = %paths.config_file().display(), "Configuration loaded");

    let recorder = cli.dry_run.then(|| Arc::new(DryRunInvoker::new()));
    let invoker: SharedInvoker = match &recorder {
        Some(recorder) => Arc::clone(recorder) as SharedInvoker,
        None => Arc::new(config.system_invoker()),
    };

    let ctx = Context::new(cli.repo.clone(), invoker);
    let format = cli.format;
    let result = dispatch(&ctx, cli.command);

    match recorder {
        Some(recorder) => {
            // Outputs in a dry run are synthetic; only validation errors are real.
            if let Err(err) = result {
                if is_invalid_option(&err) {
                    return Err(err);
                }
            }
            output::print_dry_run(&recorder.recorded(), &format);
        }
        None => output::print(&result?, &format),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(err) = run(cli) {
        output::print_error(&format!("{:#}", err), &format);
        std::process::exit(exit_code(&err));
    }
}
