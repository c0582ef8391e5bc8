use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use is_terminal::IsTerminal;
use orbit::areas::repository::Repository;
use orbit::artifacts::core::PagerWriter;
use orbit::artifacts::objects::commit_id::CommitId;
use orbit::artifacts::registry::registry_from_env;
use orbit::artifacts::remote::ObjectStore;
use orbit::artifacts::remote::settings::{RemoteTarget, SyncSettings};
use orbit::commands::porcelain::log::LogOptions;
use orbit::commands::porcelain::revert::RevertTarget;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "orbit",
    version,
    about = "A minimal version-control tool with object-storage remotes",
    long_about = "orbit stages files, snapshots them into commits under .mygitorbit/, \
    and mirrors those commits to an S3-compatible bucket (or a local directory) \
    so they can be pulled and reverted elsewhere.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates .mygitorbit/ in the current directory, records the \
        repository name and registers the repository with the hosting service."
    )]
    Init {
        #[arg(short, long, help = "The repository name")]
        name: String,
        #[arg(long, help = "The owner recorded by the hosting service")]
        owner: Option<String>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command copies the given files into the staging area. \
        Each file is staged independently; the command fails if any of them could not be staged."
    )]
    Add {
        #[arg(index = 1, required = true, num_args = 1.., help = "The files to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command snapshots the staging area into a new commit and clears it."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: Option<String>,
        #[arg(
            short = 'm',
            long = "message",
            conflicts_with = "message",
            help = "The commit message"
        )]
        message_flag: Option<String>,
        #[arg(long, help = "Keep staged files for the next commit")]
        keep_staged: bool,
    },
    #[command(name = "push", about = "Upload all local commits to the remote store")]
    Push,
    #[command(name = "pull", about = "Download remote commits missing locally")]
    Pull,
    #[command(
        name = "revert",
        about = "Restore the files recorded in a commit",
        long_about = "This command copies the files of a commit into the working tree, \
        or into the staging area with --staged. The commit is pulled first when it is \
        only present on the remote."
    )]
    Revert {
        #[arg(index = 1, help = "The commit id")]
        commit_id: String,
        #[arg(long, help = "Restore into the staging area instead of the working tree")]
        staged: bool,
    },
    #[command(name = "log", about = "Show commit history")]
    Log {
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
        #[arg(long, help = "Show only the first characters of each commit id")]
        abbrev_commit: bool,
    },
}

impl Commands {
    fn label(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Add { .. } => "add",
            Commands::Commit { .. } => "commit",
            Commands::Push => "push",
            Commands::Pull => "pull",
            Commands::Revert { .. } => "revert",
            Commands::Log { .. } => "log",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let label = cli.command.label();

    match run(cli.command).await.context(label) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ORBIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_repository(writer: Box<dyn std::io::Write>) -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Ok(Repository::new(&pwd.to_string_lossy(), writer)?.with_settings(SyncSettings::from_env()))
}

async fn connect_remote(repository: &Repository) -> Result<Box<dyn ObjectStore>> {
    let config = repository.config()?;
    let target = RemoteTarget::resolve(&config)?;
    tracing::debug!(?target, "connecting to remote");

    Ok(target.connect().await)
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Init { name, owner } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;
            let registry = registry_from_env();

            repository
                .init(&name, owner.as_deref(), registry.as_ref())
                .await?
        }
        Commands::Add { paths } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.add(&paths)?
        }
        Commands::Commit {
            message,
            message_flag,
            keep_staged,
        } => {
            let message = message_flag
                .or(message)
                .context("a commit message is required")?;
            let mut repository = open_repository(Box::new(std::io::stdout()))?;

            repository.commit(&message, keep_staged).await?;
        }
        Commands::Push => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;
            let store = connect_remote(&repository).await?;

            repository.push(store.as_ref()).await?;
        }
        Commands::Pull => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;
            let store = connect_remote(&repository).await?;

            repository.pull(store.as_ref()).await?;
        }
        Commands::Revert { commit_id, staged } => {
            let mut repository = open_repository(Box::new(std::io::stdout()))?;
            let target = if staged {
                RevertTarget::Staging
            } else {
                RevertTarget::WorkingTree
            };

            let present_locally = CommitId::try_parse(&commit_id)
                .map(|id| repository.commits().is_complete(&id))
                .unwrap_or(false);
            let store = if present_locally {
                None
            } else {
                match connect_remote(&repository).await {
                    Ok(store) => Some(store),
                    Err(e) => {
                        tracing::debug!("no remote available for revert: {:#}", e);
                        None
                    }
                }
            };

            repository
                .revert(&commit_id, target, store.as_deref())
                .await?;
        }
        Commands::Log {
            oneline,
            abbrev_commit,
        } => {
            let opts = LogOptions {
                oneline,
                abbrev_commit,
            };

            if std::io::stdout().is_terminal() && std::env::var_os("NO_PAGER").is_none() {
                let pager = minus::Pager::new();
                let repository = open_repository(Box::new(PagerWriter::new(pager.clone())))?;
                repository.log(&opts)?;
                drop(repository);

                minus::page_all(pager)?;
            } else {
                let repository = open_repository(Box::new(std::io::stdout()))?;
                repository.log(&opts)?;
            }
        }
    }

    Ok(())
}
