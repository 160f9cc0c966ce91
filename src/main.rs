use anyhow::Result;
use clap::{Parser, Subcommand};

use git_versioning::config::{self, Config};
use git_versioning::domain::RevisionVersionInfo;
use git_versioning::git::{
    Git2Repository, NoOpRepository, PushOutcome, Repository, ScopedRepository,
};
use git_versioning::naming::{self, VersionNaming};
use git_versioning::release::{self, ReleaseSettings};
use git_versioning::{logging, ui};

#[derive(Parser)]
#[command(
    name = "git-versioning",
    version,
    about = "Derive release versions from git tags and create new release tags"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        help = "Override whether versioning is enabled (only \"true\" enables it)"
    )]
    versioned: Option<String>,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Path inside the git repository"
    )]
    repo: String,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe the current revision relative to the closest release tag
    Describe,
    /// Show the last version, commits since it and the current revision
    Info,
    /// Print the build code and build name
    Name,
    /// Increase the version in the given scope and tag the current revision
    IncreaseVersion {
        #[arg(short, long, help = "Version scope to increase: major, minor or patch")]
        scope: Option<String>,

        #[arg(long, help = "Preview the new tag without creating it")]
        dry_run: bool,
    },
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(flag) = args.versioned.as_deref() {
        config.versioned = config::parse_versioned_flag(flag);
    }

    if config.versioned {
        execute(args.command, open_repository(&args.repo, &config)?, &config)
    } else {
        execute(args.command, NoOpRepository, &config)
    }
}

fn execute<R: Repository>(command: Command, repository: R, config: &Config) -> Result<()> {
    match command {
        Command::Describe => {
            let repository = ScopedRepository::new(repository);
            if let Some(description) = repository.describe()? {
                println!("{}", description);
            }
        }
        Command::Info => {
            let repository = ScopedRepository::new(repository);
            let info = RevisionVersionInfo::from_describe(
                repository.describe()?.as_deref(),
                &config.prefix(),
            )?;
            println!("Last version: {}", info.last_version);
            println!("Commits since last release: {}", info.commits_since_last_tag);
            println!(
                "Current revision: {}",
                info.current_revision_sha.as_deref().unwrap_or("(on tag)")
            );
        }
        Command::IncreaseVersion { scope, dry_run } => {
            let settings = ReleaseSettings {
                dry_run,
                ..ReleaseSettings::from_config(config)
            };
            let outcome = release::increase_version(repository, scope.as_deref(), &settings)?;

            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_proposed_tag(outcome.previous_tag.as_deref(), &outcome.tag);

            match &outcome.push {
                None => ui::display_status(&format!("Dry run: would create tag {}", outcome.tag)),
                Some(PushOutcome::Pushed { remote }) => ui::display_success(&format!(
                    "Created and pushed tag {} to {}",
                    outcome.tag, remote
                )),
                Some(PushOutcome::PushFailed { remote, .. }) => {
                    ui::display_success(&format!("Created tag {} locally", outcome.tag));
                    ui::display_manual_push_instruction(&outcome.tag, remote);
                }
            }
        }
        Command::Name => {
            let strategy =
                naming::naming_strategy(config.versioned, || Ok(repository), &config.prefix())?;
            println!("versionCode: {}", strategy.version_code());
            println!("versionName: {}", strategy.version_name());
        }
    }

    Ok(())
}

fn open_repository(path: &str, config: &Config) -> git_versioning::Result<Git2Repository> {
    Ok(Git2Repository::open(path)?
        .with_prefix(config.prefix())
        .with_remote(config.remote.clone()))
}
