use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use git_assistant::config::SessionPaths;
use git_assistant::error::SessionError;
use git_assistant::logger;
use git_assistant::session::{RemoteOpKind, RepositorySession};
use git_assistant::settings::Theme;
use git_assistant::snapshot::StatusSnapshot;

#[derive(Parser)]
#[command(name = "git-assistant")]
#[command(about = "Drive a local git repository: commit, sync, stash, history", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an existing repository and remember it for later commands
    Open {
        /// Path to the repository working tree
        path: PathBuf,
    },

    /// Initialize a repository (no-op if one already exists) and open it
    Init {
        /// Path for the new repository
        path: PathBuf,
    },

    /// Stage all changes and commit them
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Push the current branch to the default remote
    Push,

    /// Pull the current branch from the default remote (fast-forward only)
    Pull,

    /// Fetch the current branch from the default remote
    Fetch,

    /// Stash all uncommitted changes
    Stash,

    /// Apply the most recent stash, keeping it on the stash list
    StashApply,

    /// Apply the most recent stash and drop it
    StashPop,

    /// Show the commit history of the current branch
    Log {
        /// Maximum number of commits to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show branch, working-tree state, and recent history
    Status {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        /// Color theme: dark or light
        #[arg(long)]
        theme: Option<String>,

        /// Restore the last repository on launch
        #[arg(long)]
        auto_load: Option<bool>,

        /// Maximum commits in a status snapshot
        #[arg(long)]
        max_log_entries: Option<usize>,

        /// Font size for graphical front-ends
        #[arg(long)]
        font_size: Option<u32>,
    },
}

fn main() -> Result<()> {
    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    logger::init_logger()?;

    let cli = Cli::parse();

    let paths = SessionPaths::default_locations()?;
    let mut session = RepositorySession::new(paths);

    match cli.command {
        Commands::Open { path } => {
            let snapshot = run(session.open(&path))?;
            println!("{}", "Repository opened.".green());
            print_snapshot(&snapshot, 5);
        }
        Commands::Init { path } => {
            let snapshot = run(session.init(&path))?;
            println!("{}", "Repository initialized.".green());
            print_snapshot(&snapshot, 5);
        }
        Commands::Commit { message } => {
            restore_if_configured(&mut session);
            let snapshot = run(session.commit(&message))?;
            println!("{}", "Committed successfully.".green());
            print_snapshot(&snapshot, 5);
        }
        Commands::Push => remote(&mut session, RemoteOpKind::Push)?,
        Commands::Pull => remote(&mut session, RemoteOpKind::Pull)?,
        Commands::Fetch => remote(&mut session, RemoteOpKind::Fetch)?,
        Commands::Stash => {
            restore_if_configured(&mut session);
            let snapshot = run(session.stash())?;
            println!("{}", "Changes stashed.".green());
            print_snapshot(&snapshot, 5);
        }
        Commands::StashApply => {
            restore_if_configured(&mut session);
            let snapshot = run(session.apply_stash())?;
            println!("{}", "Stash applied.".green());
            print_snapshot(&snapshot, 5);
        }
        Commands::StashPop => {
            restore_if_configured(&mut session);
            let snapshot = run(session.pop_stash())?;
            println!("{}", "Stash popped.".green());
            print_snapshot(&snapshot, 5);
        }
        Commands::Log { limit } => {
            restore_if_configured(&mut session);
            let snapshot = run(session.status())?;
            let limit = limit.unwrap_or(snapshot.head_commits.len());
            print_log(&snapshot, limit);
        }
        Commands::Status { json } => {
            restore_if_configured(&mut session);
            let snapshot = run(session.status())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot, 5);
            }
        }
        Commands::Config {
            theme,
            auto_load,
            max_log_entries,
            font_size,
        } => {
            configure(&mut session, theme, auto_load, max_log_entries, font_size)?;
        }
    }

    Ok(())
}

/// Reopen the last session when auto-load is enabled and nothing is open
/// yet. A failed restore is reported but never fatal: the command that
/// follows will fail with `NoRepositoryOpen` if it needs a repository.
fn restore_if_configured(session: &mut RepositorySession) {
    if !session.settings().auto_load_last_session || session.is_open() {
        return;
    }

    match session.restore_session() {
        Ok(Some(_)) => {}
        Ok(None) => {}
        Err(e) => eprintln!("{} could not restore last session: {e}", "warning:".yellow()),
    }
}

fn remote(session: &mut RepositorySession, kind: RemoteOpKind) -> Result<()> {
    restore_if_configured(session);

    println!("Running {kind}...");
    let job = run(session.remote_op(kind, move |result| match result {
        Ok(_) => log::info!("{kind} completed"),
        Err(e) => log::warn!("{kind} failed: {e}"),
    }))?;

    let snapshot = run(job.wait())?;
    println!("{}", format!("{kind} successful.").green());
    print_snapshot(&snapshot, 5);
    Ok(())
}

fn configure(
    session: &mut RepositorySession,
    theme: Option<String>,
    auto_load: Option<bool>,
    max_log_entries: Option<usize>,
    font_size: Option<u32>,
) -> Result<()> {
    let theme = match theme.as_deref() {
        Some("dark") => Some(Theme::Dark),
        Some("light") => Some(Theme::Light),
        Some(other) => bail!("Unknown theme '{other}' (expected 'dark' or 'light')"),
        None => None,
    };

    let changed =
        theme.is_some() || auto_load.is_some() || max_log_entries.is_some() || font_size.is_some();

    if changed {
        run(session.update_settings(|settings| {
            if let Some(theme) = theme {
                settings.theme = theme;
            }
            if let Some(auto_load) = auto_load {
                settings.auto_load_last_session = auto_load;
            }
            if let Some(max) = max_log_entries {
                settings.max_log_entries = max;
            }
            if let Some(size) = font_size {
                settings.font_size = size;
            }
        }))?;
        println!("{}", "Settings saved.".green());
    }

    let settings = session.settings();
    println!("{}", "Current settings:".bold());
    println!("  {}: {:?}", "theme".cyan(), settings.theme);
    println!(
        "  {}: {}",
        "auto_load_last_session".cyan(),
        settings.auto_load_last_session
    );
    println!(
        "  {}: {}",
        "max_log_entries".cyan(),
        settings.max_log_entries
    );
    println!("  {}: {}", "font_size".cyan(), settings.font_size);

    Ok(())
}

/// Map a session failure to a user-facing message and a nonzero exit
fn run<T>(result: Result<T, SessionError>) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}

fn print_snapshot(snapshot: &StatusSnapshot, log_lines: usize) {
    let branch = snapshot.active_branch.as_deref().unwrap_or("-");
    println!("Branch: {}", branch.bold());

    let status = if snapshot.is_dirty {
        "Dirty".yellow()
    } else {
        "Clean".green()
    };
    println!("Status: {status}");

    if !snapshot.head_commits.is_empty() {
        println!();
        print_log(snapshot, log_lines);
    }
}

fn print_log(snapshot: &StatusSnapshot, limit: usize) {
    for record in snapshot.head_commits.iter().take(limit) {
        println!(
            "{} | {} | {}",
            record.short_id.yellow(),
            record.author,
            record.committed_at.format("%Y-%m-%d %H:%M")
        );
        println!("  {}", record.message);
    }

    let total = snapshot.head_commits.len();
    if total > limit {
        println!("  ... and {} more", total - limit);
    }
}
