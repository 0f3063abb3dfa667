mod commands;
mod core;
mod github;
mod notes;
mod release;
mod utils;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use core::context::{Overrides, ReleaseContext};
use core::error::{ReleaseError, print_error};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Generate release notes from GitHub history and publish releases
#[derive(Parser)]
#[command(name = "release-notes")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Repository root (defaults to the current directory)
  #[arg(short = 'C', long = "repo-dir", global = true)]
  repo_dir: Option<PathBuf>,

  /// Explicit configuration file (defaults to release.toml lookup)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

/// Options shared by every command
#[derive(clap::Args)]
struct TargetArgs {
  /// Version to release (overrides release.toml)
  #[arg(value_name = "VERSION")]
  release_version: Option<String>,

  /// Tag prefix, e.g. "v" (overrides release.toml)
  #[arg(long)]
  tag_prefix: Option<String>,

  /// GitHub repository as owner/name (overrides release.toml and the remote)
  #[arg(long)]
  repo: Option<String>,

  /// GitHub API base URL (overrides release.toml)
  #[arg(long)]
  api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the release notes for the next version
  Notes {
    #[command(flatten)]
    target: TargetArgs,
    /// Collect from this timestamp instead of the latest release (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = commands::notes::parse_since)]
    since: Option<DateTime<Utc>>,
    /// Write the notes to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Validate the tag, write notes, optionally commit/push and publish
  Release {
    #[command(flatten)]
    target: TargetArgs,
    /// Commit the notes file (and changelog) as "Release <version>"
    #[arg(long)]
    commit: bool,
    /// Commit, push the branch and create the GitHub release
    #[arg(long)]
    push: bool,
  },
}

impl TargetArgs {
  fn into_overrides(self, commit: bool, push: bool) -> Overrides {
    Overrides {
      version: self.release_version,
      tag_prefix: self.tag_prefix,
      repo: self.repo,
      api_url: self.api_url,
      commit,
      push,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: u8) {
  let base_filter = match std::env::var("RUST_LOG") {
    Ok(filter) => filter,
    Err(_) => match verbose {
      0 => "warn".to_string(),
      1 => "warn,release_notes=info".to_string(),
      2 => "info,release_notes=debug".to_string(),
      _ => "debug,release_notes=trace".to_string(),
    },
  };

  let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::registry()
    .with(filter)
    .with(
      fmt::layer()
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .compact(),
    )
    .init();
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let repo_root = match cli.repo_dir {
    Some(dir) => dir,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => handle_error(ReleaseError::with_help(
        format!("Failed to get current directory: {}", e),
        "Pass the repository root explicitly with -C <dir>",
      )),
    },
  };

  let (overrides, command) = match cli.command {
    Commands::Notes { target, since, output } => (target.into_overrides(false, false), Command::Notes { since, output }),
    Commands::Release { target, commit, push } => (target.into_overrides(commit, push), Command::Release),
  };

  // Version resolution happens here, before any git or network access
  let ctx = match ReleaseContext::build(&repo_root, cli.config.as_deref(), overrides) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match command {
    Command::Notes { since, output } => commands::run_notes(&ctx, since, output).await,
    Command::Release => commands::run_release(&ctx).await,
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Command arguments left after the context is built
enum Command {
  Notes {
    since: Option<DateTime<Utc>>,
    output: Option<PathBuf>,
  },
  Release,
}

fn handle_error(err: ReleaseError) -> ! {
  tracing::debug!(error = ?err, "Command failed");
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
