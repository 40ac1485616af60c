//! `retag`: recover media tags from filenames and reorganize a music
//! collection.

mod error;
mod prompt;

use crate::error::{ErrorKind, Result};
use crate::prompt::TerminalPrompt;
use clap::{Parser, Subcommand};
use exn::ResultExt;
use retag_config::Settings;
use retag_extract::models::MediaEntity;
use retag_extract::{FieldExtractor, PatternMatcher};
use retag_library::organize::{self, Placement, Planner};
use retag_library::retag::{self, Action as TagAction};
use retag_library::scan::{Scanner, read_entities};
use retag_library::{AutoConfirm, Failure, Prompt, RenamePatterns, Report};
use retag_storage::{Cleanup, Sanitizer, WorkingRoot, remove_empty_directories};
use retag_tags::LoftyStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "retag", version, about = "Recover media tags from filenames and reorganize a music collection")]
struct Args {
    /// Config file (TOML, YAML or JSON). Defaults to `config.toml` in the
    /// platform config directory, if present.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v, -vv, -vvv). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Answer "Yes To All" to every question
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Update embedded tags from filenames
    Tag {
        #[arg(value_hint = clap::ValueHint::DirPath)]
        directory: PathBuf,
    },
    /// Rename and move files by template, then remove emptied directories
    Rename {
        #[arg(value_hint = clap::ValueHint::DirPath)]
        directory: PathBuf,
    },
    /// Remove directories that hold nothing but operating-system clutter
    Clean {
        #[arg(value_hint = clap::ValueHint::DirPath)]
        directory: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string())))
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let mut prompt: Box<dyn Prompt> = if args.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalPrompt::stdio())
    };
    match args.command {
        Command::Tag { directory } => tag(&settings, &open(&directory)?, prompt.as_mut()),
        Command::Rename { directory } => rename(&settings, &open(&directory)?, prompt.as_mut()),
        Command::Clean { directory } => {
            clean(&open(&directory)?);
            Ok(())
        },
    }
}

fn open(directory: &Path) -> Result<WorkingRoot> {
    let path = directory.canonicalize().or_raise(|| ErrorKind::Directory(directory.to_path_buf()))?;
    WorkingRoot::new(path).or_raise(|| ErrorKind::Directory(directory.to_path_buf()))
}

/// Scans the working root and reads the tags of every media file found.
fn load(settings: &Settings, root: &WorkingRoot) -> (Vec<MediaEntity>, Vec<Failure>) {
    let scan = Scanner::new(&settings.extensions)
        .with_excluded(settings.exclude_directories.clone())
        .scan(root);
    if scan.excluded > 0 {
        println!("Skipped {} files in excluded directories.", scan.excluded);
    }
    let (entities, read_failures) = read_entities(&LoftyStore, &scan.files);
    let mut failures = scan.failures;
    failures.extend(read_failures);
    (entities, failures)
}

fn tag(settings: &Settings, root: &WorkingRoot, prompt: &mut dyn Prompt) -> Result<()> {
    let rules = settings.rules().or_raise(|| ErrorKind::Config)?;
    let matcher = PatternMatcher::new(rules).or_raise(|| ErrorKind::Rules)?;
    let extractor = FieldExtractor::new(matcher).with_genres(settings.genres.clone());
    let (mut entities, failures) = load(settings, root);
    let report = retag::retag(&extractor, &LoftyStore, &mut entities, prompt);
    let updated = report.actions.iter().filter(|a| matches!(a, TagAction::Updated { .. })).count();
    println!("Updated tags of {updated} of {} files.", entities.len());
    summarize(&report, failures);
    Ok(())
}

fn rename(settings: &Settings, root: &WorkingRoot, prompt: &mut dyn Prompt) -> Result<()> {
    let templates = RenamePatterns::new(&settings.rename_patterns).or_raise(|| ErrorKind::Templates)?;
    let planner = Planner::new(templates)
        .with_placement(Placement {
            artist_directories: settings.artist_directories,
            album_directories: settings.album_directories,
        })
        .with_sanitizer(Sanitizer::new(settings.replacement));
    let (mut entities, failures) = load(settings, root);
    let report = organize::reorganize(root, &planner, &mut entities, prompt).or_raise(|| ErrorKind::Organize)?;
    let renamed = report.actions.iter().filter(|a| matches!(a, organize::Action::Renamed { .. })).count();
    println!("Moved {renamed} of {} files.", entities.len());
    for action in &report.actions {
        if let organize::Action::Skipped { path, reason } = action {
            println!("  skipped {}: {reason}", path.display());
        }
    }
    let declined = report.cancelled && report.actions.is_empty() && report.failures.is_empty();
    summarize(&report, failures);
    if !declined {
        clean(root);
    }
    Ok(())
}

fn clean(root: &WorkingRoot) {
    let cleanups = remove_empty_directories(root.path());
    let removed = cleanups.iter().filter(|c| c.is_removed()).count();
    println!("Removed {removed} empty directories.");
    for cleanup in &cleanups {
        if let Cleanup::Failed { path, error } = cleanup {
            eprintln!("  could not remove {}: {}", path.display(), **error);
        }
    }
}

fn summarize<A>(report: &Report<A>, earlier: Vec<Failure>) {
    let failures: Vec<&Failure> = earlier.iter().chain(&report.failures).collect();
    if !failures.is_empty() {
        eprintln!("{} files failed:", failures.len());
        for failure in failures {
            eprintln!("  {failure}");
        }
    }
    if report.cancelled {
        println!("Cancelled; remaining files were left untouched.");
    }
}
