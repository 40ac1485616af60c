//! File organization.
//!
//! Moves media files from their current location to the one determined by
//! the rename templates and placement rules of a [`Planner`]. Each move is
//! confirmed by the operator; files that fail are recorded and the batch
//! carries on.
//!
//! The primary entry point is [`reorganize`], which runs one batch over a list
//! of entities below a [`WorkingRoot`].

mod plan;

pub use self::plan::{ArtistCounts, Placement, Plan, Planner, UNSPECIFIED_DIRECTORY};

use crate::confirm::{Confirmation, Decision, Prompt};
use crate::error::{ErrorKind, Result};
use crate::report::Report;
use retag_extract::models::{FieldSet, MediaEntity};
use retag_storage::{PathComponents, WorkingRoot};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use tracing::instrument;

/// Why a file was left alone without asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// Files without a title are never renamed.
    BlankTitle,
    /// No rename template matches the populated fields.
    NoApplicableTemplate(FieldSet),
}
impl Display for Skip {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Skip::BlankTitle => write!(f, "title is blank"),
            Skip::NoApplicableTemplate(fields) => write!(f, "no rename template for fields {fields}"),
        }
    }
}

/// The outcome of (successfully) handling a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// File was moved to its planned location.
    Renamed { from: PathBuf, to: PathBuf },
    /// File was already at its planned location; no work performed.
    AlreadyCorrect(PathBuf),
    /// The operator answered "No".
    Declined(PathBuf),
    /// File was not considered for renaming.
    Skipped { path: PathBuf, reason: Skip },
}

/// Runs one reorganization batch.
///
/// The operator first confirms the working directory; declining leaves the
/// report empty and marked as cancelled. Each entity's `path` is updated in
/// place after a successful move.
///
/// # Errors
/// [`ErrorKind::OutsideRoot`] if any entity doesn't live below `root`. Moves
/// completed before that point are kept.
#[instrument(skip_all, fields(root = %root.path().display(), files = entities.len()))]
pub fn reorganize(
    root: &WorkingRoot,
    planner: &Planner,
    entities: &mut [MediaEntity],
    prompt: &mut dyn Prompt,
) -> Result<Report<Action>> {
    let mut report = Report::default();
    if !prompt.confirm(&format!("Reorganize {} files in {}?", entities.len(), root.path().display())) {
        report.cancelled = true;
        return Ok(report);
    }
    let counts: ArtistCounts = entities.iter().collect();
    let mut confirmation = Confirmation::new(prompt);
    for entity in entities.iter_mut() {
        let path = entity.path.clone();
        if entity.title.trim().is_empty() {
            tracing::warn!(path = %path.display(), "Skipping file with blank title");
            report.record(Action::Skipped { path, reason: Skip::BlankTitle });
            continue;
        }
        let (from, to) = match planner.plan(root, entity, &counts) {
            Ok(Plan::Move { from, to }) => (from, to),
            Ok(Plan::AlreadyCorrect(_)) => {
                tracing::info!(path = %path.display(), "File already in the correct location");
                report.record(Action::AlreadyCorrect(path));
                continue;
            },
            Ok(Plan::NoTemplate(fields)) => {
                tracing::warn!(path = %path.display(), %fields, "No rename template matches");
                report.record(Action::Skipped { path, reason: Skip::NoApplicableTemplate(fields) });
                continue;
            },
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                report.fail(&path, error);
                continue;
            },
        };
        match confirmation.ask(&describe(&from, &to)) {
            Decision::Cancel => {
                tracing::info!("Cancelled by operator");
                report.cancelled = true;
                break;
            },
            Decision::Skip => report.record(Action::Declined(path)),
            Decision::Proceed => match root.move_file(&from, &to).map_err(ErrorKind::storage) {
                Ok(()) => {
                    entity.path = to.full_path();
                    tracing::info!(from = %path.display(), to = %entity.path.display(), "Renamed file");
                    report.record(Action::Renamed { from: path, to: entity.path.clone() });
                },
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => report.fail(&path, error),
            },
        }
    }
    Ok(report)
}

fn describe(from: &PathComponents, to: &PathComponents) -> String {
    format!("Move {}\n  to {}?", from.relative_path().display(), to.relative_path().display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Choice;
    use crate::confirm::tests::ScriptedPrompt;
    use crate::template::RenamePatterns;
    use retag_extract::{FieldExtractor, PatternMatcher, plan_updates};
    use std::fs;

    struct Library {
        temp_dir: tempfile::TempDir,
        root: WorkingRoot,
    }
    impl Library {
        fn new() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let root = WorkingRoot::new(temp_dir.path()).unwrap();
            Self { temp_dir, root }
        }

        fn path(&self, relative: &str) -> PathBuf {
            self.temp_dir.path().join(relative)
        }

        /// Creates the file on disk and returns an entity for it.
        fn add(&self, relative: &str, title: &str, artists: &[&str]) -> MediaEntity {
            let path = self.path(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, relative.as_bytes()).unwrap();
            MediaEntity {
                title: title.to_string(),
                artists: artists.iter().map(|a| a.to_string()).collect(),
                ..MediaEntity::new(path, 0)
            }
        }
    }

    fn planner() -> Planner {
        Planner::new(RenamePatterns::new(["%ARTISTS% - %TITLE%", "%ARTISTS% - %TITLE% [%YEAR%]"]).unwrap())
    }

    fn confirmed(choices: impl IntoIterator<Item = Choice>) -> ScriptedPrompt {
        ScriptedPrompt::new(choices).with_confirms([true])
    }

    #[test]
    fn test_declining_the_directory_does_nothing() {
        let library = Library::new();
        let mut entities = vec![library.add("a.mp3", "A", &["X"])];
        let mut prompt = ScriptedPrompt::default().with_confirms([false]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert!(report.cancelled);
        assert!(report.actions.is_empty());
        assert!(library.path("a.mp3").exists());
    }

    #[test]
    fn test_already_correct_is_not_prompted() {
        let library = Library::new();
        let mut entities = vec![library.add("X - A.mp3", "A", &["X"])];
        let mut prompt = ScriptedPrompt::default().with_confirms([true]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert_eq!(report.actions, vec![Action::AlreadyCorrect(library.path("X - A.mp3"))]);
        assert_eq!(prompt.asked.len(), 1);
        assert_eq!(fs::read_dir(library.temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_cancel_in_three_file_batch() {
        let library = Library::new();
        let mut entities = vec![
            library.add("1.mp3", "One", &["X"]),
            library.add("2.mp3", "Two", &["Y"]),
            library.add("3.mp3", "Three", &["Z"]),
        ];
        let mut prompt = confirmed([Choice::Yes, Choice::Cancel]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert!(report.cancelled);
        assert_eq!(
            report.actions,
            vec![Action::Renamed {
                from: library.path("1.mp3"),
                to: library.path("X - One.mp3"),
            }]
        );
        assert!(library.path("X - One.mp3").exists());
        assert!(library.path("2.mp3").exists());
        assert!(library.path("3.mp3").exists());
        assert_eq!(entities[0].path, library.path("X - One.mp3"));
        assert_eq!(entities[1].path, library.path("2.mp3"));
        // Directory confirmation plus two files; the third is never asked about.
        assert_eq!(prompt.asked.len(), 3);
    }

    #[test]
    fn test_no_and_yes_to_all() {
        let library = Library::new();
        let mut entities = vec![
            library.add("1.mp3", "One", &["X"]),
            library.add("2.mp3", "Two", &["Y"]),
            library.add("3.mp3", "Three", &["Z"]),
        ];
        let mut prompt = confirmed([Choice::No, Choice::YesToAll]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.actions[0], Action::Declined(library.path("1.mp3")));
        assert!(library.path("1.mp3").exists());
        assert!(library.path("Y - Two.mp3").exists());
        assert!(library.path("Z - Three.mp3").exists());
    }

    #[test]
    fn test_skips_are_not_prompted() {
        let library = Library::new();
        let mut entities = vec![
            library.add("untitled.mp3", "  ", &["X"]),
            library.add("no-artist.mp3", "Title", &[]),
        ];
        let mut prompt = ScriptedPrompt::default().with_confirms([true]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert_eq!(
            report.actions,
            vec![
                Action::Skipped {
                    path: library.path("untitled.mp3"),
                    reason: Skip::BlankTitle,
                },
                Action::Skipped {
                    path: library.path("no-artist.mp3"),
                    reason: Skip::NoApplicableTemplate([retag_extract::models::Field::Title].into_iter().collect()),
                },
            ]
        );
        assert_eq!(prompt.asked.len(), 1);
    }

    #[test]
    fn test_collision_is_recorded_and_batch_continues() {
        let library = Library::new();
        fs::write(library.path("X - One.mp3"), b"occupied").unwrap();
        let mut entities = vec![library.add("1.mp3", "One", &["X"]), library.add("2.mp3", "Two", &["Y"])];
        let mut prompt = confirmed([Choice::YesToAll]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, library.path("1.mp3"));
        assert!(matches!(&*report.failures[0].error, ErrorKind::Collision(_)));
        assert_eq!(fs::read(library.path("X - One.mp3")).unwrap(), b"occupied");
        assert!(library.path("Y - Two.mp3").exists());
    }

    #[test]
    fn test_entity_outside_root_aborts() {
        let library = Library::new();
        let elsewhere = tempfile::tempdir().unwrap();
        let mut entities = vec![MediaEntity {
            title: "One".to_string(),
            artists: vec!["X".to_string()],
            ..MediaEntity::new(elsewhere.path().join("1.mp3"), 0)
        }];
        let mut prompt = ScriptedPrompt::default().with_confirms([true]);
        let err = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap_err();
        assert!(matches!(&*err, ErrorKind::OutsideRoot));
    }

    #[test]
    fn test_end_to_end_artist_directory() {
        let library = Library::new();
        let extractor = FieldExtractor::new(
            PatternMatcher::new([r"^(?<artists>.+?) - (?<title>.+?)(?: \[(?<year>\d{4})\])?$"]).unwrap(),
        );
        let mut entities = vec![
            library.add("Artist X - Song Y [1999].mp3", "", &[]),
            library.add("Artist X - Song Z [2001].mp3", "", &[]),
        ];
        for entity in entities.iter_mut() {
            let fields = extractor.extract(entity.file_stem().unwrap()).unwrap();
            plan_updates(&fields, entity).apply(entity);
        }
        let mut prompt = confirmed([Choice::YesToAll]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert!(report.is_clean());
        let expected = library.path("Artist X/Artist X - Song Y [1999].mp3");
        assert_eq!(entities[0].path, expected);
        assert_eq!(fs::read(&expected).unwrap(), b"Artist X - Song Y [1999].mp3");
        assert!(library.path("Artist X/Artist X - Song Z [2001].mp3").exists());
        assert!(!library.path("Artist X - Song Y [1999].mp3").exists());

        // Running again finds everything in place.
        let mut prompt = ScriptedPrompt::default().with_confirms([true]);
        let report = reorganize(&library.root, &planner(), &mut entities, &mut prompt).unwrap();
        assert!(report.actions.iter().all(|a| matches!(a, Action::AlreadyCorrect(_))));
    }
}
