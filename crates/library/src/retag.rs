//! Tag recovery for a batch of files.
//!
//! For every entity: match its file stem, extract field values, diff them
//! against the current tags, ask the operator, then persist through the
//! [`TagStore`]. Parse failures and write errors are recorded per file.

use crate::confirm::{Confirmation, Decision, Prompt};
use crate::error::{ErrorKind, Result};
use crate::report::Report;
use crate::store::TagStore;
use retag_extract::error::{Error as ExtractError, ErrorKind as ExtractErrorKind};
use retag_extract::models::MediaEntity;
use retag_extract::{FieldExtractor, UpdateMap, plan_updates};
use std::path::PathBuf;
use tracing::instrument;

/// The outcome of (successfully) handling a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Tags were changed and written back.
    Updated { path: PathBuf, updates: UpdateMap },
    /// The filename agrees with the current tags; nothing to do.
    UpToDate(PathBuf),
    /// The operator answered "No".
    Declined(PathBuf),
}

/// Computes the tag changes a file's name implies.
///
/// # Errors
/// [`ErrorKind::Extract`] if no rule matches the file stem, or the matching
/// rule captured nothing.
pub fn plan(extractor: &FieldExtractor, entity: &MediaEntity) -> Result<UpdateMap> {
    let Some(stem) = entity.file_stem() else {
        let err = ExtractError::from(ExtractErrorKind::NoMatch(entity.path.display().to_string()));
        return Err(ErrorKind::extract(err));
    };
    let fields = extractor.extract(stem).map_err(ErrorKind::extract)?;
    Ok(plan_updates(&fields, entity))
}

/// Runs the tag pipeline over `entities` in order.
///
/// Entities are updated in place once their tags were written successfully.
#[instrument(skip_all, fields(files = entities.len()))]
pub fn retag(
    extractor: &FieldExtractor,
    store: &dyn TagStore,
    entities: &mut [MediaEntity],
    prompt: &mut dyn Prompt,
) -> Report<Action> {
    let mut report = Report::default();
    let mut confirmation = Confirmation::new(prompt);
    for entity in entities.iter_mut() {
        let path = entity.path.clone();
        let updates = match plan(extractor, entity) {
            Ok(updates) => updates,
            Err(error) => {
                report.fail(&path, error);
                continue;
            },
        };
        if updates.is_empty() {
            tracing::info!(path = %path.display(), "Tags already up to date");
            report.record(Action::UpToDate(path));
            continue;
        }
        match confirmation.ask(&describe(entity, &updates)) {
            Decision::Cancel => {
                tracing::info!("Cancelled by operator");
                report.cancelled = true;
                break;
            },
            Decision::Skip => report.record(Action::Declined(path)),
            Decision::Proceed => {
                let mut updated = entity.clone();
                updates.clone().apply(&mut updated);
                match store.write(&updated) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), changes = updates.len(), "Updated tags");
                        *entity = updated;
                        report.record(Action::Updated { path, updates });
                    },
                    Err(error) => report.fail(&path, error),
                }
            },
        }
    }
    report
}

fn describe(entity: &MediaEntity, updates: &UpdateMap) -> String {
    let name = entity.path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    let mut message = format!("Update tags of {name}?");
    for (label, value) in updates.entries() {
        message.push_str(&format!("\n  {label}: {value}"));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::Choice;
    use crate::confirm::tests::ScriptedPrompt;
    use crate::store::tests::MemoryStore;
    use retag_extract::PatternMatcher;

    fn extractor() -> FieldExtractor {
        let rules = [
            r"^(?<artists>.+?) - (?<title>.+?) \[(?<year>\d{4})\]$",
            r"^(?<trackNo>\d+)\. (?<title>.+)$",
        ];
        FieldExtractor::new(PatternMatcher::new(rules).unwrap())
    }

    fn entity(name: &str) -> MediaEntity {
        MediaEntity::new(format!("/music/{name}"), 0)
    }

    #[test]
    fn test_updates_are_written_and_applied() {
        let store = MemoryStore::default();
        let mut entities = vec![entity("Artist X - Song Y [1999].mp3")];
        let mut prompt = ScriptedPrompt::new([Choice::Yes]);
        let report = retag(&extractor(), &store, &mut entities, &mut prompt);
        assert!(report.is_clean());
        assert_eq!(entities[0].title, "Song Y");
        assert_eq!(entities[0].artists, vec!["Artist X".to_string()]);
        assert_eq!(entities[0].year, 1999);
        assert_eq!(store.written(), vec![entities[0].clone()]);
        assert_eq!(prompt.asked.len(), 1);
        assert!(prompt.asked[0].starts_with("Update tags of Artist X - Song Y [1999].mp3?"));
        assert!(prompt.asked[0].contains("\n  Year: 1999"));
    }

    #[test]
    fn test_up_to_date_files_are_not_prompted() {
        let store = MemoryStore::default();
        let mut entities = vec![MediaEntity {
            title: "Intro".to_string(),
            track: 1,
            ..entity("01. Intro.flac")
        }];
        let mut prompt = ScriptedPrompt::default();
        let report = retag(&extractor(), &store, &mut entities, &mut prompt);
        assert_eq!(report.actions, vec![Action::UpToDate(PathBuf::from("/music/01. Intro.flac"))]);
        assert!(prompt.asked.is_empty());
        assert!(store.written().is_empty());
    }

    #[test]
    fn test_parse_failures_are_recorded_and_skipped() {
        let store = MemoryStore::default();
        let mut entities = vec![entity("random noise.mp3"), entity("02. Outro.mp3")];
        let mut prompt = ScriptedPrompt::new([Choice::Yes]);
        let report = retag(&extractor(), &store, &mut entities, &mut prompt);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, PathBuf::from("/music/random noise.mp3"));
        assert!(matches!(&*report.failures[0].error, ErrorKind::Extract(kind) if kind.is_parse_failure()));
        assert_eq!(entities[1].track, 2);
    }

    #[test]
    fn test_declined_and_cancelled() {
        let store = MemoryStore::default();
        let mut entities = vec![entity("01. One.mp3"), entity("02. Two.mp3"), entity("03. Three.mp3")];
        let mut prompt = ScriptedPrompt::new([Choice::No, Choice::Cancel]);
        let report = retag(&extractor(), &store, &mut entities, &mut prompt);
        assert!(report.cancelled);
        assert_eq!(report.actions, vec![Action::Declined(PathBuf::from("/music/01. One.mp3"))]);
        assert!(store.written().is_empty());
        assert!(entities.iter().all(|e| e.title.is_empty()));
    }

    #[test]
    fn test_write_failure_leaves_entity_untouched() {
        let store = MemoryStore::failing();
        let mut entities = vec![entity("01. One.mp3")];
        let mut prompt = ScriptedPrompt::new([Choice::YesToAll]);
        let report = retag(&extractor(), &store, &mut entities, &mut prompt);
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(&*report.failures[0].error, ErrorKind::WriteTags(_)));
        assert_eq!(entities[0].title, "");
    }
}
