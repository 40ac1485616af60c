use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use retag_storage::{DEFAULT_EXTENSIONS, DEFAULT_REPLACEMENT, is_invalid};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Prefix of environment variables that override settings, e.g.
/// `RETAG_ALBUM_DIRECTORIES=true`.
pub const ENV_PREFIX: &str = "RETAG_";

/// All user-configurable settings.
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RETAG_`, `__` as nested separator)
/// 2) Config file (TOML, YAML or JSON, chosen by extension)
/// 3) Struct defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rename templates with `%FIELD%` placeholders. The last template whose
    /// placeholders equal a file's populated fields is used.
    pub rename_patterns: Vec<String>,
    /// Group artists with more than one track into their own directory.
    pub artist_directories: bool,
    /// Nest album directories inside artist directories.
    pub album_directories: bool,
    /// Directory names whose contents are never touched.
    pub exclude_directories: Vec<String>,
    /// Replaces characters that can't appear in filenames.
    pub replacement: char,
    /// Media file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// File with one filename rule per line, read before `rules`.
    pub rules_file: Option<PathBuf>,
    /// Filename rules (regular expressions with named groups), in order.
    pub rules: Vec<String>,
    /// Artist to genre, used when a filename carries no genre.
    pub genres: HashMap<String, String>,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            rename_patterns: vec![
                "%TITLE%".to_string(),
                "%ARTISTS% - %TITLE%".to_string(),
                "%ARTISTS% - %TITLE% [%YEAR%]".to_string(),
                "%TRACK%. %ARTISTS% - %TITLE%".to_string(),
                "%ALBUMARTISTS% - %ALBUM% - %TRACK%. %ARTISTS% - %TITLE%".to_string(),
            ],
            artist_directories: true,
            album_directories: false,
            exclude_directories: Vec::new(),
            replacement: DEFAULT_REPLACEMENT,
            extensions: DEFAULT_EXTENSIONS.map(String::from).to_vec(),
            rules_file: None,
            rules: vec![
                r"^(?<trackNo>\d+)\.? (?<artists>.+?) - (?<title>.+)$".to_string(),
                r"^(?<artists>.+?) - (?<title>.+?)(?: \[(?<year>\d{4})\])?$".to_string(),
            ],
            genres: HashMap::new(),
        }
    }
}
impl Settings {
    /// `config.toml` in the platform's config directory, e.g.
    /// `~/.config/retag/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "retag").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Layers defaults, the config file and the environment.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        let file = match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };
        if let Some(file) = file {
            tracing::debug!(path = %file.display(), "Loading config file");
            figment = match file.extension().and_then(|e| e.to_str()) {
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => figment.merge(Toml::file(file)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extracts and validates settings from a prepared [`Figment`].
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let settings: Settings = figment.extract().or_raise(|| ErrorKind::Load)?;
        settings.validate()?;
        Ok(settings)
    }

    #[instrument(skip_all)]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::from_figment(&Self::figment(path)?)
    }

    /// Rejects settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.rename_patterns.iter().all(|p| p.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("at least one rename pattern is required".to_string()));
        }
        if self.rename_patterns.iter().any(|p| p.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("rename patterns must not be blank".to_string()));
        }
        if is_invalid(self.replacement) {
            exn::bail!(ErrorKind::Invalid(format!("{:?} is not a valid replacement character", self.replacement)));
        }
        if self.extensions.iter().all(|e| e.trim().trim_start_matches('.').is_empty()) {
            exn::bail!(ErrorKind::Invalid("at least one media extension is required".to_string()));
        }
        Ok(())
    }

    /// Filename rules: lines of `rules_file` first, then the inline `rules`.
    /// Comments and blank lines are kept; the matcher skips them.
    pub fn rules(&self) -> Result<Vec<String>> {
        let mut rules = Vec::new();
        if let Some(path) = &self.rules_file {
            let content = fs::read_to_string(path).or_raise(|| ErrorKind::RulesFile(path.clone()))?;
            rules.extend(content.lines().map(|line| line.trim_end_matches('\r').to_string()));
        }
        rules.extend(self.rules.iter().cloned());
        Ok(rules)
    }
}
