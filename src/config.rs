//! Rule configuration loading.
//!
//! Rules live in a TOML document:
//!
//! ```toml
//! live = false
//!
//! [[rules]]
//! keep = "/srv/photos/library"
//! remove = "/srv/photos/inbox"
//! ```
//!
//! Loading is layered with figment: built-in defaults, then the rules file,
//! then `DUPESWEEP_LIVE` from the environment. Rule order is significant;
//! the first matching rule wins.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::{Rule, RuleError, RuleSet};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DUPESWEEP_";

const TOP_LEVEL_KEYS: &[&str] = &["live", "rules"];
const RULE_KEYS: &[&str] = &["keep", "remove"];

/// Errors raised while loading or validating the rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rules file does not exist.
    #[error("rules file not found: {0}")]
    NotFound(PathBuf),

    /// The rules file could not be read.
    #[error("failed to read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid TOML.
    #[error("malformed rules file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The document is valid TOML but has the wrong shape.
    #[error("invalid configuration: {0}")]
    Extract(Box<figment::Error>),

    /// A key that neither the document root nor a rule understands.
    #[error("unknown key `{key}` in {location}{}", did_you_mean(.suggestion))]
    UnknownKey {
        location: String,
        key: String,
        suggestion: Option<String>,
    },

    /// The document declares no rules.
    #[error("no rules defined; add at least one [[rules]] table with `keep` and `remove`")]
    NoRules,

    /// A rule failed validation.
    #[error("rule {}: {source}", .index + 1)]
    InvalidRule {
        index: usize,
        #[source]
        source: RuleError,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean `{s}`?)"))
        .unwrap_or_default()
}

/// One `[[rules]]` table as written in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Directory whose files survive
    pub keep: PathBuf,
    /// Directory whose duplicates are deleted
    pub remove: PathBuf,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Perform deletions. Equivalent to `--live`.
    #[serde(default)]
    pub live: bool,

    /// Ordered keep/remove rules.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl Config {
    /// Load the configuration from a rules file, applying environment
    /// overrides on top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, not TOML,
    /// carries unknown keys or has the wrong shape. Rules themselves are
    /// validated by [`Config::rule_set`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_rules_file(path)?;
        check_keys(&content)?;

        let figment = Self::figment(&content).merge(Env::prefixed(ENV_PREFIX).only(&["live"]));
        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Extract(Box::new(e)))?;

        log::debug!(
            "Loaded {} rule(s) from {} (live = {})",
            config.rules.len(),
            path.display(),
            config.live
        );
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus the file errors.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        check_keys(content)?;
        Self::figment(content)
            .extract()
            .map_err(|e| ConfigError::Extract(Box::new(e)))
    }

    fn figment(content: &str) -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(content))
    }

    /// Validate the rules and build the ordered [`RuleSet`].
    ///
    /// # Errors
    ///
    /// - `NoRules` if the list is empty
    /// - `InvalidRule` for the first rule that is empty, relative, or keeps
    ///   and removes the same directory
    pub fn rule_set(&self) -> Result<RuleSet, ConfigError> {
        let rules = self
            .rules
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                Rule::new(&spec.keep, &spec.remove)
                    .map_err(|source| ConfigError::InvalidRule { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        RuleSet::new(rules).map_err(|_| ConfigError::NoRules)
    }
}

fn read_rules_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Reject keys serde would otherwise ignore, suggesting the closest known
/// key.
fn check_keys(content: &str) -> Result<(), ConfigError> {
    let table: toml::Table = content.parse()?;

    for key in table.keys() {
        if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
            return Err(unknown_key("the document root", key, TOP_LEVEL_KEYS));
        }
    }

    if let Some(toml::Value::Array(rules)) = table.get("rules") {
        for (i, rule) in rules.iter().enumerate() {
            let Some(rule) = rule.as_table() else {
                continue;
            };
            for key in rule.keys() {
                if !RULE_KEYS.contains(&key.as_str()) {
                    return Err(unknown_key(&format!("rule {}", i + 1), key, RULE_KEYS));
                }
            }
        }
    }
    Ok(())
}

fn unknown_key(location: &str, key: &str, known: &[&str]) -> ConfigError {
    ConfigError::UnknownKey {
        location: location.to_string(),
        key: key.to_string(),
        suggestion: suggest(key, known),
    }
}

/// Closest known key by Jaro-Winkler similarity, if any is close enough.
fn suggest(key: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|k| (strsim::jaro_winkler(key, k), *k))
        .filter(|(score, _)| *score > 0.8)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, k)| k.to_string())
}

/// Default rules file location: `<config_dir>/dupesweep/rules.toml`.
#[must_use]
pub fn default_rules_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dupesweep").map(|dirs| dirs.config_dir().join("rules.toml"))
}
