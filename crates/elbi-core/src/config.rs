//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `elbi.toml` + `elbi.<env>.toml`
//! + `ELBI_*` env vars (`__` separates nesting, e.g.
//! `ELBI_SEARCH__DEBOUNCE_MS=500`). Provides helpers to expand `~` and
//! `${VAR}` and to resolve relative paths against a known base directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Loads from `dir`, picking the environment from `RUST_ENV`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(dir, &env_name)
    }

    pub fn load_for_env(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("elbi.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("elbi.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("elbi.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("elbi.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("ELBI_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub diagram: DiagramSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.search.index_path.trim().is_empty() && self.search.index_url.is_none() {
            return Err(Error::InvalidConfig(
                "search.index_path or search.index_url must be set".into(),
            ));
        }
        if !self.search.total_label.contains("{count}") {
            return Err(Error::InvalidConfig(
                "search.total_label must contain the {count} placeholder".into(),
            ));
        }
        if self.diagram.marker_classes.iter().all(|c| c.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "diagram.marker_classes must name at least one class".into(),
            ));
        }
        if self.diagram.id_prefix.trim().is_empty() {
            return Err(Error::InvalidConfig("diagram.id_prefix must not be empty".into()));
        }
        if self.diagram.command.trim().is_empty() {
            return Err(Error::InvalidConfig("diagram.command must not be empty".into()));
        }
        Ok(())
    }
}

/// How results with equal scores are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Keep the order of the page index.
    #[default]
    Collection,
    /// Case-insensitive title, ascending.
    Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub index_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
    pub debounce_ms: u64,
    pub snippet_length: usize,
    pub display_counter: bool,
    pub display_score: bool,
    pub total_label: String,
    pub tie_break: TieBreak,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            index_path: "public/index.json".to_string(),
            index_url: None,
            debounce_ms: 1000,
            snippet_length: 200,
            display_counter: true,
            display_score: false,
            total_label: "Total found: {count} results.".to_string(),
            tie_break: TieBreak::Collection,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramSettings {
    pub command: String,
    pub args: Vec<String>,
    pub theme: String,
    pub security_level: String,
    pub marker_classes: Vec<String>,
    pub id_prefix: String,
    pub download_label: String,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            command: "mmdc".to_string(),
            args: Vec::new(),
            theme: "default".to_string(),
            security_level: "loose".to_string(),
            marker_classes: vec!["language-mermaid".to_string()],
            id_prefix: "scMermaid".to_string(),
            download_label: "Download SVG".to_string(),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
