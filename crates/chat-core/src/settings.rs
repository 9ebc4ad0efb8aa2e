use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{ChatError, Result};
use crate::models::Selection;
use crate::rules::{load_stop_words, TextRules};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Descriptive statistics for exported chat transcripts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chat-analyzer",
    about = "Descriptive statistics for exported chat transcripts",
    version
)]
pub struct Settings {
    /// Chat export to analyze
    pub file: PathBuf,

    /// Restrict the analysis to one author ("Overall" for everyone)
    #[arg(long, default_value = "Overall")]
    pub user: String,

    /// Print the selectable users and exit
    #[arg(long)]
    pub list_users: bool,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Number of rows in the most-common-words table
    #[arg(long)]
    pub top: Option<usize>,

    /// Newline-separated stop-word file
    #[arg(long)]
    pub stop_words: Option<PathBuf>,

    /// JSON configuration file (defaults to ~/.chat-analyzer/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the 24-hour normalized copy of the export here
    #[arg(long)]
    pub converted_out: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse CLI arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The author selection requested with `--user`.
    pub fn selection(&self) -> Selection {
        Selection::from_label(&self.user)
    }

    /// Load the analyzer config and fold CLI overrides into it.
    ///
    /// An explicit `--config` must exist and parse; the default config file
    /// is optional.
    pub fn analyzer_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::load_from(path)?,
            None => AnalyzerConfig::load_default(),
        };

        if let Some(top) = self.top {
            config.top_n = top;
        }
        if let Some(path) = &self.stop_words {
            config.stop_words_file = Some(path.clone());
        }

        Ok(config)
    }
}

// ── AnalyzerConfig ─────────────────────────────────────────────────────────────

/// Tunables read from `~/.chat-analyzer/config.json`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Rows in the most-common-words table.
    pub top_n: usize,
    /// Rows in the most-busy-users ranking.
    pub busy_users_top_n: usize,
    /// Maximum number of words kept for the word cloud.
    pub wordcloud_max_words: usize,
    /// Inline stop words; merged with `stop_words_file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_words_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_pattern: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            busy_users_top_n: 5,
            wordcloud_max_words: 200,
            stop_words: None,
            stop_words_file: None,
            emoji_pattern: None,
            link_pattern: None,
        }
    }
}

impl AnalyzerConfig {
    /// Return the default path to the config file.
    /// Uses `~/.chat-analyzer/config.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".chat-analyzer").join("config.json")
    }

    /// Load the default config file.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_default() -> Self {
        Self::load_or_default(&Self::config_path())
    }

    /// Like [`AnalyzerConfig::load_from`], but never fails.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("Ignoring config {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ChatError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Build the [`TextRules`] this config describes.
    ///
    /// With neither inline stop words nor a stop-word file, the built-in list
    /// is kept.
    pub fn text_rules(&self) -> Result<TextRules> {
        let mut rules = TextRules::default();

        if self.stop_words.is_some() || self.stop_words_file.is_some() {
            let mut words = self.stop_words.clone().unwrap_or_default();
            if let Some(path) = &self.stop_words_file {
                words.extend(load_stop_words(path)?);
            }
            rules = rules.with_stop_words(words);
        }
        if let Some(pattern) = &self.emoji_pattern {
            rules = rules.with_emoji_pattern(pattern)?;
        }
        if let Some(pattern) = &self.link_pattern {
            rules = rules.with_link_pattern(pattern)?;
        }

        Ok(rules)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
