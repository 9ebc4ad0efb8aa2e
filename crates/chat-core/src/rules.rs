//! Text classification rules shared by the word and emoji aggregations.
//!
//! Stop words, the emoji rule set and the link rule are configuration data,
//! not code: they can be replaced from a config file or the command line.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::{ChatError, Result};
use crate::models::MEDIA_OMITTED;

/// Default emoji rule.
///
/// A flag (pair of regional indicators) or a pictograph with its optional
/// variation selector, skin tone and zero-width-joiner continuations counts as
/// one emoji. A lone skin-tone modifier is counted on its own.
pub const DEFAULT_EMOJI_PATTERN: &str = concat!(
    r"\p{Regional_Indicator}{2}",
    r"|\p{Extended_Pictographic}\x{FE0F}?\p{Emoji_Modifier}?",
    r"(?:\x{200D}\p{Extended_Pictographic}\x{FE0F}?\p{Emoji_Modifier}?)*",
    r"|\p{Emoji_Modifier}",
);

/// Default link rule: `http://`, `https://` and bare `www.` URLs.
pub const DEFAULT_LINK_PATTERN: &str = r#"(?i)\b(?:https?://|www\.)[^\s<>"]+"#;

/// Built-in stop words used when no list is configured.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "about", "am", "an", "and", "are", "as", "at", "be", "but", "by", "can", "did", "do",
    "for", "from", "get", "got", "had", "has", "have", "he", "her", "him", "his", "how", "i",
    "if", "in", "is", "it", "its", "just", "me", "my", "no", "not", "of", "ok", "on", "or",
    "our", "she", "so", "that", "the", "their", "them", "then", "there", "they", "this", "to",
    "too", "u", "up", "us", "was", "we", "were", "what", "when", "which", "who", "will",
    "with", "you", "your",
];

/// Classification rules handed to the aggregator.
#[derive(Debug, Clone)]
pub struct TextRules {
    /// Lower-cased words excluded from word frequencies.
    pub stop_words: HashSet<String>,
    /// Each match is counted as one emoji.
    pub emoji: Regex,
    /// Each match is counted as one shared link.
    pub link: Regex,
    /// Body text that stands for an attachment.
    pub media_marker: String,
}

impl Default for TextRules {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            emoji: compile(DEFAULT_EMOJI_PATTERN, "emoji")
                .expect("built-in emoji pattern is valid"),
            link: compile(DEFAULT_LINK_PATTERN, "link")
                .expect("built-in link pattern is valid"),
            media_marker: MEDIA_OMITTED.to_string(),
        }
    }
}

impl TextRules {
    /// Replace the stop-word set. Entries are trimmed and lower-cased.
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self
    }

    /// Replace the emoji rule with a user-supplied regex.
    pub fn with_emoji_pattern(mut self, pattern: &str) -> Result<Self> {
        self.emoji = compile(pattern, "emoji")?;
        Ok(self)
    }

    /// Replace the link rule with a user-supplied regex.
    pub fn with_link_pattern(mut self, pattern: &str) -> Result<Self> {
        self.link = compile(pattern, "link")?;
        Ok(self)
    }

    /// `true` when `word` (already lower-cased) is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

/// Read a newline-separated stop-word file.
///
/// Blank lines and lines starting with `#` are ignored; entries are
/// lower-cased.
pub fn load_stop_words(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| ChatError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect();

    debug!("Loaded {} stop words from {}", words.len(), path.display());
    Ok(words)
}

fn compile(pattern: &str, what: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ChatError::Config(format!("invalid {} pattern {:?}: {}", what, pattern, e)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
