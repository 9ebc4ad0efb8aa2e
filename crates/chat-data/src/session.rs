//! One loaded export and the read-only views handed to the aggregator.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chat_core::error::Result;
use chat_core::models::{Message, Selection, OVERALL};
use tracing::info;

use crate::parser::{MessageParser, ParseStats};
use crate::reader::load_export;

// ── ChatSession ───────────────────────────────────────────────────────────────

/// The parsed message table of one export.
///
/// Created on load, swapped out with [`ChatSession::replace_with`] when
/// another export is loaded, discarded on drop. The table is never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct ChatSession {
    source: PathBuf,
    messages: Vec<Message>,
    parse_stats: ParseStats,
}

impl ChatSession {
    /// Read, normalize and parse the export at `path`.
    pub fn load(path: &Path, converted_out: Option<&Path>) -> Result<Self> {
        let export = load_export(path, converted_out)?;
        let session = Self::from_text(export.source, &export.text);
        info!(
            "Loaded {} messages from {}",
            session.len(),
            session.source.display()
        );
        Ok(session)
    }

    /// Parse already-normalized export text.
    pub fn from_text(source: impl Into<PathBuf>, text: &str) -> Self {
        let (messages, parse_stats) = MessageParser::default().parse_with_stats(text);
        Self::from_messages(source, messages, parse_stats)
    }

    /// Wrap an existing table.
    pub fn from_messages(
        source: impl Into<PathBuf>,
        messages: Vec<Message>,
        parse_stats: ParseStats,
    ) -> Self {
        Self {
            source: source.into(),
            messages,
            parse_stats,
        }
    }

    /// Replace this session's table with `other`'s, returning the old session.
    pub fn replace_with(&mut self, other: ChatSession) -> ChatSession {
        info!(
            "Replacing session {} with {}",
            self.source.display(),
            other.source.display()
        );
        std::mem::replace(self, other)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn parse_stats(&self) -> &ParseStats {
        &self.parse_stats
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Selectable users: `"Overall"` followed by the sorted human authors.
    pub fn users(&self) -> Vec<String> {
        let authors: BTreeSet<&str> = self
            .messages
            .iter()
            .filter(|m| !m.is_notification())
            .map(|m| m.author.as_str())
            .collect();

        std::iter::once(OVERALL.to_string())
            .chain(authors.into_iter().map(str::to_string))
            .collect()
    }

    /// `true` when `selection` matches at least one message.
    pub fn has_author(&self, selection: &Selection) -> bool {
        self.messages.iter().any(|m| selection.matches(m))
    }

    /// A read-only view restricted to `selection`.
    pub fn view<'a>(&'a self, selection: &'a Selection) -> MessageView<'a> {
        MessageView::new(&self.messages, selection)
    }
}

// ── MessageView ───────────────────────────────────────────────────────────────

/// The message table seen through a [`Selection`] predicate.
#[derive(Debug, Clone, Copy)]
pub struct MessageView<'a> {
    messages: &'a [Message],
    selection: &'a Selection,
}

impl<'a> MessageView<'a> {
    pub fn new(messages: &'a [Message], selection: &'a Selection) -> Self {
        Self {
            messages,
            selection,
        }
    }

    pub fn selection(&self) -> &'a Selection {
        self.selection
    }

    /// Messages passing the selection, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Message> + 'a {
        let selection = self.selection;
        self.messages.iter().filter(move |m| selection.matches(m))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// The unfiltered table behind this view.
    pub fn table(&self) -> &'a [Message] {
        self.messages
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
