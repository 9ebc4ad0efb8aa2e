//! Line-oriented parser turning normalized export text into [`Message`]s.
//!
//! A record starts at every line carrying a `DD/MM/YYYY, HH:MM - ` prefix.
//! Lines without a prefix continue the previous record's body. The parser
//! never fails: malformed lines degrade to continuation text or are dropped
//! when there is nothing to attach them to.

use chat_core::models::{Message, GROUP_NOTIFICATION};
use chat_core::time_utils::parse_prefix_timestamp;
use regex::Regex;
use tracing::debug;

/// Normalized message prefix: date, comma, 24-hour time, `" - "`.
pub const PREFIX_PATTERN: &str = r"^(\d{1,2}/\d{1,2}/\d{2,4}, \d{1,2}:\d{2}) - ";

// ── ParseStats ────────────────────────────────────────────────────────────────

/// Counters collected while parsing one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Messages produced, notifications included.
    pub messages: usize,
    /// Messages attributed to the notification author.
    pub notifications: usize,
    /// Lines appended to a previous message's body.
    pub continuation_lines: usize,
    /// Prefixed lines whose timestamp could not be parsed.
    pub bad_timestamps: usize,
    /// Lines discarded because no message preceded them.
    pub dropped_lines: usize,
}

// ── MessageParser ─────────────────────────────────────────────────────────────

/// Splits export text into messages.
#[derive(Debug, Clone)]
pub struct MessageParser {
    prefix: Regex,
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageParser {
    /// Create a parser that labels system events with [`GROUP_NOTIFICATION`].
    pub fn new() -> Self {
        Self {
            prefix: Regex::new(PREFIX_PATTERN).expect("prefix pattern is valid"),
        }
    }

    /// Parse `text` into messages in export order.
    pub fn parse(&self, text: &str) -> Vec<Message> {
        self.parse_with_stats(text).0
    }

    /// Parse `text` and also report what happened to every line.
    pub fn parse_with_stats(&self, text: &str) -> (Vec<Message>, ParseStats) {
        let mut messages: Vec<Message> = Vec::new();
        let mut stats = ParseStats::default();

        for line in text.lines() {
            let parsed = self.prefix.captures(line).and_then(|caps| {
                let whole = caps.get(0)?;
                let timestamp = parse_prefix_timestamp(caps.get(1)?.as_str());
                if timestamp.is_none() {
                    stats.bad_timestamps += 1;
                }
                Some((timestamp?, &line[whole.end()..]))
            });

            match parsed {
                Some((timestamp, rest)) => {
                    let (author, body) = Self::split_author(rest);
                    messages.push(Message::new(timestamp, author, body));
                }
                None => match messages.last_mut() {
                    Some(previous) => {
                        previous.append_line(line);
                        stats.continuation_lines += 1;
                    }
                    None => stats.dropped_lines += 1,
                },
            }
        }

        stats.messages = messages.len();
        stats.notifications = messages
            .iter()
            .filter(|m| m.is_notification())
            .count();

        debug!(
            "Parsed {} messages ({} notifications, {} continuation lines, {} bad timestamps, {} dropped lines)",
            stats.messages,
            stats.notifications,
            stats.continuation_lines,
            stats.bad_timestamps,
            stats.dropped_lines,
        );

        (messages, stats)
    }

    /// Split the text after the prefix into `(author, body)`.
    ///
    /// The author ends at the first `:` that has a non-empty author before it
    /// and whitespace (or the end of the line) after it. Without such a colon
    /// the whole remainder is a notification.
    fn split_author(rest: &str) -> (&str, &str) {
        let split = rest.char_indices().find_map(|(i, c)| {
            if c != ':' || i == 0 {
                return None;
            }
            let after = &rest[i + 1..];
            match after.chars().next() {
                None => Some((i, after)),
                Some(next) if next.is_whitespace() => Some((i, &after[next.len_utf8()..])),
                Some(_) => None,
            }
        });

        match split {
            Some((i, body)) => (&rest[..i], body),
            None => (GROUP_NOTIFICATION, rest),
        }
    }
}

/// Parse `text` with a default [`MessageParser`].
pub fn parse_messages(text: &str) -> Vec<Message> {
    MessageParser::default().parse(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::time_utils::normalize_line;
    use chrono::{NaiveDate, Timelike};

    fn parse(text: &str) -> (Vec<Message>, ParseStats) {
        MessageParser::default().parse_with_stats(text)
    }

    // ── basic records ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_normalized_line() {
        let normalized = normalize_line("15/03/23, 9:05 pm - Alice: Hello there");
        assert_eq!(normalized, "15/03/2023, 21:05 - Alice: Hello there");

        let messages = parse_messages(&normalized);
        assert_eq!(messages.len(), 1);
        let msg = &messages[0];
        assert_eq!(msg.only_date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(msg.timestamp.hour(), 21);
        assert_eq!(msg.timestamp.minute(), 5);
        assert_eq!(msg.author, "Alice");
        assert_eq!(msg.body, "Hello there");
    }

    #[test]
    fn test_parse_preserves_order() {
        let text = "02/01/2024, 10:00 - B: later\n01/01/2024, 09:00 - A: earlier\n";
        let messages = parse_messages(text);
        let authors: Vec<&str> = messages.iter().map(|m| m.author.as_str()).collect();
        assert_eq!(authors, vec!["B", "A"]);
    }

    #[test]
    fn test_parse_two_digit_year_prefix() {
        let messages = parse_messages("15/03/23, 21:05 - Alice: hi");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].year, 2023);
    }

    // ── notifications ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_notification_without_author() {
        let (messages, stats) = parse("15/03/2023, 21:05 - Alice created group \"Trip\"\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].author, GROUP_NOTIFICATION);
        assert_eq!(messages[0].body, "Alice created group \"Trip\"");
        assert_eq!(stats.notifications, 1);
    }

    #[test]
    fn test_parse_colon_without_space_is_not_author() {
        let messages = parse_messages("15/03/2023, 21:05 - Meeting at 10:30 confirmed");
        assert_eq!(messages[0].author, GROUP_NOTIFICATION);
    }

    #[test]
    fn test_parse_leading_colon_is_not_author() {
        let messages = parse_messages("15/03/2023, 21:05 - : odd");
        assert_eq!(messages[0].author, GROUP_NOTIFICATION);
        assert_eq!(messages[0].body, ": odd");
    }

    #[test]
    fn test_parse_stats_counts_notifications() {
        let (_, stats) = MessageParser::new().parse_with_stats(
            "15/03/2023, 21:05 - You joined\n15/03/2023, 21:06 - Alice: hi\n",
        );
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.notifications, 1);
    }

    // ── edge cases ────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_empty_body() {
        let messages = parse_messages("15/03/2023, 21:05 - Alice:");
        assert_eq!(messages[0].author, "Alice");
        assert_eq!(messages[0].body, "");
    }

    #[test]
    fn test_parse_media_body() {
        let messages = parse_messages("15/03/2023, 21:05 - Bob: <Media omitted>\n");
        assert_eq!(messages[0].body, "<Media omitted>");
    }

    #[test]
    fn test_parse_author_with_punctuation() {
        let messages = parse_messages("15/03/2023, 21:05 - Dr. J. Smith (work): see: this");
        assert_eq!(messages[0].author, "Dr. J. Smith (work)");
        assert_eq!(messages[0].body, "see: this");
    }

    #[test]
    fn test_parse_author_with_phone_number() {
        let messages = parse_messages("15/03/2023, 21:05 - +91 98765 43210: hey");
        assert_eq!(messages[0].author, "+91 98765 43210");
        assert_eq!(messages[0].body, "hey");
    }

    #[test]
    fn test_parse_multi_line_body() {
        let text = "15/03/2023, 21:05 - Alice: first\nsecond\n\nfourth\n15/03/2023, 21:06 - Bob: ok\n";
        let (messages, stats) = parse(text);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "first\nsecond\n\nfourth");
        assert_eq!(messages[1].body, "ok");
        assert_eq!(stats.continuation_lines, 3);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let text = "15/03/2023, 21:05 - Alice: one\r\n15/03/2023, 21:06 - Bob: two\r\n";
        let messages = parse_messages(text);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "one");
        assert_eq!(messages[1].body, "two");
    }

    #[test]
    fn test_parse_date_inside_body_does_not_split() {
        let text = "15/03/2023, 21:05 - Alice: see you 16/03/2023, 10:00 - ok?";
        let messages = parse_messages(text);
        assert_eq!(messages.len(), 1);
    }

    // ── recovery policy ───────────────────────────────────────────────────────

    #[test]
    fn test_parse_text_before_first_message_is_dropped() {
        let text = "group created\n15/03/2023, 21:05 - Alice: hi\n";
        let (messages, stats) = parse(text);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hi");
        assert_eq!(stats.dropped_lines, 1);
    }

    #[test]
    fn test_parse_unprefixed_line_folds_into_previous() {
        let text = "15/03/2023, 21:05 - Alice: hi\ngroup created\n";
        let messages = parse_messages(text);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "hi\ngroup created");
    }

    #[test]
    fn test_parse_bad_timestamp_folds_into_previous() {
        let text = "15/03/2023, 21:05 - Alice: hi\n31/02/2023, 10:00 - Bob: impossible date\n";
        let (messages, stats) = parse(text);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].body,
            "hi\n31/02/2023, 10:00 - Bob: impossible date"
        );
        assert_eq!(stats.bad_timestamps, 1);
    }

    #[test]
    fn test_parse_bad_timestamp_first_is_dropped() {
        let (messages, stats) = parse("99/99/2023, 10:00 - Bob: nope\n");
        assert!(messages.is_empty());
        assert_eq!(stats.bad_timestamps, 1);
        assert_eq!(stats.dropped_lines, 1);
    }

    #[test]
    fn test_parse_unconverted_twelve_hour_lines_are_not_messages() {
        let (messages, stats) = parse("15/03/23, 9:05 pm - Alice: hi\n");
        assert!(messages.is_empty());
        assert_eq!(stats.dropped_lines, 1);
    }

    #[test]
    fn test_parse_empty_input() {
        let (messages, stats) = parse("");
        assert!(messages.is_empty());
        assert_eq!(stats, ParseStats::default());
    }
}
