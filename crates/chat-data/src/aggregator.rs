//! Aggregation queries over a [`MessageView`].
//!
//! Every query is independent, reads the view only, and returns an empty or
//! zero result for an empty view.

use std::collections::{BTreeMap, HashMap};

use chat_core::error::Result;
use chat_core::formatting::share_percent;
use chat_core::models::Message;
use chat_core::rules::TextRules;
use chat_core::settings::AnalyzerConfig;
use chat_core::time_utils::{hour_period, month_name, MONTH_NAMES, WEEKDAY_NAMES};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::session::MessageView;

// ── Result types ──────────────────────────────────────────────────────────────

/// Headline counters for a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    pub messages: usize,
    /// Whitespace-delimited tokens across all bodies.
    pub words: usize,
    /// Bodies equal to the media placeholder.
    pub media: usize,
    /// Link-rule matches across all bodies.
    pub links: usize,
}

/// Message count of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub year: i32,
    pub month_num: u32,
    /// `"Month-Year"`, e.g. `"March-2023"`.
    pub label: String,
    pub count: usize,
}

/// Message count of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Message count of one weekday or month name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityBucket {
    pub label: String,
    pub count: usize,
}

/// Weekday × hour-of-day message counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityHeatmap {
    /// Row labels, Monday first.
    pub days: Vec<String>,
    /// Column labels, one hour bucket each (`"00-1"` … `"23-00"`).
    pub periods: Vec<String>,
    /// `counts[day][hour]`.
    pub counts: Vec<Vec<usize>>,
}

impl ActivityHeatmap {
    fn empty() -> Self {
        Self {
            days: WEEKDAY_NAMES.iter().map(|d| d.to_string()).collect(),
            periods: (0..24).map(hour_period).collect(),
            counts: vec![vec![0; 24]; 7],
        }
    }

    /// Count for `day` (0 = Monday) and `hour`; 0 when out of range.
    pub fn get(&self, day: usize, hour: usize) -> usize {
        self.counts
            .get(day)
            .and_then(|row| row.get(hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCount {
    pub name: String,
    pub count: usize,
}

/// Share of all selected messages sent by one author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserShare {
    pub name: String,
    /// Rounded to two decimals.
    pub percent: f64,
}

/// Top authors plus the percentage table of every author.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BusyUsers {
    pub top: Vec<UserCount>,
    pub shares: Vec<UserShare>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Word frequency relative to the most frequent word (which weighs 1.0).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordWeight {
    pub word: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmojiCount {
    pub emoji: String,
    pub count: usize,
}

// ── ChatAggregator ────────────────────────────────────────────────────────────

/// Runs the named metrics with a fixed set of [`TextRules`] and table limits.
#[derive(Debug, Clone)]
pub struct ChatAggregator {
    rules: TextRules,
    top_n: usize,
    busy_users_top_n: usize,
    wordcloud_max_words: usize,
}

impl Default for ChatAggregator {
    fn default() -> Self {
        Self::new(TextRules::default())
    }
}

impl ChatAggregator {
    /// Aggregator with `rules` and the default limits.
    pub fn new(rules: TextRules) -> Self {
        let defaults = AnalyzerConfig::default();
        Self {
            rules,
            top_n: defaults.top_n,
            busy_users_top_n: defaults.busy_users_top_n,
            wordcloud_max_words: defaults.wordcloud_max_words,
        }
    }

    /// Build rules and limits from a loaded config.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            rules: config.text_rules()?,
            top_n: config.top_n,
            busy_users_top_n: config.busy_users_top_n,
            wordcloud_max_words: config.wordcloud_max_words,
        })
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_busy_users_top_n(mut self, top_n: usize) -> Self {
        self.busy_users_top_n = top_n;
        self
    }

    pub fn with_wordcloud_max_words(mut self, max_words: usize) -> Self {
        self.wordcloud_max_words = max_words;
        self
    }

    pub fn rules(&self) -> &TextRules {
        &self.rules
    }

    // ── Counters ──────────────────────────────────────────────────────────────

    /// Messages, words, media placeholders and links in the view.
    pub fn fetch_stats(&self, view: &MessageView<'_>) -> MessageStats {
        let mut stats = MessageStats::default();
        for message in view.iter() {
            stats.messages += 1;
            stats.words += message.body.split_whitespace().count();
            if message.is_media(&self.rules.media_marker) {
                stats.media += 1;
            }
            stats.links += self.rules.link.find_iter(&message.body).count();
        }
        stats
    }

    // ── Timelines ─────────────────────────────────────────────────────────────

    /// Messages per (year, month), oldest first.
    pub fn monthly_timeline(&self, view: &MessageView<'_>) -> Vec<TimelinePoint> {
        let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for message in view.iter() {
            *months.entry((message.year, message.month_num)).or_default() += 1;
        }

        months
            .into_iter()
            .map(|((year, month_num), count)| TimelinePoint {
                year,
                month_num,
                label: format!("{}-{}", month_name(month_num), year),
                count,
            })
            .collect()
    }

    /// Messages per calendar date, oldest first.
    pub fn daily_timeline(&self, view: &MessageView<'_>) -> Vec<DailyPoint> {
        let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for message in view.iter() {
            *days.entry(message.only_date).or_default() += 1;
        }

        days.into_iter()
            .map(|(date, count)| DailyPoint { date, count })
            .collect()
    }

    // ── Activity maps ─────────────────────────────────────────────────────────

    /// Messages per weekday, Monday through Sunday.
    pub fn week_activity_map(&self, view: &MessageView<'_>) -> Vec<ActivityBucket> {
        let mut counts = [0usize; 7];
        for message in view.iter() {
            counts[weekday_index(message)] += 1;
        }
        buckets(&WEEKDAY_NAMES, &counts)
    }

    /// Messages per calendar month, January through December.
    pub fn month_activity_map(&self, view: &MessageView<'_>) -> Vec<ActivityBucket> {
        let mut counts = [0usize; 12];
        for message in view.iter() {
            counts[(message.month_num as usize).saturating_sub(1) % 12] += 1;
        }
        buckets(&MONTH_NAMES, &counts)
    }

    /// 7×24 weekday × hour counts; cells without messages are 0.
    pub fn activity_heatmap(&self, view: &MessageView<'_>) -> ActivityHeatmap {
        let mut heatmap = ActivityHeatmap::empty();
        for message in view.iter() {
            let hour = (message.hour as usize).min(23);
            heatmap.counts[weekday_index(message)][hour] += 1;
        }
        heatmap
    }

    // ── Rankings ──────────────────────────────────────────────────────────────

    /// Top authors by message count and every author's percentage share.
    ///
    /// Notifications count as an author, so over the full table the shares
    /// add up to 100. Under a user selection the result has a single row.
    pub fn most_busy_users(&self, view: &MessageView<'_>) -> BusyUsers {
        let ranked = rank(view.iter().map(|m| m.author.as_str()));
        let total: usize = ranked.iter().map(|(_, count)| count).sum();

        let shares = ranked
            .iter()
            .map(|(name, count)| UserShare {
                name: name.to_string(),
                percent: share_percent(*count, total),
            })
            .collect();

        let top = ranked
            .into_iter()
            .take(self.busy_users_top_n)
            .map(|(name, count)| UserCount {
                name: name.to_string(),
                count,
            })
            .collect();

        BusyUsers { top, shares }
    }

    /// Word weights for a word cloud, heaviest first.
    pub fn create_wordcloud(&self, view: &MessageView<'_>) -> Vec<WordWeight> {
        let ranked = rank(self.filtered_words(view));
        let Some(&(_, max)) = ranked.first() else {
            return Vec::new();
        };

        ranked
            .into_iter()
            .take(self.wordcloud_max_words)
            .map(|(word, count)| WordWeight {
                word,
                weight: count as f64 / max as f64,
            })
            .collect()
    }

    /// The `top_n` most frequent words, ties in order of first use.
    pub fn most_common_words(&self, view: &MessageView<'_>) -> Vec<WordCount> {
        rank(self.filtered_words(view))
            .into_iter()
            .take(self.top_n)
            .map(|(word, count)| WordCount { word, count })
            .collect()
    }

    /// Every emoji-rule match with its count, most used first.
    pub fn emoji_helper(&self, view: &MessageView<'_>) -> Vec<EmojiCount> {
        let emoji = &self.rules.emoji;
        rank(
            view.iter()
                .flat_map(|m| emoji.find_iter(&m.body).map(|found| found.as_str())),
        )
        .into_iter()
        .map(|(emoji, count)| EmojiCount {
            emoji: emoji.to_string(),
            count,
        })
        .collect()
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Lower-cased words of human, non-media messages minus stop words.
    fn filtered_words<'v>(&'v self, view: &MessageView<'v>) -> impl Iterator<Item = String> + 'v {
        let rules = &self.rules;
        view.iter()
            .filter(|m| !m.is_notification())
            .filter(move |m| !m.is_media(&rules.media_marker))
            .flat_map(|m| m.body.split_whitespace())
            .map(str::to_lowercase)
            .filter(move |w| !rules.is_stop_word(w))
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn weekday_index(message: &Message) -> usize {
    message.timestamp.weekday().num_days_from_monday() as usize
}

fn buckets(labels: &[&str], counts: &[usize]) -> Vec<ActivityBucket> {
    labels
        .iter()
        .zip(counts)
        .map(|(label, &count)| ActivityBucket {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Count `items` and sort by descending count; ties keep first-seen order.
fn rank<K, I>(items: I) -> Vec<(K, usize)>
where
    K: std::hash::Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }

    // Stable sort preserves first-seen order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

// ── Tests ─────────────────────────────────────────────────────────────────────
