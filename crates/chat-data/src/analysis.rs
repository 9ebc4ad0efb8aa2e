//! Full analysis pipeline for one selection.
//!
//! Runs every aggregation once and bundles the results into an
//! [`AnalysisReport`] ready for the presentation layer.

use chat_core::models::Selection;
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{
    ActivityBucket, ActivityHeatmap, BusyUsers, ChatAggregator, DailyPoint, EmojiCount,
    MessageStats, TimelinePoint, WordCount, WordWeight,
};
use crate::session::ChatSession;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    /// Export the session was loaded from.
    pub source: String,
    /// Messages in the whole table, notifications included.
    pub total_messages: usize,
    /// Wall-clock seconds spent running the aggregations.
    pub aggregation_time_seconds: f64,
}

/// Every metric for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// `"Overall"` or the selected author.
    pub selection: String,
    pub stats: MessageStats,
    pub monthly_timeline: Vec<TimelinePoint>,
    pub daily_timeline: Vec<DailyPoint>,
    pub week_activity: Vec<ActivityBucket>,
    pub month_activity: Vec<ActivityBucket>,
    pub heatmap: ActivityHeatmap,
    /// Only computed for the `Overall` selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_users: Option<BusyUsers>,
    pub wordcloud: Vec<WordWeight>,
    pub common_words: Vec<WordCount>,
    pub emojis: Vec<EmojiCount>,
    pub metadata: ReportMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run every aggregation of `aggregator` against `session` for `selection`.
pub fn build_report(
    session: &ChatSession,
    aggregator: &ChatAggregator,
    selection: &Selection,
) -> AnalysisReport {
    let start = std::time::Instant::now();
    let view = session.view(selection);

    let stats = aggregator.fetch_stats(&view);
    debug!("Stats for {}: {:?}", selection, stats);

    let monthly_timeline = aggregator.monthly_timeline(&view);
    let daily_timeline = aggregator.daily_timeline(&view);
    debug!(
        "Timelines: {} months, {} days",
        monthly_timeline.len(),
        daily_timeline.len()
    );

    let week_activity = aggregator.week_activity_map(&view);
    let month_activity = aggregator.month_activity_map(&view);
    let heatmap = aggregator.activity_heatmap(&view);

    let busy_users = selection
        .is_overall()
        .then(|| aggregator.most_busy_users(&view));

    let wordcloud = aggregator.create_wordcloud(&view);
    let common_words = aggregator.most_common_words(&view);
    let emojis = aggregator.emoji_helper(&view);
    debug!(
        "Frequencies: {} cloud words, {} common words, {} distinct emojis",
        wordcloud.len(),
        common_words.len(),
        emojis.len()
    );

    let metadata = ReportMetadata {
        generated_at: chrono::Utc::now().to_rfc3339(),
        source: session.source().display().to_string(),
        total_messages: session.len(),
        aggregation_time_seconds: start.elapsed().as_secs_f64(),
    };

    AnalysisReport {
        selection: selection.to_string(),
        stats,
        monthly_timeline,
        daily_timeline,
        week_activity,
        month_activity,
        heatmap,
        busy_users,
        wordcloud,
        common_words,
        emojis,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
15/03/2023, 21:05 - Alice created group \"Trip\"
15/03/2023, 21:05 - Alice: Hello there 😂
15/03/2023, 21:06 - Bob: <Media omitted>
16/04/2023, 08:00 - Bob: tickets at https://example.com
";

    #[test]
    fn test_build_report_overall() {
        let session = ChatSession::from_text("chat.txt", EXPORT);
        let report = build_report(&session, &ChatAggregator::default(), &Selection::Overall);

        assert_eq!(report.selection, "Overall");
        assert_eq!(report.stats.messages, 4);
        assert_eq!(report.stats.media, 1);
        assert_eq!(report.stats.links, 1);
        assert_eq!(report.monthly_timeline.len(), 2);
        assert_eq!(report.daily_timeline.len(), 2);
        assert_eq!(report.week_activity.len(), 7);
        assert_eq!(report.month_activity.len(), 12);
        assert_eq!(report.heatmap.total(), 4);
        assert!(report.busy_users.is_some());
        assert_eq!(report.emojis.len(), 1);
        assert_eq!(report.metadata.total_messages, 4);
        assert_eq!(report.metadata.source, "chat.txt");
    }

    #[test]
    fn test_build_report_user_has_no_busy_users() {
        let session = ChatSession::from_text("chat.txt", EXPORT);
        let bob = Selection::User("Bob".to_string());
        let report = build_report(&session, &ChatAggregator::default(), &bob);

        assert_eq!(report.selection, "Bob");
        assert_eq!(report.stats.messages, 2);
        assert!(report.busy_users.is_none());
        assert!(report.emojis.is_empty());
    }

    #[test]
    fn test_build_report_absent_user_is_all_zero() {
        let session = ChatSession::from_text("chat.txt", EXPORT);
        let carol = Selection::User("Carol".to_string());
        let report = build_report(&session, &ChatAggregator::default(), &carol);

        assert_eq!(report.stats, MessageStats::default());
        assert!(report.monthly_timeline.is_empty());
        assert!(report.daily_timeline.is_empty());
        assert!(report.common_words.is_empty());
        assert!(report.wordcloud.is_empty());
        assert_eq!(report.metadata.total_messages, 4);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let session = ChatSession::from_text("chat.txt", EXPORT);
        let report = build_report(&session, &ChatAggregator::default(), &Selection::Overall);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stats"]["messages"], 4);
        assert_eq!(json["monthly_timeline"][0]["label"], "March-2023");
        assert_eq!(json["daily_timeline"][0]["date"], "2023-03-15");
        assert_eq!(json["week_activity"][0]["label"], "Monday");
        assert!(json["busy_users"]["shares"].is_array());
    }

    #[test]
    fn test_report_json_omits_busy_users_for_user() {
        let session = ChatSession::from_text("chat.txt", EXPORT);
        let alice = Selection::User("Alice".to_string());
        let report = build_report(&session, &ChatAggregator::default(), &alice);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("busy_users").is_none());
    }
}
