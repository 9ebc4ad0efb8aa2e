//! Plain-text rendering of an [`AnalysisReport`].
//!
//! Each metric becomes a titled section; tables are aligned by display width
//! so author names and emojis line up in a terminal.

use std::fmt::Write as _;

use chat_core::formatting::{format_count, format_share, share_percent};
use chat_data::analysis::AnalysisReport;
use unicode_width::UnicodeWidthStr;

/// Rows shown in the pie-style emoji summary.
const EMOJI_SUMMARY_ROWS: usize = 5;

/// Render the whole report as text.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();

    section(&mut out, &format!("Top Statistics ({})", report.selection));
    out.push_str(&render_table(
        &["Total Messages", "Total Words", "Media Shared", "Links Shared"],
        &[vec![
            format_count(report.stats.messages as u64),
            format_count(report.stats.words as u64),
            format_count(report.stats.media as u64),
            format_count(report.stats.links as u64),
        ]],
    ));

    section(&mut out, "Monthly Timeline");
    out.push_str(&render_table(
        &["Month", "Messages"],
        &report
            .monthly_timeline
            .iter()
            .map(|p| vec![p.label.clone(), format_count(p.count as u64)])
            .collect::<Vec<_>>(),
    ));

    section(&mut out, "Daily Timeline");
    out.push_str(&render_table(
        &["Date", "Messages"],
        &report
            .daily_timeline
            .iter()
            .map(|p| vec![p.date.to_string(), format_count(p.count as u64)])
            .collect::<Vec<_>>(),
    ));

    section(&mut out, "Activity Map");
    let busiest_day = report
        .week_activity
        .iter()
        .map(|b| vec![b.label.clone(), format_count(b.count as u64)])
        .collect::<Vec<_>>();
    out.push_str("Most Busy Day\n");
    out.push_str(&render_table(&["Day", "Messages"], &busiest_day));
    let busiest_month = report
        .month_activity
        .iter()
        .map(|b| vec![b.label.clone(), format_count(b.count as u64)])
        .collect::<Vec<_>>();
    out.push_str("\nMost Busy Month\n");
    out.push_str(&render_table(&["Month", "Messages"], &busiest_month));

    section(&mut out, "Weekly Activity Map");
    let mut header_refs = vec!["Day"];
    header_refs.extend(report.heatmap.periods.iter().map(String::as_str));
    let heat_rows = report
        .heatmap
        .days
        .iter()
        .zip(&report.heatmap.counts)
        .map(|(day, row)| {
            let mut cells = vec![day.clone()];
            cells.extend(row.iter().map(|c| c.to_string()));
            cells
        })
        .collect::<Vec<_>>();
    out.push_str(&render_table(&header_refs, &heat_rows));

    if let Some(busy) = &report.busy_users {
        section(&mut out, "Most Busy Users");
        out.push_str(&render_table(
            &["User", "Messages"],
            &busy
                .top
                .iter()
                .map(|u| vec![u.name.clone(), format_count(u.count as u64)])
                .collect::<Vec<_>>(),
        ));
        out.push('\n');
        out.push_str(&render_table(
            &["Name", "Percent"],
            &busy
                .shares
                .iter()
                .map(|s| vec![s.name.clone(), format_share(s.percent)])
                .collect::<Vec<_>>(),
        ));
    }

    section(&mut out, "Most Common Words");
    out.push_str(&render_table(
        &["Word", "Count"],
        &report
            .common_words
            .iter()
            .map(|w| vec![w.word.clone(), format_count(w.count as u64)])
            .collect::<Vec<_>>(),
    ));

    section(&mut out, "Word Cloud");
    out.push_str(&render_table(
        &["Word", "Weight"],
        &report
            .wordcloud
            .iter()
            .map(|w| vec![w.word.clone(), format!("{:.2}", w.weight)])
            .collect::<Vec<_>>(),
    ));

    section(&mut out, "Emoji Analysis");
    out.push_str(&render_table(
        &["Emoji", "Count"],
        &report
            .emojis
            .iter()
            .map(|e| vec![e.emoji.clone(), format_count(e.count as u64)])
            .collect::<Vec<_>>(),
    ));
    let top_total: usize = report
        .emojis
        .iter()
        .take(EMOJI_SUMMARY_ROWS)
        .map(|e| e.count)
        .sum();
    for emoji in report.emojis.iter().take(EMOJI_SUMMARY_ROWS) {
        let share = share_percent(emoji.count, top_total);
        let _ = writeln!(out, "{} {}", emoji.emoji, format_share(share));
    }

    out
}

/// Render `rows` under `headers`, padding every column to its widest cell.
///
/// An empty table renders as `(no data)`.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return "(no data)\n".to_string();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for row in rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.width()));
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (cell, width) in cells.zip(widths) {
        if !line.is_empty() {
            line.push_str("  ");
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

// ── Tests ──────────────────────────────────────────────────────────────────────
