//! 条目正文 HTML
//!
//! 经文内容来自数据源，可能带有内联标记，原样输出；其余文本转义

use quick_xml::escape::{escape, partial_escape};
use std::fmt::Write;

use crate::application::{DailyFeedItem, LoadedPassage, WeeklyFeedItem};
use crate::domain::{ExtractionStatus, ScriptureText};

/// 空经节（数据源缺失的位置）不输出
fn verse_line(html: &mut String, number: impl std::fmt::Display, verse: &str) {
    if verse.trim().is_empty() {
        return;
    }
    let _ = writeln!(html, "<p><sup>{}</sup> {}</p>", number, verse);
}

fn degraded_note(status: ExtractionStatus) -> Option<String> {
    match status {
        ExtractionStatus::Complete => None,
        ExtractionStatus::Truncated {
            missing_chapters,
            short_chapters,
        } => Some(format!(
            "Partial text: the source returned {} fewer chapter(s) and {} incomplete chapter(s) than the reading spans.",
            missing_chapters, short_chapters
        )),
        ExtractionStatus::Unfiltered => {
            Some("The reading range could not be isolated; showing the full source text.".to_string())
        }
    }
}

fn passage_body(html: &mut String, passage: &LoadedPassage) {
    if let Some(note) = degraded_note(passage.status) {
        let _ = writeln!(html, "<p><em>{}</em></p>", partial_escape(note.as_str()));
    }

    html.push_str("<div class='torah-text'>\n");
    match &passage.text {
        ScriptureText::Chaptered(chapters) => {
            for chapter in chapters {
                let _ = writeln!(html, "<h3>Chapter {}</h3>", chapter.number);
                for (number, verse) in chapter.numbered() {
                    verse_line(html, number, verse);
                }
            }
        }
        ScriptureText::Flat(verses) => {
            for (i, verse) in verses.iter().enumerate() {
                verse_line(html, i + 1, verse);
            }
        }
    }
    html.push_str("</div>\n");
}

/// 每周条目正文：标题、引用、译本、按章经文
pub(super) fn weekly_content(item: &WeeklyFeedItem) -> String {
    let mut html = String::new();
    let entry = &item.entry;
    let _ = writeln!(html, "<h2>Parashat {}</h2>", partial_escape(entry.portion_name.as_str()));
    let _ = writeln!(
        html,
        "<p><strong>Reference:</strong> {}</p>",
        partial_escape(entry.reference.to_string().as_str())
    );

    match &item.passage {
        Some(passage) => {
            if let Some(version) = &passage.version {
                let _ = writeln!(
                    html,
                    "<p><strong>Translation:</strong> {}</p>",
                    partial_escape(version.as_str())
                );
            }
            if let Some(source) = &passage.source_url {
                let source = escape(source.as_str());
                let _ = writeln!(
                    html,
                    "<p><strong>Source:</strong> <a href=\"{}\">{}</a></p>",
                    source, source
                );
            }
            passage_body(&mut html, passage);
        }
        None => html.push_str("<p>The text of this portion is temporarily unavailable.</p>\n"),
    }
    html
}

/// 每日条目正文：星期标题、第几天、经节范围、经文
pub(super) fn daily_content(item: &DailyFeedItem) -> String {
    let mut html = String::new();
    let segment = &item.segment;
    let _ = writeln!(
        html,
        "<h2>{} Study - Parashat {}</h2>",
        segment.day_name,
        partial_escape(segment.portion_name.as_str())
    );
    let _ = writeln!(
        html,
        "<p><strong>Day {} of 7</strong> | {}</p>",
        segment.day_index,
        range_text(item)
    );

    if !item.text_available {
        html.push_str("<p>The text of this portion is temporarily unavailable.</p>\n");
        return html;
    }

    html.push_str("<div class='daily-torah-text'>\n");
    for (i, verse) in segment.verses.iter().enumerate() {
        verse_line(&mut html, segment.offset + i + 1, verse);
    }
    html.push_str("</div>\n");
    html
}

/// 每日条目的经节范围描述
pub(super) fn range_text(item: &DailyFeedItem) -> String {
    if item.segment.verse_range_label.is_empty() {
        "No verses for this day".to_string()
    } else {
        format!("Verses {}", item.segment.verse_range_label)
    }
}
