//! RSS 2.0 渲染器
//!
//! 频道元数据 + 条目；正文放在 `content:encoded` 的 CDATA 中

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use thiserror::Error;

use crate::application::{DailyFeed, DailyFeedItem, WeeklyFeed, WeeklyFeedItem};
use crate::domain::Location;

use super::html;

const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";
const LANGUAGE: &str = "en-us";

/// RSS 渲染错误
#[derive(Debug, Error)]
pub enum RssError {
    #[error("XML write error: {0}")]
    Xml(String),

    #[error("Invalid UTF-8 in output: {0}")]
    Encoding(String),
}

/// 频道元数据
struct Channel {
    title: String,
    description: &'static str,
    link: String,
}

/// 单个条目
struct Item {
    title: String,
    link: String,
    guid: String,
    pub_date: String,
    description: String,
    content: String,
}

/// RSS 渲染器
#[derive(Debug, Clone)]
pub struct RssRenderer {
    base_url: String,
}

impl RssRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 渲染每周 Feed
    pub fn render_weekly(&self, feed: &WeeklyFeed, now: DateTime<Utc>) -> Result<String, RssError> {
        let channel = Channel {
            title: format!("Weekly Torah Portions ({})", feed.location.title()),
            description: "Upcoming weekly Torah portions with full English text",
            link: self.feed_link("weekly", feed.location),
        };
        let items: Vec<Item> = feed
            .items
            .iter()
            .map(|item| self.weekly_item(feed.location, item))
            .collect();
        write_document(&channel, &items, now)
    }

    /// 渲染每日 Feed
    pub fn render_daily(&self, feed: &DailyFeed, now: DateTime<Utc>) -> Result<String, RssError> {
        let channel = Channel {
            title: format!("Daily Torah Portions ({})", feed.location.title()),
            description: "Upcoming weekly Torah portions divided into seven daily readings",
            link: self.feed_link("daily", feed.location),
        };
        let items: Vec<Item> = feed
            .items
            .iter()
            .map(|item| self.daily_item(feed.location, item))
            .collect();
        write_document(&channel, &items, now)
    }

    fn feed_link(&self, kind: &str, location: Location) -> String {
        format!("{}/feeds/{}/{}", self.base_url, kind, location)
    }

    fn weekly_item(&self, location: Location, item: &WeeklyFeedItem) -> Item {
        let entry = &item.entry;
        let title = format!("Parashat {}", entry.portion_name);

        let mut description = format!(
            "Torah Portion: {}\nReference: {}",
            title, entry.reference
        );
        match &item.passage {
            Some(passage) => {
                if let Some(version) = &passage.version {
                    description.push_str(&format!("\nTranslation: {}", version));
                }
            }
            None => description.push_str("\nText unavailable"),
        }

        Item {
            link: format!(
                "{}#{}",
                self.feed_link("weekly", location),
                slug(&entry.portion_name)
            ),
            guid: format!("{}-{}-{}", slug(&entry.portion_name), entry.date, location),
            pub_date: rfc2822_at(entry.date, 0),
            description,
            content: html::weekly_content(item),
            title,
        }
    }

    fn daily_item(&self, location: Location, item: &DailyFeedItem) -> Item {
        let segment = &item.segment;
        let portion_slug = slug(&segment.portion_name);

        Item {
            title: format!(
                "{} - Parashat {} (Day {})",
                segment.day_name, segment.portion_name, segment.day_index
            ),
            link: format!(
                "{}#{}-day-{}",
                self.feed_link("daily", location),
                portion_slug,
                segment.day_index
            ),
            guid: format!(
                "{}-{}-day-{}-{}",
                portion_slug, item.date, segment.day_index, location
            ),
            pub_date: rfc2822_at(item.date, 6),
            description: format!(
                "Daily Torah study for {}\nParashat {} - {}",
                segment.day_name,
                segment.portion_name,
                html::range_text(item)
            ),
            content: html::daily_content(item),
        }
    }
}

/// URL 片段：小写字母数字，其余替换为 `-`
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

/// date 当天 hour:00 UTC 的 RFC 2822 表示
fn rfc2822_at(date: NaiveDate, hour: u32) -> String {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(time)).to_rfc2822()
}

/// 按 `]]>` 切分，使每段都能安全放入 CDATA
fn cdata_sections(content: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = content;
    while let Some(pos) = rest.find("]]>") {
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn xml_err(e: impl std::fmt::Display) -> RssError {
    RssError::Xml(e.to_string())
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), RssError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

fn write_item(writer: &mut XmlWriter, item: &Item) -> Result<(), RssError> {
    writer
        .write_event(Event::Start(BytesStart::new("item")))
        .map_err(xml_err)?;

    write_text_element(writer, "title", &item.title)?;
    write_text_element(writer, "link", &item.link)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    writer.write_event(Event::Start(guid)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(&item.guid)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("guid")))
        .map_err(xml_err)?;

    write_text_element(writer, "pubDate", &item.pub_date)?;
    write_text_element(writer, "description", &item.description)?;

    writer
        .write_event(Event::Start(BytesStart::new("content:encoded")))
        .map_err(xml_err)?;
    for section in cdata_sections(&item.content) {
        writer
            .write_event(Event::CData(BytesCData::new(section)))
            .map_err(xml_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("content:encoded")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("item")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_document(channel: &Channel, items: &[Item], now: DateTime<Utc>) -> Result<String, RssError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:content", CONTENT_NAMESPACE));
    writer.write_event(Event::Start(rss)).map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(xml_err)?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "description", channel.description)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "language", LANGUAGE)?;
    write_text_element(&mut writer, "lastBuildDate", &now.to_rfc2822())?;

    for item in items {
        write_item(&mut writer, item)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| RssError::Encoding(e.to_string()))
}
