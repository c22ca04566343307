//! 经文范围提取
//!
//! 从按章组织的文本中取出引用范围内的经节（闭区间）。
//!
//! 提取策略：
//! 1. `Flat` 文本视为数据源已过滤，原样返回
//! 2. `Chaptered` 文本按章节号遍历 start_chapter..=end_chapter，按经节号筛选
//! 3. 数据源缺章或缺节时返回已有部分，并标记为 `Truncated`
//! 4. 筛选后为空的章节丢弃；全部为空时退回原始文本，标记为 `Unfiltered`

use crate::domain::parasha::ScriptureReference;

use super::text::{Chapter, ScriptureText};

/// 提取结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// 范围完整
    Complete,
    /// 数据源截断：缺少整章或章内经节不足
    Truncated {
        missing_chapters: u32,
        short_chapters: u32,
    },
    /// 范围内没有任何经节，返回的是未过滤的原始文本
    Unfiltered,
}

impl ExtractionStatus {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, ExtractionStatus::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Complete => "complete",
            ExtractionStatus::Truncated { .. } => "truncated",
            ExtractionStatus::Unfiltered => "unfiltered",
        }
    }
}

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: ScriptureText,
    pub status: ExtractionStatus,
}

/// 提取范围内的经节，返回与输入相同形状的文本
pub fn extract(text: &ScriptureText, range: &ScriptureReference) -> ScriptureText {
    extract_with_status(text, range).text
}

/// 提取范围内的经节，同时报告数据是否完整
pub fn extract_with_status(text: &ScriptureText, range: &ScriptureReference) -> Extraction {
    let chapters = match text {
        ScriptureText::Flat(_) => {
            return Extraction {
                text: text.clone(),
                status: ExtractionStatus::Complete,
            }
        }
        ScriptureText::Chaptered(chapters) => chapters,
    };

    let mut kept: Vec<Chapter> = Vec::new();
    let mut found_chapters = 0u32;
    let mut short_chapters = 0u32;
    let mut last_seen: Option<u32> = None;

    for chapter in chapters
        .iter()
        .filter(|c| (range.start_chapter..=range.end_chapter).contains(&c.number))
    {
        // 重复章节号只取第一个
        if last_seen.map_or(false, |n| n >= chapter.number) {
            continue;
        }
        last_seen = Some(chapter.number);
        found_chapters += 1;

        let lower = if chapter.number == range.start_chapter {
            range.start_verse
        } else {
            1
        };
        let upper = (chapter.number == range.end_chapter).then_some(range.end_verse);

        let missing_head = chapter.first_verse > lower;
        let missing_tail = match chapter.last_verse() {
            None => true,
            Some(last) => last < lower || upper.map_or(false, |u| last < u),
        };
        if missing_head || missing_tail {
            short_chapters += 1;
        }

        let verses: Vec<String> = chapter
            .numbered()
            .filter(|(n, _)| *n >= lower && upper.map_or(true, |u| *n <= u))
            .map(|(_, v)| v.to_string())
            .collect();

        if verses.is_empty() {
            continue;
        }

        kept.push(Chapter {
            number: chapter.number,
            first_verse: lower.max(chapter.first_verse),
            verses,
        });
    }

    if kept.is_empty() {
        return Extraction {
            text: text.clone(),
            status: ExtractionStatus::Unfiltered,
        };
    }

    let missing_chapters = range.chapter_count().saturating_sub(found_chapters);
    let status = if missing_chapters == 0 && short_chapters == 0 {
        ExtractionStatus::Complete
    } else {
        ExtractionStatus::Truncated {
            missing_chapters,
            short_chapters,
        }
    };

    Extraction {
        text: ScriptureText::Chaptered(kept),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter_verses(chapter: u32, n: u32) -> Vec<String> {
        (1..=n).map(|v| format!("{}:{}", chapter, v)).collect()
    }

    /// 从第 1 章开始的完整章节
    fn book(lengths: &[u32]) -> ScriptureText {
        ScriptureText::from_chapters(
            1,
            lengths
                .iter()
                .enumerate()
                .map(|(i, n)| chapter_verses(i as u32 + 1, *n))
                .collect(),
        )
    }

    fn range(raw: &str) -> ScriptureReference {
        ScriptureReference::parse(raw).unwrap()
    }

    #[test]
    fn test_single_chapter_range() {
        let text = book(&[20]);
        let result = extract_with_status(&text, &range("Book.1.1-1.10"));
        assert_eq!(result.status, ExtractionStatus::Complete);
        assert_eq!(result.text.flatten(), chapter_verses(1, 10));
    }

    #[test]
    fn test_multi_chapter_range() {
        let text = book(&[10, 8, 12]);
        let result = extract_with_status(&text, &range("Book.1.9-3.2"));
        assert_eq!(result.status, ExtractionStatus::Complete);

        let ScriptureText::Chaptered(chapters) = &result.text else {
            panic!("expected chaptered text");
        };
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].first_verse, 9);
        assert_eq!(chapters[0].verses, vec!["1:9", "1:10"]);
        assert_eq!(chapters[1].verses.len(), 8);
        assert_eq!(chapters[2].verses, vec!["3:1", "3:2"]);
    }

    #[test]
    fn test_text_starting_mid_book() {
        // 数据源只返回第 6-7 章
        let text = ScriptureText::from_chapters(6, vec![chapter_verses(6, 22), chapter_verses(7, 24)]);
        let result = extract_with_status(&text, &range("Genesis.6.9-7.3"));
        assert_eq!(result.status, ExtractionStatus::Complete);
        let flat = result.text.flatten();
        assert_eq!(flat.first().unwrap(), "6:9");
        assert_eq!(flat.last().unwrap(), "7:3");
        assert_eq!(flat.len(), 14 + 3);
    }

    #[test]
    fn test_flat_text_is_returned_unchanged() {
        let text = ScriptureText::Flat(vec!["a".into(), "b".into()]);
        let result = extract_with_status(&text, &range("Book.1.5-1.6"));
        assert_eq!(result.text, text);
        assert_eq!(result.status, ExtractionStatus::Complete);
    }

    #[test]
    fn test_missing_chapters_return_partial_result() {
        let text = book(&[5, 5, 5]);
        let result = extract_with_status(&text, &range("Book.1.2-5.3"));
        assert_eq!(
            result.status,
            ExtractionStatus::Truncated {
                missing_chapters: 2,
                short_chapters: 0
            }
        );
        assert_eq!(result.text.verse_count(), 4 + 5 + 5);
    }

    #[test]
    fn test_short_end_chapter_is_truncated() {
        let text = book(&[5, 3]);
        let result = extract_with_status(&text, &range("Book.1.1-2.10"));
        assert_eq!(
            result.status,
            ExtractionStatus::Truncated {
                missing_chapters: 0,
                short_chapters: 1
            }
        );
        assert_eq!(result.text.verse_count(), 8);
    }

    #[test]
    fn test_empty_chapter_slice_is_dropped() {
        // 第 1 章只有 3 节，范围从第 5 节开始
        let text = book(&[3, 4]);
        let result = extract_with_status(&text, &range("Book.1.5-2.2"));
        let ScriptureText::Chaptered(chapters) = &result.text else {
            panic!("expected chaptered text");
        };
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].number, 2);
        assert!(result.status.is_degraded());
    }

    #[test]
    fn test_nothing_in_range_falls_back_to_original() {
        let text = book(&[3]);
        let result = extract_with_status(&text, &range("Book.4.1-5.2"));
        assert_eq!(result.status, ExtractionStatus::Unfiltered);
        assert_eq!(result.text, text);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let text = book(&[10, 8, 12, 6]);
        for raw in ["Book.1.9-3.2", "Book.2.1-2.8", "Book.1.1-4.6", "Book.3.5-3.5", "Book.2.4-6.1"] {
            let r = range(raw);
            let once = extract(&text, &r);
            let twice = extract(&once, &r);
            assert_eq!(once, twice, "{}", raw);
        }
    }

    #[test]
    fn test_extracted_count_bounded_by_spanned_chapters() {
        let lengths = [10u32, 8, 12, 6];
        let text = book(&lengths);
        for raw in ["Book.1.9-3.2", "Book.2.1-2.8", "Book.1.1-4.6", "Book.4.2-4.3"] {
            let r = range(raw);
            let spanned: u32 = (r.start_chapter..=r.end_chapter)
                .map(|c| lengths[c as usize - 1])
                .sum();
            assert!(extract(&text, &r).verse_count() <= spanned as usize, "{}", raw);
        }
    }
}
