//! 经文文本结构

use serde::{Deserialize, Serialize};

/// 一章经文
///
/// `first_verse` 是 `verses[0]` 的经节号，完整章节为 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: u32,
    pub first_verse: u32,
    pub verses: Vec<String>,
}

impl Chapter {
    /// 完整章节（从第 1 节开始）
    pub fn full(number: u32, verses: Vec<String>) -> Self {
        Self {
            number,
            first_verse: 1,
            verses,
        }
    }

    /// 最后一节的经节号，空章节或经节号溢出时返回 None
    pub fn last_verse(&self) -> Option<u32> {
        let extra = u32::try_from(self.verses.len().checked_sub(1)?).ok()?;
        self.first_verse.checked_add(extra)
    }

    /// (经节号, 内容) 迭代，经节号超出 u32 时截止
    pub fn numbered(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.verses.iter().enumerate().map_while(move |(i, v)| {
            let offset = u32::try_from(i).ok()?;
            Some((self.first_verse.checked_add(offset)?, v.as_str()))
        })
    }
}

/// 经文文本
///
/// - `Flat`: 已由数据源按范围过滤的经节序列
/// - `Chaptered`: 按章组织的经节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "content", rename_all = "lowercase")]
pub enum ScriptureText {
    Flat(Vec<String>),
    Chaptered(Vec<Chapter>),
}

impl ScriptureText {
    /// 从 "list of lists" 构造，章节号从 `first_chapter` 开始，每章从第 1 节开始
    pub fn from_chapters(first_chapter: u32, chapters: Vec<Vec<String>>) -> Self {
        ScriptureText::Chaptered(
            chapters
                .into_iter()
                .enumerate()
                .map(|(i, verses)| Chapter::full(first_chapter.saturating_add(i as u32), verses))
                .collect(),
        )
    }

    /// 经节总数
    pub fn verse_count(&self) -> usize {
        match self {
            ScriptureText::Flat(verses) => verses.len(),
            ScriptureText::Chaptered(chapters) => chapters.iter().map(|c| c.verses.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.verse_count() == 0
    }

    /// 按章节顺序展平为单一经节序列（章节边界丢失）
    pub fn flatten(&self) -> Vec<String> {
        match self {
            ScriptureText::Flat(verses) => verses.clone(),
            ScriptureText::Chaptered(chapters) => chapters
                .iter()
                .flat_map(|c| c.verses.iter().cloned())
                .collect(),
        }
    }

    /// 按章节顺序展平（消耗自身，避免克隆）
    pub fn into_flat(self) -> Vec<String> {
        match self {
            ScriptureText::Flat(verses) => verses,
            ScriptureText::Chaptered(chapters) => {
                chapters.into_iter().flat_map(|c| c.verses).collect()
            }
        }
    }
}

impl Default for ScriptureText {
    fn default() -> Self {
        ScriptureText::Flat(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verses(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_verse_numbers_near_u32_max_do_not_overflow() {
        let chapter = Chapter {
            number: 1,
            first_verse: u32::MAX - 1,
            verses: verses("v", 3),
        };
        assert_eq!(chapter.last_verse(), None);
        let numbers: Vec<u32> = chapter.numbered().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![u32::MAX - 1, u32::MAX]);

        let exact = Chapter {
            number: 1,
            first_verse: u32::MAX,
            verses: verses("v", 1),
        };
        assert_eq!(exact.last_verse(), Some(u32::MAX));
        assert_eq!(Chapter::full(1, Vec::new()).last_verse(), None);
    }

    #[test]
    fn test_from_chapters_numbers_sequentially() {
        let text = ScriptureText::from_chapters(6, vec![verses("a", 3), verses("b", 2)]);
        let ScriptureText::Chaptered(chapters) = &text else {
            panic!("expected chaptered text");
        };
        assert_eq!(chapters[0].number, 6);
        assert_eq!(chapters[1].number, 7);
        assert_eq!(chapters[1].first_verse, 1);
        assert_eq!(text.verse_count(), 5);
    }

    #[test]
    fn test_flatten_preserves_order() {
        let text = ScriptureText::from_chapters(1, vec![verses("a", 2), verses("b", 2)]);
        assert_eq!(text.flatten(), vec!["a1", "a2", "b1", "b2"]);
        assert_eq!(text.into_flat(), vec!["a1", "a2", "b1", "b2"]);
    }

    #[test]
    fn test_chapter_numbering() {
        let chapter = Chapter {
            number: 6,
            first_verse: 9,
            verses: verses("v", 3),
        };
        assert_eq!(chapter.last_verse(), Some(11));
        let numbered: Vec<u32> = chapter.numbered().map(|(n, _)| n).collect();
        assert_eq!(numbered, vec![9, 10, 11]);
        assert_eq!(Chapter::full(1, Vec::new()).last_verse(), None);
    }

    #[test]
    fn test_shapes_serialize_with_tag() {
        let flat = serde_json::to_value(ScriptureText::Flat(verses("v", 1))).unwrap();
        assert_eq!(flat["shape"], "flat");
        let chaptered = serde_json::to_value(ScriptureText::from_chapters(1, vec![])).unwrap();
        assert_eq!(chaptered["shape"], "chaptered");
    }
}
