//! 经文引用解析

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::reference_table::ReferenceTable;
use super::ParashaError;

/// 结构化经文范围（闭区间，章节和经节均从 1 开始）
///
/// 反序列化同样经过不变量校验
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawScriptureReference")]
pub struct ScriptureReference {
    pub book: String,
    pub start_chapter: u32,
    pub start_verse: u32,
    pub end_chapter: u32,
    pub end_verse: u32,
}

#[derive(Deserialize)]
struct RawScriptureReference {
    book: String,
    start_chapter: u32,
    start_verse: u32,
    end_chapter: u32,
    end_verse: u32,
}

impl TryFrom<RawScriptureReference> for ScriptureReference {
    type Error = ParashaError;

    fn try_from(raw: RawScriptureReference) -> Result<Self, Self::Error> {
        Self::new(
            raw.book,
            (raw.start_chapter, raw.start_verse),
            (raw.end_chapter, raw.end_verse),
        )
    }
}

impl ScriptureReference {
    /// 构造并校验不变量
    pub fn new(
        book: impl Into<String>,
        start: (u32, u32),
        end: (u32, u32),
    ) -> Result<Self, ParashaError> {
        let reference = Self {
            book: book.into(),
            start_chapter: start.0,
            start_verse: start.1,
            end_chapter: end.0,
            end_verse: end.1,
        };
        reference.validate()?;
        Ok(reference)
    }

    /// 解析 `Book.chapter.verse-chapter.verse`
    pub fn parse(reference: &str) -> Result<Self, ParashaError> {
        let (start, end) = reference
            .split_once('-')
            .ok_or_else(|| ParashaError::malformed(reference, "missing `-` separator"))?;

        let start_parts: Vec<&str> = start.split('.').collect();
        let &[book, start_chapter, start_verse] = start_parts.as_slice() else {
            return Err(ParashaError::malformed(
                reference,
                "start must be `Book.chapter.verse`",
            ));
        };
        if book.trim().is_empty() {
            return Err(ParashaError::malformed(reference, "empty book name"));
        }

        let (end_chapter, end_verse) = end
            .split_once('.')
            .ok_or_else(|| ParashaError::malformed(reference, "end must be `chapter.verse`"))?;

        Self::new(
            book.trim(),
            (
                parse_number(reference, start_chapter)?,
                parse_number(reference, start_verse)?,
            ),
            (
                parse_number(reference, end_chapter)?,
                parse_number(reference, end_verse)?,
            ),
        )
        .map_err(|e| match e {
            ParashaError::MalformedReference { reason, .. } => {
                ParashaError::malformed(reference, reason)
            }
            other => other,
        })
    }

    fn validate(&self) -> Result<(), ParashaError> {
        let display = self.to_string();
        if self.start_chapter == 0 || self.start_verse == 0 {
            return Err(ParashaError::malformed(&display, "chapters and verses start at 1"));
        }
        if self.end_chapter == 0 || self.end_verse == 0 {
            return Err(ParashaError::malformed(&display, "chapters and verses start at 1"));
        }
        if self.end_chapter < self.start_chapter {
            return Err(ParashaError::malformed(&display, "end chapter precedes start chapter"));
        }
        if self.start_chapter == self.end_chapter && self.end_verse < self.start_verse {
            return Err(ParashaError::malformed(&display, "end verse precedes start verse"));
        }
        Ok(())
    }

    /// 范围跨越的章数
    pub fn chapter_count(&self) -> u32 {
        self.end_chapter
            .saturating_sub(self.start_chapter)
            .saturating_add(1)
    }

    /// 从本范围起点到 `other` 终点的范围，两者须在同一卷
    pub fn through(&self, other: &ScriptureReference) -> Result<ScriptureReference, ParashaError> {
        if self.book != other.book {
            return Err(ParashaError::malformed(
                &format!("{}..{}", self.to_dotted(), other.to_dotted()),
                "ranges are in different books",
            ));
        }
        Self::new(
            self.book.clone(),
            (self.start_chapter, self.start_verse),
            (other.end_chapter, other.end_verse),
        )
    }

    /// 判断 (chapter, verse) 是否在范围内
    pub fn contains(&self, chapter: u32, verse: u32) -> bool {
        (self.start_chapter, self.start_verse) <= (chapter, verse)
            && (chapter, verse) <= (self.end_chapter, self.end_verse)
    }

    /// 机器格式：`Genesis.1.1-6.8`
    pub fn to_dotted(&self) -> String {
        format!(
            "{}.{}.{}-{}.{}",
            self.book, self.start_chapter, self.start_verse, self.end_chapter, self.end_verse
        )
    }

    /// 覆盖整章的引用：`Genesis.1-6`，单章时为 `Genesis.32`
    pub fn chapter_span(&self) -> String {
        if self.start_chapter == self.end_chapter {
            format!("{}.{}", self.book, self.start_chapter)
        } else {
            format!("{}.{}-{}", self.book, self.start_chapter, self.end_chapter)
        }
    }
}

/// 人类可读格式：`Genesis 1:1-6:8`
impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}-{}:{}",
            self.book, self.start_chapter, self.start_verse, self.end_chapter, self.end_verse
        )
    }
}

impl FromStr for ScriptureReference {
    type Err = ParashaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_number(reference: &str, raw: &str) -> Result<u32, ParashaError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ParashaError::malformed(reference, format!("`{}` is not a number", raw)))
}

/// 经文引用解析器
///
/// 只读静态表，不做网络或磁盘访问
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver {
    table: &'static ReferenceTable,
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        Self::new(ReferenceTable::standard())
    }
}

impl ReferenceResolver {
    pub fn new(table: &'static ReferenceTable) -> Self {
        Self { table }
    }

    /// parasha 名称 → 经文范围
    pub fn resolve(&self, portion_name: &str) -> Result<ScriptureReference, ParashaError> {
        let raw = self
            .table
            .lookup(portion_name)
            .ok_or_else(|| ParashaError::UnknownPortion(portion_name.trim().to_string()))?;
        ScriptureReference::parse(raw)
    }
}

/// 使用标准表解析（便捷方法）
pub fn resolve_portion(portion_name: &str) -> Result<ScriptureReference, ParashaError> {
    ReferenceResolver::default().resolve(portion_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parasha::PortionCycle;

    #[test]
    fn test_parse_reference() {
        let r = ScriptureReference::parse("Genesis.6.9-11.32").unwrap();
        assert_eq!(r.book, "Genesis");
        assert_eq!((r.start_chapter, r.start_verse), (6, 9));
        assert_eq!((r.end_chapter, r.end_verse), (11, 32));
        assert_eq!(r.to_string(), "Genesis 6:9-11:32");
        assert_eq!(r.to_dotted(), "Genesis.6.9-11.32");
        assert_eq!(r.chapter_span(), "Genesis.6-11");
        assert_eq!(r.chapter_count(), 6);
    }

    #[test]
    fn test_deserialize_validates_invariants() {
        let ok: ScriptureReference = serde_json::from_str(
            r#"{"book":"Genesis","start_chapter":6,"start_verse":9,"end_chapter":11,"end_verse":32}"#,
        )
        .unwrap();
        assert_eq!(ok.chapter_count(), 6);

        let reversed = serde_json::from_str::<ScriptureReference>(
            r#"{"book":"Genesis","start_chapter":11,"start_verse":1,"end_chapter":6,"end_verse":8}"#,
        );
        assert!(reversed.is_err());
    }

    #[test]
    fn test_chapter_count_saturates_on_hand_built_value() {
        let r = ScriptureReference {
            book: "Genesis".to_string(),
            start_chapter: 11,
            start_verse: 1,
            end_chapter: 6,
            end_verse: 8,
        };
        assert_eq!(r.chapter_count(), 1);
    }

    #[test]
    fn test_through_joins_adjacent_ranges() {
        let joined = resolve_portion("Matot")
            .unwrap()
            .through(&resolve_portion("Masei").unwrap())
            .unwrap();
        assert_eq!(joined.to_dotted(), "Numbers.30.2-36.13");

        let across = resolve_portion("Pekudei")
            .unwrap()
            .through(&resolve_portion("Vayikra").unwrap());
        assert!(matches!(across, Err(ParashaError::MalformedReference { .. })));
    }

    #[test]
    fn test_single_chapter_span() {
        let r = resolve_portion("Ha'azinu").unwrap();
        assert_eq!(r.chapter_span(), "Deuteronomy.32");
        assert_eq!(r.chapter_count(), 1);
    }

    #[test]
    fn test_every_catalog_name_resolves_in_order() {
        let resolver = ReferenceResolver::default();
        for name in PortionCycle::standard().iter() {
            let r = resolver.resolve(name).unwrap();
            assert!(
                (r.start_chapter, r.start_verse) <= (r.end_chapter, r.end_verse),
                "{} -> {}",
                name,
                r
            );
        }
    }

    #[test]
    fn test_resolve_curly_apostrophe() {
        let r = resolve_portion("Re\u{2019}eh").unwrap();
        assert_eq!(r.to_dotted(), "Deuteronomy.11.26-16.17");
    }

    #[test]
    fn test_unknown_portion() {
        assert_eq!(
            resolve_portion("Sukkot"),
            Err(ParashaError::UnknownPortion("Sukkot".to_string()))
        );
    }

    #[test]
    fn test_malformed_references() {
        for raw in [
            "Genesis 1:1-6:8",
            "Genesis.1.1",
            "Genesis.1-6.8",
            "Genesis.1.1-6",
            ".1.1-6.8",
            "Genesis.x.1-6.8",
            "Genesis.0.1-6.8",
            "Genesis.6.1-5.8",
            "Genesis.6.9-6.8",
        ] {
            assert!(
                matches!(
                    ScriptureReference::parse(raw),
                    Err(ParashaError::MalformedReference { .. })
                ),
                "{}",
                raw
            );
        }
    }

    #[test]
    fn test_malformed_table_entry_is_reported() {
        static BROKEN: [(&str, &str); 1] = [("Noach", "Genesis 6:9-11:32")];
        static TABLE: ReferenceTable = ReferenceTable::from_entries(&BROKEN);
        let resolver = ReferenceResolver::new(&TABLE);
        assert!(matches!(
            resolver.resolve("Noach"),
            Err(ParashaError::MalformedReference { .. })
        ));
    }

    #[test]
    fn test_contains() {
        let r = ScriptureReference::parse("Genesis.6.9-11.32").unwrap();
        assert!(r.contains(6, 9));
        assert!(r.contains(8, 1));
        assert!(r.contains(11, 32));
        assert!(!r.contains(6, 8));
        assert!(!r.contains(12, 1));
    }
}
