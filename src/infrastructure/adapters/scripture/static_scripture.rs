//! Static Scripture - 用于测试和离线运行的经文源
//!
//! 按引用合成整章文本（每节内容为 `Book chapter:verse`），不调用外部服务

use async_trait::async_trait;
use std::collections::HashSet;

use crate::application::ports::{ScriptureError, ScripturePassage, ScripturePort};
use crate::domain::{resolve_portion, ScriptureReference, ScriptureText};

/// Static Scripture
#[derive(Debug, Clone)]
pub struct StaticScripture {
    /// 每章合成的经节数
    verses_per_chapter: u32,
    /// 获取失败的引用
    failing: HashSet<ScriptureReference>,
}

impl StaticScripture {
    /// 每章 verses_per_chapter 节的合成文本
    pub fn synthetic(verses_per_chapter: u32) -> Self {
        Self {
            verses_per_chapter,
            failing: HashSet::new(),
        }
    }

    /// 指定 parasha 的获取返回 NotFound
    ///
    /// 未知名称被忽略
    pub fn failing_for(mut self, portion_name: &str) -> Self {
        if let Ok(reference) = resolve_portion(portion_name) {
            self.failing.insert(reference);
        }
        self
    }
}

#[async_trait]
impl ScripturePort for StaticScripture {
    async fn fetch_text(
        &self,
        reference: &ScriptureReference,
    ) -> Result<ScripturePassage, ScriptureError> {
        if self.failing.contains(reference) {
            return Err(ScriptureError::NotFound(reference.to_dotted()));
        }

        let chapters = (reference.start_chapter..=reference.end_chapter)
            .map(|chapter| {
                (1..=self.verses_per_chapter)
                    .map(|verse| format!("{} {}:{}", reference.book, chapter, verse))
                    .collect()
            })
            .collect();

        Ok(ScripturePassage {
            text: ScriptureText::from_chapters(reference.start_chapter, chapters),
            version: Some("Synthetic".to_string()),
            source_url: None,
        })
    }
}
