//! 经文引用表
//!
//! 每个 parasha 对应的标准经文范围，格式为 `Book.chapter.verse-chapter.verse`。
//! 表随程序发布，持久化缓存以 parasha 名称为 key，条目必须保持不变。

use super::cycle::{names_match, normalize_apostrophes, CYCLE_LENGTH};

/// (parasha 名称, 引用字符串)
pub const REFERENCE_ENTRIES: [(&str, &str); CYCLE_LENGTH] = [
    ("Bereshit", "Genesis.1.1-6.8"),
    ("Noach", "Genesis.6.9-11.32"),
    ("Lech-Lecha", "Genesis.12.1-17.27"),
    ("Vayera", "Genesis.18.1-22.24"),
    ("Chayei Sara", "Genesis.23.1-25.18"),
    ("Toldot", "Genesis.25.19-28.9"),
    ("Vayetzei", "Genesis.28.10-32.3"),
    ("Vayishlach", "Genesis.32.4-36.43"),
    ("Vayeshev", "Genesis.37.1-40.23"),
    ("Miketz", "Genesis.41.1-44.17"),
    ("Vayigash", "Genesis.44.18-47.27"),
    ("Vayechi", "Genesis.47.28-50.26"),
    ("Shemot", "Exodus.1.1-6.1"),
    ("Vaera", "Exodus.6.2-9.35"),
    ("Bo", "Exodus.10.1-13.16"),
    ("Beshalach", "Exodus.13.17-17.16"),
    ("Yitro", "Exodus.18.1-20.23"),
    ("Mishpatim", "Exodus.21.1-24.18"),
    ("Terumah", "Exodus.25.1-27.19"),
    ("Tetzaveh", "Exodus.27.20-30.10"),
    ("Ki Tisa", "Exodus.30.11-34.35"),
    ("Vayakhel", "Exodus.35.1-38.20"),
    ("Pekudei", "Exodus.38.21-40.38"),
    ("Vayikra", "Leviticus.1.1-5.26"),
    ("Tzav", "Leviticus.6.1-8.36"),
    ("Shmini", "Leviticus.9.1-11.47"),
    ("Tazria", "Leviticus.12.1-13.59"),
    ("Metzora", "Leviticus.14.1-15.33"),
    ("Achrei Mot", "Leviticus.16.1-18.30"),
    ("Kedoshim", "Leviticus.19.1-20.27"),
    ("Emor", "Leviticus.21.1-24.23"),
    ("Behar", "Leviticus.25.1-26.2"),
    ("Bechukotai", "Leviticus.26.3-27.34"),
    ("Bamidbar", "Numbers.1.1-4.20"),
    ("Nasso", "Numbers.4.21-7.89"),
    ("Beha'alotcha", "Numbers.8.1-12.16"),
    ("Sh'lach", "Numbers.13.1-15.41"),
    ("Korach", "Numbers.16.1-18.32"),
    ("Chukat", "Numbers.19.1-22.1"),
    ("Balak", "Numbers.22.2-25.9"),
    ("Pinchas", "Numbers.25.10-30.1"),
    ("Matot", "Numbers.30.2-32.42"),
    ("Masei", "Numbers.33.1-36.13"),
    ("Devarim", "Deuteronomy.1.1-3.22"),
    ("Vaetchanan", "Deuteronomy.3.23-7.11"),
    ("Eikev", "Deuteronomy.7.12-11.25"),
    ("Re'eh", "Deuteronomy.11.26-16.17"),
    ("Shoftim", "Deuteronomy.16.18-21.9"),
    ("Ki Teitzei", "Deuteronomy.21.10-25.19"),
    ("Ki Tavo", "Deuteronomy.26.1-29.8"),
    ("Nitzavim", "Deuteronomy.29.9-30.20"),
    ("Vayeilech", "Deuteronomy.31.1-31.30"),
    ("Ha'azinu", "Deuteronomy.32.1-32.52"),
    ("Vezot Haberakhah", "Deuteronomy.33.1-34.12"),
];

/// 引用表
#[derive(Debug, Clone, Copy)]
pub struct ReferenceTable {
    entries: &'static [(&'static str, &'static str)],
}

static STANDARD_TABLE: ReferenceTable = ReferenceTable {
    entries: &REFERENCE_ENTRIES,
};

impl ReferenceTable {
    /// 内置的 54 条标准引用
    pub fn standard() -> &'static ReferenceTable {
        &STANDARD_TABLE
    }

    /// 自定义表（测试或替换数据源时使用）
    pub const fn from_entries(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// 查找 parasha 的引用字符串
    pub fn lookup(&self, name: &str) -> Option<&'static str> {
        let normalized = normalize_apostrophes(name);
        self.entries
            .iter()
            .find(|(candidate, _)| names_match(candidate, &normalized))
            .map(|(_, reference)| *reference)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parasha::PortionCycle;

    #[test]
    fn test_table_follows_cycle_order() {
        let cycle = PortionCycle::standard();
        let table = ReferenceTable::standard();
        assert_eq!(table.len(), cycle.len());
        for (i, (name, _)) in table.entries().enumerate() {
            assert_eq!(name, cycle.name_at(i));
        }
    }

    #[test]
    fn test_lookup_normalizes_apostrophes() {
        let table = ReferenceTable::standard();
        assert_eq!(table.lookup("Sh\u{2019}lach"), Some("Numbers.13.1-15.41"));
        assert_eq!(table.lookup("Sh'lach"), Some("Numbers.13.1-15.41"));
        assert_eq!(table.lookup("Chanukah"), None);
    }
}
