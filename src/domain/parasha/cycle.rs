//! 周读经文循环
//!
//! 年度读经周期固定为 54 个 parasha，按顺序循环。
//! 名称使用 Hebcal 的英文转写，比较前统一撇号字形。

use std::borrow::Cow;

use super::ParashaError;

/// 循环长度
pub const CYCLE_LENGTH: usize = 54;

/// 54 个 parasha 名称（按循环顺序）
pub const PORTION_NAMES: [&str; CYCLE_LENGTH] = [
    // Genesis
    "Bereshit",
    "Noach",
    "Lech-Lecha",
    "Vayera",
    "Chayei Sara",
    "Toldot",
    "Vayetzei",
    "Vayishlach",
    "Vayeshev",
    "Miketz",
    "Vayigash",
    "Vayechi",
    // Exodus
    "Shemot",
    "Vaera",
    "Bo",
    "Beshalach",
    "Yitro",
    "Mishpatim",
    "Terumah",
    "Tetzaveh",
    "Ki Tisa",
    "Vayakhel",
    "Pekudei",
    // Leviticus
    "Vayikra",
    "Tzav",
    "Shmini",
    "Tazria",
    "Metzora",
    "Achrei Mot",
    "Kedoshim",
    "Emor",
    "Behar",
    "Bechukotai",
    // Numbers
    "Bamidbar",
    "Nasso",
    "Beha'alotcha",
    "Sh'lach",
    "Korach",
    "Chukat",
    "Balak",
    "Pinchas",
    "Matot",
    "Masei",
    // Deuteronomy
    "Devarim",
    "Vaetchanan",
    "Eikev",
    "Re'eh",
    "Shoftim",
    "Ki Teitzei",
    "Ki Tavo",
    "Nitzavim",
    "Vayeilech",
    "Ha'azinu",
    "Vezot Haberakhah",
];

/// 规范撇号
pub const CANONICAL_APOSTROPHE: char = '\'';

/// 检查是否为撇号的变体字形
#[inline]
fn is_apostrophe_variant(ch: char) -> bool {
    matches!(
        ch,
        '\u{2019}' | '\u{2018}' | '\u{02BC}' | '\u{0060}' | '\u{00B4}' | '\u{05F3}' | '\u{2032}'
    )
}

/// 将所有撇号变体替换为规范撇号，并去除首尾空白
pub fn normalize_apostrophes(name: &str) -> Cow<'_, str> {
    let trimmed = name.trim();
    if trimmed.chars().any(is_apostrophe_variant) {
        Cow::Owned(
            trimmed
                .chars()
                .map(|c| {
                    if is_apostrophe_variant(c) {
                        CANONICAL_APOSTROPHE
                    } else {
                        c
                    }
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// 名称比较（撇号归一化后忽略 ASCII 大小写）
pub(crate) fn names_match(canonical: &str, normalized: &str) -> bool {
    canonical.eq_ignore_ascii_case(normalized)
}

/// Parasha 循环
///
/// 进程级不可变常量，可在任意线程并发读取
#[derive(Debug, Clone, Copy)]
pub struct PortionCycle {
    names: &'static [&'static str; CYCLE_LENGTH],
}

static STANDARD_CYCLE: PortionCycle = PortionCycle {
    names: &PORTION_NAMES,
};

impl PortionCycle {
    /// 标准 54 周循环
    pub fn standard() -> &'static PortionCycle {
        &STANDARD_CYCLE
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 名称 → 循环位置
    ///
    /// 名称不在目录中时返回 `UnknownPortion`，不做任何替换
    pub fn index_of(&self, name: &str) -> Result<usize, ParashaError> {
        let normalized = normalize_apostrophes(name);
        self.names
            .iter()
            .position(|candidate| names_match(candidate, &normalized))
            .ok_or_else(|| ParashaError::UnknownPortion(normalized.into_owned()))
    }

    /// 循环位置 → 名称（按 54 取模）
    pub fn name_at(&self, index: usize) -> &'static str {
        self.names[index % self.names.len()]
    }

    /// 识别合并诵读的双周名称，例如 `Vayakhel-Pekudei`
    ///
    /// 两部分都必须是目录中的名称，且第二部分紧跟第一部分。
    /// 返回两部分的循环位置。
    pub fn split_combined(&self, name: &str) -> Option<(usize, usize)> {
        let normalized = normalize_apostrophes(name);
        normalized
            .match_indices('-')
            .find_map(|(pos, _)| {
                let first = self.index_of(&normalized[..pos]).ok()?;
                let second = self.index_of(&normalized[pos + 1..]).ok()?;
                (second == first + 1).then_some((first, second))
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }
}
