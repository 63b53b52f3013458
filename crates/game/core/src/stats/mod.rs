//! Stat system.
//!
//! ```text
//! [ Base (definition) ] + [ Growth × (level - 1) ]  -> StatBlock (persistent, per level)
//!      ↓
//! [ StatMultipliers ]                               -> effective stat (battle-ephemeral)
//! ```
//!
//! Only the first layer is derived from persistent data. Multipliers live on
//! the battle unit and are discarded with it.

pub mod modifiers;

pub use modifiers::StatMultipliers;

use core::ops::{Index, IndexMut};

use strum::IntoEnumIterator;

/// The four unit attributes.
///
/// - **Health**: maximum hit points
/// - **Strength**: offensive scaling
/// - **Fortitude**: scaling for guard and support skills
/// - **Agility**: turn order
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Stat {
    Health,
    Strength,
    Fortitude,
    Agility,
}

impl Stat {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stats that accept battle multipliers.
    ///
    /// Health is excluded; max HP is fixed for the duration of a battle.
    pub const fn accepts_multiplier(self) -> bool {
        !matches!(self, Stat::Health)
    }
}

/// One integer per [`Stat`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub health: i32,
    pub strength: i32,
    pub fortitude: i32,
    pub agility: i32,
}

impl StatBlock {
    pub const fn new(health: i32, strength: i32, fortitude: i32, agility: i32) -> Self {
        Self {
            health,
            strength,
            fortitude,
            agility,
        }
    }

    /// Stats at `level` given per-level growth: `base + growth × (level - 1)`.
    pub fn at_level(&self, growth: &StatBlock, level: u32) -> StatBlock {
        let steps = level.saturating_sub(1) as i32;
        let mut out = *self;
        for stat in Stat::iter() {
            out[stat] = self[stat].saturating_add(growth[stat].saturating_mul(steps));
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        Stat::iter().map(move |stat| (stat, self[stat]))
    }
}

impl Index<Stat> for StatBlock {
    type Output = i32;

    fn index(&self, stat: Stat) -> &i32 {
        match stat {
            Stat::Health => &self.health,
            Stat::Strength => &self.strength,
            Stat::Fortitude => &self.fortitude,
            Stat::Agility => &self.agility,
        }
    }
}

impl IndexMut<Stat> for StatBlock {
    fn index_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Health => &mut self.health,
            Stat::Strength => &mut self.strength,
            Stat::Fortitude => &mut self.fortitude,
            Stat::Agility => &mut self.agility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_uses_base_values() {
        let base = StatBlock::new(100, 12, 8, 20);
        let growth = StatBlock::new(10, 2, 1, 1);

        assert_eq!(base.at_level(&growth, 1), base);
    }

    #[test]
    fn growth_accumulates_per_level() {
        let base = StatBlock::new(100, 12, 8, 20);
        let growth = StatBlock::new(10, 2, 1, 0);

        let at_five = base.at_level(&growth, 5);
        // 4 level-ups
        assert_eq!(at_five, StatBlock::new(140, 20, 12, 20));
    }

    #[test]
    fn stat_names_parse_case_insensitively() {
        assert_eq!("agility".parse::<Stat>().unwrap(), Stat::Agility);
        assert_eq!(Stat::Fortitude.to_string(), "Fortitude");
    }
}
