use super::{DefinitionId, SkillId};
use crate::stats::StatBlock;

/// Experience curve: `exp_to_next(level) = floor(level ^ exponent) + linear × level`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelCurve {
    pub exponent: f64,
    pub linear: u32,
}

impl LevelCurve {
    pub const DEFAULT_EXPONENT: f64 = 2.1;
    pub const DEFAULT_LINEAR: u32 = 10;

    pub const fn new(exponent: f64, linear: u32) -> Self {
        Self { exponent, linear }
    }

    /// Experience needed to go from `level` to `level + 1`.
    pub fn exp_to_next(&self, level: u32) -> u64 {
        let curved = f64::from(level).powf(self.exponent).floor() as u64;
        curved + u64::from(self.linear) * u64::from(level)
    }

    /// Total experience needed to reach `level` from level 1.
    pub fn total_exp_for(&self, level: u32) -> u64 {
        (1..level).map(|l| self.exp_to_next(l)).sum()
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXPONENT, Self::DEFAULT_LINEAR)
    }
}

/// A skill granted once a unit reaches `level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillUnlock {
    pub level: u32,
    pub skill: SkillId,
}

/// Authored template of a unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDefinition {
    pub id: DefinitionId,
    pub name: String,

    /// Stats at level 1.
    pub base_stats: StatBlock,

    /// Stats gained per level after the first.
    #[cfg_attr(feature = "serde", serde(default))]
    pub growth: StatBlock,

    #[cfg_attr(feature = "serde", serde(default))]
    pub curve: LevelCurve,

    /// Skills unlocked by level, in authoring order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<SkillUnlock>,
}

impl UnitDefinition {
    pub fn new(id: DefinitionId, name: impl Into<String>, base_stats: StatBlock) -> Self {
        Self {
            id,
            name: name.into(),
            base_stats,
            growth: StatBlock::default(),
            curve: LevelCurve::default(),
            skills: Vec::new(),
        }
    }

    pub fn with_growth(mut self, growth: StatBlock) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_curve(mut self, curve: LevelCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_skill_unlock(mut self, level: u32, skill: SkillId) -> Self {
        self.skills.push(SkillUnlock { level, skill });
        self
    }

    /// Stats at the given level.
    pub fn stats_at(&self, level: u32) -> StatBlock {
        self.base_stats.at_level(&self.growth, level)
    }

    /// Skills unlocked at or below `level`.
    pub fn skills_up_to(&self, level: u32) -> impl Iterator<Item = SkillId> + '_ {
        self.skills
            .iter()
            .filter(move |unlock| unlock.level <= level)
            .map(|unlock| unlock.skill)
    }

    /// Skills unlocked exactly at `level`.
    pub fn skills_at(&self, level: u32) -> impl Iterator<Item = SkillId> + '_ {
        self.skills
            .iter()
            .filter(move |unlock| unlock.level == level)
            .map(|unlock| unlock.skill)
    }
}
