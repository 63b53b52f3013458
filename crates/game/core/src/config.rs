use crate::stats::Stat;

/// Battle configuration constants and tunable parameters.
///
/// Passed by value into the engine at construction time. Nothing in the crate
/// reads global settings; every tunable lives here.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Number of unit slots per character party.
    pub units_per_party: usize,

    /// Maximum number of characters participating in one battle.
    /// A battle always requires at least [`Self::MIN_CHARACTERS`].
    pub characters_per_battle: usize,

    /// Level cap for persistent units.
    pub max_unit_level: u32,

    /// Number of skill slots each unit carries.
    pub max_skills_per_unit: usize,

    /// Share of dealt damage returned to a unit with the lifesteal flag.
    pub lifesteal_percent: u32,

    /// Display names used in narration.
    pub stat_names: StatNames,
}

impl BattleConfig {
    // ===== invariants =====
    pub const MIN_CHARACTERS: usize = 2;
    /// Nested effect chains (status applying status, ...) stop at this depth.
    pub const MAX_EFFECT_DEPTH: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_UNITS_PER_PARTY: usize = 3;
    pub const DEFAULT_CHARACTERS_PER_BATTLE: usize = 2;
    pub const DEFAULT_MAX_UNIT_LEVEL: u32 = 50;
    pub const DEFAULT_MAX_SKILLS_PER_UNIT: usize = 4;
    pub const DEFAULT_LIFESTEAL_PERCENT: u32 = 50;

    pub fn new() -> Self {
        Self {
            units_per_party: Self::DEFAULT_UNITS_PER_PARTY,
            characters_per_battle: Self::DEFAULT_CHARACTERS_PER_BATTLE,
            max_unit_level: Self::DEFAULT_MAX_UNIT_LEVEL,
            max_skills_per_unit: Self::DEFAULT_MAX_SKILLS_PER_UNIT,
            lifesteal_percent: Self::DEFAULT_LIFESTEAL_PERCENT,
            stat_names: StatNames::default(),
        }
    }

    pub fn with_units_per_party(mut self, units_per_party: usize) -> Self {
        self.units_per_party = units_per_party;
        self
    }

    pub fn with_characters_per_battle(mut self, characters_per_battle: usize) -> Self {
        self.characters_per_battle = characters_per_battle;
        self
    }

    pub fn with_max_unit_level(mut self, max_unit_level: u32) -> Self {
        self.max_unit_level = max_unit_level;
        self
    }

    pub fn with_max_skills_per_unit(mut self, max_skills_per_unit: usize) -> Self {
        self.max_skills_per_unit = max_skills_per_unit;
        self
    }

    /// Display name of a stat for narration.
    pub fn stat_name(&self, stat: Stat) -> &str {
        self.stat_names.get(stat)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-stat display names.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatNames {
    pub health: String,
    pub strength: String,
    pub fortitude: String,
    pub agility: String,
}

impl StatNames {
    pub fn get(&self, stat: Stat) -> &str {
        match stat {
            Stat::Health => &self.health,
            Stat::Strength => &self.strength,
            Stat::Fortitude => &self.fortitude,
            Stat::Agility => &self.agility,
        }
    }
}

impl Default for StatNames {
    fn default() -> Self {
        Self {
            health: Stat::Health.to_string(),
            strength: Stat::Strength.to_string(),
            fortitude: Stat::Fortitude.to_string(),
            agility: Stat::Agility.to_string(),
        }
    }
}
