//! Read-only catalog of authored battle content.
//!
//! The catalog provides skills, statuses and unit definitions to the engine.
//! Content is authored once (see the `battle-content` loaders) and never
//! mutated during a battle.
//!
//! - [`CatalogOracle`]: lookup interface consumed by the engine
//! - [`Catalog`]: in-memory implementation

mod skill;
mod status;
mod unit;

pub use skill::{Skill, SkillPriority};
pub use status::{Status, StatusHook, StatusType};
pub use unit::{LevelCurve, SkillUnlock, UnitDefinition};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BattleErrorKind, ErrorSeverity};

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a [`Skill`] in the catalog.
    SkillId,
    "skill"
);
catalog_id!(
    /// Identifier of a [`Status`] in the catalog.
    StatusId,
    "status"
);
catalog_id!(
    /// Identifier of a [`UnitDefinition`] in the catalog.
    DefinitionId,
    "unit"
);

/// Lookup interface for catalog content.
///
/// The engine only reads through this trait, so frontends can back it with
/// whatever storage they like.
pub trait CatalogOracle {
    fn skill(&self, id: SkillId) -> Option<&Skill>;

    fn status(&self, id: StatusId) -> Option<&Status>;

    fn unit_definition(&self, id: DefinitionId) -> Option<&Arc<UnitDefinition>>;
}

/// A catalog entry referenced somewhere but not defined.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{referenced_by} references missing {skill}")]
    MissingSkill {
        skill: SkillId,
        referenced_by: String,
    },

    #[error("{referenced_by} references missing {status}")]
    MissingStatus {
        status: StatusId,
        referenced_by: String,
    },

    #[error("missing unit definition {0}")]
    MissingDefinition(DefinitionId),
}

impl BattleErrorKind for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSkill { .. } => "CATALOG_MISSING_SKILL",
            Self::MissingStatus { .. } => "CATALOG_MISSING_STATUS",
            Self::MissingDefinition(_) => "CATALOG_MISSING_DEFINITION",
        }
    }
}

/// In-memory catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    skills: BTreeMap<SkillId, Skill>,
    statuses: BTreeMap<StatusId, Status>,
    definitions: BTreeMap<DefinitionId, Arc<UnitDefinition>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a skill, returning the entry it replaced.
    pub fn insert_skill(&mut self, skill: Skill) -> Option<Skill> {
        self.skills.insert(skill.id, skill)
    }

    /// Registers a status, returning the entry it replaced.
    pub fn insert_status(&mut self, status: Status) -> Option<Status> {
        self.statuses.insert(status.id, status)
    }

    /// Registers a unit definition, returning the entry it replaced.
    pub fn insert_definition(
        &mut self,
        definition: UnitDefinition,
    ) -> Option<Arc<UnitDefinition>> {
        self.definitions
            .insert(definition.id, Arc::new(definition))
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.insert_skill(skill);
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.insert_status(status);
        self
    }

    pub fn with_definition(mut self, definition: UnitDefinition) -> Self {
        self.insert_definition(definition);
        self
    }

    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }

    pub fn statuses(&self) -> impl Iterator<Item = &Status> {
        self.statuses.values()
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Arc<UnitDefinition>> {
        self.definitions.values()
    }

    /// Checks that every cross reference resolves.
    ///
    /// Skills and statuses may reference statuses through their effects;
    /// definitions reference the skills they unlock.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for skill in self.skills.values() {
            for status in skill.effects.iter().filter_map(|e| e.referenced_status()) {
                if !self.statuses.contains_key(&status) {
                    return Err(CatalogError::MissingStatus {
                        status,
                        referenced_by: format!("skill '{}'", skill.name),
                    });
                }
            }
        }

        for owner in self.statuses.values() {
            for status in owner.all_effects().filter_map(|e| e.referenced_status()) {
                if !self.statuses.contains_key(&status) {
                    return Err(CatalogError::MissingStatus {
                        status,
                        referenced_by: format!("status '{}'", owner.name),
                    });
                }
            }
        }

        for definition in self.definitions.values() {
            for unlock in &definition.skills {
                if !self.skills.contains_key(&unlock.skill) {
                    return Err(CatalogError::MissingSkill {
                        skill: unlock.skill,
                        referenced_by: format!("unit '{}'", definition.name),
                    });
                }
            }
        }

        Ok(())
    }
}

impl CatalogOracle for Catalog {
    fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills.get(&id)
    }

    fn status(&self, id: StatusId) -> Option<&Status> {
        self.statuses.get(&id)
    }

    fn unit_definition(&self, id: DefinitionId) -> Option<&Arc<UnitDefinition>> {
        self.definitions.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::effect::Effect;
    use crate::action::targeting::TargetType;
    use crate::stats::StatBlock;

    #[test]
    fn validate_accepts_resolved_references() {
        let catalog = Catalog::new()
            .with_status(Status::new(StatusId(1), "Poison", 3, StatusType::Debuff))
            .with_skill(
                Skill::new(SkillId(1), "Venom", TargetType::SINGLE_ENEMY)
                    .with_effect(Effect::apply_status(StatusId(1), 0)),
            )
            .with_definition(
                UnitDefinition::new(DefinitionId(1), "Slime", StatBlock::new(50, 5, 5, 5))
                    .with_skill_unlock(1, SkillId(1)),
            );

        assert_eq!(catalog.validate(), Ok(()));
    }

    #[test]
    fn validate_reports_missing_status() {
        let catalog = Catalog::new().with_skill(
            Skill::new(SkillId(1), "Venom", TargetType::SINGLE_ENEMY)
                .with_effect(Effect::apply_status(StatusId(9), 0)),
        );

        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::MissingStatus { status: StatusId(9), .. })
        ));
    }

    #[test]
    fn validate_reports_missing_unlocked_skill() {
        let catalog = Catalog::new().with_definition(
            UnitDefinition::new(DefinitionId(1), "Slime", StatBlock::new(50, 5, 5, 5))
                .with_skill_unlock(3, SkillId(4)),
        );

        let err = catalog.validate().unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_MISSING_SKILL");
        assert!(err.severity().is_fatal());
    }
}
