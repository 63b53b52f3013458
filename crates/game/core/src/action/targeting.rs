//! Targeting: which units a skill touches.
//!
//! A skill declares a [`TargetType`]; the attack action carries an *anchor*
//! (the unit the player pointed at). [`resolve_targets`] turns both into the
//! concrete, ordered list of live units the effect chain runs against.
//!
//! Resolution is the union over every set component:
//!
//! | Component          | Contributes                                          |
//! |--------------------|------------------------------------------------------|
//! | `SELF`             | the user                                             |
//! | `SINGLE_ENEMY`     | the anchor                                           |
//! | `SINGLE_ALLY`      | the anchor                                           |
//! | `ADJACENT_ENEMIES` | the anchor and its live slot neighbors               |
//! | `ALL_ENEMIES`      | every live unit of every other character             |
//! | `PARTY_BUT_SELF`   | every live unit of the user's character but the user |
//!
//! An empty `TargetType` behaves like a single-unit skill on the anchor.

use std::collections::BTreeSet;

use bitflags::bitflags;

use crate::state::{BattleUnitId, Roster};

bitflags! {
    /// Set of targeting components declared by a skill.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct TargetType: u8 {
        const SELF             = 1 << 0;
        const SINGLE_ENEMY     = 1 << 1;
        const ADJACENT_ENEMIES = 1 << 2;
        const ALL_ENEMIES      = 1 << 3;
        const SINGLE_ALLY      = 1 << 4;
        const PARTY_BUT_SELF   = 1 << 5;

        const WHOLE_PARTY       = Self::SELF.bits() | Self::PARTY_BUT_SELF.bits();
        const EVERYONE_BUT_SELF = Self::ALL_ENEMIES.bits() | Self::PARTY_BUT_SELF.bits();
        const EVERYONE          = Self::SELF.bits()
            | Self::ALL_ENEMIES.bits()
            | Self::PARTY_BUT_SELF.bits();
    }
}

impl TargetType {
    const ENEMY_ANCHORED: Self = Self::SINGLE_ENEMY.union(Self::ADJACENT_ENEMIES);

    /// The skill needs the player to point at a unit.
    pub fn needs_anchor(self) -> bool {
        self.is_empty() || self.intersects(Self::ENEMY_ANCHORED | Self::SINGLE_ALLY)
    }

    /// The anchor must belong to another character.
    pub fn anchors_on_enemy(self) -> bool {
        self.intersects(Self::ENEMY_ANCHORED)
    }

    /// The anchor must belong to the user's character.
    pub fn anchors_on_ally(self) -> bool {
        !self.anchors_on_enemy() && self.contains(Self::SINGLE_ALLY)
    }

    pub fn targets_enemies(self) -> bool {
        self.intersects(Self::ENEMY_ANCHORED | Self::ALL_ENEMIES)
    }

    pub fn targets_allies(self) -> bool {
        self.intersects(Self::SINGLE_ALLY | Self::PARTY_BUT_SELF)
    }

    pub fn targets_self(self) -> bool {
        self.contains(Self::SELF)
    }
}

/// Whether `anchor` is an acceptable pointer for a skill of type `target`
/// used by `user`. The anchor must be alive.
pub fn is_valid_anchor(
    roster: &Roster,
    user: BattleUnitId,
    target: TargetType,
    anchor: BattleUnitId,
) -> bool {
    if !roster.is_alive(anchor) {
        return false;
    }
    if target.anchors_on_enemy() {
        !anchor.is_ally_of(user)
    } else if target.anchors_on_ally() {
        anchor.is_ally_of(user)
    } else {
        true
    }
}

/// Every live unit `user` could point a skill of type `target` at.
///
/// Skills that need no anchor return the user alone.
pub fn valid_anchors(roster: &Roster, user: BattleUnitId, target: TargetType) -> Vec<BattleUnitId> {
    if !target.needs_anchor() {
        return vec![user];
    }
    roster
        .living_ids()
        .into_iter()
        .filter(|&id| is_valid_anchor(roster, user, target, id))
        .collect()
}

/// The anchor itself while it lives, otherwise the first live unit of the
/// anchor's character.
fn retarget(roster: &Roster, anchor: BattleUnitId) -> Option<BattleUnitId> {
    if roster.is_alive(anchor) {
        return Some(anchor);
    }
    let replacement = roster
        .living_party(anchor.character)
        .next()
        .map(|unit| unit.id());
    if let Some(to) = replacement {
        tracing::debug!(from = %anchor, %to, "anchor defeated, retargeting");
    }
    replacement
}

/// Resolves the units a skill affects.
///
/// The result is in roster order, holds no duplicates and only live units.
/// An empty result means the action fizzles: its anchor and every unit of
/// the anchor's character are down.
pub fn resolve_targets(
    roster: &Roster,
    user: BattleUnitId,
    target: TargetType,
    anchor: BattleUnitId,
) -> Vec<BattleUnitId> {
    // BattleUnitId orders by (character, slot), which is roster order.
    let mut picked = BTreeSet::new();

    if target.needs_anchor() {
        let Some(anchor) = retarget(roster, anchor) else {
            return Vec::new();
        };

        if target.is_empty() || target.intersects(TargetType::SINGLE_ENEMY | TargetType::SINGLE_ALLY)
        {
            picked.insert(anchor);
        }

        if target.contains(TargetType::ADJACENT_ENEMIES) {
            picked.insert(anchor);
            if roster.living_party(anchor.character).count() > 1 {
                let neighbors = [anchor.slot.checked_sub(1), anchor.slot.checked_add(1)];
                for slot in neighbors.into_iter().flatten() {
                    let id = BattleUnitId::new(anchor.character, slot);
                    if roster.is_alive(id) {
                        picked.insert(id);
                    }
                }
            }
        }
    }

    if target.contains(TargetType::SELF) && roster.is_alive(user) {
        picked.insert(user);
    }

    if target.contains(TargetType::ALL_ENEMIES) {
        picked.extend(
            roster
                .living()
                .map(|unit| unit.id())
                .filter(|id| !id.is_ally_of(user)),
        );
    }

    if target.contains(TargetType::PARTY_BUT_SELF) {
        picked.extend(
            roster
                .living_party(user.character)
                .map(|unit| unit.id())
                .filter(|&id| id != user),
        );
    }

    picked.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{DefinitionId, UnitDefinition};
    use crate::config::BattleConfig;
    use crate::state::{BattleUnit, Unit};
    use crate::stats::StatBlock;

    fn roster(parties: &[usize]) -> Roster {
        let definition = Arc::new(UnitDefinition::new(
            DefinitionId(1),
            "Pawn",
            StatBlock::new(10, 1, 1, 1),
        ));
        let config = BattleConfig::default();
        let mut roster = Roster::new(parties.len(), 3);
        for (character, &size) in parties.iter().enumerate() {
            for slot in 0..size {
                roster.insert(BattleUnit::new(
                    BattleUnitId::new(character, slot),
                    Unit::new(definition.clone(), &config),
                ));
            }
        }
        roster
    }

    fn defeat(roster: &mut Roster, id: BattleUnitId) {
        roster.get_mut(id).unwrap().take_damage(i32::MAX);
    }

    const USER: BattleUnitId = BattleUnitId::new(0, 1);

    fn id(character: usize, slot: usize) -> BattleUnitId {
        BattleUnitId::new(character, slot)
    }

    #[test]
    fn composites_are_unions() {
        assert_eq!(
            TargetType::WHOLE_PARTY,
            TargetType::SELF | TargetType::PARTY_BUT_SELF
        );
        assert!(TargetType::EVERYONE.contains(TargetType::EVERYONE_BUT_SELF));
        assert!(!TargetType::EVERYONE_BUT_SELF.targets_self());
        assert!(!TargetType::EVERYONE.needs_anchor());
        assert!(TargetType::empty().needs_anchor());
    }

    #[test]
    fn self_resolves_to_user() {
        let roster = roster(&[3, 3]);
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::SELF, id(1, 0)),
            vec![USER]
        );
    }

    #[test]
    fn single_enemy_resolves_to_anchor() {
        let roster = roster(&[3, 3]);
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::SINGLE_ENEMY, id(1, 2)),
            vec![id(1, 2)]
        );
    }

    #[test]
    fn adjacent_takes_slot_neighbors() {
        let roster = roster(&[3, 3]);
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::ADJACENT_ENEMIES, id(1, 1)),
            vec![id(1, 0), id(1, 1), id(1, 2)]
        );
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::ADJACENT_ENEMIES, id(1, 0)),
            vec![id(1, 0), id(1, 1)]
        );
    }

    #[test]
    fn adjacent_skips_defeated_neighbors() {
        let mut roster = roster(&[3, 3]);
        defeat(&mut roster, id(1, 0));
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::ADJACENT_ENEMIES, id(1, 1)),
            vec![id(1, 1), id(1, 2)]
        );
    }

    #[test]
    fn adjacent_falls_back_to_single_with_one_survivor() {
        let mut roster = roster(&[3, 3]);
        defeat(&mut roster, id(1, 0));
        defeat(&mut roster, id(1, 2));
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::ADJACENT_ENEMIES, id(1, 1)),
            vec![id(1, 1)]
        );
    }

    #[test]
    fn all_enemies_spans_every_other_character() {
        let mut roster = roster(&[2, 2, 2]);
        defeat(&mut roster, id(2, 1));
        assert_eq!(
            resolve_targets(&roster, id(0, 0), TargetType::ALL_ENEMIES, id(0, 0)),
            vec![id(1, 0), id(1, 1), id(2, 0)]
        );
    }

    #[test]
    fn party_but_self_excludes_user_by_identity() {
        let roster = roster(&[3, 3]);
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::PARTY_BUT_SELF, USER),
            vec![id(0, 0), id(0, 2)]
        );
    }

    #[test]
    fn everyone_has_no_duplicates_and_no_defeated() {
        let mut roster = roster(&[3, 2]);
        defeat(&mut roster, id(1, 1));
        let targets = resolve_targets(&roster, USER, TargetType::EVERYONE, USER);
        assert_eq!(
            targets,
            vec![id(0, 0), id(0, 1), id(0, 2), id(1, 0)]
        );
    }

    #[test]
    fn every_named_target_type_resolves_in_roster_order() {
        use bitflags::Flags;

        let enemy = id(1, 1);
        let ally = id(0, 2);
        let cases = [
            (TargetType::SELF, enemy, vec![USER]),
            (TargetType::SINGLE_ENEMY, enemy, vec![enemy]),
            (
                TargetType::ADJACENT_ENEMIES,
                enemy,
                vec![id(1, 0), id(1, 1), id(1, 2)],
            ),
            (TargetType::ALL_ENEMIES, USER, vec![id(1, 0), id(1, 1), id(1, 2)]),
            (TargetType::SINGLE_ALLY, ally, vec![ally]),
            (TargetType::PARTY_BUT_SELF, USER, vec![id(0, 0), id(0, 2)]),
            (TargetType::WHOLE_PARTY, USER, vec![id(0, 0), USER, id(0, 2)]),
            (
                TargetType::EVERYONE_BUT_SELF,
                USER,
                vec![id(0, 0), id(0, 2), id(1, 0), id(1, 1), id(1, 2)],
            ),
            (
                TargetType::EVERYONE,
                USER,
                vec![id(0, 0), USER, id(0, 2), id(1, 0), id(1, 1), id(1, 2)],
            ),
        ];
        for flag in TargetType::FLAGS {
            assert!(
                cases.iter().any(|(target, ..)| target == flag.value()),
                "{} has no case",
                flag.name()
            );
        }

        let roster = roster(&[3, 3]);
        for (target, anchor, expected) in &cases {
            assert_eq!(
                &resolve_targets(&roster, USER, *target, *anchor),
                expected,
                "{target:?}"
            );
        }

        let mut roster = roster;
        defeat(&mut roster, id(1, 2));
        defeat(&mut roster, id(0, 0));
        for (target, anchor, _) in &cases {
            let resolved = resolve_targets(&roster, USER, *target, *anchor);
            assert!(resolved.windows(2).all(|pair| pair[0] < pair[1]), "{target:?}");
            assert!(resolved.iter().all(|&unit| roster.is_alive(unit)), "{target:?}");
            assert_eq!(resolved.contains(&USER), target.targets_self(), "{target:?}");
        }
    }

    #[test]
    fn self_plus_single_ally_on_self_is_deduplicated() {
        let roster = roster(&[3, 3]);
        let targets = resolve_targets(
            &roster,
            USER,
            TargetType::SELF | TargetType::SINGLE_ALLY,
            USER,
        );
        assert_eq!(targets, vec![USER]);
    }

    #[test]
    fn defeated_anchor_retargets_within_its_party() {
        let mut roster = roster(&[3, 3]);
        defeat(&mut roster, id(1, 0));
        assert_eq!(
            resolve_targets(&roster, USER, TargetType::SINGLE_ENEMY, id(1, 0)),
            vec![id(1, 1)]
        );
    }

    #[test]
    fn wiped_party_fizzles() {
        let mut roster = roster(&[3, 2]);
        defeat(&mut roster, id(1, 0));
        defeat(&mut roster, id(1, 1));
        assert!(
            resolve_targets(&roster, USER, TargetType::SELF | TargetType::SINGLE_ENEMY, id(1, 0))
                .is_empty()
        );
    }

    #[test]
    fn anchor_validation_respects_sides() {
        let roster = roster(&[3, 3]);
        assert!(is_valid_anchor(&roster, USER, TargetType::SINGLE_ENEMY, id(1, 0)));
        assert!(!is_valid_anchor(&roster, USER, TargetType::SINGLE_ENEMY, id(0, 0)));
        assert!(is_valid_anchor(&roster, USER, TargetType::SINGLE_ALLY, id(0, 0)));
        assert!(!is_valid_anchor(&roster, USER, TargetType::SINGLE_ALLY, id(1, 0)));
        assert_eq!(valid_anchors(&roster, USER, TargetType::SINGLE_ENEMY).len(), 3);
        assert_eq!(valid_anchors(&roster, USER, TargetType::ALL_ENEMIES), vec![USER]);
    }
}
