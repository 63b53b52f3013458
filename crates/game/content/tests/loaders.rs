use battle_content::{CatalogLoader, ConfigLoader, PartyLoader};
use battle_core::action::execute::{EffectContext, expire_statuses, gain_status};
use battle_core::{
    Battle, BattleConfig, BattleUnit, BattleUnitId, CatalogOracle, DefinitionId, Effect, EventLog,
    FirstReadySkillPlanner, Progress, Roster, SkillId, SkillPriority, StatusId, TargetType,
    TriggeredEffects, Unit,
};

#[test]
fn bundled_catalog_parses() {
    let catalog = CatalogLoader::bundled().unwrap();

    assert_eq!(catalog.skills().count(), 10);
    assert_eq!(catalog.statuses().count(), 7);
    assert_eq!(catalog.definitions().count(), 5);

    let sweep = catalog.skill(SkillId(2)).unwrap();
    assert_eq!(sweep.target, TargetType::ADJACENT_ENEMIES);
    assert_eq!(sweep.turn_timer, 2);

    let bash = catalog.skill(SkillId(4)).unwrap();
    assert_eq!(bash.priority, SkillPriority::AlwaysFirst);
    assert_eq!(bash.effects[1], Effect::apply_status(StatusId(2), 0));

    let stunned = catalog.status(StatusId(2)).unwrap();
    assert_eq!(stunned.on_apply, vec![Effect::enable(TriggeredEffects::STUN)]);
    assert_eq!(stunned.on_clear, vec![Effect::disable(TriggeredEffects::STUN)]);

    let berserker = catalog.unit_definition(DefinitionId(4)).unwrap();
    assert_eq!(berserker.curve.linear, 12);
}

#[test]
fn bundled_stun_outlasts_the_turn_it_lands() {
    let catalog = CatalogLoader::bundled().unwrap();
    let config = BattleConfig::default();
    let unit = |id| Unit::new(catalog.unit_definition(DefinitionId(id)).cloned().unwrap(), &config);
    let knight = BattleUnitId::new(0, 0);
    let rogue = BattleUnitId::new(1, 0);
    let mut roster = Roster::new(2, config.units_per_party);
    roster.insert(BattleUnit::new(knight, unit(1)));
    roster.insert(BattleUnit::new(rogue, unit(2)));
    let mut log = EventLog::new();

    // Landed after the rogue acted: the first turn end must not lift it.
    {
        let mut ctx = EffectContext::new(&mut roster, &catalog, &config, &mut log);
        gain_status(&mut ctx, rogue, StatusId(2), None, knight).unwrap();
        expire_statuses(&mut ctx, rogue);
    }
    assert!(roster.get(rogue).unwrap().has_triggered(TriggeredEffects::STUN));

    {
        let mut ctx = EffectContext::new(&mut roster, &catalog, &config, &mut log);
        expire_statuses(&mut ctx, rogue);
    }
    let rogue = roster.get(rogue).unwrap();
    assert!(rogue.statuses().is_empty());
    assert!(!rogue.has_triggered(TriggeredEffects::STUN));
}

#[test]
fn composite_targets_parse_from_flag_names() {
    let catalog = CatalogLoader::parse(
        r#"(
            skills: [
                (id: 1, name: "Nova", target: "SELF | ALL_ENEMIES", effects: []),
            ],
        )"#,
    )
    .unwrap();

    assert_eq!(
        catalog.skill(SkillId(1)).unwrap().target,
        TargetType::SELF | TargetType::ALL_ENEMIES
    );
}

#[test]
fn dangling_status_reference_is_rejected() {
    let error = CatalogLoader::parse(
        r#"(
            skills: [
                (
                    id: 1,
                    name: "Curse",
                    target: "SINGLE_ENEMY",
                    effects: [(kind: ApplyStatus((status: 9)), value: 0)],
                ),
            ],
        )"#,
    )
    .unwrap_err();

    assert!(error.to_string().contains("status#9"), "{error}");
}

#[test]
fn duplicate_ids_are_rejected() {
    let error = CatalogLoader::parse(
        r#"(
            statuses: [
                (id: 1, name: "A", duration: 1),
                (id: 1, name: "B", duration: 1),
            ],
        )"#,
    )
    .unwrap_err();

    assert!(error.to_string().contains("Duplicate status#1"), "{error}");
}

#[test]
fn malformed_ron_is_a_parse_error() {
    let error = CatalogLoader::parse("(skills: [").unwrap_err();
    assert!(error.to_string().starts_with("Failed to parse catalog RON"));
}

#[test]
fn bundled_config_overrides_names_only() {
    let config = ConfigLoader::bundled().unwrap();

    assert_eq!(config.units_per_party, BattleConfig::DEFAULT_UNITS_PER_PARTY);
    assert_eq!(config.lifesteal_percent, BattleConfig::DEFAULT_LIFESTEAL_PERCENT);
    assert_eq!(config.stat_names.health, "HP");
}

#[test]
fn partial_config_falls_back_to_defaults() {
    let config = ConfigLoader::parse("units_per_party = 5\n").unwrap();

    assert_eq!(config.units_per_party, 5);
    assert_eq!(config.max_unit_level, BattleConfig::DEFAULT_MAX_UNIT_LEVEL);
    assert_eq!(config.stat_names.agility, "Agility");
}

#[test]
fn config_needs_two_characters() {
    assert!(ConfigLoader::parse("characters_per_battle = 1\n").is_err());
    assert!(ConfigLoader::parse("units_per_party = 0\n").is_err());
}

#[test]
fn bundled_parties_build_leveled_units() {
    let catalog = CatalogLoader::bundled().unwrap();
    let config = ConfigLoader::bundled().unwrap();
    let parties = PartyLoader::bundled().unwrap();
    assert_eq!(parties.len(), 2);

    let vanguard = parties[0].build(&catalog, &config).unwrap();
    assert_eq!(vanguard.icon.as_deref(), Some("shield"));
    let knight = vanguard.units().next().unwrap();
    assert_eq!(knight.level(), 5);
    let known: Vec<_> = knight.skills().iter().filter_map(|slot| slot.skill).collect();
    assert_eq!(known, vec![SkillId(4), SkillId(1), SkillId(5), SkillId(7)]);

    let coven = parties[1].build(&catalog, &config).unwrap();
    assert_eq!(coven.party().len(), 3);
    assert!(coven.party()[1].is_none());
    assert_eq!(coven.units().nth(1).unwrap().name(), "Grask");
}

#[test]
fn party_with_unknown_definition_fails() {
    let catalog = CatalogLoader::bundled().unwrap();
    let parties = PartyLoader::parse(
        r#"(parties: [(name: "Ghosts", units: [Some((definition: 99))])])"#,
    )
    .unwrap();

    let error = parties[0]
        .build(&catalog, &BattleConfig::default())
        .unwrap_err();
    assert!(error.to_string().contains("Ghosts"), "{error}");
}

#[test]
fn bundled_content_plays_to_the_end() {
    let catalog = CatalogLoader::bundled().unwrap();
    let config = ConfigLoader::bundled().unwrap();
    let mut builder = Battle::builder(&catalog, config.clone());
    for party in PartyLoader::bundled().unwrap() {
        builder = builder.planned(party.build(&catalog, &config).unwrap(), FirstReadySkillPlanner);
    }
    let mut battle = builder.build();
    let mut log = EventLog::new();

    let mut finished = None;
    for _ in 0..5_000 {
        if let Progress::Finished(outcome) = battle.advance(&mut log).unwrap() {
            finished = Some(outcome);
            break;
        }
    }

    let outcome = finished.expect("battle finishes");
    assert!(outcome.turns > 1);
    assert!(log.lines().iter().any(|line| line.contains("uses Shield Bash")));
}
