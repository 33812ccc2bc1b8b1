//! Integration tests for the combat core: the side transform, the tick
//! loop, abilities and their modifiers, and trait interaction.

use std::sync::Arc;

use skirmish_core::{
    Battlefield, CombatSystem, ManualClock, SharedClock, TraitManager, Unit,
};
use skirmish_data::{
    AbilityDefinition, AbilityModifier, AbilityType, AreaPattern, ConditionKind,
    ScalingKind, UnitDefinition,
};
use skirmish_protocol::{BoardSide, CombatEventKind, PlayerId};

// =========================================================================
// Helpers
// =========================================================================

fn unit_def(name: &str, max_health: i32, attack_damage: i32) -> UnitDefinition {
    UnitDefinition {
        id: name.to_lowercase(),
        name: name.into(),
        cost: 1,
        max_health: vec![max_health],
        max_mana: vec![0],
        attack_damage: vec![attack_damage],
        ability_power: vec![],
        armor: vec![],
        magic_resist: vec![],
        attack_speed: vec![1.0],
        range: vec![1],
        traits: vec![],
        ability: None,
    }
}

fn caster_def(name: &str, max_mana: i32, ability: AbilityDefinition) -> UnitDefinition {
    let mut def = unit_def(name, 100, 10);
    def.max_mana = vec![max_mana];
    def.ability = Some(ability);
    def
}

fn damage_ability(value: i32, pattern: AreaPattern) -> AbilityDefinition {
    AbilityDefinition {
        name: "Test Bolt".into(),
        description: None,
        kind: AbilityType::Damage,
        pattern,
        values: vec![value],
        range: vec![3],
        modifiers: Vec::new(),
    }
}

fn unit_at(def: &UnitDefinition, owner: u64, x: i32, y: i32) -> Unit {
    let mut unit = Unit::from_definition(def, 1, Some(PlayerId(owner)));
    unit.set_position(x, y);
    unit
}

/// A caster with full mana, ready to cast on its first turn.
fn primed_caster(def: &UnitDefinition, owner: u64, x: i32, y: i32) -> Unit {
    let mut unit = unit_at(def, owner, x, y);
    unit.mana = unit.max_mana;
    unit
}

fn system(clock: &Arc<ManualClock>) -> CombatSystem {
    let shared: SharedClock = clock.clone();
    CombatSystem::new(TraitManager::new(), shared)
}

fn field<'a>(a: &'a mut [Unit], b: &'a mut [Unit]) -> Battlefield<'a> {
    Battlefield::new((PlayerId(1), a), (PlayerId(2), b))
}

// =========================================================================
// Combat side transform
// =========================================================================

#[test]
fn test_transform_maps_boards_to_disjoint_halves() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = unit_def("Unit", 100, 10);
    // Both back-center on their local boards.
    let mut a = vec![unit_at(&def, 1, 3, 3)];
    let mut b = vec![unit_at(&def, 2, 3, 3)];

    let mut f = field(&mut a, &mut b);
    let sides = combat.start_combat(&mut f);
    drop(f);

    assert_eq!(sides[0], (PlayerId(1), BoardSide::Top));
    assert_eq!(sides[1], (PlayerId(2), BoardSide::Bottom));

    // Top board rows invert: local back row 3 lands on arena edge 0.
    assert_eq!((a[0].x, a[0].y), (3, 0));
    // Bottom board offsets: local back row 3 lands on arena edge 7.
    assert_eq!((b[0].x, b[0].y), (3, 7));
}

#[test]
fn test_transform_is_ordered_by_player_id_not_argument_order() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = unit_def("Unit", 100, 10);
    let mut a = vec![unit_at(&def, 9, 0, 0)];
    let mut b = vec![unit_at(&def, 4, 0, 0)];

    // Arguments deliberately reversed; the smaller id still goes top.
    let mut f = Battlefield::new((PlayerId(9), &mut a), (PlayerId(4), &mut b));
    let sides = combat.start_combat(&mut f);

    assert_eq!(sides[0], (PlayerId(4), BoardSide::Top));
    assert_eq!(sides[1], (PlayerId(9), BoardSide::Bottom));
}

#[test]
fn test_positions_and_stats_restore_after_combat() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = unit_def("Unit", 100, 10);
    let mut a = vec![unit_at(&def, 1, 2, 1)];
    let mut b = vec![unit_at(&def, 2, 4, 2)];

    let mut f = field(&mut a, &mut b);
    combat.start_combat(&mut f);
    drop(f);

    assert_ne!((a[0].x, a[0].y), (2, 1));
    assert_ne!((b[0].x, b[0].y), (4, 2));

    // Rough the units up before restoring.
    a[0].take_damage(60);
    a[0].stun_ticks = 2;
    b[0].atk_buff = 1.5;

    let mut f = field(&mut a, &mut b);
    combat.end_combat(&mut f);
    drop(f);

    assert_eq!((a[0].x, a[0].y), (2, 1));
    assert_eq!((b[0].x, b[0].y), (4, 2));
    assert_eq!(a[0].current_health, 100);
    assert_eq!(a[0].stun_ticks, 0);
    assert_eq!(b[0].atk_buff, 1.0);
}

#[test]
fn test_trait_bonus_applies_in_combat_and_reverts_on_restore() {
    let clock = Arc::new(ManualClock::new());
    let shared: SharedClock = clock.clone();

    let mut traits = TraitManager::new();
    traits.register_effect("Iron Wall", |count, units| {
        if count >= 2 {
            for u in units.iter_mut() {
                if TraitManager::unit_has_trait(u, "iron_wall") {
                    u.max_health += 200;
                    u.current_health += 200;
                }
            }
        }
    });
    let combat = CombatSystem::new(traits, shared);

    let mut def_a = unit_def("Shieldman", 100, 10);
    def_a.traits = vec!["Iron Wall".into()];
    let mut def_b = unit_def("Towerman", 120, 8);
    def_b.traits = vec!["Iron Wall".into()];

    let mut a = vec![unit_at(&def_a, 1, 0, 0), unit_at(&def_b, 1, 1, 0)];
    let mut b = vec![unit_at(&unit_def("Enemy", 100, 10), 2, 0, 0)];

    let mut f = field(&mut a, &mut b);
    combat.start_combat(&mut f);
    drop(f);

    assert_eq!(a[0].max_health, 300);
    assert_eq!(a[0].current_health, 300);
    assert_eq!(a[1].max_health, 320);
    // The lone enemy gets nothing.
    assert_eq!(b[0].max_health, 100);

    let mut f = field(&mut a, &mut b);
    combat.end_combat(&mut f);
    drop(f);

    assert_eq!(a[0].max_health, 100);
    assert_eq!(a[0].current_health, 100);
    assert_eq!(a[1].max_health, 120);
}

// =========================================================================
// Tick loop
// =========================================================================

#[test]
fn test_strong_unit_eliminates_weak_unit() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let strong_def = unit_def("Strong", 200, 50);
    let weak_def = unit_def("Weak", 50, 10);
    let mut a = vec![unit_at(&strong_def, 1, 3, 3)];
    let mut b = vec![unit_at(&weak_def, 2, 3, 4)];

    let mut ended = false;
    let mut winner = None;
    for _ in 0..60 {
        let mut f = field(&mut a, &mut b);
        let outcome = combat.simulate_tick(&mut f);
        if outcome.ended {
            ended = true;
            winner = outcome.winner;
            break;
        }
        clock.advance(50);
    }

    assert!(ended, "combat should conclude");
    assert_eq!(winner, Some(PlayerId(1)));
    assert_eq!(b[0].current_health, 0);
    assert!(a[0].current_health > 0);
}

#[test]
fn test_attack_respects_cooldown_and_grants_mana() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut attacker_def = unit_def("Attacker", 1000, 10);
    attacker_def.max_mana = vec![100];
    let mut a = vec![unit_at(&attacker_def, 1, 3, 3)];
    let mut b = vec![unit_at(&unit_def("Dummy", 1000, 0), 2, 3, 4)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);
    assert_eq!(b[0].current_health, 990);
    assert_eq!(a[0].mana, 10);

    // Cooldown (1000 / 1.0 attack speed) has not elapsed.
    clock.advance(500);
    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);
    assert_eq!(b[0].current_health, 990);

    clock.advance(500);
    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);
    assert_eq!(b[0].current_health, 980);
    assert_eq!(a[0].mana, 20);
}

#[test]
fn test_attack_buffs_scale_damage_and_speed() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut a = vec![unit_at(&unit_def("Buffed", 1000, 20), 1, 3, 3)];
    a[0].atk_buff = 1.5;
    a[0].spd_buff = 2.0;
    let mut b = vec![unit_at(&unit_def("Dummy", 1000, 0), 2, 3, 4)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    // 20 × 1.5 = 30 damage.
    assert_eq!(b[0].current_health, 970);
    // Speed 1.0 × 2.0 → 500 ms cooldown.
    assert_eq!(a[0].next_attack_at, 500);
}

#[test]
fn test_stunned_unit_skips_and_recovers() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut a = vec![unit_at(&unit_def("Stunned", 1000, 50), 1, 3, 3)];
    a[0].stun_ticks = 2;
    let mut b = vec![unit_at(&unit_def("Dummy", 1000, 0), 2, 3, 4)];

    for expected_health in [1000, 1000, 950] {
        let mut f = field(&mut a, &mut b);
        combat.simulate_tick(&mut f);
        drop(f);
        assert_eq!(b[0].current_health, expected_health);
        clock.advance(1100);
    }
    assert_eq!(a[0].stun_ticks, 0);
}

#[test]
fn test_dead_units_take_no_turns_and_are_not_targeted() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut a = vec![unit_at(&unit_def("Alive", 100, 10), 1, 3, 3)];
    let dead_def = unit_def("Dead", 100, 100);
    let mut dead = unit_at(&dead_def, 2, 3, 4);
    dead.current_health = 0;
    let target = unit_at(&unit_def("Target", 50, 0), 2, 4, 4);
    let mut b = vec![dead, target];

    for _ in 0..10 {
        let mut f = field(&mut a, &mut b);
        combat.simulate_tick(&mut f);
        clock.advance(1100);
    }

    // The dead unit neither acted nor soaked attacks.
    assert_eq!(b[0].current_health, 0);
    assert!(b[1].current_health < 50, "living target should be attacked");
    assert_eq!(a[0].current_health, 100);
}

#[test]
fn test_mutual_wipe_reports_draw() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = unit_def("Gone", 100, 10);
    let mut a = vec![unit_at(&def, 1, 0, 0)];
    let mut b = vec![unit_at(&def, 2, 0, 7)];
    a[0].current_health = 0;
    b[0].current_health = 0;

    let mut f = field(&mut a, &mut b);
    let outcome = combat.simulate_tick(&mut f);
    assert!(outcome.ended);
    assert_eq!(outcome.winner, None);
}

#[test]
fn test_tick_emits_attack_and_death_events() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut a = vec![unit_at(&unit_def("Killer", 200, 50), 1, 3, 3)];
    let mut b = vec![unit_at(&unit_def("Victim", 40, 5), 2, 3, 4)];
    let victim_id = b[0].id;

    let mut f = field(&mut a, &mut b);
    let outcome = combat.simulate_tick(&mut f);

    let kinds: Vec<CombatEventKind> = outcome.events.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&CombatEventKind::Attack));
    assert!(kinds.contains(&CombatEventKind::Death));
    let death = outcome
        .events
        .iter()
        .find(|e| e.kind == CombatEventKind::Death)
        .unwrap();
    assert_eq!(death.target, victim_id);
}

// =========================================================================
// Abilities
// =========================================================================

#[test]
fn test_single_target_damage_cast_consumes_mana_and_turn() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = caster_def("Caster", 50, damage_ability(50, AreaPattern::Single));
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    let mut b = vec![unit_at(&unit_def("Target", 100, 0), 2, 3, 4)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(b[0].current_health, 50);
    assert_eq!(a[0].mana, 0, "mana resets after cast");
    assert_eq!(a[0].next_attack_at, 1000, "cast consumes the global cooldown");
    assert_eq!(a[0].active_ability.as_deref(), Some("Test Bolt"));
}

#[test]
fn test_surround_damage_hits_everything_in_radius() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = caster_def("Nova", 50, damage_ability(25, AreaPattern::Surround));
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    let mut b = vec![
        unit_at(&unit_def("E1", 100, 0), 2, 2, 2),
        unit_at(&unit_def("E2", 100, 0), 2, 3, 2),
        unit_at(&unit_def("E3", 100, 0), 2, 4, 4),
        unit_at(&unit_def("Far", 100, 0), 2, 3, 7),
    ];

    // Radius comes from the ability's range table (3 here), so the far
    // unit at distance 4 stays safe.
    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(b[0].current_health, 75);
    assert_eq!(b[1].current_health, 75);
    assert_eq!(b[2].current_health, 75);
    assert_eq!(b[3].current_health, 100);
}

#[test]
fn test_line_damage_only_hits_cells_along_the_line() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = caster_def("Lancer", 50, damage_ability(40, AreaPattern::Line));
    let mut a = vec![primed_caster(&def, 1, 3, 2)];
    let mut b = vec![
        unit_at(&unit_def("Near", 100, 0), 2, 3, 3),
        unit_at(&unit_def("Mid", 100, 0), 2, 3, 4),
        unit_at(&unit_def("Off", 100, 0), 2, 4, 3),
    ];

    // Nearest enemy is straight down; the line projects (3,3) (3,4)
    // (3,5). The diagonal bystander is untouched.
    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(b[0].current_health, 60);
    assert_eq!(b[1].current_health, 60);
    assert_eq!(b[2].current_health, 100);
}

#[test]
fn test_stun_ability_adds_ticks() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let stun = AbilityDefinition {
        name: "Bash".into(),
        description: None,
        kind: AbilityType::Stun,
        pattern: AreaPattern::Single,
        values: vec![3],
        range: vec![1],
        modifiers: Vec::new(),
    };
    let def = caster_def("Basher", 50, stun);
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    let mut b = vec![unit_at(&unit_def("Target", 100, 10), 2, 3, 4)];
    b[0].stun_ticks = 1;

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    // Stun stacks additively on what was already there. The target's
    // own pass this tick already consumed one (its turn was the stun
    // decrement), leaving 1 + 3 − 1.
    assert_eq!(b[0].stun_ticks, 3);
}

#[test]
fn test_heal_single_targets_most_wounded_ally() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let heal = AbilityDefinition {
        name: "Mend".into(),
        description: None,
        kind: AbilityType::Heal,
        pattern: AreaPattern::Single,
        values: vec![30],
        range: vec![0],
        modifiers: Vec::new(),
    };
    let def = caster_def("Cleric", 50, heal);
    let mut a = vec![
        primed_caster(&def, 1, 0, 0),
        unit_at(&unit_def("Hurt", 100, 10), 1, 1, 0),
        unit_at(&unit_def("Scratched", 100, 10), 1, 2, 0),
    ];
    a[1].current_health = 20;
    a[2].current_health = 80;
    let mut b = vec![unit_at(&unit_def("Enemy", 100, 0), 2, 6, 7)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(a[1].current_health, 50, "lowest-fraction ally is healed");
    assert_eq!(a[2].current_health, 80);
}

#[test]
fn test_heal_never_exceeds_max_health() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let heal = AbilityDefinition {
        name: "Mend".into(),
        description: None,
        kind: AbilityType::Heal,
        pattern: AreaPattern::Surround,
        values: vec![500],
        range: vec![2],
        modifiers: Vec::new(),
    };
    let def = caster_def("Cleric", 50, heal);
    let mut a = vec![
        primed_caster(&def, 1, 0, 0),
        unit_at(&unit_def("Hurt", 100, 10), 1, 1, 0),
    ];
    a[1].current_health = 60;
    let mut b = vec![unit_at(&unit_def("Enemy", 100, 0), 2, 6, 7)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(a[1].current_health, 100);
    assert_eq!(a[0].current_health, 100);
}

#[test]
fn test_buff_casts_compound_multiplicatively() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let buff = AbilityDefinition {
        name: "Roar".into(),
        description: None,
        kind: AbilityType::BuffAtk,
        pattern: AreaPattern::Surround,
        values: vec![20],
        range: vec![0],
        modifiers: Vec::new(),
    };
    let def = caster_def("Crier", 50, buff);
    let mut a = vec![
        primed_caster(&def, 1, 0, 0),
        unit_at(&unit_def("Ally", 100, 10), 1, 1, 0),
    ];
    let mut b = vec![unit_at(&unit_def("Enemy", 1000, 0), 2, 6, 7)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);
    assert!((a[1].atk_buff - 1.2).abs() < 1e-5);

    // Refill mana and cast again: the multiplier compounds on the
    // already-buffed value rather than resetting to a base.
    a[0].mana = a[0].max_mana;
    clock.advance(1100);
    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);
    assert!((a[1].atk_buff - 1.44).abs() < 1e-5);
}

#[test]
fn test_cast_without_target_still_burns_the_window() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let def = caster_def("Caster", 50, damage_ability(50, AreaPattern::Single));
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    let dead_def = unit_def("Dead", 100, 0);
    let mut dead = unit_at(&dead_def, 2, 3, 4);
    dead.current_health = 0;
    let mut b = vec![dead];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    // No living enemy: the ability fizzles, but the caller had already
    // committed the cast — mana is gone and the cooldown is running.
    assert_eq!(a[0].mana, 0);
    assert_eq!(a[0].next_attack_at, 1000);
}

// =========================================================================
// Ability modifiers
// =========================================================================

#[test]
fn test_unmet_condition_aborts_with_no_side_effects() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut ability = damage_ability(50, AreaPattern::Single);
    ability.modifiers = vec![AbilityModifier::Conditional {
        condition_type: ConditionKind::TargetHpBelow,
        threshold: 0.5,
    }];
    let def = caster_def("Finisher", 50, ability);
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    let mut b = vec![unit_at(&unit_def("Healthy", 100, 0), 2, 3, 4)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(b[0].current_health, 100, "condition unmet, no damage");

    // Wound the target below the threshold and recast.
    b[0].current_health = 40;
    a[0].mana = a[0].max_mana;
    clock.advance(1100);
    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(b[0].current_health, 0, "condition met, damage lands");
}

#[test]
fn test_scaling_with_caster_missing_hp() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut ability = damage_ability(50, AreaPattern::Single);
    ability.modifiers = vec![AbilityModifier::Scaling {
        scaling_type: ScalingKind::CasterMissingHp,
        factor: vec![1.0],
    }];
    let def = caster_def("Berserk", 50, ability);
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    a[0].current_health = 50; // 50% missing → ×1.5
    let mut b = vec![unit_at(&unit_def("Target", 200, 0), 2, 3, 4)];

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(b[0].current_health, 125);
}

#[test]
fn test_execute_bonus_below_threshold() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut ability = damage_ability(40, AreaPattern::Single);
    ability.modifiers = vec![AbilityModifier::Execute {
        hp_threshold: vec![0.25],
        bonus_multiplier: vec![0.5],
    }];
    let def = caster_def("Executioner", 50, ability);
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    let mut b = vec![unit_at(&unit_def("Target", 100, 0), 2, 3, 4)];
    b[0].current_health = 20; // 20% ≤ 25% threshold

    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);

    // 40 base + 40 × 0.5 execute bonus.
    assert_eq!(b[0].current_health, 0);

    // Above the threshold the bonus stays off.
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    let mut b = vec![unit_at(&unit_def("Target", 100, 0), 2, 3, 4)];
    let mut f = field(&mut a, &mut b);
    combat.simulate_tick(&mut f);
    drop(f);
    assert_eq!(b[0].current_health, 60);
}

#[test]
fn test_lifesteal_heals_caster_and_reports_negative_amount() {
    let clock = Arc::new(ManualClock::new());
    let combat = system(&clock);

    let mut ability = damage_ability(100, AreaPattern::Single);
    ability.modifiers = vec![AbilityModifier::Lifesteal {
        lifesteal_percent: 0.5,
    }];
    let mut def = caster_def("Leech", 50, ability);
    def.max_health = vec![200];
    let mut a = vec![primed_caster(&def, 1, 3, 3)];
    a[0].current_health = 100;
    let mut b = vec![unit_at(&unit_def("Prey", 300, 0), 2, 3, 4)];

    let mut f = field(&mut a, &mut b);
    let outcome = combat.simulate_tick(&mut f);
    drop(f);

    assert_eq!(b[0].current_health, 200);
    assert_eq!(a[0].current_health, 150);

    let heal = outcome
        .events
        .iter()
        .find(|e| e.kind == CombatEventKind::Heal)
        .expect("lifesteal should report a heal event");
    assert_eq!(heal.amount, -50);
    assert_eq!(heal.source, heal.target);
}
