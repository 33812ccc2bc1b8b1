//! Ability resolution.
//!
//! The caster resolves a unit's ability against the battlefield:
//! per-star base value, the modifier pipeline (conditional gate →
//! scaling → execute bonus → lifesteal), and the area pattern. Effects
//! are reported through a callback as `(source, name, target, amount)`
//! with negative amounts denoting healing.

use skirmish_data::{
    AbilityDefinition, AbilityModifier, AbilityType, AreaPattern, ConditionKind,
    ScalingKind,
};
use skirmish_protocol::UnitId;

use crate::{Battlefield, TargetSelector, Unit, UnitHandle};

/// Observer for individual ability effects.
pub type EffectCallback<'a> = dyn FnMut(UnitId, &str, UnitId, i32) + 'a;

/// Resolves abilities. Stateless — all inputs come from the battlefield
/// and the ability definition.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbilityCaster;

impl AbilityCaster {
    /// Casts `source`'s ability, if it has one.
    ///
    /// The source's active-ability marker is set as soon as a definition
    /// exists, even if the cast then fizzles (no target, unmet
    /// condition) — the caller has already committed the cast turn.
    pub fn cast(
        &self,
        field: &mut Battlefield<'_>,
        source: UnitHandle,
        selector: &dyn TargetSelector,
        on_effect: &mut EffectCallback<'_>,
    ) {
        let Some(ability) = field.unit(source).ability.clone() else {
            return;
        };

        field.unit_mut(source).active_ability = Some(ability.name.clone());

        let star = field.unit(source).star_level;
        let value = ability.value_for_star(star);

        match ability.kind {
            AbilityType::Damage => {
                self.cast_damage(field, source, selector, &ability, value, on_effect);
            }
            AbilityType::Stun => {
                self.cast_stun(field, source, selector, &ability, value);
            }
            AbilityType::Heal => {
                self.cast_heal(field, source, &ability, value, on_effect);
            }
            AbilityType::BuffAtk => {
                apply_to_living_allies(field, source, |u| {
                    u.atk_buff *= 1.0 + value as f32 / 100.0;
                });
            }
            AbilityType::BuffSpd => {
                apply_to_living_allies(field, source, |u| {
                    u.spd_buff *= 1.0 + value as f32 / 100.0;
                });
            }
        }
    }

    fn cast_damage(
        &self,
        field: &mut Battlefield<'_>,
        source: UnitHandle,
        selector: &dyn TargetSelector,
        ability: &AbilityDefinition,
        base_value: i32,
        on_effect: &mut EffectCallback<'_>,
    ) {
        let Some(target) = selector.find_target(field, source) else {
            return;
        };

        // The conditional gate runs before anything else so an unmet
        // condition has zero side effects.
        if !conditions_met(ability, field.unit(source), field.unit(target)) {
            return;
        }

        let star = field.unit(source).star_level;
        let mut scaled = base_value as f32;
        for modifier in &ability.modifiers {
            if let AbilityModifier::Scaling {
                scaling_type,
                factor,
            } = modifier
            {
                let f = AbilityModifier::star_factor(factor, star);
                scaled *= scaling_multiplier(
                    *scaling_type,
                    f,
                    field.unit(source),
                    field.unit(target),
                );
            }
        }
        let scaled = scaled as i32;

        // Execute bonus is judged against the selected target and then
        // applied uniformly to every unit in the area.
        let mut final_damage = scaled;
        for modifier in &ability.modifiers {
            if let AbilityModifier::Execute {
                hp_threshold,
                bonus_multiplier,
            } = modifier
            {
                final_damage += execute_bonus(
                    field.unit(target),
                    scaled,
                    AbilityModifier::star_factor(hp_threshold, star),
                    AbilityModifier::star_factor(bonus_multiplier, star),
                );
            }
        }

        let (source_id, source_name) = {
            let s = field.unit(source);
            (s.id, s.name.clone())
        };

        let mut total_dealt: i64 = 0;
        for handle in area_enemy_targets(field, source, target, ability, star) {
            let victim = field.unit_mut(handle);
            victim.take_damage(final_damage);
            total_dealt += final_damage as i64;
            on_effect(source_id, &source_name, victim.id, final_damage);
        }

        for modifier in &ability.modifiers {
            if let AbilityModifier::Lifesteal { lifesteal_percent } = modifier {
                let heal = (total_dealt as f32 * lifesteal_percent) as i32;
                if heal > 0 {
                    field.unit_mut(source).heal(heal);
                    on_effect(source_id, &source_name, source_id, -heal);
                }
            }
        }
    }

    fn cast_stun(
        &self,
        field: &mut Battlefield<'_>,
        source: UnitHandle,
        selector: &dyn TargetSelector,
        ability: &AbilityDefinition,
        stun_ticks: i32,
    ) {
        let Some(target) = selector.find_target(field, source) else {
            return;
        };
        let star = field.unit(source).star_level;
        for handle in area_enemy_targets(field, source, target, ability, star) {
            field.unit_mut(handle).stun_ticks += stun_ticks.max(0) as u32;
        }
    }

    fn cast_heal(
        &self,
        field: &mut Battlefield<'_>,
        source: UnitHandle,
        ability: &AbilityDefinition,
        amount: i32,
        on_effect: &mut EffectCallback<'_>,
    ) {
        let (source_id, source_name) = {
            let s = field.unit(source);
            (s.id, s.name.clone())
        };

        match ability.pattern {
            AreaPattern::Single => {
                // Lowest health-fraction living ally, self included.
                let mut best: Option<(UnitHandle, f32)> = None;
                let src = field.unit(source);
                for (handle, unit) in field.units() {
                    if !unit.is_alive() || !src.is_ally_of(unit) {
                        continue;
                    }
                    let fraction = unit.health_fraction();
                    if best.is_none_or(|(_, f)| fraction < f) {
                        best = Some((handle, fraction));
                    }
                }
                if let Some((handle, _)) = best {
                    let ally = field.unit_mut(handle);
                    ally.heal(amount);
                    on_effect(source_id, &source_name, ally.id, -amount);
                }
            }
            AreaPattern::Surround => {
                let star = field.unit(source).star_level;
                let radius = ability.range_for_star(star);
                let (sx, sy) = {
                    let s = field.unit(source);
                    (s.x, s.y)
                };
                let src = field.unit(source);
                let targets: Vec<UnitHandle> = field
                    .units()
                    .filter(|(_, u)| u.is_alive() && src.is_ally_of(u))
                    .filter(|(_, u)| {
                        (u.x - sx).abs() <= radius && (u.y - sy).abs() <= radius
                    })
                    .map(|(h, _)| h)
                    .collect();
                for handle in targets {
                    let ally = field.unit_mut(handle);
                    ally.heal(amount);
                    on_effect(source_id, &source_name, ally.id, -amount);
                }
            }
            AreaPattern::Line => {
                // No sensible line heal; fall back to self.
                let caster = field.unit_mut(source);
                caster.heal(amount);
                on_effect(source_id, &source_name, source_id, -amount);
            }
        }
    }
}

/// Every living enemy selected by the ability's area pattern.
fn area_enemy_targets(
    field: &Battlefield<'_>,
    source: UnitHandle,
    target: UnitHandle,
    ability: &AbilityDefinition,
    star: u8,
) -> Vec<UnitHandle> {
    let src = field.unit(source);
    let (sx, sy) = (src.x, src.y);

    match ability.pattern {
        AreaPattern::Single => vec![target],
        AreaPattern::Line => {
            let t = field.unit(target);
            let dx = (t.x - sx).signum();
            let dy = (t.y - sy).signum();
            let length = ability.range_for_star(star);
            let cells: Vec<(i32, i32)> = (1..=length)
                .map(|i| (sx + dx * i, sy + dy * i))
                .collect();
            field
                .units()
                .filter(|(_, u)| u.is_alive() && src.is_enemy_of(u))
                .filter(|(_, u)| cells.contains(&(u.x, u.y)))
                .map(|(h, _)| h)
                .collect()
        }
        AreaPattern::Surround => {
            let radius = ability.range_for_star(star);
            field
                .units()
                .filter(|(_, u)| u.is_alive() && src.is_enemy_of(u))
                .filter(|(_, u)| !(u.x == sx && u.y == sy))
                .filter(|(_, u)| {
                    (u.x - sx).abs() <= radius && (u.y - sy).abs() <= radius
                })
                .map(|(h, _)| h)
                .collect()
        }
    }
}

fn apply_to_living_allies(
    field: &mut Battlefield<'_>,
    source: UnitHandle,
    mut f: impl FnMut(&mut Unit),
) {
    let src = field.unit(source);
    let targets: Vec<UnitHandle> = field
        .units()
        .filter(|(_, u)| u.is_alive() && src.is_ally_of(u))
        .map(|(h, _)| h)
        .collect();
    for handle in targets {
        f(field.unit_mut(handle));
    }
}

/// All conditional modifiers must hold for the cast to resolve.
fn conditions_met(ability: &AbilityDefinition, caster: &Unit, target: &Unit) -> bool {
    ability.modifiers.iter().all(|modifier| match modifier {
        AbilityModifier::Conditional {
            condition_type,
            threshold,
        } => condition_met(*condition_type, *threshold, caster, target),
        _ => true,
    })
}

fn condition_met(
    kind: ConditionKind,
    threshold: f32,
    caster: &Unit,
    target: &Unit,
) -> bool {
    match kind {
        ConditionKind::TargetHpBelow => target.health_fraction() < threshold,
        ConditionKind::TargetHpAbove => target.health_fraction() > threshold,
        ConditionKind::TargetStunned => target.stun_ticks > 0,
        ConditionKind::CasterHpBelow => caster.health_fraction() < threshold,
        ConditionKind::CasterFullMana => caster.has_full_mana(),
    }
}

fn scaling_multiplier(
    kind: ScalingKind,
    factor: f32,
    caster: &Unit,
    target: &Unit,
) -> f32 {
    match kind {
        ScalingKind::CasterMissingHp => 1.0 + (1.0 - caster.health_fraction()) * factor,
        ScalingKind::CasterManaPercent => 1.0 + caster.mana_fraction() * factor,
        ScalingKind::TargetMaxHpPercent => {
            // A fraction of the target's max HP folded back into the
            // multiplier, normalized against a 100-damage baseline.
            1.0 + (target.max_health as f32 * factor) / 100.0
        }
        ScalingKind::TargetMissingHp => {
            1.0 + (1.0 - target.health_fraction()) * factor
        }
    }
}

/// Flat bonus damage against a target at or under the HP threshold.
fn execute_bonus(target: &Unit, base_damage: i32, threshold: f32, multiplier: f32) -> i32 {
    if threshold <= 0.0 {
        return 0;
    }
    if target.health_fraction() <= threshold {
        (base_damage as f32 * multiplier) as i32
    } else {
        0
    }
}
