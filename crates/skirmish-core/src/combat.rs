//! Per-pairing combat orchestration.
//!
//! [`CombatSystem`] owns the three policy objects (targeting, movement,
//! ability casting) plus the trait manager, and drives one pairing
//! through its lifecycle: the combat-side transform at start, one
//! resolution pass per tick, and the planning restore at the end.

use skirmish_protocol::{
    BoardSide, CombatEvent, CombatEventKind, PlayerId, UnitId,
};

use crate::{
    AbilityCaster, Battlefield, BfsMover, NearestEnemySelector, PLAYER_ROWS,
    SharedClock, TargetSelector, TraitManager, UnitHandle, UnitMover, chebyshev,
};

/// Cast time / global cooldown after an ability cast. Abilities cadence
/// on this fixed value regardless of attack speed.
const CAST_COOLDOWN_MS: u64 = 1000;
/// Mana granted per landed auto-attack.
const ATTACK_MANA_GAIN: i32 = 10;
/// Floor for effective attack speed, so the cooldown division cannot
/// blow up on zero or near-zero speeds.
const MIN_ATTACK_SPEED: f32 = 0.1;

/// The result of one simulation tick over a pairing.
#[derive(Debug, Clone)]
pub struct CombatOutcome {
    /// `true` once at most one side still has a living unit.
    pub ended: bool,
    /// The winning participant for an ended combat; `None` is a draw
    /// (both sides wiped simultaneously).
    pub winner: Option<PlayerId>,
    /// Everything observable that happened this tick.
    pub events: Vec<CombatEvent>,
}

/// Orchestrates combat for one pairing at a time.
pub struct CombatSystem {
    trait_manager: TraitManager,
    selector: Box<dyn TargetSelector + Send + Sync>,
    mover: Box<dyn UnitMover + Send + Sync>,
    caster: AbilityCaster,
    clock: SharedClock,
}

impl CombatSystem {
    /// Builds a combat system with the default policies (nearest-enemy
    /// targeting, BFS movement).
    pub fn new(trait_manager: TraitManager, clock: SharedClock) -> Self {
        Self {
            trait_manager,
            selector: Box::new(NearestEnemySelector),
            mover: Box::new(BfsMover),
            caster: AbilityCaster,
            clock,
        }
    }

    /// Prepares both boards for combat.
    ///
    /// For every unit: snapshot the planning position and base stats,
    /// apply trait bonuses per side, then map the two local boards onto
    /// disjoint halves of the arena. The battlefield's first side (the
    /// smaller player id) has its rows inverted into the top half; the
    /// second side is offset into the bottom half. Columns are
    /// preserved, so front/back ordering survives the transform and the
    /// boards can never initially overlap.
    ///
    /// Returns which arena side each participant was assigned.
    pub fn start_combat(&self, field: &mut Battlefield<'_>) -> [(PlayerId, BoardSide); 2] {
        for side in 0..2 {
            let units = field.side_units_mut(side);
            for unit in units.iter_mut() {
                unit.save_planning_state();
            }
            self.trait_manager.apply_traits(units);
            for unit in units.iter_mut() {
                let y = if side == 0 {
                    (PLAYER_ROWS - 1) - unit.y
                } else {
                    PLAYER_ROWS + unit.y
                };
                unit.set_position(unit.x, y);
                tracing::debug!(
                    unit = %unit.id,
                    name = %unit.name,
                    x = unit.x,
                    y = unit.y,
                    side,
                    "combat position assigned"
                );
            }
        }

        let [top, bottom] = field.players();
        [(top, BoardSide::Top), (bottom, BoardSide::Bottom)]
    }

    /// Runs one resolution pass over every unit on the field.
    ///
    /// Per-unit priority: dead-skip → stun → cooldown gate → cast if
    /// mana is full (consumes the turn) → attack if in range → step
    /// toward the target otherwise.
    pub fn simulate_tick(&self, field: &mut Battlefield<'_>) -> CombatOutcome {
        let now = self.clock.now_ms();
        let mut events = Vec::new();

        for handle in field.handles() {
            if !field.unit(handle).is_alive() {
                continue;
            }

            // A stunned unit burns the tick doing nothing.
            if field.unit(handle).stun_ticks > 0 {
                field.unit_mut(handle).stun_ticks -= 1;
                continue;
            }

            if now < field.unit(handle).next_attack_at {
                continue;
            }

            field.unit_mut(handle).active_ability = None;

            if field.unit(handle).has_full_mana() {
                self.resolve_cast(field, handle, now, &mut events);
                let unit = field.unit_mut(handle);
                unit.mana = 0;
                unit.next_attack_at = now + CAST_COOLDOWN_MS;
                continue;
            }

            let Some(target) = self.selector.find_target(field, handle) else {
                continue;
            };

            let (sx, sy, range) = {
                let u = field.unit(handle);
                (u.x, u.y, u.range)
            };
            let (tx, ty) = {
                let t = field.unit(target);
                (t.x, t.y)
            };

            if chebyshev(sx, sy, tx, ty) <= range {
                self.resolve_attack(field, handle, target, now, &mut events);
            } else {
                self.mover
                    .move_towards(field, handle, target, self.clock.as_ref());
            }
        }

        let living = [field.side_has_living(0), field.side_has_living(1)];
        let ended = living.iter().filter(|alive| **alive).count() <= 1;
        let winner = if ended {
            let [top, bottom] = field.players();
            match living {
                [true, false] => Some(top),
                [false, true] => Some(bottom),
                _ => None,
            }
        } else {
            None
        };

        CombatOutcome {
            ended,
            winner,
            events,
        }
    }

    /// Restores every unit to its planning position and base stats and
    /// clears combat-transient state. Safe to call more than once.
    pub fn end_combat(&self, field: &mut Battlefield<'_>) {
        field.for_each_side(|player, units| {
            tracing::debug!(%player, units = units.len(), "restoring board after combat");
            for unit in units.iter_mut() {
                unit.restore_planning_state();
            }
        });
    }

    fn resolve_cast(
        &self,
        field: &mut Battlefield<'_>,
        source: UnitHandle,
        now: u64,
        events: &mut Vec<CombatEvent>,
    ) {
        let ability_name = field
            .unit(source)
            .ability
            .as_ref()
            .map(|a| a.name.clone());

        let mut cast_events: Vec<CombatEvent> = Vec::new();
        {
            let mut on_effect = |src: UnitId, name: &str, target: UnitId, amount: i32| {
                cast_events.push(CombatEvent {
                    timestamp: now,
                    kind: if amount < 0 {
                        CombatEventKind::Heal
                    } else {
                        CombatEventKind::Ability
                    },
                    source: src,
                    source_name: name.to_string(),
                    target,
                    ability: ability_name.clone(),
                    amount,
                });
            };
            self.caster
                .cast(field, source, self.selector.as_ref(), &mut on_effect);
        }

        // Targets were alive when the area was selected, so any that are
        // dead now fell to this cast.
        for event in &cast_events {
            if event.amount <= 0 {
                continue;
            }
            if let Some(target) = field.handle_by_id(event.target) {
                let victim = field.unit(target);
                if !victim.is_alive() {
                    events.push(CombatEvent {
                        timestamp: now,
                        kind: CombatEventKind::Death,
                        source: event.source,
                        source_name: event.source_name.clone(),
                        target: victim.id,
                        ability: ability_name.clone(),
                        amount: 0,
                    });
                }
            }
        }
        events.extend(cast_events);
    }

    fn resolve_attack(
        &self,
        field: &mut Battlefield<'_>,
        attacker: UnitHandle,
        target: UnitHandle,
        now: u64,
        events: &mut Vec<CombatEvent>,
    ) {
        let (attacker_id, attacker_name, damage, effective_speed) = {
            let u = field.unit(attacker);
            (
                u.id,
                u.name.clone(),
                (u.attack_damage as f32 * u.atk_buff) as i32,
                (u.attack_speed * u.spd_buff).max(MIN_ATTACK_SPEED),
            )
        };

        let victim = field.unit_mut(target);
        victim.take_damage(damage);
        let victim_id = victim.id;
        let died = !victim.is_alive();

        events.push(CombatEvent {
            timestamp: now,
            kind: CombatEventKind::Attack,
            source: attacker_id,
            source_name: attacker_name.clone(),
            target: victim_id,
            ability: None,
            amount: damage,
        });
        if died {
            events.push(CombatEvent {
                timestamp: now,
                kind: CombatEventKind::Death,
                source: attacker_id,
                source_name: attacker_name,
                target: victim_id,
                ability: None,
                amount: 0,
            });
        }

        let unit = field.unit_mut(attacker);
        unit.gain_mana(ATTACK_MANA_GAIN);
        unit.next_attack_at = now + (1000.0 / effective_speed) as u64;
    }
}
