//! Live unit instances.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use skirmish_data::{AbilityDefinition, UnitDefinition};
use skirmish_protocol::{PlayerId, UnitId};

static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

/// Position and base stats captured before the combat transform, so the
/// unit can be put back exactly as it stood during planning.
#[derive(Debug, Clone, Copy)]
struct PlanningSnapshot {
    x: i32,
    y: i32,
    max_health: i32,
    attack_speed: f32,
}

/// One live unit, owned by exactly one player while alive.
///
/// There is a single concrete unit type: simpler unit kinds just carry
/// neutral values (no ability, empty traits) instead of implementing a
/// narrower interface.
///
/// Position `(-1, -1)` means off-grid (benched).
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub id: UnitId,
    pub definition_id: String,
    pub name: String,
    pub star_level: u8,
    pub cost: u32,

    pub max_health: i32,
    pub current_health: i32,
    pub max_mana: i32,
    pub mana: i32,
    pub attack_damage: i32,
    pub ability_power: i32,
    pub armor: i32,
    pub magic_resist: i32,
    pub attack_speed: f32,
    pub range: i32,

    pub x: i32,
    pub y: i32,
    pub owner: Option<PlayerId>,
    pub traits: BTreeSet<String>,
    pub ability: Option<AbilityDefinition>,

    // Combat-transient state, reset when combat ends.
    pub active_ability: Option<String>,
    pub stun_ticks: u32,
    pub atk_buff: f32,
    pub spd_buff: f32,
    #[serde(skip)]
    pub next_attack_at: u64,
    #[serde(skip)]
    pub next_move_at: u64,

    #[serde(skip)]
    snapshot: Option<PlanningSnapshot>,
}

impl Unit {
    /// Instantiates a live unit from a definition at the given star
    /// level, benched (off-grid) and at full health with empty mana.
    pub fn from_definition(
        def: &UnitDefinition,
        star_level: u8,
        owner: Option<PlayerId>,
    ) -> Self {
        let max_health = def.max_health(star_level);
        Self {
            id: UnitId(NEXT_UNIT_ID.fetch_add(1, Ordering::Relaxed)),
            definition_id: def.id.clone(),
            name: def.name.clone(),
            star_level,
            cost: def.cost,
            max_health,
            current_health: max_health,
            max_mana: def.max_mana(star_level),
            mana: 0,
            attack_damage: def.attack_damage(star_level),
            ability_power: def.ability_power(star_level),
            armor: def.armor(star_level),
            magic_resist: def.magic_resist(star_level),
            attack_speed: def.attack_speed(star_level),
            range: def.range(star_level),
            x: -1,
            y: -1,
            owner,
            traits: def.traits.iter().cloned().collect(),
            ability: def.ability.clone(),
            active_ability: None,
            stun_ticks: 0,
            atk_buff: 1.0,
            spd_buff: 1.0,
            next_attack_at: 0,
            next_move_at: 0,
            snapshot: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn is_benched(&self) -> bool {
        self.y < 0
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Current health as a fraction of max, clamped to `[0, 1]`.
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.current_health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    pub fn mana_fraction(&self) -> f32 {
        if self.max_mana <= 0 {
            return 0.0;
        }
        self.mana as f32 / self.max_mana as f32
    }

    pub fn has_full_mana(&self) -> bool {
        self.max_mana > 0 && self.mana >= self.max_mana
    }

    /// Applies damage, flooring health at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.current_health = (self.current_health - amount).max(0);
    }

    /// Heals up to max health. Never raises health above max.
    pub fn heal(&mut self, amount: i32) {
        self.current_health = (self.current_health + amount).min(self.max_health);
    }

    /// Gains mana up to the cap.
    pub fn gain_mana(&mut self, amount: i32) {
        self.mana = (self.mana + amount).min(self.max_mana);
    }

    /// Whether `other` belongs to an opposing owner. Units with no owner
    /// on either side count as hostile to everyone.
    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        match (self.owner, other.owner) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }

    /// Whether `other` shares this unit's owner. A unit is its own ally.
    pub fn is_ally_of(&self, other: &Unit) -> bool {
        matches!((self.owner, other.owner), (Some(a), Some(b)) if a == b)
    }

    /// Captures position and the stats trait bonuses may touch, prior to
    /// the combat transform.
    pub fn save_planning_state(&mut self) {
        self.snapshot = Some(PlanningSnapshot {
            x: self.x,
            y: self.y,
            max_health: self.max_health,
            attack_speed: self.attack_speed,
        });
    }

    /// Restores the planning snapshot: position, base stats, full
    /// health, and clears all combat-transient state. Idempotent —
    /// restoring an already-restored unit changes nothing.
    pub fn restore_planning_state(&mut self) {
        if let Some(s) = self.snapshot.take() {
            self.x = s.x;
            self.y = s.y;
            self.max_health = s.max_health;
            self.attack_speed = s.attack_speed;
        }
        self.current_health = self.max_health;
        self.active_ability = None;
        self.stun_ticks = 0;
        self.atk_buff = 1.0;
        self.spd_buff = 1.0;
        self.next_attack_at = 0;
        self.next_move_at = 0;
    }
}
