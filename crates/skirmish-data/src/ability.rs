//! Ability definitions.

use serde::{Deserialize, Serialize};

use crate::{AbilityModifier, star_entry};

/// The effect category of an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbilityType {
    /// Deal damage to enemies.
    Damage,
    /// Targets skip N ticks (value = stun duration in ticks).
    Stun,
    /// Restore HP to self or allies (value = heal amount).
    Heal,
    /// Raise the attack multiplier of all allies (value = % increase).
    BuffAtk,
    /// Raise the attack-speed multiplier of all allies (value = % increase).
    BuffSpd,
}

/// The area a resolved ability affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaPattern {
    /// Only the selected target.
    Single,
    /// A line projected from the caster toward the target, `range` cells long.
    Line,
    /// A square of radius `range` centered on the caster.
    Surround,
}

/// A unit's special ability as loaded from the content catalog.
///
/// `values` and `range` are per-star tables, 1-indexed by star level and
/// clamped to their last entry. Modifiers are evaluated independently by
/// the caster, in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: AbilityType,
    pub pattern: AreaPattern,
    #[serde(default)]
    pub values: Vec<i32>,
    #[serde(default)]
    pub range: Vec<i32>,
    #[serde(default)]
    pub modifiers: Vec<AbilityModifier>,
}

impl AbilityDefinition {
    /// The base effect value at a given star level.
    pub fn value_for_star(&self, star_level: u8) -> i32 {
        star_entry(&self.values, star_level)
    }

    /// The area range/radius at a given star level.
    pub fn range_for_star(&self, star_level: u8) -> i32 {
        star_entry(&self.range, star_level)
    }
}
