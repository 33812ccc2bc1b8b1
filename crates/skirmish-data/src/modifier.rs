//! The closed set of ability modifiers.
//!
//! Modifiers alter how a damage ability resolves. They are pure data
//! here; evaluation lives with the ability caster, which dispatches on
//! the variant tag. Each modifier in a definition's list is applied
//! independently, in order.

use serde::{Deserialize, Serialize};

use crate::star_entry;

/// What a [`AbilityModifier::Scaling`] multiplier scales with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalingKind {
    /// Scale with the caster's missing HP fraction (0.0 to 1.0).
    CasterMissingHp,
    /// Scale with the caster's current mana fraction (0.0 to 1.0).
    CasterManaPercent,
    /// Scale with a fraction of the target's max HP.
    TargetMaxHpPercent,
    /// Scale with the target's missing HP fraction (0.0 to 1.0).
    TargetMissingHp,
}

/// The gate checked by a [`AbilityModifier::Conditional`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionKind {
    /// Target must be below the threshold HP fraction.
    TargetHpBelow,
    /// Target must be above the threshold HP fraction.
    TargetHpAbove,
    /// Target must currently be stunned.
    TargetStunned,
    /// Caster must be below the threshold HP fraction.
    CasterHpBelow,
    /// Caster must have full mana.
    CasterFullMana,
}

/// A modifier attached to an ability definition.
///
/// Serialized with an external `type` tag so content files read as
/// `{"type": "SCALING", "scaling_type": "CASTER_MISSING_HP", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AbilityModifier {
    /// Extra multiplicative scaling beyond the per-star value table.
    #[serde(rename = "SCALING")]
    Scaling {
        scaling_type: ScalingKind,
        /// Per-star scaling factor, clamped like every star table.
        factor: Vec<f32>,
    },
    /// The ability only resolves when the condition holds; otherwise the
    /// cast aborts with no side effects.
    #[serde(rename = "CONDITIONAL")]
    Conditional {
        condition_type: ConditionKind,
        threshold: f32,
    },
    /// Flat bonus damage against targets at or under an HP threshold.
    #[serde(rename = "EXECUTE")]
    Execute {
        hp_threshold: Vec<f32>,
        bonus_multiplier: Vec<f32>,
    },
    /// Converts a fraction of damage dealt into healing for the caster.
    #[serde(rename = "LIFESTEAL")]
    Lifesteal { lifesteal_percent: f32 },
}

impl AbilityModifier {
    /// Per-star lookup into a modifier's factor table.
    pub fn star_factor(table: &[f32], star_level: u8) -> f32 {
        star_entry(table, star_level)
    }
}
