//! Combat observation types: per-tick events and the damage ledger.

use serde::{Deserialize, Serialize};

use crate::UnitId;

/// What happened in a single combat effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombatEventKind {
    /// An auto-attack landed.
    Attack,
    /// An ability effect landed.
    Ability,
    /// A unit was healed (`amount` is negative).
    Heal,
    /// A unit's health reached zero.
    Death,
}

/// One observable combat effect, timestamped with the simulation clock.
///
/// `amount` is signed: positive values are damage dealt, negative values
/// denote healing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub timestamp: u64,
    pub kind: CombatEventKind,
    pub source: UnitId,
    pub source_name: String,
    pub target: UnitId,
    /// Ability name for `Ability` casts and ability-sourced heals.
    pub ability: Option<String>,
    pub amount: i32,
}

/// Accumulated damage dealt by one unit over the current combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DamageEntry {
    pub name: String,
    pub total: i64,
}
