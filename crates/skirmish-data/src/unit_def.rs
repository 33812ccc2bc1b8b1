//! Unit definitions.

use serde::{Deserialize, Serialize};

use crate::{AbilityDefinition, star_entry};

/// The static description of one unit kind.
///
/// Every stat is a per-star table (1-indexed by star level, clamped to
/// the last entry), so content can override individual stats per star
/// without repeating the whole definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub max_health: Vec<i32>,
    #[serde(default)]
    pub max_mana: Vec<i32>,
    pub attack_damage: Vec<i32>,
    #[serde(default)]
    pub ability_power: Vec<i32>,
    #[serde(default)]
    pub armor: Vec<i32>,
    #[serde(default)]
    pub magic_resist: Vec<i32>,
    pub attack_speed: Vec<f32>,
    pub range: Vec<i32>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub ability: Option<AbilityDefinition>,
}

impl UnitDefinition {
    pub fn max_health(&self, star_level: u8) -> i32 {
        star_entry(&self.max_health, star_level)
    }

    pub fn max_mana(&self, star_level: u8) -> i32 {
        star_entry(&self.max_mana, star_level)
    }

    pub fn attack_damage(&self, star_level: u8) -> i32 {
        star_entry(&self.attack_damage, star_level)
    }

    pub fn ability_power(&self, star_level: u8) -> i32 {
        star_entry(&self.ability_power, star_level)
    }

    pub fn armor(&self, star_level: u8) -> i32 {
        star_entry(&self.armor, star_level)
    }

    pub fn magic_resist(&self, star_level: u8) -> i32 {
        star_entry(&self.magic_resist, star_level)
    }

    pub fn attack_speed(&self, star_level: u8) -> f32 {
        star_entry(&self.attack_speed, star_level)
    }

    pub fn range(&self, star_level: u8) -> i32 {
        star_entry(&self.range, star_level)
    }
}
