//! Roster-wide trait bonuses.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::Unit;

/// A registered trait effect: invoked with the number of *unique unit
/// names* carrying the trait and the full board, and expected to mutate
/// stats in breakpoint tiers. The manager holds no bonus tables itself —
/// effects are registered per game mode.
pub type TraitEffect = Box<dyn Fn(usize, &mut [Unit]) + Send + Sync>;

/// Normalizes a trait name to its registry id: lowercase, spaces to
/// underscores. `"Iron Wall"` and `"iron_wall"` address the same effect.
pub fn normalize_trait_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Aggregates active trait counts for one side's board and applies the
/// registered effects.
#[derive(Default)]
pub struct TraitManager {
    effects: HashMap<String, TraitEffect>,
}

impl TraitManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the effect for a trait id (normalized on insert).
    pub fn register_effect(
        &mut self,
        trait_id: &str,
        effect: impl Fn(usize, &mut [Unit]) + Send + Sync + 'static,
    ) {
        self.effects
            .insert(normalize_trait_id(trait_id), Box::new(effect));
    }

    /// Counts unique unit names per trait across `units` and invokes
    /// each trait's registered effect. Duplicate copies of the same
    /// named unit count once toward a breakpoint.
    ///
    /// Traits with no registered effect are logged and skipped — content
    /// that is ahead of the mode's effect registration fails open.
    pub fn apply_traits(&self, units: &mut [Unit]) {
        let mut members: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for unit in units.iter() {
            for trait_name in &unit.traits {
                members
                    .entry(normalize_trait_id(trait_name))
                    .or_default()
                    .insert(unit.name.clone());
            }
        }

        for (trait_id, unique_names) in members {
            match self.effects.get(&trait_id) {
                Some(effect) => effect(unique_names.len(), units),
                None => {
                    tracing::warn!(trait_id = %trait_id, "no effect registered for trait");
                }
            }
        }
    }

    /// Whether a unit carries the given (normalized) trait id.
    pub fn unit_has_trait(unit: &Unit, trait_id: &str) -> bool {
        unit.traits
            .iter()
            .any(|t| normalize_trait_id(t) == trait_id)
    }
}
