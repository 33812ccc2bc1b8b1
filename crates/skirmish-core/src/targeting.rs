//! Target selection policy.

use crate::{Battlefield, UnitHandle, chebyshev};

/// Picks a combat target for a unit from the battlefield.
///
/// Stateless policy trait: the combat loop and the ability caster both
/// consult it, so swapping the policy changes both consistently.
pub trait TargetSelector {
    /// The chosen target, or `None` if no enemy qualifies.
    fn find_target(&self, field: &Battlefield<'_>, source: UnitHandle)
    -> Option<UnitHandle>;
}

/// The default policy: the living enemy nearest to the source by
/// Chebyshev distance. Ties go to the first candidate in battlefield
/// order, which keeps the choice deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestEnemySelector;

impl TargetSelector for NearestEnemySelector {
    fn find_target(
        &self,
        field: &Battlefield<'_>,
        source: UnitHandle,
    ) -> Option<UnitHandle> {
        let src = field.unit(source);
        let mut best: Option<(UnitHandle, i32)> = None;
        for (handle, unit) in field.units() {
            if handle == source || !unit.is_alive() || !src.is_enemy_of(unit) {
                continue;
            }
            let dist = chebyshev(src.x, src.y, unit.x, unit.y);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((handle, dist));
            }
        }
        best.map(|(handle, _)| handle)
    }
}
