//! The Skirmish combat simulation core.
//!
//! Everything that happens inside one combat pairing lives here: the
//! occupancy grid, live units, target selection, BFS pathfinding,
//! ability resolution, trait bonuses, and the per-tick combat loop that
//! orchestrates them. The room layer above decides *when* to fight and
//! what the outcome means for players; this crate decides *what happens*
//! on the board.
//!
//! All timing goes through the injected [`Clock`] and all randomness
//! through [`RandomSource`], so every simulation is reproducible in
//! tests without real-time waits.
//!
//! # Key types
//!
//! - [`Grid`] — per-player occupancy map
//! - [`Unit`] — one live unit instance
//! - [`Battlefield`] — the paired-board view a combat runs over
//! - [`CombatSystem`] — start / tick / end of one pairing
//! - [`TraitManager`] — data-driven roster bonuses

mod battlefield;
mod caster;
mod clock;
mod combat;
mod grid;
mod mover;
mod random;
mod targeting;
mod traits;
mod unit;

pub use battlefield::{Battlefield, UnitHandle};
pub use caster::{AbilityCaster, EffectCallback};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use combat::{CombatOutcome, CombatSystem};
pub use grid::{COLS, COMBAT_ROWS, Grid, PLAYER_ROWS, chebyshev};
pub use mover::{BfsMover, MOVE_STAGGER_MS, UnitMover};
pub use random::{RandomSource, SeededRandom, ThreadRandom, shuffle};
pub use targeting::{NearestEnemySelector, TargetSelector};
pub use traits::{TraitEffect, TraitManager, normalize_trait_id};
pub use unit::Unit;
