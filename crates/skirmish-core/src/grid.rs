//! The occupancy grid.
//!
//! Each player owns a small 4×7 grid for planning. During combat the two
//! boards of a pairing are mapped into one logical 8×7 arena by the
//! position transform in [`crate::CombatSystem`] — there is no second
//! `Grid` instance for the arena; combat works off unit positions.

use skirmish_protocol::UnitId;

use crate::Unit;

/// Rows on a single player's board.
pub const PLAYER_ROWS: i32 = 4;
/// Rows of the combined combat arena (two boards stacked).
pub const COMBAT_ROWS: i32 = 8;
/// Columns, identical for board and arena.
pub const COLS: i32 = 7;

/// Chebyshev distance: the single metric for every range, targeting and
/// reachability check in the simulation. Pathfinding destinations and
/// attack range must agree on this, or a unit can path to a cell it
/// still cannot attack from.
pub fn chebyshev(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    (x1 - x2).abs().max((y1 - y2).abs())
}

/// A fixed-size occupancy map over unit ids.
///
/// The grid tracks *which* unit occupies a cell; the unit itself carries
/// its coordinates. `place` keeps the two in sync.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: [[Option<UnitId>; COLS as usize]; PLAYER_ROWS as usize],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `(x, y)` is inside the board.
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < COLS && y >= 0 && y < PLAYER_ROWS
    }

    /// Whether `(x, y)` is inside the board and unoccupied.
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.is_valid(x, y) && self.cells[y as usize][x as usize].is_none()
    }

    /// The unit occupying `(x, y)`, if any.
    pub fn unit_at(&self, x: i32, y: i32) -> Option<UnitId> {
        if self.is_valid(x, y) {
            self.cells[y as usize][x as usize]
        } else {
            None
        }
    }

    /// Places a unit on the cell and updates the unit's position.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds or occupied. Callers are
    /// required to pre-check with [`is_valid`](Self::is_valid) /
    /// [`is_empty`](Self::is_empty); reaching the panic means an
    /// occupancy invariant was already broken.
    pub fn place(&mut self, unit: &mut Unit, x: i32, y: i32) {
        assert!(
            self.is_empty(x, y),
            "invalid placement of {} at ({x}, {y})",
            unit.id
        );
        self.cells[y as usize][x as usize] = Some(unit.id);
        unit.set_position(x, y);
    }

    /// Clears the unit's cell, but only if it still holds that exact
    /// unit. A stale position (or an off-grid unit) is a no-op.
    pub fn remove(&mut self, unit: &Unit) {
        if self.is_valid(unit.x, unit.y)
            && self.cells[unit.y as usize][unit.x as usize] == Some(unit.id)
        {
            self.cells[unit.y as usize][unit.x as usize] = None;
        }
    }

    /// Clears every cell.
    pub fn clear(&mut self) {
        self.cells = Default::default();
    }
}
