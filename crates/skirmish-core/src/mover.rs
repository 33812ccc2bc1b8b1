//! Pathfinding policy: one BFS step per move window.

use std::collections::VecDeque;

use crate::{
    Battlefield, COLS, COMBAT_ROWS, Clock, UnitHandle, chebyshev,
};

/// Delay between successful steps. Movement cadence is independent of
/// attack cadence — a fast attacker does not walk faster.
pub const MOVE_STAGGER_MS: u64 = 800;

/// Moves a unit one grid cell toward attack range of its target.
pub trait UnitMover {
    /// Advances `mover` by at most one cell. Does nothing if the move
    /// window has not elapsed, the mover is already in range, or no
    /// path exists (the unit stalls and retries next eligible tick).
    fn move_towards(
        &self,
        field: &mut Battlefield<'_>,
        mover: UnitHandle,
        target: UnitHandle,
        clock: &dyn Clock,
    );
}

/// Breadth-first search over the combat arena.
///
/// Cells holding any living unit other than the mover are blocked. A
/// cell qualifies as a destination once it is within the mover's attack
/// range of the target AND is either unoccupied or the mover's own
/// starting cell — so a mover already in range terminates immediately
/// instead of being blocked by its own occupancy. Neighbors are explored
/// in fixed order (down, up, right, left) for deterministic results.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsMover;

impl UnitMover for BfsMover {
    fn move_towards(
        &self,
        field: &mut Battlefield<'_>,
        mover: UnitHandle,
        target: UnitHandle,
        clock: &dyn Clock,
    ) {
        let now = clock.now_ms();
        if now < field.unit(mover).next_move_at {
            return;
        }

        if let Some((x, y)) = next_step(field, mover, target) {
            let unit = field.unit_mut(mover);
            unit.set_position(x, y);
            unit.next_move_at = now + MOVE_STAGGER_MS;
        }
    }
}

/// The first cell of the shortest path to a destination in range, or
/// `None` when the mover should stay put.
fn next_step(
    field: &Battlefield<'_>,
    mover: UnitHandle,
    target: UnitHandle,
) -> Option<(i32, i32)> {
    const ROWS: usize = COMBAT_ROWS as usize;
    const WIDTH: usize = COLS as usize;

    let start = (field.unit(mover).x, field.unit(mover).y);
    let range = field.unit(mover).range;
    let (tx, ty) = {
        let t = field.unit(target);
        (t.x, t.y)
    };

    let mut occupied = [[false; WIDTH]; ROWS];
    for (handle, unit) in field.units() {
        if handle == mover || !unit.is_alive() {
            continue;
        }
        if unit.x >= 0 && unit.x < COLS && unit.y >= 0 && unit.y < COMBAT_ROWS {
            occupied[unit.y as usize][unit.x as usize] = true;
        }
    }

    let mut visited = [[false; WIDTH]; ROWS];
    let mut parent = [[None::<(i32, i32)>; WIDTH]; ROWS];
    let mut queue = VecDeque::new();

    if start.0 < 0 || start.0 >= COLS || start.1 < 0 || start.1 >= COMBAT_ROWS {
        return None;
    }
    visited[start.1 as usize][start.0 as usize] = true;
    queue.push_back(start);

    let mut destination = None;
    while let Some((cx, cy)) = queue.pop_front() {
        // Same metric as the attack range check — anything else makes
        // the unit chase cells it can never attack from.
        if chebyshev(cx, cy, tx, ty) <= range {
            let is_start = (cx, cy) == start;
            if is_start || !occupied[cy as usize][cx as usize] {
                destination = Some((cx, cy));
                break;
            }
        }

        // Fixed exploration order: down, up, right, left.
        for (dx, dy) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
            let (nx, ny) = (cx + dx, cy + dy);
            if nx < 0 || nx >= COLS || ny < 0 || ny >= COMBAT_ROWS {
                continue;
            }
            if occupied[ny as usize][nx as usize] || visited[ny as usize][nx as usize] {
                continue;
            }
            visited[ny as usize][nx as usize] = true;
            parent[ny as usize][nx as usize] = Some((cx, cy));
            queue.push_back((nx, ny));
        }
    }

    let dest = destination?;
    if dest == start {
        return None;
    }

    // Walk the parent chain back to the cell right after the start.
    let mut step = dest;
    while let Some(prev) = parent[step.1 as usize][step.0 as usize] {
        if prev == start {
            return Some(step);
        }
        step = prev;
    }
    None
}
