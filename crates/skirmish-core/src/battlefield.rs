//! The paired-board view a combat runs over.
//!
//! A `Battlefield` borrows the two participants' board units for the
//! duration of one combat operation. Units are addressed by
//! [`UnitHandle`] so callers can read the whole field immutably, decide,
//! and then mutate one unit at a time — the borrow discipline the
//! combat loop needs.

use skirmish_protocol::PlayerId;

use crate::Unit;

/// Stable address of a unit within a battlefield: side then index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitHandle {
    pub(crate) side: usize,
    pub(crate) index: usize,
}

struct Side<'a> {
    player: PlayerId,
    units: &'a mut [Unit],
}

/// Both participants' boards, ordered deterministically by player id so
/// the combat-side transform is reproducible regardless of argument
/// order.
pub struct Battlefield<'a> {
    sides: [Side<'a>; 2],
}

impl<'a> Battlefield<'a> {
    /// Builds a battlefield over two boards. The side with the smaller
    /// player id always comes first (and is mapped to the top half of
    /// the arena by the combat transform).
    pub fn new(a: (PlayerId, &'a mut [Unit]), b: (PlayerId, &'a mut [Unit])) -> Self {
        let (first, second) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self {
            sides: [
                Side {
                    player: first.0,
                    units: first.1,
                },
                Side {
                    player: second.0,
                    units: second.1,
                },
            ],
        }
    }

    /// The participants in battlefield order (top, bottom).
    pub fn players(&self) -> [PlayerId; 2] {
        [self.sides[0].player, self.sides[1].player]
    }

    /// Every unit handle in a fixed order: the first side's board, then
    /// the second's. This is the per-tick processing order.
    pub fn handles(&self) -> Vec<UnitHandle> {
        self.sides
            .iter()
            .enumerate()
            .flat_map(|(side, s)| {
                (0..s.units.len()).map(move |index| UnitHandle { side, index })
            })
            .collect()
    }

    pub fn unit(&self, handle: UnitHandle) -> &Unit {
        &self.sides[handle.side].units[handle.index]
    }

    pub fn unit_mut(&mut self, handle: UnitHandle) -> &mut Unit {
        &mut self.sides[handle.side].units[handle.index]
    }

    /// Iterates all units with their handles.
    pub fn units(&self) -> impl Iterator<Item = (UnitHandle, &Unit)> {
        self.sides.iter().enumerate().flat_map(|(side, s)| {
            s.units
                .iter()
                .enumerate()
                .map(move |(index, unit)| (UnitHandle { side, index }, unit))
        })
    }

    /// The owner of a handle's side.
    pub fn player_of(&self, handle: UnitHandle) -> PlayerId {
        self.sides[handle.side].player
    }

    /// Finds a unit by its id.
    pub fn handle_by_id(&self, id: skirmish_protocol::UnitId) -> Option<UnitHandle> {
        self.units()
            .find(|(_, unit)| unit.id == id)
            .map(|(handle, _)| handle)
    }

    /// Mutable access to one side's whole board (0 = top, 1 = bottom).
    pub fn side_units_mut(&mut self, side: usize) -> &mut [Unit] {
        &mut *self.sides[side].units
    }

    /// Whether the given side still has a living unit.
    pub fn side_has_living(&self, side: usize) -> bool {
        self.sides[side].units.iter().any(Unit::is_alive)
    }

    /// Runs `f` over each side's units in order (top first).
    pub fn for_each_side(&mut self, mut f: impl FnMut(PlayerId, &mut [Unit])) {
        for side in &mut self.sides {
            f(side.player, &mut *side.units);
        }
    }
}
