//! The inbound player command surface.

use serde::{Deserialize, Serialize};

use crate::UnitId;

/// A player-triggered action, routed to the room that owns the player.
///
/// Invalid actions — wrong phase, unknown unit, not enough gold, a full
/// bench — are silently absorbed: no state change, no error reply.
/// Clients infer failure from the absence of the expected change in the
/// next snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameAction {
    /// Buy the unit in the given shop slot onto the bench.
    Buy { shop_index: usize },
    /// Pay to reroll the shop offer.
    Reroll,
    /// Convert gold into experience.
    BuyXp,
    /// Move a unit between bench and board, or across board cells.
    /// A negative `y` targets the bench.
    MoveUnit { unit_id: UnitId, x: i32, y: i32 },
    /// Sell a unit for its refund value.
    Sell { unit_id: UnitId },
    /// Toggle the shop lock, preventing the round-start refresh.
    ToggleShopLock,
}
