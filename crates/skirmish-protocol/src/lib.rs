//! Shared vocabulary of the Skirmish simulation core.
//!
//! Everything in here is a plain serializable value: identity newtypes,
//! the room phase enum, the inbound player command surface, and the
//! combat event/ledger types that end up in outbound state snapshots.
//! No logic lives here — the other crates agree on these shapes.
//!
//! # Key types
//!
//! - [`PlayerId`] / [`RoomId`] / [`UnitId`] — identity newtypes
//! - [`GamePhase`] — the room lifecycle state machine
//! - [`GameAction`] — the generic per-player command
//! - [`CombatEvent`] / [`DamageEntry`] — what observers see of a fight

mod action;
mod event;
mod ids;
mod phase;

pub use action::GameAction;
pub use event::{CombatEvent, CombatEventKind, DamageEntry};
pub use ids::{PlayerId, RoomId, UnitId};
pub use phase::{BoardSide, GamePhase};
