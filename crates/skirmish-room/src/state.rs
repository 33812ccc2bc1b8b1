//! Outbound state snapshots.
//!
//! After every tick and every player-triggered action the room rebuilds
//! its [`GameState`]. Publishing it to observers (connected clients) is
//! a collaborator's job — the room only produces the value.

use std::collections::BTreeMap;

use serde::Serialize;
use skirmish_core::Unit;
use skirmish_data::UnitDefinition;
use skirmish_protocol::{
    BoardSide, CombatEvent, DamageEntry, GamePhase, PlayerId, RoomId, UnitId,
};

/// Snapshot of one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerState {
    pub player_id: PlayerId,
    pub name: String,
    pub health: i32,
    pub gold: u32,
    pub level: u32,
    pub xp: u32,
    pub next_level_xp: u32,
    pub placement: Option<u32>,
    pub combat_side: Option<BoardSide>,
    pub bench: Vec<Unit>,
    pub board: Vec<Unit>,
    pub shop: Vec<Option<UnitDefinition>>,
    pub shop_locked: bool,
}

/// Full snapshot of a room, published after every tick and action.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub room_id: RoomId,
    pub host_id: Option<PlayerId>,
    pub phase: GamePhase,
    pub round: u32,
    pub time_remaining_ms: u64,
    pub total_phase_duration_ms: u64,
    pub players: BTreeMap<PlayerId, PlayerState>,
    /// Who fights whom this round, recorded in both directions.
    pub matchups: BTreeMap<PlayerId, PlayerId>,
    /// Bounded ring of the latest combat events.
    pub recent_events: Vec<CombatEvent>,
    /// Damage dealt per unit over the current combat phase.
    pub damage_log: BTreeMap<UnitId, DamageEntry>,
}
