//! Match lifecycle for Skirmish.
//!
//! A [`GameRoom`] is one independent match: it owns its players, walks
//! the lobby → planning ⇄ combat → end state machine, pairs players up
//! each round, drives the combat core for every active pairing, and
//! folds combat results back into persistent player health and
//! placements. [`Player`] carries everything that survives between
//! rounds — health, gold, level, bench, board, shop.
//!
//! # Key types
//!
//! - [`GameRoom`] — the per-match state machine
//! - [`Player`] — persistent per-player state and economy
//! - [`GameState`] / [`PlayerState`] — the outbound snapshot published
//!   to observers after every tick and player action

mod player;
mod room;
mod state;

pub use player::{
    BENCH_CAPACITY, Player, REROLL_COST, SHOP_SIZE, STARTING_GOLD, STARTING_HEALTH,
    sell_value, xp_to_next_level,
};
pub use room::{GameRoom, MATCH_CAPACITY, phase_duration_ms};
pub use state::{GameState, PlayerState};
