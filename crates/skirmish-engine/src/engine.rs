//! The room registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use skirmish_core::{
    CombatSystem, RandomSource, SharedClock, ThreadRandom, TraitManager,
};
use skirmish_data::Catalog;
use skirmish_protocol::{GameAction, PlayerId, RoomId};
use skirmish_room::GameRoom;

static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Registers a game mode's trait effects into a fresh room's manager.
/// The engine itself carries no game-specific bonus tables.
pub type TraitRegistration = Arc<dyn Fn(&mut TraitManager) + Send + Sync>;

/// Deployment-level configuration shared by every room the engine
/// creates.
#[derive(Clone)]
pub struct EngineConfig {
    pub traits: TraitRegistration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            traits: Arc::new(|_| {}),
        }
    }
}

/// The registry of active rooms.
///
/// An external scheduler invokes [`tick`](Self::tick) at a fixed
/// cadence; the engine ticks every room synchronously and sequentially,
/// and drops rooms that have reached their end state. All command entry
/// points route through the same `&mut self`, which serializes them
/// against the tick loop by construction.
pub struct GameEngine {
    rooms: HashMap<RoomId, GameRoom>,
    catalog: Arc<Catalog>,
    clock: SharedClock,
    config: EngineConfig,
}

impl GameEngine {
    pub fn new(catalog: Arc<Catalog>, clock: SharedClock, config: EngineConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            catalog,
            clock,
            config,
        }
    }

    /// Creates a room with the production randomness source.
    pub fn create_room(&mut self) -> RoomId {
        self.create_room_with_rng(Box::new(ThreadRandom))
    }

    /// Creates a room with an explicit randomness source (seeded runs,
    /// tests, replays).
    pub fn create_room_with_rng(&mut self, rng: Box<dyn RandomSource>) -> RoomId {
        let id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));

        let mut traits = TraitManager::new();
        (self.config.traits)(&mut traits);
        let combat = CombatSystem::new(traits, Arc::clone(&self.clock));

        let room = GameRoom::new(
            id,
            Arc::clone(&self.catalog),
            combat,
            Arc::clone(&self.clock),
            rng,
        );
        self.rooms.insert(id, room);
        tracing::info!(room = %id, rooms = self.rooms.len(), "room registered");
        id
    }

    pub fn room(&self, id: RoomId) -> Option<&GameRoom> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut GameRoom> {
        self.rooms.get_mut(&id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }

    /// One engine tick: ended rooms are dropped, every remaining room
    /// advances once. A room that ends during this tick stays visible —
    /// with its final snapshot — until the next tick removes it.
    pub fn tick(&mut self) {
        self.rooms.retain(|id, room| {
            if room.is_ended() {
                tracing::info!(room = %id, "room ended, removing");
                false
            } else {
                true
            }
        });
        for room in self.rooms.values_mut() {
            room.tick();
        }
    }

    // -----------------------------------------------------------------
    // Command routing. A nonexistent room id is absorbed silently, the
    // same contract the rooms apply to their own preconditions.
    // -----------------------------------------------------------------

    pub fn add_player(&mut self, room_id: RoomId, name: &str) -> Option<PlayerId> {
        self.rooms.get_mut(&room_id)?.add_player(name)
    }

    pub fn remove_player(&mut self, room_id: RoomId, player_id: PlayerId) {
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.remove_player(player_id);
        }
    }

    pub fn start_match(&mut self, room_id: RoomId) {
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.start_match();
        }
    }

    pub fn add_bot(&mut self, room_id: RoomId) {
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.add_bot();
        }
    }

    pub fn handle_action(
        &mut self,
        room_id: RoomId,
        player_id: PlayerId,
        action: GameAction,
    ) {
        if let Some(room) = self.rooms.get_mut(&room_id) {
            room.handle_action(player_id, action);
        }
    }
}
