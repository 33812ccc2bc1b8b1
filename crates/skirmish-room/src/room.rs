//! The per-match state machine.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use skirmish_core::{
    Battlefield, CombatOutcome, CombatSystem, RandomSource, SharedClock, shuffle,
};
use skirmish_data::Catalog;
use skirmish_protocol::{
    CombatEvent, CombatEventKind, DamageEntry, GameAction, GamePhase, PlayerId, RoomId,
    UnitId,
};

use crate::Player;
use crate::state::{GameState, PlayerState};

/// Matches are topped up to this many participants with bots at start.
pub const MATCH_CAPACITY: usize = 8;

const BASE_PHASE_DURATION_MS: u64 = 15_000;
const PHASE_DURATION_GROWTH_MS: u64 = 2_000;
const ROUND_GOLD_BASE: u32 = 5;
const ROUND_GOLD_INTEREST_CAP: u32 = 5;
const ROUND_XP: u32 = 2;
/// Match damage on a decisive loss: a flat base plus a per-survivor
/// scaling off the winner's remaining board.
const LOSS_DAMAGE_BASE: i32 = 10;
const LOSS_DAMAGE_PER_SURVIVOR: i32 = 2;
/// Bot rosters grow with the round, capped at one full front row.
const MAX_BOT_ROSTER: usize = 7;
const RECENT_EVENT_CAP: usize = 64;

/// Planning and combat share one duration per round:
/// `15000 + (round − 1) × 2000` ms.
pub fn phase_duration_ms(round: u32) -> u64 {
    BASE_PHASE_DURATION_MS + u64::from(round.saturating_sub(1)) * PHASE_DURATION_GROWTH_MS
}

/// One independent match: players, phase timers, pairings, and the
/// combat system that resolves them.
///
/// All mutation — ticks and externally-triggered commands alike — must
/// run on the same execution context; the room itself is single-threaded
/// and holds no locks.
pub struct GameRoom {
    id: RoomId,
    phase: GamePhase,
    round: u32,
    phase_ends_at: u64,
    host: Option<PlayerId>,
    players: BTreeMap<PlayerId, Player>,
    matchups: BTreeMap<PlayerId, PlayerId>,
    /// Pairings still fighting this combat phase.
    active_combats: Vec<(PlayerId, PlayerId)>,
    combat: CombatSystem,
    catalog: Arc<Catalog>,
    clock: SharedClock,
    rng: Box<dyn RandomSource>,
    recent_events: VecDeque<CombatEvent>,
    damage_log: BTreeMap<UnitId, DamageEntry>,
    state: GameState,
}

impl GameRoom {
    pub fn new(
        id: RoomId,
        catalog: Arc<Catalog>,
        combat: CombatSystem,
        clock: SharedClock,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let state = GameState {
            room_id: id,
            host_id: None,
            phase: GamePhase::Lobby,
            round: 0,
            time_remaining_ms: 0,
            total_phase_duration_ms: 0,
            players: BTreeMap::new(),
            matchups: BTreeMap::new(),
            recent_events: Vec::new(),
            damage_log: BTreeMap::new(),
        };
        tracing::info!(room = %id, "room created");
        Self {
            id,
            phase: GamePhase::Lobby,
            round: 0,
            phase_ends_at: 0,
            host: None,
            players: BTreeMap::new(),
            matchups: BTreeMap::new(),
            active_combats: Vec::new(),
            combat,
            catalog,
            clock,
            rng,
            recent_events: VecDeque::new(),
            damage_log: BTreeMap::new(),
            state,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::End
    }

    /// The latest snapshot, rebuilt after every tick and action.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    /// Adds a player while the room is in the lobby. The first joiner
    /// becomes host. Returns the new player's id, or `None` if the room
    /// is past the lobby.
    pub fn add_player(&mut self, name: impl Into<String>) -> Option<PlayerId> {
        if self.phase != GamePhase::Lobby {
            return None;
        }
        let mut player = Player::new(name);
        player.refresh_shop(&self.catalog, self.rng.as_mut());
        let id = player.id;
        self.players.insert(id, player);
        if self.host.is_none() {
            self.host = Some(id);
        }
        tracing::info!(room = %self.id, player = %id, players = self.players.len(), "player joined");
        self.update_state();
        Some(id)
    }

    /// Removes a player. If they hosted, the next remaining player (by
    /// id) is promoted; an empty room has no host.
    pub fn remove_player(&mut self, id: PlayerId) {
        if self.players.remove(&id).is_none() {
            return;
        }
        self.matchups.remove(&id);
        if self.host == Some(id) {
            self.host = self.players.keys().next().copied();
        }
        tracing::info!(room = %self.id, player = %id, players = self.players.len(), "player left");
        self.update_state();
    }

    /// Adds a bot with a randomized starting roster (lobby only).
    pub fn add_bot(&mut self) {
        if self.phase != GamePhase::Lobby {
            return;
        }
        self.spawn_bot();
        self.update_state();
    }

    /// Starts the match: tops the roster up to [`MATCH_CAPACITY`] with
    /// bots and begins round 1. Only valid from the lobby.
    pub fn start_match(&mut self) {
        if self.phase != GamePhase::Lobby {
            return;
        }
        while self.players.len() < MATCH_CAPACITY {
            self.spawn_bot();
        }
        tracing::info!(room = %self.id, players = self.players.len(), "match starting");
        self.start_phase(GamePhase::Planning);
        self.update_state();
    }

    fn spawn_bot(&mut self) {
        let mut bot = Player::new_bot("");
        bot.name = format!("Bot-{}", bot.id.0);
        bot.refresh_shop(&self.catalog, self.rng.as_mut());
        refresh_bot_roster(&mut bot, self.round, &self.catalog, self.rng.as_mut());
        tracing::debug!(room = %self.id, bot = %bot.id, "bot added");
        self.players.insert(bot.id, bot);
    }

    // -----------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------

    /// Routes a player action. Unknown players and phase-invalid
    /// actions are absorbed silently.
    pub fn handle_action(&mut self, player_id: PlayerId, action: GameAction) {
        if self.phase == GamePhase::End {
            return;
        }
        let Some(player) = self.players.get_mut(&player_id) else {
            return;
        };

        // Buying can complete a merge and selling can pull a fielded
        // unit, both of which touch the board, so like unit moves they
        // are locked while boards are in their combat transform.
        let board_unlocked = self.phase != GamePhase::Combat;
        match action {
            GameAction::Buy { shop_index } => {
                if board_unlocked {
                    player.buy(shop_index, &self.catalog);
                }
            }
            GameAction::Reroll => player.refresh_shop(&self.catalog, self.rng.as_mut()),
            GameAction::BuyXp => player.buy_xp(),
            GameAction::MoveUnit { unit_id, x, y } => {
                if self.phase == GamePhase::Planning {
                    player.move_unit(unit_id, x, y);
                }
            }
            GameAction::Sell { unit_id } => {
                if board_unlocked {
                    player.sell(unit_id);
                }
            }
            GameAction::ToggleShopLock => player.shop_locked = !player.shop_locked,
        }
        self.update_state();
    }

    // -----------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------

    /// Advances the room by one tick: deadline handling, then combat
    /// resolution for every active pairing. No-op in lobby and end.
    pub fn tick(&mut self) {
        if matches!(self.phase, GamePhase::Lobby | GamePhase::End) {
            return;
        }

        let now = self.clock.now_ms();
        if now >= self.phase_ends_at {
            self.on_deadline();
        }

        if self.phase == GamePhase::Combat {
            self.run_active_combats();
        }

        self.update_state();
    }

    fn on_deadline(&mut self) {
        // Combats that out-lasted the phase resolve as timeouts before
        // the phase advances.
        if self.phase == GamePhase::Combat {
            while let Some((a, b)) = self.active_combats.first().copied() {
                self.active_combats.remove(0);
                self.conclude_pairing(a, b, true, None);
                if self.phase != GamePhase::Combat {
                    return;
                }
            }
        }

        if self.round >= 1 && self.alive_count() <= 1 {
            self.finish_match();
            return;
        }

        match self.phase {
            GamePhase::Planning => self.start_phase(GamePhase::Combat),
            GamePhase::Combat => self.start_phase(GamePhase::Planning),
            GamePhase::Lobby | GamePhase::End => {}
        }
    }

    fn start_phase(&mut self, phase: GamePhase) {
        let now = self.clock.now_ms();
        match phase {
            GamePhase::Planning => {
                // Put any still-transformed boards back; harmless on
                // round 1 when nothing was transformed.
                for player in self.players.values_mut() {
                    player.combat_side = None;
                    for unit in &mut player.board {
                        unit.restore_planning_state();
                    }
                }
                self.matchups.clear();
                self.active_combats.clear();

                self.round += 1;
                self.phase = GamePhase::Planning;
                self.phase_ends_at = now + phase_duration_ms(self.round);

                let catalog = Arc::clone(&self.catalog);
                let round = self.round;
                for player in self.players.values_mut() {
                    let interest = (player.gold / 10).min(ROUND_GOLD_INTEREST_CAP);
                    player.gain_gold(ROUND_GOLD_BASE + interest);
                    player.gain_xp(ROUND_XP);
                    player.refresh_shop(&catalog, self.rng.as_mut());
                    if player.is_bot() {
                        refresh_bot_roster(player, round, &catalog, self.rng.as_mut());
                    }
                }

                tracing::info!(room = %self.id, round = self.round, "planning phase started");
            }
            GamePhase::Combat => {
                self.phase = GamePhase::Combat;
                self.phase_ends_at = now + phase_duration_ms(self.round);
                self.damage_log.clear();

                // BTreeMap iteration gives a sorted roster, so a seeded
                // shuffle reproduces the same pairings.
                let mut contenders: Vec<PlayerId> = self
                    .players
                    .iter()
                    .filter(|(_, p)| p.is_alive())
                    .map(|(id, _)| *id)
                    .collect();
                shuffle(self.rng.as_mut(), &mut contenders);

                self.matchups.clear();
                self.active_combats.clear();
                for pair in contenders.chunks(2) {
                    if let [a, b] = pair {
                        self.matchups.insert(*a, *b);
                        self.matchups.insert(*b, *a);
                        self.active_combats.push((*a, *b));
                    }
                    // An odd player out sits this round.
                }

                for (a, b) in self.active_combats.clone() {
                    self.start_pairing(a, b);
                }

                tracing::info!(
                    room = %self.id,
                    round = self.round,
                    pairings = self.active_combats.len(),
                    "combat phase started"
                );
            }
            GamePhase::Lobby | GamePhase::End => {}
        }
    }

    // -----------------------------------------------------------------
    // Combat plumbing
    // -----------------------------------------------------------------

    fn start_pairing(&mut self, a: PlayerId, b: PlayerId) {
        let Some((pa, pb)) = pair_mut(&mut self.players, a, b) else {
            return;
        };
        let mut field = Battlefield::new((a, &mut pa.board[..]), (b, &mut pb.board[..]));
        let sides = self.combat.start_combat(&mut field);
        drop(field);
        for (player_id, side) in sides {
            if player_id == a {
                pa.combat_side = Some(side);
            } else {
                pb.combat_side = Some(side);
            }
        }
    }

    fn run_active_combats(&mut self) {
        for (a, b) in self.active_combats.clone() {
            if self.phase != GamePhase::Combat {
                break;
            }
            if !self.active_combats.contains(&(a, b)) {
                continue;
            }
            let Some(outcome) = self.simulate_pairing(a, b) else {
                continue;
            };
            self.absorb_events(&outcome.events);
            if outcome.ended {
                self.active_combats.retain(|pair| *pair != (a, b));
                self.conclude_pairing(a, b, false, outcome.winner);
            }
        }
    }

    fn simulate_pairing(&mut self, a: PlayerId, b: PlayerId) -> Option<CombatOutcome> {
        let (pa, pb) = pair_mut(&mut self.players, a, b)?;
        let mut field = Battlefield::new((a, &mut pa.board[..]), (b, &mut pb.board[..]));
        Some(self.combat.simulate_tick(&mut field))
    }

    /// Applies the result of a finished (or timed-out) pairing: winner
    /// determination, match damage, elimination placement, and the
    /// planning restore.
    fn conclude_pairing(
        &mut self,
        a: PlayerId,
        b: PlayerId,
        timeout: bool,
        reported_winner: Option<PlayerId>,
    ) {
        // Winner resolution happens before the restore so the timeout
        // tiebreaker sees combat health, not restored health.
        let winner = if timeout {
            let health_a = self.players.get(&a).map_or(0, Player::board_health);
            let health_b = self.players.get(&b).map_or(0, Player::board_health);
            match health_a.cmp(&health_b) {
                std::cmp::Ordering::Greater => Some(a),
                std::cmp::Ordering::Less => Some(b),
                std::cmp::Ordering::Equal => None,
            }
        } else {
            reported_winner
        };

        if let Some(winner_id) = winner {
            let loser_id = if winner_id == a { b } else { a };
            let survivors = self
                .players
                .get(&winner_id)
                .map_or(0, Player::living_board_units);
            let damage = LOSS_DAMAGE_BASE + LOSS_DAMAGE_PER_SURVIVOR * survivors as i32;

            let mut eliminated = false;
            if let Some(loser) = self.players.get_mut(&loser_id) {
                loser.take_damage(damage);
                eliminated = !loser.is_alive() && loser.placement.is_none();
            }
            tracing::info!(
                room = %self.id,
                winner = %winner_id,
                loser = %loser_id,
                damage,
                timeout,
                "combat decided"
            );

            if eliminated {
                let place = self.alive_count() as u32 + 1;
                if let Some(loser) = self.players.get_mut(&loser_id) {
                    loser.placement = Some(place);
                }
                tracing::info!(room = %self.id, player = %loser_id, place, "player eliminated");
            }
        } else {
            tracing::info!(room = %self.id, a = %a, b = %b, timeout, "combat drawn");
        }

        self.restore_pairing(a, b);

        if self.alive_count() <= 1 {
            self.finish_match();
        }
    }

    fn restore_pairing(&mut self, a: PlayerId, b: PlayerId) {
        if let Some((pa, pb)) = pair_mut(&mut self.players, a, b) {
            let mut field = Battlefield::new((a, &mut pa.board[..]), (b, &mut pb.board[..]));
            self.combat.end_combat(&mut field);
            drop(field);
            pa.combat_side = None;
            pb.combat_side = None;
        }
    }

    fn finish_match(&mut self) {
        // Any pairings still standing get their boards restored.
        for (a, b) in std::mem::take(&mut self.active_combats) {
            self.restore_pairing(a, b);
        }
        self.phase = GamePhase::End;

        if let Some(survivor) = self
            .players
            .values_mut()
            .find(|p| p.is_alive() && p.placement.is_none())
        {
            survivor.placement = Some(1);
            tracing::info!(room = %self.id, winner = %survivor.id, "match won");
        }
        tracing::info!(room = %self.id, rounds = self.round, "match ended");
    }

    fn alive_count(&self) -> usize {
        self.players.values().filter(|p| p.is_alive()).count()
    }

    fn absorb_events(&mut self, events: &[CombatEvent]) {
        for event in events {
            if event.amount > 0
                && matches!(event.kind, CombatEventKind::Attack | CombatEventKind::Ability)
            {
                let entry = self.damage_log.entry(event.source).or_default();
                entry.name = event.source_name.clone();
                entry.total += i64::from(event.amount);
            }

            self.recent_events.push_back(event.clone());
            while self.recent_events.len() > RECENT_EVENT_CAP {
                self.recent_events.pop_front();
            }
        }
    }

    fn update_state(&mut self) {
        let now = self.clock.now_ms();
        let (remaining, total) = if self.phase.is_running() {
            (
                self.phase_ends_at.saturating_sub(now),
                phase_duration_ms(self.round),
            )
        } else {
            (0, 0)
        };

        let players: BTreeMap<PlayerId, PlayerState> = self
            .players
            .iter()
            .map(|(id, player)| (*id, player.to_state()))
            .collect();

        self.state = GameState {
            room_id: self.id,
            host_id: self.host,
            phase: self.phase,
            round: self.round,
            time_remaining_ms: remaining,
            total_phase_duration_ms: total,
            players,
            matchups: self.matchups.clone(),
            recent_events: self.recent_events.iter().cloned().collect(),
            damage_log: self.damage_log.clone(),
        };
    }
}

/// Disjoint mutable access to two players in the map.
fn pair_mut(
    players: &mut BTreeMap<PlayerId, Player>,
    a: PlayerId,
    b: PlayerId,
) -> Option<(&mut Player, &mut Player)> {
    if a == b {
        return None;
    }
    let mut first = None;
    let mut second = None;
    for (id, player) in players.iter_mut() {
        if *id == a {
            first = Some(player);
        } else if *id == b {
            second = Some(player);
        }
    }
    first.zip(second)
}

/// Rebuilds a bot's board for the round: `round/2 + 1` random units
/// (capped at one front row), placed along the front. Bots level up
/// alongside their roster so the board cap never starves them.
fn refresh_bot_roster(
    bot: &mut Player,
    round: u32,
    catalog: &Catalog,
    rng: &mut dyn RandomSource,
) {
    bot.clear_units();
    let count = ((round / 2 + 1) as usize).min(MAX_BOT_ROSTER);
    bot.level = bot.level.max(count as u32);

    let definitions: Vec<_> = catalog.all().collect();
    if definitions.is_empty() {
        return;
    }
    for column in 0..count {
        let def = definitions[rng.next_index(definitions.len())];
        bot.add_unit_to_board(def, column as i32, 0);
    }
}
