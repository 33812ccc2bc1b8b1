//! Persistent per-player state and the bench/board/shop economy.
//!
//! Every mutating operation here follows the silent-no-op contract:
//! violated preconditions (not enough gold, full bench, occupied cell,
//! unknown unit id) leave the player untouched and signal nothing.

use std::sync::atomic::{AtomicU64, Ordering};

use skirmish_core::{Grid, RandomSource, Unit, shuffle};
use skirmish_data::{Catalog, UnitDefinition};
use skirmish_protocol::{BoardSide, PlayerId, UnitId};

use crate::state::PlayerState;

static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Match lives a player starts with.
pub const STARTING_HEALTH: i32 = 100;
/// Gold a player starts with.
pub const STARTING_GOLD: u32 = 10;
/// Off-board holding slots.
pub const BENCH_CAPACITY: usize = 9;
/// Units offered per shop roll.
pub const SHOP_SIZE: usize = 5;
/// Gold cost of rerolling the shop.
pub const REROLL_COST: u32 = 2;

const XP_PURCHASE_COST: u32 = 4;
const XP_PURCHASE_AMOUNT: u32 = 4;
const MERGE_COUNT: usize = 3;
/// Stat multiplier applied to max health and attack damage when three
/// units combine into the next star level.
const MERGE_STAT_SCALE: f32 = 1.8;

/// Experience required to advance from `level` to `level + 1`.
pub fn xp_to_next_level(level: u32) -> u32 {
    4 * level.max(1) - 2
}

/// Gold refunded when selling a unit: `cost × 3^(star − 1)`.
pub fn sell_value(cost: u32, star_level: u8) -> u32 {
    cost * 3u32.pow(u32::from(star_level.max(1)) - 1)
}

/// One participant in a match.
///
/// The board list and the grid describe the same units: the grid tracks
/// cell occupancy, the list owns the units. Benched units sit off-grid
/// at `(-1, -1)`.
#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub health: i32,
    pub gold: u32,
    pub level: u32,
    pub xp: u32,
    /// Final standing, set once when the player is eliminated (or wins).
    pub placement: Option<u32>,
    /// Arena half for the current combat, `None` outside combat.
    pub combat_side: Option<BoardSide>,
    pub grid: Grid,
    pub bench: Vec<Unit>,
    pub board: Vec<Unit>,
    pub shop: Vec<Option<UnitDefinition>>,
    pub shop_locked: bool,
    bot: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self::create(name.into(), false)
    }

    pub fn new_bot(name: impl Into<String>) -> Self {
        Self::create(name.into(), true)
    }

    fn create(name: String, bot: bool) -> Self {
        Self {
            id: PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed)),
            name,
            health: STARTING_HEALTH,
            gold: STARTING_GOLD,
            level: 1,
            xp: 0,
            placement: None,
            combat_side: None,
            grid: Grid::new(),
            bench: Vec::new(),
            board: Vec::new(),
            shop: Vec::new(),
            shop_locked: false,
            bot,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.bot
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies match damage, flooring health at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
    }

    pub fn gain_gold(&mut self, amount: u32) {
        self.gold += amount;
    }

    /// Gains experience and resolves any level-ups it pays for.
    pub fn gain_xp(&mut self, amount: u32) {
        self.xp += amount;
        while self.xp >= xp_to_next_level(self.level) {
            self.xp -= xp_to_next_level(self.level);
            self.level += 1;
        }
    }

    /// Converts gold into experience. No-op without enough gold.
    pub fn buy_xp(&mut self) {
        if self.gold < XP_PURCHASE_COST {
            return;
        }
        self.gold -= XP_PURCHASE_COST;
        self.gain_xp(XP_PURCHASE_AMOUNT);
    }

    /// Rerolls the shop offer for [`REROLL_COST`] gold. No-op while the
    /// shop is locked or gold is short.
    pub fn refresh_shop(&mut self, catalog: &Catalog, rng: &mut dyn RandomSource) {
        if self.shop_locked || self.gold < REROLL_COST {
            return;
        }
        self.gold -= REROLL_COST;

        let mut pool: Vec<UnitDefinition> = catalog.all().cloned().collect();
        shuffle(rng, &mut pool);
        self.shop = pool.into_iter().take(SHOP_SIZE).map(Some).collect();
    }

    /// Buys the unit in a shop slot onto the bench, then resolves any
    /// merge the purchase completes.
    pub fn buy(&mut self, shop_index: usize, catalog: &Catalog) {
        let Some(Some(def)) = self.shop.get(shop_index) else {
            return;
        };
        if self.gold < def.cost || self.bench.len() >= BENCH_CAPACITY {
            return;
        }

        let def = self.shop[shop_index].take().expect("slot checked above");
        self.gold -= def.cost;

        let unit = Unit::from_definition(&def, 1, Some(self.id));
        self.bench.push(unit);
        self.try_merge(&def.name, 1, catalog);
    }

    /// Sells a unit from bench or board for its refund value.
    pub fn sell(&mut self, unit_id: UnitId) {
        if let Some(index) = self.bench.iter().position(|u| u.id == unit_id) {
            let unit = self.bench.remove(index);
            self.gold += sell_value(unit.cost, unit.star_level);
            return;
        }
        if let Some(index) = self.board.iter().position(|u| u.id == unit_id) {
            let unit = self.board.remove(index);
            self.grid.remove(&unit);
            self.gold += sell_value(unit.cost, unit.star_level);
        }
    }

    /// Moves a unit between bench and board or across board cells.
    /// Negative `y` targets the bench.
    pub fn move_unit(&mut self, unit_id: UnitId, x: i32, y: i32) {
        if let Some(index) = self.bench.iter().position(|u| u.id == unit_id) {
            if y < 0 {
                // Bench reordering is not supported.
                return;
            }
            if self.board.len() >= self.board_capacity() || !self.grid.is_empty(x, y) {
                return;
            }
            let mut unit = self.bench.remove(index);
            self.grid.place(&mut unit, x, y);
            self.board.push(unit);
            return;
        }

        let Some(index) = self.board.iter().position(|u| u.id == unit_id) else {
            return;
        };
        if y < 0 {
            if self.bench.len() >= BENCH_CAPACITY {
                return;
            }
            let mut unit = self.board.remove(index);
            self.grid.remove(&unit);
            unit.set_position(-1, -1);
            self.bench.push(unit);
        } else {
            if !self.grid.is_empty(x, y) {
                return;
            }
            let unit = &mut self.board[index];
            self.grid.remove(unit);
            self.grid.place(unit, x, y);
        }
    }

    /// Places a fresh star-1 unit straight onto the board (bot rosters,
    /// match setup). No-op if the board is at capacity or the cell is
    /// unavailable.
    pub fn add_unit_to_board(&mut self, def: &UnitDefinition, x: i32, y: i32) {
        if self.board.len() >= self.board_capacity() || !self.grid.is_empty(x, y) {
            return;
        }
        let mut unit = Unit::from_definition(def, 1, Some(self.id));
        self.grid.place(&mut unit, x, y);
        self.board.push(unit);
    }

    /// Units allowed on the board: one per level.
    pub fn board_capacity(&self) -> usize {
        self.level as usize
    }

    /// Removes every unit from bench, board and grid.
    pub fn clear_units(&mut self) {
        self.bench.clear();
        self.board.clear();
        self.grid.clear();
    }

    /// Summed current health of living board units — the timeout
    /// tiebreaker.
    pub fn board_health(&self) -> i64 {
        self.board
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| i64::from(u.current_health))
            .sum()
    }

    /// Living units on the board.
    pub fn living_board_units(&self) -> usize {
        self.board.iter().filter(|u| u.is_alive()).count()
    }

    /// Collapses three same-name, same-star units into one unit of the
    /// next star level, then re-checks recursively so nine 1-stars fold
    /// all the way to a 3-star.
    fn try_merge(&mut self, name: &str, star_level: u8, catalog: &Catalog) {
        let Some(def) = catalog.get_by_name(name).cloned() else {
            return;
        };

        let matches = |u: &Unit| u.name == name && u.star_level == star_level;
        let mut candidates: Vec<UnitId> =
            self.bench.iter().filter(|u| matches(u)).map(|u| u.id).collect();
        candidates.extend(self.board.iter().filter(|u| matches(u)).map(|u| u.id));

        if candidates.len() < MERGE_COUNT {
            return;
        }
        candidates.truncate(MERGE_COUNT);

        // The upgraded unit inherits a board position when any of the
        // merged copies was fielded.
        let position = candidates.iter().find_map(|id| {
            self.board
                .iter()
                .find(|u| u.id == *id)
                .map(|u| (u.x, u.y))
        });

        for id in &candidates {
            if let Some(index) = self.bench.iter().position(|u| u.id == *id) {
                self.bench.remove(index);
            } else if let Some(index) = self.board.iter().position(|u| u.id == *id) {
                let unit = self.board.remove(index);
                self.grid.remove(&unit);
            }
        }

        let new_star = star_level + 1;
        let mut upgraded = Unit::from_definition(&def, new_star, Some(self.id));
        upgraded.max_health = (upgraded.max_health as f32 * MERGE_STAT_SCALE) as i32;
        upgraded.current_health = upgraded.max_health;
        upgraded.attack_damage =
            (upgraded.attack_damage as f32 * MERGE_STAT_SCALE) as i32;

        match position {
            Some((x, y)) => {
                self.grid.place(&mut upgraded, x, y);
                self.board.push(upgraded);
            }
            None => self.bench.push(upgraded),
        }

        tracing::debug!(
            player = %self.id,
            unit = name,
            star = new_star,
            "units merged"
        );

        self.try_merge(name, new_star, catalog);
    }

    /// The snapshot view of this player.
    pub fn to_state(&self) -> PlayerState {
        PlayerState {
            player_id: self.id,
            name: self.name.clone(),
            health: self.health,
            gold: self.gold,
            level: self.level,
            xp: self.xp,
            next_level_xp: xp_to_next_level(self.level),
            placement: self.placement,
            combat_side: self.combat_side,
            bench: self.bench.clone(),
            board: self.board.clone(),
            shop: self.shop.clone(),
            shop_locked: self.shop_locked,
        }
    }
}
