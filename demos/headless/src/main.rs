//! Runs one full bots-only match to completion on a manual clock and
//! prints the final standings. Doubles as an end-to-end smoke of the
//! whole stack: catalog loading, trait registration, rounds, combat,
//! elimination, and engine cleanup.

use std::sync::Arc;

use skirmish_core::{ManualClock, SeededRandom, SharedClock, TraitManager};
use skirmish_data::Catalog;
use skirmish_engine::{EngineConfig, GameEngine};
use skirmish_room::GameState;
use tracing_subscriber::EnvFilter;

/// Simulation step the engine is ticked at.
const TICK_MS: u64 = 100;
/// Hard stop if a match somehow never converges.
const MAX_TICKS: u32 = 100_000;

fn register_traits(manager: &mut TraitManager) {
    // Iron Wall: bonus max health at 2/4/6 unique members.
    manager.register_effect("Iron Wall", |count, units| {
        let bonus = match count {
            c if c >= 6 => 700,
            c if c >= 4 => 350,
            c if c >= 2 => 150,
            _ => 0,
        };
        if bonus > 0 {
            for unit in units.iter_mut() {
                if TraitManager::unit_has_trait(unit, "iron_wall") {
                    unit.max_health += bonus;
                    unit.current_health += bonus;
                }
            }
        }
    });

    // Swift: bonus attack speed at 2/4/6 unique members.
    manager.register_effect("Swift", |count, units| {
        let bonus = match count {
            c if c >= 6 => 0.50,
            c if c >= 4 => 0.25,
            c if c >= 2 => 0.10,
            _ => 0.0,
        };
        if bonus > 0.0 {
            for unit in units.iter_mut() {
                if TraitManager::unit_has_trait(unit, "swift") {
                    unit.attack_speed += bonus;
                }
            }
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let catalog = Arc::new(Catalog::from_json(include_str!("../data/units.json"))?);
    let clock = Arc::new(ManualClock::new());
    let shared_clock: SharedClock = clock.clone();

    let mut engine = GameEngine::new(
        catalog,
        shared_clock,
        EngineConfig {
            traits: Arc::new(register_traits),
        },
    );

    let room_id = engine.create_room_with_rng(Box::new(SeededRandom::new(0xC0FFEE)));
    engine.start_match(room_id);
    tracing::info!(room = %room_id, "bots-only match started");

    let mut final_state: Option<GameState> = None;
    for _ in 0..MAX_TICKS {
        engine.tick();
        clock.advance(TICK_MS);
        match engine.room(room_id) {
            Some(room) => final_state = Some(room.state().clone()),
            None => break,
        }
    }

    let state = final_state.ok_or("match never produced a snapshot")?;
    println!();
    println!(
        "match {} finished after {} rounds",
        state.room_id, state.round
    );

    let mut standings: Vec<_> = state.players.values().collect();
    standings.sort_by_key(|p| p.placement.unwrap_or(u32::MAX));
    for player in standings {
        match player.placement {
            Some(place) => println!("  #{place} {} (health {})", player.name, player.health),
            None => println!("  --  {} (health {})", player.name, player.health),
        }
    }

    Ok(())
}
