//! The Skirmish engine: the registry of active rooms and the tick
//! driver that advances them.
//!
//! The engine is runtime-agnostic — [`GameEngine::tick`] is a plain
//! synchronous call, invoked once per fixed interval by whatever
//! scheduler hosts the engine. [`driver::run_until_idle`] provides that
//! scheduler for tokio deployments.
//!
//! # Key types
//!
//! - [`GameEngine`] — create/look up/tick rooms, route commands
//! - [`EngineConfig`] — per-deployment content hooks (trait effects)
//! - [`driver`] — fixed-interval tokio tick loop

mod engine;
pub mod driver;

pub use engine::{EngineConfig, GameEngine, TraitRegistration};
