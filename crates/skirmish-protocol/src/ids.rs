//! Identity newtypes.
//!
//! Wrapping the raw `u64` gives type safety — a `UnitId` can never be
//! passed where a `PlayerId` is expected — and the `Ord` derives give
//! every id a total order, which the simulation relies on for
//! deterministic pairing and iteration.
//!
//! `#[serde(transparent)]` makes each id serialize as a plain number.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a player (human or bot) within a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one independent match instance).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// A unique identifier for a live unit instance.
///
/// Distinct from the definition id (a string key into the content
/// catalog): two copies of the same unit share a definition id but
/// never a `UnitId`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}
