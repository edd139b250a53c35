//! Hostile processes stalking the network.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::{Awareness, Movement};

/// Stable enemy identifier, assigned in spawn order.
///
/// All per-phase processing walks enemies in ascending id so a replay with
/// identical inputs resolves identically.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// One live hostile process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    /// Class name for downstream display.
    pub name: String,
    pub glyph: char,
    pub pos: IVec2,
    /// Sight radius in king moves.
    pub vision: i32,
    pub movement: Movement,
    pub awareness: Awareness,
    /// Turns of maintained sight still needed before Alert locks on.
    pub grace: u8,
    /// Turns of broken sight a locked-on mob keeps hunting.
    pub pursuit: u8,
    /// Where the player was last confirmed.
    pub last_seen: Option<IVec2>,
    /// Processing pool; the mob dies at zero.
    pub cpu: i32,
    pub max_cpu: i32,
    /// Contact damage, passed through to the resource layer.
    pub damage: i32,
    /// Forecast course for display, up to [`crate::LOOKAHEAD_STEPS`] cells.
    /// Recomputed from scratch every turn.
    pub lookahead: Vec<IVec2>,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.cpu > 0
    }
}
