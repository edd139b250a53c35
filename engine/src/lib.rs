//! Turn-synchronous stealth logic for a network infiltration game.
//!
//! The crate owns the hard parts of a stealth turn: who sees whom, how
//! enemy suspicion escalates and spreads, where enemies will walk next,
//! how exposed the whole intrusion is, and what an attack does. Rendering,
//! audio, persistence and map generation all live downstream of the
//! [`TurnResult`] this crate emits.

/// Width and height of a network map in cells.
pub const NETWORK_SIZE: i32 = 50;

/// How far a lock-on alarm carries, in king moves.
pub const ALERT_RADIUS: i32 = 4;

/// Turns of maintained sight before an alerted mob locks on.
pub const GRACE_TURNS: u8 = 1;

/// Turns without sight before a locked-on mob loses the trail.
pub const PURSUIT_TURNS: u8 = 5;

/// Damage multiplier for strikes against an unaware target.
pub const STEALTH_MULTIPLIER: i32 = 2;

/// How many future cells of an enemy's course are forecast each turn.
pub const LOOKAHEAD_STEPS: usize = 3;

/// Detection gained every turn just for being plugged in.
pub const PASSIVE_DETECTION: f32 = 0.1;

/// Detection gained per turn for every alerted enemy.
pub const ALERT_DETECTION: f32 = 1.0;

/// Detection gained per turn for every enemy locked on to the player.
pub const TRACKING_DETECTION: f32 = 3.0;

mod action;
pub use action::PlayerAction;

mod combat;
pub use combat::{AttackKind, Outcome};

pub mod config;
pub use config::{Archetype, EnemySeed, ExploitSpec, NetworkParams};

mod detection;
pub use detection::DetectionMeter;

mod enemy;
pub use enemy::{Enemy, EnemyId};

mod error;
pub use error::{Error, Result};

mod map;
pub use map::NetworkMap;

mod patrol;
pub use patrol::Movement;

mod perception;
pub use perception::{AlertEvent, Awareness, Cause, Transition};

pub mod prelude;

mod runtime;
pub use runtime::{
    Diagnostic, EnemyView, KillEvent, Player, Runtime, TurnPhase, TurnResult,
};

mod sight;
pub use sight::{visible_cells, Seen};

mod tile;
pub use tile::Tile;
