use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Faults the engine reports to its caller.
///
/// Everything except `InvariantViolation` is recoverable: precondition
/// failures on player actions leave the engine untouched so the action can
/// be corrected and retried, and per-enemy movement faults are contained
/// inside the turn as [`crate::Diagnostic`] entries. `InvariantViolation`
/// means the engine caught itself breaking one of its own guarantees and
/// the instance should be abandoned.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
pub enum Error {
    /// A visibility query from a cell sight cannot originate in.
    #[error("visibility origin {0} is not traversable")]
    InvalidOrigin(IVec2),

    /// A ranged attack aimed beyond its exploit's reach.
    #[error("target is {distance} cells away, range is {range}")]
    OutOfRange { range: i32, distance: i32 },

    /// A ranged attack with no sight line to its target.
    #[error("no line of sight to target")]
    NoLineOfSight,

    /// A step into a blocked or occupied cell.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: IVec2, to: IVec2 },

    /// An attack aimed at a cell with nothing in it.
    #[error("no target at {0}")]
    NoTarget(IVec2),

    /// A map layout that does not describe a valid network.
    #[error("bad network layout: {0}")]
    BadLayout(String),

    /// The engine broke one of its own guarantees; fatal.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
