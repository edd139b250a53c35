//! What the player can spend a turn on.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::ExploitSpec;

/// A single-turn player intent, supplied by the controlling layer.
///
/// Every variant is validated against the current state before the turn
/// starts; a failed precondition is reported back without the turn
/// advancing, so the intent can be corrected and resubmitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Let the turn pass.
    Wait,
    /// Walk one cell in a cardinal direction. Walls and enemies block.
    Step(IVec2),
    /// Step that strikes an adjacent enemy instead of walking into it;
    /// with nothing to hit it is an ordinary step.
    Bump(IVec2),
    /// Fire an exploit at a target cell with an enemy in it.
    Exploit { spec: ExploitSpec, target: IVec2 },
}
