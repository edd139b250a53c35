//! Resolving strikes against hostile processes.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::VecExt;

use crate::{
    Awareness, Enemy, EnemyId, Error, Result, PURSUIT_TURNS,
    STEALTH_MULTIPLIER,
};

/// How an attack is delivered.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum AttackKind {
    /// Adjacent strike.
    Bump,
    /// Exploit fired at range; needs a sight line.
    RangedExploit,
}

/// What one resolved attack did.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub target: EnemyId,
    pub kind: AttackKind,
    pub damage: i32,
    pub target_new_cpu: i32,
    /// The target never saw it coming; damage was doubled.
    pub stealth_applied: bool,
    /// The strike made noise; a surviving target snaps straight to
    /// tracking, grace period skipped.
    pub noise_emitted: bool,
    pub killed: bool,
}

/// Resolve one attack against one mob.
///
/// Preconditions come first and leave the target untouched when they fail:
/// the target must be inside `range` (king moves), and a ranged exploit
/// must additionally have a sight line, checked through `line_of_sight`.
///
/// A strike against an unaware target is a stealth strike: doubled damage
/// and no noise. Any other strike is loud, and a surviving target starts
/// tracking the attacker immediately.
pub(crate) fn resolve(
    attacker_pos: IVec2,
    base_damage: i32,
    kind: AttackKind,
    range: i32,
    target: &mut Enemy,
    line_of_sight: impl FnOnce() -> Result<bool>,
) -> Result<Outcome> {
    let distance = (target.pos - attacker_pos).cheby_len();
    if distance > range {
        return Err(Error::OutOfRange { range, distance });
    }
    if kind == AttackKind::RangedExploit && !line_of_sight()? {
        return Err(Error::NoLineOfSight);
    }

    let stealth_applied = target.awareness == Awareness::Unaware;
    let damage = if stealth_applied {
        base_damage * STEALTH_MULTIPLIER
    } else {
        base_damage
    };

    target.cpu = (target.cpu - damage).max(0);
    let killed = !target.is_alive();
    let noise_emitted = !stealth_applied;

    if noise_emitted && !killed {
        target.awareness = Awareness::Tracking;
        target.grace = 0;
        target.pursuit = PURSUIT_TURNS;
        target.last_seen = Some(attacker_pos);
    }

    Ok(Outcome {
        target: target.id,
        kind,
        damage,
        target_new_cpu: target.cpu,
        stealth_applied,
        noise_emitted,
        killed,
    })
}
