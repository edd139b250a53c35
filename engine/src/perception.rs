//! Mobs noticing, hunting and forgetting the player.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::VecExt;

use crate::{
    Enemy, EnemyId, Result, Seen, ALERT_RADIUS, GRACE_TURNS, PURSUIT_TURNS,
};

/// How much a mob knows about the player.
///
/// Escalates one step per sighted turn, Unaware → Alert → Tracking, and
/// only falls back to Unaware after sight has been broken long enough for
/// the relevant timer to run out.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Awareness {
    /// No knowledge of the player.
    #[default]
    Unaware,
    /// Sees something; the grace period is still running.
    Alert,
    /// Actively hunting the player.
    Tracking,
}

/// An alarm raised by a mob locking on, carried to nearby mobs the same
/// turn.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub source: EnemyId,
    /// Where the alarm was raised.
    pub at: IVec2,
    /// How far it carries, in king moves.
    pub radius: i32,
    /// The player position the alarm reports.
    pub sighting: IVec2,
}

/// Why an awareness transition happened.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cause {
    /// Direct line of sight, or losing it.
    Sight,
    /// A timer ran out with no sight to refresh it.
    Decay,
    /// A comrade's alarm.
    Alarm,
    /// A noisy attack on the mob itself.
    Noise,
}

/// One awareness change, reported per turn for display and auditing.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub enemy: EnemyId,
    pub from: Awareness,
    pub to: Awareness,
    pub cause: Cause,
}

/// Advance one mob's awareness by a turn.
///
/// `visibility` is the mob's own sight query; it is never consulted while
/// the player stands concealed, concealment beats geometry outright. A mob
/// that locks on raises an [`AlertEvent`] for the turn's propagation wave.
pub(crate) fn perceive<F>(
    enemy: &mut Enemy,
    player_pos: IVec2,
    player_concealed: bool,
    visibility: F,
) -> Result<(Option<Transition>, Option<AlertEvent>)>
where
    F: FnOnce(IVec2, i32) -> Result<Seen>,
{
    let seen = !player_concealed
        && visibility(enemy.pos, enemy.vision)?.contains(&player_pos);

    let from = enemy.awareness;
    let mut event = None;

    if seen {
        enemy.last_seen = Some(player_pos);
        match enemy.awareness {
            Awareness::Unaware => {
                enemy.awareness = Awareness::Alert;
                enemy.grace = GRACE_TURNS;
            }
            Awareness::Alert => {
                enemy.grace = enemy.grace.saturating_sub(1);
                if enemy.grace == 0 {
                    enemy.awareness = Awareness::Tracking;
                    enemy.pursuit = PURSUIT_TURNS;
                    event = Some(AlertEvent {
                        source: enemy.id,
                        at: enemy.pos,
                        radius: ALERT_RADIUS,
                        sighting: player_pos,
                    });
                }
            }
            // Perfect tracking, does not degrade while sight holds.
            Awareness::Tracking => {
                enemy.pursuit = PURSUIT_TURNS;
            }
        }
    } else {
        match enemy.awareness {
            Awareness::Unaware => {}
            Awareness::Alert => {
                enemy.grace = enemy.grace.saturating_sub(1);
                if enemy.grace == 0 {
                    forget(enemy);
                }
            }
            Awareness::Tracking => {
                enemy.pursuit = enemy.pursuit.saturating_sub(1);
                if enemy.pursuit == 0 {
                    forget(enemy);
                }
            }
        }
    }

    let transition = (enemy.awareness != from).then(|| {
        let cause = if seen { Cause::Sight } else { Cause::Decay };
        log::debug!(
            "{} {} -> {} ({cause:?})",
            enemy.id,
            from,
            enemy.awareness
        );
        Transition {
            enemy: enemy.id,
            from,
            to: enemy.awareness,
            cause,
        }
    });

    Ok((transition, event))
}

fn forget(enemy: &mut Enemy) {
    enemy.awareness = Awareness::Unaware;
    enemy.last_seen = None;
    enemy.grace = 0;
    enemy.pursuit = 0;
}

/// Carry the turn's collected alarms to every mob in range, as a single
/// wave over the positions the alarms were raised at.
///
/// A wave-alerted mob jumps straight to Tracking, aimed at the reported
/// sighting, and raises its own alarm for downstream display, but the new
/// alarms are not propagated further: one wave per turn, so a chain of
/// alarms cannot sweep the whole network in a single turn.
pub(crate) fn apply_alert_wave(
    enemies: &mut [Enemy],
    wave: &[AlertEvent],
) -> (Vec<Transition>, Vec<AlertEvent>) {
    let mut transitions = Vec::new();
    let mut echoes = Vec::new();

    for enemy in enemies.iter_mut() {
        if enemy.awareness != Awareness::Unaware {
            continue;
        }

        let Some(heard) = wave.iter().find(|ev| {
            ev.source != enemy.id
                && (enemy.pos - ev.at).cheby_len() <= ev.radius
        }) else {
            continue;
        };

        enemy.awareness = Awareness::Tracking;
        enemy.pursuit = PURSUIT_TURNS;
        enemy.last_seen = Some(heard.sighting);
        transitions.push(Transition {
            enemy: enemy.id,
            from: Awareness::Unaware,
            to: Awareness::Tracking,
            cause: Cause::Alarm,
        });
        echoes.push(AlertEvent {
            source: enemy.id,
            at: enemy.pos,
            radius: ALERT_RADIUS,
            sighting: heard.sighting,
        });
    }

    (transitions, echoes)
}
