//! Turn orchestration.

use glam::IVec2;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use util::{GameRng, HashSet, VecExt};

use crate::{
    combat::{self, AttackKind, Outcome},
    patrol, perception, sight, AlertEvent, Awareness, Cause, DetectionMeter,
    Enemy, EnemyId, EnemySeed, Error, NetworkMap, NetworkParams,
    PlayerAction, Result, Seen, Transition, ALERT_RADIUS, PURSUIT_TURNS,
};

/// The player's presence on the network.
///
/// Durable resources (CPU, RAM, heat) belong to the resource layer
/// outside the core; the engine only needs to know where the player is.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: IVec2,
}

/// Checkpoints of the turn loop.
///
/// A turn is resolved synchronously inside [`Runtime::process_turn`], so
/// from the caller's side the machine always rests at `Idle`; the other
/// states are the checkpoints the pipeline passes through while it runs,
/// in order: an action is accepted, the phases resolve, the result is
/// assembled, and the loop returns to `Idle` for the next turn.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize,
)]
pub enum TurnPhase {
    /// Between turns.
    #[default]
    Idle,
    /// An action has been received and is being validated.
    AwaitingPlayerAction,
    /// The fixed phase pipeline is running.
    Resolving,
    /// The result is assembled but not yet published.
    Complete,
}

/// A contained fault: the step it describes did not happen, the turn went
/// on regardless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The faulting mob, or None when the player's own deferred attack
    /// fizzled because its target moved during the turn.
    pub enemy: Option<EnemyId>,
    pub error: Error,
}

/// A mob destroyed this turn. Consumed by the resource layer for salvage.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    pub enemy: EnemyId,
    pub at: IVec2,
    /// The kill was a silent stealth strike.
    pub stealthy: bool,
}

/// Display-ready snapshot of one enemy after a turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub name: String,
    pub glyph: char,
    pub pos: IVec2,
    pub awareness: Awareness,
    pub lookahead: Vec<IVec2>,
}

/// Everything one resolved turn produced, for downstream consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub turn: u64,
    pub player_pos: IVec2,
    /// The player's own fog-of-war reveal this turn.
    pub player_fov: Seen,
    pub detection: f32,
    pub avatar_active: bool,
    /// The avatar threshold was crossed this very turn.
    pub avatar_activated: bool,
    pub enemies: Vec<EnemyView>,
    pub transitions: Vec<Transition>,
    pub alerts: Vec<AlertEvent>,
    pub outcome: Option<Outcome>,
    pub kills: Vec<KillEvent>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Player intent after validation. Attack resolution is deferred to the
/// end of the phase pipeline, so the intent pins the target down now.
#[derive(Copy, Clone)]
enum Intent {
    Wait,
    Move(IVec2),
    Attack {
        target: EnemyId,
        kind: AttackKind,
        damage: i32,
        range: i32,
    },
}

/// Owns one network instance and advances it a turn at a time.
///
/// All mutation of the map, the enemy collection and the detection meter
/// happens inside [`Runtime::process_turn`], in a fixed phase order with
/// enemies walked in ascending id, so a replay with identical inputs and
/// seed resolves identically.
#[derive(Clone, Serialize, Deserialize)]
pub struct Runtime {
    map: NetworkMap,
    params: NetworkParams,
    player: Player,
    enemies: Vec<Enemy>,
    meter: DetectionMeter,
    rng: GameRng,
    turn: u64,
    next_id: u32,
    phase: TurnPhase,
}

impl Runtime {
    pub fn new(
        map: NetworkMap,
        params: NetworkParams,
        player_pos: IVec2,
    ) -> Result<Self> {
        if !map.is_walkable(player_pos) {
            return Err(Error::InvalidOrigin(player_pos));
        }

        let meter = DetectionMeter::new(params.avatar_threshold);
        Ok(Runtime {
            map,
            params,
            player: Player { pos: player_pos },
            enemies: Vec::new(),
            meter,
            rng: GameRng::seed_from_u64(0xdeadbeef),
            turn: 0,
            next_id: 0,
            phase: TurnPhase::Idle,
        })
    }

    /// Replace the engine RNG seed. Only meaningful before the first turn.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = GameRng::seed_from_u64(seed);
        self
    }

    /// Place one enemy from its seed. Spawning is host policy (placement
    /// comes from the network generator, outside the core); the engine
    /// only checks the spawn is legal.
    pub fn spawn_enemy(&mut self, seed: EnemySeed) -> Result<EnemyId> {
        if !self.map.is_walkable(seed.pos) {
            return Err(Error::InvalidOrigin(seed.pos));
        }
        if self.occupied(seed.pos) {
            return Err(Error::IllegalMove {
                from: seed.pos,
                to: seed.pos,
            });
        }
        if let crate::Movement::Patrol { ref route, .. } = seed.movement {
            if let Some(&bad) =
                route.iter().find(|&&w| !self.map.is_walkable(w))
            {
                return Err(Error::BadLayout(format!(
                    "route waypoint {bad} is not walkable"
                )));
            }
        }

        let id = EnemyId(self.next_id);
        self.next_id += 1;

        let mut enemy = Enemy {
            id,
            name: seed.name,
            glyph: seed.glyph,
            pos: seed.pos,
            vision: seed.vision,
            movement: seed.movement,
            awareness: Awareness::Unaware,
            grace: 0,
            pursuit: 0,
            last_seen: None,
            cpu: seed.cpu,
            max_cpu: seed.cpu,
            damage: seed.damage,
            lookahead: Vec::new(),
        };
        if seed.spawns_hunting {
            enemy.awareness = Awareness::Tracking;
            enemy.pursuit = PURSUIT_TURNS;
            enemy.last_seen = Some(self.player.pos);
        }

        let mut occupied = self.occupied_set();
        occupied.remove(&enemy.pos);
        enemy.lookahead =
            patrol::predict(&enemy, &self.map, &occupied, self.turn);

        self.enemies.push(enemy);
        Ok(id)
    }

    pub fn map(&self) -> &NetworkMap {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_at(&self, pos: IVec2) -> Option<EnemyId> {
        self.enemies.iter().find(|e| e.pos == pos).map(|e| e.id)
    }

    pub fn detection(&self) -> &DetectionMeter {
        &self.meter
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Sight query against this network's map; see
    /// [`crate::visible_cells`].
    pub fn visible_cells(&self, origin: IVec2, radius: i32) -> Result<Seen> {
        sight::visible_cells(&self.map, origin, radius)
    }

    /// Externally triggered detection relief (log wipes, data patches).
    pub fn suppress_detection(&mut self, amount: f32) {
        self.meter.suppress(amount);
    }

    /// Resolve one full turn from the player's action.
    ///
    /// The fixed phase order: player action, every mob's movement,
    /// every mob's perception against the post-move snapshot, the alarm
    /// wave, the detection meter, and last the player's attack if one was
    /// declared. A rejected action returns an error with nothing mutated;
    /// contained per-mob faults ride along in the result instead.
    pub fn process_turn(&mut self, action: PlayerAction) -> Result<TurnResult> {
        self.phase = TurnPhase::AwaitingPlayerAction;
        let intent = match self.validate(&action) {
            Ok(intent) => intent,
            Err(e) => {
                self.phase = TurnPhase::Idle;
                return Err(e);
            }
        };

        self.phase = TurnPhase::Resolving;
        self.turn += 1;

        let mut transitions: Vec<Transition> = Vec::new();
        let mut alerts: Vec<AlertEvent> = Vec::new();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut kills: Vec<KillEvent> = Vec::new();
        let mut outcome: Option<Outcome> = None;

        // Player phase. Attacks were pinned down in the intent and resolve
        // at the end of the pipeline.
        if let Intent::Move(to) = intent {
            self.player.pos = to;
        }

        // Movement phase. Each mob sees the cells earlier mobs already
        // vacated or claimed this turn.
        let mut occupied = self.occupied_set();
        for i in 0..self.enemies.len() {
            occupied.remove(&self.enemies[i].pos);
            let fault = patrol::advance(
                &mut self.enemies[i],
                &self.map,
                &occupied,
                &mut self.rng,
            );
            occupied.insert(self.enemies[i].pos);
            if let Some(error) = fault {
                log::debug!("{}: {error}", self.enemies[i].id);
                diagnostics.push(Diagnostic {
                    enemy: Some(self.enemies[i].id),
                    error,
                });
            }
        }

        // Perception phase, against the post-move snapshot.
        let player_pos = self.player.pos;
        let concealed = self.map.conceals(player_pos);
        let mut wave: Vec<AlertEvent> = Vec::new();
        for i in 0..self.enemies.len() {
            let map = &self.map;
            let (transition, event) = perception::perceive(
                &mut self.enemies[i],
                player_pos,
                concealed,
                |origin, vision| sight::visible_cells(map, origin, vision),
            )
            .map_err(|e| {
                Error::InvariantViolation(format!(
                    "sight query from a mob cell failed: {e}"
                ))
            })?;
            transitions.extend(transition);
            if let Some(ev) = event {
                alerts.push(ev);
                wave.push(ev);
            }
        }

        // Alarm wave: one pass, no chaining.
        let (wave_transitions, echoes) =
            perception::apply_alert_wave(&mut self.enemies, &wave);
        transitions.extend(wave_transitions);
        alerts.extend(echoes);

        // The meter breathes.
        let alert_n = self
            .enemies
            .iter()
            .filter(|e| e.awareness == Awareness::Alert)
            .count();
        let tracking_n = self
            .enemies
            .iter()
            .filter(|e| e.awareness == Awareness::Tracking)
            .count();
        let avatar_activated = self.meter.apply_turn(alert_n, tracking_n);
        if avatar_activated {
            log::info!(
                "detection {:.1} crossed {:.1}, admin avatar activated",
                self.meter.value(),
                self.meter.threshold()
            );
        }

        // Deferred attack resolution. The target may have moved during the
        // phases; a precondition that no longer holds downgrades to a
        // diagnostic instead of failing the already-resolved turn.
        if let Intent::Attack {
            target,
            kind,
            damage,
            range,
        } = intent
        {
            if let Some(idx) =
                self.enemies.iter().position(|e| e.id == target)
            {
                let attacker = self.player.pos;
                let target_pos = self.enemies[idx].pos;
                let before = self.enemies[idx].awareness;
                let map = &self.map;
                match combat::resolve(
                    attacker,
                    damage,
                    kind,
                    range,
                    &mut self.enemies[idx],
                    || {
                        sight::visible_cells(map, attacker, range)
                            .map(|s| s.contains(&target_pos))
                    },
                ) {
                    Ok(o) => {
                        if o.killed {
                            log::debug!("{} destroyed at {target_pos}", target);
                            kills.push(KillEvent {
                                enemy: o.target,
                                at: target_pos,
                                stealthy: o.stealth_applied,
                            });
                            self.enemies.remove(idx);
                        } else if o.noise_emitted
                            && before != Awareness::Tracking
                        {
                            transitions.push(Transition {
                                enemy: o.target,
                                from: before,
                                to: Awareness::Tracking,
                                cause: Cause::Noise,
                            });
                            alerts.push(AlertEvent {
                                source: o.target,
                                at: target_pos,
                                radius: ALERT_RADIUS,
                                sighting: attacker,
                            });
                        }
                        outcome = Some(o);
                    }
                    Err(
                        error @ (Error::OutOfRange { .. }
                        | Error::NoLineOfSight),
                    ) => {
                        diagnostics.push(Diagnostic { enemy: None, error });
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        // Forecast phase: fresh lookahead for every surviving mob.
        let mut occupied = self.occupied_set();
        for i in 0..self.enemies.len() {
            let pos = self.enemies[i].pos;
            occupied.remove(&pos);
            self.enemies[i].lookahead = patrol::predict(
                &self.enemies[i],
                &self.map,
                &occupied,
                self.turn,
            );
            occupied.insert(pos);
        }

        // The player's own reveal.
        let player_fov = sight::visible_cells(
            &self.map,
            self.player.pos,
            self.params.player_fov_radius,
        )?;

        self.audit(&transitions)?;

        self.phase = TurnPhase::Complete;
        let result = TurnResult {
            turn: self.turn,
            player_pos: self.player.pos,
            player_fov,
            detection: self.meter.value(),
            avatar_active: self.meter.avatar_active(),
            avatar_activated,
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    name: e.name.clone(),
                    glyph: e.glyph,
                    pos: e.pos,
                    awareness: e.awareness,
                    lookahead: e.lookahead.clone(),
                })
                .collect(),
            transitions,
            alerts,
            outcome,
            kills,
            diagnostics,
        };
        self.phase = TurnPhase::Idle;

        Ok(result)
    }

    fn validate(&self, action: &PlayerAction) -> Result<Intent> {
        match *action {
            PlayerAction::Wait => Ok(Intent::Wait),
            PlayerAction::Step(dir) => self.validate_step(dir, false),
            PlayerAction::Bump(dir) => self.validate_step(dir, true),
            PlayerAction::Exploit { ref spec, target } => {
                let id =
                    self.enemy_at(target).ok_or(Error::NoTarget(target))?;
                let distance = (target - self.player.pos).cheby_len();
                if distance > spec.range {
                    return Err(Error::OutOfRange {
                        range: spec.range,
                        distance,
                    });
                }
                let seen = sight::visible_cells(
                    &self.map,
                    self.player.pos,
                    spec.range,
                )?;
                if !seen.contains(&target) {
                    return Err(Error::NoLineOfSight);
                }
                Ok(Intent::Attack {
                    target: id,
                    kind: AttackKind::RangedExploit,
                    damage: spec.damage,
                    range: spec.range,
                })
            }
        }
    }

    fn validate_step(&self, dir: IVec2, smart: bool) -> Result<Intent> {
        let from = self.player.pos;
        let to = from + dir;
        if !dir.is_adjacent() {
            return Err(Error::IllegalMove { from, to });
        }
        if smart {
            if let Some(target) = self.enemy_at(to) {
                return Ok(Intent::Attack {
                    target,
                    kind: AttackKind::Bump,
                    damage: self.params.bump_damage,
                    range: 1,
                });
            }
        }
        if !self.map.is_walkable(to) || self.occupied(to) {
            return Err(Error::IllegalMove { from, to });
        }
        Ok(Intent::Move(to))
    }

    fn occupied(&self, pos: IVec2) -> bool {
        pos == self.player.pos || self.enemies.iter().any(|e| e.pos == pos)
    }

    fn occupied_set(&self) -> HashSet<IVec2> {
        let mut set: HashSet<IVec2> =
            self.enemies.iter().map(|e| e.pos).collect();
        set.insert(self.player.pos);
        set
    }

    /// Check the hard guarantees after a turn. A failure here is a bug in
    /// the engine itself, not anything the caller can recover from.
    fn audit(&self, transitions: &[Transition]) -> Result<()> {
        let v = self.meter.value();
        if !(0.0..=100.0).contains(&v) {
            return Err(Error::InvariantViolation(format!(
                "detection {v} out of range"
            )));
        }

        for t in transitions {
            if t.cause == Cause::Sight
                && t.from == Awareness::Unaware
                && t.to == Awareness::Tracking
            {
                return Err(Error::InvariantViolation(format!(
                    "{} escalated two steps on sight",
                    t.enemy
                )));
            }
        }

        for e in &self.enemies {
            if !self.map.is_walkable(e.pos) {
                return Err(Error::InvariantViolation(format!(
                    "{} standing in a wall at {}",
                    e.id, e.pos
                )));
            }
            if e.lookahead.iter().any(|&c| !self.map.is_walkable(c)) {
                return Err(Error::InvariantViolation(format!(
                    "{} forecast crosses a wall",
                    e.id
                )));
            }
        }

        Ok(())
    }
}
