//! Externally supplied tuning data.
//!
//! The engine consumes these tables, it never generates them. Everything
//! here is serde-ready so hosts can load the data from whatever format
//! they keep it in; the `default_*` functions carry the stock tables for
//! hosts that want to start from the classic numbers.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::Movement;

/// How a mob class moves. Concrete routes are map-specific and supplied
/// per spawn.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MovementKind {
    Static,
    Patrol,
    Wander,
}

/// One enemy class from the bestiary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub glyph: char,
    /// Processing pool; doubles as hit points.
    pub cpu: i32,
    /// Contact damage, passed through to the resource layer.
    pub damage: i32,
    /// Sight radius in king moves, 2 to 6.
    pub vision: i32,
    pub movement: MovementKind,
    /// Enters play already tracking the player; the admin avatar does.
    #[serde(default)]
    pub spawns_hunting: bool,
}

impl Archetype {
    /// Seed a spawn of this class at a position.
    pub fn seed(&self, pos: IVec2) -> EnemySeed {
        EnemySeed {
            name: self.name.clone(),
            glyph: self.glyph,
            pos,
            vision: self.vision,
            cpu: self.cpu,
            damage: self.damage,
            movement: match self.movement {
                MovementKind::Static | MovementKind::Patrol => {
                    Movement::Static
                }
                MovementKind::Wander => Movement::Wander,
            },
            spawns_hunting: self.spawns_hunting,
        }
    }

    /// Seed a route-walking spawn of this class. The route is followed
    /// cyclically from its first waypoint.
    pub fn seed_with_route(
        &self,
        pos: IVec2,
        route: Vec<IVec2>,
    ) -> EnemySeed {
        EnemySeed {
            movement: Movement::Patrol { route, next: 0 },
            ..self.seed(pos)
        }
    }
}

/// Everything needed to place one enemy on a network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySeed {
    pub name: String,
    pub glyph: char,
    pub pos: IVec2,
    pub vision: i32,
    pub cpu: i32,
    pub damage: i32,
    pub movement: Movement,
    #[serde(default)]
    pub spawns_hunting: bool,
}

/// One exploit the player can fire, from the loadout table.
///
/// RAM and heat costs are passed through for the resource layer to charge;
/// the core itself consumes only range and damage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExploitSpec {
    pub name: String,
    pub damage: i32,
    pub range: i32,
    pub ram_cost: i32,
    pub heat_cost: i32,
}

/// Per-network tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub name: String,
    /// Detection level that wakes the admin avatar.
    pub avatar_threshold: f32,
    /// The player's own sight radius; augmentations may change it.
    #[serde(default = "default_fov_radius")]
    pub player_fov_radius: i32,
    /// Damage of a bare bump strike.
    #[serde(default = "default_bump_damage")]
    pub bump_damage: i32,
}

fn default_fov_radius() -> i32 {
    15
}

fn default_bump_damage() -> i32 {
    20
}

impl Default for NetworkParams {
    fn default() -> Self {
        NetworkParams {
            name: "Corporate Network".into(),
            avatar_threshold: 100.0,
            player_fov_radius: default_fov_radius(),
            bump_damage: default_bump_damage(),
        }
    }
}

/// The stock bestiary.
pub fn default_archetypes() -> Vec<Archetype> {
    let spec = |name: &str,
                glyph,
                cpu,
                damage,
                vision,
                movement,
                spawns_hunting| Archetype {
        name: name.into(),
        glyph,
        cpu,
        damage,
        vision,
        movement,
        spawns_hunting,
    };

    vec![
        spec("Scanner", 's', 20, 5, 2, MovementKind::Static, false),
        spec("Patrol", 'p', 25, 8, 3, MovementKind::Patrol, false),
        spec("Bot", 'b', 15, 4, 2, MovementKind::Wander, false),
        spec("Firewall", 'F', 40, 10, 2, MovementKind::Static, false),
        spec("Hunter", 'H', 35, 12, 5, MovementKind::Wander, false),
        spec("Admin Avatar", 'A', 100, 20, 6, MovementKind::Wander, true),
    ]
}

/// Stock combat exploits.
pub fn default_exploits() -> Vec<ExploitSpec> {
    vec![
        ExploitSpec {
            name: "Code Injection".into(),
            damage: 30,
            range: 4,
            ram_cost: 1,
            heat_cost: 15,
        },
        ExploitSpec {
            name: "Buffer Overflow".into(),
            damage: 50,
            range: 1,
            ram_cost: 2,
            heat_cost: 25,
        },
    ]
}

/// The stock network ladder and its avatar thresholds.
pub fn default_networks() -> Vec<NetworkParams> {
    [
        ("Training Sandbox", 100.0),
        ("Corporate Network", 100.0),
        ("Government System", 75.0),
        ("Military Backbone", 50.0),
    ]
    .into_iter()
    .map(|(name, avatar_threshold)| NetworkParams {
        name: name.into(),
        avatar_threshold,
        ..Default::default()
    })
    .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tables_are_loadable_from_data() {
        let json = r#"{
            "name": "Sentry",
            "glyph": "S",
            "cpu": 30,
            "damage": 6,
            "vision": 4,
            "movement": "Static"
        }"#;

        let sentry: Archetype = serde_json::from_str(json).unwrap();
        assert_eq!(sentry.vision, 4);
        assert!(!sentry.spawns_hunting);

        let ladder = default_networks();
        assert_eq!(ladder.len(), 4);
        assert_eq!(ladder[2].avatar_threshold, 75.0);
        assert_eq!(ladder[3].avatar_threshold, 50.0);
    }

    #[test]
    fn stock_bestiary_vision_stays_in_band() {
        for spec in default_archetypes() {
            assert!(
                (2..=6).contains(&spec.vision),
                "{} vision {}",
                spec.name,
                spec.vision
            );
        }
    }
}
