//! Mobs making their rounds about the network.

use glam::IVec2;
use pathfinding::prelude::astar;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use util::{srng, HashSet, VecExt, DIR_4};

use crate::{Awareness, Enemy, Error, NetworkMap, LOOKAHEAD_STEPS};

/// Movement category of a mob, fixed at spawn.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    /// Never moves on its own.
    Static,
    /// Walks a fixed waypoint route, cycling forever.
    Patrol {
        route: Vec<IVec2>,
        /// Waypoint currently walked towards.
        #[serde(default)]
        next: usize,
    },
    /// Drifts one cell in a random legal direction, or stays put.
    Wander,
}

/// Advance one mob by one turn of movement.
///
/// A mob that is tracking the player hunts its last sighting instead of
/// following its movement category; the category is not replaced and the
/// normal rounds resume once the mob forgets the player. A blocked step is
/// contained: the mob stays put for the turn and the fault is returned for
/// the turn report.
pub(crate) fn advance(
    enemy: &mut Enemy,
    map: &NetworkMap,
    occupied: &HashSet<IVec2>,
    rng: &mut impl Rng,
) -> Option<Error> {
    if enemy.awareness == Awareness::Tracking {
        if let Some(goal) = enemy.last_seen {
            return pursue(enemy, map, occupied, goal);
        }
        return None;
    }

    match &mut enemy.movement {
        Movement::Static => None,
        Movement::Patrol { route, next } => {
            if route.is_empty() {
                return None;
            }
            let mut target = route[*next];
            if enemy.pos == target {
                *next = (*next + 1) % route.len();
                target = route[*next];
            }
            let to = enemy.pos + enemy.pos.dir4_towards(&target);
            if map.is_walkable(to) && !occupied.contains(&to) {
                enemy.pos = to;
                None
            } else {
                Some(Error::IllegalMove {
                    from: enemy.pos,
                    to,
                })
            }
        }
        Movement::Wander => {
            let mut options: Vec<IVec2> = DIR_4
                .iter()
                .map(|&d| enemy.pos + d)
                .filter(|&n| map.is_walkable(n) && !occupied.contains(&n))
                .collect();
            // Staying put is always on the menu.
            options.push(enemy.pos);
            enemy.pos = *options.choose(rng).expect("empty wander options");
            None
        }
    }
}

/// One step of the hunt: shortest walkable path towards the last sighting.
fn pursue(
    enemy: &mut Enemy,
    map: &NetworkMap,
    occupied: &HashSet<IVec2>,
    goal: IVec2,
) -> Option<Error> {
    if enemy.pos == goal {
        // Reached the sighting; stand here until the trail goes cold.
        return None;
    }

    let Some((path, _)) = shortest_path(map, enemy.pos, goal) else {
        // Walled off from the sighting entirely; stand and listen.
        log::debug!("{} cannot path to {goal}", enemy.id);
        return None;
    };

    let to = path[1];
    if occupied.contains(&to) {
        Some(Error::IllegalMove {
            from: enemy.pos,
            to,
        })
    } else {
        enemy.pos = to;
        None
    }
}

fn shortest_path(
    map: &NetworkMap,
    from: IVec2,
    to: IVec2,
) -> Option<(Vec<IVec2>, u32)> {
    astar(
        &from,
        |&p| {
            map.walk_neighbors(p)
                .map(|n| (n, 1u32))
                .collect::<Vec<_>>()
        },
        |&p| (to - p).taxi_len() as u32,
        |&p| p == to,
    )
}

/// Forecast up to [`LOOKAHEAD_STEPS`] future cells of a mob's course for
/// display.
///
/// Forecasts are recomputed from scratch every turn and never contain wall
/// cells. A wander forecast is a legal walk but not a commitment; the real
/// roll happens when the mob moves.
pub(crate) fn predict(
    enemy: &Enemy,
    map: &NetworkMap,
    occupied: &HashSet<IVec2>,
    turn: u64,
) -> Vec<IVec2> {
    let hold = vec![enemy.pos; LOOKAHEAD_STEPS];
    let mut course = Vec::with_capacity(LOOKAHEAD_STEPS);

    if enemy.awareness == Awareness::Tracking {
        // Show the hunt: the next cells along the path to the sighting.
        let Some(goal) = enemy.last_seen.filter(|&g| g != enemy.pos) else {
            return hold;
        };
        let Some((path, _)) = shortest_path(map, enemy.pos, goal) else {
            return hold;
        };
        let last = *path.last().expect("empty astar path");
        for i in 1..=LOOKAHEAD_STEPS {
            course.push(*path.get(i).unwrap_or(&last));
        }
        return course;
    }

    match &enemy.movement {
        Movement::Static => hold,
        Movement::Patrol { route, next } => {
            if route.is_empty() {
                return hold;
            }
            let mut pos = enemy.pos;
            let mut next = *next;
            for _ in 0..LOOKAHEAD_STEPS {
                let mut target = route[next];
                if pos == target {
                    next = (next + 1) % route.len();
                    target = route[next];
                }
                let to = pos + pos.dir4_towards(&target);
                if map.is_walkable(to) && !occupied.contains(&to) {
                    pos = to;
                }
                course.push(pos);
            }
            course
        }
        Movement::Wander => {
            let mut rng = srng(&(enemy.id, turn));
            let mut pos = enemy.pos;
            for _ in 0..LOOKAHEAD_STEPS {
                let mut options: Vec<IVec2> = DIR_4
                    .iter()
                    .map(|&d| pos + d)
                    .filter(|&n| map.is_walkable(n) && !occupied.contains(&n))
                    .collect();
                options.push(pos);
                pos = *options.choose(&mut rng).expect("empty wander options");
                course.push(pos);
            }
            course
        }
    }
}

#[cfg(test)]
mod test {
    use glam::ivec2;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::EnemyId;

    fn mob(pos: IVec2, movement: Movement) -> Enemy {
        Enemy {
            id: EnemyId(1),
            name: "patrol".into(),
            glyph: 'p',
            pos,
            vision: 3,
            movement,
            awareness: Awareness::default(),
            grace: 0,
            pursuit: 0,
            last_seen: None,
            cpu: 25,
            max_cpu: 25,
            damage: 8,
            lookahead: Vec::new(),
        }
    }

    fn square_route() -> Movement {
        Movement::Patrol {
            route: vec![ivec2(1, 1), ivec2(1, 4), ivec2(4, 4), ivec2(4, 1)],
            next: 0,
        }
    }

    #[test]
    fn static_mobs_hold_their_cell() {
        let map = NetworkMap::new();
        let occupied = HashSet::default();
        let mut rng = srng(&"static");
        let mut e = mob(ivec2(7, 7), Movement::Static);

        for _ in 0..5 {
            assert!(advance(&mut e, &map, &occupied, &mut rng).is_none());
            assert_eq!(e.pos, ivec2(7, 7));
        }
        assert_eq!(
            predict(&e, &map, &occupied, 0),
            vec![ivec2(7, 7); LOOKAHEAD_STEPS]
        );
    }

    #[test]
    fn route_patrol_cycles_cell_by_cell() {
        let map = NetworkMap::new();
        let occupied = HashSet::default();
        let mut rng = srng(&"route");
        let mut e = mob(ivec2(1, 1), square_route());

        let mut positions = Vec::new();
        for _ in 0..12 {
            assert!(advance(&mut e, &map, &occupied, &mut rng).is_none());
            positions.push(e.pos);
        }

        // Corners are reached after each three-cell leg and the cycle
        // closes back on the starting waypoint.
        assert_eq!(positions[2], ivec2(1, 4));
        assert_eq!(positions[5], ivec2(4, 4));
        assert_eq!(positions[8], ivec2(4, 1));
        assert_eq!(positions[11], ivec2(1, 1));
    }

    #[test]
    fn route_forecast_matches_the_walk() {
        let map = NetworkMap::new();
        let occupied = HashSet::default();
        let mut rng = srng(&"forecast");
        let mut e = mob(ivec2(1, 1), square_route());

        for turn in 0..16 {
            let forecast = predict(&e, &map, &occupied, turn);
            for _ in 0..LOOKAHEAD_STEPS {
                advance(&mut e, &map, &occupied, &mut rng);
            }
            // A deterministic walker lands exactly where it was forecast.
            assert_eq!(forecast[LOOKAHEAD_STEPS - 1], e.pos);
        }
    }

    #[test]
    fn blocked_patrol_step_is_contained() {
        let map = NetworkMap::new();
        let mut rng = srng(&"blocked");
        let mut e = mob(ivec2(1, 1), square_route());
        // A colleague is parked on the route.
        let occupied = HashSet::from_iter([ivec2(1, 2)]);

        let fault = advance(&mut e, &map, &occupied, &mut rng);
        assert_eq!(
            fault,
            Some(Error::IllegalMove {
                from: ivec2(1, 1),
                to: ivec2(1, 2)
            })
        );
        assert_eq!(e.pos, ivec2(1, 1));
    }

    #[test]
    fn wander_only_takes_legal_steps() {
        let map = NetworkMap::from_ascii(
            "#####
             #...#
             #.#.#
             #...#
             #####",
        )
        .unwrap();
        let occupied = HashSet::from_iter([ivec2(3, 1)]);
        let mut rng = srng(&"wander");
        let mut e = mob(ivec2(1, 1), Movement::Wander);

        for _ in 0..50 {
            let prev = e.pos;
            assert!(advance(&mut e, &map, &occupied, &mut rng).is_none());
            assert!((e.pos - prev).taxi_len() <= 1);
            assert!(map.is_walkable(e.pos));
            assert!(!occupied.contains(&e.pos));
        }
    }

    #[test]
    fn wander_forecast_is_a_legal_walk() {
        let map = NetworkMap::from_ascii(
            "#####
             #...#
             #.#.#
             #...#
             #####",
        )
        .unwrap();
        let occupied = HashSet::default();
        let e = mob(ivec2(1, 1), Movement::Wander);

        let forecast = predict(&e, &map, &occupied, 9);
        assert_eq!(forecast.len(), LOOKAHEAD_STEPS);
        let mut prev = e.pos;
        for cell in forecast {
            assert!((cell - prev).taxi_len() <= 1);
            assert!(map.is_walkable(cell));
            prev = cell;
        }
        // Same turn, same forecast; the next turn may differ.
        assert_eq!(
            predict(&e, &map, &occupied, 9),
            predict(&e, &map, &occupied, 9)
        );
    }

    #[test]
    fn tracking_hunts_around_walls() {
        let map = NetworkMap::from_ascii(
            "#######
             #.#...#
             #.#.#.#
             #...#.#
             #######",
        )
        .unwrap();
        let occupied = HashSet::default();
        let mut rng = srng(&"hunt");
        let mut e = mob(ivec2(1, 1), Movement::Static);
        e.awareness = Awareness::Tracking;
        e.last_seen = Some(ivec2(5, 1));

        let forecast = predict(&e, &map, &occupied, 0);
        assert_eq!(forecast[0], ivec2(1, 2));

        let mut steps = 0;
        while e.pos != ivec2(5, 1) {
            assert!(advance(&mut e, &map, &occupied, &mut rng).is_none());
            steps += 1;
            assert!(steps < 20, "hunt did not converge");
        }
        // Shortest path through the S-bend.
        assert_eq!(steps, 8);

        // Arrived with the player gone: stand and wait.
        advance(&mut e, &map, &occupied, &mut rng);
        assert_eq!(e.pos, ivec2(5, 1));
    }

    #[test]
    fn tracking_step_into_occupied_cell_is_contained() {
        let map = NetworkMap::new();
        let mut rng = srng(&"jam");
        let mut e = mob(ivec2(3, 3), Movement::Static);
        e.awareness = Awareness::Tracking;
        e.last_seen = Some(ivec2(6, 3));
        let occupied = HashSet::from_iter([ivec2(4, 3)]);

        let fault = advance(&mut e, &map, &occupied, &mut rng);
        assert_eq!(
            fault,
            Some(Error::IllegalMove {
                from: ivec2(3, 3),
                to: ivec2(4, 3)
            })
        );
        assert_eq!(e.pos, ivec2(3, 3));
    }
}
