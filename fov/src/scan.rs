/// Slope of a sight line through cell corners, kept as an exact fraction so
/// repeated scans never drift.
///
/// Denominator is always positive, comparisons cross-multiply.
#[derive(Copy, Clone, Debug)]
struct Slope {
    num: i32,
    den: i32,
}

impl Slope {
    /// Slope grazing the near corner of the cell at (depth, col).
    fn corner(depth: i32, col: i32) -> Slope {
        Slope {
            num: 2 * col - 1,
            den: 2 * depth,
        }
    }
}

/// One scanned row of a quadrant: every cell at `depth` whose center line
/// falls between the start and end slopes.
#[derive(Copy, Clone)]
struct Row {
    depth: i32,
    start: Slope,
    end: Slope,
}

impl Row {
    /// First column of the row, ties rounding away from the start edge.
    fn min_col(&self) -> i32 {
        // round_ties_up(depth * start)
        (2 * self.depth * self.start.num + self.start.den)
            .div_euclid(2 * self.start.den)
    }

    /// Last column of the row, ties rounding away from the end edge.
    fn max_col(&self) -> i32 {
        // round_ties_down(depth * end)
        let num = 2 * self.depth * self.end.num - self.end.den;
        let den = 2 * self.end.den;
        // Ceiling division for possibly negative numerators.
        -((-num).div_euclid(den))
    }

    /// Whether the cell center at `col` is inside the unobstructed slope
    /// interval. Cells that only clip the row edges fail this and are left
    /// for a neighboring quadrant, which is what makes the scan symmetric.
    fn sees_center(&self, col: i32) -> bool {
        col * self.start.den >= self.depth * self.start.num
            && col * self.end.den <= self.depth * self.end.num
    }
}

/// Map a (depth, col) cell of a quadrant into a grid offset from the origin.
fn transform(quadrant: usize, depth: i32, col: i32) -> [i32; 2] {
    match quadrant {
        0 => [col, -depth],
        1 => [depth, col],
        2 => [col, depth],
        3 => [-depth, col],
        _ => unreachable!(),
    }
}

struct Caster<V, B, R> {
    radius: i32,
    blocks_sight: B,
    reveal: R,
    phantom: std::marker::PhantomData<V>,
}

impl<V, B, R> Caster<V, B, R>
where
    V: From<[i32; 2]>,
    B: FnMut(V) -> bool,
    R: FnMut(V),
{
    fn blocks(&mut self, quadrant: usize, depth: i32, col: i32) -> bool {
        (self.blocks_sight)(transform(quadrant, depth, col).into())
    }

    fn scan(&mut self, quadrant: usize, mut row: Row) {
        if row.depth > self.radius {
            return;
        }

        // Whether the previously examined cell was a wall; None at row
        // start.
        let mut prev_wall: Option<bool> = None;

        for col in row.min_col()..=row.max_col() {
            let wall = self.blocks(quadrant, row.depth, col);

            if wall || row.sees_center(col) {
                (self.reveal)(transform(quadrant, row.depth, col).into());
            }

            match (prev_wall, wall) {
                // Sight reopens past the end of a wall run.
                (Some(true), false) => {
                    row.start = Slope::corner(row.depth, col);
                }
                // A wall run begins; the open span before it continues on
                // the next row, clipped to the wall's near corner.
                (Some(false), true) => {
                    self.scan(
                        quadrant,
                        Row {
                            depth: row.depth + 1,
                            start: row.start,
                            end: Slope::corner(row.depth, col),
                        },
                    );
                }
                _ => {}
            }

            prev_wall = Some(wall);
        }

        // The row ended in the open, carry the remaining span forward.
        if prev_wall == Some(false) {
            self.scan(
                quadrant,
                Row {
                    depth: row.depth + 1,
                    ..row
                },
            );
        }
    }
}

/// Sweep every cell visible from the origin, out to `radius` in Chebyshev
/// distance.
///
/// Both callbacks work in offsets relative to the origin. `blocks_sight`
/// reports whether a cell stops sight lines; such cells are revealed
/// themselves but hide everything behind them. `reveal` receives every
/// visible cell, the origin first; cells on quadrant seams may be reported
/// more than once.
///
/// The scan is symmetric: for any two non-blocking cells A and B and a
/// shared radius, B is revealed from A exactly when A is revealed from B.
pub fn compute<V, B, R>(radius: i32, blocks_sight: B, mut reveal: R)
where
    V: From<[i32; 2]> + Copy,
    B: FnMut(V) -> bool,
    R: FnMut(V),
{
    reveal([0, 0].into());

    if radius <= 0 {
        return;
    }

    let mut caster = Caster {
        radius,
        blocks_sight,
        reveal,
        phantom: Default::default(),
    };

    for quadrant in 0..4 {
        caster.scan(
            quadrant,
            Row {
                depth: 1,
                start: Slope { num: -1, den: 1 },
                end: Slope { num: 1, den: 1 },
            },
        );
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    /// Parse a fixture into (walls, origin). '#' is a wall, '@' the origin.
    fn parse(map: &str) -> (HashSet<[i32; 2]>, [i32; 2]) {
        let mut walls = HashSet::new();
        let mut origin = None;

        for (y, line) in map.trim().lines().enumerate() {
            for (x, c) in line.trim().chars().enumerate() {
                let pos = [x as i32, y as i32];
                match c {
                    '#' => {
                        walls.insert(pos);
                    }
                    '@' => origin = Some(pos),
                    _ => {}
                }
            }
        }

        (walls, origin.expect("fixture has no origin"))
    }

    fn visible_from(
        walls: &HashSet<[i32; 2]>,
        origin: [i32; 2],
        radius: i32,
    ) -> HashSet<[i32; 2]> {
        let mut seen = HashSet::new();
        compute(
            radius,
            |v: [i32; 2]| walls.contains(&[origin[0] + v[0], origin[1] + v[1]]),
            |v: [i32; 2]| {
                seen.insert([origin[0] + v[0], origin[1] + v[1]]);
            },
        );
        seen
    }

    #[test]
    fn zero_radius_sees_only_origin() {
        let (walls, origin) = parse(
            "....
             .@..
             ....",
        );
        let seen = visible_from(&walls, origin, 0);
        assert_eq!(seen, HashSet::from([origin]));
    }

    #[test]
    fn radius_bounds_are_chebyshev() {
        let (walls, origin) = parse(
            ".........
             .........
             .........
             ....@....
             .........
             .........
             .........",
        );
        let seen = visible_from(&walls, origin, 2);

        for x in 0..9 {
            for y in 0..7 {
                let d = (x - origin[0]).abs().max((y - origin[1]).abs());
                assert_eq!(
                    seen.contains(&[x, y]),
                    d <= 2,
                    "cell ({x}, {y}) at distance {d}"
                );
            }
        }
    }

    #[test]
    fn wall_is_seen_but_hides_cells_behind_it() {
        let (walls, origin) = parse(
            "....#....
             ....#....
             ....@....",
        );
        let seen = visible_from(&walls, origin, 8);

        // The near wall is visible, the cell behind it is not.
        assert!(seen.contains(&[4, 1]));
        assert!(!seen.contains(&[4, 0]));
    }

    #[test]
    fn pillar_casts_a_widening_shadow() {
        let (walls, origin) = parse(
            ".........
             .........
             .........
             ....#....
             ....@....",
        );
        let seen = visible_from(&walls, origin, 8);

        assert!(seen.contains(&[4, 3]));
        for y in 0..3 {
            assert!(!seen.contains(&[4, y]), "cell (4, {y}) behind pillar");
        }
        // Cells well to the side of the shadow stay visible.
        assert!(seen.contains(&[0, 0]));
        assert!(seen.contains(&[8, 0]));
    }

    #[test]
    fn closed_room_reveals_exactly_its_interior_and_walls() {
        let (walls, origin) = parse(
            "#####....
             #...#....
             #.@.#....
             #...#....
             #####....",
        );
        let seen = visible_from(&walls, origin, 10);

        for pos in &seen {
            let inside = (0..=4).contains(&pos[0]) && (0..=4).contains(&pos[1]);
            assert!(inside, "cell {pos:?} leaked through the room walls");
        }
        // Whole interior is in view.
        for x in 1..4 {
            for y in 1..4 {
                assert!(seen.contains(&[x, y]));
            }
        }
    }

    #[test]
    fn floor_visibility_is_symmetric() {
        let (walls, _) = parse(
            "..#....@..
             ....#.....
             .#...#.#..
             ......#...
             ..#.......
             .....#..#.
             .@........",
        );

        let floors: Vec<[i32; 2]> = (0..10)
            .flat_map(|x| (0..7).map(move |y| [x, y]))
            .filter(|p| !walls.contains(p))
            .collect();

        for &a in &floors {
            let from_a = visible_from(&walls, a, 16);
            for &b in &floors {
                let from_b = visible_from(&walls, b, 16);
                assert_eq!(
                    from_a.contains(&b),
                    from_b.contains(&a),
                    "asymmetry between {a:?} and {b:?}"
                );
            }
        }
    }
}
