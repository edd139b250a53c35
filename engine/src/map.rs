//! Static tile map of one network.

use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};
use util::DIR_4;

use crate::{Error, Result, Tile, NETWORK_SIZE};

/// The tile grid of the current network instance.
///
/// Fixed 50×50 cells, immutable during play. Queries treat everything
/// outside the grid as solid wall, so out-of-bounds positions can never be
/// walked on, seen through or hidden in.
#[derive(Clone, Serialize, Deserialize)]
pub struct NetworkMap {
    tiles: Vec<Tile>,
}

impl Default for NetworkMap {
    /// An open floor ringed by the boundary wall.
    fn default() -> Self {
        let mut map = NetworkMap {
            tiles: vec![Tile::Floor; (NETWORK_SIZE * NETWORK_SIZE) as usize],
        };
        for i in 0..NETWORK_SIZE {
            map.set_tile(ivec2(i, 0), Tile::Wall);
            map.set_tile(ivec2(i, NETWORK_SIZE - 1), Tile::Wall);
            map.set_tile(ivec2(0, i), Tile::Wall);
            map.set_tile(ivec2(NETWORK_SIZE - 1, i), Tile::Wall);
        }
        map
    }
}

impl NetworkMap {
    pub fn new() -> Self {
        Default::default()
    }

    /// Build a map from an externally supplied character layout.
    ///
    /// Rows shorter than the grid and rows beyond the last line pad out
    /// with wall, so layouts smaller than the full grid describe a sealed
    /// pocket of it.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let mut map = NetworkMap {
            tiles: vec![Tile::Wall; (NETWORK_SIZE * NETWORK_SIZE) as usize],
        };

        for (y, line) in text.trim_matches('\n').lines().enumerate() {
            if y as i32 >= NETWORK_SIZE {
                return Err(Error::BadLayout(format!(
                    "more than {NETWORK_SIZE} rows"
                )));
            }
            for (x, c) in line.trim().chars().enumerate() {
                if x as i32 >= NETWORK_SIZE {
                    return Err(Error::BadLayout(format!(
                        "row {y} wider than {NETWORK_SIZE} cells"
                    )));
                }
                let tile = Tile::try_from(c)
                    .map_err(|e| Error::BadLayout(format!("({x}, {y}): {e}")))?;
                map.set_tile(ivec2(x as i32, y as i32), tile);
            }
        }

        Ok(map)
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        (0..NETWORK_SIZE).contains(&pos.x) && (0..NETWORK_SIZE).contains(&pos.y)
    }

    /// Tile at `pos`; out-of-bounds reads as wall.
    pub fn tile(&self, pos: IVec2) -> Tile {
        if self.contains(pos) {
            self.tiles[(pos.y * NETWORK_SIZE + pos.x) as usize]
        } else {
            Tile::Wall
        }
    }

    /// Change a tile while setting the network up. Out-of-bounds writes are
    /// ignored.
    pub fn set_tile(&mut self, pos: IVec2, tile: Tile) {
        if self.contains(pos) {
            self.tiles[(pos.y * NETWORK_SIZE + pos.x) as usize] = tile;
        }
    }

    pub fn is_walkable(&self, pos: IVec2) -> bool {
        self.tile(pos).is_walkable()
    }

    pub fn blocks_sight(&self, pos: IVec2) -> bool {
        self.tile(pos).blocks_sight()
    }

    /// Whether a mob standing at `pos` is hidden from every observer.
    pub fn conceals(&self, pos: IVec2) -> bool {
        self.tile(pos).conceals()
    }

    /// Walkable cardinal neighbors of `pos`.
    pub fn walk_neighbors(
        &self,
        pos: IVec2,
    ) -> impl Iterator<Item = IVec2> + '_ {
        DIR_4
            .into_iter()
            .map(move |d| pos + d)
            .filter(|&n| self.is_walkable(n))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascii_layout() {
        let map = NetworkMap::from_ascii(
            "####
             #.,#
             ####",
        )
        .unwrap();

        assert_eq!(map.tile(ivec2(1, 1)), Tile::Floor);
        assert_eq!(map.tile(ivec2(2, 1)), Tile::Shadow);
        assert_eq!(map.tile(ivec2(0, 0)), Tile::Wall);
        // Cells beyond the layout pad out as wall.
        assert_eq!(map.tile(ivec2(10, 10)), Tile::Wall);

        assert!(NetworkMap::from_ascii("..x..").is_err());
    }

    #[test]
    fn out_of_bounds_is_wall() {
        let map = NetworkMap::new();
        assert!(!map.contains(ivec2(-1, 5)));
        assert!(!map.contains(ivec2(5, NETWORK_SIZE)));
        assert_eq!(map.tile(ivec2(-1, 5)), Tile::Wall);
        assert!(!map.is_walkable(ivec2(5, -1)));
        assert!(map.blocks_sight(ivec2(NETWORK_SIZE, 0)));
    }

    #[test]
    fn walk_neighbors_skip_walls() {
        let map = NetworkMap::from_ascii(
            "#####
             #...#
             #.#.#
             #####",
        )
        .unwrap();

        let ns: Vec<IVec2> = map.walk_neighbors(ivec2(1, 1)).collect();
        assert_eq!(ns, vec![ivec2(2, 1), ivec2(1, 2)]);
    }
}
