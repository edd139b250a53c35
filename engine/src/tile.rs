use serde::{Deserialize, Serialize};

/// Terrain of a single network map cell.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize,
)]
#[serde(try_from = "char", into = "char")]
pub enum Tile {
    #[default]
    Wall,
    Floor,
    /// Dead zone in the surveillance grid. Does not obstruct sight lines,
    /// but whoever stands in one cannot be seen at all.
    Shadow,
}

use Tile::*;

impl Tile {
    pub fn blocks_sight(self) -> bool {
        matches!(self, Wall)
    }

    pub fn is_walkable(self) -> bool {
        !matches!(self, Wall)
    }

    /// Whether a mob standing here is hidden from every observer.
    pub fn conceals(self) -> bool {
        matches!(self, Shadow)
    }
}

impl TryFrom<char> for Tile {
    type Error = &'static str;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(Floor),
            '#' => Ok(Wall),
            ',' => Ok(Shadow),
            _ => Err("invalid terrain char"),
        }
    }
}

impl From<Tile> for char {
    fn from(val: Tile) -> Self {
        // NB. This must match Tile's TryFrom inputs above.
        match val {
            Floor => '.',
            Wall => '#',
            Shadow => ',',
        }
    }
}
