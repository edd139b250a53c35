//! Line-of-sight queries over the network map.

use derive_more::{Deref, DerefMut};
use glam::IVec2;
use serde::{Deserialize, Serialize};
use util::HashSet;

use crate::{Error, NetworkMap, Result};

/// Cells revealed to one observer, origin included.
#[derive(
    Clone, Debug, Default, PartialEq, Deref, DerefMut, Serialize, Deserialize,
)]
pub struct Seen(pub HashSet<IVec2>);

/// Every cell with an unobstructed sight line from `origin`, out to
/// `radius` in king moves.
///
/// Walls are visible themselves but stop the sight line at their cell;
/// shadow does not obstruct sight at all (concealment is a property of
/// standing in a shadow, not of looking across one). The result is
/// symmetric for walkable cells: at a shared radius, B is in A's set
/// exactly when A is in B's.
///
/// Sight cannot originate inside a wall or off the grid; such origins fail
/// with [`Error::InvalidOrigin`]. Radius zero reveals only the origin.
/// Results are only valid for the turn they were computed in, since the
/// emitters move every turn.
pub fn visible_cells(
    map: &NetworkMap,
    origin: IVec2,
    radius: i32,
) -> Result<Seen> {
    if !map.contains(origin) || !map.is_walkable(origin) {
        return Err(Error::InvalidOrigin(origin));
    }

    let mut seen = Seen::default();
    fov::compute(
        radius,
        |v: IVec2| map.blocks_sight(origin + v),
        |v: IVec2| {
            if map.contains(origin + v) {
                seen.insert(origin + v);
            }
        },
    );

    Ok(seen)
}
