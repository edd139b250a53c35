pub use crate::{
    Awareness, DetectionMeter, Enemy, EnemyId, Error, Movement, NetworkMap,
    PlayerAction, Result, Runtime, Tile, TurnResult,
};
pub use glam::{ivec2, IVec2};
pub use util::{HashMap, HashSet, VecExt, DIR_4, DIR_8};
