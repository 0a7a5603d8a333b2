//! Spatial and containment core for a text dungeon.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`direction`] | Ten movement directions as axis bits, reverse and text lookup |
//! | [`world`] | Object tree, dungeon grids, registry, room links and references, TOML loading |
//! | [`engine`] | Stepping movables between rooms under room policies |
//! | [`error`] | Construction and loading failures |
//!
//! Everything lives in a [`World`]. Objects, dungeons and links are addressed
//! by copyable ids; containers own their contents, while `location` and
//! `dungeon` are plain back references.

pub mod direction;
pub mod engine;
pub mod error;
pub mod world;

pub use direction::Direction;
pub use error::{LoadError, WorldError};
pub use world::{
    Attributes, Coordinates, Dimensions, DungeonId, DungeonOptions, LinkId, ObjectId,
    ObjectOptions, RoomOptions, RoomPolicy, Traversal, World, load_dungeon_from_file,
    load_dungeon_from_str,
};
