mod containment;
mod dungeon;
mod links;
mod loader;
mod model;
mod policy;
mod reference;
mod validator;

pub use loader::{
    DungeonFile, DungeonHeader, LoadedDungeon, ObjectConfig, RoomConfig, TunnelConfig,
    load_dungeon_from_file, load_dungeon_from_str,
};

pub use model::{
    Attributes, Coordinates, Dimensions, Dungeon, DungeonId, DungeonOptions, LinkId,
    MovableState, Object, ObjectId, ObjectKind, ObjectOptions, RoomLink, RoomOptions, RoomState,
    World,
};
pub use policy::{OpenRoom, RoomPolicy, SealedRoom, Traversal};
pub use reference::{RoomRef, parse_room_ref};
pub use validator::{ValidationError, validate_dungeon_file};
