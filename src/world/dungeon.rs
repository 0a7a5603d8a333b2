use tracing::{debug, trace};

use crate::direction::Direction;
use crate::error::WorldError;

use super::model::{
    Coordinates, Dungeon, DungeonId, DungeonOptions, Object, ObjectId, ObjectKind, RoomOptions,
    RoomState, World,
};
use super::reference::is_referable_id;

impl World {
    /// Allocate a dungeon grid. With an id, the dungeon is registered; the
    /// id must be usable in a room reference and not already taken.
    pub fn create_dungeon(&mut self, options: DungeonOptions) -> Result<DungeonId, WorldError> {
        if let Some(id) = &options.id {
            if !is_referable_id(id) {
                return Err(WorldError::InvalidDungeonId(id.clone()));
            }
            if self.registry.contains_key(id) {
                return Err(WorldError::DuplicateDungeonId(id.clone()));
            }
        }

        let dungeon_id = DungeonId(self.dungeons.len() as u32);
        let dims = options.dimensions;
        self.dungeons.push(Dungeon {
            id: options.id.clone(),
            dimensions: dims,
            grid: vec![None; dims.volume()],
            members: Vec::new(),
        });
        if let Some(id) = options.id {
            debug!(%id, ?dungeon_id, "registered dungeon");
            self.registry.insert(id, dungeon_id);
        }

        if options.fill {
            for z in 0..dims.layers as i32 {
                for y in 0..dims.height as i32 {
                    for x in 0..dims.width as i32 {
                        self.create_room(dungeon_id, RoomOptions::at(Coordinates::new(x, y, z)));
                    }
                }
            }
        }

        Ok(dungeon_id)
    }

    pub fn find_dungeon(&self, id: &str) -> Option<DungeonId> {
        self.registry.get(id).copied()
    }

    /// Drop a registry entry. The dungeon itself stays alive.
    pub fn deregister_dungeon(&mut self, id: &str) -> Option<DungeonId> {
        let removed = self.registry.remove(id);
        if removed.is_some() {
            debug!(%id, "deregistered dungeon");
        }
        removed
    }

    /// Room in the slot at `at`. `None` when out of range or the slot is
    /// still empty.
    pub fn get_room(&self, dungeon: DungeonId, at: Coordinates) -> Option<ObjectId> {
        self.dungeon(dungeon)?.slot(at).copied().flatten()
    }

    /// Construct a room that is not part of any dungeon yet.
    pub fn build_room(&mut self, options: RoomOptions) -> ObjectId {
        let state = RoomState {
            coordinates: options.coordinates,
            policy: Some(options.policy),
        };
        self.insert_object(Object::new(options.attributes, ObjectKind::Room(state)))
    }

    /// Place an existing room into the slot matching its own coordinates.
    ///
    /// A different room already in that slot leaves the dungeon, taking its
    /// contents along.
    pub fn add_room(&mut self, dungeon: DungeonId, room: ObjectId) -> bool {
        if !self.dungeon_exists(dungeon) || !self.exists(room) {
            return false;
        }
        let Some(at) = self.obj(room).room_state().map(|r| r.coordinates) else {
            return false;
        };
        let Some(slot) = self.dgn_mut(dungeon).slot_mut(at) else {
            trace!(?dungeon, ?at, "room outside of dungeon bounds");
            return false;
        };
        let displaced = slot.replace(room);
        if let Some(prev) = displaced.filter(|&prev| prev != room) {
            debug!(?dungeon, ?at, ?prev, ?room, "room replaced in grid");
            self.set_dungeon(prev, None);
        }
        self.set_dungeon(room, Some(dungeon));
        true
    }

    /// Build a room and place it; `None` if its coordinates are out of range.
    pub fn create_room(&mut self, dungeon: DungeonId, options: RoomOptions) -> Option<ObjectId> {
        let dims = self.dungeon(dungeon)?.dimensions;
        if !dims.contains(options.coordinates) {
            return None;
        }
        let room = self.build_room(options);
        self.add_room(dungeon, room).then_some(room)
    }

    /// Room one step away from `from` in `dir`. A link on the room at `from`
    /// wins over grid adjacency.
    pub fn get_step(
        &self,
        dungeon: DungeonId,
        from: Coordinates,
        dir: Direction,
    ) -> Option<ObjectId> {
        if let Some(room) = self.get_room(dungeon, from) {
            if let Some(dest) = self.get_destination(room, dir) {
                return Some(dest);
            }
        }
        self.get_room(dungeon, from.step(dir))
    }

    /// Room one step away from `room` in `dir`.
    pub fn room_step(&self, room: ObjectId, dir: Direction) -> Option<ObjectId> {
        if let Some(dest) = self.get_destination(room, dir) {
            return Some(dest);
        }
        let object = self.object(room)?;
        let at = object.room_state()?.coordinates;
        self.get_room(object.dungeon?, at.step(dir))
    }

    /// Every legal direction leading somewhere from `room`.
    pub fn exits(&self, room: ObjectId) -> Vec<(Direction, ObjectId)> {
        Direction::ALL
            .iter()
            .filter_map(|&dir| self.room_step(room, dir).map(|dest| (dir, dest)))
            .collect()
    }

    /// Assign each object to `dungeon`, unless it is already a member.
    pub fn dungeon_add(&mut self, dungeon: DungeonId, objs: &[ObjectId]) {
        for &obj in objs {
            if !self.dungeon_contains(dungeon, obj) {
                self.set_dungeon(obj, Some(dungeon));
            }
        }
    }

    /// Release each member of `dungeon` back to no dungeon.
    pub fn dungeon_remove(&mut self, dungeon: DungeonId, objs: &[ObjectId]) {
        for &obj in objs {
            if !self.dungeon_contains(dungeon, obj) {
                continue;
            }
            if self.dungeon_of(obj) == Some(dungeon) {
                self.set_dungeon(obj, None);
            } else {
                self.dgn_mut(dungeon).members.retain(|&m| m != obj);
            }
        }
    }

    pub fn dungeon_contains(&self, dungeon: DungeonId, obj: ObjectId) -> bool {
        self.dungeon(dungeon)
            .map(|d| d.members.contains(&obj))
            .unwrap_or(false)
    }
}
