use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

use super::policy::{OpenRoom, RoomPolicy};

///////////////////////////
/// IDS AND VALUE TYPES ///
///////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DungeonId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub(crate) u32);

/// Grid position. x grows east, y grows south, z grows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinates {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Coordinates { x, y, z }
    }

    /// Apply every axis bit set in `dir`. Opposing bits cancel out.
    pub fn step(self, dir: Direction) -> Coordinates {
        let mut next = self;
        if dir.contains(Direction::NORTH) {
            next.y = next.y.saturating_sub(1);
        }
        if dir.contains(Direction::SOUTH) {
            next.y = next.y.saturating_add(1);
        }
        if dir.contains(Direction::EAST) {
            next.x = next.x.saturating_add(1);
        }
        if dir.contains(Direction::WEST) {
            next.x = next.x.saturating_sub(1);
        }
        if dir.contains(Direction::UP) {
            next.z = next.z.saturating_add(1);
        }
        if dir.contains(Direction::DOWN) {
            next.z = next.z.saturating_sub(1);
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub layers: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32, layers: u32) -> Self {
        Dimensions {
            width,
            height,
            layers,
        }
    }

    pub fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.layers as usize
    }

    /// Flat slot index, or `None` when any axis is out of range.
    pub fn index_of(&self, at: Coordinates) -> Option<usize> {
        let in_range = |v: i32, len: u32| v >= 0 && (v as i64) < len as i64;
        if !in_range(at.x, self.width)
            || !in_range(at.y, self.height)
            || !in_range(at.z, self.layers)
        {
            return None;
        }
        let (w, h) = (self.width as usize, self.height as usize);
        Some((at.z as usize * h + at.y as usize) * w + at.x as usize)
    }

    pub fn contains(&self, at: Coordinates) -> bool {
        self.index_of(at).is_some()
    }
}

/////////////////////////
/// CONTAINMENT NODES ///
/////////////////////////

/// Identity attributes shared by every object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Space-delimited search tokens.
    pub keywords: String,
    pub display: String,
    pub description: String,
}

impl Attributes {
    pub fn new(keywords: impl Into<String>, display: impl Into<String>) -> Self {
        Attributes {
            keywords: keywords.into(),
            display: display.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

pub struct RoomState {
    pub(crate) coordinates: Coordinates,
    /// Empty while one of the policy's own hooks is running.
    pub(crate) policy: Option<Box<dyn RoomPolicy>>,
}

impl RoomState {
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

#[derive(Debug, Clone, Default)]
pub struct MovableState {
    /// Copy of the enclosing room's coordinates; `None` while not in a room.
    pub(crate) coordinates: Option<Coordinates>,
}

pub enum ObjectKind {
    Item,
    Room(RoomState),
    Movable(MovableState),
}

pub struct Object {
    pub attributes: Attributes,
    pub(crate) location: Option<ObjectId>,
    pub(crate) dungeon: Option<DungeonId>,
    pub(crate) contents: Vec<ObjectId>,
    pub(crate) kind: ObjectKind,
}

impl Object {
    pub(crate) fn new(attributes: Attributes, kind: ObjectKind) -> Self {
        Object {
            attributes,
            location: None,
            dungeon: None,
            contents: Vec::new(),
            kind,
        }
    }

    pub fn location(&self) -> Option<ObjectId> {
        self.location
    }

    pub fn dungeon(&self) -> Option<DungeonId> {
        self.dungeon
    }

    pub fn contents(&self) -> &[ObjectId] {
        &self.contents
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_room(&self) -> bool {
        matches!(self.kind, ObjectKind::Room(_))
    }

    pub fn is_movable(&self) -> bool {
        matches!(self.kind, ObjectKind::Movable(_))
    }

    /// A room's own position, or a movable's cached one.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match &self.kind {
            ObjectKind::Room(room) => Some(room.coordinates),
            ObjectKind::Movable(movable) => movable.coordinates,
            ObjectKind::Item => None,
        }
    }

    pub(crate) fn room_state(&self) -> Option<&RoomState> {
        match &self.kind {
            ObjectKind::Room(room) => Some(room),
            _ => None,
        }
    }

    pub(crate) fn room_state_mut(&mut self) -> Option<&mut RoomState> {
        match &mut self.kind {
            ObjectKind::Room(room) => Some(room),
            _ => None,
        }
    }
}

/// Options for a generic object or movable.
#[derive(Debug, Clone, Default)]
pub struct ObjectOptions {
    pub attributes: Attributes,
    pub dungeon: Option<DungeonId>,
    pub location: Option<ObjectId>,
}

pub struct RoomOptions {
    pub coordinates: Coordinates,
    pub attributes: Attributes,
    pub policy: Box<dyn RoomPolicy>,
}

impl RoomOptions {
    pub fn at(coordinates: Coordinates) -> Self {
        RoomOptions {
            coordinates,
            attributes: Attributes::default(),
            policy: Box::new(OpenRoom),
        }
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn policy(mut self, policy: impl RoomPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }
}

///////////////
/// DUNGEON ///
///////////////

#[derive(Debug, Clone)]
pub struct DungeonOptions {
    pub id: Option<String>,
    pub dimensions: Dimensions,
    /// Populate every slot with a default room at construction.
    pub fill: bool,
}

impl DungeonOptions {
    pub fn new(dimensions: Dimensions) -> Self {
        DungeonOptions {
            id: None,
            dimensions,
            fill: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }
}

pub struct Dungeon {
    pub(crate) id: Option<String>,
    pub(crate) dimensions: Dimensions,
    pub(crate) grid: Vec<Option<ObjectId>>,
    /// Every object currently assigned to this dungeon.
    pub(crate) members: Vec<ObjectId>,
}

impl Dungeon {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn members(&self) -> &[ObjectId] {
        &self.members
    }

    pub(crate) fn slot(&self, at: Coordinates) -> Option<&Option<ObjectId>> {
        self.dimensions.index_of(at).and_then(|i| self.grid.get(i))
    }

    pub(crate) fn slot_mut(&mut self, at: Coordinates) -> Option<&mut Option<ObjectId>> {
        self.dimensions
            .index_of(at)
            .and_then(move |i| self.grid.get_mut(i))
    }
}

/////////////////
/// ROOM LINK ///
/////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLink {
    pub from: ObjectId,
    pub to: ObjectId,
    pub direction: Direction,
    pub reverse: Direction,
    pub one_way: bool,
    pub(crate) active: bool,
}

impl RoomLink {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) link: LinkId,
    pub(crate) destination: ObjectId,
}

/////////////
/// WORLD ///
/////////////

/// Owns every object, dungeon and link of one simulation, plus the
/// id → dungeon registry used to resolve room references.
///
/// The arenas only grow. Objects and dungeons are never freed, and a
/// removed link stays in `links` marked inactive so its `LinkId` keeps
/// pointing at the same record.
#[derive(Default)]
pub struct World {
    pub(crate) objects: Vec<Object>,
    pub(crate) dungeons: Vec<Dungeon>,
    pub(crate) links: Vec<RoomLink>,
    pub(crate) bindings: HashMap<(ObjectId, Direction), Binding>,
    pub(crate) registry: HashMap<String, DungeonId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0 as usize)
    }

    /// Attribute access for callers that rename or redescribe things.
    pub fn attributes_mut(&mut self, id: ObjectId) -> Option<&mut Attributes> {
        self.objects.get_mut(id.0 as usize).map(|o| &mut o.attributes)
    }

    pub fn dungeon(&self, id: DungeonId) -> Option<&Dungeon> {
        self.dungeons.get(id.0 as usize)
    }

    pub fn link(&self, id: LinkId) -> Option<&RoomLink> {
        self.links.get(id.0 as usize)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        (0..self.objects.len() as u32).map(ObjectId)
    }

    pub(crate) fn obj(&self, id: ObjectId) -> &Object {
        &self.objects[id.0 as usize]
    }

    pub(crate) fn obj_mut(&mut self, id: ObjectId) -> &mut Object {
        &mut self.objects[id.0 as usize]
    }

    pub(crate) fn exists(&self, id: ObjectId) -> bool {
        (id.0 as usize) < self.objects.len()
    }

    pub(crate) fn dungeon_exists(&self, id: DungeonId) -> bool {
        (id.0 as usize) < self.dungeons.len()
    }

    pub(crate) fn dgn_mut(&mut self, id: DungeonId) -> &mut Dungeon {
        &mut self.dungeons[id.0 as usize]
    }

    pub(crate) fn insert_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }
}
