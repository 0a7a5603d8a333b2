//! Location/contents tree and dungeon membership propagation.
//!
//! Invariants kept by every operation here:
//! - `B` is in `contents(A)` exactly when `location(B) == Some(A)`;
//! - a located object shares its container's dungeon;
//! - an object with a dungeon is listed in that dungeon's members.
//!
//! Nothing here fails. Unknown ids and impossible requests are ignored.

use tracing::trace;

use super::model::{
    Attributes, DungeonId, MovableState, Object, ObjectId, ObjectKind, ObjectOptions, World,
};

impl World {
    /// Create a plain object (an item, a piece of furniture, ...).
    pub fn create_object(&mut self, options: ObjectOptions) -> ObjectId {
        self.spawn(options, ObjectKind::Item)
    }

    /// Create an object that can walk between rooms.
    pub fn create_movable(&mut self, options: ObjectOptions) -> ObjectId {
        self.spawn(options, ObjectKind::Movable(MovableState::default()))
    }

    fn spawn(&mut self, options: ObjectOptions, kind: ObjectKind) -> ObjectId {
        let id = self.insert_object(Object::new(options.attributes, kind));
        if let Some(dungeon) = options.dungeon {
            self.set_dungeon(id, Some(dungeon));
        }
        if let Some(location) = options.location {
            self.move_object(id, Some(location));
        }
        id
    }

    /// Shorthand for an item with just keywords and a display name.
    pub fn create_item(&mut self, keywords: &str, display: &str) -> ObjectId {
        self.create_object(ObjectOptions {
            attributes: Attributes::new(keywords, display),
            ..ObjectOptions::default()
        })
    }

    pub fn location(&self, obj: ObjectId) -> Option<ObjectId> {
        self.object(obj).and_then(|o| o.location)
    }

    pub fn dungeon_of(&self, obj: ObjectId) -> Option<DungeonId> {
        self.object(obj).and_then(|o| o.dungeon)
    }

    pub fn contents(&self, obj: ObjectId) -> &[ObjectId] {
        self.object(obj).map(|o| o.contents()).unwrap_or(&[])
    }

    /// Put each object into `parent`. Objects already directly inside are
    /// left alone.
    pub fn add(&mut self, parent: ObjectId, objs: &[ObjectId]) {
        if !self.exists(parent) {
            return;
        }
        for &obj in objs {
            if self.contains(parent, obj) {
                trace!(?parent, ?obj, "already contained");
                continue;
            }
            self.move_object(obj, Some(parent));
        }
    }

    /// Take each object out of `parent`, leaving it unlocated.
    pub fn remove(&mut self, parent: ObjectId, objs: &[ObjectId]) {
        if !self.exists(parent) {
            return;
        }
        for &obj in objs {
            if !self.exists(obj) {
                continue;
            }
            self.obj_mut(parent).contents.retain(|&c| c != obj);
            if self.obj(obj).location == Some(parent) {
                self.move_object(obj, None);
            }
        }
    }

    /// Direct children only.
    pub fn contains(&self, parent: ObjectId, obj: ObjectId) -> bool {
        self.object(parent)
            .map(|p| p.contents.contains(&obj))
            .unwrap_or(false)
    }

    /// The sanctioned way to relocate an object.
    pub fn move_object(&mut self, obj: ObjectId, dest: Option<ObjectId>) {
        self.set_location(obj, dest);
    }

    /// Relocate `obj` into `dest` (or nowhere), dragging its dungeon along.
    pub fn set_location(&mut self, obj: ObjectId, dest: Option<ObjectId>) {
        if !self.exists(obj) {
            return;
        }
        let old = self.obj(obj).location;
        if old == dest {
            return;
        }
        if let Some(dest) = dest {
            if !self.exists(dest) || self.encloses(obj, dest) {
                trace!(?obj, ?dest, "refusing relocation into itself");
                return;
            }
        }

        if let Some(old) = old {
            self.obj_mut(old).contents.retain(|&c| c != obj);
        }
        self.obj_mut(obj).location = dest;
        trace!(?obj, from = ?old, to = ?dest, "relocated");

        match dest {
            Some(dest) => {
                if !self.obj(dest).contents.contains(&obj) {
                    self.obj_mut(dest).contents.push(obj);
                }
                let dungeon = self.obj(dest).dungeon;
                self.set_dungeon(obj, dungeon);
            }
            None => self.set_dungeon(obj, None),
        }

        self.relocated(obj);
    }

    /// Assign `obj` and everything inside it to `dungeon`.
    pub fn set_dungeon(&mut self, obj: ObjectId, dungeon: Option<DungeonId>) {
        if !self.exists(obj) {
            return;
        }
        if let Some(d) = dungeon {
            if !self.dungeon_exists(d) {
                return;
            }
        }
        let old = self.obj(obj).dungeon;
        if old == dungeon {
            return;
        }

        if let Some(old) = old {
            self.unregister_member(old, obj);
        }

        // A container in another dungeon can no longer hold this object.
        if let Some(loc) = self.obj(obj).location {
            if self.obj(loc).dungeon != dungeon {
                self.obj_mut(loc).contents.retain(|&c| c != obj);
                self.obj_mut(obj).location = None;
                self.relocated(obj);
            }
        }

        self.obj_mut(obj).dungeon = dungeon;
        if let Some(d) = dungeon {
            let members = &mut self.dgn_mut(d).members;
            if !members.contains(&obj) {
                members.push(obj);
            }
        }

        let children = self.obj(obj).contents.clone();
        for child in children {
            self.set_dungeon(child, dungeon);
        }
    }

    fn unregister_member(&mut self, dungeon: DungeonId, obj: ObjectId) {
        let coordinates = self.obj(obj).room_state().map(|r| r.coordinates);
        let dgn = self.dgn_mut(dungeon);
        dgn.members.retain(|&m| m != obj);
        if let Some(at) = coordinates {
            if let Some(slot) = dgn.slot_mut(at) {
                if *slot == Some(obj) {
                    *slot = None;
                }
            }
        }
    }

    /// Per-variant follow-up after the location changed.
    fn relocated(&mut self, obj: ObjectId) {
        let room_coords = self
            .obj(obj)
            .location
            .and_then(|loc| self.obj(loc).room_state().map(|r| r.coordinates));
        if let ObjectKind::Movable(state) = &mut self.obj_mut(obj).kind {
            state.coordinates = room_coords;
        }
    }

    /// True when `inner` is `outer` or sits somewhere below it.
    pub fn encloses(&self, outer: ObjectId, inner: ObjectId) -> bool {
        let mut cursor = Some(inner);
        let mut hops = 0;
        while let Some(current) = cursor {
            if current == outer {
                return true;
            }
            hops += 1;
            if hops > self.objects.len() {
                return false;
            }
            cursor = self.object(current).and_then(|o| o.location);
        }
        false
    }

    /// Innermost room enclosing `obj`, following the location chain.
    pub fn room_of(&self, obj: ObjectId) -> Option<ObjectId> {
        let mut cursor = self.location(obj);
        let mut hops = 0;
        while let Some(current) = cursor {
            let object = self.object(current)?;
            if object.is_room() {
                return Some(current);
            }
            hops += 1;
            if hops > self.objects.len() {
                return None;
            }
            cursor = object.location;
        }
        None
    }

    /// Does every token of `query` prefix one of the object's own keywords?
    pub fn matches(&self, obj: ObjectId, query: &str) -> bool {
        let Some(object) = self.object(obj) else {
            return false;
        };
        keywords_match(&object.attributes.keywords, query)
    }

    /// First direct child of `parent` whose keywords match `query`.
    pub fn find_in(&self, parent: ObjectId, query: &str) -> Option<ObjectId> {
        self.contents(parent)
            .iter()
            .copied()
            .find(|&child| self.matches(child, query))
    }
}

pub(crate) fn keywords_match(keywords: &str, query: &str) -> bool {
    let own: Vec<String> = keywords
        .split_whitespace()
        .map(|k| k.to_lowercase())
        .collect();
    let mut tokens = query.split_whitespace().map(|t| t.to_lowercase()).peekable();
    if tokens.peek().is_none() {
        return false;
    }
    tokens.all(|tok| own.iter().any(|k| k.starts_with(&tok)))
}
