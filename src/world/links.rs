//! Adjacency overrides between rooms.
//!
//! A link binds `(room, direction)` to a destination room regardless of
//! grid position. Tunnels bind both ends, portals only the origin. A
//! `(room, direction)` pair carries at most one active binding; creating a
//! link that would collide with an active one is refused.

use tracing::debug;

use crate::direction::Direction;
use crate::error::WorldError;

use super::model::{Binding, LinkId, ObjectId, RoomLink, World};

impl World {
    /// Bind `from`'s step in `dir` to `to`. Unless `one_way`, also bind `to`'s
    /// step in the reverse direction back to `from`.
    pub fn create_tunnel(
        &mut self,
        from: ObjectId,
        dir: Direction,
        to: ObjectId,
        one_way: bool,
    ) -> Result<LinkId, WorldError> {
        let reverse = dir
            .reverse()
            .ok_or(WorldError::UnresolvableDirection(dir))?;
        for room in [from, to] {
            if !self.object(room).is_some_and(|o| o.is_room()) {
                return Err(WorldError::NotARoom(room));
            }
        }

        let mut wanted = vec![(from, dir)];
        if !one_way {
            wanted.push((to, reverse));
        }
        for &(room, direction) in &wanted {
            if self.bindings.contains_key(&(room, direction)) {
                return Err(WorldError::LinkConflict { room, direction });
            }
        }

        let link = LinkId(self.links.len() as u32);
        self.links.push(RoomLink {
            from,
            to,
            direction: dir,
            reverse,
            one_way,
            active: true,
        });
        self.bindings.insert(
            (from, dir),
            Binding {
                link,
                destination: to,
            },
        );
        if !one_way {
            self.bindings.insert(
                (to, reverse),
                Binding {
                    link,
                    destination: from,
                },
            );
        }

        debug!(?link, ?from, ?to, %dir, one_way, "created room link");
        Ok(link)
    }

    /// Shorthand for a one-way link.
    pub fn create_portal(
        &mut self,
        from: ObjectId,
        dir: Direction,
        to: ObjectId,
    ) -> Result<LinkId, WorldError> {
        self.create_tunnel(from, dir, to, true)
    }

    /// Destination of an active link leaving `room` in exactly `dir`.
    pub fn get_destination(&self, room: ObjectId, dir: Direction) -> Option<ObjectId> {
        self.bindings.get(&(room, dir)).map(|b| b.destination)
    }

    /// Detach the bindings `link` installed. Calling it again does nothing.
    pub fn remove_link(&mut self, link: LinkId) {
        let Some(entry) = self.links.get_mut(link.0 as usize) else {
            return;
        };
        if !entry.active {
            return;
        }
        entry.active = false;

        let mut keys = vec![(entry.from, entry.direction)];
        if !entry.one_way {
            keys.push((entry.to, entry.reverse));
        }
        for key in keys {
            if self.bindings.get(&key).is_some_and(|b| b.link == link) {
                self.bindings.remove(&key);
            }
        }
        debug!(?link, "removed room link");
    }

    /// Active links touching `room`, from either end.
    pub fn links_of(&self, room: ObjectId) -> Vec<LinkId> {
        self.links
            .iter()
            .enumerate()
            .filter(|(_, l)| l.active && (l.from == room || (!l.one_way && l.to == room)))
            .map(|(i, _)| LinkId(i as u32))
            .collect()
    }
}
