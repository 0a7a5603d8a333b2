use crate::direction::Direction;

use super::model::{ObjectId, World};

/// One attempted or completed pass through a room boundary.
///
/// For exit checks `direction` is the way the mover is heading; for entry
/// checks it is the side of the room the mover arrives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    pub room: ObjectId,
    pub mover: ObjectId,
    pub direction: Direction,
}

/// Per-room entry/exit policy, injected when the room is built.
///
/// The predicates see the world read-only. The notifications run after the
/// predicates passed and may mutate the world freely, including the room's
/// own policy. The policy is detached from the room for the duration of the
/// call, and the room refuses traversals meanwhile.
pub trait RoomPolicy {
    fn can_enter(&self, _world: &World, _traversal: &Traversal) -> bool {
        true
    }

    fn can_exit(&self, _world: &World, _traversal: &Traversal) -> bool {
        true
    }

    fn on_enter(&mut self, _world: &mut World, _traversal: &Traversal) {}

    fn on_exit(&mut self, _world: &mut World, _traversal: &Traversal) {}
}

/// Default policy: anything may pass, nothing happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRoom;

impl RoomPolicy for OpenRoom {}

/// Nothing enters or leaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SealedRoom;

impl RoomPolicy for SealedRoom {
    fn can_enter(&self, _world: &World, _traversal: &Traversal) -> bool {
        false
    }

    fn can_exit(&self, _world: &World, _traversal: &Traversal) -> bool {
        false
    }
}

impl World {
    /// Run `f` with the room's policy detached, so the hook can borrow the
    /// world mutably.
    ///
    /// While detached the room refuses every traversal, and a nested call
    /// for the same room does nothing. A policy installed by the hook is
    /// kept; otherwise the detached one goes back.
    pub(crate) fn with_policy<F>(&mut self, room: ObjectId, f: F)
    where
        F: FnOnce(&mut dyn RoomPolicy, &mut World),
    {
        let Some(mut policy) = self
            .objects
            .get_mut(room.0 as usize)
            .and_then(|o| o.room_state_mut())
            .and_then(|state| state.policy.take())
        else {
            return;
        };
        f(policy.as_mut(), self);
        if let Some(state) = self.obj_mut(room).room_state_mut() {
            if state.policy.is_none() {
                state.policy = Some(policy);
            }
        }
    }

    /// `None` when `room` is not a room or its policy is detached.
    pub(crate) fn policy(&self, room: ObjectId) -> Option<&dyn RoomPolicy> {
        self.object(room)
            .and_then(|o| o.room_state())
            .and_then(|state| state.policy.as_deref())
    }

    /// Swap a room's policy; returns `false` when `room` is not a room.
    ///
    /// Called from one of the room's own hooks, the new policy takes effect
    /// at once and the detached one is dropped when the hook returns.
    pub fn set_policy(&mut self, room: ObjectId, policy: impl RoomPolicy + 'static) -> bool {
        match self.objects.get_mut(room.0 as usize).and_then(|o| o.room_state_mut()) {
            Some(state) => {
                state.policy = Some(Box::new(policy));
                true
            }
            None => false,
        }
    }
}
