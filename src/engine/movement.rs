use tracing::{debug, trace};

use crate::direction::Direction;
use crate::world::{Coordinates, ObjectId, Traversal, World};

/// Where a movable stands relative to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Location is not a room (or there is no location).
    Unplaced,
    /// Location is `room`, and the cached coordinates mirror it.
    Placed { room: ObjectId, at: Coordinates },
}

/// A vetted step: the mover, the room it leaves and the room it enters.
struct StepPlan {
    mover: ObjectId,
    from: ObjectId,
    to: ObjectId,
    dir: Direction,
    reverse: Direction,
}

pub fn placement(world: &World, mover: ObjectId) -> Placement {
    let Some(object) = world.object(mover) else {
        return Placement::Unplaced;
    };
    let room = object
        .location()
        .filter(|&loc| world.object(loc).is_some_and(|o| o.is_room()));
    match (room, object.is_movable().then(|| object.coordinates()).flatten()) {
        (Some(room), Some(at)) => Placement::Placed { room, at },
        _ => Placement::Unplaced,
    }
}

/// Cached coordinates of a movable, `None` while unplaced.
pub fn coordinates(world: &World, mover: ObjectId) -> Option<Coordinates> {
    match placement(world, mover) {
        Placement::Placed { at, .. } => Some(at),
        Placement::Unplaced => None,
    }
}

fn plan_step(world: &World, mover: ObjectId, dir: Direction) -> Option<StepPlan> {
    let Placement::Placed { room: from, .. } = placement(world, mover) else {
        return None;
    };
    let reverse = dir.reverse()?;
    let to = world.room_step(from, dir)?;

    let exit = Traversal {
        room: from,
        mover,
        direction: dir,
    };
    if !world.policy(from)?.can_exit(world, &exit) {
        trace!(?mover, ?from, %dir, "exit refused");
        return None;
    }

    let entry = Traversal {
        room: to,
        mover,
        direction: reverse,
    };
    if !world.policy(to)?.can_enter(world, &entry) {
        trace!(?mover, ?to, %reverse, "entry refused");
        return None;
    }

    Some(StepPlan {
        mover,
        from,
        to,
        dir,
        reverse,
    })
}

/// Could `mover` walk one step in `dir` right now?
pub fn can_step(world: &World, mover: ObjectId, dir: Direction) -> bool {
    plan_step(world, mover, dir).is_some()
}

/// Walk one step in `dir`. Returns `false`, changing nothing, when the step
/// is not allowed. Hooks run around the relocation and are not rolled back.
pub fn step(world: &mut World, mover: ObjectId, dir: Direction) -> bool {
    let Some(plan) = plan_step(world, mover, dir) else {
        return false;
    };

    world.with_policy(plan.from, |policy, world| {
        policy.on_exit(
            world,
            &Traversal {
                room: plan.from,
                mover: plan.mover,
                direction: plan.dir,
            },
        )
    });

    world.move_object(plan.mover, Some(plan.to));
    debug!(mover = ?plan.mover, from = ?plan.from, to = ?plan.to, dir = %plan.dir, "stepped");

    // The move is refused if an exit hook put the target inside the mover.
    if let Some(current) = world.location(plan.mover) {
        world.with_policy(current, |policy, world| {
            policy.on_enter(
                world,
                &Traversal {
                    room: current,
                    mover: plan.mover,
                    direction: plan.reverse,
                },
            )
        });
    }
    true
}

/// Put `mover` straight into `room`, bypassing every policy hook.
pub fn place(world: &mut World, mover: ObjectId, room: ObjectId) -> bool {
    if !world.object(room).is_some_and(|o| o.is_room()) {
        return false;
    }
    world.move_object(mover, Some(room));
    world.location(mover) == Some(room)
}
