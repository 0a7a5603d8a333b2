use dungeon_grid::engine;
use proptest::prelude::*;
use dungeon_grid::world::{DungeonId, ObjectId, World};
use dungeon_grid::{Coordinates, Dimensions, Direction, DungeonOptions, ObjectOptions};

fn filled(world: &mut World, id: Option<&str>, w: u32, h: u32, l: u32) -> DungeonId {
    let mut options = DungeonOptions::new(Dimensions::new(w, h, l)).filled();
    options.id = id.map(str::to_string);
    world.create_dungeon(options).unwrap()
}

fn room(world: &World, d: DungeonId, x: i32, y: i32, z: i32) -> ObjectId {
    world.get_room(d, Coordinates::new(x, y, z)).unwrap()
}

fn check_invariants(world: &World) {
    for id in world.object_ids() {
        for &child in world.contents(id) {
            assert_eq!(world.location(child), Some(id), "reciprocity broken");
        }
        if let Some(loc) = world.location(id) {
            assert!(world.contains(loc, id), "reciprocity broken");
            assert_eq!(world.dungeon_of(id), world.dungeon_of(loc), "propagation broken");
        }
        if let Some(d) = world.dungeon_of(id) {
            assert!(world.dungeon_contains(d, id), "closure broken");
        }
    }
}

/// Every occupied slot holds a member room. Returns the occupied slot count.
fn check_grid(world: &World, d: DungeonId) -> usize {
    let dims = world.dungeon(d).unwrap().dimensions();
    let mut occupied = 0;
    for z in 0..dims.layers as i32 {
        for y in 0..dims.height as i32 {
            for x in 0..dims.width as i32 {
                let at = Coordinates::new(x, y, z);
                if let Some(room) = world.get_room(d, at) {
                    occupied += 1;
                    assert!(world.dungeon_contains(d, room), "slot holds a non-member");
                    assert_eq!(world.object(room).unwrap().coordinates(), Some(at));
                }
            }
        }
    }
    occupied
}

fn room_members(world: &World, d: DungeonId) -> usize {
    world
        .dungeon(d)
        .unwrap()
        .members()
        .iter()
        .filter(|&&m| world.object(m).is_some_and(|o| o.is_room()))
        .count()
}

#[derive(Debug, Clone)]
enum Op {
    Add(usize, usize),
    Remove(usize, usize),
    Move(usize, Option<usize>),
    SetDungeon(usize, Option<usize>),
}

/// Three rooms, three items and two movables.
const POOL: usize = 8;

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..POOL, 0..POOL).prop_map(|(p, c)| Op::Add(p, c)),
        (0..POOL, 0..POOL).prop_map(|(p, c)| Op::Remove(p, c)),
        (0..POOL, proptest::option::of(0..POOL)).prop_map(|(o, d)| Op::Move(o, d)),
        (0..POOL, proptest::option::of(0..2usize)).prop_map(|(o, d)| Op::SetDungeon(o, d)),
    ]
}

proptest! {
    #[test]
    fn containment_invariants_hold_for_any_sequence(
        ops in proptest::collection::vec(op(), 0..40),
    ) {
        let mut world = World::new();
        let dungeons = [
            filled(&mut world, None, 2, 1, 1),
            filled(&mut world, None, 1, 1, 1),
        ];
        let mut pool: Vec<ObjectId> = world.object_ids().collect();
        for _ in 0..3 {
            pool.push(world.create_item("thing", "a thing"));
        }
        for _ in 0..2 {
            pool.push(world.create_movable(ObjectOptions::default()));
        }
        prop_assert_eq!(pool.len(), POOL);

        for op in ops {
            match op {
                Op::Add(p, c) => world.add(pool[p], &[pool[c]]),
                Op::Remove(p, c) => world.remove(pool[p], &[pool[c]]),
                Op::Move(o, d) => world.move_object(pool[o], d.map(|d| pool[d])),
                Op::SetDungeon(o, d) => world.set_dungeon(pool[o], d.map(|d| dungeons[d])),
            }
            check_invariants(&world);
            for &d in &dungeons {
                check_grid(&world, d);
            }
            for &obj in &pool {
                prop_assert!(!world.location(obj).is_some_and(|loc| world.encloses(obj, loc)));
            }
        }
    }
}

#[test]
fn containment_invariants_hold_through_a_sequence_of_moves() {
    let mut world = World::new();
    let a = filled(&mut world, None, 2, 1, 1);
    let b = filled(&mut world, None, 1, 1, 1);
    let ra = room(&world, a, 0, 0, 0);
    let rb = room(&world, a, 1, 0, 0);
    let rc = room(&world, b, 0, 0, 0);

    let bag = world.create_item("bag", "a bag");
    let apple = world.create_item("apple", "an apple");
    let knight = world.create_movable(ObjectOptions::default());

    world.add(bag, &[apple]);
    check_invariants(&world);
    world.add(knight, &[bag]);
    check_invariants(&world);
    world.move_object(knight, Some(ra));
    check_invariants(&world);
    assert_eq!(world.dungeon_of(apple), Some(a));

    world.move_object(knight, Some(rb));
    check_invariants(&world);
    world.move_object(knight, Some(rc));
    check_invariants(&world);
    assert_eq!(world.dungeon_of(apple), Some(b));
    assert!(!world.dungeon_contains(a, apple));

    world.remove(knight, &[bag]);
    check_invariants(&world);
    assert_eq!(world.dungeon_of(apple), None);

    world.set_dungeon(bag, Some(a));
    check_invariants(&world);
    assert!(world.dungeon_contains(a, apple));

    world.add(rb, &[bag, bag, apple]);
    check_invariants(&world);
    assert_eq!(world.location(apple), Some(rb));
    assert!(world.contents(bag).is_empty());

    world.dungeon_remove(a, &[rb]);
    check_invariants(&world);
    assert_eq!(world.dungeon_of(bag), None);
    assert_eq!(world.get_room(a, Coordinates::new(1, 0, 0)), None);
}

#[test]
fn grid_bounds() {
    let mut world = World::new();
    let (w, h, l) = (3, 4, 2);
    let d = filled(&mut world, None, w, h, l);
    for z in -1..=l as i32 {
        for y in -1..=h as i32 {
            for x in -1..=w as i32 {
                let inside = (0..w as i32).contains(&x)
                    && (0..h as i32).contains(&y)
                    && (0..l as i32).contains(&z);
                let found = world.get_room(d, Coordinates::new(x, y, z));
                assert_eq!(found.is_some(), inside, "({x},{y},{z})");
                if let Some(r) = found {
                    assert_eq!(
                        world.object(r).unwrap().coordinates(),
                        Some(Coordinates::new(x, y, z))
                    );
                }
            }
        }
    }
}

#[test]
fn movement_in_a_three_cube() {
    let mut world = World::new();
    let d = filled(&mut world, None, 3, 3, 3);
    let walker = world.create_movable(ObjectOptions::default());
    let centre = room(&world, d, 1, 1, 1);
    engine::place(&mut world, walker, centre);

    assert!(engine::can_step(&world, walker, Direction::UP));
    assert!(engine::step(&mut world, walker, Direction::UP));
    assert_eq!(engine::coordinates(&world, walker), Some(Coordinates::new(1, 1, 2)));
    assert!(engine::step(&mut world, walker, Direction::DOWN));
    assert_eq!(engine::coordinates(&world, walker), Some(Coordinates::new(1, 1, 1)));

    let corner = room(&world, d, 0, 0, 0);
    engine::place(&mut world, walker, corner);
    assert!(!engine::can_step(&world, walker, Direction::NORTH));
    assert!(!engine::can_step(&world, walker, Direction::WEST));
    assert!(!engine::step(&mut world, walker, Direction::NORTH));
    assert_eq!(engine::coordinates(&world, walker), Some(Coordinates::new(0, 0, 0)));

    assert!(engine::step(&mut world, walker, Direction::SOUTH | Direction::EAST));
    assert_eq!(engine::coordinates(&world, walker), Some(Coordinates::new(1, 1, 0)));
}

#[test]
fn two_way_tunnel_overrides_and_is_removable() {
    let mut world = World::new();
    let d = filled(&mut world, None, 3, 3, 1);
    let a = room(&world, d, 0, 0, 0);
    let b = room(&world, d, 2, 2, 0);

    let link = world.create_tunnel(a, Direction::NORTH, b, false).unwrap();
    assert_eq!(world.room_step(a, Direction::NORTH), Some(b));
    assert_eq!(world.room_step(b, Direction::SOUTH), Some(a));
    assert_eq!(
        world.get_step(d, Coordinates::new(0, 0, 0), Direction::NORTH),
        Some(b)
    );

    let walker = world.create_movable(ObjectOptions::default());
    engine::place(&mut world, walker, a);
    assert!(engine::step(&mut world, walker, Direction::NORTH));
    assert_eq!(world.location(walker), Some(b));

    world.remove_link(link);
    assert_eq!(world.room_step(a, Direction::NORTH), None);
    assert_eq!(world.room_step(b, Direction::SOUTH), None);
    world.remove_link(link);
    assert!(!engine::can_step(&world, walker, Direction::SOUTH));
}

#[test]
fn one_way_portal_is_asymmetric() {
    let mut world = World::new();
    let d = filled(&mut world, None, 3, 3, 1);
    let a = room(&world, d, 0, 1, 0);
    let b = room(&world, d, 2, 1, 0);

    world.create_tunnel(a, Direction::EAST, b, true).unwrap();
    assert_eq!(world.room_step(a, Direction::EAST), Some(b));
    assert_ne!(world.room_step(b, Direction::WEST), Some(a));
    // falls back to the grid neighbour
    assert_eq!(world.room_step(b, Direction::WEST), Some(room(&world, d, 1, 1, 0)));
}

#[test]
fn room_references_resolve_through_the_registry() {
    let mut world = World::new();
    let d = filled(&mut world, Some("id"), 3, 4, 2);
    let target = room(&world, d, 2, 3, 1);

    assert_eq!(world.get_room_by_ref("@id{2,3,1}"), Some(target));
    assert_eq!(world.room_ref(target).as_deref(), Some("@id{2,3,1}"));
    for bad in ["@id{1,2}", "@{1,2,3}", "id{1,2,3}", "@other{0,0,0}", "@id{3,0,0}"] {
        assert_eq!(world.get_room_by_ref(bad), None, "{bad}");
    }

    world.deregister_dungeon("id");
    assert_eq!(world.get_room_by_ref("@id{2,3,1}"), None);
}

#[test]
fn independent_worlds_do_not_share_a_registry() {
    let mut one = World::new();
    let mut two = World::new();
    filled(&mut one, Some("shared"), 1, 1, 1);
    let shared = DungeonOptions::new(Dimensions::new(1, 1, 1)).id("shared");
    assert!(two.create_dungeon(shared).is_ok());
}
