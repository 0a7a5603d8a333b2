use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use dungeon_grid::engine;
use dungeon_grid::world::{Attributes, ObjectId, ObjectOptions, World};
use dungeon_grid::{Direction, load_dungeon_from_file};
use tracing_subscriber::EnvFilter;

fn describe_room(world: &World, room: ObjectId, player: ObjectId) {
    let Some(object) = world.object(room) else {
        return;
    };
    let attrs = &object.attributes;
    let title = if attrs.display.trim().is_empty() {
        world.room_ref(room).unwrap_or_else(|| "Somewhere".to_string())
    } else {
        attrs.display.clone()
    };
    println!("\n{}", title);
    if !attrs.description.trim().is_empty() {
        println!("{}", attrs.description);
    }

    for &thing in world.contents(room) {
        if thing == player {
            continue;
        }
        if let Some(o) = world.object(thing) {
            if !o.attributes.display.trim().is_empty() {
                println!("You see {} here.", o.attributes.display);
            }
        }
    }

    describe_exits(world, room);
}

fn describe_exits(world: &World, room: ObjectId) {
    let exits: Vec<&str> = world
        .exits(room)
        .into_iter()
        .filter_map(|(dir, _)| dir.to_text())
        .collect();
    if exits.is_empty() {
        println!("\nThere are no obvious exits.");
    } else {
        println!("\nExits: {}", exits.join(", "));
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let dungeon_path: PathBuf = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("worlds/keep.toml"));

    let mut world = World::new();
    let loaded = match load_dungeon_from_file(&mut world, &dungeon_path) {
        Ok(l) => {
            println!("Using dungeon file: {}", dungeon_path.display());
            l
        }
        Err(e) => {
            eprintln!("Failed to load dungeon file '{}': {e}", dungeon_path.display());
            std::process::exit(1);
        }
    };

    let start = loaded.start.or_else(|| {
        world
            .dungeon(loaded.dungeon)
            .and_then(|d| {
                d.members()
                    .iter()
                    .copied()
                    .find(|&m| world.object(m).is_some_and(|o| o.is_room()))
            })
    });
    let Some(start) = start else {
        eprintln!("Error: the dungeon has no rooms to start in.");
        return Ok(());
    };

    let player = world.create_movable(ObjectOptions {
        attributes: Attributes::new("me self", "yourself"),
        ..ObjectOptions::default()
    });
    engine::place(&mut world, player, start);

    println!("Type a direction to walk, 'look', 'exits', 'goto @id{{x,y,z}}' or 'quit'.");
    describe_room(&world, start, player);

    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        let bytes_read = stdin.read_line(&mut input)?;
        if bytes_read == 0 {
            println!("\nGoodbye.");
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let lower = input.to_lowercase();

        let Some(here) = world.location(player) else {
            eprintln!("Error: you are nowhere.");
            break;
        };

        if lower == "quit" || lower == "exit" {
            println!("Goodbye.");
            break;
        } else if lower == "look" || lower == "l" {
            describe_room(&world, here, player);
        } else if lower == "exits" {
            describe_exits(&world, here);
        } else if lower.starts_with("goto ") {
            // references keep their original case
            let target = input.split_once(' ').map(|(_, rest)| rest.trim()).unwrap_or("");
            match world.get_room_by_ref(target) {
                Some(room) => {
                    engine::place(&mut world, player, room);
                    describe_room(&world, room, player);
                }
                None => println!("There is no such place."),
            }
        } else if let Some(dir) = Direction::from_text(&lower) {
            if engine::step(&mut world, player, dir) {
                if let Some(now) = world.location(player) {
                    describe_room(&world, now, player);
                }
            } else {
                println!("You can't go {} from here.", dir);
            }
        } else {
            println!("I don't understand that command.");
        }
    }

    Ok(())
}
