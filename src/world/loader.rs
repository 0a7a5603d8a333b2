use serde::Deserialize;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::direction::Direction;
use crate::error::LoadError;

use super::model::{
    Attributes, Coordinates, Dimensions, DungeonId, DungeonOptions, ObjectId, ObjectOptions,
    RoomOptions, World,
};
use super::policy::SealedRoom;
use super::validator::{ValidationError, validate_dungeon_file};

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Debug, Deserialize)]
pub struct DungeonFile {
    pub dungeon: DungeonHeader,
    #[serde(default)]
    pub room: Vec<RoomConfig>, // [[room]] blocks
    #[serde(default)]
    pub tunnel: Vec<TunnelConfig>, // [[tunnel]] blocks
    #[serde(default)]
    pub object: Vec<ObjectConfig>, // [[object]] blocks
}

#[derive(Debug, Deserialize)]
pub struct DungeonHeader {
    #[serde(default)]
    pub id: Option<String>,
    pub width: u32,
    pub height: u32,
    pub layers: u32,

    /// Fill every slot with a blank room before [[room]] blocks apply.
    #[serde(default)]
    pub fill: bool,

    /// Room reference where a visitor starts, e.g. "@keep{1,1,0}".
    #[serde(default)]
    pub start: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoomConfig {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub keywords: String,

    // nothing may enter or leave
    #[serde(default)]
    pub sealed: bool,
}

#[derive(Debug, Deserialize)]
pub struct TunnelConfig {
    pub from: String,
    pub direction: String,
    pub to: String,
    #[serde(default)]
    pub one_way: bool,
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    pub keywords: String,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub desc: String,

    /// Room reference the object starts in.
    pub location: String,
}

/// Result of loading a dungeon file into a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedDungeon {
    pub dungeon: DungeonId,
    pub start: Option<ObjectId>,
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Public API: load a dungeon from a .toml file on disk.
pub fn load_dungeon_from_file(
    world: &mut World,
    path: &Path,
) -> Result<LoadedDungeon, LoadError> {
    let contents = fs::read_to_string(path)?;
    load_dungeon_from_str(world, &contents)
}

/// Parse, validate and build a dungeon into `world`.
///
/// References in [[tunnel]] and [[object]] blocks may point into dungeons
/// loaded earlier. If one fails to resolve, the new dungeon's id is
/// deregistered again before the error is returned.
pub fn load_dungeon_from_str(world: &mut World, src: &str) -> Result<LoadedDungeon, LoadError> {
    let file: DungeonFile = toml::from_str(src)?;

    let problems = validate_dungeon_file(&file);
    if !problems.is_empty() {
        return Err(LoadError::Invalid(problems));
    }

    let header = &file.dungeon;
    let dims = Dimensions::new(header.width, header.height, header.layers);
    let mut options = DungeonOptions::new(dims);
    options.id = header.id.clone();
    options.fill = header.fill;
    let dungeon = world.create_dungeon(options)?;

    let built = populate(world, dungeon, &file);
    if built.is_err() {
        if let Some(id) = &header.id {
            world.deregister_dungeon(id);
        }
    }
    let start = built?;

    debug!(id = ?header.id, rooms = file.room.len(), tunnels = file.tunnel.len(), "loaded dungeon");
    Ok(LoadedDungeon { dungeon, start })
}

fn populate(
    world: &mut World,
    dungeon: DungeonId,
    file: &DungeonFile,
) -> Result<Option<ObjectId>, LoadError> {
    for rc in &file.room {
        let attributes = Attributes::new(rc.keywords.trim(), rc.display.trim())
            .with_description(normalize_multiline_desc(&rc.desc));
        let mut options =
            RoomOptions::at(Coordinates::new(rc.x, rc.y, rc.z)).attributes(attributes);
        if rc.sealed {
            options = options.policy(SealedRoom);
        }
        // validated in range, and a later block replaces a filled blank
        world.create_room(dungeon, options);
    }

    for tc in &file.tunnel {
        let from = resolve(world, &tc.from)?;
        let to = resolve(world, &tc.to)?;
        let dir = Direction::from_text(&tc.direction).ok_or_else(|| {
            LoadError::Invalid(vec![ValidationError::new(format!(
                "unknown tunnel direction '{}'",
                tc.direction
            ))])
        })?;
        world.create_tunnel(from, dir, to, tc.one_way)?;
    }

    for oc in &file.object {
        let room = resolve(world, &oc.location)?;
        let attributes = Attributes::new(oc.keywords.trim(), oc.display.trim())
            .with_description(normalize_multiline_desc(&oc.desc));
        world.create_object(ObjectOptions {
            attributes,
            location: Some(room),
            ..ObjectOptions::default()
        });
    }

    match file.dungeon.start.as_deref() {
        Some(text) => resolve(world, text).map(Some),
        None => Ok(None),
    }
}

fn resolve(world: &World, text: &str) -> Result<ObjectId, LoadError> {
    world
        .get_room_by_ref(text)
        .ok_or_else(|| LoadError::UnresolvedReference(text.to_string()))
}

/// Collapse indentation from TOML multi-line strings; blank lines separate
/// paragraphs.
fn normalize_multiline_desc(raw: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(trimmed);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs.join("\n\n")
}
