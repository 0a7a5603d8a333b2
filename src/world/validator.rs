use std::collections::HashSet;

use crate::direction::Direction;

use super::loader::DungeonFile;
use super::model::{Coordinates, Dimensions};
use super::reference::{is_referable_id, parse_room_ref};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Collect every structural problem in a parsed dungeon file. References are
/// only checked for syntax here; whether they name a room is decided when
/// the dungeon is built.
pub fn validate_dungeon_file(file: &DungeonFile) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();
    let header = &file.dungeon;
    let dims = Dimensions::new(header.width, header.height, header.layers);

    if dims.volume() == 0 {
        errors.push(ValidationError::new(format!(
            "dungeon dimensions {}x{}x{} leave no room slots",
            header.width, header.height, header.layers
        )));
    }

    if let Some(id) = &header.id {
        if id.trim().is_empty() || !is_referable_id(id) {
            errors.push(ValidationError::new(format!(
                "dungeon id '{}' may not be empty or contain braces",
                id
            )));
        }
    }

    if let Some(start) = &header.start {
        check_ref(start, "dungeon.start", &mut errors);
    }

    // Rooms: in bounds, one per slot
    let mut seen: HashSet<Coordinates> = HashSet::new();
    for room in &file.room {
        let at = Coordinates::new(room.x, room.y, room.z);
        if !dims.contains(at) {
            errors.push(ValidationError::new(format!(
                "room '{}' at {{{},{},{}}} is outside the dungeon",
                room.display, at.x, at.y, at.z
            )));
        }
        if !seen.insert(at) {
            errors.push(ValidationError::new(format!(
                "more than one room at {{{},{},{}}}",
                at.x, at.y, at.z
            )));
        }
    }

    for (i, tunnel) in file.tunnel.iter().enumerate() {
        let label = format!("tunnel #{}", i + 1);
        if Direction::from_text(&tunnel.direction).is_none() {
            errors.push(ValidationError::new(format!(
                "{} has unknown direction '{}'",
                label, tunnel.direction
            )));
        }
        check_ref(&tunnel.from, &format!("{} from", label), &mut errors);
        check_ref(&tunnel.to, &format!("{} to", label), &mut errors);
    }

    for object in &file.object {
        if object.keywords.trim().is_empty() {
            errors.push(ValidationError::new(format!(
                "object '{}' has no keywords",
                object.display
            )));
        }
        check_ref(
            &object.location,
            &format!("object '{}' location", object.keywords.trim()),
            &mut errors,
        );
    }

    errors
}

fn check_ref(text: &str, label: &str, errors: &mut Vec<ValidationError>) {
    if parse_room_ref(text).is_none() {
        errors.push(ValidationError::new(format!(
            "{} '{}' is not a room reference like @id{{x,y,z}}",
            label, text
        )));
    }
}
