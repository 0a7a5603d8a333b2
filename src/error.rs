use std::io;

use thiserror::Error;

use crate::direction::Direction;
use crate::world::{ObjectId, ValidationError};

/// Construction-time failures. Everything else in the core is absorbed as
/// a no-op or reported as an absent result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("a dungeon with id '{0}' is already registered")]
    DuplicateDungeonId(String),

    #[error("dungeon id '{0}' may not be empty or contain braces")]
    InvalidDungeonId(String),

    #[error("direction {0:?} has no reverse")]
    UnresolvableDirection(Direction),

    #[error("object {0:?} is not a room")]
    NotARoom(ObjectId),

    #[error("room {room:?} already has a link leading {direction}")]
    LinkConflict { room: ObjectId, direction: Direction },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dungeon file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse dungeon file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("dungeon file is invalid: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    #[error("reference '{0}' does not name a room")]
    UnresolvedReference(String),

    #[error(transparent)]
    World(#[from] WorldError),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
