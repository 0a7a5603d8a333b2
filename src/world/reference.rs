use std::fmt;

use super::model::{Coordinates, ObjectId, World};

/// Parsed form of `@<dungeon-id>{<x>,<y>,<z>}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRef {
    pub dungeon: String,
    pub coordinates: Coordinates,
}

impl fmt::Display for RoomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.coordinates;
        write!(f, "@{}{{{},{},{}}}", self.dungeon, c.x, c.y, c.z)
    }
}

/// Strict parse: any deviation from the format yields `None`.
pub fn parse_room_ref(text: &str) -> Option<RoomRef> {
    let rest = text.strip_prefix('@')?;
    let open = rest.find('{')?;
    let (id, tail) = rest.split_at(open);
    if !is_referable_id(id) {
        return None;
    }
    let inner = tail.strip_prefix('{')?.strip_suffix('}')?;

    let mut parts = inner.split(',');
    let x = parse_signed(parts.next()?)?;
    let y = parse_signed(parts.next()?)?;
    let z = parse_signed(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    Some(RoomRef {
        dungeon: id.to_string(),
        coordinates: Coordinates::new(x, y, z),
    })
}

/// Ids that can appear in a reference: non-empty and free of braces.
pub(crate) fn is_referable_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['{', '}'])
}

fn parse_signed(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl World {
    /// Resolve a room reference against the registry.
    pub fn get_room_by_ref(&self, text: &str) -> Option<ObjectId> {
        let parsed = parse_room_ref(text)?;
        let dungeon = self.find_dungeon(&parsed.dungeon)?;
        self.get_room(dungeon, parsed.coordinates)
    }

    /// Reference text for a room whose dungeon is registered under an id.
    pub fn room_ref(&self, room: ObjectId) -> Option<String> {
        let object = self.object(room)?;
        let coordinates = object.room_state()?.coordinates;
        let dungeon = self.dungeon(object.dungeon?)?;
        let id = dungeon.id()?;
        Some(
            RoomRef {
                dungeon: id.to_string(),
                coordinates,
            }
            .to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_exact_format() {
        let parsed = parse_room_ref("@keep-2{0,-4,+1}").unwrap();
        assert_eq!(parsed.dungeon, "keep-2");
        assert_eq!(parsed.coordinates, Coordinates::new(0, -4, 1));
        assert_eq!(
            parse_room_ref("@a b{1,2,3}").map(|r| r.dungeon),
            Some("a b".to_string())
        );
    }

    #[test]
    fn rejects_deviations() {
        for bad in [
            "@id{1,2}",
            "@{1,2,3}",
            "id{1,2,3}",
            "@id{1,2,3,4}",
            "@id{1, 2,3}",
            "@id{1,2,3}x",
            "@id{1,2,x}",
            "@id{1,,3}",
            "@id{-,2,3}",
            "@i}d{1,2,3}",
            "@id{{1,2,3}",
            "@id1,2,3",
            "",
        ] {
            assert_eq!(parse_room_ref(bad), None, "{bad}");
        }
    }

    #[test]
    fn display_round_trips() {
        let r = RoomRef {
            dungeon: "vault".into(),
            coordinates: Coordinates::new(3, -1, 0),
        };
        assert_eq!(r.to_string(), "@vault{3,-1,0}");
        assert_eq!(parse_room_ref(&r.to_string()), Some(r));
    }
}
