//! Default haunted house: 13 rooms across the ground floor and basement,
//! entered through the hunters' van.
//!
//! Layout (every edge is two-way):
//!
//! ```text
//! Van -- Hallway -- Master Bedroom -- Bathroom
//!          |  |  \
//!          |  |   Boy's Bedroom
//!          |  Kitchen -- Living Room
//!          |     |
//!          |   Garage -- Utility Room
//!          |
//!       Basement -- Basement Hallway -- Right Storage Room
//!                          |
//!                   Left Storage Room
//! ```
//!
//! The Bathroom hangs off the Master Bedroom rather than the Hallway so that
//! no room exceeds the five-connection bound.

use crate::error::WorldError;
use crate::house::{House, HouseBuilder};

/// Name of the room hunters start in.
pub const ENTRY_ROOM_NAME: &str = "Van";

/// Room names in creation order.
pub const DEFAULT_ROOM_NAMES: [&str; 13] = [
    ENTRY_ROOM_NAME,
    "Hallway",
    "Master Bedroom",
    "Boy's Bedroom",
    "Bathroom",
    "Basement",
    "Basement Hallway",
    "Right Storage Room",
    "Left Storage Room",
    "Kitchen",
    "Living Room",
    "Garage",
    "Utility Room",
];

/// Two-way connections between [`DEFAULT_ROOM_NAMES`].
const DEFAULT_CONNECTIONS: [(&str, &str); 12] = [
    (ENTRY_ROOM_NAME, "Hallway"),
    ("Hallway", "Master Bedroom"),
    ("Hallway", "Boy's Bedroom"),
    ("Master Bedroom", "Bathroom"),
    ("Hallway", "Kitchen"),
    ("Hallway", "Basement"),
    ("Basement", "Basement Hallway"),
    ("Basement Hallway", "Right Storage Room"),
    ("Basement Hallway", "Left Storage Room"),
    ("Kitchen", "Living Room"),
    ("Kitchen", "Garage"),
    ("Garage", "Utility Room"),
];

/// Build the default house with the Van as the entry room.
///
/// # Errors
///
/// Returns [`WorldError`] if construction fails (should not happen with the
/// hard-coded layout).
pub fn create_default_house() -> Result<House, WorldError> {
    let mut builder = HouseBuilder::new();
    for name in DEFAULT_ROOM_NAMES {
        builder.create_room(name)?;
    }
    for (a, b) in DEFAULT_CONNECTIONS {
        builder.connect_by_name(a, b)?;
    }
    let entry = builder.room_id(ENTRY_ROOM_NAME)?;
    builder.build(entry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::room::MAX_CONNECTED_ROOMS;

    #[test]
    fn default_house_builds() {
        let house = create_default_house();
        assert!(house.is_ok());
        let house = house.unwrap();
        assert_eq!(house.len(), 13);
        assert_eq!(house.name_of(house.entry()), ENTRY_ROOM_NAME);
    }

    #[test]
    fn default_house_respects_degree_bound_and_symmetry() {
        let house = create_default_house().unwrap();
        for room in house.rooms() {
            assert!(room.degree() <= MAX_CONNECTED_ROOMS, "{} too wide", room.name());
            for neighbor in room.neighbors() {
                let other = house.room(*neighbor);
                assert!(other.is_some_and(|o| o.is_connected_to(room.id())));
            }
        }
    }

    #[test]
    fn van_connects_only_to_hallway() {
        let house = create_default_house().unwrap();
        let van = house.room_by_name(ENTRY_ROOM_NAME);
        let hallway = house.room_by_name("Hallway");
        assert!(van.is_some() && hallway.is_some());
        if let (Some(van), Some(hallway)) = (van, hallway) {
            assert_eq!(van.neighbors(), &[hallway.id()]);
        }
    }
}
