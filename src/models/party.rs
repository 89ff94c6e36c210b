use serde::{Deserialize, Serialize};

/// One hotel room as configured in the search UI. Ages may be left unset
/// while the user is still editing the party.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Room {
    pub adults: Vec<Option<u8>>,
    #[serde(default)]
    pub children: Vec<Option<u8>>,
}

/// Ordered room list for one search. Read-only to the search engine; the
/// search-modification UI owns edits.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PartyConfiguration {
    pub rooms: Vec<Room>,
}

impl PartyConfiguration {
    pub fn total_adults(&self) -> u32 {
        self.rooms.iter().map(|room| room.adults.len() as u32).sum()
    }
}

/// Per-room occupancy in the provider's wire format.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub num_of_adults: u32,
    pub child_ages: Vec<u8>,
}
