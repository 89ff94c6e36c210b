use std::error::Error;
use std::fmt;

use crate::models::party::{PartyConfiguration, RoomOccupancy};

pub const MIN_ADULT_AGE: u8 = 18;
pub const MAX_ADULT_AGE: u8 = 120;
pub const MAX_CHILD_AGE: u8 = 17;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPartyError {
    NoRooms,
    NoAdults { room: usize },
    AdultAgeOutOfRange { room: usize, age: u8 },
    ChildAgeOutOfRange { room: usize, age: u8 },
}

impl fmt::Display for InvalidPartyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPartyError::NoRooms => write!(f, "party has no rooms"),
            InvalidPartyError::NoAdults { room } => {
                write!(f, "room {} has no adults; every room needs at least one", room + 1)
            }
            InvalidPartyError::AdultAgeOutOfRange { room, age } => write!(
                f,
                "room {} has adult age {} outside {}-{}",
                room + 1,
                age,
                MIN_ADULT_AGE,
                MAX_ADULT_AGE
            ),
            InvalidPartyError::ChildAgeOutOfRange { room, age } => write!(
                f,
                "room {} has child age {} outside 0-{}",
                room + 1,
                age,
                MAX_CHILD_AGE
            ),
        }
    }
}

impl Error for InvalidPartyError {}

/// Convert a party configuration into the provider's occupancy wire format:
/// one entry per room. Unset adult ages still count toward `numOfAdults`;
/// unset child ages are left off the wire list.
pub fn to_occupancies(
    party: &PartyConfiguration,
) -> Result<Vec<RoomOccupancy>, InvalidPartyError> {
    if party.rooms.is_empty() {
        return Err(InvalidPartyError::NoRooms);
    }

    let mut occupancies = Vec::with_capacity(party.rooms.len());
    for (idx, room) in party.rooms.iter().enumerate() {
        if room.adults.is_empty() {
            return Err(InvalidPartyError::NoAdults { room: idx });
        }
        for age in room.adults.iter().flatten() {
            if *age < MIN_ADULT_AGE || *age > MAX_ADULT_AGE {
                return Err(InvalidPartyError::AdultAgeOutOfRange { room: idx, age: *age });
            }
        }
        for age in room.children.iter().flatten() {
            if *age > MAX_CHILD_AGE {
                return Err(InvalidPartyError::ChildAgeOutOfRange { room: idx, age: *age });
            }
        }

        occupancies.push(RoomOccupancy {
            num_of_adults: room.adults.len() as u32,
            child_ages: room.children.iter().flatten().copied().collect(),
        });
    }

    Ok(occupancies)
}
