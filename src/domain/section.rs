use crate::domain::station::Station;
use crate::utils::error::{Result, SubwayError};

pub type SectionId = u64;

/// A directed segment of a line, travelled from `up_station` to `down_station`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: Option<SectionId>,
    up_station: Station,
    down_station: Station,
    distance: u64,
}

impl Section {
    pub fn new(up_station: Station, down_station: Station, distance: i64) -> Result<Self> {
        if distance <= 0 {
            return Err(SubwayError::InvalidDistance {
                reason: format!("distance must be a positive integer, got {}", distance),
            });
        }
        if up_station == down_station {
            return Err(SubwayError::InvalidDistance {
                reason: format!(
                    "up and down station must differ, both are {}",
                    up_station
                ),
            });
        }

        Ok(Self {
            id: None,
            up_station,
            down_station,
            distance: distance as u64,
        })
    }

    /// Rebuilds a section that was already validated and persisted.
    pub fn with_id(mut self, id: SectionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<SectionId> {
        self.id
    }

    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    pub fn distance(&self) -> u64 {
        self.distance
    }

    pub fn contains_station(&self, station: &Station) -> bool {
        self.up_station == *station || self.down_station == *station
    }

    pub fn shares_endpoint_with(&self, other: &Section) -> bool {
        self.contains_station(&other.up_station) || self.contains_station(&other.down_station)
    }

    /// Duplicate check: same (up, down) pair, ignoring any assigned id.
    pub fn same_pair(&self, other: &Section) -> bool {
        self.up_station == other.up_station && self.down_station == other.down_station
    }

    pub(crate) fn assign_id(&mut self, id: SectionId) {
        self.id = Some(id);
    }

    // Chain-internal mutations. The chain guarantees the results stay positive
    // and that endpoints never collapse into one station.

    pub(crate) fn shorten_from_up(&mut self, new_up: Station, removed: u64) {
        self.up_station = new_up;
        self.distance -= removed;
    }

    pub(crate) fn shorten_from_down(&mut self, new_down: Station, removed: u64) {
        self.down_station = new_down;
        self.distance -= removed;
    }

    /// Distance of this section joined with the one that follows it.
    pub(crate) fn merged_distance(&self, next: &Section) -> Result<u64> {
        self.distance
            .checked_add(next.distance)
            .ok_or_else(|| SubwayError::InvalidDistance {
                reason: format!(
                    "merging {} -> {} and {} -> {} overflows the distance range",
                    self.up_station, self.down_station, next.up_station, next.down_station
                ),
            })
    }

    pub(crate) fn extend_down(&mut self, next: Section, merged_distance: u64) {
        self.down_station = next.down_station;
        self.distance = merged_distance;
    }
}
