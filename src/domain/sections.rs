use crate::domain::section::{Section, SectionId};
use crate::domain::station::Station;
use crate::utils::error::{Result, SubwayError};
use std::collections::{HashMap, HashSet};

/// The sections of one line, kept as a single unbranched path.
///
/// Sections are stored in path order, from the up terminus to the down
/// terminus. Every mutation validates fully before touching the vector, so a
/// failed `add` or `remove` leaves the chain exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChain {
    sections: Vec<Section>,
}

impl SectionChain {
    pub fn new(initial: Section) -> Self {
        Self {
            sections: vec![initial],
        }
    }

    /// Rebuilds a chain from sections in any order, e.g. rows loaded from storage.
    pub fn from_sections(sections: Vec<Section>) -> Result<Self> {
        if sections.is_empty() {
            return Err(SubwayError::InvalidChainState {
                message: "a line needs at least one section".to_string(),
            });
        }

        let mut by_up: HashMap<&Station, &Section> = HashMap::with_capacity(sections.len());
        for section in &sections {
            if by_up.insert(section.up_station(), section).is_some() {
                return Err(SubwayError::InvalidChainState {
                    message: format!("station {} has more than one outgoing section", section.up_station()),
                });
            }
        }

        let downs: HashSet<&Station> = sections.iter().map(Section::down_station).collect();
        let heads: Vec<&Section> = sections
            .iter()
            .filter(|s| !downs.contains(s.up_station()))
            .collect();
        let [head] = heads.as_slice() else {
            return Err(SubwayError::InvalidChainState {
                message: format!("expected exactly one up terminus, found {}", heads.len()),
            });
        };

        let mut ordered = Vec::with_capacity(sections.len());
        let mut current = Some(*head);
        while let Some(section) = current {
            if ordered.len() == sections.len() {
                break;
            }
            ordered.push(section.clone());
            current = by_up.get(section.down_station()).copied();
        }

        if ordered.len() != sections.len() {
            return Err(SubwayError::InvalidChainState {
                message: "sections do not form a single path".to_string(),
            });
        }

        Ok(Self { sections: ordered })
    }

    /// Sections in travel order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Length of the whole line. Fails instead of wrapping when the sum leaves `u64`.
    pub fn total_distance(&self) -> Result<u64> {
        self.sections
            .iter()
            .try_fold(0u64, |total, s| total.checked_add(s.distance()))
            .ok_or_else(|| SubwayError::InvalidDistance {
                reason: "total line distance overflows the distance range".to_string(),
            })
    }

    pub fn contains(&self, station: &Station) -> bool {
        self.sections.iter().any(|s| s.contains_station(station))
    }

    /// Every distinct station on the line, in travel order.
    pub fn all_stations(&self) -> Vec<Station> {
        let mut stations = Vec::with_capacity(self.sections.len() + 1);
        if let Some(first) = self.sections.first() {
            stations.push(first.up_station().clone());
        }
        stations.extend(self.sections.iter().map(|s| s.down_station().clone()));
        stations
    }

    pub fn up_terminus(&self) -> Result<&Station> {
        let downs: HashSet<&Station> = self.sections.iter().map(Section::down_station).collect();
        single_terminus(
            "up",
            self.sections
                .iter()
                .map(Section::up_station)
                .filter(|station| !downs.contains(station)),
        )
    }

    pub fn down_terminus(&self) -> Result<&Station> {
        let ups: HashSet<&Station> = self.sections.iter().map(Section::up_station).collect();
        single_terminus(
            "down",
            self.sections
                .iter()
                .map(Section::down_station)
                .filter(|station| !ups.contains(station)),
        )
    }

    /// Inserts `section`, extending a terminus or splitting the section it falls inside.
    pub fn add(&mut self, section: Section) -> Result<&[Section]> {
        let up_in = self.contains(section.up_station());
        let down_in = self.contains(section.down_station());

        if up_in && down_in {
            return Err(SubwayError::DuplicateSection {
                up: section.up_station().to_string(),
                down: section.down_station().to_string(),
            });
        }
        if !up_in && !down_in {
            return Err(disconnected(&section));
        }

        // Terminus extension wins over an interior split.
        if section.up_station() == self.down_terminus()? {
            self.sections.push(section);
        } else if section.down_station() == self.up_terminus()? {
            self.sections.insert(0, section);
        } else if let Some(index) = self.position(|s| s.up_station() == section.up_station()) {
            self.split_up_side(index, section)?;
        } else if let Some(index) = self.position(|s| s.down_station() == section.down_station()) {
            self.split_down_side(index, section)?;
        } else {
            return Err(disconnected(&section));
        }

        Ok(&self.sections)
    }

    /// Removes `station` from the line, merging its two sections when it is interior.
    pub fn remove(&mut self, station: &Station) -> Result<&[Section]> {
        if self.sections.len() == 1 {
            return Err(SubwayError::LastSectionRemoval);
        }
        if !self.contains(station) {
            return Err(SubwayError::StationNotFound {
                station: station.to_string(),
            });
        }

        if station == self.up_terminus()? {
            let index = self.require_position(|s| s.up_station() == station)?;
            self.sections.remove(index);
        } else if station == self.down_terminus()? {
            let index = self.require_position(|s| s.down_station() == station)?;
            self.sections.remove(index);
        } else {
            let incoming = self.require_position(|s| s.down_station() == station)?;
            let outgoing = self.require_position(|s| s.up_station() == station)?;
            let merged = self.sections[incoming].merged_distance(&self.sections[outgoing])?;
            let next = self.sections.remove(outgoing);
            let incoming = if outgoing < incoming {
                incoming - 1
            } else {
                incoming
            };
            self.sections[incoming].extend_down(next, merged);
        }

        Ok(&self.sections)
    }

    pub(crate) fn assign_missing_ids(&mut self, mut next_id: impl FnMut() -> SectionId) {
        for section in self.sections.iter_mut().filter(|s| s.id().is_none()) {
            section.assign_id(next_id());
        }
    }

    fn split_up_side(&mut self, index: usize, section: Section) -> Result<()> {
        let existing = &mut self.sections[index];
        ensure_shorter(existing, &section)?;
        existing.shorten_from_up(section.down_station().clone(), section.distance());
        self.sections.insert(index, section);
        Ok(())
    }

    fn split_down_side(&mut self, index: usize, section: Section) -> Result<()> {
        let existing = &mut self.sections[index];
        ensure_shorter(existing, &section)?;
        existing.shorten_from_down(section.up_station().clone(), section.distance());
        self.sections.insert(index + 1, section);
        Ok(())
    }

    fn position(&self, predicate: impl Fn(&Section) -> bool) -> Option<usize> {
        self.sections.iter().position(predicate)
    }

    fn require_position(&self, predicate: impl Fn(&Section) -> bool) -> Result<usize> {
        self.position(predicate)
            .ok_or_else(|| SubwayError::InvalidChainState {
                message: "interior station is missing an adjacent section".to_string(),
            })
    }
}

fn single_terminus<'a>(
    side: &str,
    mut candidates: impl Iterator<Item = &'a Station>,
) -> Result<&'a Station> {
    match (candidates.next(), candidates.next()) {
        (Some(station), None) => Ok(station),
        (None, _) => Err(SubwayError::InvalidChainState {
            message: format!("no {} terminus", side),
        }),
        (Some(first), Some(second)) => Err(SubwayError::InvalidChainState {
            message: format!("more than one {} terminus ({}, {})", side, first, second),
        }),
    }
}

fn ensure_shorter(existing: &Section, section: &Section) -> Result<()> {
    if section.distance() >= existing.distance() {
        return Err(SubwayError::InvalidDistance {
            reason: format!(
                "new section ({}) must be shorter than the section it divides ({} -> {}, {})",
                section.distance(),
                existing.up_station(),
                existing.down_station(),
                existing.distance()
            ),
        });
    }
    Ok(())
}

fn disconnected(section: &Section) -> SubwayError {
    SubwayError::DisconnectedSection {
        up: section.up_station().to_string(),
        down: section.down_station().to_string(),
    }
}
