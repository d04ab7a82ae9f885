use crate::domain::line::{Line, LineId};
use crate::domain::section::{Section, SectionId};
use crate::domain::station::{Station, StationId};
use crate::utils::error::{Result, SubwayError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRequest {
    pub name: String,
    pub color: String,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineUpdateRequest {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionRequest {
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
}

impl From<&Station> for StationResponse {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id(),
            name: station.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: LineId,
    pub name: String,
    pub color: String,
    pub stations: Vec<StationResponse>,
    pub distance: u64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

impl LineResponse {
    /// Only persisted lines can be rendered; they always carry an id.
    pub fn of(line: &Line) -> Result<Self> {
        let id = line.id().ok_or_else(|| SubwayError::ValidationError {
            field: "id".to_string(),
            reason: format!("line {} has not been persisted", line.name()),
        })?;
        Ok(Self {
            id,
            name: line.name().to_string(),
            color: line.color().to_string(),
            stations: line.stations().iter().map(StationResponse::from).collect(),
            distance: line.chain().total_distance()?,
            created_date: line.created_at(),
            modified_date: line.modified_at(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResponse {
    pub id: Option<SectionId>,
    pub up_station: StationResponse,
    pub down_station: StationResponse,
    pub distance: u64,
}

impl From<&Section> for SectionResponse {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id(),
            up_station: section.up_station().into(),
            down_station: section.down_station().into(),
            distance: section.distance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsResponse {
    pub line_id: LineId,
    pub sections: Vec<SectionResponse>,
}

impl SectionsResponse {
    pub fn new(line_id: LineId, sections: &[Section]) -> Self {
        Self {
            line_id,
            sections: sections.iter().map(SectionResponse::from).collect(),
        }
    }

    /// Most recently persisted section, the one a create request points at.
    pub fn newest_section_id(&self) -> Option<SectionId> {
        self.sections.iter().filter_map(|s| s.id).max()
    }
}
