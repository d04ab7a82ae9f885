use crate::core::dto::{
    LineRequest, LineResponse, LineUpdateRequest, SectionRequest, SectionsResponse,
};
use crate::domain::line::{Line, LineId};
use crate::domain::ports::{LineRepository, StationRepository};
use crate::domain::section::Section;
use crate::domain::station::{Station, StationId};
use crate::utils::error::{Result, SubwayError};

/// Application service for lines and their sections.
///
/// Every mutation is load, mutate, save. The repository's version check is
/// what keeps two interleaved mutations of one line from losing an update.
pub struct LineService<L: LineRepository, S: StationRepository> {
    lines: L,
    stations: S,
}

impl<L: LineRepository, S: StationRepository> LineService<L, S> {
    pub fn new(lines: L, stations: S) -> Self {
        Self { lines, stations }
    }

    pub fn stations(&self) -> &S {
        &self.stations
    }

    pub async fn create_line(&self, request: LineRequest) -> Result<LineResponse> {
        let section = self
            .section_from(request.up_station_id, request.down_station_id, request.distance)
            .await?;
        let line = Line::new(request.name, request.color, section)?;

        let saved = self.lines.save(line).await?;
        tracing::info!("Created line {} ({:?})", saved.name(), saved.id());
        LineResponse::of(&saved)
    }

    pub async fn find_all_lines(&self) -> Result<Vec<LineResponse>> {
        let lines = self.lines.find_all().await?;
        lines.iter().map(LineResponse::of).collect()
    }

    pub async fn find_line(&self, line_id: LineId) -> Result<LineResponse> {
        let line = self.load(line_id).await?;
        LineResponse::of(&line)
    }

    pub async fn update_line(
        &self,
        line_id: LineId,
        request: LineUpdateRequest,
    ) -> Result<LineResponse> {
        let mut line = self.load(line_id).await?;
        line.rename(request.name, request.color)?;

        let saved = self.lines.save(line).await?;
        tracing::info!("Updated line {} -> {} / {}", line_id, saved.name(), saved.color());
        LineResponse::of(&saved)
    }

    pub async fn delete_line(&self, line_id: LineId) -> Result<()> {
        if !self.lines.delete_by_id(line_id).await? {
            return Err(SubwayError::LineNotFound { id: line_id });
        }
        tracing::info!("Deleted line {}", line_id);
        Ok(())
    }

    pub async fn add_section(
        &self,
        line_id: LineId,
        request: SectionRequest,
    ) -> Result<SectionsResponse> {
        let mut line = self.load(line_id).await?;
        let section = self
            .section_from(request.up_station_id, request.down_station_id, request.distance)
            .await?;
        tracing::debug!(
            "Adding section {} -> {} ({}) to line {}",
            section.up_station(),
            section.down_station(),
            section.distance(),
            line_id
        );

        if let Err(e) = line.add_section(section) {
            tracing::warn!("Rejected section on line {}: {}", line_id, e);
            return Err(e);
        }

        let saved = self.lines.save(line).await?;
        tracing::info!(
            "Line {} now has {} sections",
            line_id,
            saved.sections().len()
        );
        Ok(SectionsResponse::new(line_id, saved.sections()))
    }

    pub async fn remove_section(
        &self,
        line_id: LineId,
        station_id: StationId,
    ) -> Result<SectionsResponse> {
        let mut line = self.load(line_id).await?;
        let station = self.resolve_station(station_id).await?;

        if let Err(e) = line.remove_section(&station) {
            tracing::warn!("Rejected removal of {} from line {}: {}", station, line_id, e);
            return Err(e);
        }

        let saved = self.lines.save(line).await?;
        tracing::info!("Removed {} from line {}", station, line_id);
        Ok(SectionsResponse::new(line_id, saved.sections()))
    }

    pub async fn resolve_station(&self, station_id: StationId) -> Result<Station> {
        self.stations
            .find_by_id(station_id)
            .await?
            .ok_or_else(|| SubwayError::StationNotFound {
                station: format!("id {}", station_id),
            })
    }

    async fn load(&self, line_id: LineId) -> Result<Line> {
        self.lines
            .find_by_id(line_id)
            .await?
            .ok_or(SubwayError::LineNotFound { id: line_id })
    }

    async fn section_from(
        &self,
        up_station_id: StationId,
        down_station_id: StationId,
        distance: i64,
    ) -> Result<Section> {
        let up = self.resolve_station(up_station_id).await?;
        let down = self.resolve_station(down_station_id).await?;
        Section::new(up, down, distance)
    }
}
