use crate::domain::line::{Line, LineId};
use crate::domain::ports::{LineRepository, StationRepository};
use crate::domain::section::SectionId;
use crate::domain::station::{Station, StationId};
use crate::utils::error::{Result, SubwayError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct StationTable {
    next_id: StationId,
    rows: BTreeMap<StationId, Station>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStationRepository {
    table: Arc<Mutex<StationTable>>,
}

impl InMemoryStationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StationRepository for InMemoryStationRepository {
    async fn save(&self, name: &str) -> Result<Station> {
        let mut table = self.table.lock().await;
        table.next_id += 1;
        let station = Station::new(table.next_id, name);
        table.rows.insert(station.id(), station.clone());
        tracing::debug!("Registered station {} ({})", station.name(), station.id());
        Ok(station)
    }

    async fn find_by_id(&self, id: StationId) -> Result<Option<Station>> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Station>> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }
}

#[derive(Debug, Default)]
struct LineTable {
    next_line_id: LineId,
    next_section_id: SectionId,
    rows: BTreeMap<LineId, Line>,
}

/// Lines kept in process memory.
///
/// The table lock makes each `save` atomic, and the version check turns a
/// save based on a stale read into `ConcurrentModification`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLineRepository {
    table: Arc<Mutex<LineTable>>,
}

impl InMemoryLineRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LineRepository for InMemoryLineRepository {
    async fn find_by_id(&self, id: LineId) -> Result<Option<Line>> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Line>> {
        let table = self.table.lock().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn save(&self, mut line: Line) -> Result<Line> {
        let mut table = self.table.lock().await;

        let id = match line.id() {
            Some(id) => {
                let stored = table
                    .rows
                    .get(&id)
                    .ok_or(SubwayError::LineNotFound { id })?;
                if stored.version() != line.version() {
                    return Err(SubwayError::ConcurrentModification {
                        line_id: id,
                        expected: line.version(),
                        found: stored.version(),
                    });
                }
                id
            }
            None => {
                table.next_line_id += 1;
                let id = table.next_line_id;
                line.assign_id(id);
                id
            }
        };

        let mut next_section_id = table.next_section_id;
        line.assign_section_ids(|| {
            next_section_id += 1;
            next_section_id
        });
        table.next_section_id = next_section_id;
        line.set_version(line.version() + 1);

        table.rows.insert(id, line.clone());
        tracing::debug!("Saved line {} at version {}", id, line.version());
        Ok(line)
    }

    async fn delete_by_id(&self, id: LineId) -> Result<bool> {
        let mut table = self.table.lock().await;
        Ok(table.rows.remove(&id).is_some())
    }
}
