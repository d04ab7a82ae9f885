use crate::domain::line::{Line, LineId};
use crate::domain::station::{Station, StationId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Station directory. The core only ever resolves ids through it.
#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn save(&self, name: &str) -> Result<Station>;
    async fn find_by_id(&self, id: StationId) -> Result<Option<Station>>;
    async fn find_all(&self) -> Result<Vec<Station>>;
}

/// Line storage.
///
/// Implementations serialize writes per line: `save` must reject a line whose
/// `version` no longer matches the stored one, and must return the persisted
/// state with every id assigned and the version bumped.
#[async_trait]
pub trait LineRepository: Send + Sync {
    async fn find_by_id(&self, id: LineId) -> Result<Option<Line>>;
    async fn find_all(&self) -> Result<Vec<Line>>;
    async fn save(&self, line: Line) -> Result<Line>;
    async fn delete_by_id(&self, id: LineId) -> Result<bool>;
}
