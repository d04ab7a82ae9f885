use crate::config::scenario::{Operation, ScenarioConfig};
use crate::core::dto::{
    LineRequest, LineResponse, LineUpdateRequest, SectionRequest, StationResponse,
};
use crate::core::LineService;
use crate::domain::line::LineId;
use crate::domain::ports::{LineRepository, StationRepository};
use crate::domain::station::StationId;
use crate::utils::error::{Result, SubwayError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
}

impl From<&SubwayError> for ErrorReport {
    fn from(error: &SubwayError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.user_friendly_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub index: usize,
    pub operation: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: Option<String>,
    pub stations: Vec<StationResponse>,
    pub lines: Vec<LineResponse>,
    pub outcomes: Vec<OperationOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Replays a [`ScenarioConfig`] against a [`LineService`].
pub struct ScenarioRunner<L: LineRepository, S: StationRepository> {
    service: LineService<L, S>,
    config: ScenarioConfig,
}

impl<L: LineRepository, S: StationRepository> ScenarioRunner<L, S> {
    pub fn new(service: LineService<L, S>, config: ScenarioConfig) -> Self {
        Self { service, config }
    }

    pub async fn run(&self) -> Result<ScenarioReport> {
        let start = Instant::now();
        tracing::info!(
            "🚇 Running scenario {} ({} operations)",
            self.config.settings.name.as_deref().unwrap_or("<unnamed>"),
            self.config.operations.len()
        );

        let mut session = Session::default();

        let mut stations = Vec::with_capacity(self.config.stations.len());
        for spec in &self.config.stations {
            let station = self.service.stations().save(&spec.name).await?;
            session.stations.insert(spec.name.clone(), station.id());
            stations.push(StationResponse::from(&station));
        }

        for spec in &self.config.lines {
            let request = LineRequest {
                name: spec.name.clone(),
                color: spec.color.clone(),
                up_station_id: session.station_id(&spec.up_station)?,
                down_station_id: session.station_id(&spec.down_station)?,
                distance: spec.distance,
            };
            let line = self.service.create_line(request).await?;
            session.lines.insert(spec.name.clone(), line.id);
        }

        let mut outcomes = Vec::with_capacity(self.config.operations.len());
        for (index, operation) in self.config.operations.iter().enumerate() {
            let label = operation.label();
            match self.execute(&mut session, operation).await {
                Ok(response) => {
                    tracing::debug!("✅ [{}] {}", index, label);
                    outcomes.push(OperationOutcome {
                        index,
                        operation: label,
                        status: OutcomeStatus::Ok,
                        response: Some(response),
                        error: None,
                    });
                }
                Err(e) if self.config.stop_on_error() => {
                    tracing::error!("❌ [{}] {} aborted the scenario: {}", index, label, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("⚠️ [{}] {} failed: {}", index, label, e);
                    outcomes.push(OperationOutcome {
                        index,
                        operation: label,
                        status: OutcomeStatus::Error,
                        response: None,
                        error: Some(ErrorReport::from(&e)),
                    });
                }
            }
        }

        let failed = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Error)
            .count();
        tracing::info!(
            "Scenario finished in {:?}: {} ok, {} failed",
            start.elapsed(),
            outcomes.len() - failed,
            failed
        );

        // Final state of every line, after all operations.
        let lines = self.service.find_all_lines().await?;

        Ok(ScenarioReport {
            name: self.config.settings.name.clone(),
            stations,
            lines,
            succeeded: outcomes.len() - failed,
            failed,
            outcomes,
        })
    }

    async fn execute(
        &self,
        session: &mut Session,
        operation: &Operation,
    ) -> Result<serde_json::Value> {
        let value = match operation {
            Operation::AddSection {
                line,
                up_station,
                down_station,
                distance,
            } => {
                let request = SectionRequest {
                    up_station_id: session.station_id(up_station)?,
                    down_station_id: session.station_id(down_station)?,
                    distance: *distance,
                };
                let response = self
                    .service
                    .add_section(session.line_id(line)?, request)
                    .await?;
                serde_json::to_value(response)?
            }
            Operation::RemoveSection { line, station } => {
                let response = self
                    .service
                    .remove_section(session.line_id(line)?, session.station_id(station)?)
                    .await?;
                serde_json::to_value(response)?
            }
            Operation::UpdateLine { line, name, color } => {
                let line_id = session.line_id(line)?;
                let request = LineUpdateRequest {
                    name: name.clone(),
                    color: color.clone(),
                };
                let response = self.service.update_line(line_id, request).await?;
                session.rename_line(line, name.clone(), line_id);
                serde_json::to_value(response)?
            }
            Operation::DeleteLine { line } => {
                self.service.delete_line(session.line_id(line)?).await?;
                serde_json::Value::Null
            }
            Operation::ShowLine { line } => {
                let response = self.service.find_line(session.line_id(line)?).await?;
                serde_json::to_value(response)?
            }
            Operation::ShowLines => serde_json::to_value(self.service.find_all_lines().await?)?,
        };
        Ok(value)
    }
}

/// Names in the scenario file mapped to ids handed out by the repositories.
#[derive(Debug, Default)]
struct Session {
    stations: HashMap<String, StationId>,
    lines: HashMap<String, LineId>,
}

impl Session {
    fn station_id(&self, name: &str) -> Result<StationId> {
        self.stations
            .get(name)
            .copied()
            .ok_or_else(|| SubwayError::StationNotFound {
                station: name.to_string(),
            })
    }

    fn rename_line(&mut self, old_name: &str, new_name: String, line_id: LineId) {
        self.lines.remove(old_name);
        self.lines.insert(new_name, line_id);
    }

    fn line_id(&self, name: &str) -> Result<LineId> {
        self.lines
            .get(name)
            .copied()
            .ok_or_else(|| SubwayError::ConfigValidationError {
                field: "operations.line".to_string(),
                message: format!("unknown line '{}'", name),
            })
    }
}
