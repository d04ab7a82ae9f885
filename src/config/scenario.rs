use crate::utils::error::{Result, SubwayError};
use crate::utils::validation::{validate_non_empty_string, validate_unique_names, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A scripted session: stations to register, lines to open, then operations to replay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub settings: ScenarioSettings,
    #[serde(default)]
    pub stations: Vec<StationSpec>,
    #[serde(default)]
    pub lines: Vec<LineSpec>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSettings {
    pub name: Option<String>,
    #[serde(default)]
    pub stop_on_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationSpec {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSpec {
    pub name: String,
    pub color: String,
    pub up_station: String,
    pub down_station: String,
    pub distance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    AddSection {
        line: String,
        up_station: String,
        down_station: String,
        distance: i64,
    },
    RemoveSection {
        line: String,
        station: String,
    },
    UpdateLine {
        line: String,
        name: String,
        color: String,
    },
    DeleteLine {
        line: String,
    },
    ShowLine {
        line: String,
    },
    ShowLines,
}

impl Operation {
    pub fn label(&self) -> String {
        match self {
            Operation::AddSection {
                line,
                up_station,
                down_station,
                distance,
            } => format!(
                "add_section {}: {} -> {} ({})",
                line, up_station, down_station, distance
            ),
            Operation::RemoveSection { line, station } => {
                format!("remove_section {}: {}", line, station)
            }
            Operation::UpdateLine { line, name, color } => {
                format!("update_line {}: {} / {}", line, name, color)
            }
            Operation::DeleteLine { line } => format!("delete_line {}", line),
            Operation::ShowLine { line } => format!("show_line {}", line),
            Operation::ShowLines => "show_lines".to_string(),
        }
    }
}

impl ScenarioConfig {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SubwayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析情境
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SubwayError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn stop_on_error(&self) -> bool {
        self.settings.stop_on_error
    }
}

impl Validate for ScenarioConfig {
    fn validate(&self) -> Result<()> {
        for station in &self.stations {
            validate_non_empty_string("stations.name", &station.name)?;
        }
        validate_unique_names("stations", self.stations.iter().map(|s| s.name.as_str()))?;

        let known: HashSet<&str> = self.stations.iter().map(|s| s.name.as_str()).collect();
        for line in &self.lines {
            validate_non_empty_string("lines.name", &line.name)?;
            validate_non_empty_string("lines.color", &line.color)?;
            for station in [&line.up_station, &line.down_station] {
                if !known.contains(station.as_str()) {
                    return Err(SubwayError::ConfigValidationError {
                        field: format!("lines.{}", line.name),
                        message: format!("unknown station '{}'", station),
                    });
                }
            }
        }
        validate_unique_names("lines", self.lines.iter().map(|l| l.name.as_str()))?;

        Ok(())
    }
}
