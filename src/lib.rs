pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemoryLineRepository, InMemoryStationRepository};
pub use app::{ScenarioReport, ScenarioRunner};
pub use config::ScenarioConfig;
pub use core::LineService;
pub use domain::{Line, Section, SectionChain, Station};
pub use utils::error::{Result, SubwayError};
