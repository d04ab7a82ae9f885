pub mod scenario;

pub use scenario::{OperationOutcome, OutcomeStatus, ScenarioReport, ScenarioRunner};
