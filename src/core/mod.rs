pub mod dto;
pub mod line_service;

pub use crate::domain::ports::{LineRepository, StationRepository};
pub use crate::utils::error::Result;
pub use line_service::LineService;
