// Domain layer: stations, sections and lines, plus the ports persistence adapters implement.

pub mod line;
pub mod ports;
pub mod section;
pub mod sections;
pub mod station;

pub use line::{Line, LineId};
pub use section::{Section, SectionId};
pub use sections::SectionChain;
pub use station::{Station, StationId};
