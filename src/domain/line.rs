use crate::domain::section::{Section, SectionId};
use crate::domain::sections::SectionChain;
use crate::domain::station::Station;
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;
use chrono::{DateTime, Utc};

pub type LineId = u64;

#[derive(Debug, Clone)]
pub struct Line {
    id: Option<LineId>,
    name: String,
    color: String,
    sections: SectionChain,
    version: u64,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Line {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        initial_section: Section,
    ) -> Result<Self> {
        let name = name.into();
        let color = color.into();
        validate_non_empty_string("name", &name)?;
        validate_non_empty_string("color", &color)?;

        let now = Utc::now();
        Ok(Self {
            id: None,
            name,
            color,
            sections: SectionChain::new(initial_section),
            version: 0,
            created_at: now,
            modified_at: now,
        })
    }

    pub fn id(&self) -> Option<LineId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn sections(&self) -> &[Section] {
        self.sections.sections()
    }

    pub fn stations(&self) -> Vec<Station> {
        self.sections.all_stations()
    }

    pub fn chain(&self) -> &SectionChain {
        &self.sections
    }

    pub fn add_section(&mut self, section: Section) -> Result<&[Section]> {
        self.sections.add(section)?;
        self.touch();
        Ok(self.sections.sections())
    }

    pub fn remove_section(&mut self, station: &Station) -> Result<&[Section]> {
        self.sections.remove(station)?;
        self.touch();
        Ok(self.sections.sections())
    }

    pub fn rename(&mut self, name: impl Into<String>, color: impl Into<String>) -> Result<()> {
        let name = name.into();
        let color = color.into();
        validate_non_empty_string("name", &name)?;
        validate_non_empty_string("color", &color)?;

        self.name = name;
        self.color = color;
        self.touch();
        Ok(())
    }

    // Persistence hooks: only storage adapters assign ids and versions.

    pub fn assign_id(&mut self, id: LineId) {
        self.id = Some(id);
    }

    pub fn assign_section_ids(&mut self, next_id: impl FnMut() -> SectionId) {
        self.sections.assign_missing_ids(next_id);
    }

    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
