//! Attendance data collaborator
//!
//! The export reads classes, sections and attendance events through the
//! [`AttendanceStore`] trait. [`InMemoryStore`] serves a dataset loaded from a
//! YAML (or JSON) file and backs the CLI, the bundled server and the tests.

use crate::error::AttendanceResult;
use crate::types::{AttendanceEvent, ClassRecord, Section};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Read access to rosters, sections and attendance events
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Class with its populated roster, or `None` if the id is unknown
    async fn find_class(&self, class_id: &str) -> AttendanceResult<Option<ClassRecord>>;

    /// Sections of a class sorted by section number, optionally restricted to one id
    async fn find_sections(
        &self,
        class_id: &str,
        section_id: Option<&str>,
    ) -> AttendanceResult<Vec<Section>>;

    /// Events of a class recorded in any of `section_ids`
    async fn find_events(
        &self,
        class_id: &str,
        section_ids: &[String],
    ) -> AttendanceResult<Vec<AttendanceEvent>>;
}

/// Serialized form of a complete attendance dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub classes: Vec<ClassRecord>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub events: Vec<AttendanceEvent>,
}

/// Store backed by an in-memory [`Dataset`]
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    dataset: Dataset,
}

impl InMemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Parse a dataset document. YAML is a superset of JSON, so both work.
    pub fn from_yaml_str(content: &str) -> AttendanceResult<Self> {
        let dataset: Dataset = serde_yaml::from_str(content)?;
        Ok(Self::new(dataset))
    }

    /// Load a dataset file from disk
    pub fn load(path: &Path) -> AttendanceResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_yaml_str(&content)?;
        debug!(
            path = %path.display(),
            classes = store.dataset.classes.len(),
            sections = store.dataset.sections.len(),
            events = store.dataset.events.len(),
            "Loaded attendance dataset"
        );
        Ok(store)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn find_class(&self, class_id: &str) -> AttendanceResult<Option<ClassRecord>> {
        Ok(self
            .dataset
            .classes
            .iter()
            .find(|class| class.id == class_id)
            .cloned())
    }

    async fn find_sections(
        &self,
        class_id: &str,
        section_id: Option<&str>,
    ) -> AttendanceResult<Vec<Section>> {
        let mut sections: Vec<Section> = self
            .dataset
            .sections
            .iter()
            .filter(|section| section.class_id == class_id)
            .filter(|section| section_id.map_or(true, |id| section.id == id))
            .cloned()
            .collect();
        sections.sort_by_key(|section| section.section_number);
        Ok(sections)
    }

    async fn find_events(
        &self,
        class_id: &str,
        section_ids: &[String],
    ) -> AttendanceResult<Vec<AttendanceEvent>> {
        let mut events: Vec<AttendanceEvent> = self
            .dataset
            .events
            .iter()
            .filter(|event| event.class_id == class_id && section_ids.contains(&event.section_id))
            .cloned()
            .collect();
        events.sort_by_key(|event| event.recorded_at);
        debug!(
            class_id,
            sections = section_ids.len(),
            events = events.len(),
            "Fetched attendance events"
        );
        Ok(events)
    }
}
