//! # Project Data Structures
//!
//! A `Project` collects the soil profiles saved for one job. Projects
//! serialize to `.stm` files as human-readable JSON (see [`crate::file_io`]).
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job, site, timestamps)
//! ├── settings: EngineSettings (tolerances used for every run)
//! └── items: HashMap<Uuid, SavedProfile> (named stress-profile inputs)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use soil_core::project::Project;
//! use soil_core::stresses::{SoilLayer, StressProfileInput};
//!
//! let mut project = Project::new("Jane Engineer", "26-014", "North abutment");
//! let id = project.add_profile("BH-1", StressProfileInput::new(vec![SoilLayer::new(4.0, 18.0)]));
//!
//! let result = project.run(&id).unwrap();
//! assert_eq!(result.points.len(), 2);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SoilError, SoilResult};
use crate::settings::EngineSettings;
use crate::stresses::{calculate, StressProfileInput, StressProfileResult};

/// Current schema version for .stm files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container, serialized to `.stm` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    /// Settings applied to every profile in the project
    #[serde(default)]
    pub settings: EngineSettings,

    /// Saved profiles, keyed by UUID
    #[serde(default)]
    pub items: HashMap<Uuid, SavedProfile>,
}

/// A named profile input kept in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProfile {
    /// Short label, e.g. a borehole name
    pub label: String,
    pub input: StressProfileInput,
    pub saved_at: DateTime<Utc>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job number (e.g., "26-001")
    /// * `site` - Site or structure the profiles belong to
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        site: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                site: site.into(),
                created: now,
                modified: now,
            },
            settings: EngineSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Save a profile under `label`. Returns the UUID assigned to it.
    pub fn add_profile(&mut self, label: impl Into<String>, input: StressProfileInput) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(
            id,
            SavedProfile {
                label: label.into(),
                input,
                saved_at: Utc::now(),
            },
        );
        self.touch();
        id
    }

    /// Remove a profile by UUID.
    pub fn remove_profile(&mut self, id: &Uuid) -> Option<SavedProfile> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_profile(&self, id: &Uuid) -> Option<&SavedProfile> {
        self.items.get(id)
    }

    /// First profile whose label matches exactly.
    pub fn find_by_label(&self, label: &str) -> Option<(Uuid, &SavedProfile)> {
        self.items
            .iter()
            .find(|(_, item)| item.label == label)
            .map(|(id, item)| (*id, item))
    }

    /// Profiles ordered by label, then save time.
    pub fn profiles_sorted(&self) -> Vec<(Uuid, &SavedProfile)> {
        let mut items: Vec<_> = self.items.iter().map(|(id, item)| (*id, item)).collect();
        items.sort_by(|a, b| a.1.label.cmp(&b.1.label).then(a.1.saved_at.cmp(&b.1.saved_at)));
        items
    }

    /// Compute the stress profile of a saved input with the project settings.
    pub fn run(&self, id: &Uuid) -> SoilResult<StressProfileResult> {
        let item = self.get_profile(id).ok_or_else(|| {
            SoilError::invalid_input("id", id.to_string(), "No saved profile with this id")
        })?;
        calculate(&item.input, &self.settings)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn profile_count(&self) -> usize {
        self.items.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Site or structure name
    pub site: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stresses::SoilLayer;

    fn dry_column() -> StressProfileInput {
        StressProfileInput::new(vec![SoilLayer::new(3.0, 18.0)])
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "26-001", "Pier 3");
        assert_eq!(project.meta.engineer, "John Doe");
        assert_eq!(project.meta.job_id, "26-001");
        assert_eq!(project.meta.site, "Pier 3");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings, EngineSettings::default());
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Engineer", "26-042", "Test Site");
        project.add_profile("BH-2", dry_column());
        let json = serde_json::to_string_pretty(&project).unwrap();

        assert!(json.contains("Jane Engineer"));
        assert!(json.contains("BH-2"));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.engineer, "Jane Engineer");
        assert_eq!(roundtrip.profile_count(), 1);
    }

    #[test]
    fn test_add_remove_profile() {
        let mut project = Project::default();
        let id = project.add_profile("BH-1", dry_column());
        assert_eq!(project.profile_count(), 1);
        assert_eq!(project.find_by_label("BH-1").map(|(found, _)| found), Some(id));

        let removed = project.remove_profile(&id);
        assert_eq!(removed.map(|p| p.label), Some("BH-1".to_string()));
        assert_eq!(project.profile_count(), 0);
        assert!(project.remove_profile(&id).is_none());
    }

    #[test]
    fn test_run_uses_project_settings() {
        let mut project = Project::default();
        let id = project.add_profile("BH-1", dry_column());
        let result = project.run(&id).unwrap();
        assert!((result.base().unwrap().total_vertical_stress - 54.0).abs() < 1e-9);

        project.settings.depth_tolerance = -1.0;
        assert!(project.run(&id).is_err());
    }

    #[test]
    fn test_run_unknown_id() {
        let project = Project::default();
        let err = project.run(&Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_profiles_sorted_by_label() {
        let mut project = Project::default();
        project.add_profile("BH-3", dry_column());
        project.add_profile("BH-1", dry_column());
        project.add_profile("BH-2", dry_column());
        let labels: Vec<_> = project
            .profiles_sorted()
            .into_iter()
            .map(|(_, p)| p.label.clone())
            .collect();
        assert_eq!(labels, vec!["BH-1", "BH-2", "BH-3"]);
    }
}
