//! # File I/O Module
//!
//! Project persistence with two safety features:
//! - **Atomic saves**: write `.stm.tmp`, fsync, rename over the target
//! - **Version validation**: refuse files written by a newer schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use soil_core::file_io::{load_project, save_project};
//! use soil_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Engineer", "26-001", "Quay wall");
//! save_project(&project, Path::new("quay.stm"))?;
//! let loaded = load_project(Path::new("quay.stm"))?;
//! assert_eq!(loaded.meta.job_id, "26-001");
//! # Ok::<(), soil_core::errors::SoilError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{SoilError, SoilResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Extension of project files
pub const PROJECT_EXTENSION: &str = "stm";

fn io_error(operation: &str, path: &Path, e: std::io::Error) -> SoilError {
    SoilError::file_error(operation, path.display().to_string(), e.to_string())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    path.with_extension(extension)
}

/// Save a project with atomic write semantics.
///
/// An interrupted save leaves the previous file untouched.
pub fn save_project(project: &Project, path: &Path) -> SoilResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;
    tmp_file
        .sync_all()
        .map_err(|e| io_error("sync temp file", &tmp_path, e))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })?;

    debug!(path = %path.display(), profiles = project.profile_count(), "project saved");
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(SoilError::VersionMismatch)` - File version is incompatible
/// * `Err(SoilError::SerializationError)` - Invalid JSON
/// * `Err(SoilError::FileError)` - I/O error
pub fn load_project(path: &Path) -> SoilResult<Project> {
    let contents = fs::read_to_string(path).map_err(|e| io_error("read", path, e))?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| SoilError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
    validate_version(&project.meta.version)?;

    debug!(path = %path.display(), profiles = project.profile_count(), "project loaded");
    Ok(project)
}

/// Load a project, or start a fresh one if the file does not exist yet.
pub fn load_or_create(path: &Path, create: impl FnOnce() -> Project) -> SoilResult<Project> {
    if path.exists() {
        load_project(path)
    } else {
        Ok(create())
    }
}

/// Check that a file version can be read by this schema.
///
/// Major versions must match; within 0.x a newer minor version is rejected.
fn validate_version(file_version: &str) -> SoilResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || SoilError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => {
            Err(mismatch())
        }
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stresses::{SoilLayer, StressProfileInput};
    use std::env::temp_dir;

    fn temp_project_path(name: &str) -> PathBuf {
        temp_dir().join(format!("soil_core_test_{}_{}.stm", name, std::process::id()))
    }

    #[test]
    fn test_tmp_path_generation() {
        assert_eq!(tmp_path_for(Path::new("/jobs/quay.stm")), Path::new("/jobs/quay.stm.tmp"));
        assert_eq!(tmp_path_for(Path::new("/jobs/quay")), Path::new("/jobs/quay.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_project_path("roundtrip");

        let mut project = Project::new("Test Engineer", "TEST-001", "Test Site");
        let input = StressProfileInput::new(vec![
            SoilLayer::new(2.0, 18.0).lateral(0.45),
        ])
        .with_water_table(1.0, 0.2);
        let id = project.add_profile("BH-1", input.clone());
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.meta.engineer, "Test Engineer");
        assert_eq!(loaded.get_profile(&id).map(|p| &p.input), Some(&input));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_project_path("atomic");
        save_project(&Project::default(), &path).unwrap();

        assert!(!tmp_path_for(&path).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_project(&temp_project_path("missing")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_project_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_project(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_create() {
        let path = temp_project_path("fresh");
        let project = load_or_create(&path, || Project::new("New", "NEW-1", "Site")).unwrap();
        assert_eq!(project.meta.job_id, "NEW-1");
        assert!(!path.exists());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
