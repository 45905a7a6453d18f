//! # Case File I/O
//!
//! Loads and saves analysis cases as human-readable JSON, with:
//! - **Atomic saves**: write to `.tmp`, sync, rename to prevent corruption
//! - **Version validation**: ensure schema compatibility before analyzing
//!
//! A case file carries everything one analysis run needs: metadata for the
//! report header, an optional span, and the raw load descriptors. The span is
//! optional on disk; [`CaseFile::span_m`] resolves a missing one from the
//! load extents.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::file_io::{load_case, save_case, CaseFile};
//! use beam_core::loads::LoadDescriptor;
//! use std::path::Path;
//!
//! let case = CaseFile::new("Warehouse girder", "A. Engineer", "26-014")
//!     .with_span(12.0)
//!     .with_load(LoadDescriptor::Point { magnitude: 25.0, position: 6.0 });
//!
//! save_case(&case, Path::new("girder.json")).unwrap();
//! let reloaded = load_case(Path::new("girder.json")).unwrap();
//! assert_eq!(reloaded.label, "Warehouse girder");
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BeamError, BeamResult};
use crate::loads::{infer_span_m, Beam, LoadDescriptor};

/// Current schema version for case files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Case metadata carried into report headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMetadata {
    /// Stable identity for this case
    pub id: Uuid,
    /// Schema version the file was written with
    pub version: String,
    /// Responsible engineer
    pub engineer: String,
    /// Job/project number (e.g., "26-014")
    pub job_id: String,
    /// When the case was created
    pub created: DateTime<Utc>,
}

/// One analysis case: metadata, optional span, raw loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFile {
    pub meta: CaseMetadata,

    /// User label for the beam (e.g., "B-1", "Roof girder at grid C")
    pub label: String,

    /// Span in meters. When absent, the span is inferred from the furthest
    /// load extent with a 10 m floor, matching the interactive surfaces.
    pub span_m: Option<f64>,

    /// Raw load descriptors, validated at analysis time by [`Beam::new`]
    pub loads: Vec<LoadDescriptor>,
}

impl CaseFile {
    /// Create an empty case.
    pub fn new(
        label: impl Into<String>,
        engineer: impl Into<String>,
        job_id: impl Into<String>,
    ) -> Self {
        CaseFile {
            meta: CaseMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                created: Utc::now(),
            },
            label: label.into(),
            span_m: None,
            loads: Vec::new(),
        }
    }

    /// Set an explicit span (builder style).
    pub fn with_span(mut self, span_m: f64) -> Self {
        self.span_m = Some(span_m);
        self
    }

    /// Append a load (builder style).
    pub fn with_load(mut self, load: LoadDescriptor) -> Self {
        self.loads.push(load);
        self
    }

    /// The span this case analyzes at: explicit if given, inferred otherwise.
    pub fn resolved_span_m(&self) -> f64 {
        self.span_m.unwrap_or_else(|| infer_span_m(&self.loads))
    }

    /// Normalize this case into a validated [`Beam`].
    pub fn to_beam(&self) -> BeamResult<Beam> {
        Beam::new(self.resolved_span_m(), &self.loads)
    }
}

/// Save a case with an atomic write.
///
/// Writes to a `.tmp` sibling, syncs, then renames over the target so a
/// crash mid-save never leaves a half-written case file.
pub fn save_case(case: &CaseFile, path: &Path) -> BeamResult<()> {
    let json = serde_json::to_string_pretty(case).map_err(|e| BeamError::Serialization {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        BeamError::file_error(
            "create temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        BeamError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    tmp_file.sync_all().map_err(|e| {
        BeamError::file_error(
            "sync temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        BeamError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a case file and validate its schema version.
pub fn load_case(path: &Path) -> BeamResult<CaseFile> {
    let mut file = File::open(path)
        .map_err(|e| BeamError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| BeamError::file_error("read", path.display().to_string(), e.to_string()))?;

    let case: CaseFile =
        serde_json::from_str(&contents).map_err(|e| BeamError::Serialization {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&case.meta.version)?;

    Ok(case)
}

/// Reject case files written by an incompatible schema.
///
/// Only the major.minor prefix must match; patch-level differences are
/// readable.
fn validate_version(file_version: &str) -> BeamResult<()> {
    let prefix = |v: &str| {
        v.splitn(3, '.')
            .take(2)
            .map(String::from)
            .collect::<Vec<_>>()
            .join(".")
    };

    if prefix(file_version) != prefix(SCHEMA_VERSION) {
        return Err(BeamError::validation(
            "version",
            file_version,
            format!("Expected schema {SCHEMA_VERSION}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(format!("beam_core_test_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_save_load_roundtrip() {
        let case = CaseFile::new("Test beam", "Test Engineer", "26-001")
            .with_span(10.0)
            .with_load(LoadDescriptor::Point {
                magnitude: 10.0,
                position: 5.0,
            });

        let path = temp_path("roundtrip.json");
        save_case(&case, &path).unwrap();
        let reloaded = load_case(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(reloaded, case);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = load_case(Path::new("/nonexistent/beam_case.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_version_mismatch_rejected() {
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
    }

    #[test]
    fn test_span_resolution() {
        let explicit = CaseFile::new("a", "b", "c").with_span(6.0);
        assert_eq!(explicit.resolved_span_m(), 6.0);

        let inferred = CaseFile::new("a", "b", "c").with_load(LoadDescriptor::Udl {
            intensity: 3.0,
            start: 0.0,
            end: 14.0,
        });
        assert_eq!(inferred.resolved_span_m(), 14.0);
    }

    #[test]
    fn test_to_beam_validates() {
        let bad = CaseFile::new("a", "b", "c")
            .with_span(5.0)
            .with_load(LoadDescriptor::Point {
                magnitude: 10.0,
                position: 9.0,
            });
        assert!(bad.to_beam().is_err());
    }
}
