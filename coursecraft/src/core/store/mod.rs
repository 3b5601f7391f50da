//! Course Store Module
//!
//! The persistence seam. The engine hands whole section arrays to a
//! [`CourseSink`] on save-draft and publish; [`JsonCourseStore`] is the file
//! implementation used by the CLI and tests.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{
    course::{CourseMeta, CourseState, Section},
    fs::{atomic_write_json_pretty, read_json},
    CoreError, CoreResult,
};

/// Course document format version
pub const COURSE_DOCUMENT_VERSION: u32 = 1;

/// Draft document file name
pub const DRAFT_FILE: &str = "draft.json";

/// Published document file name
pub const PUBLISHED_FILE: &str = "published.json";

// =============================================================================
// Course Document
// =============================================================================

/// Draft or published copy of a course
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Published,
}

/// On-disk course document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    /// Format version for migrations
    pub version: u32,
    pub status: DocumentStatus,
    /// Timestamp of this save (RFC 3339)
    pub saved_at: String,
    pub meta: CourseMeta,
    pub sections: Vec<Section>,
}

impl CourseDocument {
    pub fn new(status: DocumentStatus, meta: &CourseMeta, sections: &[Section]) -> Self {
        Self {
            version: COURSE_DOCUMENT_VERSION,
            status,
            saved_at: chrono::Utc::now().to_rfc3339(),
            meta: meta.clone(),
            sections: sections.to_vec(),
        }
    }

    /// Converts the document into a clean in-memory course
    pub fn into_state(self) -> CourseState {
        CourseState::from_parts(self.meta, self.sections)
    }
}

// =============================================================================
// Course Sink
// =============================================================================

/// Receiver of whole-course saves
pub trait CourseSink: Send + Sync {
    fn save_draft(&self, meta: &CourseMeta, sections: &[Section]) -> CoreResult<()>;

    fn publish(&self, meta: &CourseMeta, sections: &[Section]) -> CoreResult<()>;
}

// =============================================================================
// JSON Course Store
// =============================================================================

/// Stores a course as JSON documents in one directory
#[derive(Clone, Debug)]
pub struct JsonCourseStore {
    dir: PathBuf,
}

impl JsonCourseStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn draft_path(&self) -> PathBuf {
        self.dir.join(DRAFT_FILE)
    }

    pub fn published_path(&self) -> PathBuf {
        self.dir.join(PUBLISHED_FILE)
    }

    pub fn has_draft(&self) -> bool {
        self.draft_path().exists()
    }

    /// Loads the draft document
    pub fn load_draft(&self) -> CoreResult<CourseDocument> {
        Self::load_document(&self.draft_path())
    }

    /// Loads the published document
    pub fn load_published(&self) -> CoreResult<CourseDocument> {
        Self::load_document(&self.published_path())
    }

    /// Loads the draft as untyped JSON, for tolerant readers
    pub fn load_draft_value(&self) -> CoreResult<serde_json::Value> {
        read_json(&self.draft_path())
    }

    fn load_document(path: &Path) -> CoreResult<CourseDocument> {
        let document: CourseDocument = read_json(path).map_err(|e| match e {
            CoreError::JsonError(err) => {
                CoreError::CourseCorrupted(format!("{}: {}", path.display(), err))
            }
            other => other,
        })?;

        if document.version > COURSE_DOCUMENT_VERSION {
            return Err(CoreError::CourseCorrupted(format!(
                "{} has unsupported version {} (max {})",
                path.display(),
                document.version,
                COURSE_DOCUMENT_VERSION
            )));
        }
        Ok(document)
    }

    fn write(&self, path: &Path, document: &CourseDocument) -> CoreResult<()> {
        atomic_write_json_pretty(path, document)
            .map_err(|e| CoreError::CourseSaveFailed(format!("{}: {}", path.display(), e)))
    }
}

impl CourseSink for JsonCourseStore {
    fn save_draft(&self, meta: &CourseMeta, sections: &[Section]) -> CoreResult<()> {
        let document = CourseDocument::new(DocumentStatus::Draft, meta, sections);
        self.write(&self.draft_path(), &document)?;
        info!(
            "Saved draft of '{}' ({} sections) to {}",
            meta.title,
            sections.len(),
            self.draft_path().display()
        );
        Ok(())
    }

    fn publish(&self, meta: &CourseMeta, sections: &[Section]) -> CoreResult<()> {
        let document = CourseDocument::new(DocumentStatus::Published, meta, sections);
        self.write(&self.published_path(), &document)?;
        info!(
            "Published '{}' to {}",
            meta.title,
            self.published_path().display()
        );
        Ok(())
    }
}
