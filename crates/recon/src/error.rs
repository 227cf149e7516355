use std::path::PathBuf;

use thiserror::Error;

use crate::model::Stage;

#[derive(Debug, Error)]
pub enum ReconError {
    /// The export document could not be opened. A missing master is not an error.
    #[error("cannot read export {}: {reason}", .path.display())]
    ResourceNotFound { path: PathBuf, reason: String },

    /// Required keys or card fields are absent from the export document.
    #[error("malformed export: {0}")]
    MalformedExport(String),

    /// No list in the export carries the requested name.
    #[error("category '{category}' not found in export (available: {})", .available.join(", "))]
    CategoryNotFound {
        category: String,
        available: Vec<String>,
    },

    /// The master file exists but cannot be read or parsed.
    #[error("master {} is corrupt: {reason}", .path.display())]
    MasterCorrupt { path: PathBuf, reason: String },

    #[error("cannot write diff artifact {}: {reason}", .path.display())]
    ExportWriteFailed { path: PathBuf, reason: String },

    /// The master could not be saved. `artifact` is set when the diff artifact
    /// of the same run was written and remains valid.
    #[error("cannot write master {}: {reason}", .path.display())]
    MasterWriteFailed {
        path: PathBuf,
        reason: String,
        artifact: Option<PathBuf>,
    },
}

impl ReconError {
    /// The job stage at which this error is raised.
    pub fn stage(&self) -> Stage {
        match self {
            Self::ResourceNotFound { .. }
            | Self::MalformedExport(_)
            | Self::CategoryNotFound { .. } => Stage::Extract,
            Self::MasterCorrupt { .. } => Stage::LoadMaster,
            Self::ExportWriteFailed { .. } => Stage::Export,
            Self::MasterWriteFailed { .. } => Stage::SaveMaster,
        }
    }

    /// Stable snake_case name, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ResourceNotFound { .. } => "resource_not_found",
            Self::MalformedExport(_) => "malformed_export",
            Self::CategoryNotFound { .. } => "category_not_found",
            Self::MasterCorrupt { .. } => "master_corrupt",
            Self::ExportWriteFailed { .. } => "export_write_failed",
            Self::MasterWriteFailed { .. } => "master_write_failed",
        }
    }
}
