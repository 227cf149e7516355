//! CLI Exit Code Registry
//!
//! Single source of truth for `deckdiff` exit codes. Scripts that schedule
//! the job rely on them to tell which stage failed.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | General error                                   |
//! | 2    | Usage error (bad arguments)                     |
//! | 3    | Export document missing or unreadable           |
//! | 4    | Export document malformed                       |
//! | 5    | Category not found in export                    |
//! | 6    | Master file present but corrupt                 |
//! | 7    | Diff artifact could not be written              |
//! | 8    | Master could not be saved (artifact is valid)   |
//! | 9    | Invalid or unreadable config                    |

use deckdiff_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

pub const EXIT_INPUT_NOT_FOUND: u8 = 3;

pub const EXIT_MALFORMED_EXPORT: u8 = 4;

pub const EXIT_CATEGORY_NOT_FOUND: u8 = 5;

/// Master exists but cannot be parsed. Nothing was written.
pub const EXIT_MASTER_CORRUPT: u8 = 6;

/// Artifact write failed. The master was not updated.
pub const EXIT_EXPORT_WRITE: u8 = 7;

/// Master save failed after the artifact was written.
pub const EXIT_MASTER_WRITE: u8 = 8;

pub const EXIT_CONFIG: u8 = 9;

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ResourceNotFound { .. } => EXIT_INPUT_NOT_FOUND,
        ReconError::MalformedExport(_) => EXIT_MALFORMED_EXPORT,
        ReconError::CategoryNotFound { .. } => EXIT_CATEGORY_NOT_FOUND,
        ReconError::MasterCorrupt { .. } => EXIT_MASTER_CORRUPT,
        ReconError::ExportWriteFailed { .. } => EXIT_EXPORT_WRITE,
        ReconError::MasterWriteFailed { .. } => EXIT_MASTER_WRITE,
    }
}

/// Structured error output for `--json` runs.
#[derive(Debug, serde::Serialize)]
pub struct ErrorOutput {
    pub error: String,
    pub stage: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    pub exit_code: u8,
}

impl ErrorOutput {
    pub fn from_recon_error(err: &ReconError) -> Self {
        let artifact = match err {
            ReconError::MasterWriteFailed { artifact, .. } => {
                artifact.as_ref().map(|p| p.display().to_string())
            }
            _ => None,
        };
        Self {
            error: err.kind().to_string(),
            stage: err.stage().to_string(),
            message: err.to_string(),
            artifact,
            exit_code: recon_exit_code(err),
        }
    }
}
