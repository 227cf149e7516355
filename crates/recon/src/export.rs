use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::ReconError;
use crate::model::DiffResult;

/// `MMDDYYYYHHMMSS`
pub const TIMESTAMP_FORMAT: &str = "%m%d%Y%H%M%S";

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// `<output_location>/<timestamp><category>.csv`
pub fn artifact_path(output_location: &Path, category: &str, timestamp: NaiveDateTime) -> PathBuf {
    output_location.join(format!("{}{}.csv", format_timestamp(timestamp), category))
}

/// Write the diff as headerless two-column CSV (name, description).
///
/// The file is always created, even for an empty diff, and replaces any
/// file of the same name.
pub fn export(
    diff: &DiffResult,
    category: &str,
    output_location: &Path,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, ReconError> {
    let path = artifact_path(output_location, category, timestamp);
    let failed = |reason: String| ReconError::ExportWriteFailed {
        path: path.clone(),
        reason,
    };

    std::fs::create_dir_all(output_location).map_err(|e| failed(e.to_string()))?;
    let file = File::create(&path).map_err(|e| failed(e.to_string()))?;
    write_or_discard(&path, file, diff)?;

    Ok(path)
}

/// Write the rows of `diff` to `sink`, the freshly created file at `path`.
/// On failure the partial file is removed so no truncated artifact remains.
fn write_or_discard<W: Write>(path: &Path, sink: W, diff: &DiffResult) -> Result<(), ReconError> {
    write_rows(sink, diff).map_err(|e| {
        let _ = std::fs::remove_file(path);
        ReconError::ExportWriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })
}

fn write_rows<W: Write>(sink: W, diff: &DiffResult) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink);

    for record in diff {
        writer.write_record([record.name.as_str(), record.description.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
