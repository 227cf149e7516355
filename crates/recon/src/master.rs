//! Durable master record set.
//!
//! On disk the master is column-oriented: `{"name": {id: ..}, "desc": {id: ..}}`.
//! That layout stays inside this module; callers only see [`MasterSet`].
//!
//! Saved files list ids in sorted order, not in the order items were added.
//! Reconciliation only looks at the id set, so the order carries no meaning.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{ItemRecord, MasterSet};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredColumns {
    name: BTreeMap<String, Option<String>>,
    #[serde(default, rename = "desc", alias = "description")]
    description: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Serialize)]
struct StoredColumnsOut<'a> {
    name: BTreeMap<&'a str, &'a str>,
    desc: BTreeMap<&'a str, &'a str>,
}

/// Load the master at `path`. A missing or blank file is an empty master.
pub fn load(path: &Path) -> Result<MasterSet, ReconError> {
    let corrupt = |reason: String| ReconError::MasterCorrupt {
        path: path.to_path_buf(),
        reason,
    };

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(MasterSet::new()),
        Err(e) => return Err(corrupt(e.to_string())),
    };
    if content.trim().is_empty() {
        return Ok(MasterSet::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
    let root = value
        .as_object()
        .ok_or_else(|| corrupt("expected a JSON object of columns".into()))?;
    if root.is_empty() {
        return Ok(MasterSet::new());
    }

    // Anything but the known columns (or a missing `name` column) must not
    // load as an empty master, or the next save would replace it.
    let columns: StoredColumns =
        serde_json::from_value(value).map_err(|e| corrupt(e.to_string()))?;
    Ok(from_columns(columns))
}

fn from_columns(mut columns: StoredColumns) -> MasterSet {
    let mut master = MasterSet::new();
    for (id, name) in std::mem::take(&mut columns.name) {
        let description = columns.description.remove(&id).flatten().unwrap_or_default();
        master.insert_new(ItemRecord::new(id, name.unwrap_or_default(), description));
    }
    // Ids that only appear in the description column
    for (id, description) in columns.description {
        master.insert_new(ItemRecord::new(id, "", description.unwrap_or_default()));
    }
    master
}

pub fn to_json(master: &MasterSet) -> Result<String, serde_json::Error> {
    let mut out = StoredColumnsOut {
        name: BTreeMap::new(),
        desc: BTreeMap::new(),
    };
    for record in master.iter() {
        out.name.insert(&record.id, &record.name);
        out.desc.insert(&record.id, &record.description);
    }
    serde_json::to_string(&out)
}

/// Overwrite the master at `path` with the full set. Creates the parent directory.
pub fn save(path: &Path, master: &MasterSet) -> Result<(), ReconError> {
    let failed = |reason: String| ReconError::MasterWriteFailed {
        path: path.to_path_buf(),
        reason,
        artifact: None,
    };

    let json = to_json(master).map_err(|e| failed(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
    }
    std::fs::write(path, json).map_err(|e| failed(e.to_string()))
}
