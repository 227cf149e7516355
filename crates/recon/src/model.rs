use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One card, reduced to the fields that take part in reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    /// Identifier assigned by the export source. Reconciliation key.
    pub id: String,
    pub name: String,
    pub description: String,
    /// Archived in the source. Extraction drops closed items after projection.
    pub closed: bool,
}

impl ItemRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            closed: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Master set
// ---------------------------------------------------------------------------

/// Every item ever reconciled into the store, keyed by id.
///
/// Append-only: there is no way to remove an entry or replace the record
/// stored under an existing id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterSet {
    items: BTreeMap<String, ItemRecord>,
}

impl MasterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` unless its id is already present. Returns whether it was added.
    pub fn insert_new(&mut self, record: ItemRecord) -> bool {
        if self.items.contains_key(&record.id) {
            return false;
        }
        self.items.insert(record.id.clone(), record);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ItemRecord> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

impl FromIterator<ItemRecord> for MasterSet {
    fn from_iter<I: IntoIterator<Item = ItemRecord>>(iter: I) -> Self {
        let mut set = MasterSet::new();
        for record in iter {
            set.insert_new(record);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Items extracted this run whose ids were absent from the master.
/// Keeps extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    items: Vec<ItemRecord>,
}

impl DiffResult {
    pub(crate) fn from_records(items: Vec<ItemRecord>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemRecord> {
        self.items.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|r| r.id.clone()).collect()
    }

    pub fn into_records(self) -> Vec<ItemRecord> {
        self.items
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a ItemRecord;
    type IntoIter = std::slice::Iter<'a, ItemRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Job stages + outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extract,
    LoadMaster,
    Reconcile,
    Export,
    Merge,
    SaveMaster,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract => write!(f, "extract"),
            Self::LoadMaster => write!(f, "load_master"),
            Self::Reconcile => write!(f, "reconcile"),
            Self::Export => write!(f, "export"),
            Self::Merge => write!(f, "merge"),
            Self::SaveMaster => write!(f, "save_master"),
        }
    }
}

/// Summary of one job run.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub category: String,
    /// `MMDDYYYYHHMMSS` stamp used for the artifact name.
    pub timestamp: String,
    pub extracted: usize,
    pub master_before: usize,
    pub master_after: usize,
    pub new_items: usize,
    pub new_ids: Vec<String>,
    /// `None` for a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<std::path::PathBuf>,
    pub dry_run: bool,
}
