use std::collections::HashMap;

use crate::model::{DiffResult, ItemRecord, MasterSet};

/// Items in `extracted` whose id the master has not seen.
///
/// Duplicate ids within `extracted` collapse to one entry: it keeps the
/// position of the first occurrence and the record of the last.
pub fn diff(extracted: &[ItemRecord], master: &MasterSet) -> DiffResult {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut fresh: Vec<ItemRecord> = Vec::new();

    for record in extracted {
        if master.contains(&record.id) {
            continue;
        }
        match position.get(record.id.as_str()) {
            Some(&i) => fresh[i] = record.clone(),
            None => {
                position.insert(&record.id, fresh.len());
                fresh.push(record.clone());
            }
        }
    }

    DiffResult::from_records(fresh)
}

/// Add every diff item to the master. Existing entries are never touched.
/// Returns the number of records added.
pub fn merge(master: &mut MasterSet, diff: &DiffResult) -> usize {
    let mut added = 0;
    for record in diff {
        if master.insert_new(record.clone()) {
            added += 1;
        }
    }
    added
}
