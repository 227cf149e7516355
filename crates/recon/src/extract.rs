//! Board export parsing and per-category extraction.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::ReconError;
use crate::model::ItemRecord;

// ---------------------------------------------------------------------------
// Export document
// ---------------------------------------------------------------------------

/// The parts of a board export the extractor reads. Other keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportDocument {
    pub lists: Vec<ExportList>,
    pub cards: Vec<ExportCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportCard {
    pub id: String,
    #[serde(rename = "idList")]
    pub id_list: String,
    pub name: String,
    pub desc: String,
    pub closed: bool,
}

/// Category name -> list id. Built fresh from each export.
pub type CategoryIndex = HashMap<String, String>;

pub fn parse_export(json: &str) -> Result<ExportDocument, ReconError> {
    serde_json::from_str(json).map_err(|e| ReconError::MalformedExport(e.to_string()))
}

/// Read and parse the export at `path`. Any failure to open the file is fatal.
pub fn load_export(path: &Path) -> Result<ExportDocument, ReconError> {
    let json = std::fs::read_to_string(path).map_err(|e| ReconError::ResourceNotFound {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_export(&json)
}

/// Lists with duplicate names resolve to the last one in document order.
pub fn category_index(doc: &ExportDocument) -> CategoryIndex {
    doc.lists
        .iter()
        .map(|list| (list.name.clone(), list.id.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Open cards of the list named `category`, in document order.
pub fn extract(doc: &ExportDocument, category: &str) -> Result<Vec<ItemRecord>, ReconError> {
    let index = category_index(doc);
    let list_id = index.get(category).ok_or_else(|| ReconError::CategoryNotFound {
        category: category.to_string(),
        available: doc.lists.iter().map(|l| l.name.clone()).collect(),
    })?;

    let items = doc
        .cards
        .iter()
        .filter(|card| &card.id_list == list_id)
        .map(to_record)
        .filter(|record| !record.closed)
        .collect();

    Ok(items)
}

fn to_record(card: &ExportCard) -> ItemRecord {
    ItemRecord {
        id: card.id.clone(),
        name: card.name.clone(),
        description: card.desc.clone(),
        closed: card.closed,
    }
}

/// Per-list card counts, for listing what an export contains.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub id: String,
    pub open_cards: usize,
    pub closed_cards: usize,
}

pub fn summarize_categories(doc: &ExportDocument) -> Vec<CategorySummary> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for card in &doc.cards {
        let entry = counts.entry(card.id_list.as_str()).or_insert((0, 0));
        if card.closed {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
    }

    doc.lists
        .iter()
        .map(|list| {
            let (open_cards, closed_cards) = counts.get(list.id.as_str()).copied().unwrap_or((0, 0));
            CategorySummary {
                name: list.name.clone(),
                id: list.id.clone(),
                open_cards,
                closed_cards,
            }
        })
        .collect()
}
