//! `deckdiff-recon` — reconciles a board export against a master record set.
//!
//! Pure engine crate: reads the export and the master, writes the diff
//! artifact and the updated master. No CLI or config parsing.
//!
//! Concurrent runs against the same master file are not coordinated: the
//! last writer wins and updates from the other run are lost. Wrapping the
//! master save in a file lock or an atomic rename would close that gap.

pub mod error;
pub mod export;
pub mod extract;
pub mod job;
pub mod master;
pub mod model;
pub mod reconcile;
pub mod report;

pub use error::ReconError;
pub use job::{JobInputs, ReconciliationJob};
pub use model::{DiffResult, ItemRecord, JobOutcome, MasterSet, Stage};
pub use report::{LogReporter, MemoryReporter, Reporter};
