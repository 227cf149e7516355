use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::error::ReconError;
use crate::export::{export, format_timestamp};
use crate::extract::{extract, load_export};
use crate::master;
use crate::model::{JobOutcome, Stage};
use crate::reconcile::{diff, merge};
use crate::report::Reporter;

/// Already-resolved inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInputs {
    /// The board export document.
    pub input_file: PathBuf,
    /// The master record file. May not exist yet.
    pub master_file: PathBuf,
    /// Directory receiving the diff artifact.
    pub output_location: PathBuf,
    pub category_name: String,
}

/// Extract, load master, reconcile, export, merge, save.
///
/// Nothing is written unless extraction and master load both succeed, and
/// the master is only saved after the artifact was written.
pub struct ReconciliationJob<'r> {
    inputs: JobInputs,
    reporter: &'r mut dyn Reporter,
}

impl<'r> ReconciliationJob<'r> {
    pub fn new(inputs: JobInputs, reporter: &'r mut dyn Reporter) -> Self {
        Self { inputs, reporter }
    }

    pub fn inputs(&self) -> &JobInputs {
        &self.inputs
    }

    /// Run all six steps. `timestamp` names the artifact.
    pub fn run(self, timestamp: NaiveDateTime) -> Result<JobOutcome, ReconError> {
        self.execute(timestamp, false)
    }

    /// Steps 1-3 only. Reports what a run would add without writing anything.
    pub fn preview(self, timestamp: NaiveDateTime) -> Result<JobOutcome, ReconError> {
        self.execute(timestamp, true)
    }

    fn execute(self, timestamp: NaiveDateTime, dry_run: bool) -> Result<JobOutcome, ReconError> {
        let Self { inputs, reporter } = self;
        let result = run_steps(&inputs, reporter, timestamp, dry_run);
        if let Err(ref err) = result {
            reporter.warn(&format!("{} failed: {err}", err.stage()));
        }
        result
    }
}

fn run_steps(
    inputs: &JobInputs,
    reporter: &mut dyn Reporter,
    timestamp: NaiveDateTime,
    dry_run: bool,
) -> Result<JobOutcome, ReconError> {
    let category = inputs.category_name.as_str();

    reporter.info(&format!(
        "input={} master={} output={} category={category}",
        inputs.input_file.display(),
        inputs.master_file.display(),
        inputs.output_location.display(),
    ));

    reporter.stage(Stage::Extract);
    let document = load_export(&inputs.input_file)?;
    let extracted = extract(&document, category)?;
    reporter.info(&format!(
        "extracted {} open item(s) from '{category}' ({} card(s) in export)",
        extracted.len(),
        document.cards.len(),
    ));

    reporter.stage(Stage::LoadMaster);
    let mut master_set = master::load(&inputs.master_file)?;
    if master_set.is_empty() {
        reporter.info("master is empty, starting a fresh one");
    } else {
        reporter.info(&format!("master holds {} item(s)", master_set.len()));
    }
    let master_before = master_set.len();

    reporter.stage(Stage::Reconcile);
    let new_items = diff(&extracted, &master_set);
    reporter.info(&format!("{} new item(s)", new_items.len()));

    let mut outcome = JobOutcome {
        category: category.to_string(),
        timestamp: format_timestamp(timestamp),
        extracted: extracted.len(),
        master_before,
        master_after: master_before,
        new_items: new_items.len(),
        new_ids: new_items.ids(),
        artifact: None,
        dry_run,
    };

    if dry_run {
        reporter.info("dry run, nothing written");
        return Ok(outcome);
    }

    reporter.stage(Stage::Export);
    let artifact = export(&new_items, category, &inputs.output_location, timestamp)?;
    reporter.info(&format!("wrote {}", artifact.display()));

    reporter.stage(Stage::Merge);
    let added = merge(&mut master_set, &new_items);

    reporter.stage(Stage::SaveMaster);
    match master::save(&inputs.master_file, &master_set) {
        Ok(()) => {}
        Err(ReconError::MasterWriteFailed { path, reason, .. }) => {
            reporter.warn(&format!(
                "artifact {} is valid, but the master was not updated",
                artifact.display()
            ));
            return Err(ReconError::MasterWriteFailed {
                path,
                reason,
                artifact: Some(artifact),
            });
        }
        Err(other) => return Err(other),
    }
    reporter.info(&format!(
        "master now holds {} item(s) (+{added})",
        master_set.len()
    ));

    outcome.master_after = master_set.len();
    outcome.artifact = Some(artifact);
    Ok(outcome)
}
