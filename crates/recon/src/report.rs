//! Run-scoped reporting.
//!
//! The job never logs through globals directly; it writes to the
//! [`Reporter`] it was handed, which lives for one run.

use crate::model::Stage;

pub trait Reporter {
    /// Called when the job enters `stage`.
    fn stage(&mut self, stage: Stage);
    fn info(&mut self, message: &str);
    fn warn(&mut self, message: &str);
}

/// Forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn stage(&mut self, stage: Stage) {
        log::debug!("stage: {stage}");
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

/// Buffers everything it is told. Used to inspect a run in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    pub stages: Vec<Stage>,
    pub lines: Vec<String>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn stage(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    fn info(&mut self, message: &str) {
        self.lines.push(format!("INFO {message}"));
    }

    fn warn(&mut self, message: &str) {
        self.lines.push(format!("WARN {message}"));
    }
}
