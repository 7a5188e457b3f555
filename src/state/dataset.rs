//! Raw dataset holder

use crate::data::{BuildResponse, PowerRecords, WorkRecords};

/// The record groups of the last successful computation.
///
/// `version` increases on every change of content, so anything derived from
/// the records can be keyed on it.
#[derive(Debug, Default)]
pub struct DatasetHolder {
    power: PowerRecords,
    work: WorkRecords,
    version: u64,
}

impl DatasetHolder {
    pub fn power(&self) -> &PowerRecords {
        &self.power
    }

    pub fn work(&self) -> &WorkRecords {
        &self.work
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty() && self.work.is_empty()
    }

    /// Reset both groups to the all-empty shape
    pub fn clear(&mut self) {
        self.power = PowerRecords::default();
        self.work = WorkRecords::default();
        self.version += 1;
    }

    /// Swap in a complete computation result; both groups change together
    pub fn replace(&mut self, response: BuildResponse) {
        let BuildResponse { p, w } = response;
        self.power = p;
        self.work = w;
        self.version += 1;
    }
}
