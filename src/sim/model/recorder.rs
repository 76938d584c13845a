use chrono::NaiveDateTime;

use super::result::{ResultRecord, SimulationOutput};

/// Run-local buffer of result rows.
///
/// The integrator creates one per `run`, pushes one row per emitted step and
/// finalizes it into a [`SimulationOutput`] only when the run succeeds.
#[derive(Debug, Default)]
pub struct Recorder {
    records: Vec<ResultRecord>,
    keep_diagnostics: bool,
}

impl Recorder {
    pub fn new(capacity: usize, keep_diagnostics: bool) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            keep_diagnostics,
        }
    }

    pub fn push(&mut self, mut record: ResultRecord) {
        if !self.keep_diagnostics {
            record.diagnostics = None;
        }
        self.records.push(record);
    }

    /// Repeats the last row under a new timestamp and air/dewpoint values.
    ///
    /// Does nothing before the first row. The integrator only repeats after
    /// a step has been recorded, since a duplicate needs a predecessor.
    pub fn repeat_last(
        &mut self,
        datetime: NaiveDateTime,
        air_temperature: f64,
        dewpoint_temperature: f64,
    ) {
        let Some(last) = self.records.last() else {
            return;
        };
        let repeated = ResultRecord {
            datetime,
            air_temperature,
            dewpoint_temperature,
            ..*last
        };
        self.records.push(repeated);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finalize(self) -> SimulationOutput {
        SimulationOutput {
            records: self.records,
        }
    }
}
