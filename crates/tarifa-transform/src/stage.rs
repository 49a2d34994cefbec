use std::time::Duration;

use tarifa_types::Row;

/// Recorded result from one stage of a pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageResult {
    /// Name of the stage that produced this result.
    pub stage_name: String,
    /// Data rows handed to the stage.
    pub rows_in: usize,
    /// Data rows the stage produced.
    pub rows_out: usize,
    /// Wall-clock time the stage took.
    pub elapsed: Duration,
}

/// A single step of the new-file transform pipeline.
///
/// Stages see data rows only; the header is held aside by the pipeline and
/// re-attached unchanged. Stages are pure: they consume their input and
/// return a new row sequence.
///
/// The trait is object-safe and `Send + Sync` so stages can be stored in a
/// `Vec<Box<dyn TransformStage>>`.
pub trait TransformStage: Send + Sync {
    /// Human-readable name of this stage (e.g., "section-reorder").
    fn name(&self) -> &str;

    /// Transform the data rows.
    fn apply(&self, rows: Vec<Row>) -> Vec<Row>;
}
