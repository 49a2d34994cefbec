use std::time::{Duration, Instant};

use tarifa_types::Grid;
use tracing::{debug, info};

use crate::config::TransformConfig;
use crate::format::FieldFormatter;
use crate::reorder::SectionReorder;
use crate::stage::{StageResult, TransformStage};
use crate::zero_rows::{LegacyZeroDeletion, ZeroRowInsertion};

// ---------------------------------------------------------------------------
// TransformReport
// ---------------------------------------------------------------------------

/// What a pipeline run did, stage by stage.
#[derive(Clone, Debug, Default)]
pub struct TransformReport {
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    /// Total wall-clock time for the run.
    pub elapsed: Duration,
}

impl TransformReport {
    /// Net change in data rows across the whole run.
    pub fn row_delta(&self) -> isize {
        match (self.stage_results.first(), self.stage_results.last()) {
            (Some(first), Some(last)) => last.rows_out as isize - first.rows_in as isize,
            _ => 0,
        }
    }
}

/// The transformed grid together with its report.
#[derive(Clone, Debug)]
pub struct TransformOutput {
    pub grid: Grid,
    pub report: TransformReport,
}

// ---------------------------------------------------------------------------
// TransformPipeline
// ---------------------------------------------------------------------------

/// An ordered list of stages applied to the data rows of a grid.
///
/// The header row is set aside before the first stage and re-attached,
/// unchanged, after the last.
pub struct TransformPipeline {
    stages: Vec<Box<dyn TransformStage>>,
    config: TransformConfig,
}

impl TransformPipeline {
    /// Create a pipeline with no stages.
    pub fn new(config: TransformConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// The canonical new-file pipeline:
    /// legacy deletion -> zero insertion -> section reorder -> formatter
    pub fn with_default_stages(config: TransformConfig) -> Self {
        let mut pipeline = Self::new(config);
        let policy = pipeline.config.legacy_zero_policy.clone();
        pipeline.add_stage(Box::new(LegacyZeroDeletion::new(policy)));
        pipeline.add_stage(Box::new(ZeroRowInsertion));
        pipeline.add_stage(Box::new(SectionReorder));
        pipeline.add_stage(Box::new(FieldFormatter));
        pipeline
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn TransformStage>) {
        self.stages.push(stage);
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Stage names in evaluation order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over a copy of `grid`.
    ///
    /// An empty grid yields an empty grid.
    pub fn run(&self, grid: &Grid) -> TransformOutput {
        let started = Instant::now();
        let Some((header, mut rows)) = grid.clone().split_header() else {
            return TransformOutput {
                grid: Grid::new(),
                report: TransformReport::default(),
            };
        };

        let mut stage_results = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            let stage_start = Instant::now();
            let rows_in = rows.len();
            rows = stage.apply(rows);
            let result = StageResult {
                stage_name: stage.name().to_string(),
                rows_in,
                rows_out: rows.len(),
                elapsed: stage_start.elapsed(),
            };
            debug!(
                stage = %result.stage_name,
                rows_in = result.rows_in,
                rows_out = result.rows_out,
                "transform stage complete"
            );
            stage_results.push(result);
        }

        let report = TransformReport {
            stage_results,
            elapsed: started.elapsed(),
        };
        info!(
            rows = rows.len(),
            delta = report.row_delta(),
            elapsed_us = report.elapsed.as_micros() as u64,
            "new price list transformed"
        );
        TransformOutput {
            grid: Grid::with_header(header, rows),
            report,
        }
    }
}

/// Transform a freshly loaded "new" grid into its canonical form using the
/// default stages.
pub fn process_new_data(grid: &Grid, config: &TransformConfig) -> Grid {
    TransformPipeline::with_default_stages(config.clone())
        .run(grid)
        .grid
}
