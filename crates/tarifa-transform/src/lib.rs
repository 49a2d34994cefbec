//! New-file transform pipeline for Tarifa.
//!
//! Turns a freshly loaded "new" price list into its canonical form. The
//! pipeline is an ordered list of [`TransformStage`]s and the order is
//! load-bearing:
//!
//! 1. [`LegacyZeroDeletion`] -- drop separator rows at configured positions
//! 2. [`ZeroRowInsertion`] -- frame markers and sections with separators
//! 3. [`SectionReorder`] -- sort year-blocks inside each model section
//! 4. [`FieldFormatter`] -- rewrite block labels and price notes
//!
//! Reordering reads the year out of the original block label text, and
//! formatting overwrites that text, so formatting always runs last.

pub mod config;
pub mod format;
pub mod pipeline;
pub mod reorder;
pub mod stage;
pub mod zero_rows;

pub use config::{LegacyZeroPolicy, TransformConfig};
pub use format::{format_fields, FieldFormatter};
pub use pipeline::{process_new_data, TransformOutput, TransformPipeline, TransformReport};
pub use reorder::{reorder_sections, SectionReorder};
pub use stage::{StageResult, TransformStage};
pub use zero_rows::{delete_legacy_zero_rows, insert_zero_rows, LegacyZeroDeletion, ZeroRowInsertion};
