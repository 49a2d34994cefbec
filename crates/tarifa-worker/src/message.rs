use serde::{Deserialize, Serialize};
use tarifa_diff::Comparison;
use tarifa_types::Grid;

use crate::error::WorkerResult;

/// Two raw grids to compare; `base_data` is the one displayed and annotated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub base_data: Grid,
    pub new_data: Grid,
}

impl ComparisonRequest {
    pub fn new(base_data: Grid, new_data: Grid) -> Self {
        Self {
            base_data,
            new_data,
        }
    }
}

/// Outcome of a comparison, in a form that can cross a process boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonReply {
    Done {
        display_data: Grid,
        /// Differing cells as `"row:col"`, data rows counted from zero.
        differences: Vec<String>,
    },
    Failed {
        error: String,
    },
}

impl ComparisonReply {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Done { .. } => "Done",
            Self::Failed { .. } => "Failed",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

impl From<WorkerResult<Comparison>> for ComparisonReply {
    fn from(result: WorkerResult<Comparison>) -> Self {
        match result {
            Ok(comparison) => Self::Done {
                differences: comparison.difference_strings(),
                display_data: comparison.display_data,
            },
            Err(e) => Self::Failed {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use std::time::Duration;
    use tarifa_types::row;

    #[test]
    fn failed_reply_carries_message() {
        let reply = ComparisonReply::from(Err(WorkerError::Timeout(Duration::from_secs(1))));
        assert!(!reply.is_done());
        assert_eq!(reply.type_name(), "Failed");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "comparison timed out after 1s");
    }

    #[test]
    fn done_reply_serializes_coordinates() {
        let reply = ComparisonReply::Done {
            display_data: Grid::from_rows(vec![row(["Tipo"])]),
            differences: vec!["2:3".into()],
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(
            json,
            r#"{"status":"done","display_data":[["Tipo"]],"differences":["2:3"]}"#
        );
        let back: ComparisonReply = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reply);
    }
}
