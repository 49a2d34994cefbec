use serde::{Deserialize, Serialize};

/// Which pre-existing separator rows the pipeline deletes before inserting
/// its own.
///
/// Two variants of this rule have been in use: the fixed rows 1 and 3 of the
/// sheet (header is row 0), and later every separator within the first ten
/// data rows. Neither is authoritative, so the choice is configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LegacyZeroPolicy {
    /// Delete separators found at these grid positions (header = 0),
    /// evaluated against the original positions.
    FixedPositions { positions: Vec<usize> },
    /// Delete every separator among the first `rows` data rows.
    LeadingWindow { rows: usize },
    /// Keep all pre-existing separators.
    Disabled,
}

impl Default for LegacyZeroPolicy {
    fn default() -> Self {
        Self::FixedPositions {
            positions: vec![1, 3],
        }
    }
}

impl LegacyZeroPolicy {
    /// Whether a separator at data index `data_index` is deleted.
    pub fn deletes(&self, data_index: usize) -> bool {
        match self {
            Self::FixedPositions { positions } => positions.contains(&(data_index + 1)),
            Self::LeadingWindow { rows } => data_index < *rows,
            Self::Disabled => false,
        }
    }
}

/// Configuration for the new-file transform pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Positional separator deletion applied before insertion.
    pub legacy_zero_policy: LegacyZeroPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_rows_one_and_three() {
        let policy = TransformConfig::default().legacy_zero_policy;
        assert!(policy.deletes(0));
        assert!(!policy.deletes(1));
        assert!(policy.deletes(2));
        assert!(!policy.deletes(3));
    }

    #[test]
    fn leading_window() {
        let policy = LegacyZeroPolicy::LeadingWindow { rows: 10 };
        assert!(policy.deletes(9));
        assert!(!policy.deletes(10));
        assert!(!LegacyZeroPolicy::Disabled.deletes(0));
    }

    #[test]
    fn parses_from_toml() {
        let config: TransformConfig = toml::from_str(
            r#"
            [legacy_zero_policy]
            kind = "leading_window"
            rows = 10
            "#,
        )
        .unwrap();
        assert_eq!(
            config.legacy_zero_policy,
            LegacyZeroPolicy::LeadingWindow { rows: 10 }
        );

        let empty: TransformConfig = toml::from_str("").unwrap();
        assert_eq!(empty, TransformConfig::default());
    }
}
