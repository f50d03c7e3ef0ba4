//! Startup check that a storage target can hold every record column.

use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

use crate::BlockRecord;

/// Mismatches between the record layout and a target's columns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The target lacks columns the record writes.
    #[error("Storage target is missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The same column was listed twice.
    #[error("Column '{0}' is listed more than once")]
    DuplicateColumn(String),
}

/// The set of columns a storage target exposes.
///
/// Verified once before any block is written, so a mismatch is a
/// configuration error rather than something each write has to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaContract {
    columns: Vec<String>,
}

impl SchemaContract {
    /// Describes a target by its column names. Matching is case-insensitive
    /// and ignores surrounding whitespace.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// A contract that matches the record exactly.
    #[must_use]
    pub fn exact() -> Self {
        Self::new(BlockRecord::COLUMNS)
    }

    /// Returns the declared columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Checks that every record column is present.
    ///
    /// Extra target columns are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateColumn`] for a repeated name, else
    /// [`SchemaError::MissingColumns`] listing every absent column.
    pub fn verify(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }
        let missing: Vec<String> = BlockRecord::COLUMNS
            .iter()
            .filter(|c| !seen.contains(*c))
            .map(|c| (*c).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns(missing));
        }
        debug!(columns = self.columns.len(), "schema contract verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_contract() {
        assert!(SchemaContract::exact().verify().is_ok());
    }

    #[test]
    fn test_extra_columns_allowed() {
        let mut columns: Vec<&str> = BlockRecord::COLUMNS.to_vec();
        columns.push("id");
        assert!(SchemaContract::new(columns).verify().is_ok());
    }

    #[test]
    fn test_case_insensitive() {
        let columns = BlockRecord::COLUMNS.map(str::to_uppercase);
        assert!(SchemaContract::new(columns).verify().is_ok());
    }

    #[test]
    fn test_missing_columns_listed() {
        let columns = ["open", "close", "high", "low", "volume", "reversal", "created_at"];
        let err = SchemaContract::new(columns).verify().unwrap_err();
        match err {
            SchemaError::MissingColumns(missing) => {
                assert_eq!(missing.len(), 11);
                assert!(missing.contains(&"weighted_mid_price".to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_column() {
        let err = SchemaContract::new(["open", "Open"]).verify().unwrap_err();
        assert_eq!(err, SchemaError::DuplicateColumn("open".into()));
    }
}
