//! Mortality table providers
//!
//! Tables turn a starting age into the sequence of future `q(x)` rates that
//! [`crate::Calc::add_life`] takes. They sit outside the column engine; any
//! source of rates will do.
//!
//! Supported layouts:
//! - One value column per age
//! - Select rates along a row, then the ultimate column down the table
//! - Select rates down a diagonal, then the ultimate column down the table
//!
//! Tables may hold `q(x)` rates or `l(x)` survivor counts; counts are converted
//! to rates on read.

mod loader;

pub use loader::CsvMortalityTable;

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("age {age} not found in the table")]
    AgeNotFound { age: u32 },

    #[error("column {column:?} not found in the table header")]
    MissingColumn { column: String },

    #[error("invalid value {value:?} in column {column:?} at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("table spec has no value columns")]
    NoValueColumns,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// What the table values measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    /// Probability of death within the period
    #[default]
    Qx,
    /// Survivors from an initial population
    Lx,
}

/// How select and ultimate values are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
    /// A single value column
    #[default]
    OneDimension,
    /// Select values along the age row, ultimate values in the last column of later rows
    SelectHorizontal,
    /// Select duration `k` read from row `age + k`, column `k`; then the last column
    SelectDiagonal,
}

/// Shape of a table file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Header of the age column
    pub age_column: String,
    /// Headers of the value columns, select durations first and ultimate last
    pub value_columns: Vec<String>,
    #[serde(default)]
    pub table_type: TableType,
    #[serde(default)]
    pub layout: TableLayout,
}

impl TableSpec {
    /// Single column of `q(x)` rates
    pub fn one_dimension(age_column: &str, value_column: &str) -> Self {
        Self {
            age_column: age_column.to_string(),
            value_columns: vec![value_column.to_string()],
            table_type: TableType::Qx,
            layout: TableLayout::OneDimension,
        }
    }

    pub fn from_json_path(path: &Path) -> Result<Self, TableError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Source of mortality rates by age
pub trait MortalityTable {
    /// Future `q(x)` rates for a life aged `age` now.
    ///
    /// With `select` the life has just been selected; otherwise ultimate rates
    /// apply from the start. One-dimensional tables ignore `select`.
    fn qx(&self, age: u32, select: bool) -> Result<Vec<f64>, TableError>;
}

/// Convert survivor counts to mortality rates: `q[k] = 1 - l[k+1] / l[k]`
pub fn lx_to_qx(lx: &[f64]) -> Vec<f64> {
    lx.windows(2).map(|pair| 1.0 - pair[1] / pair[0]).collect()
}
