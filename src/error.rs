//! Error types for column resolution and calculation

pub type CalcResult<T> = Result<T, CalcError>;

/// Everything that can go wrong while resolving or computing a column.
///
/// All errors surface synchronously from [`crate::Calc::populate`]; nothing is
/// retried and columns written before the failure stay in the table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("unable to populate column ({column}) - no registered template matches it")]
    UnresolvableColumn { column: String },

    #[error("missing parameter ({parameter}) to populate ({column}) - {description}")]
    MissingParameter {
        column: String,
        parameter: String,
        description: String,
    },

    #[error("template {template} has no value for placeholder {{{placeholder}}}")]
    MissingPlaceholder {
        template: String,
        placeholder: String,
    },

    #[error("invalid value {value:?} for parameter ({parameter}): {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("invalid column template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("template {template} is already registered")]
    DuplicateTemplate { template: String },

    #[error("column {column} has {actual} rows, table has {expected}")]
    DimensionMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column {column} cannot be written: the table has no rows yet")]
    EmptyTable { column: String },

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("column {column} has no value at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("calculate method for {column} not yet implemented")]
    Unimplemented { column: String },

    #[error("circular dependency while populating {column}: {}", chain.join(" -> "))]
    CircularDependency { column: String, chain: Vec<String> },
}
