//! Actuarial Calc - lazy, template-addressed column engine for commutation-based calculations
//!
//! This library provides:
//! - A column table over discrete periods whose columns are built on demand
//! - Parameterised column names (`D(x{life})`, `a_due(x{life})[n{term_id}]`)
//!   resolved through an ordered registry of formulas
//! - Memoised dependency resolution with forced recomputation
//! - Mortality, interest, commutation and present value formulas
//! - Mortality table providers for one-dimensional and select tables

pub mod calc;
pub mod columns;
pub mod error;
pub mod series;
pub mod tables;
pub mod window;

// Re-export commonly used types
pub use calc::{Calc, CalcConfig, ColumnTable};
pub use columns::{Column, ColumnDefinition, NameTemplate, ParamValue, Params, Registry};
pub use error::{CalcError, CalcResult};
pub use series::Series;
pub use tables::{CsvMortalityTable, MortalityTable, TableError, TableLayout, TableSpec, TableType};
pub use window::{SliceN, SliceToEnd, WindowIndexer};
