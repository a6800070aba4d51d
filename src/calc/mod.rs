//! The calculation table and its lifecycle
//!
//! A [`Calc`] owns a [`ColumnTable`] plus the counters used to mint life and
//! term identifiers. Lives and terms are registered first, seeding the input
//! columns; everything else is built on demand by [`Calc::populate`].
//!
//! # Example
//!
//! ```rust,ignore
//! use actuarial_calc::Calc;
//!
//! let mut calc = Calc::new();
//! calc.add_life(45, &qx)?;      // seeds q(x1) and x1
//! calc.add_i(0.04)?;            // seeds i
//! calc.add_term(10)?;           // seeds n1
//! calc.populate("a_due(x1)[n1]", false)?;
//! let annuity = calc.column("a_due(x1)[n1]")?;
//! ```

mod engine;
mod table;

pub use table::ColumnTable;

use crate::columns::{Params, Registry};
use crate::error::{CalcError, CalcResult};
use crate::series::Series;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Default starting population for `l(x)`
pub const DEFAULT_RADIX: f64 = 100_000.0;

/// Settings shared by every column computed in a calc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcConfig {
    /// Number of lives at time zero in `l(x)`
    pub radix: f64,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            radix: DEFAULT_RADIX,
        }
    }
}

impl CalcConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Column table with lazy, memoised column resolution
#[derive(Debug, Clone)]
pub struct Calc {
    table: ColumnTable,
    registry: Arc<Registry>,
    config: CalcConfig,
    life_count: u32,
    term_count: u32,
}

impl Calc {
    /// Empty calc backed by the shared standard registry
    pub fn new() -> Self {
        Self::with_registry(Registry::shared())
    }

    /// Empty calc backed by a custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            table: ColumnTable::new(),
            registry,
            config: CalcConfig::default(),
            life_count: 0,
            term_count: 0,
        }
    }

    pub fn with_config(mut self, config: CalcConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn table(&self) -> &ColumnTable {
        &self.table
    }

    pub fn column(&self, name: &str) -> CalcResult<&Series> {
        self.table.get_column(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn life_count(&self) -> u32 {
        self.life_count
    }

    pub fn term_count(&self) -> u32 {
        self.term_count
    }

    /// Register a life from its starting age and mortality rates.
    ///
    /// The first life fixes the row count to `qx.len()`; later lives are
    /// truncated or padded with nulls to fit. Returns the age column name
    /// (`x1`, `x2`, ...).
    pub fn add_life(&mut self, age: u32, qx: &[f64]) -> CalcResult<String> {
        let life = self.life_count + 1;

        // Both seeds land or neither does
        let before = self.table.clone();
        let seeded = self
            .populate_template(
                "q(x{life})",
                &Params::new().with("life", life).with("qx", qx.to_vec()),
                false,
            )
            .and_then(|_| {
                self.populate_template(
                    "x{life}",
                    &Params::new().with("life", life).with("age", age),
                    false,
                )
            });
        let column = match seeded {
            Ok(column) => column,
            Err(e) => {
                self.table = before;
                return Err(e);
            }
        };

        self.life_count = life;
        info!("added life {} aged {} with {} mortality rates", life, age, qx.len());
        Ok(column)
    }

    /// Register a term of `n` periods. Returns the countdown column name (`n1`, ...).
    pub fn add_term(&mut self, n: u32) -> CalcResult<String> {
        let term_id = self.term_count + 1;

        let column = self.populate_template(
            "n{term_id}",
            &Params::new().with("term_id", term_id).with("n", n),
            false,
        )?;

        self.term_count = term_id;
        info!("added term {} of {} periods", term_id, n);
        Ok(column)
    }

    /// Set the flat interest rate per period as column `i`
    pub fn add_i(&mut self, rate: f64) -> CalcResult<()> {
        let rows = self
            .table
            .established_rows()
            .ok_or_else(|| CalcError::EmptyTable {
                column: "i".to_string(),
            })?;
        self.table.set_column("i", Series::full(rows, rate))?;
        info!("set interest rate {}", rate);
        Ok(())
    }

    /// Template and description of every column this calc can produce
    pub fn formulae(&self) -> Vec<(&str, &str)> {
        self.registry.formulae()
    }
}

impl Default for Calc {
    fn default() -> Self {
        Self::new()
    }
}
