//! Column definitions and the standard formula library
//!
//! Every derived column is a type implementing [`Column`]: a name template, the
//! parameters it needs, the templates it depends on, an optional default for
//! missing results and a `calculate` function over the current table.
//!
//! The library mirrors the usual commutation-column workflow:
//! - **Mortality**: `x{life}`, `q(x{life})`, `p(x{life})`, `l(x{life})`, `d(x{life})`
//! - **Timeline**: `t`, `n{term_id}`
//! - **Interest**: `i`, `v^t`
//! - **Commutation**: `C`, `D`, `M`, `N`, `R`, `S` per life
//! - **Whole of life** and **term-limited** present values built on those

mod params;
pub mod registry;
pub mod template;

pub mod commutation;
pub mod interest;
pub mod mortality;
pub mod term;
pub mod timeline;
pub mod whole_of_life;

pub use params::{ParamValue, Params};
pub use registry::{ColumnDefinition, Registry};
pub use template::NameTemplate;

use crate::calc::Calc;
use crate::error::{CalcError, CalcResult};
use crate::series::Series;

pub(crate) const LIFE_PARAM: (&str, &str) = ("life", "Life identifier (int)");
pub(crate) const TERM_PARAM: (&str, &str) = ("term_id", "Term identifier (int)");

/// Contract implemented by every derived column
pub trait Column: Send + Sync {
    /// Name template, e.g. `D(x{life})`
    fn name_template(&self) -> &'static str;

    /// One-line description shown in the formula catalogue
    fn description(&self) -> &'static str;

    /// Required parameters as `(name, description)` pairs
    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// Templates that must exist before `calculate` runs.
    ///
    /// They are instantiated with this column's parameters, so they may only use
    /// placeholders this column also has.
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    /// Value substituted for nulls after calculation
    fn default_fill(&self) -> Option<f64> {
        None
    }

    /// Seed columns hold inputs (rates, ages, terms) that cannot be rebuilt from
    /// the column name alone. Once present they are never recomputed.
    fn is_seed(&self) -> bool {
        false
    }

    /// Compute the column from the table's current contents
    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let _ = (calc, params);
        Err(CalcError::Unimplemented {
            column: self.name_template().to_string(),
        })
    }
}

/// Look up the column `template` names for `params`
pub(crate) fn input<'a>(calc: &'a Calc, template: &str, params: &Params) -> CalcResult<&'a Series> {
    calc.column(&template::render(template, params)?)
}

/// Single value of the column `template` names for `params`
pub(crate) fn value_at(calc: &Calc, template: &str, params: &Params, row: usize) -> CalcResult<f64> {
    let name = template::render(template, params)?;
    calc.column(&name)?
        .get(row)
        .ok_or(CalcError::MissingValue { column: name, row })
}
