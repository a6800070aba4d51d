//! Per-life decrement columns
//!
//! `q(x)` and `x` are seeded by [`Calc::add_life`]; survival, the `l(x)`
//! population and `d(x)` deaths are derived from the rates.

use super::{input, Column, Params, LIFE_PARAM};
use crate::calc::Calc;
use crate::error::CalcResult;
use crate::series::Series;

pub struct Age;

impl Column for Age {
    fn name_template(&self) -> &'static str {
        "x{life}"
    }

    fn description(&self) -> &'static str {
        "Age of a life."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM, ("age", "Age at start of the life (int).")]
    }

    fn is_seed(&self) -> bool {
        true
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let age = params.get_int("age")?;
        Ok((0..calc.row_count() as i64).map(|t| (age + t) as f64).collect())
    }
}

pub struct Mortality;

impl Column for Mortality {
    fn name_template(&self) -> &'static str {
        "q(x{life})"
    }

    fn description(&self) -> &'static str {
        "Mortality q(x) of a life."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[
            LIFE_PARAM,
            (
                "qx",
                "List of mortality rates for this life starting at life age at time zero (list of float).",
            ),
        ]
    }

    fn is_seed(&self) -> bool {
        true
    }

    /// The first life's rates set the row count; later lives are fitted to it
    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let rates = Series::from(params.get_rates("qx")?.to_vec());
        Ok(match calc.table().established_rows() {
            Some(rows) => rates.resized(rows),
            None => rates,
        })
    }
}

pub struct Survival;

impl Column for Survival {
    fn name_template(&self) -> &'static str {
        "p(x{life})"
    }

    fn description(&self) -> &'static str {
        "Probability p(x) of surviving until next period."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["q(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        Ok(1.0 - input(calc, "q(x{life})", params)?)
    }
}

pub struct Lives;

impl Column for Lives {
    fn name_template(&self) -> &'static str {
        "l(x{life})"
    }

    fn description(&self) -> &'static str {
        "Number of lives l(x) from original population alive at this age."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["q(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let qx = input(calc, "q(x{life})", params)?;

        let mut alive = Some(calc.config().radix);
        let mut values = Vec::with_capacity(qx.len());
        for q in qx.iter() {
            values.push(alive);
            alive = alive.zip(q).map(|(l, q)| l * (1.0 - q));
        }
        Ok(Series::new(values))
    }
}

pub struct Deaths;

impl Column for Deaths {
    fn name_template(&self) -> &'static str {
        "d(x{life})"
    }

    fn description(&self) -> &'static str {
        "Number of deaths d(x) from original population in this period."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["l(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let lx = input(calc, "l(x{life})", params)?;
        Ok(lx - lx.shift(-1))
    }
}
