//! Commutation columns
//!
//! `C` and `D` combine discounting with the decrement table; `M`, `N`, `R`
//! and `S` are sums from each period to the end of the table.

use super::{input, Column, Params, LIFE_PARAM};
use crate::calc::Calc;
use crate::error::CalcResult;
use crate::series::Series;
use crate::window::SliceToEnd;

/// Sum of `source` from each row to the last
fn sum_to_end(calc: &Calc, source: &str, params: &Params) -> CalcResult<Series> {
    Ok(input(calc, source, params)?.rolling_sum(&SliceToEnd))
}

pub struct CommutationC;

impl Column for CommutationC {
    fn name_template(&self) -> &'static str {
        "C(x{life})"
    }

    fn description(&self) -> &'static str {
        "Commutation factor Cx."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["v^t", "d(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let v = input(calc, "v^t", params)?;
        Ok(v.shift(-1) * input(calc, "d(x{life})", params)?)
    }
}

pub struct CommutationD;

impl Column for CommutationD {
    fn name_template(&self) -> &'static str {
        "D(x{life})"
    }

    fn description(&self) -> &'static str {
        "Commutation factor Dx."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["v^t", "l(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        Ok(input(calc, "v^t", params)? * input(calc, "l(x{life})", params)?)
    }
}

pub struct CommutationM;

impl Column for CommutationM {
    fn name_template(&self) -> &'static str {
        "M(x{life})"
    }

    fn description(&self) -> &'static str {
        "Commutation factor Mx."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["C(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        sum_to_end(calc, "C(x{life})", params)
    }
}

pub struct CommutationN;

impl Column for CommutationN {
    fn name_template(&self) -> &'static str {
        "N(x{life})"
    }

    fn description(&self) -> &'static str {
        "Commutation factor Nx."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["D(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        sum_to_end(calc, "D(x{life})", params)
    }
}

pub struct CommutationR;

impl Column for CommutationR {
    fn name_template(&self) -> &'static str {
        "R(x{life})"
    }

    fn description(&self) -> &'static str {
        "Commutation factor Rx."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["M(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        sum_to_end(calc, "M(x{life})", params)
    }
}

pub struct CommutationS;

impl Column for CommutationS {
    fn name_template(&self) -> &'static str {
        "S(x{life})"
    }

    fn description(&self) -> &'static str {
        "Commutation factor Sx."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["N(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        sum_to_end(calc, "N(x{life})", params)
    }
}
