//! Present values payable for the whole remainder of life

use super::{input, Column, Params, LIFE_PARAM};
use crate::calc::Calc;
use crate::error::CalcResult;
use crate::series::Series;

/// `numerator / D(x)`, optionally reading the numerator one period ahead
fn over_d(calc: &Calc, numerator: &str, params: &Params, in_arrears: bool) -> CalcResult<Series> {
    let numerator = input(calc, numerator, params)?;
    let dx = input(calc, "D(x{life})", params)?;
    Ok(if in_arrears {
        numerator.shift(-1) / dx
    } else {
        numerator / dx
    })
}

pub struct AnnuityDue;

impl Column for AnnuityDue {
    fn name_template(&self) -> &'static str {
        "a_due(x{life})"
    }

    fn description(&self) -> &'static str {
        "PV of annuity due (paid in advance) for remainder of life."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["N(x{life})", "D(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        over_d(calc, "N(x{life})", params, false)
    }
}

pub struct Annuity;

impl Column for Annuity {
    fn name_template(&self) -> &'static str {
        "a(x{life})"
    }

    fn description(&self) -> &'static str {
        "PV of annuity (paid in arrears) for remainder of life."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["N(x{life})", "D(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        over_d(calc, "N(x{life})", params, true)
    }
}

pub struct Assurance;

impl Column for Assurance {
    fn name_template(&self) -> &'static str {
        "A(x{life})"
    }

    fn description(&self) -> &'static str {
        "PV of whole of life assurance paid in arrears."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["M(x{life})", "D(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        over_d(calc, "M(x{life})", params, false)
    }
}

pub struct NetPremium;

impl Column for NetPremium {
    fn name_template(&self) -> &'static str {
        "NP(x{life})"
    }

    fn description(&self) -> &'static str {
        "Net premium for whole of life assurance."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["A(x{life})", "a_due(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        Ok(input(calc, "A(x{life})", params)? / input(calc, "a_due(x{life})", params)?)
    }
}

pub struct IncreasingAnnuityDue;

impl Column for IncreasingAnnuityDue {
    fn name_template(&self) -> &'static str {
        "Ia_due(x{life})"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing annuity due (paid in advance) for remainder of life."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["S(x{life})", "D(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        over_d(calc, "S(x{life})", params, false)
    }
}

pub struct IncreasingAnnuity;

impl Column for IncreasingAnnuity {
    fn name_template(&self) -> &'static str {
        "Ia(x{life})"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing annuity (paid in arrears) for remainder of life."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["S(x{life})", "D(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        over_d(calc, "S(x{life})", params, true)
    }
}

pub struct IncreasingAssurance;

impl Column for IncreasingAssurance {
    fn name_template(&self) -> &'static str {
        "IA(x{life})"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing whole of life assurance paid in arrears."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[LIFE_PARAM]
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["R(x{life})", "D(x{life})"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        over_d(calc, "R(x{life})", params, false)
    }
}
