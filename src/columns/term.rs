//! Present values limited to a term of `n{term_id}` periods
//!
//! Each column reads the term length from the first row of the countdown,
//! subtracts the commutation value at the end of the term and keeps only the
//! rows up to and including that end. Later rows are null before the default
//! fill turns them into zero.

use super::{input, value_at, Column, Params, LIFE_PARAM, TERM_PARAM};
use crate::calc::Calc;
use crate::error::CalcResult;
use crate::series::Series;

const LIFE_AND_TERM: &[(&str, &str)] = &[LIFE_PARAM, TERM_PARAM];

/// Row at which the term ends
fn term_end(calc: &Calc, params: &Params) -> CalcResult<usize> {
    Ok(value_at(calc, "n{term_id}", params, 0)? as usize)
}

/// `(numerator - numerator[end]) / D(x)` up to the end of the term.
///
/// In arrears the numerator is read one period ahead, and so is the value it
/// is reduced by.
fn deferred_difference(calc: &Calc, numerator: &str, params: &Params, in_arrears: bool) -> CalcResult<Series> {
    let end = term_end(calc, params)?;
    let dx = input(calc, "D(x{life})", params)?;
    let values = input(calc, numerator, params)?;

    let result = if in_arrears {
        let at_end = value_at(calc, numerator, params, end + 1)?;
        (values.shift(-1) - at_end) / dx
    } else {
        let at_end = value_at(calc, numerator, params, end)?;
        (values - at_end) / dx
    };
    Ok(result.head(end + 1))
}

pub struct TermAnnuityDue;

impl Column for TermAnnuityDue {
    fn name_template(&self) -> &'static str {
        "a_due(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of annuity due (paid in advance) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["N(x{life})", "D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        deferred_difference(calc, "N(x{life})", params, false)
    }
}

pub struct TermAnnuity;

impl Column for TermAnnuity {
    fn name_template(&self) -> &'static str {
        "a(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of annuity (paid in arrears) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["N(x{life})", "D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        deferred_difference(calc, "N(x{life})", params, true)
    }
}

pub struct TermAssurance;

impl Column for TermAssurance {
    fn name_template(&self) -> &'static str {
        "A(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of a term assurance (paid in arrears) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["M(x{life})", "D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        deferred_difference(calc, "M(x{life})", params, false)
    }
}

pub struct PureEndowment;

impl Column for PureEndowment {
    fn name_template(&self) -> &'static str {
        "E(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of a pure endowment for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let end = term_end(calc, params)?;
        let d_end = value_at(calc, "D(x{life})", params, end)?;
        Ok((d_end / input(calc, "D(x{life})", params)?).head(end + 1))
    }
}

pub struct EndowmentAssurance;

impl Column for EndowmentAssurance {
    fn name_template(&self) -> &'static str {
        "EA(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of an endowment assurance (paid in arrears) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["M(x{life})", "D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let end = term_end(calc, params)?;
        let mx = input(calc, "M(x{life})", params)?;
        let dx = input(calc, "D(x{life})", params)?;
        let m_end = value_at(calc, "M(x{life})", params, end)?;
        let d_end = value_at(calc, "D(x{life})", params, end)?;

        Ok(((mx - m_end + d_end) / dx).head(end + 1))
    }
}

pub struct TermNetPremium;

impl Column for TermNetPremium {
    fn name_template(&self) -> &'static str {
        "NP(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "Net Premium a term assurance for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["EA(x{life})[n{term_id}]", "a_due(x{life})[n{term_id}]"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    /// No premiums are due at the end of the term, so the ratio is left empty there
    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let endowment = input(calc, "EA(x{life})[n{term_id}]", params)?;
        let annuity = input(calc, "a_due(x{life})[n{term_id}]", params)?;
        Ok((endowment / annuity).non_finite_to_null())
    }
}

pub struct TermIncreasingAnnuityDue;

impl Column for TermIncreasingAnnuityDue {
    fn name_template(&self) -> &'static str {
        "Ia_due(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing annuity due (paid in advance) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["S(x{life})", "D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        deferred_difference(calc, "S(x{life})", params, false)
    }
}

pub struct TermIncreasingAnnuity;

impl Column for TermIncreasingAnnuity {
    fn name_template(&self) -> &'static str {
        "Ia(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing annuity (paid in arrears) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["S(x{life})", "D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        deferred_difference(calc, "S(x{life})", params, true)
    }
}

pub struct TermIncreasingAssurance;

impl Column for TermIncreasingAssurance {
    fn name_template(&self) -> &'static str {
        "IA(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing term assurance (paid in arrears) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["R(x{life})", "D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        deferred_difference(calc, "R(x{life})", params, false)
    }
}

pub struct IncreasingPureEndowment;

impl Column for IncreasingPureEndowment {
    fn name_template(&self) -> &'static str {
        "IE(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing pure endowment (paid in arrears) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["D(x{life})", "n{term_id}"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    /// The endowment paid at the end of the term is the term length
    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let end = term_end(calc, params)?;
        let d_end = value_at(calc, "D(x{life})", params, end)?;
        Ok((d_end * end as f64 / input(calc, "D(x{life})", params)?).head(end + 1))
    }
}

pub struct IncreasingEndowmentAssurance;

impl Column for IncreasingEndowmentAssurance {
    fn name_template(&self) -> &'static str {
        "IEA(x{life})[n{term_id}]"
    }

    fn description(&self) -> &'static str {
        "PV of arithmetically increasing endowment assurance (paid in arrears) for term n."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        LIFE_AND_TERM
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["IE(x{life})[n{term_id}]", "IA(x{life})[n{term_id}]"]
    }

    fn default_fill(&self) -> Option<f64> {
        Some(0.0)
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        Ok(input(calc, "IE(x{life})[n{term_id}]", params)? + input(calc, "IA(x{life})[n{term_id}]", params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::testing::{flat_calc, r, Q, RATE, ROWS};
    use crate::error::CalcError;
    use approx::assert_relative_eq;

    const TERM: usize = 5;

    fn term_calc() -> Calc {
        let mut calc = flat_calc();
        calc.add_term(TERM as u32).unwrap();
        calc
    }

    fn value(calc: &Calc, column: &str, row: usize) -> f64 {
        calc.column(column).unwrap().get(row).unwrap()
    }

    fn sum_r(range: std::ops::Range<usize>) -> f64 {
        range.map(|j| r().powi(j as i32)).sum()
    }

    #[test]
    fn test_annuity_due_stops_at_term() {
        let mut calc = term_calc();
        calc.populate("a_due(x1)[n1]", false).unwrap();

        assert_relative_eq!(value(&calc, "a_due(x1)[n1]", 0), sum_r(0..TERM), epsilon = 1e-9);
        assert_relative_eq!(value(&calc, "a_due(x1)[n1]", 3), sum_r(0..2), epsilon = 1e-9);
        assert_eq!(value(&calc, "a_due(x1)[n1]", TERM), 0.0);
        assert_eq!(value(&calc, "a_due(x1)[n1]", TERM + 2), 0.0);
        assert_eq!(calc.column("a_due(x1)[n1]").unwrap().null_count(), 0);
    }

    #[test]
    fn test_annuity_in_arrears() {
        let mut calc = term_calc();
        calc.populate("a(x1)[n1]", false).unwrap();

        assert_relative_eq!(value(&calc, "a(x1)[n1]", 0), sum_r(1..TERM + 1), epsilon = 1e-9);
        assert_eq!(value(&calc, "a(x1)[n1]", TERM), 0.0);
    }

    #[test]
    fn test_endowment_is_pure_endowment_plus_assurance() {
        let mut calc = term_calc();
        calc.populate_all(&["EA(x1)[n1]", "E(x1)[n1]", "A(x1)[n1]"], false)
            .unwrap();

        for row in [0, 3, TERM, TERM + 3] {
            assert_relative_eq!(
                value(&calc, "EA(x1)[n1]", row),
                value(&calc, "E(x1)[n1]", row) + value(&calc, "A(x1)[n1]", row),
                epsilon = 1e-12
            );
        }

        assert_relative_eq!(value(&calc, "E(x1)[n1]", 0), r().powi(TERM as i32), epsilon = 1e-12);
        let term_assurance = Q / (1.0 + RATE) * sum_r(0..TERM);
        assert_relative_eq!(value(&calc, "A(x1)[n1]", 0), term_assurance, epsilon = 1e-12);
        assert_eq!(value(&calc, "E(x1)[n1]", TERM), 1.0);
        assert_eq!(value(&calc, "A(x1)[n1]", TERM), 0.0);
        assert_eq!(value(&calc, "EA(x1)[n1]", TERM + 3), 0.0);
    }

    #[test]
    fn test_net_premium_is_zero_at_term_end() {
        let mut calc = term_calc();
        calc.populate("NP(x1)[n1]", false).unwrap();

        assert_relative_eq!(
            value(&calc, "NP(x1)[n1]", 0),
            value(&calc, "EA(x1)[n1]", 0) / value(&calc, "a_due(x1)[n1]", 0),
            epsilon = 1e-12
        );
        assert_eq!(value(&calc, "NP(x1)[n1]", TERM), 0.0);
        assert_eq!(value(&calc, "NP(x1)[n1]", ROWS - 1), 0.0);
    }

    #[test]
    fn test_increasing_columns() {
        let mut calc = term_calc();
        calc.populate_all(&["Ia_due(x1)[n1]", "Ia(x1)[n1]", "IEA(x1)[n1]"], false)
            .unwrap();

        let s0 = value(&calc, "S(x1)", 0);
        let s_end = value(&calc, "S(x1)", TERM);
        let d0 = value(&calc, "D(x1)", 0);
        assert_relative_eq!(value(&calc, "Ia_due(x1)[n1]", 0), (s0 - s_end) / d0, epsilon = 1e-9);
        assert_eq!(value(&calc, "Ia(x1)[n1]", TERM), 0.0);

        assert_relative_eq!(
            value(&calc, "IE(x1)[n1]", 0),
            TERM as f64 * r().powi(TERM as i32),
            epsilon = 1e-12
        );
        for row in [0, 2, TERM + 1] {
            assert_relative_eq!(
                value(&calc, "IEA(x1)[n1]", row),
                value(&calc, "IE(x1)[n1]", row) + value(&calc, "IA(x1)[n1]", row),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_second_term_is_independent() {
        let mut calc = term_calc();
        calc.add_term(10).unwrap();
        calc.populate_all(&["a_due(x1)[n1]", "a_due(x1)[n2]"], false)
            .unwrap();

        assert_relative_eq!(value(&calc, "a_due(x1)[n2]", 0), sum_r(0..10), epsilon = 1e-9);
        assert!(value(&calc, "a_due(x1)[n2]", 0) > value(&calc, "a_due(x1)[n1]", 0));
    }

    #[test]
    fn test_term_must_be_added_first() {
        let mut calc = flat_calc();

        assert!(matches!(
            calc.populate("A(x1)[n1]", false),
            Err(CalcError::MissingParameter { parameter, .. }) if parameter == "n"
        ));
        // Dependencies resolved before the failure are kept
        assert!(calc.has_column("M(x1)"));
        assert!(!calc.has_column("A(x1)[n1]"));
    }

    #[test]
    fn test_term_ending_on_last_row() {
        let mut calc = flat_calc();
        calc.add_term(ROWS as u32 - 1).unwrap();
        calc.populate_all(&["A(x1)[n1]", "A(x1)"], false).unwrap();

        assert_eq!(value(&calc, "A(x1)", ROWS - 1), 0.0);
        assert_relative_eq!(
            value(&calc, "A(x1)[n1]", 0),
            value(&calc, "A(x1)", 0),
            epsilon = 1e-12
        );
        assert_eq!(value(&calc, "A(x1)[n1]", ROWS - 1), 0.0);
    }

    #[test]
    fn test_term_beyond_table() {
        let mut calc = flat_calc();
        calc.add_term(ROWS as u32 + 5).unwrap();

        assert_eq!(
            calc.populate("a_due(x1)[n1]", false),
            Err(CalcError::MissingValue {
                column: "N(x1)".to_string(),
                row: ROWS + 5,
            })
        );
    }
}
