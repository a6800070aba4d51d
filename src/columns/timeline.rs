//! Time period columns

use super::{Column, Params, TERM_PARAM};
use crate::calc::Calc;
use crate::error::CalcResult;
use crate::series::Series;

/// Period count `t = 0, 1, ...`
pub struct Period;

impl Column for Period {
    fn name_template(&self) -> &'static str {
        "t"
    }

    fn description(&self) -> &'static str {
        "Time period count starting at zero."
    }

    fn calculate(&self, calc: &Calc, _params: &Params) -> CalcResult<Series> {
        Ok((0..calc.row_count()).map(|t| t as f64).collect())
    }
}

/// Countdown `n, n-1, ..., 0` followed by nulls
pub struct RemainingTerm;

impl Column for RemainingTerm {
    fn name_template(&self) -> &'static str {
        "n{term_id}"
    }

    fn description(&self) -> &'static str {
        "Remaining term (n) periods."
    }

    fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        &[TERM_PARAM, ("n", "Term in periods (int)")]
    }

    fn is_seed(&self) -> bool {
        true
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let n = params.get_usize("n")?;
        let countdown: Series = (0..=n).rev().map(|k| k as f64).collect();
        Ok(countdown.resized(calc.row_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::testing::{flat_calc, ROWS};
    use crate::error::CalcError;

    #[test]
    fn test_period_counts_rows() {
        let mut calc = flat_calc();
        calc.populate("t", false).unwrap();
        let t = calc.column("t").unwrap();

        assert_eq!(t.get(0), Some(0.0));
        assert_eq!(t.get(ROWS - 1), Some((ROWS - 1) as f64));
    }

    #[test]
    fn test_term_longer_than_table_is_truncated() {
        let mut calc = flat_calc();
        calc.add_term(30).unwrap();
        let n = calc.column("n1").unwrap();

        assert_eq!(n.len(), ROWS);
        assert_eq!(n.null_count(), 0);
        assert_eq!(n.get(ROWS - 1), Some((30 - ROWS + 1) as f64));
    }

    #[test]
    fn test_term_needs_explicit_length() {
        let mut calc = flat_calc();

        assert!(matches!(
            calc.populate("n1", false),
            Err(CalcError::MissingParameter { parameter, .. }) if parameter == "n"
        ));
    }
}
