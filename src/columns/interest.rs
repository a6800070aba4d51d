//! Interest and discounting

use super::{input, Column, Params};
use crate::calc::Calc;
use crate::error::CalcResult;
use crate::series::Series;

/// Interest rate per period, seeded by [`Calc::add_i`]
pub struct InterestRate;

impl Column for InterestRate {
    fn name_template(&self) -> &'static str {
        "i"
    }

    fn description(&self) -> &'static str {
        "Fixed interest rate"
    }

    fn is_seed(&self) -> bool {
        true
    }
}

pub struct DiscountFactor;

impl Column for DiscountFactor {
    fn name_template(&self) -> &'static str {
        "v^t"
    }

    fn description(&self) -> &'static str {
        "Discount factor v^t to discount for interest rates to first index period"
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &["i"]
    }

    fn calculate(&self, calc: &Calc, params: &Params) -> CalcResult<Series> {
        let rates = input(calc, "i", params)?;
        Ok(rates
            .iter()
            .enumerate()
            .map(|(t, rate)| rate.map(|i| (1.0 + i).powf(-(t as f64))))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::testing::{flat_calc, RATE};
    use crate::error::CalcError;
    use approx::assert_relative_eq;

    #[test]
    fn test_discount_factor() {
        let mut calc = flat_calc();
        calc.populate("v^t", false).unwrap();
        let v = calc.column("v^t").unwrap();

        assert_eq!(v.get(0), Some(1.0));
        assert_relative_eq!(v.get(10).unwrap(), (1.0 + RATE).powi(-10), epsilon = 1e-12);
    }

    #[test]
    fn test_interest_rate_must_be_seeded() {
        let mut calc = Calc::new();
        calc.add_life(30, &[0.01; 5]).unwrap();

        assert_eq!(
            calc.populate("v^t", false),
            Err(CalcError::Unimplemented {
                column: "i".to_string()
            })
        );
        assert!(!calc.has_column("v^t"));
    }
}
