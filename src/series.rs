//! Nullable numeric column values
//!
//! A [`Series`] is one column of a [`crate::calc::ColumnTable`]: an ordered
//! sequence of `Option<f64>` aligned by row with every other column. Arithmetic
//! between series is element-wise and null-propagating; a `NaN` result is
//! stored as null so that default fills and window sums treat it as missing.

use crate::window::{rolling_sum, WindowIndexer};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<Option<f64>>);

fn nan_to_null(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

impl Series {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }

    /// Series with every row set to `value`
    pub fn full(len: usize, value: f64) -> Self {
        Self(vec![Some(value); len])
    }

    /// Series with every row null
    pub fn nulls(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `row`, or `None` if the row is null or out of range
    pub fn get(&self, row: usize) -> Option<f64> {
        self.0.get(row).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.0.iter().copied()
    }

    pub fn into_inner(self) -> Vec<Option<f64>> {
        self.0
    }

    pub fn null_count(&self) -> usize {
        self.0.iter().filter(|v| v.is_none()).count()
    }

    /// Apply `f` to every non-null value
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Series {
        self.0.iter().map(|v| v.and_then(|x| nan_to_null(f(x)))).collect()
    }

    /// Combine row by row with `other`; null when either side is null.
    ///
    /// The result has `self.len()` rows. Rows missing from `other` are null.
    pub fn zip_with(&self, other: &Series, f: impl Fn(f64, f64) -> f64) -> Series {
        (0..self.len())
            .map(|row| match (self.get(row), other.get(row)) {
                (Some(a), Some(b)) => nan_to_null(f(a, b)),
                _ => None,
            })
            .collect()
    }

    /// Shift values by `periods` rows, keeping the length.
    ///
    /// A negative shift pulls later rows forward (`shift(-1)[t] == self[t + 1]`);
    /// vacated rows become null.
    pub fn shift(&self, periods: isize) -> Series {
        let len = self.len() as isize;
        (0..len)
            .map(|row| {
                let source = row - periods;
                if (0..len).contains(&source) {
                    self.0[source as usize]
                } else {
                    None
                }
            })
            .collect()
    }

    /// Keep the first `rows` values and null the remainder (same length)
    pub fn head(&self, rows: usize) -> Series {
        self.0
            .iter()
            .enumerate()
            .map(|(row, v)| if row < rows { *v } else { None })
            .collect()
    }

    /// Truncate or pad with nulls to exactly `len` rows
    pub fn resized(mut self, len: usize) -> Series {
        self.0.resize(len, None);
        self
    }

    /// Replace nulls with `value`
    pub fn fill_null(&self, value: f64) -> Series {
        self.0.iter().map(|v| Some(v.unwrap_or(value))).collect()
    }

    /// Turn infinite values into nulls
    pub fn non_finite_to_null(&self) -> Series {
        self.0
            .iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect()
    }

    /// Sum over the windows produced by `indexer`
    pub fn rolling_sum(&self, indexer: &dyn WindowIndexer) -> Series {
        let bounds = indexer.window_bounds(self.len());
        rolling_sum(self, &bounds)
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        values.into_iter().collect()
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().map(nan_to_null).collect())
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

macro_rules! series_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Series> for &Series {
            type Output = Series;
            fn $method(self, rhs: &Series) -> Series {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl $trait<&Series> for Series {
            type Output = Series;
            fn $method(self, rhs: &Series) -> Series {
                (&self).$method(rhs)
            }
        }

        impl $trait<Series> for &Series {
            type Output = Series;
            fn $method(self, rhs: Series) -> Series {
                self.$method(&rhs)
            }
        }

        impl $trait<Series> for Series {
            type Output = Series;
            fn $method(self, rhs: Series) -> Series {
                (&self).$method(&rhs)
            }
        }

        impl $trait<f64> for &Series {
            type Output = Series;
            fn $method(self, rhs: f64) -> Series {
                self.map(|a| a $op rhs)
            }
        }

        impl $trait<f64> for Series {
            type Output = Series;
            fn $method(self, rhs: f64) -> Series {
                (&self).$method(rhs)
            }
        }

        impl $trait<&Series> for f64 {
            type Output = Series;
            fn $method(self, rhs: &Series) -> Series {
                rhs.map(|b| self $op b)
            }
        }
    };
}

series_binop!(Add, add, +);
series_binop!(Sub, sub, -);
series_binop!(Mul, mul, *);
series_binop!(Div, div, /);
