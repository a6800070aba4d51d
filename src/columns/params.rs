//! Named parameters used to instantiate and compute column templates

use crate::error::{CalcError, CalcResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value.
///
/// Values parsed back out of a concrete column name are always `Text`; the
/// typed accessors on [`Params`] coerce them on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
    Rates(Vec<f64>),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(v) => f.write_str(v),
            ParamValue::Rates(values) => {
                let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(values: Vec<f64>) -> Self {
        ParamValue::Rates(values)
    }
}

/// Parameter name to value mapping, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Value for `name`, or an error if it was not supplied
    pub fn require(&self, name: &str) -> CalcResult<&ParamValue> {
        self.get(name).ok_or_else(|| CalcError::InvalidParameter {
            parameter: name.to_string(),
            value: String::new(),
            reason: "not supplied".to_string(),
        })
    }

    pub fn get_int(&self, name: &str) -> CalcResult<i64> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v),
            ParamValue::Float(v) if v.fract() == 0.0 => Ok(*v as i64),
            ParamValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| invalid(name, text, "expected an integer")),
            other => Err(invalid(name, &other.to_string(), "expected an integer")),
        }
    }

    /// Integer parameter that must not be negative
    pub fn get_usize(&self, name: &str) -> CalcResult<usize> {
        let value = self.get_int(name)?;
        usize::try_from(value).map_err(|_| invalid(name, &value.to_string(), "must not be negative"))
    }

    pub fn get_float(&self, name: &str) -> CalcResult<f64> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v as f64),
            ParamValue::Float(v) => Ok(*v),
            ParamValue::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| invalid(name, text, "expected a number")),
            other => Err(invalid(name, &other.to_string(), "expected a number")),
        }
    }

    pub fn get_rates(&self, name: &str) -> CalcResult<&[f64]> {
        match self.require(name)? {
            ParamValue::Rates(values) => Ok(values),
            other => Err(invalid(name, &other.to_string(), "expected a list of rates")),
        }
    }
}

fn invalid(parameter: &str, value: &str, reason: &str) -> CalcError {
    CalcError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
