//! Form input source.
//!
//! The calculators never look fields up themselves. A presentation layer
//! hands over a [`FormSource`], and the `from_form` constructors here turn
//! its current values into an input struct. Absent, blank, unparseable and
//! NaN values are all reported as [`ValidationError::MissingField`]; nothing
//! is defaulted.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;

use super::types::{fields, EarningsInput, ForwardFactorInput};
use crate::error::ValidationError;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("form must be a JSON object")]
    NotAnObject,

    #[error("unsupported value for field {0}: expected number, string, boolean or null")]
    UnsupportedValue(String),
}

/// Synchronous accessor for the current value of named form fields.
pub trait FormSource {
    /// Raw text of a field, `None` when the field is absent.
    fn value(&self, field: &str) -> Option<&str>;

    /// Checkbox state. Absent checkboxes are unchecked.
    fn is_checked(&self, field: &str) -> bool;
}

/// In-memory snapshot of a form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    values: HashMap<String, String>,
    checked: HashSet<String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set_value(field, value);
        self
    }

    pub fn with_checked(mut self, field: &str) -> Self {
        self.set_checked(field, true);
        self
    }

    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        self.values.insert(field.to_string(), value.into());
    }

    pub fn set_checked(&mut self, field: &str, checked: bool) {
        if checked {
            self.checked.insert(field.to_string());
        } else {
            self.checked.remove(field);
        }
    }

    /// Overlay another snapshot. Its values win, its checked boxes are added.
    pub fn merge(&mut self, other: FormSnapshot) {
        self.values.extend(other.values);
        self.checked.extend(other.checked);
    }

    /// Parse a snapshot from a flat JSON object.
    ///
    /// Numbers and strings become field values, booleans become checkbox
    /// state and `null` leaves the field absent.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        let Value::Object(map) = serde_json::from_str::<Value>(json)? else {
            return Err(FormError::NotAnObject);
        };

        let mut snapshot = Self::new();
        for (field, value) in map {
            match value {
                Value::Null => {}
                Value::Bool(checked) => snapshot.set_checked(&field, checked),
                Value::Number(n) => snapshot.set_value(&field, n.to_string()),
                Value::String(s) => snapshot.set_value(&field, s),
                Value::Array(_) | Value::Object(_) => {
                    return Err(FormError::UnsupportedValue(field));
                }
            }
        }

        Ok(snapshot)
    }
}

impl FormSource for FormSnapshot {
    fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    fn is_checked(&self, field: &str) -> bool {
        self.checked.contains(field)
    }
}

fn present<'a, S: FormSource + ?Sized>(form: &'a S, field: &str) -> Option<&'a str> {
    form.value(field).map(str::trim).filter(|s| !s.is_empty())
}

/// Read a finite number.
pub fn read_number<S: FormSource + ?Sized>(
    form: &S,
    field: &'static str,
) -> Result<f64, ValidationError> {
    present(form, field)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::MissingField(field))
}

/// Read a dollar amount. Plain and scientific notation are accepted.
pub fn read_decimal<S: FormSource + ?Sized>(
    form: &S,
    field: &'static str,
) -> Result<Decimal, ValidationError> {
    present(form, field)
        .and_then(|s| {
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        })
        .ok_or(ValidationError::MissingField(field))
}

pub fn read_text<S: FormSource + ?Sized>(
    form: &S,
    field: &'static str,
) -> Result<String, ValidationError> {
    present(form, field)
        .map(str::to_string)
        .ok_or(ValidationError::MissingField(field))
}

impl ForwardFactorInput {
    /// Read the four term structure fields. Ordering and sign rules are
    /// checked by the engine.
    pub fn from_form<S: FormSource + ?Sized>(form: &S) -> Result<Self, ValidationError> {
        Ok(Self {
            front_dte: read_number(form, fields::FRONT_DTE)?,
            front_iv: read_number(form, fields::FRONT_IV)?,
            back_dte: read_number(form, fields::BACK_DTE)?,
            back_iv: read_number(form, fields::BACK_IV)?,
        })
    }
}

impl EarningsInput {
    pub fn from_form<S: FormSource + ?Sized>(form: &S) -> Result<Self, ValidationError> {
        Ok(Self {
            ticker: read_text(form, fields::TICKER)?.to_uppercase(),
            volume_millions: read_number(form, fields::VOLUME)?,
            front_iv: read_number(form, fields::FRONT_IV)?,
            back_iv: read_number(form, fields::BACK_IV)?,
            expected_move_pct: read_number(form, fields::EXPECTED_MOVE)?,
            historical_move_pct: read_number(form, fields::HISTORICAL_MOVE)?,
            spread_cost: read_decimal(form, fields::SPREAD_COST)?,
            bid_ask_spread: read_decimal(form, fields::BID_ASK)?,
            is_biotech: form.is_checked(fields::IS_BIOTECH),
            is_meme: form.is_checked(fields::IS_MEME),
            had_recent_gap: form.is_checked(fields::RECENT_GAP),
        })
    }
}
