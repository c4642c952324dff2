//! Field-level validation of untrusted numeric input.
//!
//! # Responsibility
//! - Turn raw textual coordinates and sizes into exact decimals.
//! - Report presence, numericality, positivity and range problems per field.
//!
//! # Invariants
//! - No edge is computed from a field that failed validation.
//! - Accepted values are rounded to [`STORED_SCALE`] decimal places.
//! - Accepted magnitudes stay below [`MAGNITUDE_LIMIT`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Decimal places kept for persisted coordinates and sizes.
pub const STORED_SCALE: u32 = 4;

/// Exclusive bound on the absolute value of any accepted number.
pub const MAGNITUDE_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid numeric regex")
});

/// Validated numeric attribute of a frame or circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CenterX,
    CenterY,
    Width,
    Height,
    Radius,
}

impl Field {
    /// Attribute name as used in parameters and storage.
    pub fn name(self) -> &'static str {
        match self {
            Self::CenterX => "center_x",
            Self::CenterY => "center_y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Radius => "radius",
        }
    }

    /// Human label used as the prefix of full messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::CenterX => "Center x",
            Self::CenterY => "Center y",
            Self::Width => "Width",
            Self::Height => "Height",
            Self::Radius => "Radius",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldProblem {
    Blank,
    NotANumber,
    NotPositive,
    OutOfRange,
}

impl FieldProblem {
    fn message(self) -> &'static str {
        match self {
            Self::Blank => "can't be blank",
            Self::NotANumber => "is not a number",
            Self::NotPositive => "must be greater than 0",
            Self::OutOfRange => "is out of range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub problem: FieldProblem,
}

impl FieldError {
    /// Message prefixed with the field label, e.g. `Radius is not a number`.
    pub fn full_message(&self) -> String {
        format!("{} {}", self.field.label(), self.problem.message())
    }
}

/// Non-empty set of field problems for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_problem(&self, field: Field, problem: FieldProblem) -> bool {
        self.errors
            .iter()
            .any(|error| error.field == field && error.problem == problem)
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::full_message).collect()
    }

    /// All full messages joined into one English sentence.
    pub fn to_sentence(&self) -> String {
        to_sentence(&self.full_messages())
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_sentence())
    }
}

impl Error for ValidationErrors {}

/// Joins items as `a`, `a and b`, or `a, b, and c`.
pub fn to_sentence<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|item| item.as_ref())
                .collect::<Vec<&str>>()
                .join(", ");
            format!("{head}, and {}", last.as_ref())
        }
    }
}

/// Accumulates field problems while reading one candidate.
#[derive(Debug, Default)]
pub(crate) struct FieldReader {
    errors: Vec<FieldError>,
}

impl FieldReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reads any finite decimal in range.
    pub(crate) fn number(&mut self, field: Field, raw: Option<&str>) -> Option<Decimal> {
        let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            self.push(field, FieldProblem::Blank);
            self.push(field, FieldProblem::NotANumber);
            return None;
        };

        match read_decimal(text) {
            Ok(value) => Some(value),
            Err(problem) => {
                self.push(field, problem);
                None
            }
        }
    }

    /// Reads a decimal that must be strictly greater than zero once stored.
    pub(crate) fn positive(&mut self, field: Field, raw: Option<&str>) -> Option<Decimal> {
        let value = self.number(field, raw)?;
        if value <= Decimal::ZERO {
            self.push(field, FieldProblem::NotPositive);
            return None;
        }
        Some(value)
    }

    /// Callers only reach this after a read returned `None`, so the list is
    /// never empty.
    pub(crate) fn into_errors(self) -> ValidationErrors {
        ValidationErrors {
            errors: self.errors,
        }
    }

    fn push(&mut self, field: Field, problem: FieldProblem) {
        self.errors.push(FieldError { field, problem });
    }
}

/// Parses plain (`12.5`) or scientific (`1.25e1`) text into a stored value.
///
/// Text shaped like a number that `Decimal` cannot hold is out of range,
/// not "not a number".
pub(crate) fn read_decimal(text: &str) -> Result<Decimal, FieldProblem> {
    match Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        Ok(value) => bounded(value),
        Err(_) if NUMERIC_RE.is_match(text) => Err(FieldProblem::OutOfRange),
        Err(_) => Err(FieldProblem::NotANumber),
    }
}

/// Applies the magnitude limit and rounds to [`STORED_SCALE`].
pub(crate) fn bounded(value: Decimal) -> Result<Decimal, FieldProblem> {
    if value.abs() >= MAGNITUDE_LIMIT {
        return Err(FieldProblem::OutOfRange);
    }
    Ok(value.round_dp_with_strategy(STORED_SCALE, RoundingStrategy::MidpointAwayFromZero))
}
