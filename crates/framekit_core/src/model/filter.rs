//! Read-side circle filtering.
//!
//! # Responsibility
//! - Map a closed set of filter keys to typed circle predicates.
//! - Reject unknown keys and incomplete area queries up front.
//!
//! # Invariants
//! - Predicates compose with logical AND; an empty filter matches every
//!   circle.
//! - An area query always carries center and radius together.

use crate::model::circle::Circle;
use crate::model::frame::FrameId;
use crate::model::geometry::Disk;
use crate::model::validation::{bounded, read_decimal, FieldProblem};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Filter keys accepted by [`CircleFilter::from_pairs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    FrameId,
    CenterX,
    CenterY,
    Radius,
}

impl FilterKey {
    pub const ALL: [FilterKey; 4] = [
        FilterKey::FrameId,
        FilterKey::CenterX,
        FilterKey::CenterY,
        FilterKey::Radius,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FrameId => "frame_id",
            Self::CenterX => "center_x",
            Self::CenterY => "center_y",
            Self::Radius => "radius",
        }
    }
}

impl FromStr for FilterKey {
    type Err = UsageError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| UsageError::UnknownFilter(value.to_string()))
    }
}

/// Caller contract violations on the read path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Filter key outside [`FilterKey::ALL`].
    UnknownFilter(String),
    /// Some but not all of `center_x`, `center_y`, `radius` were given.
    PartialArea { missing: Vec<&'static str> },
    /// Value that cannot be read for its key.
    InvalidFilterValue { key: &'static str, value: String },
    /// Numeric value whose magnitude is at or beyond the accepted limit.
    FilterValueOutOfRange { key: &'static str, value: String },
}

impl Display for UsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFilter(key) => write!(f, "unknown filter `{key}`"),
            Self::PartialArea { missing } => write!(
                f,
                "Missing parameters: center_x, center_y and radius are required for area filter (missing {})",
                missing.join(", ")
            ),
            Self::InvalidFilterValue { key, value } => {
                write!(f, "invalid value `{value}` for filter `{key}`")
            }
            Self::FilterValueOutOfRange { key, value } => {
                write!(f, "value `{value}` for filter `{key}` is out of range")
            }
        }
    }
}

impl Error for UsageError {}

/// Query disk of the area filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaQuery {
    area: Disk,
}

impl AreaQuery {
    /// Builds a query from decimals, applying the same range limit and
    /// rounding as stored coordinates.
    pub fn new(
        center_x: Decimal,
        center_y: Decimal,
        radius: Decimal,
    ) -> Result<Self, UsageError> {
        let center_x = checked_value(FilterKey::CenterX, center_x)?;
        let center_y = checked_value(FilterKey::CenterY, center_y)?;
        let radius = checked_value(FilterKey::Radius, radius)?;
        Ok(Self {
            area: Disk::new(center_x, center_y, radius),
        })
    }

    /// Builds a query from optional raw values; blank values count as absent.
    ///
    /// Returns `Ok(None)` when all three are absent.
    pub fn from_raw(
        center_x: Option<&str>,
        center_y: Option<&str>,
        radius: Option<&str>,
    ) -> Result<Option<Self>, UsageError> {
        let values = [
            (FilterKey::CenterX, present(center_x)),
            (FilterKey::CenterY, present(center_y)),
            (FilterKey::Radius, present(radius)),
        ];

        let missing = values
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>();
        if missing.len() == values.len() {
            return Ok(None);
        }
        if !missing.is_empty() {
            return Err(UsageError::PartialArea { missing });
        }

        let mut parsed = [Decimal::ZERO; 3];
        for (slot, (key, value)) in parsed.iter_mut().zip(values) {
            let text = value.unwrap_or_default();
            *slot = read_decimal(text).map_err(|problem| value_error(key, text, problem))?;
        }

        let [center_x, center_y, radius] = parsed;
        Self::new(center_x, center_y, radius).map(Some)
    }

    pub fn disk(&self) -> Disk {
        self.area
    }

    pub fn contains(&self, circle: &Circle) -> bool {
        circle.disk().lies_within(&self.area)
    }
}

/// One typed predicate over persisted circles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CirclePredicate {
    FrameId(FrameId),
    Area(AreaQuery),
}

impl CirclePredicate {
    pub fn matches(&self, circle: &Circle) -> bool {
        match self {
            Self::FrameId(frame_id) => circle.frame_id == *frame_id,
            Self::Area(area) => area.contains(circle),
        }
    }
}

/// Conjunction of circle predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircleFilter {
    predicates: Vec<CirclePredicate>,
}

impl CircleFilter {
    /// Filter matching every circle.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_frame_id(mut self, frame_id: FrameId) -> Self {
        self.predicates.push(CirclePredicate::FrameId(frame_id));
        self
    }

    pub fn with_area(mut self, area: AreaQuery) -> Self {
        self.predicates.push(CirclePredicate::Area(area));
        self
    }

    /// Parses `key=value` style filter input.
    ///
    /// Blank values are dropped before interpretation. Area keys are
    /// collected and must end up complete or entirely absent.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut frame_id = None;
        let mut center_x = None;
        let mut center_y = None;
        let mut radius = None;

        for (key, value) in pairs {
            let key = key.as_ref().parse::<FilterKey>()?;
            let Some(value) = present(Some(value.as_ref())) else {
                continue;
            };
            match key {
                FilterKey::FrameId => {
                    let id = Uuid::parse_str(value).map_err(|_| {
                        UsageError::InvalidFilterValue {
                            key: key.as_str(),
                            value: value.to_string(),
                        }
                    })?;
                    frame_id = Some(id);
                }
                FilterKey::CenterX => center_x = Some(value.to_string()),
                FilterKey::CenterY => center_y = Some(value.to_string()),
                FilterKey::Radius => radius = Some(value.to_string()),
            }
        }

        let mut filter = Self::all();
        if let Some(frame_id) = frame_id {
            filter = filter.with_frame_id(frame_id);
        }
        if let Some(area) = AreaQuery::from_raw(
            center_x.as_deref(),
            center_y.as_deref(),
            radius.as_deref(),
        )? {
            filter = filter.with_area(area);
        }
        Ok(filter)
    }

    pub fn predicates(&self) -> &[CirclePredicate] {
        &self.predicates
    }

    /// First frame restriction, used to narrow storage reads.
    pub fn frame_id(&self) -> Option<FrameId> {
        self.predicates.iter().find_map(|predicate| match predicate {
            CirclePredicate::FrameId(frame_id) => Some(*frame_id),
            CirclePredicate::Area(_) => None,
        })
    }

    pub fn matches(&self, circle: &Circle) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(circle))
    }
}

fn checked_value(key: FilterKey, value: Decimal) -> Result<Decimal, UsageError> {
    bounded(value).map_err(|problem| value_error(key, &value.to_string(), problem))
}

fn value_error(key: FilterKey, text: &str, problem: FieldProblem) -> UsageError {
    let key = key.as_str();
    let value = text.to_string();
    match problem {
        FieldProblem::OutOfRange => UsageError::FilterValueOutOfRange { key, value },
        _ => UsageError::InvalidFilterValue { key, value },
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
