//! Frame domain model.
//!
//! # Responsibility
//! - Define the persisted rectangular region and its untrusted inputs.
//! - Build the read projection exposing a frame's extreme circles.
//!
//! # Invariants
//! - Persisted frames have `width > 0` and `height > 0`.
//! - Persisted frame rectangles never overlap, touching edges included.
//! - A frame is never removed while circles still reference it.

use crate::model::circle::Circle;
use crate::model::geometry::Rect;
use crate::model::validation::{Field, FieldReader, ValidationErrors};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable frame identifier.
pub type FrameId = Uuid;

/// Persisted axis-aligned frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub center_x: Decimal,
    pub center_y: Decimal,
    pub width: Decimal,
    pub height: Decimal,
}

impl Frame {
    /// Creates a frame with a fresh id from an already validated rectangle.
    pub fn new(rect: Rect) -> Self {
        Self::with_id(Uuid::new_v4(), rect)
    }

    pub fn with_id(id: FrameId, rect: Rect) -> Self {
        Self {
            id,
            center_x: rect.center_x,
            center_y: rect.center_y,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.center_x, self.center_y, self.width, self.height)
    }
}

/// Untrusted frame attributes as received from a caller.
///
/// `None` and blank strings are both treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameParams {
    pub center_x: Option<String>,
    pub center_y: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

impl FrameParams {
    pub fn new(
        center_x: impl ToString,
        center_y: impl ToString,
        width: impl ToString,
        height: impl ToString,
    ) -> Self {
        Self {
            center_x: Some(center_x.to_string()),
            center_y: Some(center_y.to_string()),
            width: Some(width.to_string()),
            height: Some(height.to_string()),
        }
    }

    /// Checks presence, numericality and positivity of every attribute.
    pub fn validate(&self) -> Result<Rect, ValidationErrors> {
        let mut reader = FieldReader::new();
        let center_x = reader.number(Field::CenterX, self.center_x.as_deref());
        let center_y = reader.number(Field::CenterY, self.center_y.as_deref());
        let height = reader.positive(Field::Height, self.height.as_deref());
        let width = reader.positive(Field::Width, self.width.as_deref());

        match (center_x, center_y, width, height) {
            (Some(center_x), Some(center_y), Some(width), Some(height)) => {
                Ok(Rect::new(center_x, center_y, width, height))
            }
            _ => Err(reader.into_errors()),
        }
    }
}

/// Partial frame update. `None` keeps the persisted value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePatch {
    pub center_x: Option<String>,
    pub center_y: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Produces the hypothetical post-update candidate without touching `frame`.
pub fn apply_frame_patch(frame: &Frame, patch: &FramePatch) -> FrameParams {
    FrameParams {
        center_x: patched(&patch.center_x, frame.center_x),
        center_y: patched(&patch.center_y, frame.center_y),
        width: patched(&patch.width, frame.width),
        height: patched(&patch.height, frame.height),
    }
}

pub(crate) fn patched(value: &Option<String>, current: Decimal) -> Option<String> {
    Some(value.clone().unwrap_or_else(|| current.to_string()))
}

/// Frame read model with its owned-circle projections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    #[serde(flatten)]
    pub frame: Frame,
    pub circles_count: usize,
    pub highest_circle: Option<Circle>,
    pub lowest_circle: Option<Circle>,
    pub leftmost_circle: Option<Circle>,
    pub rightmost_circle: Option<Circle>,
}

impl FrameSummary {
    /// Builds the projection from every circle the frame owns.
    ///
    /// On ties the circle listed first wins.
    pub fn from_circles(frame: Frame, circles: &[Circle]) -> Self {
        Self {
            frame,
            circles_count: circles.len(),
            highest_circle: extreme(circles, |a, b| a.center_y > b.center_y),
            lowest_circle: extreme(circles, |a, b| a.center_y < b.center_y),
            leftmost_circle: extreme(circles, |a, b| a.center_x < b.center_x),
            rightmost_circle: extreme(circles, |a, b| a.center_x > b.center_x),
        }
    }
}

fn extreme<F>(circles: &[Circle], beats: F) -> Option<Circle>
where
    F: Fn(&Circle, &Circle) -> bool,
{
    circles
        .iter()
        .fold(None::<&Circle>, |best, circle| match best {
            Some(current) if !beats(circle, current) => Some(current),
            _ => Some(circle),
        })
        .cloned()
}
