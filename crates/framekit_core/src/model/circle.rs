//! Circle domain model.
//!
//! # Invariants
//! - `frame_id` is fixed at creation; no patch can move a circle to
//!   another frame.
//! - A persisted circle lies inside its frame and touches no sibling.

use crate::model::frame::{patched, FrameId};
use crate::model::geometry::Disk;
use crate::model::validation::{Field, FieldReader, ValidationErrors};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable circle identifier.
pub type CircleId = Uuid;

/// Persisted circle owned by exactly one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    pub frame_id: FrameId,
    pub center_x: Decimal,
    pub center_y: Decimal,
    pub radius: Decimal,
}

impl Circle {
    pub fn new(frame_id: FrameId, disk: Disk) -> Self {
        Self::with_id(Uuid::new_v4(), frame_id, disk)
    }

    pub fn with_id(id: CircleId, frame_id: FrameId, disk: Disk) -> Self {
        Self {
            id,
            frame_id,
            center_x: disk.center_x,
            center_y: disk.center_y,
            radius: disk.radius,
        }
    }

    pub fn disk(&self) -> Disk {
        Disk::new(self.center_x, self.center_y, self.radius)
    }

    /// Returns a copy carrying `disk` as its geometry; identity is kept.
    pub fn reshaped(&self, disk: Disk) -> Self {
        Self::with_id(self.id, self.frame_id, disk)
    }
}

/// Untrusted circle attributes as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleParams {
    pub center_x: Option<String>,
    pub center_y: Option<String>,
    pub radius: Option<String>,
}

impl CircleParams {
    pub fn new(center_x: impl ToString, center_y: impl ToString, radius: impl ToString) -> Self {
        Self {
            center_x: Some(center_x.to_string()),
            center_y: Some(center_y.to_string()),
            radius: Some(radius.to_string()),
        }
    }

    pub fn validate(&self) -> Result<Disk, ValidationErrors> {
        let mut reader = FieldReader::new();
        let center_x = reader.number(Field::CenterX, self.center_x.as_deref());
        let center_y = reader.number(Field::CenterY, self.center_y.as_deref());
        let radius = reader.positive(Field::Radius, self.radius.as_deref());

        match (center_x, center_y, radius) {
            (Some(center_x), Some(center_y), Some(radius)) => {
                Ok(Disk::new(center_x, center_y, radius))
            }
            _ => Err(reader.into_errors()),
        }
    }
}

/// Partial circle update. `None` keeps the persisted value; a blank string
/// clears it, which then fails validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CirclePatch {
    pub center_x: Option<String>,
    pub center_y: Option<String>,
    pub radius: Option<String>,
}

/// Produces the hypothetical post-update candidate without touching `circle`.
pub fn apply_circle_patch(circle: &Circle, patch: &CirclePatch) -> CircleParams {
    CircleParams {
        center_x: patched(&patch.center_x, circle.center_x),
        center_y: patched(&patch.center_y, circle.center_y),
        radius: patched(&patch.radius, circle.radius),
    }
}
