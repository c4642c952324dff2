//! Admission rules for candidate frames and circles.
//!
//! # Responsibility
//! - Decide whether an untrusted candidate may be written, given a snapshot
//!   of the regions it must coexist with.
//! - Report every failing stage in a stable order when asked to.
//!
//! # Invariants
//! - Stages run in a fixed order: field validity, containment, collision.
//! - Geometric stages only run on a candidate whose fields are valid.
//! - Evaluation is pure: the same candidate and snapshot always yield the
//!   same outcome.

use crate::model::circle::{Circle, CircleId, CircleParams};
use crate::model::frame::{Frame, FrameId, FrameParams};
use crate::model::geometry::{Disk, Rect};
use crate::model::validation::{to_sentence, ValidationErrors};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const OUTSIDE_FRAME_MESSAGE: &str = "must be fully inside frame boundaries";
pub const CIRCLE_COLLISION_MESSAGE: &str = "collides with another existing circle";
pub const FRAME_COLLISION_MESSAGE: &str = "collides with another existing frame";
pub const STRANDED_CIRCLES_MESSAGE: &str = "must keep existing circles inside frame boundaries";

/// One failed admission stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Presence/numericality/positivity problems.
    Invalid(ValidationErrors),
    /// Circle would reach past its frame.
    OutsideFrame,
    /// Circle would touch or overlap a sibling in the same frame.
    CircleCollision,
    /// Frame would touch or overlap another frame.
    FrameCollision,
    /// Resized frame would no longer wrap a circle it owns.
    StrandedCircles,
}

impl Violation {
    pub fn message(&self) -> String {
        match self {
            Self::Invalid(errors) => errors.to_sentence(),
            Self::OutsideFrame => OUTSIDE_FRAME_MESSAGE.to_string(),
            Self::CircleCollision => CIRCLE_COLLISION_MESSAGE.to_string(),
            Self::FrameCollision => FRAME_COLLISION_MESSAGE.to_string(),
            Self::StrandedCircles => STRANDED_CIRCLES_MESSAGE.to_string(),
        }
    }
}

/// Non-empty list of violations explaining why a candidate was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    violations: Vec<Violation>,
}

impl Rejection {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::message).collect()
    }

    /// All messages joined into one sentence, ready for rendering.
    pub fn message(&self) -> String {
        to_sentence(&self.messages())
    }

    pub fn contains(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Record Invalid: {}", self.message())
    }
}

impl Error for Rejection {}

/// How far evaluation proceeds after the first failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Stop at the first failing stage.
    FirstFailure,
    /// Run every stage that can run and record each failure.
    AllReasons,
}

type Stage<'s> = (&'s dyn Fn() -> bool, Violation);

/// Runs `stages` in order; each closure returns `true` when its stage fails.
fn failed_stages(mode: CheckMode, stages: &[Stage<'_>]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (fails, violation) in stages {
        if fails() {
            violations.push(violation.clone());
            if mode == CheckMode::FirstFailure {
                break;
            }
        }
    }
    violations
}

fn conclude<T>(admitted: T, violations: Vec<Violation>) -> Result<T, Rejection> {
    if violations.is_empty() {
        Ok(admitted)
    } else {
        Err(Rejection { violations })
    }
}

fn invalid(errors: ValidationErrors) -> Rejection {
    Rejection {
        violations: vec![Violation::Invalid(errors)],
    }
}

/// Admission of a frame candidate against the other persisted frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameAdmission<'a> {
    candidate: &'a FrameParams,
    frames: &'a [Frame],
    owned_circles: &'a [Circle],
    excluding: Option<FrameId>,
}

impl<'a> FrameAdmission<'a> {
    pub fn new(candidate: &'a FrameParams, frames: &'a [Frame]) -> Self {
        Self {
            candidate,
            frames,
            owned_circles: &[],
            excluding: None,
        }
    }

    /// Skips the frame's own persisted record when re-validating it.
    pub fn excluding(mut self, frame_id: FrameId) -> Self {
        self.excluding = Some(frame_id);
        self
    }

    /// Circles the frame already owns; each must stay wrapped.
    pub fn with_owned_circles(mut self, circles: &'a [Circle]) -> Self {
        self.owned_circles = circles;
        self
    }

    /// Returns the validated rectangle when every stage passes.
    pub fn evaluate(&self, mode: CheckMode) -> Result<Rect, Rejection> {
        let rect = self.candidate.validate().map_err(invalid)?;

        let collides = || {
            self.frames
                .iter()
                .filter(|frame| Some(frame.id) != self.excluding)
                .any(|frame| frame.rect().overlaps(&rect))
        };
        let strands = || {
            self.owned_circles
                .iter()
                .any(|circle| !rect.wraps(&circle.disk()))
        };

        let stages: [Stage<'_>; 2] = [
            (&collides, Violation::FrameCollision),
            (&strands, Violation::StrandedCircles),
        ];
        conclude(rect, failed_stages(mode, &stages))
    }

    pub fn is_invalid(&self) -> bool {
        self.evaluate(CheckMode::FirstFailure).is_err()
    }

    /// Every failing stage; empty when the candidate is admissible.
    pub fn violations(&self) -> Vec<Violation> {
        self.evaluate(CheckMode::AllReasons)
            .err()
            .map(Rejection::into_violations)
            .unwrap_or_default()
    }
}

/// Admission of a circle candidate into its owning frame.
#[derive(Debug, Clone, Copy)]
pub struct CircleAdmission<'a> {
    candidate: &'a CircleParams,
    frame: &'a Frame,
    siblings: &'a [Circle],
    excluding: Option<CircleId>,
}

impl<'a> CircleAdmission<'a> {
    /// `siblings` are the circles currently owned by `frame`.
    pub fn new(candidate: &'a CircleParams, frame: &'a Frame, siblings: &'a [Circle]) -> Self {
        Self {
            candidate,
            frame,
            siblings,
            excluding: None,
        }
    }

    /// Ignores the circle's own persisted record in the collision scan.
    pub fn excluding(mut self, circle_id: CircleId) -> Self {
        self.excluding = Some(circle_id);
        self
    }

    /// Returns the validated disk when every stage passes.
    pub fn evaluate(&self, mode: CheckMode) -> Result<Disk, Rejection> {
        let disk = self.candidate.validate().map_err(invalid)?;

        let outside = || !self.frame.rect().wraps(&disk);
        let collides = || {
            self.siblings
                .iter()
                .filter(|circle| circle.frame_id == self.frame.id)
                .filter(|circle| Some(circle.id) != self.excluding)
                .any(|circle| circle.disk().overlaps(&disk))
        };

        let stages: [Stage<'_>; 2] = [
            (&outside, Violation::OutsideFrame),
            (&collides, Violation::CircleCollision),
        ];
        conclude(disk, failed_stages(mode, &stages))
    }

    pub fn is_invalid(&self) -> bool {
        self.evaluate(CheckMode::FirstFailure).is_err()
    }

    pub fn violations(&self) -> Vec<Violation> {
        self.evaluate(CheckMode::AllReasons)
            .err()
            .map(Rejection::into_violations)
            .unwrap_or_default()
    }
}
