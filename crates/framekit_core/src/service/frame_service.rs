//! Frame use-case service.
//!
//! # Responsibility
//! - Admit new frames and re-admit patched ones.
//! - Refuse deletion of frames that still own circles.
//! - Serve frame read models with their circle projections.
//!
//! # Invariants
//! - No two persisted frames touch or overlap.
//! - An update never leaves an owned circle outside its frame.

use crate::model::circle::Circle;
use crate::model::frame::{
    apply_frame_patch, Frame, FrameId, FrameParams, FramePatch, FrameSummary,
};
use crate::repo::circle_repo::CircleRepository;
use crate::repo::frame_repo::FrameRepository;
use crate::repo::store::UnitOfWork;
use crate::service::admission::{CheckMode, FrameAdmission};
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::HashMap;

/// Frame service facade.
pub struct FrameService<R> {
    repo: R,
}

impl<R> FrameService<R>
where
    R: FrameRepository + CircleRepository + UnitOfWork,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates `params`, checks it against every persisted frame and
    /// inserts it when admitted.
    pub fn admit_frame(&self, params: &FrameParams) -> ServiceResult<Frame> {
        let result = self.repo.atomically(|repo| -> ServiceResult<Frame> {
            let frames = repo.list_frames(None)?;
            let rect = FrameAdmission::new(params, &frames).evaluate(CheckMode::AllReasons)?;
            let frame = Frame::new(rect);
            repo.insert_frame(&frame)?;
            Ok(frame)
        });

        match &result {
            Ok(frame) => info!(
                "event=frame_admit module=service status=ok frame_id={}",
                frame.id
            ),
            Err(err) => log_failure("frame_admit", None, err),
        }
        result
    }

    /// Applies `patch` after re-running admission on the patched frame.
    ///
    /// The patched rectangle must not collide with any other frame and must
    /// still wrap every circle the frame owns.
    pub fn update_frame(&self, id: FrameId, patch: &FramePatch) -> ServiceResult<Frame> {
        let result = self.repo.atomically(|repo| -> ServiceResult<Frame> {
            let current = repo
                .get_frame(id)?
                .ok_or(ServiceError::FrameNotFound(id))?;
            let candidate = apply_frame_patch(&current, patch);
            let others = repo.list_frames(Some(id))?;
            let owned = repo.list_circles(Some(id), None)?;

            let rect = FrameAdmission::new(&candidate, &others)
                .excluding(id)
                .with_owned_circles(&owned)
                .evaluate(CheckMode::AllReasons)?;
            let updated = Frame::with_id(id, rect);
            repo.update_frame(&updated)?;
            Ok(updated)
        });

        match &result {
            Ok(_) => info!("event=frame_update module=service status=ok frame_id={id}"),
            Err(err) => log_failure("frame_update", Some(id), err),
        }
        result
    }

    /// Deletes a frame that owns no circles.
    pub fn delete_frame(&self, id: FrameId) -> ServiceResult<()> {
        let result = self.repo.atomically(|repo| -> ServiceResult<()> {
            if repo.get_frame(id)?.is_none() {
                return Err(ServiceError::FrameNotFound(id));
            }
            if repo.count_circles(id)? > 0 {
                return Err(ServiceError::FrameInUse(id));
            }
            repo.delete_frame(id)?;
            Ok(())
        });

        match &result {
            Ok(()) => info!("event=frame_delete module=service status=ok frame_id={id}"),
            Err(err) => log_failure("frame_delete", Some(id), err),
        }
        result
    }

    /// Reads the frame and its circles from one snapshot.
    pub fn get_frame(&self, id: FrameId) -> ServiceResult<FrameSummary> {
        self.repo.snapshot(|repo| -> ServiceResult<FrameSummary> {
            let frame = repo
                .get_frame(id)?
                .ok_or(ServiceError::FrameNotFound(id))?;
            let circles = repo.list_circles(Some(id), None)?;
            Ok(FrameSummary::from_circles(frame, &circles))
        })
    }

    /// Lists every frame in insertion order.
    pub fn list_frames(&self) -> ServiceResult<Vec<FrameSummary>> {
        self.repo.snapshot(|repo| -> ServiceResult<Vec<FrameSummary>> {
            let frames = repo.list_frames(None)?;
            let mut owned: HashMap<FrameId, Vec<Circle>> = HashMap::new();
            for circle in repo.list_circles(None, None)? {
                owned.entry(circle.frame_id).or_default().push(circle);
            }

            Ok(frames
                .into_iter()
                .map(|frame| {
                    let circles = owned.remove(&frame.id).unwrap_or_default();
                    FrameSummary::from_circles(frame, &circles)
                })
                .collect())
        })
    }
}

fn log_failure(event: &str, frame_id: Option<FrameId>, err: &ServiceError) {
    let frame_id = frame_id.map_or_else(|| "-".to_string(), |id| id.to_string());
    match err {
        ServiceError::Rejected(rejection) => warn!(
            "event={event} module=service status=rejected frame_id={frame_id} violations={}",
            rejection.violations().len()
        ),
        other => warn!(
            "event={event} module=service status=error frame_id={frame_id} error={other}"
        ),
    }
}
