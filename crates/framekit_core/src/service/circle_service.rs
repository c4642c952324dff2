//! Circle use-case service.
//!
//! # Responsibility
//! - Admit new circles into a frame and re-admit patched circles.
//! - Serve filtered circle reads.
//!
//! # Invariants
//! - A circle is written only after containment and collision checks pass
//!   against the same snapshot the write lands in.
//! - Updates never change a circle's owning frame.

use crate::model::circle::{apply_circle_patch, Circle, CircleId, CircleParams, CirclePatch};
use crate::model::filter::CircleFilter;
use crate::model::frame::FrameId;
use crate::repo::circle_repo::CircleRepository;
use crate::repo::frame_repo::FrameRepository;
use crate::repo::store::UnitOfWork;
use crate::service::admission::{CheckMode, CircleAdmission};
use crate::service::error::{ServiceError, ServiceResult};
use log::{debug, info, warn};

/// Circle service facade.
pub struct CircleService<R> {
    repo: R,
}

impl<R> CircleService<R>
where
    R: FrameRepository + CircleRepository + UnitOfWork,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Admits `params` as a new circle of frame `frame_id`.
    pub fn admit_circle_create(
        &self,
        frame_id: FrameId,
        params: &CircleParams,
    ) -> ServiceResult<Circle> {
        let result = self.repo.atomically(|repo| -> ServiceResult<Circle> {
            let frame = repo
                .get_frame(frame_id)?
                .ok_or(ServiceError::FrameNotFound(frame_id))?;
            let siblings = repo.list_circles(Some(frame_id), None)?;

            let disk = CircleAdmission::new(params, &frame, &siblings)
                .evaluate(CheckMode::AllReasons)?;
            let circle = Circle::new(frame_id, disk);
            repo.insert_circle(&circle)?;
            Ok(circle)
        });

        match &result {
            Ok(circle) => info!(
                "event=circle_admit module=service status=ok frame_id={frame_id} circle_id={}",
                circle.id
            ),
            Err(err) => log_failure("circle_admit", &frame_id.to_string(), err),
        }
        result
    }

    /// Applies `patch` to circle `id` once the patched circle is admitted.
    ///
    /// The circle's own persisted record is ignored in the collision scan.
    pub fn admit_circle_update(&self, id: CircleId, patch: &CirclePatch) -> ServiceResult<Circle> {
        let result = self.repo.atomically(|repo| -> ServiceResult<Circle> {
            let current = repo
                .get_circle(id)?
                .ok_or(ServiceError::CircleNotFound(id))?;
            let frame = repo
                .get_frame(current.frame_id)?
                .ok_or(ServiceError::FrameNotFound(current.frame_id))?;
            let candidate = apply_circle_patch(&current, patch);
            let siblings = repo.list_circles(Some(frame.id), Some(id))?;

            let disk = CircleAdmission::new(&candidate, &frame, &siblings)
                .excluding(id)
                .evaluate(CheckMode::AllReasons)?;
            let updated = current.reshaped(disk);
            repo.update_circle(&updated)?;
            Ok(updated)
        });

        match &result {
            Ok(_) => info!("event=circle_update module=service status=ok circle_id={id}"),
            Err(err) => log_failure("circle_update", &id.to_string(), err),
        }
        result
    }

    /// Removes a circle unconditionally once it is found.
    pub fn delete_circle(&self, id: CircleId) -> ServiceResult<()> {
        let result = self
            .repo
            .delete_circle(id)
            .map_err(ServiceError::from);

        match &result {
            Ok(()) => info!("event=circle_delete module=service status=ok circle_id={id}"),
            Err(err) => log_failure("circle_delete", &id.to_string(), err),
        }
        result
    }

    pub fn get_circle(&self, id: CircleId) -> ServiceResult<Circle> {
        self.repo
            .get_circle(id)?
            .ok_or(ServiceError::CircleNotFound(id))
    }

    /// Returns every circle matching all predicates of `filter`.
    pub fn filter_circles(&self, filter: &CircleFilter) -> ServiceResult<Vec<Circle>> {
        let mut circles = self.repo.list_circles(filter.frame_id(), None)?;
        circles.retain(|circle| filter.matches(circle));

        debug!(
            "event=circle_filter module=service status=ok predicates={} matches={}",
            filter.predicates().len(),
            circles.len()
        );
        Ok(circles)
    }
}

fn log_failure(event: &str, subject: &str, err: &ServiceError) {
    match err {
        ServiceError::Rejected(rejection) => warn!(
            "event={event} module=service status=rejected subject={subject} violations={}",
            rejection.violations().len()
        ),
        other => warn!("event={event} module=service status=error subject={subject} error={other}"),
    }
}
