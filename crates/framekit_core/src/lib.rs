//! Spatial invariant engine for frames and the circles nested in them.
//! This crate is the single source of truth for region admission rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::circle::{apply_circle_patch, Circle, CircleId, CircleParams, CirclePatch};
pub use model::filter::{AreaQuery, CircleFilter, CirclePredicate, FilterKey, UsageError};
pub use model::frame::{
    apply_frame_patch, Frame, FrameId, FrameParams, FramePatch, FrameSummary,
};
pub use model::geometry::{Bounds, Disk, Rect};
pub use model::validation::{Field, FieldError, FieldProblem, ValidationErrors};
pub use repo::circle_repo::CircleRepository;
pub use repo::frame_repo::FrameRepository;
pub use repo::store::{RepoError, RepoResult, SqliteRegionStore, UnitOfWork};
pub use service::admission::{CheckMode, CircleAdmission, FrameAdmission, Rejection, Violation};
pub use service::circle_service::CircleService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::frame_service::FrameService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
