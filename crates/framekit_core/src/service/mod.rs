//! Region use-case services.
//!
//! # Responsibility
//! - Gate every frame/circle write behind admission.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Admission reads and the guarded write share one unit of work.
//! - Expected admission failures come back as `ServiceError::Rejected`,
//!   never as panics.

pub mod admission;
pub mod circle_service;
pub mod error;
pub mod frame_service;
