//! Region domain model.
//!
//! # Responsibility
//! - Define frames, circles and the untrusted inputs they are built from.
//! - Hold the pure geometry every admission decision relies on.
//!
//! # Invariants
//! - Every persisted region is identified by a stable UUID.
//! - Coordinates and sizes are exact decimals.

pub mod circle;
pub mod filter;
pub mod frame;
pub mod geometry;
pub mod validation;
