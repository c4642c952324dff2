//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the store capabilities admission services consume.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Repositories never validate geometry; admission is the only gate.
//! - Read-then-write sequences run inside [`store::UnitOfWork::atomically`].

pub mod circle_repo;
pub mod frame_repo;
pub mod store;
