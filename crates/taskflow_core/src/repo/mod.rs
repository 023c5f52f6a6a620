//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for tasks.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Date queries match the normalized key exactly, never by prefix.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors; storage failure is never masked by a success value.

pub mod task_repo;
