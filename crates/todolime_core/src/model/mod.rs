//! Task-list domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its wire shape.
//! - Provide the pure filter projection used by task views.
//!
//! # Invariants
//! - Every task is identified by a unique `TaskId` within one snapshot.
//! - Task text is never empty after trimming.

pub mod filter;
pub mod task;
