//! Core use-case services.
//!
//! # Responsibility
//! - Turn UI intents into task-list mutations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_store;
