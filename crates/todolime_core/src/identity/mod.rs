//! Identity gate contract and local provider.
//!
//! # Responsibility
//! - Describe the hosted auth boundary the app depends on.
//! - Provide an in-process provider so sessions can run without a network.
//!
//! # Invariants
//! - Provider errors carry a message suitable for direct display.
//! - Task data never flows through this module.

pub mod gate;
pub mod local;
