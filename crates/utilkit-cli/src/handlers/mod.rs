//! Command handlers.
//!
//! Handlers are thin wrappers: validate CLI input, call into `utilkit-os` or
//! `utilkit-timing`, and write results to the given output.

pub mod library;
pub mod shm;
pub mod time;
