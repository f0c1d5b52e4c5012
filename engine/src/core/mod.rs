//! Engine plumbing shared by every subsystem.

pub mod log;
