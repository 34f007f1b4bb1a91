//! Quiz domain: pure state and rules, no I/O.

pub mod bank;
pub mod commands;
pub mod error;
pub mod scoring;
pub mod session;
