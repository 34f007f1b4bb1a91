//! Kitobxon Core: shared quiz domain model and collaborator abstractions.
//!
//! This crate defines the data model of the timed quiz and the traits every
//! collaborator of the quiz engine implements (user directory, question
//! import, result repository, notifiers, clock, RNG). It contains no
//! infrastructure code.

pub mod command;
pub mod error;
pub mod model;
pub mod notifier;
pub mod repository;
pub mod rng;
pub mod time;
