//! Kitobxon: timed quiz sessions.
//!
//! Draws 25 questions for a reader's age bracket, runs each one against a
//! deadline, arbitrates between the reader's tap and the deadline, scores the
//! finished quiz and hands the result to storage and the notifiers.

pub mod application;
pub mod domain;
