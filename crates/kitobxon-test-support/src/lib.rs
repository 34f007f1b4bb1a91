//! Shared test mocks and utilities for the Kitobxon quiz engine.

mod clock;
mod fixtures;
mod notifier;
mod repository;
mod rng;

pub use clock::{FixedClock, ManualClock};
pub use fixtures::{profile, question, questions};
pub use notifier::{Notification, RecordingNotifier};
pub use repository::{
    FailingResultRepository, FlakyResultRepository, InMemoryQuestionImport,
    InMemoryUserDirectory, RecordingResultRepository,
};
pub use rng::{MockRng, SequenceRng};
