//! Application layer: live sessions, deadlines and completion.

mod arbiter;
pub mod completion;
pub mod engine;
pub mod query_handlers;
pub mod settings;
mod timer;

pub use engine::{AcceptedAnswer, Collaborators, QuizEngine};
pub use settings::QuizSettings;
