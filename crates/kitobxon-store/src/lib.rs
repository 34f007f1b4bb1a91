//! `PostgreSQL` implementations of the quiz engine's collaborator traits.

mod mapping;
pub mod pg_question_import;
pub mod pg_result_repository;
pub mod pg_user_directory;
pub mod schema;

pub use pg_question_import::PgQuestionImport;
pub use pg_result_repository::PgResultRepository;
pub use pg_user_directory::PgUserDirectory;
