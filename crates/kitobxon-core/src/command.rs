//! Command abstractions.

use uuid::Uuid;

use crate::model::UserId;

/// Trait that all quiz commands implement.
///
/// Every command is issued on behalf of exactly one chat user; the
/// correlation ID ties the command to the log lines and notifications it
/// produces.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The user the command was issued by.
    fn user_id(&self) -> UserId;
}
