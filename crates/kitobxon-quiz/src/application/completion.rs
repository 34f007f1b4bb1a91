//! Best-effort delivery of a persisted result.
//!
//! Runs after the result is saved. Each delivery is independent: a failure
//! is logged with its recipient and the remaining deliveries still happen.

use kitobxon_core::model::{QuizResult, UserId};
use kitobxon_core::notifier::{AdminNotifier, UserNotifier};
use kitobxon_core::repository::UserDirectory;
use tracing::{info, warn};

/// What [`announce_result`] managed to deliver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Announcement {
    /// Whether the reader received their summary.
    pub reader_notified: bool,
    /// Administrators that received the summary.
    pub admins_notified: Vec<UserId>,
    /// Administrators whose delivery failed.
    pub admins_failed: Vec<UserId>,
}

/// Sends the summary of `result` to its reader, then to every administrator.
pub async fn announce_result(
    result: &QuizResult,
    directory: &dyn UserDirectory,
    user_notifier: &dyn UserNotifier,
    admin_notifier: &dyn AdminNotifier,
) -> Announcement {
    let mut announcement = Announcement::default();

    match user_notifier.send_summary(result).await {
        Ok(()) => announcement.reader_notified = true,
        Err(error) => warn!(
            user_id = %result.user_id,
            result_id = %result.result_id,
            %error,
            "failed to send quiz summary to reader"
        ),
    }

    let admins = match directory.admin_ids().await {
        Ok(admins) => admins,
        Err(error) => {
            warn!(result_id = %result.result_id, %error, "failed to load admin ids");
            return announcement;
        }
    };

    for admin_id in admins {
        match admin_notifier.send_admin_summary(admin_id, result).await {
            Ok(()) => announcement.admins_notified.push(admin_id),
            Err(error) => {
                warn!(
                    %admin_id,
                    result_id = %result.result_id,
                    %error,
                    "failed to send quiz summary to admin"
                );
                announcement.admins_failed.push(admin_id);
            }
        }
    }

    info!(
        result_id = %result.result_id,
        reader_notified = announcement.reader_notified,
        admins_notified = announcement.admins_notified.len(),
        admins_failed = announcement.admins_failed.len(),
        "quiz result announced"
    );
    announcement
}
