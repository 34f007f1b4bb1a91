//! The per-session actor.
//!
//! Every live session is owned by one task draining an unbounded mailbox.
//! Reader taps, deadline expiries, progress queries and completion retries
//! all arrive as messages, so they are applied one at a time and the
//! cursor guard in [`QuizSession::resolve`] decides every tap/deadline race.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use kitobxon_core::error::DomainError;
use kitobxon_core::model::{OptionTag, QuizResult};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::completion::announce_result;
use super::engine::{AcceptedAnswer, EngineContext};
use crate::domain::error::QuizError;
use crate::domain::scoring::build_result;
use crate::domain::session::{QuizSession, Resolution, SessionView};

pub(crate) type Reply<T> = oneshot::Sender<Result<T, QuizError>>;

/// Longest wait for a caller to show answer feedback before the next
/// question goes out. Covers a slow Bot API round trip.
const FEEDBACK_GRACE: Duration = Duration::from_secs(15);

#[derive(Debug)]
pub(crate) enum SessionMessage {
    Answer {
        cursor: usize,
        option: OptionTag,
        reply: Reply<AcceptedAnswer>,
    },
    DeadlineElapsed {
        cursor: usize,
    },
    Progress {
        reply: oneshot::Sender<SessionView>,
    },
    RetryCompletion {
        reply: Reply<QuizResult>,
    },
}

/// Registry entry of a live session.
#[derive(Debug, Clone)]
pub(crate) struct SessionHandle {
    pub(crate) session_id: Uuid,
    mailbox: UnboundedSender<SessionMessage>,
}

impl SessionHandle {
    /// Posts `message`; gives it back if the actor is gone.
    pub(crate) fn send(&self, message: SessionMessage) -> Result<(), SessionMessage> {
        self.mailbox.send(message).map_err(|rejected| rejected.0)
    }

    /// Returns `true` once the actor has stopped.
    pub(crate) fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }
}

pub(crate) struct SessionActor {
    session: QuizSession,
    mailbox: UnboundedReceiver<SessionMessage>,
    sender: UnboundedSender<SessionMessage>,
    unsaved: Option<QuizResult>,
    context: Arc<EngineContext>,
}

impl SessionActor {
    pub(crate) fn new(session: QuizSession, context: Arc<EngineContext>) -> (Self, SessionHandle) {
        let (sender, mailbox) = mpsc::unbounded_channel();
        let handle = SessionHandle {
            session_id: session.id(),
            mailbox: sender.clone(),
        };
        let actor = Self {
            session,
            mailbox,
            sender,
            unsaved: None,
            context,
        };
        (actor, handle)
    }

    pub(crate) async fn run(mut self) {
        let session_id = self.session.id();
        let user_id = self.session.user_id();

        self.dispatch_current().await;
        while let Some(message) = self.mailbox.recv().await {
            if self.handle(message).await.is_break() {
                break;
            }
        }
        debug!(%session_id, %user_id, "session actor stopped");
    }

    async fn handle(&mut self, message: SessionMessage) -> ControlFlow<()> {
        match message {
            SessionMessage::Answer {
                cursor,
                option,
                reply,
            } => self.on_answer(cursor, option, reply).await,
            SessionMessage::DeadlineElapsed { cursor } => self.on_deadline(cursor).await,
            SessionMessage::Progress { reply } => {
                if reply.send(self.session.view()).is_err() {
                    debug!(session_id = %self.session.id(), "progress caller went away");
                }
                ControlFlow::Continue(())
            }
            SessionMessage::RetryCompletion { reply } => self.on_retry(reply).await,
        }
    }

    async fn on_answer(
        &mut self,
        cursor: usize,
        option: OptionTag,
        reply: Reply<AcceptedAnswer>,
    ) -> ControlFlow<()> {
        let session_id = self.session.id();
        let Some(resolved) = self.session.resolve(cursor, Resolution::Answered(option)) else {
            debug!(
                %session_id,
                cursor,
                current = self.session.cursor(),
                "answer rejected"
            );
            let rejected = Err(QuizError::AnswerRejected {
                question_number: cursor,
            });
            if reply.send(rejected).is_err() {
                debug!(%session_id, cursor, "answer caller went away");
            }
            return ControlFlow::Continue(());
        };

        info!(
            %session_id,
            user_id = %self.session.user_id(),
            cursor,
            %option,
            correct = resolved.record.correct,
            "answer accepted"
        );
        // The next question waits until the caller has shown the feedback.
        let (released, feedback_shown) = oneshot::channel();
        let accepted = AcceptedAnswer::new(resolved.outcome(), released);
        if reply.send(Ok(accepted)).is_err() {
            debug!(%session_id, cursor, "answer caller went away");
        }
        if tokio::time::timeout(FEEDBACK_GRACE, feedback_shown)
            .await
            .is_err()
        {
            warn!(%session_id, cursor, "answer feedback not released in time");
        }
        self.advance().await
    }

    async fn on_deadline(&mut self, cursor: usize) -> ControlFlow<()> {
        let session_id = self.session.id();
        let user_id = self.session.user_id();
        let Some(resolved) = self.session.resolve(cursor, Resolution::TimedOut) else {
            debug!(%session_id, cursor, "stale deadline ignored");
            return ControlFlow::Continue(());
        };

        info!(%session_id, %user_id, cursor, "question timed out");
        if let Err(error) = self
            .context
            .user_notifier
            .send_time_up(user_id, resolved.number)
            .await
        {
            warn!(%session_id, %user_id, cursor, %error, "failed to send time-up notice");
        }
        self.advance().await
    }

    async fn on_retry(&mut self, reply: Reply<QuizResult>) -> ControlFlow<()> {
        let Some(result) = self.unsaved.clone() else {
            let unfinished = Err(QuizError::Domain(DomainError::Validation(format!(
                "quiz {} still has unanswered questions",
                self.session.id()
            ))));
            if reply.send(unfinished).is_err() {
                debug!(session_id = %self.session.id(), "retry caller went away");
            }
            return ControlFlow::Continue(());
        };

        // The retry caller reports a repeated failure itself.
        let outcome = self.complete(result, false).await;
        let flow = if outcome.is_ok() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        };
        if reply.send(outcome).is_err() {
            debug!(session_id = %self.session.id(), "retry caller went away");
        }
        flow
    }

    async fn advance(&mut self) -> ControlFlow<()> {
        if !self.session.is_finished() {
            self.dispatch_current().await;
            return ControlFlow::Continue(());
        }

        let result = build_result(&self.session, Uuid::new_v4(), self.context.clock.now());
        self.session.begin_completing();
        match self.complete(result, true).await {
            Ok(_) => ControlFlow::Break(()),
            Err(_) => ControlFlow::Continue(()),
        }
    }

    async fn dispatch_current(&self) {
        let Some(dispatch) = self.session.dispatch(self.context.timer.limit()) else {
            return;
        };
        if let Err(error) = self.context.user_notifier.send_question(&dispatch).await {
            warn!(
                session_id = %dispatch.session_id,
                user_id = %dispatch.user_id,
                cursor = dispatch.number,
                %error,
                "failed to send question"
            );
        }
        // Armed even when the send failed, so an unreachable reader still
        // progresses by timeouts.
        self.context
            .timer
            .arm(self.sender.clone(), dispatch.session_id, dispatch.number);
    }

    /// Persists `result`; on success unregisters the session and announces
    /// the result. On failure the result is kept for a retry, and the reader
    /// is told so when `notify_failure` is set.
    async fn complete(
        &mut self,
        result: QuizResult,
        notify_failure: bool,
    ) -> Result<QuizResult, QuizError> {
        let session_id = self.session.id();
        let user_id = self.session.user_id();

        if let Err(error) = self.context.results.persist_result(&result).await {
            error!(
                %session_id,
                %user_id,
                result_id = %result.result_id,
                %error,
                "failed to persist quiz result"
            );
            self.unsaved = Some(result);
            if notify_failure {
                self.send_completion_failed().await;
            }
            return Err(QuizError::ResultNotPersisted(error));
        }

        self.unsaved = None;
        self.context
            .sessions
            .remove_if(&user_id, |_, handle| handle.session_id == session_id);
        info!(
            %session_id,
            %user_id,
            result_id = %result.result_id,
            score = result.score,
            percentage = result.percentage,
            elapsed = %result.elapsed_display(),
            "quiz completed"
        );

        announce_result(
            &result,
            self.context.directory.as_ref(),
            self.context.user_notifier.as_ref(),
            self.context.admin_notifier.as_ref(),
        )
        .await;
        Ok(result)
    }

    async fn send_completion_failed(&self) {
        let user_id = self.session.user_id();
        if let Err(error) = self.context.user_notifier.send_completion_failed(user_id).await {
            warn!(
                session_id = %self.session.id(),
                %user_id,
                %error,
                "failed to send completion failure notice"
            );
        }
    }
}
