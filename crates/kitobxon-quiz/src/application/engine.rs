//! The quiz engine: entry point for starting quizzes, submitting answers and
//! completing finished quizzes.
//!
//! Live sessions are kept in a concurrent map keyed by reader. An entry is
//! inserted atomically on start and removed by the session itself once its
//! result is persisted.

use std::fmt;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kitobxon_core::error::DomainError;
use kitobxon_core::model::{AnswerOutcome, QUESTIONS_PER_QUIZ, QuestionDispatch, QuizResult, UserId};
use kitobxon_core::notifier::{AdminNotifier, UserNotifier};
use kitobxon_core::repository::{QuestionImport, ResultRepository, UserDirectory};
use kitobxon_core::rng::DeterministicRng;
use kitobxon_core::time::Clock;
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::arbiter::{SessionActor, SessionHandle, SessionMessage};
use super::query_handlers;
use super::settings::QuizSettings;
use super::timer::DeadlineTimer;
use crate::domain::bank::QuestionBank;
use crate::domain::commands::{RetryCompletion, StartQuiz, SubmitAnswer};
use crate::domain::error::QuizError;
use crate::domain::session::{QuizSession, SessionView};

/// A tap that resolved its question.
///
/// The session holds its next question back until this is released, either
/// by [`AcceptedAnswer::release`] or by dropping it, so a caller can show the
/// reader the feedback first.
#[derive(Debug)]
#[must_use = "the next question is sent once this is released"]
pub struct AcceptedAnswer {
    outcome: AnswerOutcome,
    // Dropping the sender is the release signal.
    _released: oneshot::Sender<()>,
}

impl AcceptedAnswer {
    pub(crate) fn new(outcome: AnswerOutcome, released: oneshot::Sender<()>) -> Self {
        Self {
            outcome,
            _released: released,
        }
    }

    /// Feedback for the reader.
    #[must_use]
    pub fn outcome(&self) -> AnswerOutcome {
        self.outcome
    }

    /// Lets the session move on to its next question.
    pub fn release(self) -> AnswerOutcome {
        self.outcome
    }
}

/// External collaborators of the engine.
#[derive(Clone)]
pub struct Collaborators {
    /// Registered readers and administrators.
    pub directory: Arc<dyn UserDirectory>,
    /// Imported question bank.
    pub questions: Arc<dyn QuestionImport>,
    /// Result storage.
    pub results: Arc<dyn ResultRepository>,
    /// Messages to readers.
    pub user_notifier: Arc<dyn UserNotifier>,
    /// Messages to administrators.
    pub admin_notifier: Arc<dyn AdminNotifier>,
    /// Source of start and completion timestamps.
    pub clock: Arc<dyn Clock>,
    /// Random source for question draws.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
}

pub(crate) struct EngineContext {
    pub(crate) directory: Arc<dyn UserDirectory>,
    pub(crate) questions: Arc<dyn QuestionImport>,
    pub(crate) results: Arc<dyn ResultRepository>,
    pub(crate) user_notifier: Arc<dyn UserNotifier>,
    pub(crate) admin_notifier: Arc<dyn AdminNotifier>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    pub(crate) sessions: DashMap<UserId, SessionHandle>,
    pub(crate) timer: DeadlineTimer,
}

/// Runs timed quizzes. Cheap to clone; clones share the live sessions.
#[derive(Clone)]
pub struct QuizEngine {
    context: Arc<EngineContext>,
}

impl fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizEngine")
            .field("live_sessions", &self.context.sessions.len())
            .field("question_time_limit", &self.context.timer.limit())
            .finish_non_exhaustive()
    }
}

impl QuizEngine {
    /// Creates an engine over `collaborators`.
    #[must_use]
    pub fn new(collaborators: Collaborators, settings: QuizSettings) -> Self {
        let Collaborators {
            directory,
            questions,
            results,
            user_notifier,
            admin_notifier,
            clock,
            rng,
        } = collaborators;
        Self {
            context: Arc::new(EngineContext {
                directory,
                questions,
                results,
                user_notifier,
                admin_notifier,
                clock,
                rng,
                sessions: DashMap::new(),
                timer: DeadlineTimer::new(settings.question_time_limit),
            }),
        }
    }

    /// Starts a quiz: draws 25 questions from the reader's bracket, registers
    /// the session and dispatches the first question. The first question is
    /// also pushed through the user notifier.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::SessionAlreadyActive` if the reader has a live
    /// quiz, `QuizError::NotRegistered` if they never registered,
    /// `QuizError::InsufficientQuestions` if their bracket is too small, or
    /// `QuizError::Domain` if a collaborator fails. Nothing is registered on
    /// error.
    pub async fn start_quiz(&self, command: &StartQuiz) -> Result<QuestionDispatch, QuizError> {
        let user_id = command.user_id;
        if self.has_active_session(user_id) {
            return Err(QuizError::SessionAlreadyActive(user_id));
        }

        let profile = self
            .context
            .directory
            .find_user(user_id)
            .await?
            .ok_or(QuizError::NotRegistered(user_id))?;
        let bank = QuestionBank::load(self.context.questions.as_ref(), profile.bracket()).await?;

        // Lock RNG only for the synchronous draw, never across an await.
        let drawn = {
            let mut rng = self
                .context
                .rng
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            bank.sample(QUESTIONS_PER_QUIZ, &mut *rng)?
        };

        let session = QuizSession::start(profile, drawn, self.context.clock.as_ref())?;
        let session_id = session.id();
        let bracket = session.bracket();
        let dispatch = session
            .dispatch(self.context.timer.limit())
            .ok_or_else(|| DomainError::Validation("quiz has no questions".into()))?;

        let (actor, handle) = SessionActor::new(session, Arc::clone(&self.context));
        match self.context.sessions.entry(user_id) {
            Entry::Occupied(mut slot) if slot.get().is_closed() => {
                debug!(%user_id, stale = %slot.get().session_id, "replacing stopped session");
                slot.insert(handle);
            }
            Entry::Occupied(_) => return Err(QuizError::SessionAlreadyActive(user_id)),
            Entry::Vacant(slot) => {
                slot.insert(handle);
            }
        }
        tokio::spawn(actor.run());

        info!(
            %user_id,
            %session_id,
            %bracket,
            correlation_id = %command.correlation_id,
            "quiz started"
        );
        Ok(dispatch)
    }

    /// Submits a tap for question `command.cursor`. The session moves on as
    /// soon as the outcome is returned.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AnswerRejected` if that question is no longer
    /// awaiting an answer (already answered, timed out, or not yet asked),
    /// or `QuizError::NoActiveSession` if the reader has no live quiz.
    pub async fn submit_answer(&self, command: &SubmitAnswer) -> Result<AnswerOutcome, QuizError> {
        self.submit_answer_holding_next(command)
            .await
            .map(AcceptedAnswer::release)
    }

    /// Submits a tap like [`QuizEngine::submit_answer`], but the next
    /// question (or the summary) is only sent once the returned
    /// [`AcceptedAnswer`] is released.
    ///
    /// # Errors
    ///
    /// Same as [`QuizEngine::submit_answer`].
    pub async fn submit_answer_holding_next(
        &self,
        command: &SubmitAnswer,
    ) -> Result<AcceptedAnswer, QuizError> {
        let (reply, response) = oneshot::channel();
        self.post(
            command.user_id,
            SessionMessage::Answer {
                cursor: command.cursor,
                option: command.option,
                reply,
            },
        )?;
        response
            .await
            .map_err(|_| QuizError::NoActiveSession(command.user_id))?
    }

    /// Retries saving a finished quiz whose result could not be persisted.
    /// The same result, with the same identifier, is persisted again.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ResultNotPersisted` if saving fails again, in
    /// which case no failure notice is pushed to the reader;
    /// `QuizError::NoActiveSession` if the reader has no live quiz, or
    /// `QuizError::Domain` with a validation error if the quiz still has
    /// unanswered questions.
    pub async fn retry_completion(
        &self,
        command: &RetryCompletion,
    ) -> Result<QuizResult, QuizError> {
        let (reply, response) = oneshot::channel();
        self.post(command.user_id, SessionMessage::RetryCompletion { reply })?;
        let result = response
            .await
            .map_err(|_| QuizError::NoActiveSession(command.user_id))?;
        info!(
            user_id = %command.user_id,
            correlation_id = %command.correlation_id,
            saved = result.is_ok(),
            "completion retried"
        );
        result
    }

    /// Snapshot of the reader's live quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveSession` if the reader has no live quiz.
    pub async fn session_progress(&self, user_id: UserId) -> Result<SessionView, QuizError> {
        let (reply, response) = oneshot::channel();
        self.post(user_id, SessionMessage::Progress { reply })?;
        response
            .await
            .map_err(|_| QuizError::NoActiveSession(user_id))
    }

    /// Persisted results of a reader.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Domain` if the result store fails.
    pub async fn results_for_user(&self, user_id: UserId) -> Result<Vec<QuizResult>, QuizError> {
        query_handlers::get_results(user_id, self.context.results.as_ref()).await
    }

    /// Returns `true` if the reader has a live quiz, including one whose
    /// result is waiting to be saved.
    #[must_use]
    pub fn has_active_session(&self, user_id: UserId) -> bool {
        self.context
            .sessions
            .get(&user_id)
            .is_some_and(|handle| !handle.is_closed())
    }

    /// Number of live quizzes.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.context.sessions.len()
    }

    fn post(&self, user_id: UserId, message: SessionMessage) -> Result<(), QuizError> {
        let handle = self
            .context
            .sessions
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .ok_or(QuizError::NoActiveSession(user_id))?;
        if handle.send(message).is_err() {
            self.context
                .sessions
                .remove_if(&user_id, |_, live| live.session_id == handle.session_id);
            return Err(QuizError::NoActiveSession(user_id));
        }
        Ok(())
    }
}
