//! Scoring of finished sessions.

use chrono::{DateTime, Utc};
use kitobxon_core::model::{AnswerRecord, POINTS_PER_CORRECT_ANSWER, QuizResult};
use uuid::Uuid;

use super::session::QuizSession;

/// Score of a set of answer records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Number of correct answers.
    pub correct_count: u32,
    /// Points: four per correct answer.
    pub points: u32,
    /// Share of correct answers in percent, rounded to two decimals.
    pub percentage: f64,
}

/// Scores `answers` out of `total` questions.
#[must_use]
pub fn score(answers: &[AnswerRecord], total: usize) -> Score {
    let correct = answers.iter().filter(|a| a.correct).count();
    let correct_count = u32::try_from(correct).unwrap_or(u32::MAX);
    let total = u32::try_from(total).unwrap_or(u32::MAX);
    Score {
        correct_count,
        points: correct_count.saturating_mul(POINTS_PER_CORRECT_ANSWER),
        percentage: percentage(correct_count, total),
    }
}

/// `correct / total * 100`, rounded to two decimals. Zero for an empty quiz.
#[must_use]
pub fn percentage(correct: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(correct) / f64::from(total) * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Builds the result of a finished session.
#[must_use]
pub fn build_result(
    session: &QuizSession,
    result_id: Uuid,
    completed_at: DateTime<Utc>,
) -> QuizResult {
    let score = score(session.answers(), session.total());
    let profile = session.profile();
    QuizResult {
        result_id,
        user_id: profile.user_id,
        display_name: profile.display_name.clone(),
        username: profile.username.clone(),
        bracket: session.bracket(),
        score: score.points,
        correct_count: score.correct_count,
        total_questions: u32::try_from(session.total()).unwrap_or(u32::MAX),
        percentage: score.percentage,
        elapsed_secs: (completed_at - session.started_at()).num_seconds(),
        started_at: session.started_at(),
        completed_at,
        answers: session.answers().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use kitobxon_core::model::{Bracket, OptionTag, QUESTIONS_PER_QUIZ};
    use kitobxon_test_support::{ManualClock, profile, questions};

    use super::*;
    use crate::domain::session::Resolution;

    fn records(correct: usize) -> Vec<AnswerRecord> {
        (0..QUESTIONS_PER_QUIZ)
            .map(|i| {
                if i < correct {
                    AnswerRecord::answered(OptionTag::A, true)
                } else {
                    AnswerRecord::timed_out()
                }
            })
            .collect()
    }

    #[test]
    fn test_score_law_holds_for_none_some_and_all_correct() {
        for (correct, points, pct) in [(0, 0, 0.0), (13, 52, 52.0), (25, 100, 100.0)] {
            // Act
            let score = score(&records(correct), QUESTIONS_PER_QUIZ);

            // Assert
            assert_eq!(score.correct_count, u32::try_from(correct).unwrap());
            assert_eq!(score.points, points);
            assert!((score.percentage - pct).abs() < f64::EPSILON, "{correct}");
        }
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        assert!((percentage(1, 3) - 33.33).abs() < f64::EPSILON);
        assert!((percentage(2, 3) - 66.67).abs() < f64::EPSILON);
        assert!((percentage(0, 0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_build_result_measures_elapsed_time_and_copies_profile() {
        // Arrange
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let mut session = QuizSession::start(
            profile(11, 12),
            questions(Bracket::Ages11To14, QUESTIONS_PER_QUIZ),
            &clock,
        )
        .unwrap();
        for cursor in 0..QUESTIONS_PER_QUIZ {
            session
                .resolve(cursor, Resolution::Answered(OptionTag::ALL[cursor % 4]))
                .unwrap();
        }
        clock.advance(TimeDelta::seconds(754));
        let result_id = Uuid::new_v4();

        // Act
        let result = build_result(&session, result_id, kitobxon_core::time::Clock::now(&clock));

        // Assert
        assert_eq!(result.result_id, result_id);
        assert_eq!(result.display_name, "Reader 11");
        assert_eq!(result.username.as_deref(), Some("reader11"));
        assert_eq!(result.bracket, Bracket::Ages11To14);
        assert_eq!(result.score, 100);
        assert_eq!(result.total_questions, 25);
        assert_eq!(result.elapsed_secs, 754);
        assert_eq!(result.elapsed_display(), "0:12:34");
        assert_eq!(result.answers.len(), QUESTIONS_PER_QUIZ);
    }
}
