use chrono::{DateTime, Utc};

use practice_core::model::{PracticeSet, PracticeSummary, Question, SetId, UserAnswer};

use super::state::{Phase, PracticeSession};

/// Presentation-agnostic snapshot of the session.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The UI formats timings, percentages and option labels as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub phase: Phase,
    pub set_id: Option<SetId>,
    pub set_title: Option<String>,

    /// Zero-based index of the question on screen; `None` outside
    /// `InProgress`.
    pub index: Option<usize>,
    /// Question count of the active set; 0 while browsing.
    pub total: usize,
    /// Current stopwatch reading in whole seconds.
    pub elapsed_secs: u64,

    pub question: Option<Question>,
    pub answer: Option<UserAnswer>,

    /// Populated only while `Reviewing`.
    pub summary: Option<PracticeSummary>,
}

impl SessionView {
    #[must_use]
    pub fn capture(session: &PracticeSession, now: DateTime<Utc>) -> Self {
        let set = session.current_set();
        Self {
            phase: session.phase(),
            set_id: set.map(|s| s.id().clone()),
            set_title: set.and_then(PracticeSet::title).map(str::to_owned),
            index: session.current_index(),
            total: set.map_or(0, PracticeSet::question_count),
            elapsed_secs: session.elapsed_secs(now),
            question: session.current_question().cloned(),
            answer: session.current_answer().cloned(),
            summary: session.summary().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{AnswerSpec, QuestionId};
    use practice_core::time::fixed_now;

    fn one_set() -> Vec<PracticeSet> {
        let question = Question::new(
            QuestionId::new("q1"),
            1,
            "Enter 2",
            None,
            AnswerSpec::Numeric { correct: 2.0 },
        )
        .unwrap();
        vec![
            PracticeSet::new(SetId::new("dpp-1"), Some("Units".to_string()), vec![question])
                .unwrap(),
        ]
    }

    #[test]
    fn browsing_view_is_empty() {
        let session = PracticeSession::new(one_set());
        let view = SessionView::capture(&session, fixed_now());

        assert_eq!(view.phase, Phase::Browsing);
        assert!(view.set_id.is_none());
        assert!(view.question.is_none());
        assert!(view.summary.is_none());
        assert_eq!(view.total, 0);
    }

    #[test]
    fn in_progress_view_carries_question_and_elapsed() {
        let mut session = PracticeSession::new(one_set());
        session
            .start_session(&SetId::new("dpp-1"), fixed_now())
            .unwrap();

        let later = fixed_now() + chrono::Duration::seconds(4);
        let view = SessionView::capture(&session, later);

        assert_eq!(view.phase, Phase::InProgress);
        assert_eq!(view.set_title.as_deref(), Some("Units"));
        assert_eq!(view.index, Some(0));
        assert_eq!(view.total, 1);
        assert_eq!(view.elapsed_secs, 4);
        assert_eq!(view.question.unwrap().id().as_str(), "q1");
    }

    #[test]
    fn reviewing_view_exposes_summary_only_then() {
        let mut session = PracticeSession::new(one_set());
        session
            .start_session(&SetId::new("dpp-1"), fixed_now())
            .unwrap();
        let pre = SessionView::capture(&session, fixed_now());
        assert!(pre.summary.is_none());

        session.finish(fixed_now()).unwrap();
        let view = SessionView::capture(&session, fixed_now());

        assert_eq!(view.phase, Phase::Reviewing);
        let summary = view.summary.unwrap();
        assert_eq!(summary.total(), 1);
        assert_eq!(view.elapsed_secs, 0);
    }
}
