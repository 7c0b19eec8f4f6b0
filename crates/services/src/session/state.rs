use chrono::{DateTime, Utc};
use std::collections::HashMap;

use practice_core::model::{
    NumericInput, OptionKey, PracticeSet, PracticeSummary, Question, QuestionId, SetId, UserAnswer,
};
use practice_core::time::elapsed_secs;

use crate::error::SessionError;

//
// ─── PHASES AND EVENTS ─────────────────────────────────────────────────────────
//

/// Lifecycle phase of the practice module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Set list shown, no active session.
    Browsing,
    /// A set is active, a question is on screen, the stopwatch runs.
    InProgress,
    /// Answers locked, score computed.
    Reviewing,
}

/// One answer edit on the current question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerEvent {
    /// Select a single-choice option, replacing any previous selection.
    SelectSingle(OptionKey),
    /// Toggle a multi-choice option: add when absent, remove when present.
    ToggleMulti(OptionKey),
    /// Type one character into the numeric entry; characters outside the
    /// numeric grammar are dropped and the prior value is retained.
    NumericChar(char),
    /// Delete the last character of the numeric entry.
    NumericBackspace,
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct ActiveSession {
    set_index: usize,
    current: usize,
    answers: HashMap<QuestionId, UserAnswer>,
    timings: HashMap<QuestionId, u64>,
    /// Start of the measurement window for the current question. Every index
    /// change opens a fresh window; the old timestamp is never reused.
    question_started_at: DateTime<Utc>,
}

impl ActiveSession {
    fn fresh(set_index: usize, now: DateTime<Utc>) -> Self {
        Self {
            set_index,
            current: 0,
            answers: HashMap::new(),
            timings: HashMap::new(),
            question_started_at: now,
        }
    }
}

#[derive(Debug, Clone)]
struct ReviewedSession {
    set_index: usize,
    summary: PracticeSummary,
}

#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Browsing,
    InProgress(ActiveSession),
    Reviewing(ReviewedSession),
}

/// The practice session aggregate: an immutable catalog of sets plus the
/// explicit state the transition methods evolve.
///
/// All operations are synchronous and take `now` from the caller, so the
/// whole machine is testable without a timer host. The 1-second ticker lives
/// in [`SessionController`](crate::session::SessionController).
#[derive(Debug, Clone)]
pub struct PracticeSession {
    sets: Vec<PracticeSet>,
    state: SessionState,
}

impl PracticeSession {
    #[must_use]
    pub fn new(sets: Vec<PracticeSet>) -> Self {
        Self {
            sets,
            state: SessionState::Browsing,
        }
    }

    //
    // ─── READ SIDE ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.state {
            SessionState::Browsing => Phase::Browsing,
            SessionState::InProgress(_) => Phase::InProgress,
            SessionState::Reviewing(_) => Phase::Reviewing,
        }
    }

    #[must_use]
    pub fn sets(&self) -> &[PracticeSet] {
        &self.sets
    }

    /// Identity of the active set; `None` while browsing.
    #[must_use]
    pub fn current_set_id(&self) -> Option<&SetId> {
        self.current_set().map(PracticeSet::id)
    }

    #[must_use]
    pub fn current_set(&self) -> Option<&PracticeSet> {
        let index = match &self.state {
            SessionState::Browsing => return None,
            SessionState::InProgress(active) => active.set_index,
            SessionState::Reviewing(reviewed) => reviewed.set_index,
        };
        self.sets.get(index)
    }

    /// Zero-based index of the question on screen; `None` outside
    /// `InProgress`.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match &self.state {
            SessionState::InProgress(active) => Some(active.current),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let active = self.active()?;
        self.sets.get(active.set_index)?.question(active.current)
    }

    /// The recorded answer for the question on screen.
    #[must_use]
    pub fn current_answer(&self) -> Option<&UserAnswer> {
        let question = self.current_question()?;
        self.active()?.answers.get(question.id())
    }

    #[must_use]
    pub fn answer_for(&self, question_id: &QuestionId) -> Option<&UserAnswer> {
        self.active()?.answers.get(question_id)
    }

    #[must_use]
    pub fn timing_for(&self, question_id: &QuestionId) -> Option<u64> {
        self.active()?.timings.get(question_id).copied()
    }

    /// Stopwatch reading for the current question, clamped to non-negative.
    ///
    /// Returns 0 outside `InProgress`.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.active() {
            Some(active) => elapsed_secs(active.question_started_at, now),
            None => 0,
        }
    }

    /// Score summary; only available while `Reviewing`.
    #[must_use]
    pub fn summary(&self) -> Option<&PracticeSummary> {
        match &self.state {
            SessionState::Reviewing(reviewed) => Some(&reviewed.summary),
            _ => None,
        }
    }

    fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            SessionState::InProgress(active) => Some(active),
            _ => None,
        }
    }

    fn active_mut(&mut self, operation: &'static str) -> Result<&mut ActiveSession, SessionError> {
        let phase = self.phase();
        match &mut self.state {
            SessionState::InProgress(active) => Ok(active),
            _ => Err(SessionError::InvalidTransition { operation, phase }),
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    /// Begin a session on `set_id` at question 0 with cleared answers and
    /// timings and a fresh measurement window.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless browsing, and `UnknownSet` when the
    /// catalog has no such set.
    pub fn start_session(
        &mut self,
        set_id: &SetId,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Browsing) {
            return Err(SessionError::InvalidTransition {
                operation: "start_session",
                phase: self.phase(),
            });
        }

        let set_index = self
            .sets
            .iter()
            .position(|set| set.id() == set_id)
            .ok_or_else(|| SessionError::UnknownSet(set_id.clone()))?;

        self.state = SessionState::InProgress(ActiveSession::fresh(set_index, now));
        Ok(())
    }

    /// Apply one answer edit to the current question.
    ///
    /// Edits write straight into the session's answer map, so a later
    /// [`finish`](Self::finish) observes every in-flight edit without a
    /// separate merge step. No correctness check happens here.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `InProgress` and
    /// `NotCurrentQuestion` when `question_id` is not the question on screen.
    pub fn record_answer(
        &mut self,
        question_id: &QuestionId,
        event: AnswerEvent,
    ) -> Result<(), SessionError> {
        let current_id = self
            .current_question()
            .map(|q| q.id().clone())
            .ok_or(SessionError::InvalidTransition {
                operation: "record_answer",
                phase: self.phase(),
            })?;
        if &current_id != question_id {
            return Err(SessionError::NotCurrentQuestion(question_id.clone()));
        }

        let active = self.active_mut("record_answer")?;
        match event {
            AnswerEvent::SelectSingle(key) => {
                active.answers.insert(current_id, UserAnswer::Single(key));
            }
            AnswerEvent::ToggleMulti(key) => {
                let mut keys = match active.answers.remove(&current_id) {
                    Some(UserAnswer::Multi(keys)) => keys,
                    _ => Default::default(),
                };
                if !keys.remove(&key) {
                    keys.insert(key);
                }
                active.answers.insert(current_id, UserAnswer::Multi(keys));
            }
            AnswerEvent::NumericChar(ch) => {
                let mut entry = match active.answers.remove(&current_id) {
                    Some(UserAnswer::Numeric(entry)) => entry,
                    _ => NumericInput::new(),
                };
                entry.push(ch);
                active.answers.insert(current_id, UserAnswer::Numeric(entry));
            }
            AnswerEvent::NumericBackspace => {
                let mut entry = match active.answers.remove(&current_id) {
                    Some(UserAnswer::Numeric(entry)) => entry,
                    _ => NumericInput::new(),
                };
                entry.pop();
                active.answers.insert(current_id, UserAnswer::Numeric(entry));
            }
        }
        Ok(())
    }

    /// Advance to the next question. Returns false (and changes nothing) when
    /// already on the last question.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `InProgress`.
    pub fn next_question(&mut self, now: DateTime<Utc>) -> Result<bool, SessionError> {
        self.step(now, 1, "next_question")
    }

    /// Retreat to the previous question. Returns false (and changes nothing)
    /// when already on the first question.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `InProgress`.
    pub fn prev_question(&mut self, now: DateTime<Utc>) -> Result<bool, SessionError> {
        self.step(now, -1, "prev_question")
    }

    fn step(
        &mut self,
        now: DateTime<Utc>,
        delta: isize,
        operation: &'static str,
    ) -> Result<bool, SessionError> {
        let total = self
            .current_set()
            .map(PracticeSet::question_count)
            .unwrap_or(0);
        let question_id = self.current_question().map(|q| q.id().clone());

        let active = self.active_mut(operation)?;
        let target = active.current.checked_add_signed(delta);
        let Some(target) = target.filter(|t| *t < total) else {
            return Ok(false);
        };

        if let Some(id) = question_id {
            let taken = elapsed_secs(active.question_started_at, now);
            active.timings.insert(id, taken);
        }
        active.current = target;
        active.question_started_at = now;
        Ok(true)
    }

    /// Lock answers, snapshot the current question's time, compute the score
    /// and move to `Reviewing`.
    ///
    /// Both finish paths (explicit finish on the last question and a
    /// confirmed early exit) call this and produce identical state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `InProgress`.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<&PracticeSummary, SessionError> {
        let question_id = self.current_question().map(|q| q.id().clone());

        let active = self.active_mut("finish")?;
        if let Some(id) = question_id {
            let taken = elapsed_secs(active.question_started_at, now);
            active.timings.insert(id, taken);
        }

        let set_index = active.set_index;
        let summary = {
            let set = &self.sets[set_index];
            match &self.state {
                SessionState::InProgress(active) => {
                    PracticeSummary::compute(set, &active.answers, &active.timings)
                }
                _ => unreachable!("checked by active_mut above"),
            }
        };

        self.state = SessionState::Reviewing(ReviewedSession { set_index, summary });
        match &self.state {
            SessionState::Reviewing(reviewed) => Ok(&reviewed.summary),
            _ => unreachable!("state was just set"),
        }
    }

    /// Restart the reviewed set from question 0 with cleared answers and
    /// timings, keeping the same set identity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `Reviewing`.
    pub fn retry(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let SessionState::Reviewing(reviewed) = &self.state else {
            return Err(SessionError::InvalidTransition {
                operation: "retry",
                phase: self.phase(),
            });
        };

        self.state = SessionState::InProgress(ActiveSession::fresh(reviewed.set_index, now));
        Ok(())
    }

    /// Drop all session state and return to the set list.
    ///
    /// Confirmation for leaving a running session is the caller's contract;
    /// see `SessionController::request_exit`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while browsing.
    pub fn exit_to_list(&mut self) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Browsing) {
            return Err(SessionError::InvalidTransition {
                operation: "exit_to_list",
                phase: Phase::Browsing,
            });
        }
        self.state = SessionState::Browsing;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
