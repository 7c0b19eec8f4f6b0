use std::collections::HashMap;

use crate::model::{AnswerSpec, PracticeSet, QuestionId, UserAnswer};

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

impl AnswerSpec {
    /// Grade a recorded answer against this shape.
    ///
    /// Rules, applied exactly:
    /// - single-choice: the selected key must equal the correct key,
    ///   case-sensitively;
    /// - multi-choice: the selected set must equal the correct set. An empty
    ///   correct set never matches (such content is considered unreachable
    ///   upstream; see `Unscorable` for the related degenerate rows);
    /// - numeric: the entry must parse and compare equal to the correct value
    ///   with no tolerance band. Exact f64 equality is a known source of
    ///   false negatives for computed decimal answers, preserved on purpose;
    /// - no recorded answer, a blank answer, or an answer of the wrong shape
    ///   is incorrect;
    /// - `Unscorable` never matches.
    #[must_use]
    pub fn is_correct(&self, answer: Option<&UserAnswer>) -> bool {
        let Some(answer) = answer else {
            return false;
        };

        match (self, answer) {
            (AnswerSpec::SingleChoice { correct, .. }, UserAnswer::Single(selected)) => {
                selected == correct
            }
            (AnswerSpec::MultiChoice { correct, .. }, UserAnswer::Multi(selected)) => {
                !correct.is_empty() && selected == correct
            }
            (AnswerSpec::Numeric { correct }, UserAnswer::Numeric(entry)) => {
                entry.parse() == Some(*correct)
            }
            _ => false,
        }
    }
}

//
// ─── SUMMARY ───────────────────────────────────────────────────────────────────
//

/// Per-question outcome shown on the review screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub serial: u32,
    pub answer: Option<UserAnswer>,
    pub correct: bool,
    pub time_secs: u64,
}

/// Aggregate score for a finished practice session.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSummary {
    total: u32,
    correct: u32,
    time_secs: u64,
    results: Vec<QuestionResult>,
}

impl PracticeSummary {
    /// Grade every question of `set` against the recorded answers.
    ///
    /// Every question contributes to the total; questions without a timing
    /// entry contribute zero seconds.
    #[must_use]
    pub fn compute(
        set: &PracticeSet,
        answers: &HashMap<QuestionId, UserAnswer>,
        timings: &HashMap<QuestionId, u64>,
    ) -> Self {
        let mut correct = 0_u32;
        let mut time_secs = 0_u64;
        let mut results = Vec::with_capacity(set.question_count());

        for question in set.questions() {
            let answer = answers.get(question.id());
            let is_correct = question.spec().is_correct(answer);
            let taken = timings.get(question.id()).copied().unwrap_or(0);

            if is_correct {
                correct += 1;
            }
            time_secs = time_secs.saturating_add(taken);

            results.push(QuestionResult {
                question_id: question.id().clone(),
                serial: question.serial(),
                answer: answer.cloned(),
                correct: is_correct,
                time_secs: taken,
            });
        }

        let total = u32::try_from(set.question_count()).unwrap_or(u32::MAX);

        Self {
            total,
            correct,
            time_secs,
            results,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.total - self.correct
    }

    /// Sum of all recorded per-question timings.
    #[must_use]
    pub fn time_secs(&self) -> u64 {
        self.time_secs
    }

    /// Rounded percentage of correct answers; 0 for an empty total.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = f64::from(self.correct) / f64::from(self.total) * 100.0;
        pct.round() as u32
    }

    #[must_use]
    pub fn results(&self) -> &[QuestionResult] {
        &self.results
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChoiceOption, OptionKey, Question, SetId};
    use std::collections::BTreeSet;

    fn three_question_set() -> PracticeSet {
        let q1 = Question::new(
            QuestionId::new("q1"),
            1,
            "Pick B",
            None,
            AnswerSpec::SingleChoice {
                options: vec![ChoiceOption::text("A", "no"), ChoiceOption::text("B", "yes")],
                correct: OptionKey::new("B"),
            },
        )
        .unwrap();
        let q2 = Question::new(
            QuestionId::new("q2"),
            2,
            "Pick A and C",
            None,
            AnswerSpec::MultiChoice {
                options: vec![
                    ChoiceOption::text("A", "a"),
                    ChoiceOption::text("B", "b"),
                    ChoiceOption::text("C", "c"),
                ],
                correct: [OptionKey::new("A"), OptionKey::new("C")].into_iter().collect(),
            },
        )
        .unwrap();
        let q3 = Question::new(
            QuestionId::new("q3"),
            3,
            "Enter 4.5",
            None,
            AnswerSpec::Numeric { correct: 4.5 },
        )
        .unwrap();

        PracticeSet::new(SetId::new("dpp-1"), None, vec![q1, q2, q3]).unwrap()
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let set = three_question_set();
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new("q1"), UserAnswer::single("B"));
        // Selection order does not matter for multi-choice.
        answers.insert(QuestionId::new("q2"), UserAnswer::multi(["C", "A"]));
        answers.insert(QuestionId::new("q3"), UserAnswer::numeric("4.5"));

        let summary = PracticeSummary::compute(&set, &answers, &HashMap::new());

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.correct(), 3);
        assert_eq!(summary.incorrect(), 0);
        assert_eq!(summary.percentage(), 100);
    }

    #[test]
    fn wrong_incomplete_and_missing_answers_all_miss() {
        let set = three_question_set();
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new("q1"), UserAnswer::single("A"));
        answers.insert(QuestionId::new("q2"), UserAnswer::multi(["A"]));
        // q3 unanswered.

        let summary = PracticeSummary::compute(&set, &answers, &HashMap::new());

        assert_eq!(summary.correct(), 0);
        assert_eq!(summary.incorrect(), 3);
        assert_eq!(summary.percentage(), 0);
    }

    #[test]
    fn timings_sum_with_missing_entries_as_zero() {
        let set = three_question_set();
        let mut timings = HashMap::new();
        timings.insert(QuestionId::new("q1"), 12);
        timings.insert(QuestionId::new("q3"), 30);

        let summary = PracticeSummary::compute(&set, &HashMap::new(), &timings);

        assert_eq!(summary.time_secs(), 42);
        assert_eq!(summary.results()[1].time_secs, 0);
    }

    #[test]
    fn unparseable_numeric_entry_is_incorrect() {
        let spec = AnswerSpec::Numeric { correct: 4.5 };
        assert!(!spec.is_correct(Some(&UserAnswer::numeric("-"))));
        assert!(!spec.is_correct(Some(&UserAnswer::numeric(""))));
        assert!(spec.is_correct(Some(&UserAnswer::numeric("4.5"))));
    }

    #[test]
    fn empty_correct_set_never_matches() {
        let spec = AnswerSpec::MultiChoice {
            options: vec![ChoiceOption::text("A", "a")],
            correct: BTreeSet::new(),
        };
        assert!(!spec.is_correct(Some(&UserAnswer::multi(Vec::<OptionKey>::new()))));
        assert!(!spec.is_correct(Some(&UserAnswer::multi(["A"]))));
    }

    #[test]
    fn wrong_shape_answer_is_incorrect() {
        let spec = AnswerSpec::Numeric { correct: 1.0 };
        assert!(!spec.is_correct(Some(&UserAnswer::single("A"))));
        assert!(!AnswerSpec::Unscorable.is_correct(Some(&UserAnswer::single("A"))));
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let set = three_question_set();
        let mut answers = HashMap::new();
        answers.insert(QuestionId::new("q1"), UserAnswer::single("B"));

        let summary = PracticeSummary::compute(&set, &answers, &HashMap::new());

        // 1/3 -> 33.33 rounds down.
        assert_eq!(summary.percentage(), 33);
    }
}
