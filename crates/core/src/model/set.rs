use thiserror::Error;

use crate::model::{Question, QuestionId, SetId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PracticeSetError {
    #[error("practice set has no questions")]
    Empty,
}

/// A named, ordered collection of practice questions.
///
/// Immutable once built; the session engine only ever reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSet {
    id: SetId,
    title: Option<String>,
    questions: Vec<Question>,
}

impl PracticeSet {
    /// # Errors
    ///
    /// Returns `PracticeSetError::Empty` if `questions` is empty.
    pub fn new(
        id: SetId,
        title: Option<String>,
        questions: Vec<Question>,
    ) -> Result<Self, PracticeSetError> {
        if questions.is_empty() {
            return Err(PracticeSetError::Empty);
        }
        Ok(Self {
            id,
            title,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &SetId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn contains(&self, question_id: &QuestionId) -> bool {
        self.questions.iter().any(|q| q.id() == question_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerSpec;

    #[test]
    fn empty_set_is_rejected() {
        let err = PracticeSet::new(SetId::new("dpp-1"), None, Vec::new()).unwrap_err();
        assert_eq!(err, PracticeSetError::Empty);
    }

    #[test]
    fn accessors_expose_questions_in_order() {
        let questions = vec![
            Question::new(
                QuestionId::new("q1"),
                1,
                "First",
                None,
                AnswerSpec::Numeric { correct: 1.0 },
            )
            .unwrap(),
            Question::new(
                QuestionId::new("q2"),
                2,
                "Second",
                None,
                AnswerSpec::Numeric { correct: 2.0 },
            )
            .unwrap(),
        ];
        let set =
            PracticeSet::new(SetId::new("dpp-1"), Some("Motion".to_string()), questions).unwrap();

        assert_eq!(set.title(), Some("Motion"));
        assert_eq!(set.question_count(), 2);
        assert_eq!(set.question(0).unwrap().id().as_str(), "q1");
        assert!(set.contains(&QuestionId::new("q2")));
        assert!(!set.contains(&QuestionId::new("q3")));
    }
}
