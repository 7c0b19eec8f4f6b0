//! DTO layer for upstream practice content.
//!
//! Upstream rows carry no discriminant for the answer shape: a question is
//! single-choice, multi-choice or numeric depending on which optional fields
//! are populated. This module is the only place that inspects field presence;
//! everything downstream works with the tagged `AnswerSpec`.

use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

use practice_core::model::{
    ChoiceOption, ImageSource, OptionKey, PracticeSet, Question, QuestionDraft, QuestionId, SetId,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSetDto {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: String,
    #[serde(default, alias = "serial")]
    pub serial_number: u32,
    #[serde(alias = "questionText")]
    pub question: String,
    #[serde(default, alias = "questionImage")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionDto>,
    #[serde(default)]
    pub correct_option: Option<String>,
    #[serde(default)]
    pub correct_options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_value: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    pub key: String,
    #[serde(default)]
    pub is_image: bool,
    pub content: String,
}

impl OptionDto {
    fn into_domain(self, question_id: &str) -> ChoiceOption {
        if self.is_image {
            match ImageSource::from_url(&self.content) {
                Ok(source) => return ChoiceOption::image(self.key, source),
                Err(_) => {
                    warn!(question_id, key = %self.key, "option image URL invalid, keeping as text");
                }
            }
        }
        ChoiceOption::text(self.key, self.content)
    }
}

impl QuestionDto {
    /// Convert one row into a tagged question.
    ///
    /// Rows that fail shape validation are kept as unscorable placeholders so
    /// the set total is preserved; they are never silently dropped.
    #[must_use]
    pub fn into_domain(self) -> Question {
        let id = self.id.clone();
        let serial = self.serial_number;
        let body = self.question.clone();

        let draft = QuestionDraft {
            id: self.id,
            serial: self.serial_number,
            body: self.question,
            image_url: self.image_url,
            options: self
                .options
                .into_iter()
                .map(|o| o.into_domain(&id))
                .collect(),
            correct_option: self.correct_option.map(OptionKey::new),
            correct_options: self
                .correct_options
                .map(|keys| keys.into_iter().map(OptionKey::new).collect::<BTreeSet<_>>()),
            correct_value: self.correct_value,
        };

        match draft.validate() {
            Ok(question) => question,
            Err(err) => {
                warn!(question_id = %id, %err, "question row failed validation, kept unscorable");
                Question::unscorable(QuestionId::new(id), serial, body)
            }
        }
    }
}

impl PracticeSetDto {
    /// Convert a set row; `None` when the set has no questions at all.
    #[must_use]
    pub fn into_domain(self) -> Option<PracticeSet> {
        let id = SetId::new(self.id);
        let questions: Vec<Question> = self
            .questions
            .into_iter()
            .map(QuestionDto::into_domain)
            .collect();

        match PracticeSet::new(id.clone(), self.title, questions) {
            Ok(set) => Some(set),
            Err(err) => {
                warn!(set_id = %id, %err, "dropping practice set");
                None
            }
        }
    }
}

/// Convert a decoded payload, dropping only question-less sets.
#[must_use]
pub fn sets_from_dtos(dtos: Vec<PracticeSetDto>) -> Vec<PracticeSet> {
    dtos.into_iter()
        .filter_map(PracticeSetDto::into_domain)
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
