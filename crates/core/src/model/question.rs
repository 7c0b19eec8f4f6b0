use std::collections::BTreeSet;
use thiserror::Error;
use url::Url;

use crate::model::{OptionKey, QuestionId};

//
// ─── ERRORS (domain validation) ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionShapeError {
    #[error("question body cannot be empty")]
    EmptyBody,

    #[error("image URL is empty or not a valid URL")]
    InvalidImageUrl,

    #[error("choice question has no options")]
    NoOptions,

    #[error("expected exactly one answer payload, found {populated}")]
    AmbiguousShape { populated: usize },
}

//
// ─── IMAGES AND OPTION CONTENT ─────────────────────────────────────────────────
//

/// Validated remote image reference for a question or option body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource(Url);

impl ImageSource {
    /// Parse an image URL.
    ///
    /// # Errors
    ///
    /// Returns `QuestionShapeError::InvalidImageUrl` for empty or unparseable
    /// input.
    pub fn from_url(url: impl AsRef<str>) -> Result<Self, QuestionShapeError> {
        let s = url.as_ref().trim();
        if s.is_empty() {
            return Err(QuestionShapeError::InvalidImageUrl);
        }
        let u = Url::parse(s).map_err(|_| QuestionShapeError::InvalidImageUrl)?;
        Ok(Self(u))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Body of a single choice option: plain text or an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionContent {
    Text(String),
    Image(ImageSource),
}

impl OptionContent {
    /// Text content, if this option is textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionContent::Text(t) => Some(t),
            OptionContent::Image(_) => None,
        }
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub key: OptionKey,
    pub content: OptionContent,
}

impl ChoiceOption {
    #[must_use]
    pub fn text(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: OptionKey::new(key),
            content: OptionContent::Text(content.into()),
        }
    }

    #[must_use]
    pub fn image(key: impl Into<String>, source: ImageSource) -> Self {
        Self {
            key: OptionKey::new(key),
            content: OptionContent::Image(source),
        }
    }
}

//
// ─── ANSWER SHAPE ──────────────────────────────────────────────────────────────
//

/// Tagged answer shape of a question.
///
/// Upstream content does not carry a discriminant; the content-loading
/// boundary derives the variant once from which payload fields are populated,
/// so nothing past that boundary ever re-inspects field presence.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerSpec {
    SingleChoice {
        options: Vec<ChoiceOption>,
        correct: OptionKey,
    },
    MultiChoice {
        options: Vec<ChoiceOption>,
        correct: BTreeSet<OptionKey>,
    },
    Numeric {
        correct: f64,
    },
    /// Upstream row populated zero or several answer payloads. Kept so the
    /// question still counts toward totals; never scored as correct.
    Unscorable,
}

impl AnswerSpec {
    /// Options to present for a choice question; empty for numeric and
    /// unscorable questions.
    #[must_use]
    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            AnswerSpec::SingleChoice { options, .. } | AnswerSpec::MultiChoice { options, .. } => {
                options
            }
            AnswerSpec::Numeric { .. } | AnswerSpec::Unscorable => &[],
        }
    }

    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            AnswerSpec::SingleChoice { .. } | AnswerSpec::MultiChoice { .. }
        )
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single practice question with a resolved answer shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: QuestionId,
    serial: u32,
    body: String,
    image: Option<ImageSource>,
    spec: AnswerSpec,
}

impl Question {
    /// Build a question from already-tagged parts.
    ///
    /// # Errors
    ///
    /// Returns `QuestionShapeError::EmptyBody` for a blank body and
    /// `QuestionShapeError::NoOptions` for a choice shape without options.
    pub fn new(
        id: QuestionId,
        serial: u32,
        body: impl Into<String>,
        image: Option<ImageSource>,
        spec: AnswerSpec,
    ) -> Result<Self, QuestionShapeError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(QuestionShapeError::EmptyBody);
        }
        if spec.is_choice() && spec.options().is_empty() {
            return Err(QuestionShapeError::NoOptions);
        }

        Ok(Self {
            id,
            serial,
            body,
            image,
            spec,
        })
    }

    /// Placeholder for a row the loading boundary could not shape. The
    /// question stays visible and counts toward the total, but can never be
    /// answered correctly.
    #[must_use]
    pub fn unscorable(id: QuestionId, serial: u32, body: impl Into<String>) -> Self {
        let body = body.into();
        let body = if body.trim().is_empty() {
            "(unavailable)".to_string()
        } else {
            body
        };
        Self {
            id,
            serial,
            body,
            image: None,
            spec: AnswerSpec::Unscorable,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Display ordering number from upstream content.
    #[must_use]
    pub fn serial(&self) -> u32 {
        self.serial
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn image(&self) -> Option<&ImageSource> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn spec(&self) -> &AnswerSpec {
        &self.spec
    }
}

//
// ─── DRAFT (loading boundary) ──────────────────────────────────────────────────
//

/// Raw question shape as it arrives from upstream content: all three answer
/// payloads optional, exactly one expected.
///
/// `validate` is the one place in the system that turns field presence into
/// the tagged [`AnswerSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionDraft {
    pub id: String,
    pub serial: u32,
    pub body: String,
    pub image_url: Option<String>,
    pub options: Vec<ChoiceOption>,
    pub correct_option: Option<OptionKey>,
    pub correct_options: Option<BTreeSet<OptionKey>>,
    pub correct_value: Option<f64>,
}

impl QuestionDraft {
    /// Resolve the answer shape and build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionShapeError::AmbiguousShape` when zero or more than
    /// one payload is populated, and propagates body/image/option validation
    /// failures.
    pub fn validate(self) -> Result<Question, QuestionShapeError> {
        let populated = usize::from(self.correct_option.is_some())
            + usize::from(self.correct_options.is_some())
            + usize::from(self.correct_value.is_some());
        if populated != 1 {
            return Err(QuestionShapeError::AmbiguousShape { populated });
        }

        let spec = if let Some(correct) = self.correct_option {
            AnswerSpec::SingleChoice {
                options: self.options,
                correct,
            }
        } else if let Some(correct) = self.correct_options {
            AnswerSpec::MultiChoice {
                options: self.options,
                correct,
            }
        } else if let Some(correct) = self.correct_value {
            AnswerSpec::Numeric { correct }
        } else {
            unreachable!("populated count was checked above")
        };

        let image = match self.image_url {
            None => None,
            Some(raw) => Some(ImageSource::from_url(raw)?),
        };

        Question::new(QuestionId::new(self.id), self.serial, self.body, image, spec)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn base_draft() -> QuestionDraft {
        QuestionDraft {
            id: "q1".to_string(),
            serial: 1,
            body: "What is 2 + 2?".to_string(),
            ..QuestionDraft::default()
        }
    }

    #[test]
    fn single_payload_resolves_to_tagged_shape() {
        let mut draft = base_draft();
        draft.options = vec![ChoiceOption::text("A", "3"), ChoiceOption::text("B", "4")];
        draft.correct_option = Some(OptionKey::new("B"));

        let question = draft.validate().unwrap();
        assert!(matches!(
            question.spec(),
            AnswerSpec::SingleChoice { correct, .. } if correct == &OptionKey::new("B")
        ));
        assert_eq!(question.spec().options().len(), 2);
    }

    #[test]
    fn numeric_payload_resolves() {
        let mut draft = base_draft();
        draft.correct_value = Some(4.5);

        let question = draft.validate().unwrap();
        assert_eq!(question.spec(), &AnswerSpec::Numeric { correct: 4.5 });
    }

    #[test]
    fn zero_payloads_is_ambiguous() {
        let err = base_draft().validate().unwrap_err();
        assert_eq!(err, QuestionShapeError::AmbiguousShape { populated: 0 });
    }

    #[test]
    fn two_payloads_is_ambiguous() {
        let mut draft = base_draft();
        draft.correct_option = Some(OptionKey::new("A"));
        draft.correct_value = Some(1.0);
        let err = draft.validate().unwrap_err();
        assert_eq!(err, QuestionShapeError::AmbiguousShape { populated: 2 });
    }

    #[test]
    fn choice_shape_requires_options() {
        let mut draft = base_draft();
        draft.correct_option = Some(OptionKey::new("A"));
        let err = draft.validate().unwrap_err();
        assert_eq!(err, QuestionShapeError::NoOptions);
    }

    #[test]
    fn empty_body_fails() {
        let mut draft = base_draft();
        draft.body = "   ".to_string();
        draft.correct_value = Some(1.0);
        let err = draft.validate().unwrap_err();
        assert_eq!(err, QuestionShapeError::EmptyBody);
    }

    #[test]
    fn bad_image_url_fails() {
        let mut draft = base_draft();
        draft.correct_value = Some(1.0);
        draft.image_url = Some("not a url".to_string());
        let err = draft.validate().unwrap_err();
        assert_eq!(err, QuestionShapeError::InvalidImageUrl);
    }

    #[test]
    fn unscorable_placeholder_keeps_identity() {
        let q = Question::unscorable(QuestionId::new("q9"), 9, "broken row");
        assert_eq!(q.id().as_str(), "q9");
        assert_eq!(q.spec(), &AnswerSpec::Unscorable);
        assert!(q.spec().options().is_empty());
    }
}
