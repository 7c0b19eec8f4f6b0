mod answer;
mod ids;
mod question;
mod set;
mod summary;

pub use ids::{OptionKey, QuestionId, SetId};

pub use answer::{NumericInput, UserAnswer};
pub use question::{
    AnswerSpec, ChoiceOption, ImageSource, OptionContent, Question, QuestionDraft,
    QuestionShapeError,
};
pub use set::{PracticeSet, PracticeSetError};
pub use summary::{PracticeSummary, QuestionResult};
