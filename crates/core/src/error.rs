use thiserror::Error;

use crate::model::{PracticeSetError, QuestionShapeError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    QuestionShape(#[from] QuestionShapeError),
    #[error(transparent)]
    PracticeSet(#[from] PracticeSetError),
}
