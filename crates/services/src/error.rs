//! Shared error types for the services crate.

use thiserror::Error;

use content::ContentError;
use practice_core::model::{QuestionId, SetId};

use crate::session::Phase;

/// Errors emitted by the session engine.
///
/// Every rejected operation leaves the session value untouched; callers can
/// always retry or ignore.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("{operation} is not valid in phase {phase:?}")]
    InvalidTransition {
        operation: &'static str,
        phase: Phase,
    },

    #[error("unknown practice set {0}")]
    UnknownSet(SetId),

    #[error("question {0} is not the current question")]
    NotCurrentQuestion(QuestionId),

    #[error("no exit confirmation is pending")]
    NoPendingExit,

    #[error(transparent)]
    Content(#[from] ContentError),
}
