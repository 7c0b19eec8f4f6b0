#![forbid(unsafe_code)]

pub mod error;
pub mod render;
pub mod session;

pub use practice_core::Clock;

pub use error::SessionError;
pub use render::{ContentRenderer, MarkdownRenderer, RenderStyle, RenderedBlock};
pub use session::{
    AnswerEvent, ExitKind, ExitOutcome, Phase, PracticeSession, SessionController, SessionView,
};
