mod controller;
mod state;
mod ticker;
mod view;

// Public API of the session subsystem.
pub use controller::{ExitKind, ExitOutcome, SessionController};
pub use state::{AnswerEvent, Phase, PracticeSession};
pub use ticker::Ticker;
pub use view::SessionView;
