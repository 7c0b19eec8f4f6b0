#![forbid(unsafe_code)]

pub mod mapping;
pub mod remote;
pub mod source;

pub use mapping::{OptionDto, PracticeSetDto, QuestionDto};
pub use remote::{HttpSource, RemoteConfig};
pub use source::{ContentError, InMemorySource, PracticeSetSource};
