pub mod input;
pub mod result;
pub mod typing;

pub use result::TestResult;
pub use typing::{Phase, TypingSession};
