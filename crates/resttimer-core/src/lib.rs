pub mod error;
pub mod machine;
pub mod models;

pub use error::{Error, Result};
pub use machine::TimerStateMachine;
