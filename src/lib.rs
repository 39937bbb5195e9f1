//! A text calculator with variables, single-parameter functions and range
//! sweeps, and a countdown runner for compact timer expressions such as
//! `25x4-5,5`.

pub mod batch;
pub mod countdown;
pub mod debug;
pub mod env;
pub mod error;
pub mod expr;
pub mod format;
pub mod number;
pub mod repl;
pub mod statement;
pub mod terminal;
pub mod timer;

pub use env::Environment;
pub use error::{CalcError, EvalResult, TimerError};
pub use number::Number;
pub use statement::Outcome;
