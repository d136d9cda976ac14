//! Shell command pipeline
//!
//! Input line -> parse_command -> Command -> Session::execute -> Outcome

pub mod executor;
pub mod parser;
pub mod resolver;

pub use executor::{Outcome, Session};
pub use parser::{parse_command, Command, Target, HELP};
pub use resolver::TargetResolver;
